use std::fs;
use std::path::{Path, PathBuf};

use csv::Writer;

use crate::errors::{Result, ScanRegionError};
use crate::finding::{Finding, Status};

/// Write a single finding as pretty JSON to
/// `<output_dir>/findings/<filename>.json` and return the path.
pub fn write_finding_json<P: AsRef<Path>>(
    finding: &Finding,
    output_dir: P,
    filename: &str,
) -> Result<PathBuf> {
    let output_path = output_dir
        .as_ref()
        .join("findings")
        .join(format!("{}.json", filename));

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).map_err(ScanRegionError::Io)?;
    }

    let content = serde_json::to_string_pretty(finding).map_err(ScanRegionError::JsonOutput)?;
    fs::write(&output_path, content).map_err(ScanRegionError::Io)?;

    Ok(output_path)
}

/// Write the batch summary CSV, one row per processed payload.
pub fn write_summary_csv<P: AsRef<Path>>(
    entries: &[(String, Finding)],
    output_dir: P,
) -> Result<PathBuf> {
    let output_path = output_dir.as_ref().join("findings.csv");

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).map_err(ScanRegionError::Io)?;
    }

    let mut writer = Writer::from_path(&output_path).map_err(ScanRegionError::CsvOutput)?;

    writer
        .write_record([
            "Filename",
            "Status",
            "Finding",
            "Area",
            "Area_Px",
            "Location",
            "Compactness",
            "Error_Code",
        ])
        .map_err(ScanRegionError::CsvOutput)?;

    for (filename, finding) in entries {
        let status = match finding.status {
            Status::Success => "success",
            Status::Error => "error",
        };

        writer
            .write_record([
                filename.as_str(),
                status,
                finding.finding.as_deref().unwrap_or(""),
                finding.area.as_deref().unwrap_or(""),
                &finding
                    .area_px
                    .map(|a| a.to_string())
                    .unwrap_or_default(),
                finding.location.as_deref().unwrap_or(""),
                &finding
                    .compactness
                    .map(|c| format!("{:.6}", c))
                    .unwrap_or_default(),
                finding.code.as_deref().unwrap_or(""),
            ])
            .map_err(ScanRegionError::CsvOutput)?;
    }

    writer
        .flush()
        .map_err(|e| ScanRegionError::CsvOutput(csv::Error::from(e)))?;

    Ok(output_path)
}
