use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, ValueEnum};
use rayon::prelude::*;

use scan_region_rust_lib::config::{AreaUnit, Config};
use scan_region_rust_lib::errors::{Result, ScanRegionError};
use scan_region_rust_lib::finding::Finding;
use scan_region_rust_lib::image_io::{
    get_image_files_in_dir, load_payload, mask_to_image, save_gray_image,
};
use scan_region_rust_lib::output::{write_finding_json, write_summary_csv};
use scan_region_rust_lib::pipeline::{analyze_payload, run_stages};
use scan_region_rust_lib::preprocess::decode_payload;

/// Command-line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about = "ScanRegionR - Bright-region analysis for scan slices")]
struct Args {
    /// Path to input file or directory
    #[clap(short, long)]
    input: Option<String>,

    /// Path to output directory
    #[clap(short, long)]
    output: Option<String>,

    /// Path to configuration file
    #[clap(short, long, default_value = "config.toml")]
    config: String,

    /// Intensity cutoff override (overwrites config)
    #[clap(short, long)]
    threshold: Option<u8>,

    /// Area unit override (overwrites config)
    #[clap(short, long)]
    unit: Option<AreaUnitArg>,

    /// Enable debug mode (save intermediate images and print more info)
    #[clap(short, long)]
    debug: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AreaUnitArg {
    Mm2,
    Px,
}

/// Process one payload file into a named finding. Debug mode re-runs the
/// stages explicitly so the smoothed image and mask can be dumped.
fn process_payload(
    path: &Path,
    config: &Config,
    debug_dir: Option<&Path>,
) -> Result<(String, Finding)> {
    let payload = load_payload(path)?;

    if let Some(dir) = debug_dir {
        let finding = match decode_payload(&payload.bytes) {
            Ok(image) => match run_stages(&image, config) {
                Ok((finding, artifacts)) => {
                    save_gray_image(
                        &artifacts.smoothed,
                        dir.join(format!("{}_smoothed.png", payload.filename)),
                    )?;
                    save_gray_image(
                        &mask_to_image(&artifacts.mask),
                        dir.join(format!("{}_mask.png", payload.filename)),
                    )?;
                    finding
                }
                Err(e) => {
                    eprintln!("Processing fault in {}: {}", path.display(), e);
                    Finding::failure(&e)
                }
            },
            Err(e) => {
                eprintln!("Payload rejected {}: {}", path.display(), e);
                Finding::failure(&e)
            }
        };
        return Ok((payload.filename, finding));
    }

    let finding = analyze_payload(&payload.bytes, config);
    Ok((payload.filename, finding))
}

/// Main function
fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration; a missing config file falls back to defaults so
    // the tool runs on CLI arguments alone.
    let config_path = Path::new(&args.config);
    let mut config = if config_path.exists() {
        Config::from_file(config_path)?
    } else {
        Config::default()
    };

    // Override config with command-line arguments
    if let Some(input) = args.input.clone() {
        config.input_path = input;
    }

    if let Some(output) = args.output.clone() {
        config.output_base_dir = output;
    }

    if let Some(threshold) = args.threshold {
        config.threshold_cutoff = threshold;
    }

    if let Some(unit) = args.unit {
        config.area_unit = match unit {
            AreaUnitArg::Mm2 => AreaUnit::Mm2,
            AreaUnitArg::Px => AreaUnit::Px,
        };
    }

    // Validate configuration
    config.validate()?;

    // Start timing
    let start_time = Instant::now();

    let output_base = PathBuf::from(&config.output_base_dir);
    std::fs::create_dir_all(&output_base)?;

    let debug_dir = if args.debug {
        let dir = output_base.join("debug");
        std::fs::create_dir_all(&dir)?;
        Some(dir)
    } else {
        None
    };

    // Process input
    let input_path = PathBuf::from(&config.input_path);

    if input_path.is_file() {
        // Process single file
        println!("Processing single file: {}", input_path.display());
        let (filename, finding) = process_payload(&input_path, &config, debug_dir.as_deref())?;

        println!("{}", serde_json::to_string_pretty(&finding)?);
        write_finding_json(&finding, &output_base, &filename)?;
    } else if input_path.is_dir() {
        // Process all image files in directory
        println!("Processing directory: {}", input_path.display());
        let files = get_image_files_in_dir(&input_path)?;

        println!("Found {} image files", files.len());

        let entries: Vec<(String, Finding)> = if config.use_parallel {
            files
                .par_iter()
                .filter_map(|path| {
                    println!("Processing: {}", path.display());
                    match process_payload(path, &config, debug_dir.as_deref()) {
                        Ok(entry) => Some(entry),
                        Err(e) => {
                            eprintln!("Error processing {}: {}", path.display(), e);
                            None
                        }
                    }
                })
                .collect()
        } else {
            let mut entries = Vec::new();
            for path in &files {
                println!("Processing: {}", path.display());
                match process_payload(path, &config, debug_dir.as_deref()) {
                    Ok(entry) => entries.push(entry),
                    Err(e) => eprintln!("Error processing {}: {}", path.display(), e),
                }
            }
            entries
        };

        for (filename, finding) in &entries {
            write_finding_json(finding, &output_base, filename)?;
        }
        let summary_path = write_summary_csv(&entries, &output_base)?;
        println!("Summary written to {}", summary_path.display());
    } else {
        return Err(ScanRegionError::InvalidPath(input_path));
    }

    // Report elapsed time
    let elapsed = start_time.elapsed();
    println!("Processing completed in {:.2} seconds", elapsed.as_secs_f64());

    Ok(())
}
