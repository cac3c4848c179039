use serde::{Deserialize, Serialize};

use crate::calibrate::format_area;
use crate::config::Config;
use crate::errors::ScanRegionError;
use crate::geometry::RegionGeometry;

/// Classification label for a successful analysis with a dominant region
pub const LABEL_ABNORMAL: &str = "abnormal bright region detected";
/// Classification label when no region cleared the threshold
pub const LABEL_NORMAL: &str = "normal - no abnormal region";
/// Sentinel location used when the centroid is undefined (m00 == 0)
pub const LOCATION_UNDEFINED: &str = "central region";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// The terminal artifact of one analysis request.
///
/// Serializes to the caller-facing JSON record; fields absent from a given
/// terminal state are omitted rather than nulled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub status: Status,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub finding: Option<String>,

    /// Formatted area with unit suffix in the configured canonical unit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,

    /// Raw pixel-unit area, always exposed alongside the formatted field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_px: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Computed region-quality metric (compactness in [0, 1]); replaces the
    /// fixed "confidence" annotation of earlier deployments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compactness: Option<f64>,

    /// Stable machine-readable fault code, error status only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Non-sensitive fault description, error status only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Finding {
    /// Terminal state NoRegion: segmentation succeeded, nothing cleared the
    /// cutoff.
    pub fn normal(config: &Config) -> Self {
        Self {
            status: Status::Success,
            finding: Some(LABEL_NORMAL.to_string()),
            area: Some(format_area(0, config.calibration_scale, config.area_unit)),
            area_px: Some(0),
            location: None,
            compactness: None,
            code: None,
            message: None,
        }
    }

    /// Terminal state Reported: a dominant region was measured.
    pub fn detected(geometry: &RegionGeometry, config: &Config) -> Self {
        let location = match geometry.centroid {
            Some((cx, cy)) => format!("centroid at x:{}, y:{}", cx, cy),
            None => LOCATION_UNDEFINED.to_string(),
        };

        Self {
            status: Status::Success,
            finding: Some(LABEL_ABNORMAL.to_string()),
            area: Some(format_area(
                geometry.area_px,
                config.calibration_scale,
                config.area_unit,
            )),
            area_px: Some(geometry.area_px),
            location: Some(location),
            compactness: Some(geometry.compactness),
            code: None,
            message: None,
        }
    }

    /// Terminal state Failed: a processing fault was recovered at the
    /// pipeline boundary. Only the stable code and fixed message are
    /// exposed; the fault detail stays internal.
    pub fn failure(error: &ScanRegionError) -> Self {
        Self {
            status: Status::Error,
            finding: None,
            area: None,
            area_px: None,
            location: None,
            compactness: None,
            code: Some(error.public_code().to_string()),
            message: Some(error.public_message().to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AreaUnit;
    use crate::geometry::RegionGeometry;

    #[test]
    fn normal_finding_has_zero_area_and_no_location() {
        let finding = Finding::normal(&Config::default());
        assert!(finding.is_success());
        assert_eq!(finding.area_px, Some(0));
        assert_eq!(finding.area.as_deref(), Some("0.00 mm²"));
        assert!(finding.location.is_none());
        assert!(finding.code.is_none());
    }

    #[test]
    fn detected_finding_formats_centroid() {
        let geometry = RegionGeometry {
            area_px: 124,
            centroid: Some((52, 47)),
            compactness: 0.9,
        };
        let finding = Finding::detected(&geometry, &Config::default());
        assert_eq!(finding.location.as_deref(), Some("centroid at x:52, y:47"));
        assert_eq!(finding.area.as_deref(), Some("12.40 mm²"));
        assert_eq!(finding.area_px, Some(124));
    }

    #[test]
    fn undefined_centroid_uses_sentinel() {
        let geometry = RegionGeometry {
            area_px: 0,
            centroid: None,
            compactness: 0.0,
        };
        let finding = Finding::detected(&geometry, &Config::default());
        assert_eq!(finding.location.as_deref(), Some(LOCATION_UNDEFINED));
    }

    #[test]
    fn pixel_unit_variant() {
        let mut config = Config::default();
        config.area_unit = AreaUnit::Px;
        let geometry = RegionGeometry {
            area_px: 77,
            centroid: Some((1, 2)),
            compactness: 0.5,
        };
        let finding = Finding::detected(&geometry, &config);
        assert_eq!(finding.area.as_deref(), Some("77 px"));
    }

    #[test]
    fn failure_serializes_without_success_fields() {
        let finding = Finding::failure(&ScanRegionError::EmptyInput);
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], "empty_input");
        assert!(json.get("area").is_none());
        assert!(json.get("finding").is_none());
    }

    #[test]
    fn success_serializes_without_error_fields() {
        let finding = Finding::normal(&Config::default());
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["status"], "success");
        assert!(json.get("code").is_none());
        assert!(json.get("message").is_none());
    }
}
