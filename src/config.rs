use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::{Result, ScanRegionError};

/// Configuration for ScanRegionR
///
/// All pipeline constants live here instead of in process-scope globals:
/// the intensity cutoff, the calibration scale and the connectivity rule are
/// passed explicitly into the pipeline entry point.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "default_input_path")]
    pub input_path: String,

    #[serde(default = "default_output_base_dir")]
    pub output_base_dir: String,

    /// Intensity cutoff T: a pixel is foreground iff intensity > T (strict).
    /// Deployed variants use 150 and 200; 150 is the documented default.
    #[serde(default = "default_threshold_cutoff")]
    pub threshold_cutoff: u8,

    /// Physical area per pixel (mm² per pixel at the scanner resolution).
    /// Fixed at startup, never mutated during processing.
    #[serde(default = "default_calibration_scale")]
    pub calibration_scale: f64,

    #[serde(default = "default_connectivity")]
    pub connectivity: Connectivity,

    /// Smoothing kernel side length; must be odd.
    #[serde(default = "default_blur_kernel_size")]
    pub blur_kernel_size: u32,

    /// Gaussian sigma; 0.0 means derive from the kernel size
    /// (0.3 * ((k - 1) * 0.5 - 1) + 0.8).
    #[serde(default = "default_blur_sigma")]
    pub blur_sigma: f64,

    /// Canonical unit for the formatted area field.
    #[serde(default = "default_area_unit")]
    pub area_unit: AreaUnit,

    #[serde(default = "default_parallel")]
    pub use_parallel: bool,
}

/// Connectivity rule for region extraction
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Connectivity {
    /// 4-connected neighborhood (edge-adjacent)
    Four,
    /// 8-connected neighborhood (edge- or corner-adjacent)
    Eight,
}

/// Area unit variant for the formatted output field
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum AreaUnit {
    /// Physical square millimetres, 2 decimal places
    Mm2,
    /// Raw pixel count (legacy deployment variant)
    Px,
}

fn default_input_path() -> String {
    "./input".to_string()
}

fn default_output_base_dir() -> String {
    "./output".to_string()
}

fn default_threshold_cutoff() -> u8 {
    150
}

fn default_calibration_scale() -> f64 {
    0.1
}

fn default_connectivity() -> Connectivity {
    Connectivity::Eight
}

fn default_blur_kernel_size() -> u32 {
    5
}

fn default_blur_sigma() -> f64 {
    0.0
}

fn default_area_unit() -> AreaUnit {
    AreaUnit::Mm2
}

fn default_parallel() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: default_input_path(),
            output_base_dir: default_output_base_dir(),
            threshold_cutoff: default_threshold_cutoff(),
            calibration_scale: default_calibration_scale(),
            connectivity: default_connectivity(),
            blur_kernel_size: default_blur_kernel_size(),
            blur_sigma: default_blur_sigma(),
            area_unit: default_area_unit(),
            use_parallel: default_parallel(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ScanRegionError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            ScanRegionError::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.blur_kernel_size == 0 || self.blur_kernel_size % 2 == 0 {
            return Err(ScanRegionError::Config(
                "blur_kernel_size must be odd and > 0".to_string(),
            ));
        }

        if !self.blur_sigma.is_finite() || self.blur_sigma < 0.0 {
            return Err(ScanRegionError::Config(
                "blur_sigma must be finite and >= 0.0".to_string(),
            ));
        }

        if !self.calibration_scale.is_finite() || self.calibration_scale <= 0.0 {
            return Err(ScanRegionError::Config(
                "calibration_scale must be finite and > 0.0".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ScanRegionError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content).map_err(ScanRegionError::Io)?;

        Ok(())
    }
}
