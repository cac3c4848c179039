// src/lib.rs - Library interface for ScanRegionR

pub mod calibrate;
pub mod config;
pub mod errors;
pub mod finding;
pub mod geometry;
pub mod image_io;
pub mod output;
pub mod pipeline;
pub mod preprocess;
pub mod regions;
pub mod threshold;

// Re-export commonly used types and functions
pub use config::{AreaUnit, Config, Connectivity};
pub use errors::{Result, ScanRegionError};
pub use finding::{Finding, Status};
pub use pipeline::{analyze_image, analyze_payload, run_stages};

// Re-export pipeline stage functions
pub use preprocess::{decode_payload, gaussian_smooth, preprocess};
pub use threshold::{threshold_mask, Mask};
pub use regions::{extract_regions, select_largest, Region};
pub use geometry::{
    analyze_region,
    centroid,
    compactness,
    exposed_edge_perimeter,
    raw_moments,
    RawMoments,
    RegionGeometry,
};
pub use calibrate::{format_area, to_physical_area};

// Re-export I/O helpers
pub use image_io::{
    get_image_files_in_dir, load_payload, mask_to_image, save_gray_image, InputPayload,
};
pub use output::{write_finding_json, write_summary_csv};
