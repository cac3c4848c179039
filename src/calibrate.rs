use crate::config::AreaUnit;

/// Convert a pixel area to physical units using the fixed process-wide
/// calibration scale. Pure multiplication; rounding happens only at
/// formatting time.
pub fn to_physical_area(area_px: u64, scale: f64) -> f64 {
    area_px as f64 * scale
}

/// Format the area for the output record in the configured unit.
/// Physical areas are displayed to 2 decimal places.
pub fn format_area(area_px: u64, scale: f64, unit: AreaUnit) -> String {
    match unit {
        AreaUnit::Mm2 => format!("{:.2} mm²", to_physical_area(area_px, scale)),
        AreaUnit::Px => format!("{} px", area_px),
    }
}
