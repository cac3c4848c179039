use std::collections::HashSet;
use std::f64::consts::PI;

use crate::regions::Region;

/// Raw geometric moments of a region.
///
/// Invariant: m00 equals the pixel area exactly; m10/m00 and m01/m00 are
/// only defined when m00 != 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMoments {
    pub m00: u64,
    pub m10: u64,
    pub m01: u64,
}

/// Geometry derived from a selected region
#[derive(Debug, Clone, Copy)]
pub struct RegionGeometry {
    pub area_px: u64,
    /// None when m00 == 0; the assembler substitutes a sentinel location.
    pub centroid: Option<(u32, u32)>,
    /// Region-quality metric in [0, 1]: 4π·area / perimeter², perimeter
    /// taken as the count of exposed pixel edges.
    pub compactness: f64,
}

/// Compute zeroth and first order raw moments by direct summation over
/// member pixels.
pub fn raw_moments(region: &Region) -> RawMoments {
    let mut m00 = 0u64;
    let mut m10 = 0u64;
    let mut m01 = 0u64;

    for &(x, y) in &region.pixels {
        m00 += 1;
        m10 += x as u64;
        m01 += y as u64;
    }

    RawMoments { m00, m10, m01 }
}

/// Centroid from raw moments, truncated toward zero (not rounded).
/// Undefined when m00 == 0.
pub fn centroid(moments: &RawMoments) -> Option<(u32, u32)> {
    if moments.m00 == 0 {
        return None;
    }
    let cx = (moments.m10 / moments.m00) as u32;
    let cy = (moments.m01 / moments.m00) as u32;
    Some((cx, cy))
}

/// Perimeter estimate: number of pixel edges between member and non-member
/// cells. Interior holes count as members, so only the outer boundary is
/// measured.
pub fn exposed_edge_perimeter(region: &Region) -> u64 {
    let members: HashSet<(u32, u32)> = region.pixels.iter().copied().collect();
    let mut edges = 0u64;

    for &(x, y) in &region.pixels {
        let neighbors = [
            (x as i64 + 1, y as i64),
            (x as i64 - 1, y as i64),
            (x as i64, y as i64 + 1),
            (x as i64, y as i64 - 1),
        ];
        for (nx, ny) in neighbors {
            let is_member = nx >= 0
                && ny >= 0
                && members.contains(&(nx as u32, ny as u32));
            if !is_member {
                edges += 1;
            }
        }
    }

    edges
}

/// Compactness score: 4π·area / perimeter², clamped to [0, 1]. A ragged or
/// elongated region scores lower than a filled round one.
pub fn compactness(area_px: u64, perimeter: u64) -> f64 {
    if perimeter == 0 {
        return 0.0;
    }
    let score = (4.0 * PI * area_px as f64) / ((perimeter * perimeter) as f64);
    score.clamp(0.0, 1.0)
}

/// Full geometry pass over the selected region
pub fn analyze_region(region: &Region) -> RegionGeometry {
    let moments = raw_moments(region);
    let perimeter = exposed_edge_perimeter(region);

    RegionGeometry {
        area_px: moments.m00,
        centroid: centroid(&moments),
        compactness: compactness(moments.m00, perimeter),
    }
}
