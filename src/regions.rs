use std::collections::VecDeque;

use crate::config::Connectivity;
use crate::threshold::Mask;

/// A maximal connected component of foreground cells.
///
/// `pixels` holds every member coordinate, including filled interior holes;
/// pixel area is the member count. The first pixel is the raster-scan seed,
/// i.e. the topmost-leftmost member.
#[derive(Debug, Clone)]
pub struct Region {
    pub pixels: Vec<(u32, u32)>,
}

impl Region {
    /// Pixel area (count of member pixels)
    #[inline]
    pub fn area(&self) -> u64 {
        self.pixels.len() as u64
    }

    /// Raster-scan seed of the region (topmost row, then leftmost column)
    #[inline]
    pub fn seed(&self) -> (u32, u32) {
        self.pixels[0]
    }
}

static FOUR_NEIGHBORHOOD: [(i32, i32); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

static EIGHT_NEIGHBORHOOD: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

fn offsets(connectivity: Connectivity) -> &'static [(i32, i32)] {
    match connectivity {
        Connectivity::Four => &FOUR_NEIGHBORHOOD,
        Connectivity::Eight => &EIGHT_NEIGHBORHOOD,
    }
}

/// Background reachability must use the complement of the foreground rule,
/// otherwise a diagonal chain of foreground pixels would both connect the
/// region and let the background "leak" through it.
fn complement(connectivity: Connectivity) -> Connectivity {
    match connectivity {
        Connectivity::Four => Connectivity::Eight,
        Connectivity::Eight => Connectivity::Four,
    }
}

/// Group foreground cells into maximal connected components.
///
/// Components are discovered by a breadth-first flood fill seeded in
/// raster-scan order, so extraction order is deterministic. Interior holes
/// (background components not reachable from the image border) are filled
/// into their enclosing region: holes are never reported as separate regions
/// and never subtract from area. An all-background mask yields an empty
/// sequence, not an error.
pub fn extract_regions(mask: &Mask, connectivity: Connectivity) -> Vec<Region> {
    let (width, height) = (mask.width(), mask.height());
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let idx = |x: u32, y: u32| (y as usize) * (width as usize) + x as usize;

    // 0 = unlabeled; region labels start at 1.
    let mut labels = vec![0u32; (width as usize) * (height as usize)];
    let mut regions: Vec<Region> = Vec::new();
    let fg_offsets = offsets(connectivity);

    for y in 0..height {
        for x in 0..width {
            if !mask.get(x, y) || labels[idx(x, y)] != 0 {
                continue;
            }

            let label = regions.len() as u32 + 1;
            let mut pixels = Vec::new();
            let mut queue = VecDeque::new();

            labels[idx(x, y)] = label;
            queue.push_back((x, y));

            while let Some((cx, cy)) = queue.pop_front() {
                pixels.push((cx, cy));

                for &(dx, dy) in fg_offsets {
                    let nx = cx as i32 + dx;
                    let ny = cy as i32 + dy;
                    if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                        continue;
                    }
                    let (nx, ny) = (nx as u32, ny as u32);
                    if mask.get(nx, ny) && labels[idx(nx, ny)] == 0 {
                        labels[idx(nx, ny)] = label;
                        queue.push_back((nx, ny));
                    }
                }
            }

            regions.push(Region { pixels });
        }
    }

    if regions.is_empty() {
        return regions;
    }

    fill_holes(mask, connectivity, &mut labels, &mut regions);

    regions
}

/// Flood the background from the image border under the complement
/// connectivity; any background cell left unreached is an interior hole and
/// is appended to the region that encloses it.
fn fill_holes(
    mask: &Mask,
    connectivity: Connectivity,
    labels: &mut [u32],
    regions: &mut [Region],
) {
    let (width, height) = (mask.width(), mask.height());
    let idx = |x: u32, y: u32| (y as usize) * (width as usize) + x as usize;
    let bg_offsets = offsets(complement(connectivity));

    let mut outside = vec![false; (width as usize) * (height as usize)];
    let mut queue = VecDeque::new();

    for x in 0..width {
        for y in [0, height - 1] {
            if !mask.get(x, y) && !outside[idx(x, y)] {
                outside[idx(x, y)] = true;
                queue.push_back((x, y));
            }
        }
    }
    for y in 0..height {
        for x in [0, width - 1] {
            if !mask.get(x, y) && !outside[idx(x, y)] {
                outside[idx(x, y)] = true;
                queue.push_back((x, y));
            }
        }
    }

    while let Some((cx, cy)) = queue.pop_front() {
        for &(dx, dy) in bg_offsets {
            let nx = cx as i32 + dx;
            let ny = cy as i32 + dy;
            if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                continue;
            }
            let (nx, ny) = (nx as u32, ny as u32);
            if !mask.get(nx, ny) && !outside[idx(nx, ny)] {
                outside[idx(nx, ny)] = true;
                queue.push_back((nx, ny));
            }
        }
    }

    // Remaining background cells are holes; walk each hole component once
    // (still under the complement connectivity) and hand its cells to the
    // enclosing region.
    for y in 0..height {
        for x in 0..width {
            if mask.get(x, y) || outside[idx(x, y)] || labels[idx(x, y)] != 0 {
                continue;
            }

            let mut component = Vec::new();
            let mut owner = 0u32;
            let mut hole_queue = VecDeque::new();

            // Temporarily mark with u32::MAX to avoid revisiting.
            labels[idx(x, y)] = u32::MAX;
            hole_queue.push_back((x, y));

            while let Some((cx, cy)) = hole_queue.pop_front() {
                component.push((cx, cy));

                for &(dx, dy) in bg_offsets {
                    let nx = cx as i32 + dx;
                    let ny = cy as i32 + dy;
                    if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                        continue;
                    }
                    let (nx, ny) = (nx as u32, ny as u32);
                    if !mask.get(nx, ny) && !outside[idx(nx, ny)] && labels[idx(nx, ny)] == 0 {
                        labels[idx(nx, ny)] = u32::MAX;
                        hole_queue.push_back((nx, ny));
                    }
                }

                if owner == 0 {
                    for &(dx, dy) in &EIGHT_NEIGHBORHOOD {
                        let nx = cx as i32 + dx;
                        let ny = cy as i32 + dy;
                        if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                            continue;
                        }
                        let (nx, ny) = (nx as u32, ny as u32);
                        if mask.get(nx, ny) {
                            owner = labels[idx(nx, ny)];
                            break;
                        }
                    }
                }
            }

            if owner != 0 {
                for &(hx, hy) in &component {
                    labels[idx(hx, hy)] = owner;
                }
                regions[(owner - 1) as usize].pixels.extend(component);
            }
        }
    }
}

/// Select the region with maximum pixel area via a single linear max-scan.
///
/// Tie-break on equal area: the earlier region in extraction order wins.
/// Extraction is seeded in raster-scan order, so this is the region whose
/// topmost-leftmost pixel comes first. Empty input yields None ("no
/// finding"), which bypasses the geometry and calibration stages.
pub fn select_largest(regions: &[Region]) -> Option<&Region> {
    let mut best: Option<&Region> = None;
    for region in regions {
        match best {
            Some(current) if region.area() <= current.area() => {}
            _ => best = Some(region),
        }
    }
    best
}
