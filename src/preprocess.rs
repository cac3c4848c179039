use image::{DynamicImage, GrayImage};

use crate::errors::{Result, ScanRegionError};

/// Decode a raw payload into a pixel buffer.
///
/// An empty payload and an undecodable payload are distinct faults; both are
/// recovered at the pipeline boundary and converted into an error finding.
pub fn decode_payload(payload: &[u8]) -> Result<DynamicImage> {
    if payload.is_empty() {
        return Err(ScanRegionError::EmptyInput);
    }

    image::load_from_memory(payload).map_err(|e| ScanRegionError::Decode(e.to_string()))
}

/// Convert a decoded image to single-channel intensity and smooth it.
///
/// Output dimensions are identical to the input; a zero-sized buffer is
/// reported as a decode fault since nothing downstream can work with it.
pub fn preprocess(image: &DynamicImage, kernel_size: u32, sigma: f64) -> Result<GrayImage> {
    let gray = image.to_luma8();

    if gray.width() == 0 || gray.height() == 0 {
        return Err(ScanRegionError::Decode(
            "decoded image has zero width or height".to_string(),
        ));
    }

    Ok(gaussian_smooth(&gray, kernel_size, sigma))
}

/// Effective sigma for a kernel size, matching the reference toolkit's rule
/// when sigma is left at 0.
fn effective_sigma(kernel_size: u32, sigma: f64) -> f64 {
    if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((kernel_size as f64 - 1.0) * 0.5 - 1.0) + 0.8
    }
}

/// Build the 1-D Gaussian kernel of the given side length, normalized to
/// sum to 1.
fn gaussian_kernel(kernel_size: u32, sigma: f64) -> Vec<f64> {
    let sigma = effective_sigma(kernel_size, sigma);
    let radius = (kernel_size / 2) as i64;

    let mut kernel = Vec::with_capacity(kernel_size as usize);
    let mut sum = 0.0;
    for i in -radius..=radius {
        let weight = (-(i as f64 * i as f64) / (2.0 * sigma * sigma)).exp();
        kernel.push(weight);
        sum += weight;
    }

    for weight in &mut kernel {
        *weight /= sum;
    }

    kernel
}

/// Fixed-kernel Gaussian smoothing, applied as two separable 1-D passes.
///
/// Borders are handled by clamping sample coordinates to the image edge, so
/// a uniform image stays uniform.
pub fn gaussian_smooth(image: &GrayImage, kernel_size: u32, sigma: f64) -> GrayImage {
    let (width, height) = image.dimensions();
    let kernel = gaussian_kernel(kernel_size, sigma);
    let radius = (kernel_size / 2) as i64;

    // Horizontal pass
    let mut horizontal = vec![0.0f64; (width * height) as usize];
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let sx = (x as i64 + k as i64 - radius).clamp(0, width as i64 - 1) as u32;
                acc += weight * image.get_pixel(sx, y)[0] as f64;
            }
            horizontal[(y * width + x) as usize] = acc;
        }
    }

    // Vertical pass
    let mut result = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let sy = (y as i64 + k as i64 - radius).clamp(0, height as i64 - 1) as u32;
                acc += weight * horizontal[(sy * width + x) as usize];
            }
            result.put_pixel(x, y, image::Luma([acc.round().clamp(0.0, 255.0) as u8]));
        }
    }

    result
}
