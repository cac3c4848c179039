use image::{DynamicImage, GrayImage};

use crate::config::Config;
use crate::errors::Result;
use crate::finding::Finding;
use crate::geometry::analyze_region;
use crate::preprocess::{decode_payload, preprocess};
use crate::regions::{extract_regions, select_largest};
use crate::threshold::{threshold_mask, Mask};

/// Intermediate stage outputs, kept around for debug dumps
pub struct StageArtifacts {
    pub smoothed: GrayImage,
    pub mask: Mask,
}

/// Run stages 1-7 on an already-decoded image.
///
/// Strictly forward: preprocess -> threshold -> extract -> select ->
/// geometry -> calibrate -> assemble. No stage holds shared mutable state,
/// so concurrent requests need no locking.
pub fn run_stages(image: &DynamicImage, config: &Config) -> Result<(Finding, StageArtifacts)> {
    let smoothed = preprocess(image, config.blur_kernel_size, config.blur_sigma)?;
    let mask = threshold_mask(&smoothed, config.threshold_cutoff);
    let regions = extract_regions(&mask, config.connectivity);

    let finding = match select_largest(&regions) {
        Some(region) => {
            let geometry = analyze_region(region);
            Finding::detected(&geometry, config)
        }
        None => Finding::normal(config),
    };

    Ok((finding, StageArtifacts { smoothed, mask }))
}

/// Boundary contract: analyze one binary image payload.
///
/// Never returns an error; every fault (empty payload, undecodable bytes,
/// unexpected processing failure) is recovered here and converted into an
/// error finding with a stable non-sensitive code. The detailed fault is
/// logged to stderr only.
pub fn analyze_payload(payload: &[u8], config: &Config) -> Finding {
    let decoded = match decode_payload(payload) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Payload rejected: {}", e);
            return Finding::failure(&e);
        }
    };

    analyze_image(&decoded, config)
}

/// Analyze an already-decoded image; same fault recovery as
/// `analyze_payload`.
pub fn analyze_image(image: &DynamicImage, config: &Config) -> Finding {
    match run_stages(image, config) {
        Ok((finding, _)) => finding,
        Err(e) => {
            eprintln!("Processing fault: {}", e);
            Finding::failure(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::{Status, LABEL_ABNORMAL, LABEL_NORMAL};
    use std::io::Cursor;

    fn png_bytes(image: &GrayImage) -> Vec<u8> {
        let mut buffer = Vec::new();
        DynamicImage::ImageLuma8(image.clone())
            .write_to(&mut Cursor::new(&mut buffer), image::ImageOutputFormat::Png)
            .unwrap();
        buffer
    }

    fn dark_image(width: u32, height: u32) -> GrayImage {
        GrayImage::from_pixel(width, height, image::Luma([0]))
    }

    fn draw_disk(image: &mut GrayImage, cx: i64, cy: i64, r: i64, value: u8) {
        for y in 0..image.height() as i64 {
            for x in 0..image.width() as i64 {
                if (x - cx) * (x - cx) + (y - cy) * (y - cy) <= r * r {
                    image.put_pixel(x as u32, y as u32, image::Luma([value]));
                }
            }
        }
    }

    fn draw_square(image: &mut GrayImage, x0: u32, y0: u32, side: u32, value: u8) {
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                image.put_pixel(x, y, image::Luma([value]));
            }
        }
    }

    #[test]
    fn blank_dark_image_is_normal() {
        // Scenario A: uniform below-threshold image.
        let payload = png_bytes(&dark_image(32, 32));
        let finding = analyze_payload(&payload, &Config::default());

        assert_eq!(finding.status, Status::Success);
        assert_eq!(finding.finding.as_deref(), Some(LABEL_NORMAL));
        assert_eq!(finding.area_px, Some(0));
        assert_eq!(finding.area.as_deref(), Some("0.00 mm²"));
        assert!(finding.location.is_none());
    }

    #[test]
    fn filled_disk_is_detected_near_its_center() {
        // Scenario B: disk of radius 10 at (32, 30).
        let mut image = dark_image(64, 64);
        draw_disk(&mut image, 32, 30, 10, 255);
        let payload = png_bytes(&image);

        let finding = analyze_payload(&payload, &Config::default());
        assert_eq!(finding.status, Status::Success);
        assert_eq!(finding.finding.as_deref(), Some(LABEL_ABNORMAL));

        // Area within discretization + smoothing error of pi * r^2.
        let area_px = finding.area_px.unwrap() as f64;
        let ideal = std::f64::consts::PI * 100.0;
        assert!(
            area_px > ideal * 0.80 && area_px < ideal * 1.20,
            "area {} outside tolerance of {}",
            area_px,
            ideal
        );

        // Centroid within +/-1 of the disk center (truncation).
        let location = finding.location.unwrap();
        let expected = ["x:31", "x:32", "x:33"];
        assert!(expected.iter().any(|s| location.contains(s)), "{}", location);
        let expected = ["y:29", "y:30", "y:31"];
        assert!(expected.iter().any(|s| location.contains(s)), "{}", location);
    }

    #[test]
    fn larger_of_two_blobs_is_selected() {
        // Scenario C: an 8x8 and a 4x4 blob; only the larger is reported.
        let mut image = dark_image(64, 64);
        draw_square(&mut image, 8, 8, 8, 255);
        draw_square(&mut image, 44, 44, 4, 255);
        let payload = png_bytes(&image);

        let finding = analyze_payload(&payload, &Config::default());
        assert_eq!(finding.status, Status::Success);
        assert_eq!(finding.finding.as_deref(), Some(LABEL_ABNORMAL));

        // The selected region sits near the large square's center (11, 11),
        // nowhere near the small blob at (45, 45).
        let location = finding.location.unwrap();
        assert!(
            location.contains("x:1") && location.contains("y:1"),
            "{}",
            location
        );

        // And its area is far beyond anything the 4x4 blob could produce.
        assert!(finding.area_px.unwrap() > 30);
    }

    #[test]
    fn malformed_payload_is_a_non_leaking_error() {
        // Scenario D.
        let finding = analyze_payload(b"definitely not a PNG", &Config::default());
        assert_eq!(finding.status, Status::Error);
        assert_eq!(finding.code.as_deref(), Some("decode_error"));
        assert_eq!(
            finding.message.as_deref(),
            Some("payload could not be decoded as an image")
        );
        assert!(finding.area.is_none());
    }

    #[test]
    fn empty_payload_is_a_distinct_error() {
        let finding = analyze_payload(&[], &Config::default());
        assert_eq!(finding.status, Status::Error);
        assert_eq!(finding.code.as_deref(), Some("empty_input"));
    }

    #[test]
    fn pixel_exactly_at_cutoff_stays_background() {
        // Uniform image exactly at the cutoff: smoothing keeps it uniform,
        // strict `>` keeps it background.
        let config = Config::default();
        let payload = png_bytes(&GrayImage::from_pixel(
            16,
            16,
            image::Luma([config.threshold_cutoff]),
        ));
        let finding = analyze_payload(&payload, &config);
        assert_eq!(finding.finding.as_deref(), Some(LABEL_NORMAL));

        // One unit above is foreground everywhere.
        let payload = png_bytes(&GrayImage::from_pixel(
            16,
            16,
            image::Luma([config.threshold_cutoff + 1]),
        ));
        let finding = analyze_payload(&payload, &config);
        assert_eq!(finding.finding.as_deref(), Some(LABEL_ABNORMAL));
        assert_eq!(finding.area_px, Some(256));
    }

    #[test]
    fn repeated_analysis_is_deterministic() {
        let mut image = dark_image(48, 48);
        draw_disk(&mut image, 20, 24, 7, 220);
        let payload = png_bytes(&image);

        let config = Config::default();
        let first = serde_json::to_string(&analyze_payload(&payload, &config)).unwrap();
        let second = serde_json::to_string(&analyze_payload(&payload, &config)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn growing_blob_never_shrinks_reported_area() {
        let config = Config::default();
        let mut previous = 0u64;
        for side in [4u32, 6, 8, 12] {
            let mut image = dark_image(40, 40);
            draw_square(&mut image, 10, 10, side, 255);
            let finding = analyze_payload(&png_bytes(&image), &config);
            let area = finding.area_px.unwrap();
            assert!(area >= previous, "side {} shrank area", side);
            previous = area;
        }
    }
}
