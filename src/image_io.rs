use std::fs;
use std::path::{Path, PathBuf};

use image::{GrayImage, ImageFormat};

use crate::errors::{Result, ScanRegionError};
use crate::threshold::Mask;

/// A raw payload read from disk, with its metadata
pub struct InputPayload {
    pub bytes: Vec<u8>,
    pub path: PathBuf,
    pub filename: String,
}

/// Supported raster extensions for batch collection
const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Read one image payload from a file. The bytes are handed to the pipeline
/// undecoded; decode faults surface there as error findings.
pub fn load_payload<P: AsRef<Path>>(path: P) -> Result<InputPayload> {
    let path = path.as_ref();

    let filename = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ScanRegionError::InvalidPath(path.to_path_buf()))?
        .to_string();

    let bytes = fs::read(path).map_err(ScanRegionError::Io)?;

    Ok(InputPayload {
        bytes,
        path: path.to_path_buf(),
        filename,
    })
}

/// Get all image files from a directory (recursively)
pub fn get_image_files_in_dir<P: AsRef<Path>>(dir_path: P) -> Result<Vec<PathBuf>> {
    let dir_path = dir_path.as_ref();

    if !dir_path.exists() {
        return Err(ScanRegionError::InvalidPath(dir_path.to_path_buf()));
    }

    if !dir_path.is_dir() {
        return Err(ScanRegionError::Config(format!(
            "{} is not a directory",
            dir_path.display()
        )));
    }

    let mut files = Vec::new();
    find_image_files_recursive(dir_path, &mut files)?;
    files.sort();

    Ok(files)
}

/// Helper function to recursively search for image files
fn find_image_files_recursive(dir_path: &Path, result: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir_path).map_err(ScanRegionError::Io)?;

    for entry in entries {
        let entry = entry.map_err(ScanRegionError::Io)?;
        let path = entry.path();

        if path.is_dir() {
            find_image_files_recursive(&path, result)?;
        } else if path.is_file() {
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                if IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
                    result.push(path);
                }
            }
        }
    }

    Ok(())
}

/// Save a grayscale image to the specified path as PNG
pub fn save_gray_image<P: AsRef<Path>>(image: &GrayImage, path: P) -> Result<()> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(ScanRegionError::Image)?;

    Ok(())
}

/// Render a mask as a grayscale image (255 foreground, 0 background) for
/// debug dumps
pub fn mask_to_image(mask: &Mask) -> GrayImage {
    let mut image = GrayImage::new(mask.width(), mask.height());
    for y in 0..mask.height() {
        for x in 0..mask.width() {
            let value = if mask.get(x, y) { 255 } else { 0 };
            image.put_pixel(x, y, image::Luma([value]));
        }
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_renders_to_binary_image() {
        let mut mask = Mask::new(3, 2);
        mask.set(1, 0, true);
        mask.set(2, 1, true);

        let image = mask_to_image(&mask);
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(1, 0)[0], 255);
        assert_eq!(image.get_pixel(0, 0)[0], 0);
        assert_eq!(image.get_pixel(2, 1)[0], 255);
    }

    #[test]
    fn missing_directory_is_invalid_path() {
        match get_image_files_in_dir("/definitely/not/here") {
            Err(ScanRegionError::InvalidPath(_)) => {}
            other => panic!("expected InvalidPath, got {:?}", other.map(|v| v.len())),
        }
    }
}
