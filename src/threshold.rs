use image::GrayImage;

/// Binary foreground/background mask with the same dimensions as the image
/// it was derived from. Stored as a flat row-major vector.
#[derive(Debug, Clone)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<bool>,
}

impl Mask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![false; (width as usize) * (height as usize)],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.data[(y as usize) * (self.width as usize) + x as usize]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        self.data[(y as usize) * (self.width as usize) + x as usize] = value;
    }

    /// Number of foreground cells
    pub fn foreground_count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }
}

/// Produce the binary mask: a cell is foreground iff its intensity is
/// strictly greater than the cutoff. The strict `>` is load-bearing for
/// bit-reproducible behavior; a pixel exactly at the cutoff is background.
pub fn threshold_mask(image: &GrayImage, cutoff: u8) -> Mask {
    let (width, height) = image.dimensions();
    let mut mask = Mask::new(width, height);

    for y in 0..height {
        for x in 0..width {
            if image.get_pixel(x, y)[0] > cutoff {
                mask.set(x, y, true);
            }
        }
    }

    mask
}
