use std::fmt;

use image::RgbaImage;

/// Alpha values above this count as solid.
pub const ALPHA_THRESHOLD: u8 = 127;

/// Per-pixel opacity bitmap used for collision tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    #[cfg(test)]
    pub fn new(width: u32, height: u32) -> Self {
        Mask { width, height, bits: vec![false; (width * height) as usize] }
    }

    pub fn from_image(image: &RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let bits = image.pixels().map(|pixel| pixel[3] > ALPHA_THRESHOLD).collect();
        Mask { width, height, bits }
    }

    #[cfg(test)]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.bits[(y * self.width + x) as usize]
    }

    #[cfg(test)]
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        if x < self.width && y < self.height {
            self.bits[(y * self.width + x) as usize] = value;
        }
    }

    #[cfg(test)]
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|bit| **bit).count()
    }

    /// Returns the first point, in this mask's coordinates, that is set in both
    /// masks when `other`'s top-left corner sits at `offset`.
    pub fn overlap(&self, other: &Mask, offset: (i32, i32)) -> Option<(u32, u32)> {
        let (dx, dy) = (offset.0 as i64, offset.1 as i64);

        let left = dx.max(0);
        let top = dy.max(0);
        let right = (dx + other.width as i64).min(self.width as i64);
        let bottom = (dy + other.height as i64).min(self.height as i64);
        if left >= right || top >= bottom {
            return None;
        }

        for y in top..bottom {
            for x in left..right {
                if self.get(x as u32, y as u32) && other.get((x - dx) as u32, (y - dy) as u32) {
                    return Some((x as u32, y as u32));
                }
            }
        }
        None
    }
}

impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = (0..self.height)
            .map(|y| (0..self.width).map(|x| if self.get(x, y) { '#' } else { '.' }).collect::<String>())
            .collect::<Vec<_>>();
        write!(f, "{}", rows.join("\n"))
    }
}
