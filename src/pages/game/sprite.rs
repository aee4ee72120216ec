use image::{imageops, Rgba, RgbaImage};

use crate::pages::game::mask::Mask;

/// Something that can be composited onto the game surface.
pub trait Drawable: Sized {
    fn size(&self) -> (u32, u32);

    fn blit(&self, surface: &mut RgbaImage, x: i64, y: i64);

    fn flip_vertical(&self) -> Self;

    /// Rotates counter-clockwise by `angle` degrees. The result grows to hold
    /// the whole rotated image.
    fn rotate(&self, angle: f64) -> Self;

    fn width(&self) -> u32 {
        self.size().0
    }

    fn height(&self) -> u32 {
        self.size().1
    }
}

/// Something that exposes a per-pixel opacity mask.
pub trait MaskSource {
    fn mask(&self) -> &Mask;
}

#[derive(Debug, Clone)]
pub struct Sprite {
    image: RgbaImage,
    mask: Mask,
}

impl Sprite {
    pub fn new(image: RgbaImage) -> Self {
        let mask = Mask::from_image(&image);
        Sprite { image, mask }
    }

    #[cfg(test)]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn scale2x(&self) -> Self {
        let (width, height) = self.image.dimensions();
        Sprite::new(imageops::resize(&self.image, width * 2, height * 2, imageops::FilterType::Nearest))
    }
}

impl Drawable for Sprite {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn blit(&self, surface: &mut RgbaImage, x: i64, y: i64) {
        imageops::overlay(surface, &self.image, x, y);
    }

    fn flip_vertical(&self) -> Self {
        Sprite::new(imageops::flip_vertical(&self.image))
    }

    fn rotate(&self, angle: f64) -> Self {
        if angle.rem_euclid(360.0) == 0.0 {
            return self.clone();
        }
        Sprite::new(rotate_about_center(&self.image, angle))
    }
}

impl MaskSource for Sprite {
    fn mask(&self) -> &Mask {
        &self.mask
    }
}

fn rotate_about_center(image: &RgbaImage, angle: f64) -> RgbaImage {
    let (width, height) = image.dimensions();
    let (sin, cos) = angle.to_radians().sin_cos();

    // Trim float noise so quarter turns keep exact bounds.
    let rotated_width = (width as f64 * cos.abs() + height as f64 * sin.abs() - 1e-6).ceil() as u32;
    let rotated_height = (width as f64 * sin.abs() + height as f64 * cos.abs() - 1e-6).ceil() as u32;
    let mut rotated = RgbaImage::from_pixel(rotated_width, rotated_height, Rgba([0, 0, 0, 0]));

    let (cx, cy) = (width as f64 / 2.0, height as f64 / 2.0);
    let (rcx, rcy) = (rotated_width as f64 / 2.0, rotated_height as f64 / 2.0);

    for (x, y, pixel) in rotated.enumerate_pixels_mut() {
        // Sample at pixel centres, mapping back into the source image.
        let dx = x as f64 + 0.5 - rcx;
        let dy = y as f64 + 0.5 - rcy;
        let sx = dx * cos - dy * sin + cx;
        let sy = dx * sin + dy * cos + cy;
        if sx >= 0.0 && sy >= 0.0 && sx < width as f64 && sy < height as f64 {
            *pixel = *image.get_pixel(sx as u32, sy as u32);
        }
    }

    rotated
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn two_tone(width: u32, height: u32) -> Sprite {
        // Top half red, bottom half blue.
        Sprite::new(RgbaImage::from_fn(width, height, |_, y| if y < height / 2 { RED } else { BLUE }))
    }

    #[test]
    fn test_flip_vertical_swaps_rows() {
        let flipped = two_tone(4, 4).flip_vertical();

        assert_eq!(flipped.size(), (4, 4));
        assert_eq!(*flipped.image().get_pixel(0, 0), BLUE);
        assert_eq!(*flipped.image().get_pixel(0, 3), RED);
    }

    #[test]
    fn test_rotate_zero_is_identity() {
        let sprite = two_tone(6, 2);
        let rotated = sprite.rotate(0.0);

        assert_eq!(rotated.image(), sprite.image());
        assert_eq!(rotated.mask(), sprite.mask());
    }

    #[test]
    fn test_rotate_quarter_turn_is_counter_clockwise() {
        // A 4x2 strip: left half red, right half blue.
        let sprite = Sprite::new(RgbaImage::from_fn(4, 2, |x, _| if x < 2 { RED } else { BLUE }));
        let rotated = sprite.rotate(90.0);

        assert_eq!(rotated.size(), (2, 4));
        // Counter-clockwise on screen moves the right side to the top.
        assert_eq!(*rotated.image().get_pixel(0, 0), BLUE);
        assert_eq!(*rotated.image().get_pixel(1, 3), RED);
        assert_eq!(rotated.mask().count(), 8);
    }

    #[test]
    fn test_rotate_grows_bounds() {
        let rotated = two_tone(10, 10).rotate(45.0);
        let (width, height) = rotated.size();

        assert!(width > 10 && width <= 15);
        assert_eq!(width, height);
    }

    #[test]
    fn test_blit_is_clipped_and_composited() {
        let mut surface = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let mut image = RgbaImage::from_pixel(2, 2, RED);
        image.put_pixel(1, 1, Rgba([0, 0, 0, 0]));

        Sprite::new(image).blit(&mut surface, -1, 3);

        assert_eq!(*surface.get_pixel(0, 3), RED);
        assert_eq!(*surface.get_pixel(1, 3), Rgba([0, 0, 0, 255]));
        assert_eq!(*surface.get_pixel(0, 2), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_scale2x_doubles_size() {
        let scaled = two_tone(3, 2).scale2x();

        assert_eq!(scaled.size(), (6, 4));
        assert_eq!(scaled.mask().count(), 24);
    }
}
