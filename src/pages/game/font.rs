use std::convert::Infallible;

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    mono_font::{iso_8859_1::FONT_10X20, MonoFont, MonoTextStyle},
    pixelcolor::BinaryColor,
    text::{renderer::TextRenderer, Baseline, Text},
    Drawable as _, Pixel,
};
use image::{Rgba, RgbaImage};

use crate::pages::game::sprite::Sprite;

/// `DrawTarget` over an RGBA image. Every font pixel becomes a
/// `scale`x`scale` block of `color`.
struct Ink<'a> {
    image: &'a mut RgbaImage,
    color: Rgba<u8>,
    scale: u32,
}

impl DrawTarget for Ink<'_> {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if color.is_off() || x < 0 || y < 0 {
                continue;
            }
            let (x, y) = (x as u32 * self.scale, y as u32 * self.scale);
            for dy in 0..self.scale {
                for dx in 0..self.scale {
                    if x + dx < self.image.width() && y + dy < self.image.height() {
                        self.image.put_pixel(x + dx, y + dy, self.color);
                    }
                }
            }
        }
        Ok(())
    }
}

impl OriginDimensions for Ink<'_> {
    fn size(&self) -> Size {
        Size::new(self.image.width() / self.scale, self.image.height() / self.scale)
    }
}

/// Monospace font used for the score line.
#[derive(Clone)]
pub struct ScoreFont {
    font: &'static MonoFont<'static>,
    scale: u32,
}

impl std::fmt::Debug for ScoreFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreFont").field("character_size", &self.font.character_size).field("scale", &self.scale).finish()
    }
}

impl ScoreFont {
    pub fn new(scale: u32) -> Self {
        ScoreFont { font: &FONT_10X20, scale: scale.max(1) }
    }

    fn style(&self) -> MonoTextStyle<'static, BinaryColor> {
        MonoTextStyle::new(self.font, BinaryColor::On)
    }

    /// Width in pixels of `text` once rendered.
    pub fn measure(&self, text: &str) -> u32 {
        self.style().measure_string(text, Point::zero(), Baseline::Top).bounding_box.size.width * self.scale
    }

    pub fn line_height(&self) -> u32 {
        self.font.character_size.height * self.scale
    }

    /// Renders `text` on a transparent sprite.
    pub fn render(&self, text: &str, color: Rgba<u8>) -> Sprite {
        let mut image = RgbaImage::new(self.measure(text).max(1), self.line_height());
        let mut ink = Ink { image: &mut image, color, scale: self.scale };

        if let Err(never) = Text::with_baseline(text, Point::zero(), self.style(), Baseline::Top).draw(&mut ink) {
            match never {}
        }

        Sprite::new(image)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::pages::game::sprite::{Drawable, MaskSource};

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    #[test]
    fn test_measure() {
        let font = ScoreFont::new(2);
        assert_eq!(font.measure(""), 0);
        assert_eq!(font.measure("1"), 20);
        assert_eq!(font.measure("12"), 40);
        assert_eq!(font.line_height(), 40);
    }

    #[test]
    fn test_render_size_and_ink() {
        let font = ScoreFont::new(3);
        let sprite = font.render("SCORE: 10", WHITE);

        assert_eq!(sprite.size(), (font.measure("SCORE: 10"), 60));
        assert!(sprite.mask().count() > 0);
    }

    #[test]
    fn test_scale_multiplies_ink() {
        let single = ScoreFont::new(1).render("8", WHITE);
        let double = ScoreFont::new(2).render("8", WHITE);

        assert_eq!(single.size(), (10, 20));
        assert_eq!(double.size(), (20, 40));
        assert_eq!(double.mask().count(), 4 * single.mask().count());
        assert!(single.mask().count() > 0);
    }

    #[test]
    fn test_ink_uses_color_on_transparent_sprite() {
        let red = Rgba([200, 10, 10, 255]);
        let sprite = ScoreFont::new(1).render("0", red);

        assert!(sprite.image().pixels().all(|pixel| *pixel == red || pixel[3] == 0));
    }

    #[test]
    fn test_spaces_are_blank() {
        let sprite = ScoreFont::new(1).render("   ", WHITE);
        assert_eq!(sprite.size(), (30, 20));
        assert_eq!(sprite.mask().count(), 0);
    }
}
