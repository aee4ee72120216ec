use image::RgbaImage;

use crate::{
    constants::game,
    pages::game::sprite::{Drawable, Sprite},
};

/// Ground strip made of two tiles leapfrogging each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Floor {
    y: i32,
    x1: i32,
    x2: i32,
    width: i32,
}

impl Floor {
    pub fn new(y: i32, tile: &Sprite) -> Self {
        let width = tile.width() as i32;
        Floor { y, x1: 0, x2: width, width }
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    #[cfg(test)]
    pub fn offsets(&self) -> (i32, i32) {
        (self.x1, self.x2)
    }

    pub fn scroll(&mut self) {
        self.x1 -= game::FLOOR_SPEED;
        self.x2 -= game::FLOOR_SPEED;

        if self.x1 + self.width < 0 {
            self.x1 = self.x2 + self.width;
        }
        if self.x2 + self.width < 0 {
            self.x2 = self.x1 + self.width;
        }
    }

    pub fn draw(&self, surface: &mut RgbaImage, tile: &Sprite) {
        tile.blit(surface, self.x1 as i64, self.y as i64);
        tile.blit(surface, self.x2 as i64, self.y as i64);
    }
}
