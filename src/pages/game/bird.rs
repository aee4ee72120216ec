use image::RgbaImage;

use crate::{
    constants::game,
    pages::game::{
        assets::BirdFrames,
        mask::Mask,
        sprite::{Drawable, MaskSource},
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    x: i32,
    y: f64,
    velocity: f64,
    /// Ticks since the last jump.
    time: u32,
    /// Height at the last jump.
    height: f64,
    angle: i32,
    image_count: u32,
    frame: usize,
}

impl Bird {
    pub fn new(x: i32, y: f64) -> Self {
        Bird { x, y, velocity: 0.0, time: 0, height: y, angle: 0, image_count: 0, frame: 0 }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    #[cfg(test)]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    #[cfg(test)]
    pub fn time(&self) -> u32 {
        self.time
    }

    #[cfg(test)]
    pub fn angle(&self) -> i32 {
        self.angle
    }

    #[cfg(test)]
    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn jump(&mut self) {
        self.velocity = game::JUMP_VELOCITY;
        self.time = 0;
        self.height = self.y;
    }

    /// Advances one tick along the jump parabola and returns the applied
    /// displacement.
    pub fn advance(&mut self) -> f64 {
        self.time += 1;
        let t = self.time as f64;
        let mut displacement = game::GRAVITY * t * t + self.velocity * t;

        if displacement > game::MAX_DISPLACEMENT {
            displacement = game::MAX_DISPLACEMENT;
        } else if displacement < 0.0 {
            displacement -= game::UPWARD_BIAS;
        }

        self.y += displacement;

        if displacement < 0.0 || self.y < self.height + game::JUMP_CLEARANCE {
            if self.angle < game::MAX_ROTATION {
                self.angle = game::MAX_ROTATION;
            }
        } else if self.angle > game::MIN_ROTATION {
            // Checked before stepping, so a dive can end at -95.
            self.angle -= game::ROTATION_SPEED;
        }

        displacement
    }

    /// Steps the wing animation and draws the current frame, tilted, centred on
    /// where the upright frame would sit.
    pub fn draw(&mut self, surface: &mut RgbaImage, frames: &BirdFrames) {
        self.animate();

        let image = frames.get(self.frame);
        let rotated = image.rotate(self.angle as f64);

        let (width, height) = image.size();
        let center_x = self.x as i64 + (width / 2) as i64;
        let center_y = self.y as i64 + (height / 2) as i64;
        let (rotated_width, rotated_height) = rotated.size();

        rotated.blit(surface, center_x - (rotated_width / 2) as i64, center_y - (rotated_height / 2) as i64);
    }

    fn animate(&mut self) {
        let step = game::ANIMATION_TIME;
        self.image_count += 1;

        if self.image_count < step {
            self.frame = 0;
        } else if self.image_count < step * 2 {
            self.frame = 1;
        } else if self.image_count < step * 3 {
            self.frame = 2;
        } else if self.image_count < step * 4 {
            self.frame = 1;
        } else if self.image_count > step * 4 {
            self.frame = 0;
            self.image_count = 0;
        }

        // Wings folded while diving.
        if self.angle <= game::DIVE_ROTATION {
            self.frame = 1;
            self.image_count = step * 2;
        }
    }

    pub fn get_mask<'a>(&self, frames: &'a BirdFrames) -> &'a Mask {
        frames.get(self.frame).mask()
    }

    pub fn frame_height(&self, frames: &BirdFrames) -> u32 {
        frames.get(self.frame).height()
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::pages::game::assets::AssetBundle;

    fn bird() -> Bird {
        Bird::new(game::BIRD_INITIAL_X, game::BIRD_INITIAL_Y)
    }

    #[test]
    fn test_jump_resets_time_and_velocity() {
        let mut bird = bird();
        for _ in 0..7 {
            bird.advance();
        }
        bird.jump();

        assert_eq!(bird.time(), 0);
        assert_eq!(bird.velocity(), game::JUMP_VELOCITY);

        bird.advance();
        bird.advance();
        bird.jump();
        assert_eq!(bird.time(), 0);
        assert_eq!(bird.velocity(), game::JUMP_VELOCITY);
        assert_eq!(bird.height, bird.y());
    }

    #[test]
    fn test_free_fall_is_clamped() {
        let mut bird = bird();
        let steps: Vec<f64> = (0..6).map(|_| bird.advance()).collect();

        assert_eq!(steps, vec![1.5, 6.0, 13.5, 16.0, 16.0, 16.0]);
        assert_eq!(bird.y(), game::BIRD_INITIAL_Y + 69.0);
    }

    #[test]
    fn test_jump_rises_with_bias() {
        let mut bird = bird();
        bird.jump();

        let steps: Vec<f64> = (0..8).map(|_| bird.advance()).collect();

        assert_eq!(steps, vec![-11.0, -17.0, -20.0, -20.0, -17.0, -11.0, 0.0, 12.0]);
    }

    #[test]
    fn test_displacement_never_exceeds_cap() {
        let mut bird = bird();
        bird.jump();
        for _ in 0..200 {
            assert!(bird.advance() <= game::MAX_DISPLACEMENT);
        }
    }

    #[test]
    fn test_angle_pinned_while_jumping_often() {
        let mut bird = bird();
        bird.jump();
        for tick in 1..=130 {
            bird.advance();
            assert_eq!(bird.angle(), game::MAX_ROTATION);
            assert!(bird.y() > 0.0 && bird.y() < game::FLOOR_Y as f64);
            if tick % 13 == 0 {
                bird.jump();
            }
        }
    }

    #[test]
    fn test_angle_dives_after_clearance() {
        let mut bird = bird();
        bird.jump();
        let angles: Vec<i32> = (0..24)
            .map(|_| {
                bird.advance();
                bird.angle()
            })
            .collect();

        // Pinned through the rise and the first 50px of fall, then stepping down
        // until the guard stops it one step past -90.
        assert!(angles[..16].iter().all(|a| *a == game::MAX_ROTATION));
        assert_eq!(&angles[16..], &[5, -15, -35, -55, -75, -95, -95, -95]);
    }

    #[test]
    fn test_animation_cycle() {
        let assets = AssetBundle::builtin();
        let mut surface = RgbaImage::new(game::SCREEN_WIDTH, game::SCREEN_HEIGHT);
        let mut bird = bird();

        let frames: Vec<usize> = (0..22)
            .map(|_| {
                bird.draw(&mut surface, &assets.birds);
                bird.frame()
            })
            .collect();

        #[rustfmt::skip]
        let expected = vec![
            0, 0, 0, 0,
            1, 1, 1, 1, 1,
            2, 2, 2, 2, 2,
            1, 1, 1, 1, 1,
            1,
            0,
            0,
        ];
        assert_eq!(frames, expected);
    }

    #[test]
    fn test_diving_folds_wings() {
        let assets = AssetBundle::builtin();
        let mut surface = RgbaImage::new(game::SCREEN_WIDTH, game::SCREEN_HEIGHT);
        let mut bird = bird();
        bird.angle = game::DIVE_ROTATION;

        bird.draw(&mut surface, &assets.birds);
        assert_eq!(bird.frame(), 1);
        assert_eq!(bird.image_count, game::ANIMATION_TIME * 2);
    }

    #[test]
    fn test_draw_keeps_centre_under_rotation() {
        let assets = AssetBundle::builtin();
        let background = Rgba([1, 2, 3, 255]);
        let mut surface = RgbaImage::from_pixel(game::SCREEN_WIDTH, game::SCREEN_HEIGHT, background);
        let mut bird = bird();
        bird.angle = game::MAX_ROTATION;

        bird.draw(&mut surface, &assets.birds);

        let (width, height) = game::BIRD_SIZE;
        let centre = surface.get_pixel(bird.x() as u32 + width / 2, bird.y() as u32 + height / 2);
        assert_ne!(*centre, background);
        // Nothing lands far outside the upright footprint.
        assert_eq!(*surface.get_pixel(bird.x() as u32 - 20, bird.y() as u32 - 20), background);
    }

    #[test]
    fn test_mask_follows_frame() {
        let assets = AssetBundle::builtin();
        let mut bird = bird();
        assert_eq!(bird.get_mask(&assets.birds), assets.birds.get(0).mask());

        bird.frame = 2;
        assert_eq!(bird.get_mask(&assets.birds), assets.birds.get(2).mask());
        assert_eq!(bird.frame_height(&assets.birds), game::BIRD_SIZE.1);
    }
}
