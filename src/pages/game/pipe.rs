use image::RgbaImage;
use rand::Rng;

use crate::{
    constants::game,
    pages::game::{
        assets::{BirdFrames, PipeSprites},
        bird::Bird,
        sprite::Drawable,
    },
};

/// A top/bottom pipe pair sharing one gap.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    x: i32,
    /// Bottom edge of the top pipe.
    gap_seed: i32,
    top_pos: i32,
    base_pos: i32,
    width: i32,
    passed: bool,
}

impl Pipe {
    pub fn new<R: Rng>(x: i32, sprites: &PipeSprites, rng: &mut R) -> Self {
        let mut pipe = Pipe::unplaced(x, sprites);
        pipe.set_height(sprites, rng);
        pipe
    }

    /// A pipe with a known gap, for scripted layouts.
    #[cfg(test)]
    pub fn with_gap(x: i32, gap_seed: i32, sprites: &PipeSprites) -> Self {
        let mut pipe = Pipe::unplaced(x, sprites);
        pipe.place(gap_seed, sprites);
        pipe
    }

    fn unplaced(x: i32, sprites: &PipeSprites) -> Self {
        Pipe { x, gap_seed: 0, top_pos: 0, base_pos: 0, width: sprites.size().0 as i32, passed: false }
    }

    fn set_height<R: Rng>(&mut self, sprites: &PipeSprites, rng: &mut R) {
        let gap_seed = rng.gen_range(game::PIPE_GAP_SEED_MIN..game::PIPE_GAP_SEED_MAX);
        self.place(gap_seed, sprites);
    }

    fn place(&mut self, gap_seed: i32, sprites: &PipeSprites) {
        self.gap_seed = gap_seed;
        self.top_pos = gap_seed - sprites.top.height() as i32;
        self.base_pos = gap_seed + game::PIPE_GAP;
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    #[cfg(test)]
    pub fn gap_seed(&self) -> i32 {
        self.gap_seed
    }

    #[cfg(test)]
    pub fn top_pos(&self) -> i32 {
        self.top_pos
    }

    #[cfg(test)]
    pub fn base_pos(&self) -> i32 {
        self.base_pos
    }

    #[cfg(test)]
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Marks the pipe as passed. Returns true only the first time.
    pub fn mark_passed(&mut self) -> bool {
        !std::mem::replace(&mut self.passed, true)
    }

    pub fn move_left(&mut self) {
        self.x -= game::PIPE_SPEED;
    }

    pub fn is_offscreen(&self) -> bool {
        self.x + self.width < 0
    }

    pub fn draw(&self, surface: &mut RgbaImage, sprites: &PipeSprites) {
        sprites.top.blit(surface, self.x as i64, self.top_pos as i64);
        sprites.base.blit(surface, self.x as i64, self.base_pos as i64);
    }

    pub fn collide(&self, bird: &Bird, frames: &BirdFrames, sprites: &PipeSprites) -> bool {
        let bird_mask = bird.get_mask(frames);
        let bird_y = bird.y().round_ties_even() as i32;

        let top_offset = (self.x - bird.x(), self.top_pos - bird_y);
        let base_offset = (self.x - bird.x(), self.base_pos - bird_y);

        bird_mask.overlap(sprites.top_mask(), top_offset).is_some()
            || bird_mask.overlap(sprites.base_mask(), base_offset).is_some()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::pages::game::{assets::AssetBundle, sprite::MaskSource};

    #[test]
    fn test_set_height_places_both_pipes() {
        let assets = AssetBundle::builtin();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let pipe = Pipe::new(game::FIRST_PIPE_X, &assets.pipe, &mut rng);
            let seed = pipe.gap_seed();

            assert!((game::PIPE_GAP_SEED_MIN..game::PIPE_GAP_SEED_MAX).contains(&seed));
            assert_eq!(pipe.top_pos() + game::PIPE_SIZE.1 as i32, seed);
            assert_eq!(pipe.base_pos(), seed + game::PIPE_GAP);
            assert!(!pipe.passed());
        }
    }

    #[test]
    fn test_gap_is_fixed_while_moving() {
        let assets = AssetBundle::builtin();
        let mut pipe = Pipe::new(game::FIRST_PIPE_X, &assets.pipe, &mut StdRng::seed_from_u64(1));
        let (seed, top, base) = (pipe.gap_seed(), pipe.top_pos(), pipe.base_pos());

        for step in 1..=300 {
            pipe.move_left();
            assert_eq!(pipe.x(), game::FIRST_PIPE_X - step * game::PIPE_SPEED);
            assert_eq!((pipe.gap_seed(), pipe.top_pos(), pipe.base_pos()), (seed, top, base));
        }
    }

    #[test]
    fn test_mark_passed_once() {
        let assets = AssetBundle::builtin();
        let mut pipe = Pipe::with_gap(100, 300, &assets.pipe);

        assert!(pipe.mark_passed());
        assert!(!pipe.mark_passed());
        assert!(pipe.passed());
    }

    #[test]
    fn test_offscreen_after_right_edge_leaves() {
        let assets = AssetBundle::builtin();
        let width = game::PIPE_SIZE.0 as i32;
        let mut pipe = Pipe::with_gap(-width + 4, 300, &assets.pipe);

        assert!(!pipe.is_offscreen());
        pipe.move_left();
        assert!(pipe.is_offscreen());
    }

    #[test]
    fn test_collide_with_top_and_base() {
        let assets = AssetBundle::builtin();
        let pipe = Pipe::with_gap(200, 300, &assets.pipe);

        // Inside the gap: rows 300..500.
        assert!(!pipe.collide(&Bird::new(230, 380.0), &assets.birds, &assets.pipe));
        // Deep in the top pipe.
        assert!(pipe.collide(&Bird::new(230, 200.0), &assets.birds, &assets.pipe));
        // Deep in the bottom pipe.
        assert!(pipe.collide(&Bird::new(230, 600.0), &assets.birds, &assets.pipe));
        // Level with the top pipe but well past it horizontally.
        assert!(!pipe.collide(&Bird::new(400, 200.0), &assets.birds, &assets.pipe));
    }

    #[test]
    fn test_collide_rounds_half_to_even() {
        let assets = AssetBundle::builtin();
        let (bird_width, bird_height) = game::BIRD_SIZE;
        let mask = assets.birds.get(0).mask();
        let bottom_row =
            (0..bird_height).rev().find(|y| (0..bird_width).any(|x| mask.get(x, *y))).expect("bird has ink") as i32;

        let pipe = Pipe::with_gap(200, 300, &assets.pipe);
        // At this rounded y the lowest solid row sits on the base pipe's lip.
        let touching = pipe.base_pos() - bottom_row;
        let collides_at = |y: f64| pipe.collide(&Bird::new(230, y), &assets.birds, &assets.pipe);

        assert!(!collides_at((touching - 1) as f64 + 0.4));
        assert!(collides_at(touching as f64));
        // Ties go to the even neighbour.
        let tie = (touching - 1) as f64 + 0.5;
        assert_eq!(collides_at(tie), (touching - 1) % 2 != 0);
    }

    #[test]
    fn test_draw_blits_both_halves() {
        let assets = AssetBundle::builtin();
        let mut surface = RgbaImage::new(game::SCREEN_WIDTH, game::SCREEN_HEIGHT);
        let pipe = Pipe::with_gap(200, 300, &assets.pipe);

        pipe.draw(&mut surface, &assets.pipe);

        assert_eq!(surface.get_pixel(252, 100)[3], 255);
        assert_eq!(surface.get_pixel(252, 400)[3], 0);
        assert_eq!(surface.get_pixel(252, 700)[3], 255);
    }
}
