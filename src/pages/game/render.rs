use image::RgbaImage;

use crate::{
    constants::game,
    pages::game::{assets::AssetBundle, bird::Bird, floor::Floor, pipe::Pipe, sprite::Drawable},
};

/// Composites one frame: background, birds, pipes, score, then the floor on
/// top of everything.
pub fn draw_screen(
    surface: &mut RgbaImage,
    assets: &AssetBundle,
    birds: &mut [Bird],
    pipes: &[Pipe],
    floor: &Floor,
    score: u32,
) {
    assets.background.blit(surface, 0, 0);

    for bird in birds.iter_mut() {
        bird.draw(surface, &assets.birds);
    }

    for pipe in pipes {
        pipe.draw(surface, &assets.pipe);
    }

    let text = assets.font.render(&format!("SCORE: {score}"), game::SCORE_COLOR);
    let x = surface.width() as i64 - game::SCORE_MARGIN - text.width() as i64;
    text.blit(surface, x, game::SCORE_MARGIN);

    floor.draw(surface, &assets.floor);
}
