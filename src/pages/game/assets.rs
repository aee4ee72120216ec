use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use image::{Rgba, RgbaImage};
use tracing::info;

use crate::{
    config::GameConfig,
    constants::game,
    pages::game::{
        font::ScoreFont,
        mask::Mask,
        sprite::{Drawable, MaskSource, Sprite},
    },
};

/// The three wing positions of the bird.
#[derive(Debug, Clone)]
pub struct BirdFrames(pub [Sprite; 3]);

impl BirdFrames {
    pub fn get(&self, index: usize) -> &Sprite {
        &self.0[index % self.0.len()]
    }
}

/// Pipe art, kept once in both orientations.
#[derive(Debug, Clone)]
pub struct PipeSprites {
    pub top: Sprite,
    pub base: Sprite,
}

impl PipeSprites {
    pub fn new(base: Sprite) -> Self {
        PipeSprites { top: base.flip_vertical(), base }
    }

    pub fn size(&self) -> (u32, u32) {
        self.base.size()
    }

    pub fn top_mask(&self) -> &Mask {
        self.top.mask()
    }

    pub fn base_mask(&self) -> &Mask {
        self.base.mask()
    }
}

/// Every image the game draws. Owned by the game loop for its whole lifetime.
#[derive(Debug, Clone)]
pub struct AssetBundle {
    pub background: Sprite,
    pub floor: Sprite,
    pub pipe: PipeSprites,
    pub birds: BirdFrames,
    pub font: ScoreFont,
}

impl AssetBundle {
    pub fn from_config(config: &GameConfig) -> Result<Self> {
        match &config.assets_dir {
            Some(dir) => {
                info!("Loading assets from {}", dir.display());
                Self::load(dir)
            },
            None => {
                info!("No assets directory configured, using builtin art");
                Ok(Self::builtin())
            },
        }
    }

    /// Decodes the classic art from `dir`, scaled 2x.
    pub fn load(dir: &Path) -> Result<Self> {
        let background = load_sprite(dir, game::BACKGROUND_FILE)?;
        let floor = load_sprite(dir, game::FLOOR_FILE)?;
        let pipe = load_sprite(dir, game::PIPE_FILE)?;
        let birds = [
            load_sprite(dir, game::BIRD_FILES[0])?,
            load_sprite(dir, game::BIRD_FILES[1])?,
            load_sprite(dir, game::BIRD_FILES[2])?,
        ];

        Ok(AssetBundle {
            background,
            floor,
            pipe: PipeSprites::new(pipe),
            birds: BirdFrames(birds),
            font: ScoreFont::new(game::SCORE_TEXT_SCALE),
        })
    }

    /// Procedurally painted art with the same dimensions as the classic set.
    pub fn builtin() -> Self {
        AssetBundle {
            background: Sprite::new(paint_background()),
            floor: Sprite::new(paint_floor()),
            pipe: PipeSprites::new(Sprite::new(paint_pipe())),
            birds: BirdFrames([
                Sprite::new(paint_bird(WingPosition::Up)),
                Sprite::new(paint_bird(WingPosition::Middle)),
                Sprite::new(paint_bird(WingPosition::Down)),
            ]),
            font: ScoreFont::new(game::SCORE_TEXT_SCALE),
        }
    }
}

fn load_sprite(dir: &Path, file: &str) -> Result<Sprite> {
    let path = dir.join(file);
    let image = image::open(&path).wrap_err_with(|| format!("failed to load asset {}", path.display()))?;
    Ok(Sprite::new(image.to_rgba8()).scale2x())
}

const SKY: Rgba<u8> = Rgba([78, 192, 202, 255]);
const CLOUD: Rgba<u8> = Rgba([233, 252, 217, 255]);
const CITY: Rgba<u8> = Rgba([115, 190, 120, 255]);
const GRASS: Rgba<u8> = Rgba([115, 191, 46, 255]);
const GRASS_DARK: Rgba<u8> = Rgba([85, 128, 34, 255]);
const DIRT: Rgba<u8> = Rgba([222, 216, 149, 255]);
const PIPE_GREEN: Rgba<u8> = Rgba([116, 191, 46, 255]);
const PIPE_SHADE: Rgba<u8> = Rgba([84, 56, 71, 255]);
const BIRD_YELLOW: Rgba<u8> = Rgba([250, 200, 40, 255]);
const BIRD_ORANGE: Rgba<u8> = Rgba([240, 120, 30, 255]);
const BIRD_WING: Rgba<u8> = Rgba([255, 240, 200, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

fn paint_background() -> RgbaImage {
    let (width, height) = game::BACKGROUND_SIZE;
    RgbaImage::from_fn(width, height, |x, y| {
        let clouds = (760.0 + (x as f64 / 40.0).sin() * 18.0) as u32;
        let city = (840.0 + (x as f64 / 23.0).sin().abs() * 40.0) as u32;
        if y >= city {
            CITY
        } else if y >= clouds {
            CLOUD
        } else {
            SKY
        }
    })
}

fn paint_floor() -> RgbaImage {
    let (width, height) = game::FLOOR_SIZE;
    RgbaImage::from_fn(width, height, |x, y| match y {
        0..=3 => GRASS_DARK,
        4..=19 if (x + y) % 24 < 12 => GRASS,
        4..=19 => GRASS_DARK,
        20..=23 => GRASS_DARK,
        _ => DIRT,
    })
}

fn paint_pipe() -> RgbaImage {
    let (width, height) = game::PIPE_SIZE;
    let lip = 48;
    let inset = 4;
    RgbaImage::from_fn(width, height, |x, y| {
        let body = x >= inset && x < width - inset;
        if y < lip {
            if x < 2 || x >= width - 2 || y < 2 || y >= lip - 2 {
                PIPE_SHADE
            } else {
                PIPE_GREEN
            }
        } else if body {
            if x < inset + 2 || x >= width - inset - 2 {
                PIPE_SHADE
            } else {
                PIPE_GREEN
            }
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

#[derive(Debug, Clone, Copy)]
enum WingPosition {
    Up,
    Middle,
    Down,
}

fn paint_bird(wing: WingPosition) -> RgbaImage {
    let (width, height) = game::BIRD_SIZE;
    let (cx, cy) = (width as f64 / 2.0 - 2.0, height as f64 / 2.0);
    let (rx, ry) = (28.0, 20.0);
    let wing_y = match wing {
        WingPosition::Up => cy - 8.0,
        WingPosition::Middle => cy,
        WingPosition::Down => cy + 8.0,
    };

    RgbaImage::from_fn(width, height, |x, y| {
        let (px, py) = (x as f64 + 0.5, y as f64 + 0.5);
        let body = ((px - cx) / rx).powi(2) + ((py - cy) / ry).powi(2);
        let eye = (px - (cx + 14.0)).powi(2) + (py - (cy - 8.0)).powi(2);
        let pupil = (px - (cx + 17.0)).powi(2) + (py - (cy - 8.0)).powi(2);
        let wing = ((px - (cx - 14.0)) / 12.0).powi(2) + ((py - wing_y) / 6.0).powi(2);
        let beak = px >= cx + 20.0 && px < width as f64 && (py - (cy + 4.0)).abs() < 5.0;

        if pupil <= 6.0 {
            BLACK
        } else if eye <= 40.0 {
            WHITE
        } else if wing <= 1.0 {
            BIRD_WING
        } else if beak {
            BIRD_ORANGE
        } else if body <= 1.0 {
            BIRD_YELLOW
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}
