use image::Rgba;

// Surface
pub const SCREEN_WIDTH: u32 = 500;
pub const SCREEN_HEIGHT: u32 = 800;
pub const TICK_RATE: f64 = 30.0;
pub const MAX_TICK_RATE: f64 = 1000.0;

// Layout
pub const FLOOR_Y: i32 = 730;
pub const BIRD_INITIAL_X: i32 = 230;
pub const BIRD_INITIAL_Y: f64 = 350.0;
pub const FIRST_PIPE_X: i32 = 700;
pub const NEXT_PIPE_X: i32 = 600;

// Bird physics
pub const JUMP_VELOCITY: f64 = -10.5;
pub const GRAVITY: f64 = 1.5;
pub const MAX_DISPLACEMENT: f64 = 16.0;
pub const UPWARD_BIAS: f64 = 2.0;
pub const JUMP_CLEARANCE: f64 = 50.0;

// Bird tilt, in degrees
pub const MAX_ROTATION: i32 = 25;
pub const ROTATION_SPEED: i32 = 20;
pub const MIN_ROTATION: i32 = -90;
pub const DIVE_ROTATION: i32 = -80;

// Bird animation, in ticks per frame
pub const ANIMATION_TIME: u32 = 5;

// Pipes
pub const PIPE_GAP: i32 = 200;
pub const PIPE_SPEED: i32 = 5;
pub const PIPE_GAP_SEED_MIN: i32 = 50;
pub const PIPE_GAP_SEED_MAX: i32 = 450;

// Floor
pub const FLOOR_SPEED: i32 = 5;

// Score text
pub const SCORE_MARGIN: i64 = 10;
pub const SCORE_TEXT_SCALE: u32 = 2;
pub const SCORE_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

// Asset files, relative to the configured assets directory
pub const BACKGROUND_FILE: &str = "bg.png";
pub const FLOOR_FILE: &str = "base.png";
pub const PIPE_FILE: &str = "pipe.png";
pub const BIRD_FILES: [&str; 3] = ["bird1.png", "bird2.png", "bird3.png"];

// Builtin art sizes, already scaled 2x
pub const BIRD_SIZE: (u32, u32) = (68, 48);
pub const PIPE_SIZE: (u32, u32) = (104, 640);
pub const FLOOR_SIZE: (u32, u32) = (672, 224);
pub const BACKGROUND_SIZE: (u32, u32) = (576, 1024);
