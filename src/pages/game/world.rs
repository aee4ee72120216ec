use derive_builder::Builder;
use image::RgbaImage;
use rand::{rngs::StdRng, SeedableRng};
use strum::Display;
use tracing::{debug, info};

use crate::{
    config::GameConfig,
    constants::game,
    pages::game::{assets::AssetBundle, bird::Bird, floor::Floor, pipe::Pipe, render::draw_screen},
};

/// Input the loop consumes at the start of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InputEvent {
    Jump,
    Quit,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display)]
pub enum LoopState {
    #[default]
    Running,
    Ended,
}

#[derive(Debug, Clone, Builder)]
pub struct GameSettings {
    /// Starting position of every bird.
    #[builder(default = "vec![(game::BIRD_INITIAL_X, game::BIRD_INITIAL_Y)]")]
    pub flock: Vec<(i32, f64)>,
    #[builder(default = "game::FIRST_PIPE_X")]
    pub first_pipe_x: i32,
    #[builder(default = "game::FLOOR_Y")]
    pub floor_y: i32,
    #[builder(default)]
    pub seed: Option<u64>,
    /// End the loop once the last bird is gone instead of scrolling an empty
    /// scene.
    #[builder(default)]
    pub end_when_flock_lost: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettings {
            flock: vec![(game::BIRD_INITIAL_X, game::BIRD_INITIAL_Y)],
            first_pipe_x: game::FIRST_PIPE_X,
            floor_y: game::FLOOR_Y,
            seed: None,
            end_when_flock_lost: false,
        }
    }
}

impl From<&GameConfig> for GameSettings {
    fn from(config: &GameConfig) -> Self {
        let defaults = GameSettings::default();
        GameSettings {
            flock: if config.flock.is_empty() { defaults.flock } else { config.flock.clone() },
            seed: config.seed,
            end_when_flock_lost: config.end_when_flock_lost,
            ..defaults
        }
    }
}

/// What happened during one tick.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// Loop state once the tick is over.
    pub state: LoopState,
    pub scored: bool,
    pub crashed: usize,
    pub out_of_bounds: usize,
    pub removed_pipes: usize,
}

pub struct GameLoop {
    assets: AssetBundle,
    settings: GameSettings,
    rng: StdRng,
    birds: Vec<Bird>,
    pipes: Vec<Pipe>,
    floor: Floor,
    score: u32,
    state: LoopState,
}

impl GameLoop {
    pub fn new(assets: AssetBundle, settings: GameSettings) -> Self {
        let mut rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let birds = settings.flock.iter().map(|(x, y)| Bird::new(*x, *y)).collect();
        let pipes = vec![Pipe::new(settings.first_pipe_x, &assets.pipe, &mut rng)];
        let floor = Floor::new(settings.floor_y, &assets.floor);

        GameLoop { assets, settings, rng, birds, pipes, floor, score: 0, state: LoopState::Running }
    }

    #[cfg(test)]
    pub fn birds(&self) -> &[Bird] {
        &self.birds
    }

    #[cfg(test)]
    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    #[cfg(test)]
    pub fn floor(&self) -> &Floor {
        &self.floor
    }

    #[cfg(test)]
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Runs one tick: input first, then the simulation step. A quit stops the
    /// tick on the spot.
    pub fn tick<I>(&mut self, events: I) -> TickReport
    where
        I: IntoIterator<Item = InputEvent>,
    {
        if self.state == LoopState::Ended {
            return TickReport { state: self.state, ..TickReport::default() };
        }

        for event in events {
            match event {
                InputEvent::Jump => self.birds.iter_mut().for_each(Bird::jump),
                InputEvent::Quit => {
                    info!("Quit requested at score {}", self.score);
                    self.state = LoopState::Ended;
                    return TickReport { state: self.state, ..TickReport::default() };
                },
            }
        }

        let mut report = self.step();
        report.state = self.state;
        if report.scored || report.crashed + report.out_of_bounds + report.removed_pipes > 0 {
            debug!("{report:?}");
        }

        report
    }

    fn step(&mut self) -> TickReport {
        let mut report = TickReport::default();

        for bird in self.birds.iter_mut() {
            bird.advance();
        }
        self.floor.scroll();

        let mut crashed = vec![false; self.birds.len()];
        let mut add_pipe = false;
        for pipe in self.pipes.iter_mut() {
            for (index, bird) in self.birds.iter().enumerate() {
                if crashed[index] {
                    continue;
                }
                if pipe.collide(bird, &self.assets.birds, &self.assets.pipe) {
                    crashed[index] = true;
                }
                if bird.x() > pipe.x() && pipe.mark_passed() {
                    add_pipe = true;
                }
            }
            pipe.move_left();
        }

        if add_pipe {
            self.score += 1;
            self.pipes.push(Pipe::new(game::NEXT_PIPE_X, &self.assets.pipe, &mut self.rng));
            report.scored = true;
            debug!("Score {}", self.score);
        }

        let before = self.pipes.len();
        self.pipes.retain(|pipe| !pipe.is_offscreen());
        report.removed_pipes = before - self.pipes.len();

        let floor_y = self.floor.y() as f64;
        let frames = &self.assets.birds;
        let mut index = 0;
        self.birds.retain(|bird| {
            let hit_pipe = crashed[index];
            index += 1;
            if hit_pipe {
                report.crashed += 1;
                return false;
            }
            let out_of_bounds = bird.y() + bird.frame_height(frames) as f64 > floor_y || bird.y() < 0.0;
            if out_of_bounds {
                report.out_of_bounds += 1;
            }
            !out_of_bounds
        });

        if report.crashed + report.out_of_bounds > 0 && self.birds.is_empty() {
            info!("Flock lost at score {}", self.score);
            if self.settings.end_when_flock_lost {
                self.state = LoopState::Ended;
            }
        }

        report
    }

    /// Composites the current frame onto `surface`.
    pub fn render(&mut self, surface: &mut RgbaImage) {
        draw_screen(surface, &self.assets, &mut self.birds, &self.pipes, &self.floor, self.score);
    }
}
