mod assets;
mod bird;
mod floor;
mod font;
mod mask;
mod pipe;
mod render;
mod sprite;
mod world;

use std::collections::HashMap;

use color_eyre::eyre::{eyre, Result};
use image::{DynamicImage, RgbaImage};
use ratatui::{layout::Rect, Frame};
use ratatui_image::{picker::Picker, Image, Resize};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use super::{Page, PageId};
use crate::{
    action::{act, Action, ActionState, Command, GameAction},
    config::{Config, GameConfig, PageKeyBindings},
    constants::game,
    pages::game::{
        assets::AssetBundle,
        world::{GameLoop, GameSettings, InputEvent, LoopState},
    },
};

const FALLBACK_FONT_SIZE: (u16, u16) = (8, 16);

/// Hosts the simulation and shows its canvas in the terminal.
pub struct GamePage {
    pub action_tx: Option<UnboundedSender<Action>>,
    pub keymap: PageKeyBindings,
    config: GameConfig,
    game: Option<GameLoop>,
    /// Inputs received since the last tick.
    pending: Vec<InputEvent>,
    canvas: RgbaImage,
    picker: Option<Picker>,
}

impl GamePage {
    pub fn new() -> Self {
        GamePage {
            action_tx: None,
            keymap: PageKeyBindings::default(),
            config: GameConfig::default(),
            game: None,
            pending: Vec::new(),
            canvas: RgbaImage::new(game::SCREEN_WIDTH, game::SCREEN_HEIGHT),
            picker: None,
        }
    }

    fn new_game(&mut self) -> Result<()> {
        let assets = AssetBundle::from_config(&self.config)?;
        let settings = GameSettings::from(&self.config);
        info!("Starting game with {} bird(s), seed {:?}", settings.flock.len(), settings.seed);

        let mut game = GameLoop::new(assets, settings);
        game.render(&mut self.canvas);
        self.game = Some(game);
        Ok(())
    }

    fn query_picker(&mut self) {
        let picker = match Picker::from_query_stdio() {
            Ok(picker) => picker,
            Err(e) => {
                warn!("Terminal graphics query failed, falling back to halfblocks: {e:?}");
                Picker::from_fontsize(FALLBACK_FONT_SIZE)
            },
        };
        self.picker = Some(picker);
    }

    /// Feeds the queued inputs to the loop and redraws the canvas while it is
    /// still running.
    fn step(&mut self) -> Option<LoopState> {
        let game = self.game.as_mut()?;
        if game.state() == LoopState::Ended {
            return Some(LoopState::Ended);
        }

        let state = game.tick(self.pending.drain(..)).state;
        if state == LoopState::Running {
            game.render(&mut self.canvas);
        }
        Some(state)
    }

    fn exit_on_end(state: Option<LoopState>) -> Option<Action> {
        match state {
            Some(LoopState::Ended) => Some(act!(Command::Exit)),
            _ => None,
        }
    }
}

impl Default for GamePage {
    fn default() -> Self {
        Self::new()
    }
}

impl Page for GamePage {
    fn id(&self) -> PageId {
        PageId::Game
    }

    fn register_keymap(&mut self, keymaps: &HashMap<PageId, PageKeyBindings>) -> Result<()> {
        if let Some(keymap) = keymaps.get(&self.id()) {
            self.keymap = keymap.clone();
        }
        Ok(())
    }

    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(tx);
        Ok(())
    }

    fn register_config_handler(&mut self, config: Config) -> Result<()> {
        self.config = config.game;
        Ok(())
    }

    fn init(&mut self) -> Result<()> {
        self.new_game()?;
        self.query_picker();
        Ok(())
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action.command {
            Command::Game(GameAction::Jump) if action.state == ActionState::Start => {
                self.pending.push(InputEvent::Jump);
                Ok(None)
            },
            // Consumed right away so a paused loop still ends.
            Command::Quit => {
                self.pending.push(InputEvent::Quit);
                Ok(Self::exit_on_end(self.step()))
            },
            Command::Tick => Ok(Self::exit_on_end(self.step())),
            _ => Ok(None),
        }
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let Some(picker) = self.picker.as_mut() else {
            return Ok(());
        };

        let protocol = picker
            .new_protocol(DynamicImage::ImageRgba8(self.canvas.clone()), area, Resize::Fit(None))
            .map_err(|e| eyre!("{e:?}"))?;
        f.render_widget(Image::new(&protocol), area);

        Ok(())
    }
}
