use color_eyre::eyre::{eyre, Result};
use ratatui::{
    layout::{Alignment, Margin},
    prelude::Rect,
    style::{Color, Style},
    widgets::{Block, BorderType, Borders},
    Frame,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::{
    action::{act, Action, Command},
    components::help::Help,
    config::Config,
    constants::TITLE,
    pages::{game::GamePage, Page},
    tui,
};

pub struct App {
    config: Config,
    tick_rate: f64,
    should_quit: bool,
    should_suspend: bool,
    show_help: bool,
    pages: Vec<Box<dyn Page>>,
    active_page_index: usize,
}

impl App {
    pub fn new() -> Result<Self> {
        let config = Config::new()?;
        let tick_rate = config.game.tick_rate;

        Ok(Self {
            tick_rate,
            should_quit: false,
            should_suspend: false,
            show_help: false,
            config,
            pages: vec![Box::new(GamePage::new())],
            active_page_index: 0,
        })
    }

    fn get_active_page(&mut self) -> Result<&mut Box<dyn Page>> {
        self.pages.get_mut(self.active_page_index).ok_or_else(|| eyre!("No page at {}", self.active_page_index))
    }

    /// Whether `action` still reaches the page while the help overlay is up.
    fn reaches_page(&self, action: &Action) -> bool {
        !self.show_help || matches!(action.command, Command::Quit)
    }

    pub async fn run(&mut self) -> Result<()> {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();

        let mut tui = tui::Tui::new()?;
        tui.tick_rate(self.tick_rate);
        tui.enter()?;

        for page in self.pages.iter_mut() {
            page.register_keymap(&self.config.keybindings.pages)?;
        }

        for page in self.pages.iter_mut() {
            page.register_action_handler(action_tx.clone())?;
        }

        for page in self.pages.iter_mut() {
            page.register_config_handler(self.config.clone())?;
        }

        for page in self.pages.iter_mut() {
            page.init()?;
        }

        tui.start();
        info!("Running at {} ticks per second", self.tick_rate);

        loop {
            if let Some(e) = tui.next().await {
                match e {
                    tui::Event::Closed => action_tx.send(act!(Command::Quit))?,
                    tui::Event::Tick => action_tx.send(act!(Command::Tick))?,
                    tui::Event::Resize(x, y) => action_tx.send(act!(Command::Resize(x, y)))?,
                    tui::Event::Key(key) => {
                        let page_id = self.get_active_page()?.id();
                        if let Some(action) = self.config.keybindings.lookup(&page_id, &key) {
                            debug!("Got action: {action:?}");
                            action_tx.send(action.clone())?;
                        }
                    },
                }
                if let Some(action) = self.get_active_page()?.handle_events(Some(e))? {
                    action_tx.send(action)?;
                }
            }

            while let Ok(action) = action_rx.try_recv() {
                let Action { command, .. } = &action;
                if *command != Command::Tick && *command != Command::Render {
                    debug!("{command:?}");
                }
                match command {
                    Command::Tick => action_tx.send(act!(Command::Render))?,
                    Command::Exit => self.should_quit = true,
                    Command::Suspend => self.should_suspend = true,
                    Command::Resume => self.should_suspend = false,
                    Command::ToggleShowHelp => {
                        self.show_help = !self.show_help;
                        action_tx.send(act!(Command::Render))?;
                    },
                    Command::Resize(w, h) => {
                        tui.resize(Rect::new(0, 0, *w, *h))?;
                        self.render(&mut tui)?;
                    },
                    Command::Render => {
                        self.render(&mut tui)?;
                    },
                    Command::Error(message) => error!("{message}"),
                    _ => {},
                }
                if self.reaches_page(&action) {
                    if let Some(action) = self.get_active_page()?.update(action)? {
                        action_tx.send(action)?
                    }
                }
            }
            if self.should_suspend {
                tui.suspend()?;
                action_tx.send(act!(Command::Resume))?;
                tui = tui::Tui::new()?;
                tui.tick_rate(self.tick_rate);
                tui.resume()?;
            } else if self.should_quit {
                tui.stop()?;
                break;
            }
        }
        tui.exit()?;
        info!("Bye");
        Ok(())
    }

    fn render(&mut self, tui: &mut tui::Tui) -> Result<()> {
        let mut result = Ok(());
        tui.draw(|f| result = self.draw(f))?;
        result
    }

    fn draw(&mut self, f: &mut Frame<'_>) -> Result<()> {
        let area = f.area();

        let border = Block::default()
            .title(TITLE)
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .style(Style::default().bg(Color::Black));
        f.render_widget(border, area);

        let area = area.inner(Margin { horizontal: 1, vertical: 1 });
        self.get_active_page()?.draw(f, area)?;

        if self.show_help {
            self.draw_help(f, area)?;
        }

        Ok(())
    }

    fn draw_help(&mut self, f: &mut Frame<'_>, rect: Rect) -> Result<()> {
        let page_id = self.get_active_page()?.id();
        let page_bindings = self.config.keybindings.pages.get(&page_id).cloned().unwrap_or_default();
        let help = Help::new(vec![
            ("System".to_string(), self.config.keybindings.global.clone()),
            (page_id.to_string(), page_bindings),
        ]);

        f.render_widget(help, rect);

        Ok(())
    }
}
