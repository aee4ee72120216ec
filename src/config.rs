use std::{collections::HashMap, fmt::Debug, path::PathBuf};

use color_eyre::eyre::{eyre, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use derive_deref::{Deref, DerefMut};
use serde::{
    de::{self, Deserializer},
    Deserialize,
};

use crate::{
    action::{Action, ActionState, Command, GameAction},
    constants::game,
    pages::PageId,
};

const CONFIG: &str = include_str!("../.config/config.yaml");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub _data_dir: PathBuf,
    #[serde(default)]
    pub _config_dir: PathBuf,
}

/// Knobs for the simulation itself.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Simulation ticks per second.
    pub tick_rate: f64,
    /// Directory holding the classic sprite files. Builtin art when unset.
    pub assets_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub end_when_flock_lost: bool,
    /// Starting `[x, y]` of every bird.
    pub flock: Vec<(i32, f64)>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            tick_rate: game::TICK_RATE,
            assets_dir: None,
            seed: None,
            end_when_flock_lost: false,
            flock: vec![(game::BIRD_INITIAL_X, game::BIRD_INITIAL_Y)],
        }
    }
}

impl GameConfig {
    /// Rejects tick rates the tick clock cannot turn into a nonzero period.
    pub fn validate(&self) -> Result<()> {
        let rate = self.tick_rate;
        if !rate.is_finite() || rate <= 0.0 || rate > game::MAX_TICK_RATE {
            return Err(eyre!("game.tick_rate must be in (0, {}], got {rate}", game::MAX_TICK_RATE));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub keybindings: KeyBindings,
}

impl Config {
    pub fn new() -> Result<Self> {
        let default_config: Config = serde_yaml::from_str(CONFIG)?;
        let data_dir = crate::utils::get_data_dir();
        let config_dir = crate::utils::get_config_dir();
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(CONFIG, config::FileFormat::Yaml))
            .set_default("_data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("_config_dir", config_dir.to_string_lossy().to_string())?;

        let config_files = [("config.yaml", config::FileFormat::Yaml)];
        let mut found_config = false;
        for (file, format) in &config_files {
            builder = builder.add_source(config::File::from(config_dir.join(file)).format(*format).required(false));
            if config_dir.join(file).exists() {
                found_config = true
            }
        }
        if !found_config {
            log::info!("No configuration file in {}, using defaults", config_dir.display());
        }

        let mut cfg: Self = builder.build()?.try_deserialize()?;
        for (scope, default_bindings) in default_config.keybindings.pages.iter() {
            let user_bindings = cfg.keybindings.pages.entry(scope.clone()).or_default();
            for (key, cmd) in default_bindings.iter() {
                user_bindings.entry(*key).or_insert_with(|| cmd.clone());
            }
        }
        let user_bindings = &mut cfg.keybindings.global;
        for (key, cmd) in default_config.keybindings.global.iter() {
            user_bindings.entry(*key).or_insert_with(|| cmd.clone());
        }

        cfg.game.validate()?;

        Ok(cfg)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
struct _RawPageKeyBindings {
    #[serde(default)]
    pub click: Option<HashMap<String, String>>,
    #[serde(default)]
    pub hold: Option<HashMap<String, String>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct _RawKeyBindings {
    #[serde(default)]
    pub global: _RawPageKeyBindings,
    #[serde(default)]
    pub pages: HashMap<String, _RawPageKeyBindings>,
}

#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct PageKeyBindings(pub HashMap<KeyEvent, Action>);

#[derive(Clone, Debug, Default)]
pub struct KeyBindings {
    pub global: PageKeyBindings,
    pub pages: HashMap<PageId, PageKeyBindings>,
}

impl KeyBindings {
    /// Global bindings take precedence over the page's own.
    pub fn lookup(&self, page: &PageId, key: &KeyEvent) -> Option<&Action> {
        self.global.get(key).or_else(|| self.pages.get(page).and_then(|keymap| keymap.get(key)))
    }
}

impl<'de> Deserialize<'de> for KeyBindings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw_keybindings: _RawKeyBindings = _RawKeyBindings::deserialize(deserializer)?;

        let global_keybindings = PageKeyBindings(
            parse_page_keybindings::<Command>(&raw_keybindings.global)
                .map_err(de::Error::custom)?
                .into_iter()
                .map(|(event, (command, state))| (event, Action { command, state }))
                .collect(),
        );
        let page_keybindings: HashMap<PageId, PageKeyBindings> = raw_keybindings
            .pages
            .into_iter()
            .map(|(page, keybindings)| match_page_keybindings(&page, keybindings))
            .collect::<Result<_, String>>()
            .map_err(de::Error::custom)?;

        Ok(KeyBindings { global: global_keybindings, pages: page_keybindings })
    }
}

macro_rules! parse_and_map_actions {
    ( $( ( $page_id_variant:path, $action_type:ty, $action_variant:path ) ),* ) => {
        fn match_page_keybindings(
            page: &str,
            raw_page_keybindings: _RawPageKeyBindings,
        ) -> Result<(PageId, PageKeyBindings), String> {
            let page_id: PageId = page.parse().map_err(|_| format!("Unknown page `{page}`"))?;
            let map = match page_id {
                $(
                    $page_id_variant => {
                        parse_page_keybindings::<$action_type>(&raw_page_keybindings)?
                            .into_iter()
                            .map(|(event, (command, state))| (event, Action { command: $action_variant(command), state }))
                            .collect()
                    },
                )*
            };

            Ok((page_id, PageKeyBindings(map)))
        }
    };
}

parse_and_map_actions![(PageId::Game, GameAction, Command::Game)];

fn parse_binding_pairs<T>(map: &Option<HashMap<String, String>>) -> Result<HashMap<KeyEvent, T>, String>
where
    T: for<'de> Deserialize<'de>,
{
    let Some(inner_map) = map else {
        return Ok(HashMap::new());
    };
    inner_map
        .iter()
        .map(|(key_str, action_str)| {
            let action: T = serde_plain::from_str(action_str).map_err(|e| format!("Unknown command `{action_str}`: {e}"))?;
            Ok((parse_key_event(key_str)?, action))
        })
        .collect()
}

fn parse_page_keybindings<T>(
    raw_page_keybindings: &_RawPageKeyBindings,
) -> Result<HashMap<KeyEvent, (T, ActionState)>, String>
where
    T: for<'de> Deserialize<'de> + Clone + Debug,
{
    let click_keybindings = parse_binding_pairs(&raw_page_keybindings.click)?;
    let hold_keybindings = parse_binding_pairs(&raw_page_keybindings.hold)?;

    Ok(merge_keybinding_maps(click_keybindings, hold_keybindings))
}

fn merge_keybinding_maps<A: Clone>(
    click: HashMap<KeyEvent, A>,
    hold: HashMap<KeyEvent, A>,
) -> HashMap<KeyEvent, (A, ActionState)> {
    let mut click: HashMap<KeyEvent, (A, ActionState)> =
        click.into_iter().map(|(event, command)| (event, (command, ActionState::default()))).collect();
    for (mut key_event, action) in hold {
        click.insert(key_event, (action.clone(), ActionState::Start));
        key_event.kind = KeyEventKind::Release;
        click.insert(key_event, (action.clone(), ActionState::End));
        key_event.kind = KeyEventKind::Repeat;
        click.insert(key_event, (action, ActionState::Repeat));
    }

    click
}

pub fn parse_key_event(raw: &str) -> Result<KeyEvent, String> {
    if raw.chars().filter(|c| *c == '>').count() != raw.chars().filter(|c| *c == '<').count() {
        return Err(format!("Unable to parse `{}`", raw));
    }
    let raw = raw.trim_start_matches('<').trim_end_matches('>');

    let raw_lower = raw.to_ascii_lowercase();
    let (remaining, modifiers) = extract_modifiers(&raw_lower);
    parse_key_code_with_modifiers(remaining, modifiers)
}

fn extract_modifiers(raw: &str) -> (&str, KeyModifiers) {
    let mut modifiers = KeyModifiers::empty();
    let mut current = raw;

    loop {
        match current {
            rest if rest.starts_with("ctrl-") => {
                modifiers.insert(KeyModifiers::CONTROL);
                current = &rest[5..];
            },
            rest if rest.starts_with("alt-") => {
                modifiers.insert(KeyModifiers::ALT);
                current = &rest[4..];
            },
            rest if rest.starts_with("shift-") => {
                modifiers.insert(KeyModifiers::SHIFT);
                current = &rest[6..];
            },
            _ => break,
        };
    }

    (current, modifiers)
}

fn parse_key_code_with_modifiers(raw: &str, mut modifiers: KeyModifiers) -> Result<KeyEvent, String> {
    let c = match raw {
        "esc" => KeyCode::Esc,
        "enter" => KeyCode::Enter,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "backtab" => {
            modifiers.insert(KeyModifiers::SHIFT);
            KeyCode::BackTab
        },
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "insert" => KeyCode::Insert,
        "space" => KeyCode::Char(' '),
        "hyphen" | "minus" => KeyCode::Char('-'),
        "tab" => KeyCode::Tab,
        f if f.len() > 1 && f.starts_with('f') => match f[1..].parse::<u8>() {
            Ok(n @ 1..=12) => KeyCode::F(n),
            _ => return Err(format!("Unable to parse {raw}")),
        },
        c if c.chars().count() == 1 => {
            let mut c = c.chars().next().ok_or_else(|| format!("Unable to parse {raw}"))?;
            if modifiers.contains(KeyModifiers::SHIFT) {
                c = c.to_ascii_uppercase();
            }
            KeyCode::Char(c)
        },
        _ => return Err(format!("Unable to parse {raw}")),
    };
    Ok(KeyEvent::new(c, modifiers))
}

pub fn key_event_to_string(key_event: &KeyEvent) -> String {
    let char;
    let key_code = match key_event.code {
        KeyCode::Backspace => "Backspace",
        KeyCode::Enter => "Enter",
        KeyCode::Left => "Left",
        KeyCode::Right => "Right",
        KeyCode::Up => "Up",
        KeyCode::Down => "Down",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::PageUp => "PageUp",
        KeyCode::PageDown => "PageDown",
        KeyCode::Tab => "Tab",
        KeyCode::BackTab => "BackTab",
        KeyCode::Delete => "Delete",
        KeyCode::Insert => "Insert",
        KeyCode::F(c) => {
            char = format!("F{c}");
            &char
        },
        KeyCode::Char(' ') => "Space",
        KeyCode::Char(c) => {
            char = c.to_string();
            &char
        },
        KeyCode::Esc => "Esc",
        _ => "",
    };

    let mut modifiers = Vec::with_capacity(3);

    if key_event.modifiers.intersects(KeyModifiers::CONTROL) {
        modifiers.push("Ctrl");
    }

    if key_event.modifiers.intersects(KeyModifiers::SHIFT) {
        modifiers.push("Shift");
    }

    if key_event.modifiers.intersects(KeyModifiers::ALT) {
        modifiers.push("Alt");
    }

    let mut key = modifiers.join("-");

    if !key.is_empty() {
        key.push('-');
    }
    key.push_str(key_code);

    key
}
