mod game;

use serde::{Deserialize, Serialize};
use strum::Display;

pub use crate::action::game::GameAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, Deserialize, Default)]
pub enum ActionState {
    #[default]
    Start,
    Repeat,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum Command {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    /// Sent by a page once it has nothing left to run.
    Exit,
    Error(String),
    ToggleShowHelp,
    // Page actions
    Game(GameAction),
}

impl Command {
    /// Human readable name, as shown in the help overlay.
    pub fn string(&self) -> String {
        match self {
            Command::Game(action) => action.to_string(),
            Command::ToggleShowHelp => "Toggle help".to_string(),
            command => command.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Action {
    pub command: Command,
    pub state: ActionState,
}

macro_rules! act {
    ($command:expr) => {
        $crate::action::Action { command: $command, state: $crate::action::ActionState::default() }
    };
    ($command:expr, $state:expr) => {
        $crate::action::Action { command: $command, state: $state }
    };
}

pub(crate) use act;

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_act_defaults_to_start() {
        assert_eq!(act!(Command::Quit), Action { command: Command::Quit, state: ActionState::Start });
        assert_eq!(act!(Command::Game(GameAction::Jump), ActionState::End).state, ActionState::End);
    }

    #[test]
    fn test_command_names() {
        assert_eq!(Command::Game(GameAction::Jump).string(), "Jump");
        assert_eq!(Command::ToggleShowHelp.string(), "Toggle help");
        assert_eq!(Command::Suspend.string(), "Suspend");
    }

    #[test]
    fn test_command_from_plain_string() {
        assert_eq!(serde_plain::from_str::<Command>("Quit").unwrap(), Command::Quit);
        assert_eq!(serde_plain::from_str::<GameAction>("Jump").unwrap(), GameAction::Jump);
        assert!(serde_plain::from_str::<Command>("Fly").is_err());
    }
}
