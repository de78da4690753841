mod game;
mod home;

use serde::{Deserialize, Serialize};
use strum::Display;

pub use crate::action::{game::GameAction, home::HomeAction};
use crate::pages::game::Difficulty;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display, Deserialize, Default)]
pub enum ActionState {
    #[default]
    Start,
    Repeat,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum Command {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    Error(String),
    ToggleShowHelp,
    SelectDifficulty(Difficulty),
    ChangeDifficulty,
    // Page actions
    Home(HomeAction),
    Game(GameAction),
}

impl Command {
    /// Label shown in the keybinding help table.
    pub fn string(&self) -> String {
        match self {
            Command::Home(action) => action.to_string(),
            Command::Game(action) => action.to_string(),
            Command::SelectDifficulty(difficulty) => format!("Play {difficulty}"),
            command => command.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
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
