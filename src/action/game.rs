use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, Deserialize)]
pub enum GameAction {
    Jump,
    Up,
    Down,
    Select,
    // Emitted by the game clock, not bound to keys
    Step,
    Spawn,
}
