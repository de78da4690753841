use std::time::Duration;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Tunable constants for one difficulty. Units are world pixels and 16ms steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// Velocity added every step.
    pub gravity: f64,
    /// Velocity the bird is reset to on jump (negative is upward).
    pub jump_force: f64,
    /// Horizontal distance obstacles travel every step.
    pub pipe_speed: f64,
    pub spawn_rate_ms: u64,
    /// Height of the opening between the upper and lower pipe.
    pub gap_size: f64,
    pub color: Color,
}

impl DifficultyProfile {
    pub fn spawn_period(&self) -> Duration {
        Duration::from_millis(self.spawn_rate_ms)
    }
}

const EASY: DifficultyProfile = DifficultyProfile {
    gravity: 0.4,
    jump_force: -8.0,
    pipe_speed: 2.0,
    spawn_rate_ms: 2000,
    gap_size: 180.0,
    color: Color::Green,
};

const MEDIUM: DifficultyProfile = DifficultyProfile {
    gravity: 0.6,
    jump_force: -10.0,
    pipe_speed: 3.0,
    spawn_rate_ms: 1500,
    gap_size: 140.0,
    color: Color::Yellow,
};

const HARD: DifficultyProfile = DifficultyProfile {
    gravity: 0.8,
    jump_force: -11.0,
    pipe_speed: 4.0,
    spawn_rate_ms: 1200,
    gap_size: 120.0,
    color: Color::Red,
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => EASY,
            Difficulty::Medium => MEDIUM,
            Difficulty::Hard => HARD,
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_presets() {
        let table = Difficulty::iter()
            .map(|difficulty| {
                let p = difficulty.profile();
                format!(
                    "{difficulty}: gravity={} jump={} speed={} spawn={}ms gap={} color={:?}",
                    p.gravity, p.jump_force, p.pipe_speed, p.spawn_rate_ms, p.gap_size, p.color
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        insta::assert_snapshot!(table, @r###"
        Easy: gravity=0.4 jump=-8 speed=2 spawn=2000ms gap=180 color=Green
        Medium: gravity=0.6 jump=-10 speed=3 spawn=1500ms gap=140 color=Yellow
        Hard: gravity=0.8 jump=-11 speed=4 spawn=1200ms gap=120 color=Red
        "###);
    }

    #[test]
    fn test_parse_difficulty() {
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!("Medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert!("impossible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_spawn_period() {
        assert_eq!(Difficulty::Hard.profile().spawn_period(), Duration::from_millis(1200));
    }
}
