use ratatui::style::Color;

/// Period of one physics step in milliseconds.
pub const STEP_MS: u64 = 16;

// World geometry, in pixels of the 384x500 playfield.
pub const WORLD_WIDTH: f64 = 384.0;
pub const WORLD_HEIGHT: f64 = 500.0;

pub const BIRD_X: f64 = 50.0;
pub const BIRD_SIZE: f64 = 32.0;
pub const BIRD_START: f64 = 250.0;
pub const BIRD_CEILING: f64 = 0.0;
pub const BIRD_FLOOR: f64 = 460.0;
/// Degrees of tilt per unit of vertical velocity.
pub const BIRD_TILT: f64 = 3.0;

pub const PIPE_WIDTH: f64 = 52.0;
pub const PIPE_SPAWN_X: f64 = 400.0;
pub const PIPE_CULL_X: f64 = -60.0;
pub const PASS_LINE_X: f64 = 48.0;
pub const GAP_TOP_MIN: u32 = 100;
pub const GAP_TOP_MAX: u32 = 300;

pub const GROUND_HEIGHT: f64 = 80.0;
pub const GROUND_TILE: f64 = 30.0;

pub const SKY_COLOR: Color = Color::Rgb(112, 192, 232);
pub const PIPE_COLOR: Color = Color::Rgb(46, 125, 50);
pub const PIPE_EDGE_COLOR: Color = Color::Rgb(27, 94, 32);
pub const GROUND_COLORS: [Color; 2] = [Color::Rgb(124, 153, 39), Color::Rgb(92, 114, 29)];
pub const GRASS_COLOR: Color = Color::Rgb(167, 209, 41);
pub const BIRD_COLOR: Color = Color::Yellow;

pub const BIRD_RISING: &str = r#"
 ,_/
(o >
"#;
pub const BIRD_LEVEL: &str = r#"
 __
(o>=
"#;
pub const BIRD_FALLING: &str = r#"
(o\
 \v
"#;
/// Tilt thresholds in degrees for picking a sprite.
pub const RISING_TILT: f64 = -10.0;
pub const FALLING_TILT: f64 = 20.0;

pub const START_TEXT: &str = "Press space to start";
pub const GAME_OVER_TEXT: &str = "Game Over!";
pub const CARD_HPADDING: u16 = 3;
pub const CARD_VPADDING: u16 = 1;
