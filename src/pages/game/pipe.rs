use rand::Rng;

use crate::{constants::game, pages::game::object::Bounds};

/// A pipe pair scrolling right to left. The opening starts `gap_top` pixels
/// below the top of the playfield.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    x: f64,
    gap_top: f64,
}

impl Pipe {
    pub fn new(x: f64, gap_top: f64) -> Self {
        Pipe { x, gap_top }
    }

    /// A fresh pipe just past the right edge with a random opening.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let gap_top = rng.gen_range(game::GAP_TOP_MIN..game::GAP_TOP_MAX);
        Pipe::new(game::PIPE_SPAWN_X, gap_top as f64)
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn gap_top(&self) -> f64 {
        self.gap_top
    }

    pub fn move_left(&mut self, step: f64) {
        self.x -= step;
    }

    pub fn visible(&self) -> bool {
        self.x > game::PIPE_CULL_X
    }

    // Exact comparison: only speeds that divide the spawn-to-line distance ever score.
    pub fn on_pass_line(&self) -> bool {
        self.x == game::PASS_LINE_X
    }

    pub fn upper(&self) -> Bounds {
        Bounds { left: self.x, top: 0.0, right: self.x + game::PIPE_WIDTH, bottom: self.gap_top }
    }

    pub fn lower(&self, gap_size: f64) -> Bounds {
        Bounds {
            left: self.x,
            top: self.gap_top + gap_size,
            right: self.x + game::PIPE_WIDTH,
            bottom: game::WORLD_HEIGHT,
        }
    }
}
