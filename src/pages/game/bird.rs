use crate::{constants::game, pages::game::object::Object};

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    position: f64,
    velocity: f64,
}

impl Default for Bird {
    fn default() -> Self {
        Self::new()
    }
}

impl Bird {
    pub fn new() -> Self {
        Bird { position: game::BIRD_START, velocity: 0.0 }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Tilt in degrees, positive when nose-down.
    pub fn tilt(&self) -> f64 {
        self.velocity * game::BIRD_TILT
    }

    /// Moves by the current velocity. Returns false and keeps the old position
    /// when the move would leave the vertical play bounds.
    pub fn advance(&mut self) -> bool {
        let position = self.position + self.velocity;
        if !(game::BIRD_CEILING..=game::BIRD_FLOOR).contains(&position) {
            return false;
        }
        self.position = position;
        true
    }

    pub fn fall(&mut self, gravity: f64) {
        self.velocity += gravity;
    }

    pub fn up(&mut self, velocity: f64) {
        self.velocity = velocity;
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, position: f64, velocity: f64) {
        self.position = position;
        self.velocity = velocity;
    }
}

impl Object for Bird {
    fn get_size(&self) -> (f64, f64) {
        (game::BIRD_SIZE, game::BIRD_SIZE)
    }

    fn get_pos(&self) -> (f64, f64) {
        (game::BIRD_X, self.position)
    }
}
