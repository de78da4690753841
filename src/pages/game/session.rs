use std::collections::VecDeque;

use rand::{rngs::StdRng, Rng, SeedableRng};
use strum::Display;
use tracing::{info, trace};

use crate::{
    constants::game,
    pages::game::{
        bird::Bird,
        difficulty::{Difficulty, DifficultyProfile},
        object::Object,
        pipe::Pipe,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Phase {
    NoDifficulty,
    AwaitingStart,
    Running,
    GameOver,
}

/// Everything one player session needs: the bird, the pipes, the scores and
/// the random source for new openings. The high score survives retries.
#[derive(Debug)]
pub struct Session<R = StdRng> {
    phase: Phase,
    difficulty: Option<Difficulty>,
    bird: Bird,
    pipes: VecDeque<Pipe>,
    ground_offset: f64,
    score: u32,
    high_score: u32,
    rng: R,
}

impl Session<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Session<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Session<R> {
    pub fn with_rng(rng: R) -> Self {
        Session {
            phase: Phase::NoDifficulty,
            difficulty: None,
            bird: Bird::new(),
            pipes: VecDeque::new(),
            ground_offset: 0.0,
            score: 0,
            high_score: 0,
            rng,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn profile(&self) -> Option<DifficultyProfile> {
        self.difficulty.map(|difficulty| difficulty.profile())
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn pipes(&self) -> impl Iterator<Item = &Pipe> {
        self.pipes.iter()
    }

    pub fn ground_offset(&self) -> f64 {
        self.ground_offset
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Picks a difficulty and lines up a fresh attempt. Works from any phase.
    pub fn select_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = Some(difficulty);
        self.reset();
        self.phase = Phase::AwaitingStart;
        info!("Difficulty {difficulty} selected");
    }

    /// Another attempt with the same difficulty, only after a game over.
    pub fn retry(&mut self) -> bool {
        match (self.phase, self.difficulty) {
            (Phase::GameOver, Some(difficulty)) => {
                self.select_difficulty(difficulty);
                true
            },
            _ => false,
        }
    }

    /// Back to the difficulty picker, only after a game over.
    pub fn change_difficulty(&mut self) -> bool {
        if self.phase != Phase::GameOver {
            return false;
        }
        self.difficulty = None;
        self.reset();
        self.phase = Phase::NoDifficulty;
        true
    }

    /// Starts the attempt if needed and resets the bird's velocity upward.
    /// Inert without a difficulty or after a game over.
    pub fn jump(&mut self) -> bool {
        let Some(profile) = self.profile() else {
            return false;
        };
        match self.phase {
            Phase::AwaitingStart => {
                self.phase = Phase::Running;
                info!("Attempt started on {}", self.difficulty.map(|d| d.to_string()).unwrap_or_default());
            },
            Phase::Running => {},
            Phase::NoDifficulty | Phase::GameOver => return false,
        }
        self.bird.up(profile.jump_force);
        true
    }

    /// One update-loop step. Returns false when the session is not running.
    pub fn step(&mut self) -> bool {
        let Some(profile) = self.running_profile() else {
            return false;
        };
        // Collisions test the bird and pipes as they were when the tick began
        let bird_box = self.bird.bounds();

        if !self.bird.advance() {
            self.end_attempt("left the play area");
        }

        self.bird.fall(profile.gravity);

        self.ground_offset = (self.ground_offset - profile.pipe_speed) % game::GROUND_TILE;

        let mut crashed = false;
        let mut passed = 0;
        for pipe in self.pipes.iter() {
            if bird_box.collides_with(&pipe.upper()) || bird_box.collides_with(&pipe.lower(profile.gap_size)) {
                crashed = true;
            }
            if pipe.on_pass_line() {
                passed += 1;
            }
        }

        for pipe in self.pipes.iter_mut() {
            pipe.move_left(profile.pipe_speed);
        }
        self.pipes.retain(|pipe| pipe.visible());

        for _ in 0..passed {
            self.score += 1;
            if self.score > self.high_score {
                self.high_score = self.score;
            }
        }

        if crashed {
            self.end_attempt("hit a pipe");
        }

        trace!(
            position = self.bird.position(),
            velocity = self.bird.velocity(),
            pipes = self.pipes.len(),
            score = self.score,
            "step"
        );
        true
    }

    /// Spawn-timer callback: adds one pipe at the right edge.
    pub fn spawn(&mut self) -> bool {
        if self.running_profile().is_none() {
            return false;
        }
        let pipe = Pipe::spawn(&mut self.rng);
        trace!(gap_top = pipe.gap_top(), "spawned pipe");
        self.pipes.push_back(pipe);
        true
    }

    fn running_profile(&self) -> Option<DifficultyProfile> {
        match self.phase {
            Phase::Running => self.profile(),
            _ => None,
        }
    }

    fn reset(&mut self) {
        self.bird = Bird::new();
        self.pipes.clear();
        self.ground_offset = 0.0;
        self.score = 0;
    }

    fn end_attempt(&mut self, reason: &str) {
        if self.phase == Phase::Running {
            self.phase = Phase::GameOver;
            info!("Game over ({reason}) with score {}, high score {}", self.score, self.high_score);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn running(difficulty: Difficulty) -> Session {
        let mut session = Session::seeded(42);
        session.select_difficulty(difficulty);
        assert!(session.jump());
        session.bird.place(game::BIRD_START, 0.0);
        session
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
    }

    #[test]
    fn test_new_session() {
        let session = Session::seeded(1);
        assert_eq!(session.phase(), Phase::NoDifficulty);
        assert_eq!(session.difficulty(), None);
        assert_eq!(session.score(), 0);
        assert_eq!(session.high_score(), 0);
        assert_eq!(session.pipes().count(), 0);
    }

    #[test]
    fn test_jump_without_difficulty_is_ignored() {
        let mut session = Session::seeded(1);
        assert!(!session.jump());
        assert_eq!(session.phase(), Phase::NoDifficulty);
        assert_eq!(session.bird().velocity(), 0.0);
    }

    #[test]
    fn test_first_jump_starts_attempt() {
        let mut session = Session::seeded(1);
        session.select_difficulty(Difficulty::Medium);
        assert_eq!(session.phase(), Phase::AwaitingStart);

        assert!(session.jump());
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.bird().velocity(), -10.0);
    }

    #[test]
    fn test_step_and_spawn_only_while_running() {
        let mut session = Session::seeded(1);
        assert!(!session.step());
        assert!(!session.spawn());

        session.select_difficulty(Difficulty::Easy);
        assert!(!session.step());
        assert!(!session.spawn());
        assert_eq!(session.bird().position(), game::BIRD_START);
        assert_eq!(session.pipes().count(), 0);
    }

    #[test]
    fn test_medium_jump_sequence() {
        let mut session = Session::seeded(1);
        session.select_difficulty(Difficulty::Medium);
        session.jump();

        let expected = [(240.0, -9.4), (230.6, -8.8), (221.8, -8.2), (213.6, -7.6), (206.0, -7.0)];
        for (position, velocity) in expected {
            assert!(session.step());
            assert_close(session.bird().position(), position);
            assert_close(session.bird().velocity(), velocity);
        }
        assert_eq!(session.phase(), Phase::Running);
    }

    #[test]
    fn test_gravity_applies_once_per_step() {
        let mut session = running(Difficulty::Hard);
        for _ in 0..20 {
            let before = session.bird().velocity();
            session.step();
            assert_eq!(session.bird().velocity(), before + 0.8);
        }
    }

    #[test]
    fn test_floor_ends_attempt_and_holds_position() {
        let mut session = running(Difficulty::Medium);
        session.bird.place(455.0, 6.0);

        assert!(session.step());
        assert_eq!(session.phase(), Phase::GameOver);
        assert_eq!(session.bird().position(), 455.0);
        // gravity still applies on the losing step
        assert_close(session.bird().velocity(), 6.6);

        assert!(!session.step());
        assert_eq!(session.bird().position(), 455.0);
    }

    #[test]
    fn test_ceiling_ends_attempt_and_holds_position() {
        let mut session = running(Difficulty::Medium);
        session.bird.place(0.5, -1.5);

        session.step();
        assert_eq!(session.phase(), Phase::GameOver);
        assert_eq!(session.bird().position(), 0.5);
    }

    #[test]
    fn test_jump_after_game_over_is_inert() {
        let mut session = running(Difficulty::Medium);
        session.bird.place(455.0, 6.0);
        session.step();

        let velocity = session.bird().velocity();
        assert!(!session.jump());
        assert_eq!(session.phase(), Phase::GameOver);
        assert_eq!(session.bird().velocity(), velocity);
    }

    #[test]
    fn test_bird_inside_gap_survives() {
        let mut session = running(Difficulty::Medium);
        session.bird.place(200.0, 0.0);
        session.pipes.push_back(Pipe::new(60.0, 150.0));

        session.step();
        assert_eq!(session.phase(), Phase::Running);
    }

    #[test]
    fn test_bird_in_upper_pipe_crashes() {
        let mut session = running(Difficulty::Medium);
        session.bird.place(140.0, 0.0);
        session.pipes.push_back(Pipe::new(60.0, 150.0));

        session.step();
        assert_eq!(session.phase(), Phase::GameOver);
    }

    #[test]
    fn test_bird_in_lower_pipe_crashes() {
        let mut session = running(Difficulty::Medium);
        session.bird.place(270.0, 0.0);
        session.pipes.push_back(Pipe::new(60.0, 150.0));

        session.step();
        assert_eq!(session.phase(), Phase::GameOver);
    }

    #[test]
    fn test_collision_uses_positions_before_the_move() {
        let mut session = running(Difficulty::Medium);
        session.bird.place(100.0, 0.0);
        // Touches the bird's right edge now, overlaps once moved
        session.pipes.push_back(Pipe::new(82.0, 150.0));

        session.step();
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.pipes().next().map(|pipe| pipe.x()), Some(79.0));

        session.step();
        assert_eq!(session.phase(), Phase::GameOver);
    }

    #[test]
    fn test_collision_uses_bird_before_its_move() {
        let mut session = running(Difficulty::Medium);
        // [155, 187) clears the upper pipe, the moved box [145, 177) would not
        session.bird.place(155.0, -10.0);
        session.pipes.push_back(Pipe::new(60.0, 150.0));

        session.step();
        assert_eq!(session.bird().position(), 145.0);
        assert_eq!(session.phase(), Phase::Running);

        session.step();
        assert_eq!(session.phase(), Phase::GameOver);
    }

    #[test]
    fn test_pipes_move_and_get_culled() {
        let mut session = running(Difficulty::Medium);
        session.pipes.push_back(Pipe::new(-57.0, 150.0));
        session.pipes.push_back(Pipe::new(-56.0, 150.0));
        session.pipes.push_back(Pipe::new(300.0, 150.0));

        session.step();
        let xs = session.pipes().map(|pipe| pipe.x()).collect::<Vec<_>>();
        assert_eq!(xs, vec![-59.0, 297.0]);
    }

    #[test]
    fn test_score_once_per_pipe() {
        let mut session = running(Difficulty::Easy);
        session.bird.place(200.0, 0.0);
        session.pipes.push_back(Pipe::new(50.0, 150.0));

        session.step();
        assert_eq!(session.score(), 0);
        session.step();
        assert_eq!(session.score(), 1);
        assert_eq!(session.high_score(), 1);
        session.step();
        session.step();
        assert_eq!(session.score(), 1);
        assert_eq!(session.phase(), Phase::Running);
    }

    #[test]
    fn test_spawned_pipe_scores_on_easy() {
        let mut session = running(Difficulty::Easy);
        session.spawn();
        let pipe = session.pipes().next().cloned().unwrap();
        assert_eq!(pipe.x(), 400.0);

        // Keep the bird parked mid-gap so only the pass line matters
        let mid_gap = pipe.gap_top() + 40.0;
        for _ in 0..176 {
            session.bird.place(mid_gap, 0.0);
            session.step();
        }
        assert_eq!(session.score(), 0);
        session.bird.place(mid_gap, 0.0);
        session.step();
        assert_eq!(session.score(), 1);
        assert_eq!(session.phase(), Phase::Running);
    }

    #[test]
    fn test_ground_offset_wraps() {
        let mut session = running(Difficulty::Hard);
        for _ in 0..8 {
            session.step();
        }
        // -28 - 4 = -32, truncated remainder keeps the sign
        assert_eq!(session.ground_offset(), -2.0);
    }

    #[test]
    fn test_spawn_appends_in_order() {
        let mut session = running(Difficulty::Hard);
        session.spawn();
        session.step();
        session.spawn();

        let pipes = session.pipes().collect::<Vec<_>>();
        assert_eq!(pipes.len(), 2);
        assert_eq!(pipes[0].x(), 396.0);
        assert_eq!(pipes[1].x(), 400.0);
        for pipe in pipes {
            assert!((100.0..300.0).contains(&pipe.gap_top()));
        }
    }

    #[test]
    fn test_selecting_hard_resets_attempt() {
        let mut session = running(Difficulty::Easy);
        session.bird.place(200.0, 0.0);
        session.pipes.push_back(Pipe::new(48.0, 150.0));
        session.step();
        session.spawn();
        assert_eq!(session.score(), 1);

        session.select_difficulty(Difficulty::Hard);
        assert_eq!(session.phase(), Phase::AwaitingStart);
        assert_eq!(session.difficulty(), Some(Difficulty::Hard));
        assert_eq!(session.score(), 0);
        assert_eq!(session.high_score(), 1);
        assert_eq!(session.bird().position(), 250.0);
        assert_eq!(session.bird().velocity(), 0.0);
        assert_eq!(session.pipes().count(), 0);
    }

    #[test]
    fn test_retry_keeps_difficulty_and_high_score() {
        let mut session = running(Difficulty::Easy);
        session.bird.place(200.0, 0.0);
        session.pipes.push_back(Pipe::new(48.0, 150.0));
        session.step();
        session.bird.place(455.0, 10.0);
        session.step();
        assert_eq!(session.phase(), Phase::GameOver);

        assert!(session.retry());
        assert_eq!(session.phase(), Phase::AwaitingStart);
        assert_eq!(session.difficulty(), Some(Difficulty::Easy));
        assert_eq!(session.score(), 0);
        assert_eq!(session.high_score(), 1);
    }

    #[test]
    fn test_retry_and_change_only_after_game_over() {
        let mut session = running(Difficulty::Easy);
        assert!(!session.retry());
        assert!(!session.change_difficulty());
        assert_eq!(session.phase(), Phase::Running);
    }

    #[test]
    fn test_change_difficulty() {
        let mut session = running(Difficulty::Hard);
        session.bird.place(455.0, 10.0);
        session.step();

        assert!(session.change_difficulty());
        assert_eq!(session.phase(), Phase::NoDifficulty);
        assert_eq!(session.difficulty(), None);
        assert!(!session.jump());
    }
}
