use std::time::Duration;

use tokio::{
    sync::mpsc::UnboundedSender,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::action::{act, Action, Command, GameAction};

/// The update loop and the spawn timer of one attempt. Both tasks only emit
/// actions; the session itself is mutated on the app loop.
#[derive(Debug)]
pub struct GameClock {
    step_period: Duration,
    cancellation_token: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl GameClock {
    pub fn new(step_period: Duration) -> Self {
        let cancellation_token = CancellationToken::new();
        cancellation_token.cancel();
        Self { step_period, cancellation_token, tasks: Vec::new() }
    }

    pub fn is_running(&self) -> bool {
        !self.cancellation_token.is_cancelled()
    }

    /// Restarts both timers. Each fires its first action one full period from now.
    pub fn start(&mut self, action_tx: UnboundedSender<Action>, spawn_period: Duration) {
        self.stop();
        self.cancellation_token = CancellationToken::new();

        let token = self.cancellation_token.clone();
        let step = Self::periodic(action_tx.clone(), token.clone(), self.step_period, GameAction::Step);
        let spawn = Self::periodic(action_tx, token, spawn_period, GameAction::Spawn);
        self.tasks = vec![tokio::spawn(step), tokio::spawn(spawn)];

        debug!("Game clock started (step {:?}, spawn {:?})", self.step_period, spawn_period);
    }

    pub fn stop(&mut self) {
        if self.is_running() {
            debug!("Game clock stopped");
        }
        self.cancellation_token.cancel();
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }

    async fn periodic(
        action_tx: UnboundedSender<Action>,
        cancellation_token: CancellationToken,
        period: Duration,
        action: GameAction,
    ) {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                biased;
                _ = cancellation_token.cancelled() => break,
                _ = ticker.tick() => {
                    if action_tx.send(act!(Command::Game(action))).is_err() {
                        // nobody is listening anymore
                        cancellation_token.cancel();
                        break;
                    }
                },
            }
        }
    }
}

impl Drop for GameClock {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    use super::*;

    fn drain(rx: &mut UnboundedReceiver<Action>) -> (usize, usize) {
        let mut steps = 0;
        let mut spawns = 0;
        while let Ok(action) = rx.try_recv() {
            match action.command {
                Command::Game(GameAction::Step) => steps += 1,
                Command::Game(GameAction::Spawn) => spawns += 1,
                command => panic!("unexpected {command:?}"),
            }
        }
        (steps, spawns)
    }

    #[test]
    fn test_new_clock_is_stopped() {
        let clock = GameClock::new(Duration::from_millis(16));
        assert!(!clock.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_emits_steps_and_spawns() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut clock = GameClock::new(Duration::from_millis(16));
        clock.start(tx, Duration::from_millis(1500));
        assert!(clock.is_running());

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(drain(&mut rx), (0, 0));

        tokio::time::sleep(Duration::from_millis(1600)).await;
        let (steps, spawns) = drain(&mut rx);
        assert!(steps >= 90, "only {steps} steps");
        assert_eq!(spawns, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_both_timers() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut clock = GameClock::new(Duration::from_millis(16));
        clock.start(tx, Duration::from_millis(100));

        tokio::time::sleep(Duration::from_millis(250)).await;
        clock.stop();
        assert!(!clock.is_running());
        drain(&mut rx);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(drain(&mut rx), (0, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_previous_timers() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut clock = GameClock::new(Duration::from_millis(16));
        clock.start(tx.clone(), Duration::from_millis(1000));
        clock.start(tx, Duration::from_millis(1000));

        tokio::time::sleep(Duration::from_millis(1010)).await;
        let (_, spawns) = drain(&mut rx);
        assert_eq!(spawns, 1);
    }
}
