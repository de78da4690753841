mod bird;
mod clock;
mod difficulty;
pub mod object;
mod pipe;
mod session;

use std::{collections::HashMap, time::Duration};

use color_eyre::eyre::Result;
use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{prelude::*, widgets::*};
use strum::{Display, EnumIter, IntoEnumIterator};
use tokio::sync::mpsc::UnboundedSender;

pub use self::{
    difficulty::{Difficulty, DifficultyProfile},
    session::{Phase, Session},
};
use super::{Frame, Page, PageId};
use crate::{
    action::{act, Action, Command, GameAction},
    components::playfield::Playfield,
    config::PageKeyBindings,
    constants::game,
    pages::game::clock::GameClock,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
enum GameOverOption {
    Retry,
    #[strum(to_string = "Change Difficulty")]
    ChangeDifficulty,
}

pub struct GamePage {
    pub action_tx: Option<UnboundedSender<Action>>,
    pub keymap: PageKeyBindings,
    session: Session,
    clock: GameClock,
    selected_option_index: usize,
}

impl GamePage {
    pub fn new(seed: Option<u64>) -> Self {
        GamePage {
            action_tx: None,
            keymap: PageKeyBindings::default(),
            session: seed.map(Session::seeded).unwrap_or_default(),
            clock: GameClock::new(Duration::from_millis(game::STEP_MS)),
            selected_option_index: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn options() -> Vec<GameOverOption> {
        GameOverOption::iter().collect()
    }

    pub fn up(&mut self) {
        if self.selected_option_index > 0 {
            self.selected_option_index -= 1;
        }
    }

    pub fn down(&mut self) {
        if self.selected_option_index < Self::options().len() - 1 {
            self.selected_option_index += 1;
        }
    }

    fn select_option(&mut self) -> Result<()> {
        if self.session.phase() != Phase::GameOver {
            return Ok(());
        }
        match Self::options()[self.selected_option_index] {
            GameOverOption::Retry => {
                self.session.retry();
            },
            GameOverOption::ChangeDifficulty => {
                self.session.change_difficulty();
                if let Some(action_tx) = &self.action_tx {
                    action_tx.send(act!(Command::ChangeDifficulty))?;
                }
            },
        }
        self.selected_option_index = 0;
        Ok(())
    }

    /// The clock runs exactly while the session does.
    fn sync_clock(&mut self) {
        match (self.session.phase(), self.clock.is_running()) {
            (Phase::Running, false) => {
                if let (Some(action_tx), Some(profile)) = (&self.action_tx, self.session.profile()) {
                    self.clock.start(action_tx.clone(), profile.spawn_period());
                }
            },
            (Phase::Running, true) => {},
            (_, true) => self.clock.stop(),
            (_, false) => {},
        }
    }

    fn draw_start_badge(&self, f: &mut Frame<'_>, area: Rect, color: Color) {
        let width = game::START_TEXT.chars().count() as u16 + game::CARD_HPADDING * 2;
        let [area] = Layout::vertical([Constraint::Length(3)]).flex(layout::Flex::Center).areas(area);
        let [area] = Layout::horizontal([Constraint::Length(width)]).flex(layout::Flex::Center).areas(area);

        let badge = Paragraph::new(vec![Line::from(""), Line::from(game::START_TEXT), Line::from("")])
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD));
        f.render_widget(Clear, area);
        f.render_widget(badge, area);
    }

    fn draw_game_over(&self, f: &mut Frame<'_>, area: Rect, color: Color) {
        let mut lines = vec![
            Line::from(game::GAME_OVER_TEXT).style(Style::default().add_modifier(Modifier::BOLD)),
            Line::from(""),
            Line::from(format!("Score: {}", self.session.score())),
            Line::from(format!("High Score: {}", self.session.high_score())),
            Line::from(""),
        ];
        for (index, option) in Self::options().into_iter().enumerate() {
            let style = if index == self.selected_option_index {
                Style::default().fg(Color::Black).bg(color)
            } else {
                Style::default()
            };
            lines.push(Line::from(format!("  {option}  ")).style(style));
        }

        let width = lines.iter().map(|line| line.width()).max().unwrap_or(0) as u16 + game::CARD_HPADDING * 2 + 2;
        let height = lines.len() as u16 + game::CARD_VPADDING * 2 + 2;
        let [area] = Layout::vertical([Constraint::Length(height)]).flex(layout::Flex::Center).areas(area);
        let [area] = Layout::horizontal([Constraint::Length(width)]).flex(layout::Flex::Center).areas(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .style(Style::default().fg(Color::White).bg(Color::Black));
        let inner = block.inner(area).inner(Margin { horizontal: game::CARD_HPADDING, vertical: game::CARD_VPADDING });

        f.render_widget(Clear, area);
        f.render_widget(block, area);
        f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
    }
}

impl Page for GamePage {
    fn id(&self) -> PageId {
        PageId::Game
    }

    fn register_keymap(&mut self, keymaps: &HashMap<PageId, PageKeyBindings>) -> Result<()> {
        if let Some(keymap) = keymaps.get(&self.id()) {
            self.keymap = keymap.clone();
        }
        Ok(())
    }

    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(tx);
        Ok(())
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(self.keymap.action_for(&key))
    }

    fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => Ok(Some(act!(Command::Game(GameAction::Jump)))),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action.command {
            Command::SelectDifficulty(difficulty) => {
                self.session.select_difficulty(difficulty);
                self.selected_option_index = 0;
            },
            Command::Game(command) => match command {
                GameAction::Jump => {
                    self.session.jump();
                },
                GameAction::Step => {
                    self.session.step();
                },
                GameAction::Spawn => {
                    self.session.spawn();
                },
                GameAction::Up if self.session.phase() == Phase::GameOver => self.up(),
                GameAction::Up => {
                    self.session.jump();
                },
                GameAction::Down if self.session.phase() == Phase::GameOver => self.down(),
                GameAction::Select => self.select_option()?,
                _ => {},
            },
            _ => {},
        }
        self.sync_clock();

        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        f.render_widget(Playfield::new(&self.session), area);

        let Some(profile) = self.session.profile() else {
            return Ok(());
        };
        match self.session.phase() {
            Phase::AwaitingStart => self.draw_start_badge(f, area, profile.color),
            Phase::GameOver => self.draw_game_over(f, area, profile.color),
            _ => {},
        }

        Ok(())
    }
}
