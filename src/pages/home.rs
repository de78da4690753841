use std::collections::HashMap;

use color_eyre::eyre::Result;
use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use derive_builder::Builder;
use ratatui::{layout::Position, prelude::*, widgets::*};
use strum::IntoEnumIterator;
use tokio::sync::mpsc::UnboundedSender;

use super::{Frame, Page, PageId};
use crate::{
    action::{act, Action, Command, HomeAction},
    config::PageKeyBindings,
    constants::TITLE_TEXT,
    pages::game::Difficulty,
};

/// Difficulty picker shown before the first attempt and after "Change Difficulty".
#[derive(Builder)]
pub struct HomePage {
    #[builder(default)]
    pub action_tx: Option<UnboundedSender<Action>>,
    #[builder(default)]
    pub keymap: PageKeyBindings,
    options: Vec<Difficulty>,
    #[builder(default)]
    selected_option_index: usize,
    // screen rows of the options as last drawn, for mouse hits
    #[builder(default, setter(skip))]
    option_rows: Vec<Rect>,
}

impl HomePage {
    pub fn new() -> Result<Self> {
        let page = HomePageBuilder::default().options(Difficulty::iter().collect()).selected_option_index(1).build()?;
        Ok(page)
    }

    pub fn selected(&self) -> Difficulty {
        self.options[self.selected_option_index]
    }

    pub fn up(&mut self) {
        if self.selected_option_index > 0 {
            self.selected_option_index -= 1;
        }
    }

    pub fn down(&mut self) {
        if self.selected_option_index < self.options.len() - 1 {
            self.selected_option_index += 1;
        }
    }
}

impl Page for HomePage {
    fn id(&self) -> PageId {
        PageId::Home
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
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Ok(None);
        }
        let position = Position::new(mouse.column, mouse.row);
        let Some(index) = self.option_rows.iter().position(|row| row.contains(position)) else {
            return Ok(None);
        };
        self.selected_option_index = index;
        Ok(Some(act!(Command::Home(HomeAction::Select))))
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if let Command::Home(command) = action.command {
            match command {
                HomeAction::Up => self.up(),
                HomeAction::Down => self.down(),
                HomeAction::Select => {
                    if let Some(action_tx) = &self.action_tx {
                        action_tx.send(act!(Command::SelectDifficulty(self.selected())))?;
                    }
                },
            }
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, rect: Rect) -> Result<()> {
        f.render_widget(Clear, rect);

        let title_lines: Vec<&str> = TITLE_TEXT.lines().filter(|s| !s.is_empty()).collect();
        let num_title_lines = title_lines.len() as u16;

        let num_options = self.options.len() as u16;
        // heading, blank line, then options separated by blank lines
        let option_height = 2 + num_options * 2 - 1;

        let [title_area, option_area] =
            Layout::vertical(vec![Constraint::Length(num_title_lines), Constraint::Length(option_height)])
                .flex(layout::Flex::SpaceAround)
                .areas(rect);

        // Draw title
        let lines = title_lines.iter().map(|line| Line::from(*line)).collect::<Vec<_>>();
        let paragraph = Paragraph::new(lines).style(Style::default().fg(Color::Yellow)).alignment(Alignment::Center);
        f.render_widget(paragraph, title_area);

        // Draw options, each padded to the widest label
        let labels = self.options.iter().map(|difficulty| difficulty.to_string()).collect::<Vec<_>>();
        let max_label_len = labels.iter().map(|label| label.len()).max().unwrap_or(0);

        let heading = Line::from("Select Difficulty").style(Style::default().add_modifier(Modifier::BOLD));
        let mut lines = vec![heading, Line::from("")];
        for (index, (difficulty, label)) in self.options.iter().zip(labels.iter()).enumerate() {
            let color = difficulty.profile().color;
            let style = if index == self.selected_option_index {
                Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(color)
            };
            lines.push(Line::from(format!("  {label:<max_label_len$}  ")).style(style));
            if index < self.options.len() - 1 {
                lines.push(Line::from(""));
            }
        }

        let paragraph = Paragraph::new(lines).style(Style::default().fg(Color::White)).alignment(Alignment::Center);
        f.render_widget(paragraph, option_area);

        let row_width = max_label_len as u16 + 4;
        self.option_rows = (0..num_options)
            .map(|index| Rect {
                x: option_area.x + option_area.width.saturating_sub(row_width) / 2,
                y: option_area.y + 2 + index * 2,
                width: row_width.min(option_area.width),
                height: 1,
            })
            .filter(|row| row.y < option_area.bottom())
            .collect();

        Ok(())
    }
}
