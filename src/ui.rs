use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Margin, Rect},
    style::{Color, Style},
    text::Text,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::constants::{HEIGHT, WIDTH};

pub const BORDER: Color = Color::Gray;

/// The centered game window, or `None` when the terminal is too small for it.
pub fn playable_screen(area: Rect) -> Option<Rect> {
    if area.width < WIDTH || area.height < HEIGHT {
        return None;
    }
    let [area] = Layout::vertical([Constraint::Length(HEIGHT)]).flex(Flex::Center).areas(area);
    let [area] = Layout::horizontal([Constraint::Length(WIDTH)]).flex(Flex::Center).areas(area);
    Some(area)
}

/// Draws the rounded window border and returns the area inside it.
pub fn render_border(frame: &mut Frame, rect: Rect) -> Rect {
    let border_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(BORDER).bg(Color::Black));
    frame.render_widget(border_block, rect);
    rect.inner(Margin { horizontal: 1, vertical: 1 })
}

pub fn show_resize_screen_message(frame: &mut Frame) {
    let area = frame.area();
    let title_block = Block::default().borders(Borders::ALL).style(Style::default());
    let message = Paragraph::new(Text::styled(
        format!("Please resize the terminal to at least {WIDTH}x{HEIGHT} (now {}x{})", area.width, area.height),
        Style::default().fg(Color::Cyan),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(title_block);
    frame.render_widget(message, area);
}
