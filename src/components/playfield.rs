use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use crate::{
    constants::game,
    pages::game::{object::Bounds, Session},
};

/// Maps world pixels onto the cells of the target area.
#[derive(Debug, Clone, Copy)]
struct Projection {
    area: Rect,
    scale_x: f64,
    scale_y: f64,
}

impl Projection {
    fn new(area: Rect) -> Self {
        Self {
            area,
            scale_x: area.width as f64 / game::WORLD_WIDTH,
            scale_y: area.height as f64 / game::WORLD_HEIGHT,
        }
    }

    fn col(&self, x: f64) -> i32 {
        (x * self.scale_x).floor() as i32
    }

    fn row(&self, y: f64) -> i32 {
        (y * self.scale_y).floor() as i32
    }

    /// Cells covered by a world box, clipped to the area.
    fn cells(&self, bounds: Bounds) -> Option<Rect> {
        let left = self.col(bounds.left).max(0);
        let right = ((bounds.right * self.scale_x).ceil() as i32).min(self.area.width as i32);
        let top = self.row(bounds.top).max(0);
        let bottom = ((bounds.bottom * self.scale_y).ceil() as i32).min(self.area.height as i32);
        if right <= left || bottom <= top {
            return None;
        }

        Some(Rect {
            x: self.area.x + left as u16,
            y: self.area.y + top as u16,
            width: (right - left) as u16,
            height: (bottom - top) as u16,
        })
    }

    /// World x at the middle of a column relative to the area.
    fn world_x(&self, col: u16) -> f64 {
        (col as f64 + 0.5) / self.scale_x
    }
}

fn fill(buf: &mut Buffer, rect: Rect, symbol: &str, style: Style) {
    for y in rect.top()..rect.bottom() {
        for x in rect.left()..rect.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_symbol(symbol).set_style(style);
            }
        }
    }
}

/// Draws the sky, pipes, ground, bird and score of a session.
pub struct Playfield<'a> {
    session: &'a Session,
}

impl<'a> Playfield<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    fn render_pipes(&self, projection: &Projection, buf: &mut Buffer) {
        let Some(profile) = self.session.profile() else {
            return;
        };
        let body = Style::default().fg(game::PIPE_COLOR).bg(game::SKY_COLOR);
        let edge = Style::default().fg(game::PIPE_EDGE_COLOR).bg(game::SKY_COLOR);

        for pipe in self.session.pipes() {
            for segment in [pipe.upper(), pipe.lower(profile.gap_size)] {
                if let Some(rect) = projection.cells(segment) {
                    fill(buf, rect, "█", body);
                    // caps on the gap side
                    let cap_y = if segment.top == 0.0 { rect.bottom() - 1 } else { rect.top() };
                    fill(buf, Rect { y: cap_y, height: 1, ..rect }, "▓", edge);
                }
            }
        }
    }

    fn render_ground(&self, projection: &Projection, area: Rect, buf: &mut Buffer) {
        let top = game::WORLD_HEIGHT - game::GROUND_HEIGHT;
        let Some(rect) = projection.cells(Bounds::new(0.0, top, game::WORLD_WIDTH, game::GROUND_HEIGHT)) else {
            return;
        };

        let offset = self.session.ground_offset();
        for y in rect.top()..rect.bottom() {
            for x in rect.left()..rect.right() {
                let phase = (projection.world_x(x - area.x) - offset).rem_euclid(game::GROUND_TILE);
                let (symbol, style) = if y == rect.top() {
                    ("▀", Style::default().fg(game::GRASS_COLOR).bg(game::GROUND_COLORS[0]))
                } else if phase < game::GROUND_TILE / 2.0 {
                    ("▓", Style::default().fg(game::GROUND_COLORS[0]).bg(game::GROUND_COLORS[1]))
                } else {
                    ("▒", Style::default().fg(game::GROUND_COLORS[1]).bg(game::GROUND_COLORS[0]))
                };
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_symbol(symbol).set_style(style);
                }
            }
        }
    }

    fn render_bird(&self, projection: &Projection, area: Rect, buf: &mut Buffer) {
        let bird = self.session.bird();
        let tilt = bird.tilt();
        let sprite = if tilt < game::RISING_TILT {
            game::BIRD_RISING
        } else if tilt > game::FALLING_TILT {
            game::BIRD_FALLING
        } else {
            game::BIRD_LEVEL
        };

        let style = Style::default().fg(game::BIRD_COLOR).add_modifier(Modifier::BOLD);
        let col = projection.col(game::BIRD_X);
        let row = projection.row(bird.position());
        for (index, line) in sprite.lines().filter(|line| !line.is_empty()).enumerate() {
            let y = row + index as i32;
            if y < 0 || y >= area.height as i32 || col < 0 || col >= area.width as i32 {
                continue;
            }
            let width = area.width as usize - col as usize;
            let (x, y) = (area.x + col as u16, area.y + y as u16);
            for (offset, c) in line.chars().take(width).enumerate() {
                if c.is_whitespace() {
                    continue;
                }
                if let Some(cell) = buf.cell_mut((x + offset as u16, y)) {
                    cell.set_char(c).set_style(style);
                }
            }
        }
    }

    fn render_score(&self, area: Rect, buf: &mut Buffer) {
        if self.session.difficulty().is_none() || area.height < 2 {
            return;
        }
        let text = self.session.score().to_string();
        let x = area.x + area.width.saturating_sub(text.len() as u16) / 2;
        let style = Style::default().fg(Color::White).bg(game::SKY_COLOR).add_modifier(Modifier::BOLD);
        buf.set_stringn(x, area.y + 1, text, area.width as usize, style);
    }
}

impl Widget for Playfield<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        if area.is_empty() {
            return;
        }
        let projection = Projection::new(area);

        fill(buf, area, " ", Style::default().bg(game::SKY_COLOR));
        self.render_pipes(&projection, buf);
        self.render_ground(&projection, area, buf);
        self.render_bird(&projection, area, buf);
        self.render_score(area, buf);
    }
}
