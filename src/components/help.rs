use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    widgets::{Block, BorderType, Borders, Clear, Padding, Row, Table, Widget},
};

use crate::{
    action::ActionState,
    config::{key_event_to_string, PageKeyBindings},
};

type Group = (String, Vec<(String, String)>);

/// Keybinding tables, one bordered group per scope.
#[derive(Debug)]
pub struct Help {
    keybinding_groups: Vec<Group>,
    column_spacing: u16,
    margin_vertical: u16,
    margin_horizontal: u16,
}

impl Help {
    pub fn new(keybinding_groups: Vec<(String, PageKeyBindings)>) -> Self {
        let groups = keybinding_groups
            .into_iter()
            .map(|(group_name, keybindings)| {
                // hold bindings appear once, under their press
                let mut keybindings: Vec<(String, String)> = keybindings
                    .iter()
                    .filter(|(_, action)| action.state == ActionState::Start)
                    .map(|(event, action)| (key_event_to_string(event), action.command.string()))
                    .collect();
                keybindings.sort();
                (group_name, keybindings)
            })
            .collect();

        Self { keybinding_groups: groups, column_spacing: 5, margin_vertical: 1, margin_horizontal: 2 }
    }

    fn render_group(&self, area: Rect, buf: &mut Buffer, group: &Group, key_length: u16, val_length: u16) {
        let (group_name, keybindings) = group;
        let rows: Vec<Row> = keybindings.iter().map(|(key, val)| Row::new(vec![key.clone(), val.clone()])).collect();

        let table = Table::new(rows, [Constraint::Length(key_length), Constraint::Min(val_length)])
            .column_spacing(self.column_spacing)
            .header(Row::new(vec!["Key", "Command"]).style(Style::new().bold()).bottom_margin(1))
            .block(
                Block::new()
                    .title(group_name.clone())
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::new().bold().fg(Color::Cyan))
                    .padding(Padding::symmetric(self.margin_horizontal, self.margin_vertical)),
            );

        Clear.render(area, buf);
        table.render(area, buf);
    }
}

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let key_length = self
            .keybinding_groups
            .iter()
            .flat_map(|(_, bindings)| bindings.iter().map(|(key, _)| key.len()))
            .max()
            .unwrap_or(0) as u16;
        let val_length = self
            .keybinding_groups
            .iter()
            .flat_map(|(_, bindings)| bindings.iter().map(|(_, val)| val.len()))
            .max()
            .unwrap_or(0) as u16;

        // columns, padding and border
        let width = key_length + val_length + self.column_spacing + (self.margin_horizontal * 2) + 2;
        // rows, header with its margin, padding and border
        let heights = self
            .keybinding_groups
            .iter()
            .map(|(_, bindings)| Constraint::Length(bindings.len() as u16 + 2 + (self.margin_vertical * 2) + 2));

        let [area] = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center).areas(area);
        let areas = Layout::vertical(heights).flex(Flex::Center).split(area);

        for (group, group_area) in self.keybinding_groups.iter().zip(areas.iter()) {
            self.render_group(*group_area, buf, group, key_length, val_length);
        }
    }
}
