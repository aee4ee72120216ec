use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    widgets::{Block, BorderType, Borders, Clear, Padding, Row, Table, Widget},
};

use crate::{
    action::ActionState,
    config::{key_event_to_string, PageKeyBindings},
};

/// Overlay listing every key binding, one bordered table per group.
#[derive(Debug)]
pub struct Help {
    keybinding_groups: Vec<(String, Vec<(String, String)>)>,
    column_spacing: u16,
    margin_vertical: u16,
    margin_horizontal: u16,
}

impl Help {
    pub fn new(keybinding_groups: Vec<(String, PageKeyBindings)>) -> Self {
        let groups = keybinding_groups
            .into_iter()
            .map(|(group_name, keybindings)| {
                let mut keybindings: Vec<(String, String)> = keybindings
                    .0
                    .into_iter()
                    .filter(|(_, action)| action.state == ActionState::Start)
                    .map(|(event, action)| (key_event_to_string(&event), action.command.string()))
                    .collect();
                keybindings.sort();
                (group_name, keybindings)
            })
            .collect();

        Self { keybinding_groups: groups, column_spacing: 5, margin_vertical: 1, margin_horizontal: 2 }
    }

    fn render_group(
        &self,
        area: Rect,
        buf: &mut Buffer,
        group_name: &str,
        keybindings: &[(String, String)],
        key_length: u16,
        val_length: u16,
    ) {
        let rows: Vec<Row> = keybindings.iter().map(|(key, val)| Row::new(vec![key.clone(), val.clone()])).collect();
        let widths = [Constraint::Length(key_length), Constraint::Min(val_length)];

        let table = Table::new(rows, widths)
            .column_spacing(self.column_spacing)
            .header(Row::new(vec!["Key", "Command"]).style(Style::new().bold()).bottom_margin(1))
            .block(
                Block::new()
                    .title(group_name.to_string())
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
        let longest = |pick: fn(&(String, String)) -> usize| {
            self.keybinding_groups
                .iter()
                .flat_map(|(_, bindings)| bindings.iter().map(pick))
                .max()
                .unwrap_or(0) as u16
        };
        let key_length = longest(|(key, _)| key.len());
        let val_length = longest(|(_, val)| val.len());

        // columns + spacing + padding + border
        let width = key_length + val_length + self.column_spacing + (self.margin_horizontal * 2) + 2;
        // rows + padding + header and its margin + border
        let heights: Vec<Constraint> = self
            .keybinding_groups
            .iter()
            .map(|(_, bindings)| Constraint::Length(bindings.len() as u16 + (self.margin_vertical * 2) + 2 + 2))
            .collect();

        let area = Layout::default()
            .flex(Flex::Center)
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(width)])
            .split(area)[0];

        let areas = Layout::default().flex(Flex::Center).direction(Direction::Vertical).constraints(heights).split(area);

        for ((name, bindings), area) in self.keybinding_groups.iter().zip(areas.iter()) {
            self.render_group(*area, buf, name, bindings, key_length, val_length);
        }
    }
}
