use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::ListItem,
};
use tasks_protocol::TaskSummary;

use crate::menu::{MenuItem, TaskMenu};

pub fn deadline_label(task: &TaskSummary) -> String {
    format!("Deadline: {}", task.due_date)
}

/// Text lines for one card: title, optional description, deadline.
pub fn card_lines(task: &TaskSummary) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        task.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if !task.description.is_empty() {
        lines.push(Line::from(Span::styled(
            task.description.clone(),
            Style::default().fg(Color::Gray),
        )));
    }
    lines.push(Line::from(Span::styled(
        deadline_label(task),
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

/// A card as a list item. The focused card shows its menu inline when open.
pub fn card_item(task: &TaskSummary, focused: bool, menu: &TaskMenu) -> ListItem<'static> {
    let mut lines = card_lines(task);
    if focused && menu.is_open() {
        let entries: Vec<Span> = MenuItem::ALL
            .into_iter()
            .map(|item| {
                let style = if item == menu.highlighted() {
                    Style::default().fg(Color::Black).bg(Color::Cyan)
                } else if item == MenuItem::Delete {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default()
                };
                Span::styled(format!(" {} ", item.label()), style)
            })
            .collect();
        lines.push(Line::from(entries));
    }
    lines.push(Line::default());

    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    ListItem::new(lines).style(style)
}
