use client::TaskApi;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListState, Paragraph, Wrap},
};
use tasks_protocol::TaskStatus;

use crate::{
    app::{App, DELETE_PROMPT, InputMode, Notice},
    card::card_item,
    modal::{FormField, TaskForm},
    view::{column_title, status_label},
};

const HINTS: &str =
    "[a] add  [enter] menu  [e] edit  [d] delete  [/] search  [f] filter  [r] reload  [q] quit";

fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Todo => Color::Blue,
        TaskStatus::OnProgress => Color::Yellow,
        TaskStatus::Done => Color::Green,
        TaskStatus::TimeOut => Color::Red,
    }
}

pub fn draw<A: TaskApi>(frame: &mut Frame, app: &App<A>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, app, rows[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(20), Constraint::Percentage(80)])
        .split(rows[1]);
    draw_sidebar(frame, app, body[0]);
    draw_columns(frame, app, body[1]);

    draw_status_line(frame, app, rows[2]);

    if let Some(form) = app.active_form() {
        draw_form(frame, form);
    }
    if app.pending_delete.is_some() {
        draw_confirm(frame);
    }
}

fn draw_header<A: TaskApi>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let search_style = if app.input_mode == InputMode::Search {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let search = if app.view.search.is_empty() && app.input_mode != InputMode::Search {
        Span::styled("Search Project", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(app.view.search.clone(), search_style)
    };

    let line = Line::from(vec![
        Span::raw("Search: "),
        search,
        Span::raw("    Filter: "),
        Span::styled(
            app.view.filter.label(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]);
    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(search_style),
    );
    frame.render_widget(header, area);
}

fn draw_sidebar<A: TaskApi>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let counters = app.counters();
    let stats = [
        ("Expired Tasks", counters.expired.to_string(), Color::Red),
        ("All Active Tasks", counters.active.to_string(), Color::LightRed),
        (
            "Completed Tasks",
            format!("{}/{}", counters.completed, counters.total),
            Color::Blue,
        ),
    ];

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    for (i, (label, value, color)) in stats.into_iter().enumerate() {
        let widget = Paragraph::new(Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().title(label).borders(Borders::ALL));
        frame.render_widget(widget, chunks[i]);
    }

    let add = Paragraph::new(Line::from(Span::styled(
        "[a] Add Task",
        Style::default().fg(Color::White).bg(Color::Indexed(17)),
    )))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(add, chunks[3]);
}

fn draw_columns<A: TaskApi>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let columns = app.columns();
    if columns.is_empty() {
        return;
    }
    let (focus_column, focus_row) = app.focus();
    let board_focused = app.active_form().is_none() && app.pending_delete.is_none();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, columns.len() as u32); columns.len()])
        .split(area);

    for (i, column) in columns.iter().enumerate() {
        let focused_column = board_focused && i == focus_column;
        let items: Vec<_> = column
            .tasks
            .iter()
            .enumerate()
            .map(|(row, task)| card_item(task, focused_column && row == focus_row, &app.menu))
            .collect();

        let title = Line::from(vec![
            Span::styled("● ", Style::default().fg(status_color(column.status))),
            Span::styled(
                column_title(column.status),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" ({})", column.tasks.len())),
        ]);
        let border_style = if focused_column {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(status_color(column.status))
        };
        let list = List::new(items).block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border_style),
        );

        let mut state = ListState::default();
        if focused_column && !column.tasks.is_empty() {
            state.select(Some(focus_row));
        }
        frame.render_stateful_widget(list, chunks[i], &mut state);
    }
}

fn draw_status_line<A: TaskApi>(frame: &mut Frame, app: &App<A>, area: Rect) {
    let line = match &app.notice {
        Some(Notice::Info(message)) => {
            Line::from(Span::styled(message.clone(), Style::default().fg(Color::Green)))
        }
        Some(Notice::Error(message)) => {
            Line::from(Span::styled(message.clone(), Style::default().fg(Color::Red)))
        }
        None => Line::from(Span::styled(HINTS, Style::default().fg(Color::DarkGray))),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_form(frame: &mut Frame, form: &TaskForm) {
    let area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = Vec::new();
    for field in [
        FormField::Title,
        FormField::Description,
        FormField::DueDate,
        FormField::Status,
    ] {
        let value = match field {
            FormField::Title => form.title.clone(),
            FormField::Description => form.description.clone(),
            FormField::DueDate => form.due_date.clone(),
            FormField::Status => format!("< {} >", status_label(form.status)),
        };
        let focused = form.focus == field;
        let marker = if focused { "> " } else { "  " };
        let label_style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(
            format!("{marker}{}", field.label()),
            label_style,
        )));
        lines.push(Line::from(format!("    {value}")));
        lines.push(Line::default());
    }

    for error in &form.errors.errors {
        lines.push(Line::from(Span::styled(
            format!("{}: {}", error.field, error.message),
            Style::default().fg(Color::Red),
        )));
    }
    lines.push(Line::from(Span::styled(
        format!("[enter] {}  [tab] next field  [esc] cancel", form.submit_label()),
        Style::default().fg(Color::DarkGray),
    )));

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(form.heading())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(widget, area);
}

fn draw_confirm(frame: &mut Frame) {
    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);
    let widget = Paragraph::new(vec![
        Line::from(DELETE_PROMPT),
        Line::default(),
        Line::from(Span::styled(
            "[y] Yes   [n] No",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title("Delete Task")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(widget, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
