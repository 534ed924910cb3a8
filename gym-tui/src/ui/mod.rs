//! Terminal UI rendering
//!
//! Pure render functions over the [`App`](crate::app::App) view state.
//! Layout, top to bottom: navigation header, search box, results line,
//! member table, delete-history panel (hidden while the history is
//! empty), footer. Modals draw last, over a cleared centered rect.

mod confirm;
mod form;
mod history;
mod table;

use crate::app::{App, Focus, Modal};
use ratatui::{prelude::*, widgets::*};

pub fn draw(f: &mut Frame, app: &App) {
    let show_history = history::is_visible(app);

    let mut constraints = vec![
        Constraint::Length(3), // nav header
        Constraint::Length(3), // search box
        Constraint::Length(1), // results line
        Constraint::Min(5),    // member table
    ];
    if show_history {
        constraints.push(Constraint::Length(7));
    }
    constraints.push(Constraint::Length(2)); // footer

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    draw_header(f, chunks[0]);
    draw_search(f, chunks[1], app);
    draw_results_line(f, chunks[2], app);
    table::render(f, chunks[3], app);
    if show_history {
        history::render(f, chunks[4], app);
    }
    draw_footer(f, chunks[chunks.len() - 1], app);

    match &app.modal {
        Some(Modal::Form(member_form)) => form::render(f, member_form),
        Some(Modal::Confirm(action)) => confirm::render(f, action),
        None => {}
    }
}

/// Static navigation shell; no state affecting data.
fn draw_header(f: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            " GYM SYSTEM ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | Home "),
        Span::styled(
            " Members ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::UNDERLINED),
        ),
        Span::raw(" Contact "),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(title, area);
}

fn draw_search(f: &mut Frame, area: Rect, app: &App) {
    let style = if app.searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let placeholder = app.search.value().is_empty() && !app.searching;
    let content = if placeholder {
        Span::styled(
            "Search members by any field...",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::raw(app.search.value())
    };

    let width = area.width.max(3) - 3;
    let scroll = app.search.visual_scroll(width as usize);
    let search = Paragraph::new(Line::from(content))
        .style(style)
        .scroll((0, scroll as u16))
        .block(Block::default().borders(Borders::ALL).title(" Search (/) "));
    f.render_widget(search, area);

    if app.searching {
        f.set_cursor_position((
            area.x + ((app.search.visual_cursor().max(scroll) - scroll) as u16) + 1,
            area.y + 1,
        ));
    }
}

fn draw_results_line(f: &mut Frame, area: Rect, app: &App) {
    let text = if app.caches.members.is_loading() {
        "Loading...".to_string()
    } else {
        let shown = app.filtered_members().len();
        if shown == 0 {
            "No members found".to_string()
        } else {
            format!("Showing {} of {} members", shown, app.total_members())
        }
    };
    let line = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    f.render_widget(line, area);
}

fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    if let Some(notice) = &app.notice {
        let style = if notice.error {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };
        let text = format!("{} (Esc to dismiss)", notice.text);
        f.render_widget(Paragraph::new(text).style(style), rows[0]);
    }

    let hints = match app.focus {
        Focus::Members => "/ search · a add · e edit · d delete · Tab history · R refresh · q quit",
        Focus::History => "r restore · Tab members · R refresh · q quit",
    };
    let help = Paragraph::new(hints).style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, rows[1]);
}

/// Centered rect for modal overlays.
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
