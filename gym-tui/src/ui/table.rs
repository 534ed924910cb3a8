//! Member list table
//!
//! Searchable table of members with derived status badges. Name, email
//! and phone cells highlight every occurrence of the search string.

use crate::app::{App, Focus};
use crate::search::highlight_segments;
use ratatui::{prelude::*, widgets::*};
use shared::MemberStatus;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let border_style = if app.focus == Focus::Members && app.modal.is_none() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    let block = Block::default()
        .title(" Members ")
        .borders(Borders::ALL)
        .border_style(border_style);

    if app.caches.members.is_loading() {
        let loading = Paragraph::new("Loading members...")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(loading, area);
        return;
    }

    let members = app.filtered_members();
    if members.is_empty() {
        let empty = Paragraph::new("No members match your search.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let query = app.search_text();
    let header = Row::new(vec![
        "ID",
        "Name",
        "Email",
        "Phone",
        "Join Date",
        "Membership",
        "Expiry",
        "Status",
        "Trainer",
        "Passes",
    ])
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = members
        .iter()
        .map(|member| {
            let status = member.status();
            Row::new(vec![
                Cell::from(member.id.to_string()),
                Cell::from(highlighted_line(&member.name, &query)),
                Cell::from(highlighted_line(&member.email, &query)),
                Cell::from(highlighted_line(&member.phone, &query)),
                Cell::from(member.join_date.clone()),
                Cell::from(member.membership_type.to_string()),
                Cell::from(member.expiry_date.clone()),
                Cell::from(status_span(status)),
                Cell::from(member.trainer.as_deref().unwrap_or("—").to_string()),
                Cell::from(member.guest_passes.to_string()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Min(12),
            Constraint::Min(18),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(14),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = TableState::default();
    state.select(Some(app.selected));
    f.render_stateful_widget(table, area, &mut state);
}

/// Wrap every occurrence of the search string in the highlight style.
fn highlighted_line(text: &str, query: &str) -> Line<'static> {
    let spans: Vec<Span> = highlight_segments(text, query)
        .into_iter()
        .map(|segment| {
            if segment.highlighted {
                Span::styled(
                    segment.text,
                    Style::default().fg(Color::Black).bg(Color::Yellow),
                )
            } else {
                Span::raw(segment.text)
            }
        })
        .collect();
    Line::from(spans)
}

/// Each status gets its own colour.
fn status_span(status: MemberStatus) -> Span<'static> {
    let style = match status {
        MemberStatus::Active => Style::default().fg(Color::Green),
        MemberStatus::Expired => Style::default().fg(Color::Red),
        MemberStatus::Frozen => Style::default().fg(Color::Blue),
    };
    Span::styled(status.label(), style.add_modifier(Modifier::BOLD))
}
