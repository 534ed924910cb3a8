//! Delete history panel
//!
//! The five most recently deleted members, each restorable. The panel
//! collapses entirely while the full history is empty.

use crate::app::{App, Focus};
use ratatui::{prelude::*, widgets::*};

/// Visible while loading or while there is anything to show.
pub fn is_visible(app: &App) -> bool {
    app.caches.history.is_loading() || !app.visible_history().is_empty()
}

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let border_style = if app.focus == Focus::History && app.modal.is_none() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Magenta)
    };
    let block = Block::default()
        .title(" Recently Deleted Members (Last 5) ")
        .borders(Borders::ALL)
        .border_style(border_style);

    if app.caches.history.is_loading() {
        let loading = Paragraph::new("Loading delete history...")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(loading, area);
        return;
    }

    let items: Vec<ListItem> = app
        .visible_history()
        .iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    entry.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(
                        "  ID: {} | {} Membership | Deleted: {}",
                        entry.member_id, entry.membership_type, entry.deletion_date
                    ),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = ListState::default();
    if app.focus == Focus::History {
        state.select(Some(app.history_selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}
