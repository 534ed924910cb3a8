//! Confirmation modal for delete and restore

use super::centered_rect;
use crate::app::ConfirmAction;
use ratatui::{prelude::*, widgets::*};

pub fn render(f: &mut Frame, action: &ConfirmAction) {
    let message = action.message();
    let width = (message.len() as u16 + 6).clamp(30, 70);
    let area = centered_rect(width, 5, f.area());
    f.render_widget(Clear, area);

    let body = Paragraph::new(vec![
        Line::from(message),
        Line::from(""),
        Line::from(Span::styled(
            "y confirm · n cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .title(" Confirm ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    f.render_widget(body, area);
}
