//! Member edit modal

use super::centered_rect;
use crate::form::{FormField, MemberForm};
use ratatui::{prelude::*, widgets::*};

const LABEL_WIDTH: usize = 18;

pub fn render(f: &mut Frame, form: &MemberForm) {
    // title + 9 fields + error line + hint line + borders
    let area = centered_rect(56, 14, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" {} ", form.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let mut lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|field| field_line(form, *field))
        .collect();

    lines.push(match &form.error {
        Some(error) => Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(""),
    });
    lines.push(Line::from(Span::styled(
        "Enter save · Esc cancel · Tab next · ◂ ▸ change option",
        Style::default().fg(Color::DarkGray),
    )));

    let body = Paragraph::new(lines).block(block);
    f.render_widget(body, area);

    set_cursor(f, form, area);
}

fn field_line(form: &MemberForm, field: FormField) -> Line<'static> {
    let focused = form.focus == field;
    let label_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let marker = if focused { "▸ " } else { "  " };
    let label = format!("{}{:<width$}", marker, field.label(), width = LABEL_WIDTH);

    let value = if field.is_selector() {
        let text = form.selector_value(field);
        if focused {
            format!("◂ {} ▸", text)
        } else {
            text
        }
    } else {
        text_value(form, field).to_string()
    };

    Line::from(vec![
        Span::styled(label, label_style),
        Span::raw(value),
    ])
}

fn text_value(form: &MemberForm, field: FormField) -> &str {
    match field {
        FormField::Name => form.name.value(),
        FormField::Email => form.email.value(),
        FormField::Phone => form.phone.value(),
        FormField::JoinDate => form.join_date.value(),
        FormField::ExpiryDate => form.expiry_date.value(),
        FormField::GuestPasses => form.guest_passes.value(),
        _ => "",
    }
}

/// Place the terminal cursor inside the focused text field.
fn set_cursor(f: &mut Frame, form: &MemberForm, area: Rect) {
    let input = match form.focus {
        FormField::Name => &form.name,
        FormField::Email => &form.email,
        FormField::Phone => &form.phone,
        FormField::JoinDate => &form.join_date,
        FormField::ExpiryDate => &form.expiry_date,
        FormField::GuestPasses => &form.guest_passes,
        _ => return,
    };
    let row = FormField::ALL
        .iter()
        .position(|field| *field == form.focus)
        .unwrap_or(0) as u16;
    let x = area.x + 1 + 2 + LABEL_WIDTH as u16 + input.visual_cursor() as u16;
    let y = area.y + 1 + row;
    f.set_cursor_position((x.min(area.right().saturating_sub(2)), y));
}
