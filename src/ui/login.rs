//! Sign-in screen rendering

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, LoginField};

/// Renders the sign-in form centered on screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let form_area = centered_rect(46, 12, area);

    let form = &app.login_form;

    let field_line = |label: &str, value: &str, focused: bool| {
        let marker = if focused { "\u{25B8} " } else { "  " };
        let value_style = if focused {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Cyan)),
            Span::styled(format!("{:<12}", label), Style::default().fg(Color::Gray)),
            Span::styled(format!("{}_", value), value_style),
        ])
    };

    let masked_password = "\u{2022}".repeat(form.password.chars().count());

    let mut lines = vec![
        Line::from(Span::styled(
            "LEAVEDESK",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Employee leave management",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        field_line(
            "Employee ID",
            &form.employee_id,
            form.focus == LoginField::EmployeeId,
        ),
        field_line(
            "Password",
            &masked_password,
            form.focus == LoginField::Password,
        ),
        Line::from(""),
    ];

    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    } else {
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "Tab switch \u{2502} Enter sign in \u{2502} Esc quit",
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .title(" Sign in ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, form_area);
}

/// Helper function to create a centered rect
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
