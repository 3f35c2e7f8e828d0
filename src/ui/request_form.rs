//! Leave request form rendering

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, LeaveField};

/// Renders the leave request form centered on screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let form_area = centered_rect(56, 13, area);

    let form = &app.leave_form;

    let marker = |focused: bool| {
        if focused {
            Span::styled("\u{25B8} ", Style::default().fg(Color::Cyan))
        } else {
            Span::raw("  ")
        }
    };
    let label = |text: &str| Span::styled(format!("{:<12}", text), Style::default().fg(Color::Gray));
    let value_style = |focused: bool| {
        if focused {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        }
    };

    let type_focused = form.focus == LeaveField::LeaveType;
    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            marker(type_focused),
            label("Type"),
            Span::styled(
                format!("\u{25C2} {} \u{25B8}", form.leave_type()),
                value_style(type_focused),
            ),
        ]),
        Line::from(vec![
            marker(form.focus == LeaveField::StartDate),
            label("Start date"),
            Span::styled(
                format!("{}_", form.start_date),
                value_style(form.focus == LeaveField::StartDate),
            ),
            Span::styled("  (YYYY-MM-DD)", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(vec![
            marker(form.focus == LeaveField::EndDate),
            label("End date"),
            Span::styled(
                format!("{}_", form.end_date),
                value_style(form.focus == LeaveField::EndDate),
            ),
            Span::styled("  (YYYY-MM-DD)", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(vec![
            marker(form.focus == LeaveField::Reason),
            label("Reason"),
            Span::styled(
                format!("{}_", form.reason),
                value_style(form.focus == LeaveField::Reason),
            ),
        ]),
        Line::from(""),
    ];

    if let Some(holidays) = &app.holidays {
        let hint = holidays
            .iter()
            .take(3)
            .map(|holiday| format!("{} {}", holiday.date.format("%b %d"), holiday.name))
            .collect::<Vec<_>>()
            .join(" \u{2502} ");
        if !hint.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("Holidays: {}", hint),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    } else {
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "Tab next \u{2502} \u{2190}/\u{2192} type \u{2502} Enter submit \u{2502} Esc back",
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .title(" Request leave ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(
        Paragraph::new(lines).block(block).alignment(Alignment::Left),
        form_area,
    );
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Role, User};
    use crate::cli::StartupConfig;
    use crate::session::Session;
    use ratatui::{backend::TestBackend, Terminal};

    fn test_app() -> App {
        let session = Session::new(User {
            employee_id: "E042".to_string(),
            full_name: "Arada Chaiyasit".to_string(),
            role: Role::Employee,
            department: None,
        });
        let mut app = App::with_session(StartupConfig::default(), Some(session));
        app.take_pending();
        app
    }

    fn buffer_string(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_form_renders_all_fields() {
        let app = test_app();
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal.draw(|frame| render(frame, &app)).unwrap();

        let content = buffer_string(&terminal);
        assert!(content.contains("Request leave"));
        assert!(content.contains("Start date"));
        assert!(content.contains("End date"));
        assert!(content.contains("Reason"));
        assert!(content.contains("annual"), "Default leave type should show");
    }

    #[test]
    fn test_holiday_hint_is_rendered() {
        use crate::assets::Holiday;
        use chrono::NaiveDate;

        let mut app = test_app();
        app.holidays = Some(vec![Holiday {
            date: NaiveDate::from_ymd_opt(2026, 8, 12).unwrap(),
            name: "Mother's Day".to_string(),
        }]);

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        assert!(buffer_string(&terminal).contains("Mother's Day"));
    }

    #[test]
    fn test_form_validation_error_is_rendered() {
        let mut app = test_app();
        app.leave_form.error = Some("A reason is required".to_string());

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        assert!(buffer_string(&terminal).contains("A reason is required"));
    }
}
