//! Profile screen rendering

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

/// Renders the employee profile screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{:<14}", label), Style::default().fg(Color::Gray)),
            Span::styled(value, Style::default().fg(Color::White)),
        ])
    };

    let lines = match &app.profile {
        Some(profile) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    profile.full_name.clone(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                row("Employee ID", profile.employee_id.clone()),
                row("Role", format!("{:?}", profile.role).to_lowercase()),
            ];
            if let Some(department) = &profile.department {
                lines.push(row("Department", department.clone()));
            }
            if let Some(email) = &profile.email {
                lines.push(row("Email", email.clone()));
            }
            if let Some(phone) = &profile.phone {
                lines.push(row("Phone", phone.clone()));
            }
            if let Some(join_date) = &profile.join_date {
                lines.push(row("Joined", join_date.to_string()));
            }
            lines
        }
        None => vec![Line::from(Span::styled(
            "No profile loaded \u{2014} press r to refresh",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let block = Block::default()
        .title(" Profile ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Paragraph::new(lines).block(block), chunks[0]);

    let help = Line::from(vec![
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(" Refresh  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" Back  "),
        Span::styled("l", Style::default().fg(Color::Yellow)),
        Span::raw(" Logout  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" Quit"),
    ]);
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        chunks[1],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Profile, Role, User};
    use crate::cli::StartupConfig;
    use crate::session::Session;
    use ratatui::{backend::TestBackend, Terminal};

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
    fn test_profile_renders_fields() {
        let session = Session::new(User {
            employee_id: "E042".to_string(),
            full_name: "Arada Chaiyasit".to_string(),
            role: Role::Employee,
            department: None,
        });
        let mut app = App::with_session(StartupConfig::default(), Some(session));
        app.take_pending();
        app.profile = Some(Profile {
            employee_id: "E042".to_string(),
            full_name: "Arada Chaiyasit".to_string(),
            role: Role::Employee,
            department: Some("Finance".to_string()),
            email: Some("arada@example.com".to_string()),
            phone: None,
            join_date: None,
        });

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let content = buffer_string(&terminal);
        assert!(content.contains("Arada Chaiyasit"));
        assert!(content.contains("Finance"));
        assert!(content.contains("arada@example.com"));
    }

    #[test]
    fn test_profile_placeholder_without_data() {
        let mut app = App::with_session(StartupConfig::default(), None);
        app.take_pending();

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        assert!(buffer_string(&terminal).contains("No profile loaded"));
    }
}
