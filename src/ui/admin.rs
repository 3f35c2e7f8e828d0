//! Admin overview rendering
//!
//! Renders the company-wide dashboard for admins: headcount stats, pending
//! leave requests, and the per-department breakdown, plus export controls.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::api::AdminDashboard;
use crate::app::App;

/// Renders the admin screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Stat cards
            Constraint::Min(4),    // Pending table
            Constraint::Length(6), // Department breakdown
            Constraint::Length(1), // Help text
        ])
        .split(area);

    match &app.admin {
        Some(dashboard) => {
            render_stats(frame, dashboard, chunks[0]);
            render_pending(frame, dashboard, chunks[1]);
            render_departments(frame, dashboard, chunks[2]);
        }
        None => {
            let placeholder = Paragraph::new(Span::styled(
                "No data yet \u{2014} press r to refresh",
                Style::default().fg(Color::DarkGray),
            ));
            frame.render_widget(placeholder, chunks[1]);
        }
    }

    render_help(frame, chunks[3]);
}

fn stat_card(frame: &mut Frame, title: &str, value: String, color: Color, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let paragraph = Paragraph::new(Span::styled(
        value,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
    .block(block);
    frame.render_widget(paragraph, area);
}

fn render_stats(frame: &mut Frame, dashboard: &AdminDashboard, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    stat_card(
        frame,
        "Employees",
        dashboard.total_employees.to_string(),
        Color::Cyan,
        cards[0],
    );
    stat_card(
        frame,
        "On leave today",
        dashboard.on_leave_today.to_string(),
        Color::Yellow,
        cards[1],
    );
    stat_card(
        frame,
        "Pending requests",
        dashboard.pending.len().to_string(),
        if dashboard.pending.is_empty() {
            Color::Green
        } else {
            Color::Red
        },
        cards[2],
    );
}

fn render_pending(frame: &mut Frame, dashboard: &AdminDashboard, area: Rect) {
    let rows: Vec<Row> = dashboard
        .pending
        .iter()
        .map(|request| {
            Row::new(vec![
                Cell::from(request.employee_id.clone()),
                Cell::from(request.full_name.clone()),
                Cell::from(request.leave_type.clone()),
                Cell::from(request.start_date.to_string()),
                Cell::from(request.end_date.to_string()),
                Cell::from(format!("{:.1}", request.days)),
            ])
        })
        .collect();

    let header = Row::new(vec!["ID", "Name", "Type", "Start", "End", "Days"]).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Min(16),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(" Pending requests ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    frame.render_widget(table, area);
}

fn render_departments(frame: &mut Frame, dashboard: &AdminDashboard, area: Rect) {
    let breakdown = &dashboard.by_department;
    let max_count = breakdown.counts.iter().copied().fold(1.0, f64::max);

    let mut lines = Vec::new();
    for (department, count) in breakdown.departments.iter().zip(&breakdown.counts) {
        let bar_len = ((count / max_count) * 16.0).round() as usize;
        lines.push(Line::from(vec![
            Span::styled(format!("{:<14}", department), Style::default().fg(Color::Gray)),
            Span::styled("\u{2588}".repeat(bar_len.max(1)), Style::default().fg(Color::Cyan)),
            Span::styled(format!(" {:.0}", count), Style::default().fg(Color::White)),
        ]));
    }

    let block = Block::default()
        .title(" Leave days by department ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let help = Line::from(vec![
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(" Refresh  "),
        Span::styled("e", Style::default().fg(Color::Yellow)),
        Span::raw(" Export Excel  "),
        Span::styled("p", Style::default().fg(Color::Yellow)),
        Span::raw(" Export PDF  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" Back  "),
        Span::styled("l", Style::default().fg(Color::Yellow)),
        Span::raw(" Logout  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" Quit"),
    ]);
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{DepartmentBreakdown, PendingRequest, Role, User};
    use crate::cli::StartupConfig;
    use crate::session::Session;
    use chrono::NaiveDate;
    use ratatui::{backend::TestBackend, Terminal};

    fn test_app() -> App {
        let session = Session::new(User {
            employee_id: "E001".to_string(),
            full_name: "Admin".to_string(),
            role: Role::Admin,
            department: None,
        });
        let mut app = App::with_session(StartupConfig::default(), Some(session));
        app.take_pending();
        app.admin = Some(AdminDashboard {
            total_employees: 87,
            on_leave_today: 4,
            pending: vec![PendingRequest {
                employee_id: "E013".to_string(),
                full_name: "Somchai Preecha".to_string(),
                leave_type: "sick".to_string(),
                start_date: NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 8, 7).unwrap(),
                days: 2.0,
            }],
            by_department: DepartmentBreakdown {
                departments: vec!["Finance".to_string(), "IT".to_string()],
                counts: vec![12.0, 19.0],
            },
        });
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
    fn test_admin_renders_stats_and_tables() {
        let app = test_app();
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal.draw(|frame| render(frame, &app)).unwrap();

        let content = buffer_string(&terminal);
        assert!(content.contains("87"));
        assert!(content.contains("Pending requests"));
        assert!(content.contains("Somchai Preecha"));
        assert!(content.contains("Finance"));
        assert!(content.contains("Export Excel"));
    }

    #[test]
    fn test_admin_placeholder_without_data() {
        let mut app = test_app();
        app.admin = None;

        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        assert!(buffer_string(&terminal).contains("press r to refresh"));
    }
}
