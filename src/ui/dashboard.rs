//! Dashboard screen rendering
//!
//! Renders the signed-in employee's leave summary: balance cards, a
//! days-per-year history chart, the per-type breakdown, and the scrollable
//! record table.

use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::api::{LeaveStatus, LeaveSummary};
use crate::app::App;

use super::widgets::HistoryChart;

/// Color for a leave status badge
fn status_color(status: LeaveStatus) -> Color {
    match status {
        LeaveStatus::Approved => Color::Green,
        LeaveStatus::Pending => Color::Yellow,
        LeaveStatus::Rejected => Color::Red,
    }
}

/// Renders the dashboard screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Length(4), // Balance cards
            Constraint::Length(6), // Charts
            Constraint::Min(4),    // Record table
            Constraint::Length(1), // Help text
        ])
        .split(area);

    render_header(frame, app, chunks[0]);

    match &app.summary {
        Some(summary) => {
            render_balances(frame, summary, chunks[1]);
            render_charts(frame, summary, chunks[2]);
            render_records(frame, app, summary, chunks[3]);
        }
        None => {
            let placeholder = Paragraph::new(Span::styled(
                "No data yet \u{2014} press r to refresh",
                Style::default().fg(Color::DarkGray),
            ));
            frame.render_widget(placeholder, chunks[3]);
        }
    }

    render_help(frame, app, chunks[4]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let now = Local::now();
    let mut spans = vec![
        Span::styled(
            "LEAVEDESK",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            now.format("%a %b %d, %H:%M").to_string(),
            Style::default().fg(Color::White),
        ),
    ];

    if let Some(session) = &app.session {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            session.user.full_name.clone(),
            Style::default().fg(Color::Yellow),
        ));
        if app.is_admin() {
            spans.push(Span::styled(
                " (admin)",
                Style::default().fg(Color::DarkGray),
            ));
        }
    }

    let separator = "\u{2500}".repeat(area.width as usize);
    let lines = vec![
        Line::from(spans),
        Line::from(Span::styled(separator, Style::default().fg(Color::DarkGray))),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_balances(frame: &mut Frame, summary: &LeaveSummary, area: Rect) {
    if summary.balances.is_empty() {
        return;
    }

    let count = summary.balances.len().min(4);
    let constraints = vec![Constraint::Ratio(1, count as u32); count];
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (balance, card) in summary.balances.iter().zip(cards.iter()) {
        let remaining_color = if balance.remaining <= 0.0 {
            Color::Red
        } else if balance.remaining < balance.entitled / 4.0 {
            Color::Yellow
        } else {
            Color::Green
        };

        let lines = vec![
            Line::from(vec![
                Span::styled(
                    format!("{:.0}", balance.remaining),
                    Style::default()
                        .fg(remaining_color)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" / {:.0} days", balance.entitled),
                    Style::default().fg(Color::Gray),
                ),
            ]),
            Line::from(Span::styled(
                format!("{:.0} used", balance.used),
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let block = Block::default()
            .title(format!(" {} ", balance.leave_type))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        frame.render_widget(Paragraph::new(lines).block(block), *card);
    }
}

fn render_charts(frame: &mut Frame, summary: &LeaveSummary, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    // Days per year
    let history_block = Block::default()
        .title(" Leave by year ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = history_block.inner(halves[0]);
    frame.render_widget(history_block, halves[0]);
    frame.render_widget(
        HistoryChart::new(&summary.history.years, &summary.history.days),
        inner,
    );

    // Days per type, as labelled horizontal bars
    let max_count = summary.by_type.counts.iter().copied().fold(1.0, f64::max);
    let mut lines = Vec::new();
    for (leave_type, count) in summary.by_type.types.iter().zip(&summary.by_type.counts) {
        let bar_len = ((count / max_count) * 12.0).round() as usize;
        lines.push(Line::from(vec![
            Span::styled(format!("{:<9}", leave_type), Style::default().fg(Color::Gray)),
            Span::styled("\u{2588}".repeat(bar_len.max(1)), Style::default().fg(Color::Cyan)),
            Span::styled(format!(" {:.0}", count), Style::default().fg(Color::White)),
        ]));
    }

    let type_block = Block::default()
        .title(" Leave by type ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(lines).block(type_block), halves[1]);
}

fn render_records(frame: &mut Frame, app: &App, summary: &LeaveSummary, area: Rect) {
    let rows: Vec<Row> = summary
        .records
        .iter()
        .skip(app.table_offset)
        .map(|record| {
            Row::new(vec![
                Cell::from(record.leave_type.clone()),
                Cell::from(record.start_date.to_string()),
                Cell::from(record.end_date.to_string()),
                Cell::from(format!("{:.1}", record.days)),
                Cell::from(Span::styled(
                    format!("{:?}", record.status).to_lowercase(),
                    Style::default().fg(status_color(record.status)),
                )),
                Cell::from(record.reason.clone().unwrap_or_default()),
            ])
        })
        .collect();

    let header = Row::new(vec!["Type", "Start", "End", "Days", "Status", "Reason"]).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(6),
            Constraint::Length(10),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(format!(" Leave records ({}) ", summary.records.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    frame.render_widget(table, area);
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(" Refresh  "),
        Span::styled("n", Style::default().fg(Color::Yellow)),
        Span::raw(" New request  "),
        Span::styled("p", Style::default().fg(Color::Yellow)),
        Span::raw(" Profile  "),
    ];
    if app.is_admin() {
        spans.push(Span::styled("a", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(" Admin  "));
    }
    spans.extend([
        Span::styled("l", Style::default().fg(Color::Yellow)),
        Span::raw(" Logout  "),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::raw(" Help  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" Quit"),
    ]);

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{LeaveBalance, LeaveHistory, LeaveRecord, LeaveTypeBreakdown, Role, User};
    use crate::cli::StartupConfig;
    use crate::session::Session;
    use chrono::NaiveDate;
    use ratatui::{backend::TestBackend, Terminal};

    fn test_summary() -> LeaveSummary {
        LeaveSummary {
            balances: vec![LeaveBalance {
                leave_type: "annual".to_string(),
                entitled: 15.0,
                used: 6.0,
                remaining: 9.0,
            }],
            history: LeaveHistory {
                years: vec![2024, 2025, 2026],
                days: vec![8.0, 12.0, 6.0],
            },
            by_type: LeaveTypeBreakdown {
                types: vec!["annual".to_string(), "sick".to_string()],
                counts: vec![4.0, 2.0],
            },
            records: vec![LeaveRecord {
                leave_type: "annual".to_string(),
                start_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 3, 6).unwrap(),
                days: 5.0,
                status: LeaveStatus::Approved,
                reason: Some("Family trip".to_string()),
            }],
        }
    }

    fn test_app() -> App {
        let session = Session::new(User {
            employee_id: "E042".to_string(),
            full_name: "Arada Chaiyasit".to_string(),
            role: Role::Employee,
            department: None,
        });
        let mut app = App::with_session(StartupConfig::default(), Some(session));
        app.take_pending();
        app.summary = Some(test_summary());
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
    fn test_dashboard_renders_summary() {
        let app = test_app();
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal.draw(|frame| render(frame, &app)).unwrap();

        let content = buffer_string(&terminal);
        assert!(content.contains("Arada Chaiyasit"));
        assert!(content.contains("Leave by year"));
        assert!(content.contains("Leave by type"));
        assert!(content.contains("Leave records"));
        assert!(content.contains("Family trip"));
    }

    #[test]
    fn test_dashboard_without_data_shows_placeholder() {
        let mut app = test_app();
        app.summary = None;

        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        assert!(buffer_string(&terminal).contains("press r to refresh"));
    }

    #[test]
    fn test_status_colors() {
        assert_eq!(status_color(LeaveStatus::Approved), Color::Green);
        assert_eq!(status_color(LeaveStatus::Pending), Color::Yellow);
        assert_eq!(status_color(LeaveStatus::Rejected), Color::Red);
    }
}
