//! Leave-history chart widget for inline visualization

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Block characters for different bar heights (8 levels)
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Horizontal cells per year column: one bar, two label digits
const COLUMN_WIDTH: u16 = 3;

/// A compact chart of leave days taken per year
///
/// Renders one scaled block character per year, with two-digit year labels
/// underneath when the area is tall enough.
pub struct HistoryChart<'a> {
    /// Years, parallel to `days`
    years: &'a [i32],
    /// Leave days for each year
    days: &'a [f64],
    /// Style for the bars
    style: Style,
    /// Style for the year labels
    label_style: Style,
}

impl<'a> HistoryChart<'a> {
    pub fn new(years: &'a [i32], days: &'a [f64]) -> Self {
        Self {
            years,
            days,
            style: Style::default().fg(Color::Cyan),
            label_style: Style::default().fg(Color::DarkGray),
        }
    }

    #[allow(dead_code)]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    fn max_days(&self) -> f64 {
        self.days.iter().copied().fold(1.0, f64::max)
    }

    fn days_to_block(&self, days: f64, max: f64) -> char {
        let normalized = (days / max).clamp(0.0, 1.0);
        let index = ((normalized * 7.0).round() as usize).min(7);
        BLOCKS[index]
    }
}

impl<'a> Widget for HistoryChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let max = self.max_days();
        let show_labels = area.height >= 2;

        for (i, days) in self.days.iter().enumerate() {
            let x = area.x + i as u16 * COLUMN_WIDTH;
            if x >= area.x + area.width {
                break;
            }

            let block = self.days_to_block(*days, max);
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(block).set_style(self.style);
            }

            if show_labels {
                if let Some(year) = self.years.get(i) {
                    let label = format!("{:02}", year.rem_euclid(100));
                    for (j, c) in label.chars().enumerate() {
                        let label_x = x + j as u16;
                        if label_x >= area.x + area.width {
                            break;
                        }
                        if let Some(cell) = buf.cell_mut((label_x, area.y + 1)) {
                            cell.set_char(c).set_style(self.label_style);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_to_block_minimum() {
        let chart = HistoryChart::new(&[], &[]);
        assert_eq!(chart.days_to_block(0.0, 15.0), '▁');
    }

    #[test]
    fn test_days_to_block_maximum() {
        let chart = HistoryChart::new(&[], &[]);
        assert_eq!(chart.days_to_block(15.0, 15.0), '█');
    }

    #[test]
    fn test_days_to_block_above_max_clamps() {
        let chart = HistoryChart::new(&[], &[]);
        assert_eq!(chart.days_to_block(99.0, 15.0), '█');
    }

    #[test]
    fn test_max_days_is_at_least_one() {
        // All-zero histories must not divide by zero.
        let days = [0.0, 0.0];
        let chart = HistoryChart::new(&[2025, 2026], &days);
        assert_eq!(chart.max_days(), 1.0);
    }

    #[test]
    fn test_render_draws_bars_and_labels() {
        use ratatui::{backend::TestBackend, Terminal};

        let years = [2024, 2025, 2026];
        let days = [8.0, 12.0, 6.0];

        let backend = TestBackend::new(12, 2);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                frame.render_widget(HistoryChart::new(&years, &days), frame.area());
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content().iter().map(|cell| cell.symbol()).collect();

        assert!(content.contains('█'), "Peak year should render a full bar");
        assert!(content.contains("24"), "Year labels should be drawn");
        assert!(content.contains("26"));
    }
}
