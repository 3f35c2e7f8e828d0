//! UI rendering module for leavedesk
//!
//! This module contains all the rendering logic for the terminal user
//! interface, using the ratatui library for TUI components. Each view gets
//! its own render function; the notice banner and loading overlay are drawn
//! on top by the main loop.

pub mod admin;
pub mod dashboard;
pub mod help_overlay;
pub mod login;
pub mod profile;
pub mod request_form;
pub mod widgets;

pub use admin::render as render_admin;
pub use dashboard::render as render_dashboard;
pub use help_overlay::render as render_help_overlay;
pub use login::render as render_login;
pub use profile::render as render_profile;
pub use request_form::render as render_request_form;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Span,
    widgets::Paragraph,
    Frame,
};

use crate::api::LoadingIndicator;
use crate::app::Notice;

/// Renders the transient banner on the bottom line
pub fn render_notice(frame: &mut Frame, notice: &Notice) {
    let area = frame.area();
    if area.height == 0 {
        return;
    }
    let line_area = Rect::new(area.x, area.y + area.height - 1, area.width, 1);

    let style = if notice.is_error {
        Style::default().fg(Color::White).bg(Color::Red)
    } else {
        Style::default().fg(Color::Black).bg(Color::Green)
    };

    let paragraph = Paragraph::new(Span::styled(format!(" {} ", notice.text), style));
    frame.render_widget(paragraph, line_area);
}

/// Renders the loading message while an API call is queued or in flight
pub fn render_loading_overlay(frame: &mut Frame, loading: &LoadingIndicator) {
    let area = frame.area();
    if area.height < 2 {
        return;
    }
    let line_area = Rect::new(area.x, area.y + area.height - 2, area.width, 1);

    let message = loading
        .message()
        .unwrap_or_else(|| "Loading...".to_string());
    let paragraph = Paragraph::new(Span::styled(
        format!(" {} ", message),
        Style::default().fg(Color::Cyan),
    ));
    frame.render_widget(paragraph, line_area);
}
