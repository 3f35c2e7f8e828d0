//! Command-line interface parsing for leavedesk
//!
//! This module handles parsing of CLI arguments using clap, including the
//! --view flag for opening directly in a specific screen when a saved
//! session exists.

use clap::Parser;
use thiserror::Error;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified view name is not recognized
    #[error("Invalid view: '{0}'. Valid views: dashboard, profile, admin")]
    InvalidView(String),
}

/// Screens the client can open into directly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Profile,
    Admin,
}

impl View {
    /// Parses a view name as typed on the command line
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dashboard" | "dash" => Some(View::Dashboard),
            "profile" => Some(View::Profile),
            "admin" => Some(View::Admin),
            _ => None,
        }
    }
}

/// Leavedesk - employee leave dashboards, requests and admin reports
#[derive(Parser, Debug)]
#[command(name = "leavedesk")]
#[command(about = "Employee leave management from the terminal")]
#[command(version)]
pub struct Cli {
    /// Open directly in a view, skipping the dashboard default
    ///
    /// Examples:
    ///   leavedesk --view dashboard   # Leave summary and history charts
    ///   leavedesk --view profile     # Your employee profile
    ///   leavedesk --view admin       # Admin overview (admins only)
    ///
    /// A saved session is required; without one the login screen opens
    /// first. Valid views: dashboard, profile, admin
    #[arg(long, value_name = "VIEW")]
    pub view: Option<String>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, Default)]
pub struct StartupConfig {
    /// View to open once a session is available
    pub initial_view: Option<View>,
}

/// Parses a view string argument into a View enum.
///
/// # Arguments
/// * `s` - The view string from CLI
///
/// # Returns
/// * `Ok(View)` if the string matches a valid view
/// * `Err(CliError::InvalidView)` if the string doesn't match
pub fn parse_view_arg(s: &str) -> Result<View, CliError> {
    View::from_str(s).ok_or_else(|| CliError::InvalidView(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        match &cli.view {
            None => Ok(StartupConfig::default()),
            Some(view_str) => {
                let view = parse_view_arg(view_str)?;
                Ok(StartupConfig {
                    initial_view: Some(view),
                })
            }
        }
    }
}
