//! Leave-management API layer
//!
//! This module contains everything that talks to the remote leave portal:
//! the wire types mirroring its JSON responses, the `Transport` seam over
//! HTTP, the memoizing `RequestCache`, and the typed `LeaveClient`.

pub mod cache;
pub mod client;
pub mod loading;
pub mod transport;

pub use cache::{CacheKey, RequestCache, RequestOptions};
pub use client::LeaveClient;
pub use loading::{LoadingGuard, LoadingIndicator};
#[allow(unused_imports)]
pub use transport::{HttpTransport, Transport};

use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by the API layer
///
/// `Network` and `Timeout` are transient and retried by the request cache;
/// `Application` (the server answered with `success: false`) and `Decode`
/// are final and surfaced to the caller immediately.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request failed to reach the server or came back non-2xx
    #[error("network error: {0}")]
    Network(String),

    /// Request did not settle within the configured timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The server processed the request and rejected it with a message
    #[error("{0}")]
    Application(String),

    /// The response parsed as JSON but not into the expected shape
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether the request cache should retry after this error
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Timeout(_))
    }

    /// Message suitable for showing to the user
    ///
    /// Application errors carry the server's own wording; everything else
    /// collapses into a generic unreachable-server message.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Application(message) => message.clone(),
            _ => "Cannot reach the leave server. Please try again.".to_string(),
        }
    }
}

/// Role attached to an authenticated user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
}

/// Authenticated user record returned by `action=login`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Employee identifier used as a parameter on subsequent calls
    pub employee_id: String,
    /// Display name
    pub full_name: String,
    pub role: Role,
    #[serde(default)]
    pub department: Option<String>,
}

/// Per-type leave entitlement and usage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveBalance {
    /// Leave type name as the portal spells it (e.g. "annual", "sick")
    #[serde(rename = "type")]
    pub leave_type: String,
    /// Days granted for the current period
    pub entitled: f64,
    /// Days already taken
    pub used: f64,
    /// Days still available
    pub remaining: f64,
}

/// Leave days per year, parallel arrays as the portal serves them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveHistory {
    pub years: Vec<i32>,
    pub days: Vec<f64>,
}

/// Leave days per type, parallel arrays as the portal serves them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveTypeBreakdown {
    pub types: Vec<String>,
    pub counts: Vec<f64>,
}

/// Approval status of a leave record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

/// A single leave entry from the record table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRecord {
    #[serde(rename = "type")]
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: f64,
    pub status: LeaveStatus,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Payload of `action=leaveSummary`: everything the dashboard renders
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveSummary {
    #[serde(default)]
    pub balances: Vec<LeaveBalance>,
    pub history: LeaveHistory,
    pub by_type: LeaveTypeBreakdown,
    pub records: Vec<LeaveRecord>,
}

/// A new leave request entered through the form
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveRequest {
    pub employee_id: String,
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

impl LeaveRequest {
    /// Serializes the request into `action=submitLeave` query parameters
    pub fn to_params(&self) -> Vec<(String, String)> {
        vec![
            ("employeeId".to_string(), self.employee_id.clone()),
            ("type".to_string(), self.leave_type.clone()),
            ("startDate".to_string(), self.start_date.to_string()),
            ("endDate".to_string(), self.end_date.to_string()),
            ("reason".to_string(), self.reason.clone()),
        ]
    }
}

/// Payload of `action=getProfile`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub employee_id: String,
    pub full_name: String,
    pub role: Role,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub join_date: Option<NaiveDate>,
}

/// A leave request awaiting admin review
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRequest {
    pub employee_id: String,
    pub full_name: String,
    #[serde(rename = "type")]
    pub leave_type: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: f64,
}

/// Leave counts per department, parallel arrays as the portal serves them
#[derive(Debug, Clone, Deserialize)]
pub struct DepartmentBreakdown {
    pub departments: Vec<String>,
    pub counts: Vec<f64>,
}

/// Payload of `action=adminDashboard`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub total_employees: u32,
    pub on_leave_today: u32,
    pub pending: Vec<PendingRequest>,
    pub by_department: DepartmentBreakdown,
}

/// Report format for `action=export`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Excel,
    Pdf,
}

impl ExportFormat {
    /// Wire value of the `type` parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Excel => "excel",
            ExportFormat::Pdf => "pdf",
        }
    }

    /// File extension for a downloaded report
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Excel => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }
}
