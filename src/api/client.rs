//! Typed client for the leave portal's actions
//!
//! Wraps the request cache with one method per `action` the portal
//! understands. Every JSON response is an envelope carrying `success`;
//! `success: false` is an application error with the server's own message
//! and is surfaced immediately, never retried.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::cache::{RequestCache, RequestOptions};
use super::loading::LoadingIndicator;
use super::transport::Transport;
use super::{AdminDashboard, ApiError, ExportFormat, LeaveRequest, LeaveSummary, Profile, Role, User};

/// Common fields of every portal response
#[derive(Debug, serde::Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Decodes an envelope, then the payload, from the same JSON value
fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    let envelope: Envelope = serde_json::from_value(value.clone())?;
    if !envelope.success {
        return Err(ApiError::Application(
            envelope
                .message
                .unwrap_or_else(|| "The server rejected the request".to_string()),
        ));
    }
    Ok(serde_json::from_value(value)?)
}

/// `action=login` wraps the user record under a `user` key
#[derive(Debug, serde::Deserialize)]
struct LoginPayload {
    user: User,
}

/// `action=getProfile` wraps the profile under a `profile` key
#[derive(Debug, serde::Deserialize)]
struct ProfilePayload {
    profile: Profile,
}

/// Client for the leave portal
pub struct LeaveClient<T> {
    cache: RequestCache<T>,
}

impl<T: Transport> LeaveClient<T> {
    /// Creates a client over the given transport, sharing the loading
    /// indicator with the UI
    pub fn new(transport: T, loading: LoadingIndicator) -> Self {
        Self {
            cache: RequestCache::new(transport, loading),
        }
    }

    /// Creates a client over a pre-configured cache (tests tune the retry
    /// policy this way)
    #[allow(dead_code)]
    pub fn with_cache(cache: RequestCache<T>) -> Self {
        Self { cache }
    }

    /// Access to the underlying transport, shared with the asset store
    pub fn transport(&self) -> &T {
        self.cache.transport()
    }

    /// Authenticates an employee
    ///
    /// Invalid credentials come back as `ApiError::Application` with the
    /// portal's message.
    pub async fn login(&self, employee_id: &str, password: &str) -> Result<User, ApiError> {
        let params = vec![
            ("employeeId".to_string(), employee_id.to_string()),
            ("password".to_string(), password.to_string()),
        ];
        let value = self
            .cache
            .request("login", &params, RequestOptions::with_message("Signing in..."))
            .await?;
        let payload: LoginPayload = decode(value)?;
        Ok(payload.user)
    }

    /// Fetches the dashboard summary for an employee
    pub async fn leave_summary(
        &self,
        employee_id: &str,
        role: Role,
    ) -> Result<LeaveSummary, ApiError> {
        let role = match role {
            Role::Admin => "admin",
            Role::Employee => "employee",
        };
        let params = vec![
            ("employeeId".to_string(), employee_id.to_string()),
            ("role".to_string(), role.to_string()),
        ];
        let value = self
            .cache
            .request(
                "leaveSummary",
                &params,
                RequestOptions::with_message("Loading leave summary..."),
            )
            .await?;
        decode(value)
    }

    /// Submits a new leave request, returning the portal's confirmation
    /// message
    ///
    /// The call flows through the cache like every JSON action, so a
    /// byte-identical resubmission inside the freshness window
    /// short-circuits to the previous confirmation.
    pub async fn submit_leave(&self, request: &LeaveRequest) -> Result<String, ApiError> {
        let value = self
            .cache
            .request(
                "submitLeave",
                &request.to_params(),
                RequestOptions::with_message("Submitting leave request..."),
            )
            .await?;
        let envelope: Envelope = serde_json::from_value(value)?;
        if !envelope.success {
            return Err(ApiError::Application(
                envelope
                    .message
                    .unwrap_or_else(|| "The server rejected the request".to_string()),
            ));
        }
        Ok(envelope
            .message
            .unwrap_or_else(|| "Leave request submitted".to_string()))
    }

    /// Fetches an employee's profile
    pub async fn profile(&self, employee_id: &str) -> Result<Profile, ApiError> {
        let params = vec![("employeeId".to_string(), employee_id.to_string())];
        let value = self
            .cache
            .request(
                "getProfile",
                &params,
                RequestOptions::with_message("Loading profile..."),
            )
            .await?;
        let payload: ProfilePayload = decode(value)?;
        Ok(payload.profile)
    }

    /// Fetches the company-wide overview for admins
    pub async fn admin_dashboard(&self) -> Result<AdminDashboard, ApiError> {
        let value = self
            .cache
            .request(
                "adminDashboard",
                &[],
                RequestOptions::with_message("Loading admin dashboard..."),
            )
            .await?;
        decode(value)
    }

    /// Downloads an exported report as raw bytes
    ///
    /// Reports are binary, so this bypasses the JSON cache and goes straight
    /// to the transport; there is no retry policy on downloads.
    pub async fn export(
        &self,
        format: ExportFormat,
        start: &str,
        end: &str,
        department: &str,
    ) -> Result<Vec<u8>, ApiError> {
        let params = vec![
            ("type".to_string(), format.as_str().to_string()),
            ("start".to_string(), start.to_string()),
            ("end".to_string(), end.to_string()),
            ("department".to_string(), department.to_string()),
        ];
        self.cache.transport().download("export", &params).await
    }
}
