//! Application state management for leavedesk
//!
//! This module contains the main application state, handling keyboard input,
//! pending API work, and state transitions between the login, dashboard,
//! request-form, profile and admin views.

use std::time::{Duration, Instant};

use chrono::{Datelike, Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent};

use crate::api::transport::api_url_from_env;
use crate::api::{
    AdminDashboard, ExportFormat, HttpTransport, LeaveClient, LeaveRequest, LeaveSummary,
    LoadingIndicator, Profile, Role,
};
use crate::assets::{parse_holidays, AssetManifest, AssetStore, Holiday};
use crate::cli::{StartupConfig, View};
use crate::session::{Session, SessionStore};

/// Leave types offered by the request form, as the portal spells them
pub const LEAVE_TYPES: [&str; 4] = ["annual", "sick", "personal", "unpaid"];

/// How long a notification banner stays on screen
const NOTICE_TTL: Duration = Duration::from_millis(3200);

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Sign-in form
    Login,
    /// Leave summary, charts and record table
    Dashboard,
    /// New leave request form
    RequestLeave,
    /// Employee profile
    Profile,
    /// Company-wide overview (admins only)
    Admin,
}

/// Which login field has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    EmployeeId,
    Password,
}

/// State of the sign-in form
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub employee_id: String,
    pub password: String,
    pub focus: LoginField,
    /// Server rejection or local validation message
    pub error: Option<String>,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            employee_id: String::new(),
            password: String::new(),
            focus: LoginField::EmployeeId,
            error: None,
        }
    }
}

impl LoginForm {
    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::EmployeeId => &mut self.employee_id,
            LoginField::Password => &mut self.password,
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::EmployeeId => LoginField::Password,
            LoginField::Password => LoginField::EmployeeId,
        };
    }
}

/// Which request-form field has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveField {
    LeaveType,
    StartDate,
    EndDate,
    Reason,
}

/// State of the leave request form
#[derive(Debug, Clone)]
pub struct LeaveForm {
    /// Index into `LEAVE_TYPES`
    pub leave_type_index: usize,
    /// Entered as YYYY-MM-DD
    pub start_date: String,
    pub end_date: String,
    pub reason: String,
    pub focus: LeaveField,
    pub error: Option<String>,
}

impl Default for LeaveForm {
    fn default() -> Self {
        Self {
            leave_type_index: 0,
            start_date: String::new(),
            end_date: String::new(),
            reason: String::new(),
            focus: LeaveField::LeaveType,
            error: None,
        }
    }
}

impl LeaveForm {
    /// The currently selected leave type
    pub fn leave_type(&self) -> &'static str {
        LEAVE_TYPES[self.leave_type_index % LEAVE_TYPES.len()]
    }

    fn next_field(&mut self) {
        self.focus = match self.focus {
            LeaveField::LeaveType => LeaveField::StartDate,
            LeaveField::StartDate => LeaveField::EndDate,
            LeaveField::EndDate => LeaveField::Reason,
            LeaveField::Reason => LeaveField::LeaveType,
        };
    }

    fn cycle_type(&mut self, forward: bool) {
        let len = LEAVE_TYPES.len();
        self.leave_type_index = if forward {
            (self.leave_type_index + 1) % len
        } else {
            (self.leave_type_index + len - 1) % len
        };
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            LeaveField::LeaveType => None,
            LeaveField::StartDate => Some(&mut self.start_date),
            LeaveField::EndDate => Some(&mut self.end_date),
            LeaveField::Reason => Some(&mut self.reason),
        }
    }

    /// Validates the entered fields into a request ready for submission
    ///
    /// Checks dates parse as YYYY-MM-DD, the range is not inverted, and a
    /// reason was given. Validation happens before any network call.
    pub fn validate(&self, employee_id: &str) -> Result<LeaveRequest, String> {
        let start = NaiveDate::parse_from_str(self.start_date.trim(), "%Y-%m-%d")
            .map_err(|_| "Start date must be YYYY-MM-DD".to_string())?;
        let end = NaiveDate::parse_from_str(self.end_date.trim(), "%Y-%m-%d")
            .map_err(|_| "End date must be YYYY-MM-DD".to_string())?;
        if end < start {
            return Err("End date must not be before the start date".to_string());
        }
        let reason = self.reason.trim();
        if reason.is_empty() {
            return Err("A reason is required".to_string());
        }
        Ok(LeaveRequest {
            employee_id: employee_id.to_string(),
            leave_type: self.leave_type().to_string(),
            start_date: start,
            end_date: end,
            reason: reason.to_string(),
        })
    }
}

/// A transient banner message
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
    pub shown_at: Instant,
}

/// Asynchronous work requested by key handling and drained by the main loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Login,
    LoadDashboard,
    LoadProfile,
    LoadAdmin,
    LoadHolidays,
    SubmitLeave,
    Export(ExportFormat),
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// The signed-in user, if any
    pub session: Option<Session>,
    pub login_form: LoginForm,
    pub leave_form: LeaveForm,
    /// Last fetched dashboard payload
    pub summary: Option<LeaveSummary>,
    pub profile: Option<Profile>,
    pub admin: Option<AdminDashboard>,
    /// Upcoming holidays from the offline asset cache, shown on the form
    pub holidays: Option<Vec<Holiday>>,
    /// Transient banner shown at the bottom of the screen
    pub notice: Option<Notice>,
    /// Scroll offset into the record table
    pub table_offset: usize,
    /// Shared loading indicator, polled by the renderer
    pub loading: LoadingIndicator,
    pending: Option<PendingAction>,
    session_store: Option<SessionStore>,
    assets: Option<AssetStore>,
    client: LeaveClient<HttpTransport>,
}

impl App {
    /// Creates a new App instance, resuming a persisted session when one
    /// exists
    pub fn new(config: StartupConfig) -> Self {
        let session_store = SessionStore::new();
        let session = session_store.as_ref().and_then(|store| store.load());
        Self::build(config, session_store, session)
    }

    fn build(
        config: StartupConfig,
        session_store: Option<SessionStore>,
        session: Option<Session>,
    ) -> Self {
        let loading = LoadingIndicator::new();
        let api_url = api_url_from_env();
        let client = LeaveClient::new(HttpTransport::new(api_url.as_str()), loading.clone());
        let assets = AssetStore::new(AssetManifest::builtin(&api_url));

        let (state, pending) = match &session {
            Some(session) => {
                let view = config.initial_view.unwrap_or(View::Dashboard);
                match view {
                    View::Admin if session.user.role == Role::Admin => {
                        (AppState::Admin, Some(PendingAction::LoadAdmin))
                    }
                    // Non-admins asking for the admin view land on their
                    // own dashboard.
                    View::Admin | View::Dashboard => {
                        (AppState::Dashboard, Some(PendingAction::LoadDashboard))
                    }
                    View::Profile => (AppState::Profile, Some(PendingAction::LoadProfile)),
                }
            }
            None => (AppState::Login, None),
        };

        Self {
            state,
            should_quit: false,
            show_help: false,
            session,
            login_form: LoginForm::default(),
            leave_form: LeaveForm::default(),
            summary: None,
            profile: None,
            admin: None,
            holidays: None,
            notice: None,
            table_offset: 0,
            loading,
            pending,
            session_store,
            assets,
            client,
        }
    }

    /// Creates an App with a fixed session and no persistence (for testing)
    #[cfg(test)]
    pub fn with_session(config: StartupConfig, session: Option<Session>) -> Self {
        Self::build(config, None, session)
    }

    /// Whether asynchronous work is queued
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Takes the queued action, if any
    pub fn take_pending(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }

    /// Clears expired notices; called once per event-loop iteration
    pub fn tick(&mut self) {
        if let Some(notice) = &self.notice {
            if notice.shown_at.elapsed() >= NOTICE_TTL {
                self.notice = None;
            }
        }
    }

    /// Shows a transient banner
    pub fn notify(&mut self, text: impl Into<String>, is_error: bool) {
        self.notice = Some(Notice {
            text: text.into(),
            is_error,
            shown_at: Instant::now(),
        });
    }

    /// Number of rows in the record table
    fn record_count(&self) -> usize {
        self.summary
            .as_ref()
            .map(|summary| summary.records.len())
            .unwrap_or(0)
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - Login: `Tab` switch field, `Enter` sign in, `Esc` quit
    /// - Dashboard: `r` refresh, `n` new request, `p` profile, `a` admin,
    ///   `j`/`k` scroll records, `l` logout, `q` quit
    /// - Request form: `Tab` next field, `←`/`→` cycle leave type,
    ///   `Enter` submit, `Esc` back
    /// - Profile/Admin: `Esc` back, `r` refresh; Admin adds `e`/`p` exports
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Help overlay intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        match self.state {
            AppState::Login => self.handle_login_key(key_event),
            AppState::Dashboard => self.handle_dashboard_key(key_event),
            AppState::RequestLeave => self.handle_form_key(key_event),
            AppState::Profile => self.handle_profile_key(key_event),
            AppState::Admin => self.handle_admin_key(key_event),
        }
    }

    fn handle_login_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab | KeyCode::Up | KeyCode::Down => {
                self.login_form.toggle_focus();
            }
            KeyCode::Enter => {
                if self.login_form.employee_id.trim().is_empty()
                    || self.login_form.password.is_empty()
                {
                    self.login_form.error =
                        Some("Employee ID and password are required".to_string());
                } else {
                    self.login_form.error = None;
                    self.pending = Some(PendingAction::Login);
                }
            }
            KeyCode::Backspace => {
                self.login_form.focused_mut().pop();
            }
            KeyCode::Char(c) => {
                self.login_form.focused_mut().push(c);
            }
            _ => {}
        }
    }

    fn handle_dashboard_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('r') => {
                self.pending = Some(PendingAction::LoadDashboard);
            }
            KeyCode::Char('n') => {
                self.leave_form = LeaveForm::default();
                self.state = AppState::RequestLeave;
                if self.holidays.is_none() {
                    self.pending = Some(PendingAction::LoadHolidays);
                }
            }
            KeyCode::Char('p') => {
                self.state = AppState::Profile;
                if self.profile.is_none() {
                    self.pending = Some(PendingAction::LoadProfile);
                }
            }
            KeyCode::Char('a') => {
                if self.is_admin() {
                    self.state = AppState::Admin;
                    self.pending = Some(PendingAction::LoadAdmin);
                }
            }
            KeyCode::Char('l') => {
                self.logout();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let max = self.record_count().saturating_sub(1);
                if self.table_offset < max {
                    self.table_offset += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.table_offset = self.table_offset.saturating_sub(1);
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Esc => {
                self.state = AppState::Dashboard;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.leave_form.next_field();
            }
            KeyCode::Left => {
                if self.leave_form.focus == LeaveField::LeaveType {
                    self.leave_form.cycle_type(false);
                }
            }
            KeyCode::Right => {
                if self.leave_form.focus == LeaveField::LeaveType {
                    self.leave_form.cycle_type(true);
                }
            }
            KeyCode::Enter => {
                self.pending = Some(PendingAction::SubmitLeave);
            }
            KeyCode::Backspace => {
                if let Some(field) = self.leave_form.focused_text_mut() {
                    field.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(field) = self.leave_form.focused_text_mut() {
                    field.push(c);
                }
            }
            _ => {}
        }
    }

    fn handle_profile_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Esc => {
                self.state = AppState::Dashboard;
            }
            KeyCode::Char('r') => {
                self.pending = Some(PendingAction::LoadProfile);
            }
            KeyCode::Char('l') => {
                self.logout();
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    fn handle_admin_key(&mut self, key_event: KeyEvent) {
        match key_event.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Esc => {
                self.state = AppState::Dashboard;
            }
            KeyCode::Char('r') => {
                self.pending = Some(PendingAction::LoadAdmin);
            }
            KeyCode::Char('e') => {
                self.pending = Some(PendingAction::Export(ExportFormat::Excel));
            }
            KeyCode::Char('p') => {
                self.pending = Some(PendingAction::Export(ExportFormat::Pdf));
            }
            KeyCode::Char('l') => {
                self.logout();
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    /// Whether the signed-in user has the admin role
    pub fn is_admin(&self) -> bool {
        self.session
            .as_ref()
            .map(|session| session.user.role == Role::Admin)
            .unwrap_or(false)
    }

    /// Clears the persisted session and returns to the login screen
    fn logout(&mut self) {
        if let Some(store) = &self.session_store {
            let _ = store.clear();
        }
        self.session = None;
        self.summary = None;
        self.profile = None;
        self.admin = None;
        self.table_offset = 0;
        self.login_form = LoginForm::default();
        self.state = AppState::Login;
    }

    /// Runs a queued asynchronous action to completion
    pub async fn run_pending(&mut self, action: PendingAction) {
        match action {
            PendingAction::Login => self.run_login().await,
            PendingAction::LoadDashboard => self.load_dashboard().await,
            PendingAction::LoadProfile => self.load_profile().await,
            PendingAction::LoadAdmin => self.load_admin().await,
            PendingAction::LoadHolidays => self.load_holidays().await,
            PendingAction::SubmitLeave => self.run_submit().await,
            PendingAction::Export(format) => self.run_export(format).await,
        }
    }

    async fn run_login(&mut self) {
        let employee_id = self.login_form.employee_id.trim().to_string();
        let password = self.login_form.password.clone();

        match self.client.login(&employee_id, &password).await {
            Ok(user) => {
                let session = Session::new(user);
                if let Some(store) = &self.session_store {
                    let _ = store.save(&session);
                }
                let is_admin = session.user.role == Role::Admin;
                self.session = Some(session);
                self.login_form = LoginForm::default();
                // Admins land on the company overview, everyone else on
                // their own dashboard.
                if is_admin {
                    self.state = AppState::Admin;
                    self.load_admin().await;
                } else {
                    self.state = AppState::Dashboard;
                    self.load_dashboard().await;
                }
            }
            Err(err) => {
                self.login_form.error = Some(err.user_message());
            }
        }
    }

    /// Loads the leave summary and profile concurrently
    async fn load_dashboard(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        let employee_id = session.user.employee_id.clone();
        let role = session.user.role;

        let (summary, profile) = futures::future::join(
            self.client.leave_summary(&employee_id, role),
            self.client.profile(&employee_id),
        )
        .await;

        match summary {
            Ok(summary) => {
                self.summary = Some(summary);
                self.table_offset = 0;
            }
            Err(err) => self.notify(err.user_message(), true),
        }
        if let Ok(profile) = profile {
            self.profile = Some(profile);
        }
    }

    async fn load_profile(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        let employee_id = session.user.employee_id.clone();

        match self.client.profile(&employee_id).await {
            Ok(profile) => self.profile = Some(profile),
            Err(err) => self.notify(err.user_message(), true),
        }
    }

    async fn load_admin(&mut self) {
        match self.client.admin_dashboard().await {
            Ok(dashboard) => self.admin = Some(dashboard),
            Err(err) => self.notify(err.user_message(), true),
        }
    }

    /// Loads the holiday calendar from the offline asset cache
    ///
    /// Best effort: holidays are a static asset served cache-first, and
    /// missing data just hides the hint on the request form.
    async fn load_holidays(&mut self) {
        let Some(store) = self.assets.clone() else {
            return;
        };
        let Some(url) = store
            .manifest()
            .urls
            .iter()
            .find(|url| url.ends_with("holidays.json"))
            .cloned()
        else {
            return;
        };

        if let Ok(bytes) = store.fetch(self.client.transport(), &url).await {
            if let Ok(holidays) = parse_holidays(&bytes) {
                self.holidays = Some(holidays);
            }
        }
    }

    async fn run_submit(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        let request = match self.leave_form.validate(&session.user.employee_id) {
            Ok(request) => request,
            Err(message) => {
                self.leave_form.error = Some(message);
                return;
            }
        };

        match self.client.submit_leave(&request).await {
            Ok(message) => {
                self.notify(message, false);
                self.state = AppState::Dashboard;
                self.pending = Some(PendingAction::LoadDashboard);
            }
            Err(err) => {
                self.leave_form.error = Some(err.user_message());
            }
        }
    }

    async fn run_export(&mut self, format: ExportFormat) {
        let today = Local::now().date_naive();
        let start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);

        match self
            .client
            .export(format, &start.to_string(), &today.to_string(), "")
            .await
        {
            Ok(bytes) => {
                let filename = format!("leave-report-{}.{}", today, format.extension());
                match std::fs::write(&filename, bytes) {
                    Ok(()) => self.notify(format!("Report saved to {}", filename), false),
                    Err(err) => self.notify(format!("Could not save report: {}", err), true),
                }
            }
            Err(err) => self.notify(err.user_message(), true),
        }
    }
}
