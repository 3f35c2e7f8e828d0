//! Shared loading indicator
//!
//! The request cache shows a loading message while a call is in flight and
//! the UI polls it every frame. Visibility is tied to guard lifetimes so the
//! indicator is released on every exit path, including early returns.

use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
struct LoadingState {
    /// Number of live guards
    active: usize,
    /// Message from the most recent guard that supplied one
    message: Option<String>,
}

/// Cloneable handle to the process-wide loading state
///
/// Constructed once at startup and handed to the request cache and the UI
/// (no module-level globals).
#[derive(Debug, Clone, Default)]
pub struct LoadingIndicator {
    inner: Arc<Mutex<LoadingState>>,
}

impl LoadingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the indicator active until the returned guard is dropped
    pub fn begin(&self, message: Option<&str>) -> LoadingGuard {
        let mut state = self.lock();
        state.active += 1;
        if let Some(message) = message {
            state.message = Some(message.to_string());
        }
        LoadingGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Whether any call is currently in flight
    pub fn is_active(&self) -> bool {
        self.lock().active > 0
    }

    /// The message to display, if one was provided
    pub fn message(&self) -> Option<String> {
        self.lock().message.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LoadingState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// RAII guard keeping the indicator visible
///
/// Dropping the last guard clears the message as well.
#[derive(Debug)]
pub struct LoadingGuard {
    inner: Arc<Mutex<LoadingState>>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let mut state = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        state.active = state.active.saturating_sub(1);
        if state.active == 0 {
            state.message = None;
        }
    }
}
