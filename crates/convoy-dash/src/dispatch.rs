//! Retry dispatch reducer.
//!
//! User-triggered resend/batch-retry flows. The dispatcher is pure state: it
//! decides whether a dispatch may proceed and, when the caller reports the
//! outcome, returns the effects to execute (notify, refetch). The caller
//! performs the actual HTTP mutation via `convoy_core::Fetcher`.

use crate::notify::Notification;

/// What a retry dispatch targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryTarget {
    /// Resend one delivery.
    Single(String),
    /// Batch-retry a set of deliveries.
    Batch(Vec<String>),
}

/// Effects returned by the dispatcher for the surface layer to execute.
///
/// The dispatcher never performs I/O or touches list state directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashEffect {
    /// Re-run the current page/filter fetch to refresh displayed state.
    Refetch,
    /// Show a transient notification.
    Notify(Notification),
}

/// Guards and sequences retry mutations.
///
/// The in-flight guard lives here, not on the triggering control: repeated
/// dispatch calls while a mutation is pending are no-ops, so rapid duplicate
/// clicks cannot double-submit even if the UI forgets to disable its button.
#[derive(Debug, Default)]
pub struct RetryDispatcher {
    in_flight: Option<RetryTarget>,
}

impl RetryDispatcher {
    pub fn new() -> Self {
        Self { in_flight: None }
    }

    /// Whether a mutation is currently pending (controls render disabled).
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Requests a retry dispatch.
    ///
    /// Returns the target to execute, or `None` when a dispatch is already
    /// pending (the duplicate trigger is dropped).
    pub fn dispatch(&mut self, target: RetryTarget) -> Option<RetryTarget> {
        if self.in_flight.is_some() {
            tracing::debug!("retry already in flight; ignoring duplicate dispatch");
            return None;
        }
        self.in_flight = Some(target.clone());
        Some(target)
    }

    /// Reports the mutation outcome and re-arms the guard.
    ///
    /// Success yields exactly one success notification and one refetch of
    /// the current page/filter; failure yields exactly one error
    /// notification and no refetch.
    pub fn complete(&mut self, outcome: Result<String, String>) -> Vec<DashEffect> {
        self.in_flight = None;
        match outcome {
            Ok(message) => vec![
                DashEffect::Notify(Notification::success(message)),
                DashEffect::Refetch,
            ],
            Err(message) => vec![DashEffect::Notify(Notification::error(message))],
        }
    }
}
