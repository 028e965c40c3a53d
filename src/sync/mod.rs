//! Edit-synchronization controllers shared by the editable cards.
//!
//! Everything here is plain state with no reactive or network types, so the rules for
//! binding, dirtiness, command completion and optimistic toggles are testable natively.
//! The cards own these inside signals and drive them from effects and event handlers.

mod edit_buffer;
mod freshness;
mod optimistic;
mod submitter;
mod visibility;

pub(crate) use edit_buffer::{is_dirty, EditBuffer};
pub(crate) use freshness::FetchMarker;
pub(crate) use optimistic::{OptimisticToggle, ToggleCache, ToggleIntent, TogglePhase};
pub(crate) use submitter::{submit_visible, CommandTicket, CommandTracker};
pub(crate) use visibility::{authors_visibility, hybrid_visibility, Visibility};

use crate::api::ApiError;
use crate::models::{ChildOutcome, UpdateResponse};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum SyncError {
    /// Query failed; the card keeps whatever it showed before.
    #[error("Could not load name: {0}")]
    Fetch(String),
    /// Write failed or was rejected; the buffer is kept for a retry.
    #[error("{0}")]
    Command(String),
}

impl SyncError {
    pub fn fetch(e: &ApiError) -> Self {
        Self::Fetch(e.to_string())
    }

    pub fn command(e: &ApiError) -> Self {
        Self::Command(e.to_string())
    }
}

/// What happened to a command completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Completion {
    /// Issued for a key the card no longer shows; dropped.
    Stale,
    /// A newer toggle is in flight; this outcome does not decide anything.
    Superseded,
    Succeeded,
    Rejected,
}

/// Last command result shown in a card's message area.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum CommandReport {
    Response(UpdateResponse),
    Error(String),
}

impl CommandReport {
    pub fn is_success(&self) -> bool {
        matches!(self, CommandReport::Response(r) if r.success)
    }

    /// Primary outcome followed by every cascading child outcome.
    pub fn rows(&self) -> Vec<ChildOutcome> {
        match self {
            CommandReport::Response(r) => r.outcomes(),
            CommandReport::Error(msg) => vec![ChildOutcome {
                name: None,
                success: false,
                message: Some(msg.clone()),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_report_is_single_failed_row() {
        let r = CommandReport::Error("boom".to_string());
        assert!(!r.is_success());
        let rows = r.rows();
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].success);
        assert_eq!(rows[0].message.as_deref(), Some("boom"));
    }

    #[test]
    fn test_sync_error_display() {
        assert_eq!(
            SyncError::Fetch("timeout".to_string()).to_string(),
            "Could not load name: timeout"
        );
        assert_eq!(SyncError::Command("denied".to_string()).to_string(), "denied");
    }
}
