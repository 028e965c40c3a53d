use super::{CommandReport, Completion, SyncError};
use crate::models::UpdateResponse;

/// Issued by [`CommandTracker::begin`]; handed back on completion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CommandTicket {
    pub id: u64,
    pub key: String,
}

/// Pending/result bookkeeping for one card's write command.
///
/// At most one command is in flight per card. A completion is applied only if its ticket is
/// still the pending one and the card is still bound to the ticket's key.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct CommandTracker {
    next_id: u64,
    pending: Option<CommandTicket>,
    report: Option<CommandReport>,
}

impl CommandTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn report(&self) -> Option<&CommandReport> {
        self.report.as_ref()
    }

    /// Start a command for `key`. `None` while another one is pending.
    pub fn begin(&mut self, key: &str) -> Option<CommandTicket> {
        if self.pending.is_some() {
            return None;
        }
        self.next_id = self.next_id.saturating_add(1);
        let ticket = CommandTicket {
            id: self.next_id,
            key: key.to_string(),
        };
        self.pending = Some(ticket.clone());
        self.report = None;
        Some(ticket)
    }

    pub fn complete(
        &mut self,
        ticket: &CommandTicket,
        bound_key: Option<&str>,
        result: Result<UpdateResponse, SyncError>,
    ) -> Completion {
        if self.pending.as_ref() != Some(ticket) {
            return Completion::Stale;
        }
        self.pending = None;
        if bound_key != Some(ticket.key.as_str()) {
            return Completion::Stale;
        }

        match result {
            Ok(resp) => {
                let completion = if resp.success {
                    Completion::Succeeded
                } else {
                    Completion::Rejected
                };
                self.report = Some(CommandReport::Response(resp));
                completion
            }
            Err(e) => {
                self.report = Some(CommandReport::Error(e.to_string()));
                Completion::Rejected
            }
        }
    }

    /// The card moved to another key: forget the pending command and the last message.
    pub fn reset(&mut self) {
        self.pending = None;
        self.report = None;
    }

    pub fn dismiss(&mut self) {
        self.report = None;
    }
}

/// The submit control shows only for a dirty buffer with nothing in flight.
pub(crate) fn submit_visible(dirty: bool, tracker: &CommandTracker) -> bool {
    dirty && !tracker.is_pending()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChildOutcome;
    use crate::sync::EditBuffer;

    fn ok_response(success: bool) -> UpdateResponse {
        UpdateResponse {
            name: Some("Rosa L.f.".to_string()),
            success,
            message: Some(if success { "Updated" } else { "Rejected" }.to_string()),
            children: vec![ChildOutcome {
                name: Some("Rosa alba L.f.".to_string()),
                success,
                message: None,
            }],
        }
    }

    #[test]
    fn test_begin_is_noop_while_pending() {
        let mut t = CommandTracker::new();
        let first = t.begin("wfo-1").expect("first submit");
        assert!(t.is_pending());
        assert!(t.begin("wfo-1").is_none());
        assert_eq!(
            t.complete(&first, Some("wfo-1"), Ok(ok_response(true))),
            Completion::Succeeded
        );
        assert!(t.begin("wfo-1").is_some());
    }

    #[test]
    fn test_submit_hidden_while_pending() {
        let mut t = CommandTracker::new();
        assert!(submit_visible(true, &t));
        assert!(!submit_visible(false, &t));
        t.begin("wfo-1");
        assert!(!submit_visible(true, &t));
    }

    #[test]
    fn test_success_keeps_edit_and_clears_dirty_after_refetch() {
        let mut b: EditBuffer<String> = EditBuffer::new();
        b.on_loaded("wfo-1", Some("L.".to_string()));
        b.on_user_edit("L.f.".to_string());

        let mut t = CommandTracker::new();
        let ticket = t.begin("wfo-1").unwrap();
        let c = t.complete(&ticket, b.bound_key(), Ok(ok_response(true)));
        assert_eq!(c, Completion::Succeeded);

        // Refetch after invalidation.
        b.on_loaded("wfo-1", Some("L.f.".to_string()));
        assert_eq!(b.value(), "L.f.");
        assert!(!submit_visible(b.is_dirty(), &t));
        assert!(matches!(t.report(), Some(r) if r.is_success()));
    }

    #[test]
    fn test_failure_preserves_buffer_and_reports() {
        let mut b: EditBuffer<String> = EditBuffer::new();
        b.on_loaded("wfo-1", Some("L.".to_string()));
        b.on_user_edit("L.f.".to_string());

        let mut t = CommandTracker::new();
        let ticket = t.begin("wfo-1").unwrap();
        let c = t.complete(
            &ticket,
            b.bound_key(),
            Err(SyncError::Command("server unavailable".to_string())),
        );
        assert_eq!(c, Completion::Rejected);
        assert!(!t.is_pending());
        assert_eq!(b.value(), "L.f.");
        assert!(submit_visible(b.is_dirty(), &t));
        assert_eq!(
            t.report().map(|r| r.rows()[0].message.clone()),
            Some(Some("server unavailable".to_string()))
        );
    }

    #[test]
    fn test_rejected_response_shows_children() {
        let mut t = CommandTracker::new();
        let ticket = t.begin("wfo-1").unwrap();
        assert_eq!(
            t.complete(&ticket, Some("wfo-1"), Ok(ok_response(false))),
            Completion::Rejected
        );
        let rows = t.report().unwrap().rows();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| !r.success));
    }

    #[test]
    fn test_response_for_abandoned_key_is_discarded() {
        let mut b: EditBuffer<String> = EditBuffer::new();
        b.on_loaded("wfo-1", Some("L.".to_string()));
        b.on_user_edit("L.f.".to_string());

        let mut t = CommandTracker::new();
        let ticket = t.begin("wfo-1").unwrap();

        // Target key changes before the response lands.
        b.on_target_changed("wfo-2");
        t.reset();
        b.on_loaded("wfo-2", Some("DC.".to_string()));

        let c = t.complete(&ticket, b.bound_key(), Ok(ok_response(true)));
        assert_eq!(c, Completion::Stale);
        assert_eq!(b.value(), "DC.");
        assert!(t.report().is_none());
        assert!(!t.is_pending());
    }

    #[test]
    fn test_unbound_buffer_makes_completion_stale() {
        let mut t = CommandTracker::new();
        let ticket = t.begin("wfo-1").unwrap();
        assert_eq!(t.complete(&ticket, None, Ok(ok_response(true))), Completion::Stale);
        assert!(!t.is_pending());
    }

    #[test]
    fn test_dismiss_clears_report() {
        let mut t = CommandTracker::new();
        let ticket = t.begin("wfo-1").unwrap();
        t.complete(&ticket, Some("wfo-1"), Ok(ok_response(true)));
        t.dismiss();
        assert!(t.report().is_none());
    }
}
