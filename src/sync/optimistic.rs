use super::{CommandReport, Completion, SyncError};
use crate::models::UpdateResponse;
use tracing::{debug, warn};

/// Cache operations the toggle protocol is allowed to use: read the flag, flip it.
pub(crate) trait ToggleCache {
    fn hybrid_flag(&self, placement_id: &str) -> Option<bool>;

    /// Relative patch. Returns the new value, `None` when the placement is not cached.
    fn flip_hybrid(&mut self, placement_id: &str) -> Option<bool>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum TogglePhase {
    #[default]
    Idle,
    Pending,
    Confirmed,
    RolledBack,
}

/// One optimistic flip and the command that backs it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ToggleIntent {
    pub seq: u64,
    /// Binding generation the toggle was issued under.
    pub generation: u64,
    pub key: String,
    pub placement_id: String,
    pub before: bool,
    pub after: bool,
}

/// Idle → Pending → {Confirmed, RolledBack}, one instance per toggle card.
///
/// Every toggle flips the cache right away and gets its own sequence number. Only the
/// newest toggle's outcome moves the phase; earlier outcomes are ignored.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct OptimisticToggle {
    phase: TogglePhase,
    bound_key: Option<String>,
    generation: u64,
    latest_seq: u64,
    report: Option<CommandReport>,
}

impl OptimisticToggle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> TogglePhase {
        self.phase
    }

    pub fn is_pending(&self) -> bool {
        self.phase == TogglePhase::Pending
    }

    pub fn report(&self) -> Option<&CommandReport> {
        self.report.as_ref()
    }

    pub fn dismiss(&mut self) {
        self.report = None;
    }

    /// Rebind to `key`; anything in flight under an earlier binding becomes stale, including
    /// commands issued for the same key before the card moved away and came back.
    pub fn bind(&mut self, key: &str) {
        if self.bound_key.as_deref() != Some(key) {
            self.generation = self.generation.saturating_add(1);
            self.phase = TogglePhase::Idle;
            self.report = None;
            self.bound_key = Some(key.to_string());
        }
    }

    pub fn toggle(
        &mut self,
        cache: &mut impl ToggleCache,
        key: &str,
        placement_id: &str,
    ) -> Option<ToggleIntent> {
        self.bind(key);
        let before = cache.hybrid_flag(placement_id)?;
        let after = cache.flip_hybrid(placement_id)?;

        self.latest_seq = self.latest_seq.saturating_add(1);
        self.phase = TogglePhase::Pending;
        self.report = None;

        Some(ToggleIntent {
            seq: self.latest_seq,
            generation: self.generation,
            key: key.to_string(),
            placement_id: placement_id.to_string(),
            before,
            after,
        })
    }

    pub fn complete(
        &mut self,
        cache: &mut impl ToggleCache,
        intent: &ToggleIntent,
        current_key: &str,
        result: Result<UpdateResponse, SyncError>,
    ) -> Completion {
        if intent.generation != self.generation
            || self.bound_key.as_deref() != Some(intent.key.as_str())
            || current_key != intent.key
        {
            debug!(key = %intent.key, "discarding hybrid status response for abandoned key");
            return Completion::Stale;
        }
        if intent.seq != self.latest_seq {
            debug!(seq = intent.seq, latest = self.latest_seq, "hybrid toggle superseded");
            return Completion::Superseded;
        }

        let (succeeded, report) = match result {
            Ok(resp) => (resp.success, CommandReport::Response(resp)),
            Err(e) => (false, CommandReport::Error(e.to_string())),
        };
        self.report = Some(report);

        if succeeded {
            self.phase = TogglePhase::Confirmed;
            return Completion::Succeeded;
        }

        // Only undo our own flip; a refetch may already have put the real value back.
        if cache.hybrid_flag(&intent.placement_id) == Some(intent.after) {
            cache.flip_hybrid(&intent.placement_id);
        }
        warn!(placement = %intent.placement_id, restored = intent.before, "hybrid status rolled back");
        self.phase = TogglePhase::RolledBack;
        Completion::Rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapCache(HashMap<String, bool>);

    impl ToggleCache for MapCache {
        fn hybrid_flag(&self, placement_id: &str) -> Option<bool> {
            self.0.get(placement_id).copied()
        }

        fn flip_hybrid(&mut self, placement_id: &str) -> Option<bool> {
            let v = self.0.get_mut(placement_id)?;
            *v = !*v;
            Some(*v)
        }
    }

    fn cache_with(pid: &str, v: bool) -> MapCache {
        let mut c = MapCache::default();
        c.0.insert(pid.to_string(), v);
        c
    }

    fn response(success: bool) -> UpdateResponse {
        UpdateResponse {
            name: Some("Rosa ×alba".to_string()),
            success,
            message: Some(if success { "Saved" } else { "Not permitted" }.to_string()),
            children: vec![],
        }
    }

    #[test]
    fn test_toggle_flips_cache_synchronously() {
        let mut cache = cache_with("7", false);
        let mut t = OptimisticToggle::new();
        let intent = t.toggle(&mut cache, "wfo-1", "7").expect("cached placement");
        assert_eq!(cache.hybrid_flag("7"), Some(true));
        assert_eq!(t.phase(), TogglePhase::Pending);
        assert!(!intent.before);
        assert!(intent.after);
    }

    #[test]
    fn test_success_confirms_without_touching_cache() {
        let mut cache = cache_with("7", false);
        let mut t = OptimisticToggle::new();
        let intent = t.toggle(&mut cache, "wfo-1", "7").unwrap();
        let c = t.complete(&mut cache, &intent, "wfo-1", Ok(response(true)));
        assert_eq!(c, Completion::Succeeded);
        assert_eq!(t.phase(), TogglePhase::Confirmed);
        assert_eq!(cache.hybrid_flag("7"), Some(true));
    }

    #[test]
    fn test_failure_rolls_back_and_reports() {
        let mut cache = cache_with("7", false);
        let mut t = OptimisticToggle::new();
        let intent = t.toggle(&mut cache, "wfo-1", "7").unwrap();
        let c = t.complete(&mut cache, &intent, "wfo-1", Ok(response(false)));
        assert_eq!(c, Completion::Rejected);
        assert_eq!(t.phase(), TogglePhase::RolledBack);
        assert_eq!(cache.hybrid_flag("7"), Some(false));
        assert!(matches!(t.report(), Some(r) if !r.is_success()));
    }

    #[test]
    fn test_transport_error_rolls_back() {
        let mut cache = cache_with("7", true);
        let mut t = OptimisticToggle::new();
        let intent = t.toggle(&mut cache, "wfo-1", "7").unwrap();
        assert_eq!(cache.hybrid_flag("7"), Some(false));
        t.complete(
            &mut cache,
            &intent,
            "wfo-1",
            Err(SyncError::Command("offline".to_string())),
        );
        assert_eq!(cache.hybrid_flag("7"), Some(true));
    }

    #[test]
    fn test_rollback_skipped_when_cache_already_converged() {
        let mut cache = cache_with("7", false);
        let mut t = OptimisticToggle::new();
        let intent = t.toggle(&mut cache, "wfo-1", "7").unwrap();
        // A refetch already restored the server value.
        cache.0.insert("7".to_string(), false);
        t.complete(&mut cache, &intent, "wfo-1", Ok(response(false)));
        assert_eq!(cache.hybrid_flag("7"), Some(false));
    }

    #[test]
    fn test_retoggle_while_pending_last_outcome_wins() {
        let mut cache = cache_with("7", false);
        let mut t = OptimisticToggle::new();
        let first = t.toggle(&mut cache, "wfo-1", "7").unwrap();
        assert_eq!(cache.hybrid_flag("7"), Some(true));
        let second = t.toggle(&mut cache, "wfo-1", "7").unwrap();
        assert_eq!(cache.hybrid_flag("7"), Some(false));
        assert!(second.before);
        assert!(!second.after);

        // First fails but has been superseded: nothing changes.
        let c = t.complete(&mut cache, &first, "wfo-1", Ok(response(false)));
        assert_eq!(c, Completion::Superseded);
        assert_eq!(cache.hybrid_flag("7"), Some(false));
        assert!(t.is_pending());

        let c = t.complete(&mut cache, &second, "wfo-1", Ok(response(true)));
        assert_eq!(c, Completion::Succeeded);
        assert_eq!(cache.hybrid_flag("7"), Some(false));
    }

    #[test]
    fn test_last_toggle_failure_restores_its_own_before() {
        let mut cache = cache_with("7", false);
        let mut t = OptimisticToggle::new();
        let first = t.toggle(&mut cache, "wfo-1", "7").unwrap();
        let second = t.toggle(&mut cache, "wfo-1", "7").unwrap();
        t.complete(&mut cache, &first, "wfo-1", Ok(response(true)));
        t.complete(&mut cache, &second, "wfo-1", Ok(response(false)));
        assert_eq!(cache.hybrid_flag("7"), Some(true));
        assert_eq!(t.phase(), TogglePhase::RolledBack);
    }

    #[test]
    fn test_stale_response_never_touches_cache() {
        let mut cache = cache_with("7", false);
        let mut t = OptimisticToggle::new();
        let intent = t.toggle(&mut cache, "wfo-1", "7").unwrap();
        t.bind("wfo-2");
        let c = t.complete(&mut cache, &intent, "wfo-2", Ok(response(false)));
        assert_eq!(c, Completion::Stale);
        assert_eq!(cache.hybrid_flag("7"), Some(true));
        assert_eq!(t.phase(), TogglePhase::Idle);
        assert!(t.report().is_none());
    }

    #[test]
    fn test_response_from_earlier_visit_to_same_key_is_stale() {
        let mut cache = cache_with("7", false);
        let mut t = OptimisticToggle::new();
        let intent = t.toggle(&mut cache, "wfo-1", "7").unwrap();
        t.bind("wfo-2");
        t.bind("wfo-1");
        // The refetch on return put the server value back.
        cache.0.insert("7".to_string(), false);

        let c = t.complete(&mut cache, &intent, "wfo-1", Ok(response(false)));
        assert_eq!(c, Completion::Stale);
        assert_eq!(t.phase(), TogglePhase::Idle);
        assert!(t.report().is_none());
        assert_eq!(cache.hybrid_flag("7"), Some(false));

        // A toggle issued after returning is current again.
        let fresh = t.toggle(&mut cache, "wfo-1", "7").unwrap();
        let c = t.complete(&mut cache, &fresh, "wfo-1", Ok(response(true)));
        assert_eq!(c, Completion::Succeeded);
    }

    #[test]
    fn test_rebinding_same_key_keeps_generation() {
        let mut cache = cache_with("7", false);
        let mut t = OptimisticToggle::new();
        let intent = t.toggle(&mut cache, "wfo-1", "7").unwrap();
        t.bind("wfo-1");
        let c = t.complete(&mut cache, &intent, "wfo-1", Ok(response(true)));
        assert_eq!(c, Completion::Succeeded);
    }

    #[test]
    fn test_toggle_uncached_placement_is_noop() {
        let mut cache = MapCache::default();
        let mut t = OptimisticToggle::new();
        assert!(t.toggle(&mut cache, "wfo-1", "7").is_none());
        assert_eq!(t.phase(), TogglePhase::Idle);
    }
}
