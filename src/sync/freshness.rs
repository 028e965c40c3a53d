/// Which key a query binding is targeting and whether a fetch for it has completed since the
/// binding moved there.
///
/// Results cached on an earlier visit to a key stay readable, but they do not count as a load
/// until that key has been fetched again.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct FetchMarker {
    target: Option<String>,
    fetched: Option<String>,
}

impl FetchMarker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The binding now targets `key`. Moving to a different key clears the fetched mark;
    /// re-targeting the same key (an invalidation refetch) keeps it.
    pub fn retarget(&mut self, key: &str) {
        if self.target.as_deref() != Some(key) {
            self.target = Some(key.to_string());
            self.fetched = None;
        }
    }

    /// A fetch for `key` completed. Ignored unless `key` is still the target.
    pub fn mark_fetched(&mut self, key: &str) -> bool {
        if self.target.as_deref() != Some(key) {
            return false;
        }
        self.fetched = Some(key.to_string());
        true
    }

    pub fn is_fresh(&self, key: &str) -> bool {
        self.fetched.as_deref() == Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_only_after_fetch_for_target() {
        let mut m = FetchMarker::new();
        m.retarget("wfo-1");
        assert!(!m.is_fresh("wfo-1"));
        assert!(m.mark_fetched("wfo-1"));
        assert!(m.is_fresh("wfo-1"));
        assert!(!m.is_fresh("wfo-2"));
    }

    #[test]
    fn test_returning_to_key_requires_new_fetch() {
        let mut m = FetchMarker::new();
        m.retarget("wfo-1");
        m.mark_fetched("wfo-1");
        m.retarget("wfo-2");
        m.retarget("wfo-1");
        assert!(!m.is_fresh("wfo-1"));
    }

    #[test]
    fn test_same_key_refetch_keeps_mark() {
        let mut m = FetchMarker::new();
        m.retarget("wfo-1");
        m.mark_fetched("wfo-1");
        m.retarget("wfo-1");
        assert!(m.is_fresh("wfo-1"));
    }

    #[test]
    fn test_fetch_for_old_target_is_ignored() {
        let mut m = FetchMarker::new();
        m.retarget("wfo-1");
        m.retarget("wfo-2");
        assert!(!m.mark_fetched("wfo-1"));
        assert!(!m.is_fresh("wfo-1"));
        assert!(!m.is_fresh("wfo-2"));
    }
}
