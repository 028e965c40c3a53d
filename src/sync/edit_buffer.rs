/// Dirtiness under the absent/empty equivalence: an absent authoritative value
/// counts as the type's default (`""` for strings, `false` for flags).
pub(crate) fn is_dirty<V: PartialEq + Default>(buffer: &V, authoritative: Option<&V>) -> bool {
    match authoritative {
        Some(a) => buffer != a,
        None => *buffer != V::default(),
    }
}

/// Scratch value for one card, bound to a single record key.
///
/// The buffer is overwritten by server data only when the bound key changes. Refreshes
/// for the same key update the authoritative side and leave in-progress edits alone.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct EditBuffer<V> {
    value: V,
    authoritative: Option<V>,
    bound_key: Option<String>,
}

impl<V: Clone + PartialEq + Default> Default for EditBuffer<V> {
    fn default() -> Self {
        Self {
            value: V::default(),
            authoritative: None,
            bound_key: None,
        }
    }
}

impl<V: Clone + PartialEq + Default> EditBuffer<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn bound_key(&self) -> Option<&str> {
        self.bound_key.as_deref()
    }

    pub fn is_bound_to(&self, key: &str) -> bool {
        self.bound_key.as_deref() == Some(key)
    }

    /// The card now targets `key`. If that is not the bound key, drop the buffer so
    /// nothing issued for the old key can land on it.
    pub fn on_target_changed(&mut self, key: &str) {
        if !self.is_bound_to(key) {
            *self = Self::default();
        }
    }

    /// First data for `key`: reset to the authoritative value and bind.
    /// Returns false (and does nothing) when already bound to `key`.
    pub fn on_key_changed(&mut self, key: &str, authoritative: Option<V>) -> bool {
        if self.is_bound_to(key) {
            return false;
        }
        self.value = authoritative.clone().unwrap_or_default();
        self.authoritative = authoritative;
        self.bound_key = Some(key.to_string());
        true
    }

    /// A refetch for the bound key. Only the authoritative side moves.
    pub fn on_authoritative(&mut self, key: &str, authoritative: Option<V>) -> bool {
        if !self.is_bound_to(key) {
            return false;
        }
        self.authoritative = authoritative;
        true
    }

    /// Bind on the first load for a key, track the authoritative value afterwards.
    pub fn on_loaded(&mut self, key: &str, authoritative: Option<V>) {
        if !self.on_key_changed(key, authoritative.clone()) {
            self.on_authoritative(key, authoritative);
        }
    }

    pub fn on_user_edit(&mut self, value: V) {
        self.value = value;
    }

    pub fn is_dirty(&self) -> bool {
        is_dirty(&self.value, self.authoritative.as_ref())
    }
}
