use crate::models::NameRecord;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Visibility {
    Hidden,
    ReadOnly,
    Editable,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        self != Visibility::Hidden
    }

    pub fn is_editable(self) -> bool {
        self == Visibility::Editable
    }
}

/// The hybrid flag belongs to a placement, so only its accepted name may show the toggle.
pub(crate) fn hybrid_visibility(record: Option<&NameRecord>) -> Visibility {
    match record {
        Some(r) if r.can_edit && r.is_accepted_name() => Visibility::Editable,
        _ => Visibility::Hidden,
    }
}

/// The author card is always shown; without permission (or data) the field is disabled.
pub(crate) fn authors_visibility(record: Option<&NameRecord>) -> Visibility {
    match record {
        Some(r) if r.can_edit => Visibility::Editable,
        _ => Visibility::ReadOnly,
    }
}
