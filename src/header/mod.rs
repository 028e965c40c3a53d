use crate::models::{NameRecord, TaxonPlacement};

/// Which of the fixed header labels a name card shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum CardHeader {
    /// Nothing loaded yet.
    Empty,
    /// A taxon without a name.
    Unspecified { rank: String },
    /// An accepted name: the placement's rank.
    Ranked { rank: String },
    Synonym,
    Deprecated,
    Unplaced,
}

fn rank_name(taxon: &TaxonPlacement) -> String {
    taxon
        .rank
        .as_ref()
        .map(|r| r.name.clone())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| "taxon".to_string())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl CardHeader {
    pub fn select(
        name: Option<&NameRecord>,
        taxon: Option<&TaxonPlacement>,
        syn_of: Option<&TaxonPlacement>,
    ) -> Self {
        match (name, taxon, syn_of) {
            (None, None, None) => CardHeader::Empty,
            (None, Some(t), _) => CardHeader::Unspecified { rank: rank_name(t) },
            // A synonym target without a name or taxon carries nothing to label.
            (None, None, Some(_)) => CardHeader::Empty,
            (Some(_), Some(t), _) => CardHeader::Ranked { rank: rank_name(t) },
            (Some(_), None, Some(_)) => CardHeader::Synonym,
            (Some(n), None, None) if n.status.as_deref() == Some("deprecated") => {
                CardHeader::Deprecated
            }
            (Some(_), None, None) => CardHeader::Unplaced,
        }
    }

    /// Split a header-info record into `(name, taxon, syn_of)`: an accepted name sits on its
    /// placement as the taxon, any other placed name is a synonym of it.
    pub fn from_record(record: Option<&NameRecord>) -> Self {
        let placement = record.and_then(|r| r.taxon_placement.as_ref());
        let accepted = record.is_some_and(|r| r.is_accepted_name());
        let (taxon, syn_of) = if accepted {
            (placement, None)
        } else {
            (None, placement)
        };
        Self::select(record, taxon, syn_of)
    }

    /// `None` renders no header element at all.
    pub fn label(&self) -> Option<String> {
        match self {
            CardHeader::Empty => None,
            CardHeader::Unspecified { rank } => Some(format!("Unspecified {rank}")),
            CardHeader::Ranked { rank } => Some(capitalize(rank)),
            CardHeader::Synonym => Some("Synonymous Name".to_string()),
            CardHeader::Deprecated => Some("Deprecated Name".to_string()),
            CardHeader::Unplaced => Some("Unplaced Name".to_string()),
        }
    }
}

/// Server-formatted name (HTML markup) or the "No Name" fallback.
pub(crate) enum Headline {
    Markup(String),
    NoName,
}

pub(crate) fn headline(name: Option<&NameRecord>) -> Headline {
    match name.and_then(|n| n.full_name_string.clone()) {
        Some(markup) => Headline::Markup(markup),
        None if name.is_some() => Headline::Markup(String::new()),
        None => Headline::NoName,
    }
}
