use serde::{Deserialize, Serialize};

/// Accepted name of a placement, as returned by the name service.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct AcceptedNameRef {
    pub id: String,
    #[serde(default)]
    pub wfo: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Rank {
    pub name: String,
}

/// A name's position within the accepted hierarchy.
///
/// The service sends `id` as a string (GraphQL `ID`), while the update command takes an `Int`;
/// see [`TaxonPlacement::numeric_id`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TaxonPlacement {
    pub id: String,
    /// Only present when the query selected `isHybrid`.
    #[serde(default)]
    pub is_hybrid: Option<bool>,
    pub accepted_name: AcceptedNameRef,
    #[serde(default)]
    pub rank: Option<Rank>,
}

impl TaxonPlacement {
    pub fn numeric_id(&self) -> Option<i64> {
        self.id.trim().parse().ok()
    }
}

/// The `getNameForWfoId` object. Each query selects a different subset of fields,
/// so everything beyond `id` is optional.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NameRecord {
    pub id: String,
    #[serde(default)]
    pub wfo: Option<String>,
    #[serde(default)]
    pub can_edit: bool,
    #[serde(default)]
    pub authors_string: Option<String>,
    #[serde(default)]
    pub taxon_placement: Option<TaxonPlacement>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub full_name_string: Option<String>,
}

impl NameRecord {
    /// True when this name is the accepted name of its own placement.
    pub fn is_accepted_name(&self) -> bool {
        self.taxon_placement
            .as_ref()
            .is_some_and(|p| p.accepted_name.id == self.id)
    }
}

/// Outcome of one record touched by an update command.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ChildOutcome {
    #[serde(default)]
    pub name: Option<String>,
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of `updateAuthorsString` / `updateHybridStatus`.
///
/// `children` lists cascading outcomes for dependent names (e.g. a rename reaching
/// subordinate names); the update alert shows every one of them.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct UpdateResponse {
    #[serde(default)]
    pub name: Option<String>,
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub children: Vec<ChildOutcome>,
}

impl UpdateResponse {
    /// Primary result first, then children, all as `{label, success, message}` rows.
    pub fn outcomes(&self) -> Vec<ChildOutcome> {
        let mut out = Vec::with_capacity(self.children.len() + 1);
        out.push(ChildOutcome {
            name: self.name.clone(),
            success: self.success,
            message: self.message.clone(),
        });
        out.extend(self.children.iter().cloned());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_record_deserializes_hybrid_query_shape() {
        let json = r#"{
            "id": "1234",
            "canEdit": true,
            "wfo": "wfo-0000000001",
            "taxonPlacement": {
                "id": "77",
                "isHybrid": false,
                "acceptedName": {"id": "1234", "wfo": "wfo-0000000001"}
            }
        }"#;
        let r: NameRecord = serde_json::from_str(json).expect("record should parse");
        assert!(r.can_edit);
        assert!(r.is_accepted_name());
        assert_eq!(r.authors_string, None);
        let p = r.taxon_placement.expect("placement");
        assert_eq!(p.numeric_id(), Some(77));
    }

    #[test]
    fn test_synonym_is_not_accepted_name() {
        let json = r#"{
            "id": "5",
            "canEdit": true,
            "taxonPlacement": {"id": "9", "isHybrid": true, "acceptedName": {"id": "6"}}
        }"#;
        let r: NameRecord = serde_json::from_str(json).expect("record should parse");
        assert!(!r.is_accepted_name());
    }

    #[test]
    fn test_update_response_outcomes_include_children() {
        let json = r#"{
            "name": "Rosa L.",
            "success": true,
            "message": "Updated",
            "children": [
                {"name": "Rosa alba L.", "success": true, "message": "Updated"},
                {"name": "Rosa canina L.", "success": false, "message": "Locked"}
            ]
        }"#;
        let r: UpdateResponse = serde_json::from_str(json).expect("response should parse");
        let rows = r.outcomes();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].name.as_deref(), Some("Rosa L."));
        assert!(!rows[2].success);
    }
}
