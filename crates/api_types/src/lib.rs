use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discriminator selecting which logical set of entries an operation
/// applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    Finance,
    Media,
}

impl CollectionKind {
    /// Canonical string used as a path segment and storage key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Finance => "finance",
            Self::Media => "media",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Finance => "Finance",
            Self::Media => "Media",
        }
    }
}

pub mod entry {
    use super::*;

    /// A logged purchase or media item.
    ///
    /// `cost_minor` is the price in minor units (cents) and is only
    /// meaningful for finance entries; media entries carry `None`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Entry {
        pub id: Uuid,
        pub created_at: DateTime<Utc>,
        pub description: String,
        pub worth_it: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub cost_minor: Option<i64>,
    }

    /// Request body for creating an entry.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct NewEntry {
        pub description: String,
        pub worth_it: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub cost_minor: Option<i64>,
    }

    /// Partial update. The worth-it flag is the only mutable field.
    #[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
    pub struct EntryPatch {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub worth_it: Option<bool>,
    }

    /// Response body for listing a collection.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct EntryListResponse {
        pub entries: Vec<Entry>,
    }
}

/// Error body returned by the REST backend.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::entry::Entry;
    use super::*;

    #[test]
    fn collection_kind_round_trips_as_snake_case() {
        let json = serde_json::to_string(&CollectionKind::Finance).unwrap();
        assert_eq!(json, "\"finance\"");
        let back: CollectionKind = serde_json::from_str("\"media\"").unwrap();
        assert_eq!(back, CollectionKind::Media);
    }

    #[test]
    fn entry_without_cost_omits_the_field() {
        let entry = Entry {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            description: "movie night".to_string(),
            worth_it: true,
            cost_minor: None,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("cost_minor"));
    }

    #[test]
    fn entry_with_missing_cost_deserializes() {
        let json = r#"{
            "id": "6c2f2f6e-3b87-4b2a-9a55-6a1d6d2f9f10",
            "created_at": "2026-01-05T10:00:00Z",
            "description": "book",
            "worth_it": false
        }"#;
        let entry: Entry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.cost_minor, None);
        assert!(!entry.worth_it);
    }
}
