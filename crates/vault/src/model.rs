//! Bookmark records and the collection blob.
//!
//! The cipher unit only ever sees the JSON blob produced here; the session
//! hands the typed records to the UI layer.

use uuid::Uuid;

/// A single bookmark record. Free-form user data — the crypto core round-trips
/// it through encrypt/decrypt without interpreting it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Bookmark {
    pub id: Uuid,
    pub url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub read: bool,
    /// Unix seconds.
    pub created_at: i64,
    /// Unix seconds of the most recent visit, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visited_at: Option<i64>,
}

impl Bookmark {
    /// Create a new unread bookmark.
    pub fn new(url: impl Into<String>, title: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            title: title.into(),
            description: None,
            tags: Vec::new(),
            read: false,
            created_at,
            last_visited_at: None,
        }
    }

    /// Flip the read flag.
    pub fn toggle_read(&mut self) {
        self.read = !self.read;
    }

    /// Record a visit timestamp (Unix seconds).
    pub fn record_visit(&mut self, at: i64) {
        self.last_visited_at = Some(at);
    }
}

/// Serialize the collection to the plaintext blob fed to the cipher.
pub fn serialize_collection(collection: &[Bookmark]) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(collection)
}

/// Parse a decrypted plaintext blob back into records.
pub fn deserialize_collection(bytes: &[u8]) -> Result<Vec<Bookmark>, serde_json::Error> {
    serde_json::from_slice(bytes)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_round_trip() {
        let mut bookmark = Bookmark::new("https://example.com", "Example", 1_700_000_000);
        bookmark.tags = vec!["reference".to_string()];
        bookmark.record_visit(1_700_000_100);

        let blob = serialize_collection(&[bookmark.clone()]).unwrap();
        let parsed = deserialize_collection(&blob).unwrap();
        assert_eq!(parsed, vec![bookmark]);
    }

    #[test]
    fn empty_collection_is_json_array() {
        let blob = serialize_collection(&[]).unwrap();
        assert_eq!(blob, b"[]");
        assert!(deserialize_collection(&blob).unwrap().is_empty());
    }

    #[test]
    fn new_bookmarks_start_unread() {
        let mut bookmark = Bookmark::new("https://example.com", "Example", 0);
        assert!(!bookmark.read);
        assert!(bookmark.last_visited_at.is_none());

        bookmark.toggle_read();
        assert!(bookmark.read);
        bookmark.toggle_read();
        assert!(!bookmark.read);
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let parsed = deserialize_collection(
            br#"[{"id":"c0ffee00-0000-4000-8000-000000000000","url":"https://a","title":"a","created_at":0}]"#,
        )
        .unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].tags.is_empty());
        assert!(!parsed[0].read);
    }
}
