use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::warn;
use uuid::Uuid;

/// A user-submitted item persisted in a flat YAML collection.
pub trait Record: Serialize + DeserializeOwned + Clone {
    /// Base name of the backing file and the top-level key inside it.
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: String,
    pub author: String,
    pub author_name: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub is_private: bool,
    pub answered: bool,
    pub answer: Option<String>,
}

impl Inquiry {
    pub fn new(
        author: &str,
        author_name: &str,
        title: &str,
        content: &str,
        is_private: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            author: author.to_string(),
            author_name: author_name.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
            is_private,
            answered: false,
            answer: None,
        }
    }
}

impl Record for Inquiry {
    const COLLECTION: &'static str = "inquiries";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub author: String,
    pub author_name: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn new(author: &str, author_name: &str, title: &str, content: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            author: author.to_string(),
            author_name: author_name.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        }
    }
}

impl Record for Review {
    const COLLECTION: &'static str = "reviews";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub author: String,
    pub author_name: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Column {
    pub fn new(author: &str, author_name: &str, title: &str, content: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            author: author.to_string(),
            author_name: author_name.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        }
    }
}

impl Record for Column {
    const COLLECTION: &'static str = "columns";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Flat-file store for record collections.
///
/// Every mutation loads the whole collection, modifies it in memory, and
/// rewrites the whole file. There is no locking: two concurrent writers
/// race and the last save wins. That lost-update window is an accepted
/// limitation of the flat-file format, not a guarantee to build on.
#[derive(Clone, Debug)]
pub struct RecordStore {
    data_dir: PathBuf,
}

impl RecordStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load a collection. A missing, empty, or unparseable backing file
    /// yields an empty vec; parse failures are logged, not raised.
    pub fn load<R: Record>(&self) -> Vec<R> {
        let path = self.collection_path::<R>();
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(_) => return Vec::new(),
        };

        if text.trim().is_empty() {
            return Vec::new();
        }

        match serde_yaml::from_str::<BTreeMap<String, Vec<R>>>(&text) {
            Ok(mut doc) => doc.remove(R::COLLECTION).unwrap_or_default(),
            Err(err) => {
                warn!(?err, path = %path.display(), "failed to parse record collection");
                Vec::new()
            }
        }
    }

    /// Load a collection in display order, newest first.
    pub fn load_sorted<R: Record>(&self) -> Vec<R> {
        let mut records = self.load::<R>();
        records.sort_by_key(|r| std::cmp::Reverse(r.created_at()));
        records
    }

    /// Rewrite a collection in full. Callers must check the result before
    /// assuming durability.
    pub fn save<R: Record>(&self, records: &[R]) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir).with_context(|| {
            format!("failed to create data directory {}", self.data_dir.display())
        })?;

        let mut doc = BTreeMap::new();
        doc.insert(R::COLLECTION, records);
        let text = serde_yaml::to_string(&doc)
            .with_context(|| format!("failed to serialize {} collection", R::COLLECTION))?;

        let path = self.collection_path::<R>();
        std::fs::write(&path, text)
            .with_context(|| format!("failed to write {}", path.display()))
    }

    pub fn append<R: Record>(&self, record: R) -> Result<()> {
        let mut records = self.load::<R>();
        records.push(record);
        self.save::<R>(&records)
    }

    /// Apply `update` to the record with the given id and rewrite the
    /// collection. A missing id is silently skipped: the collection is
    /// rewritten unchanged and no error is reported. Callers rely on
    /// that; the save result is the only failure signal.
    pub fn update_by_id<R, F>(&self, id: &str, update: F) -> Result<()>
    where
        R: Record,
        F: FnOnce(&mut R),
    {
        let mut records = self.load::<R>();
        if let Some(record) = records.iter_mut().find(|r| r.id() == id) {
            update(record);
        }
        self.save::<R>(&records)
    }

    /// Remove the record with the given id, if present. Idempotent.
    pub fn delete_by_id<R: Record>(&self, id: &str) -> Result<()> {
        let mut records = self.load::<R>();
        records.retain(|r| r.id() != id);
        self.save::<R>(&records)
    }

    fn collection_path<R: Record>(&self) -> PathBuf {
        self.data_dir.join(format!("{}.yaml", R::COLLECTION))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn store() -> (TempDir, RecordStore) {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn missing_file_loads_empty() {
        let (_dir, store) = store();
        assert!(store.load::<Inquiry>().is_empty());
    }

    #[test]
    fn empty_file_loads_empty() {
        let (dir, store) = store();
        std::fs::write(dir.path().join("inquiries.yaml"), "").unwrap();
        assert!(store.load::<Inquiry>().is_empty());
    }

    #[test]
    fn append_then_load_returns_record_with_generated_id() {
        let (_dir, store) = store();
        store
            .append(Inquiry::new("user1", "First User", "T", "C", false))
            .unwrap();

        let records = store.load::<Inquiry>();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "T");
        assert_eq!(records[0].content, "C");
        assert!(!records[0].id.is_empty());
        assert!(!records[0].answered);
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, store) = store();
        let reviews = vec![
            Review::new("user1", "First User", "Great docs", "Found everything."),
            Review::new("user2", "Second User", "Could be better", "Search is missing."),
        ];
        store.save(&reviews).unwrap();

        let loaded = store.load::<Review>();
        assert_eq!(loaded, reviews);
    }

    #[test]
    fn collections_do_not_interfere() {
        let (_dir, store) = store();
        store
            .append(Review::new("user1", "First User", "R", "review body"))
            .unwrap();
        store
            .append(Column::new("admin1", "Site Admin", "C", "column body"))
            .unwrap();

        assert_eq!(store.load::<Review>().len(), 1);
        assert_eq!(store.load::<Column>().len(), 1);
        assert!(store.load::<Inquiry>().is_empty());
    }

    #[test]
    fn update_by_id_mutates_matching_record() {
        let (_dir, store) = store();
        let inquiry = Inquiry::new("user1", "First User", "T", "C", false);
        let id = inquiry.id.clone();
        store.append(inquiry).unwrap();

        store
            .update_by_id::<Inquiry, _>(&id, |record| {
                record.answered = true;
                record.answer = Some("Resolved.".to_string());
            })
            .unwrap();

        let records = store.load::<Inquiry>();
        assert!(records[0].answered);
        assert_eq!(records[0].answer.as_deref(), Some("Resolved."));
    }

    #[test]
    fn update_by_id_silently_skips_unknown_id() {
        let (_dir, store) = store();
        store
            .append(Inquiry::new("user1", "First User", "T", "C", false))
            .unwrap();
        let before = store.load::<Inquiry>();

        store
            .update_by_id::<Inquiry, _>("no-such-id", |record| {
                record.answered = true;
            })
            .unwrap();

        assert_eq!(store.load::<Inquiry>(), before);
    }

    #[test]
    fn delete_by_id_is_idempotent() {
        let (_dir, store) = store();
        let column = Column::new("admin1", "Site Admin", "T", "C");
        let id = column.id.clone();
        store.append(column).unwrap();
        store
            .append(Column::new("admin1", "Site Admin", "Other", "Body"))
            .unwrap();

        store.delete_by_id::<Column>(&id).unwrap();
        let after_first = store.load::<Column>();
        assert_eq!(after_first.len(), 1);

        store.delete_by_id::<Column>(&id).unwrap();
        assert_eq!(store.load::<Column>(), after_first);
    }

    #[test]
    fn load_sorted_orders_newest_first() {
        let (_dir, store) = store();
        let mut older = Review::new("user1", "First User", "older", "body");
        older.created_at = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let mut newer = Review::new("user2", "Second User", "newer", "body");
        newer.created_at = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();

        store.save(&[older, newer]).unwrap();

        let sorted = store.load_sorted::<Review>();
        assert_eq!(sorted[0].title, "newer");
        assert_eq!(sorted[1].title, "older");
    }

    #[test]
    fn backing_file_uses_collection_key() {
        let (dir, store) = store();
        store
            .append(Inquiry::new("user1", "First User", "T", "C", true))
            .unwrap();

        let text = std::fs::read_to_string(dir.path().join("inquiries.yaml")).unwrap();
        assert!(text.starts_with("inquiries:"));
    }
}
