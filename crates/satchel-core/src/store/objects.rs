//! Keyed object collections over the store connection
//!
//! Records are stored whole, as JSON documents keyed by their `id`. Each
//! operation is a single statement against one table, so operations within a
//! collection are atomic with respect to each other; operations across
//! collections are independent.

use libsql::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::models::{ImageAsset, Note};

/// Named record collections in the durable store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Notes,
    Images,
}

impl Collection {
    /// Fixed table name backing this collection
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Notes => "notes",
            Self::Images => "images",
        }
    }
}

/// A record type persisted in a fixed collection, keyed by its id
pub trait StoredObject: Serialize + DeserializeOwned {
    /// Collection this type is stored in
    const COLLECTION: Collection;

    /// Key under which this record is stored
    fn object_id(&self) -> String;
}

impl StoredObject for Note {
    const COLLECTION: Collection = Collection::Notes;

    fn object_id(&self) -> String {
        self.id.as_str()
    }
}

impl StoredObject for ImageAsset {
    const COLLECTION: Collection = Collection::Images;

    fn object_id(&self) -> String {
        self.id.as_str().to_string()
    }
}

/// Trait for keyed object storage operations (async)
#[allow(async_fn_in_trait)]
pub trait ObjectRepository {
    /// Read every record in T's collection; order is unspecified
    async fn read_all<T: StoredObject>(&self) -> Result<Vec<T>>;

    /// Insert the record, or fully replace an existing record with the same key
    async fn upsert<T: StoredObject>(&self, record: &T) -> Result<()>;

    /// Remove the record if present; an absent id is a no-op, not an error
    async fn delete<T: StoredObject>(&self, id: &str) -> Result<()>;
}

/// libSQL implementation of `ObjectRepository`
pub struct LibSqlObjectRepository<'a> {
    conn: &'a Connection,
}

impl<'a> LibSqlObjectRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl ObjectRepository for LibSqlObjectRepository<'_> {
    async fn read_all<T: StoredObject>(&self) -> Result<Vec<T>> {
        let sql = format!("SELECT record FROM {}", T::COLLECTION.table());
        let mut rows = self.conn.query(&sql, ()).await?;

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            let raw: String = row.get(0)?;
            records.push(serde_json::from_str(&raw)?);
        }

        Ok(records)
    }

    async fn upsert<T: StoredObject>(&self, record: &T) -> Result<()> {
        let sql = format!(
            "INSERT OR REPLACE INTO {} (id, record) VALUES (?, ?)",
            T::COLLECTION.table()
        );
        let raw = serde_json::to_string(record)?;
        self.conn.execute(&sql, [record.object_id(), raw]).await?;
        Ok(())
    }

    async fn delete<T: StoredObject>(&self, id: &str) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?", T::COLLECTION.table());
        self.conn.execute(&sql, [id]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImageUpload, NotePatch};
    use crate::store::Store;
    use pretty_assertions::assert_eq;

    async fn setup() -> Store {
        Store::open_in_memory().await.unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_round_trip() {
        let store = setup().await;
        let repo = LibSqlObjectRepository::new(store.connection());

        let mut note = Note::new("Groceries", "milk, eggs");
        note.snapshot();
        repo.upsert(&note).await.unwrap();

        let notes: Vec<Note> = repo.read_all().await.unwrap();
        assert_eq!(notes, vec![note]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_upsert_replaces_whole_record() {
        let store = setup().await;
        let repo = LibSqlObjectRepository::new(store.connection());

        let mut note = Note::new("Draft", "v1");
        repo.upsert(&note).await.unwrap();

        note.apply(NotePatch::content("v2"));
        repo.upsert(&note).await.unwrap();

        let notes: Vec<Note> = repo.read_all().await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].content, "v2");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_delete_absent_id_is_noop() {
        let store = setup().await;
        let repo = LibSqlObjectRepository::new(store.connection());

        repo.delete::<Note>("no-such-id").await.unwrap();
        repo.delete::<ImageAsset>("no-such-id").await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_collections_are_independent() {
        let store = setup().await;
        let repo = LibSqlObjectRepository::new(store.connection());

        let note = Note::new("A note", "");
        let image = ImageAsset::from_upload(&ImageUpload::new(
            "pic.png",
            "image/png",
            vec![1, 2, 3],
        ));
        repo.upsert(&note).await.unwrap();
        repo.upsert(&image).await.unwrap();

        repo.delete::<Note>(&note.id.as_str()).await.unwrap();

        let notes: Vec<Note> = repo.read_all().await.unwrap();
        let images: Vec<ImageAsset> = repo.read_all().await.unwrap();
        assert!(notes.is_empty());
        assert_eq!(images, vec![image]);
    }
}
