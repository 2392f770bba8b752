//! Application state controller
//!
//! Owns the in-memory mirrors of the durable collections and serializes
//! every mutation through the store before committing it to a mirror, so a
//! failed write leaves store and mirror convergent and the user free to
//! retry.

use crate::error::{Error, Result};
use crate::models::{ImageAsset, ImageId, ImageUpload, Note, NoteId, NotePatch, Settings};
use crate::settings_store::SettingsStore;
use crate::store::StoreHandle;

use super::notice::{Notice, NoticeBoard, NoticeKind};

/// Application state controller
///
/// The sole writer to the durable store. Presentation layers read the
/// mirrors and issue intents through these methods; every mutating method
/// takes `&mut self` and is awaited to completion, so mutations apply in
/// submission order.
pub struct AppController {
    store: StoreHandle,
    settings_store: SettingsStore,
    notes: Vec<Note>,
    images: Vec<ImageAsset>,
    active_note: Option<NoteId>,
    settings: Settings,
    notices: NoticeBoard,
}

impl AppController {
    /// Create a controller with empty mirrors; call [`load`](Self::load) to
    /// populate them from disk
    #[must_use]
    pub fn new(store: StoreHandle, settings_store: SettingsStore) -> Self {
        Self {
            store,
            settings_store,
            notes: Vec::new(),
            images: Vec::new(),
            active_note: None,
            settings: Settings::default(),
            notices: NoticeBoard::default(),
        }
    }

    /// Load settings and both collections
    ///
    /// The collections are fetched concurrently and notes sorted by recency.
    /// A store failure surfaces as a notice; the session continues with an
    /// empty dataset.
    pub async fn load(&mut self) {
        self.settings = self.settings_store.load();

        let (notes, images) = tokio::join!(
            self.store.read_all::<Note>(),
            self.store.read_all::<ImageAsset>()
        );

        match (notes, images) {
            (Ok(mut notes), Ok(images)) => {
                notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
                self.notes = notes;
                self.images = images;
            }
            (Err(error), _) | (_, Err(error)) => {
                tracing::warn!("failed to load saved data: {error}");
                self.notices
                    .post("Could not load saved data.", NoticeKind::Error);
            }
        }

        self.reconcile_selection();
    }

    /// Notes, most recently updated first at load time; newly created notes
    /// are prepended
    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Image assets in upload order
    #[must_use]
    pub fn images(&self) -> &[ImageAsset] {
        &self.images
    }

    /// Current settings record
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Currently selected note, if any
    #[must_use]
    pub fn active_note(&self) -> Option<&Note> {
        self.active_note
            .and_then(|id| self.notes.iter().find(|note| note.id == id))
    }

    /// Id of the currently selected note
    #[must_use]
    pub fn active_note_id(&self) -> Option<NoteId> {
        self.active_note
    }

    /// Current transient notification, if one is still visible
    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notices.current()
    }

    /// Notes whose title contains the query, case-insensitively, in mirror order
    #[must_use]
    pub fn filtered_notes(&self, query: &str) -> Vec<&Note> {
        let query = query.to_lowercase();
        self.notes
            .iter()
            .filter(|note| note.title.to_lowercase().contains(&query))
            .collect()
    }

    /// Create an empty untitled note, persist it, prepend it, and select it
    pub async fn create_note(&mut self) -> Result<NoteId> {
        let note = Note::untitled();
        let id = note.id;

        if let Err(error) = self.store.upsert(&note).await {
            self.notices
                .post("Could not save the new note.", NoticeKind::Error);
            return Err(error);
        }

        self.notes.insert(0, note);
        self.active_note = Some(id);
        self.notices.post("New note created", NoticeKind::Success);
        Ok(id)
    }

    /// Apply a partial update to a note
    ///
    /// The merged record is written to the store first; the mirror commits
    /// only on success, in place, preserving order.
    pub async fn update_note(&mut self, id: &NoteId, patch: NotePatch) -> Result<()> {
        let index = self.note_index(id)?;
        let mut updated = self.notes[index].clone();
        updated.apply(patch);

        if let Err(error) = self.store.upsert(&updated).await {
            self.notices
                .post("Could not save changes.", NoticeKind::Error);
            return Err(error);
        }

        self.notes[index] = updated;
        Ok(())
    }

    /// Snapshot the note's current content into its version history and persist
    pub async fn save_note(&mut self, id: &NoteId) -> Result<()> {
        let index = self.note_index(id)?;
        let mut updated = self.notes[index].clone();
        updated.snapshot();

        if let Err(error) = self.store.upsert(&updated).await {
            self.notices
                .post("Could not save the note.", NoticeKind::Error);
            return Err(error);
        }

        self.notes[index] = updated;
        self.notices.post("Note saved", NoticeKind::Success);
        Ok(())
    }

    /// Delete a note and repair the selection
    ///
    /// Deleting an id that is not mirrored is a no-op.
    pub async fn delete_note(&mut self, id: &NoteId) -> Result<()> {
        if let Err(error) = self.store.delete::<Note>(&id.as_str()).await {
            self.notices
                .post("Could not delete the note.", NoticeKind::Error);
            return Err(error);
        }

        self.notes.retain(|note| note.id != *id);
        self.reconcile_selection();
        self.notices.post("Note deleted", NoticeKind::Success);
        Ok(())
    }

    /// Explicitly select a note; unknown ids are ignored
    pub fn select_note(&mut self, id: &NoteId) {
        if self.notes.iter().any(|note| note.id == *id) {
            self.active_note = Some(*id);
        }
    }

    /// Store accepted image uploads, returning the ids of stored assets
    ///
    /// Non-image files are skipped silently. A failure on one file surfaces
    /// as a notice and does not abort the remaining files.
    pub async fn upload_images(&mut self, uploads: Vec<ImageUpload>) -> Vec<ImageId> {
        let mut stored = Vec::new();

        for upload in uploads {
            if !upload.is_image() {
                tracing::debug!(
                    name = %upload.name,
                    mime_type = %upload.mime_type,
                    "skipping non-image upload"
                );
                continue;
            }

            let asset = ImageAsset::from_upload(&upload);
            match self.store.upsert(&asset).await {
                Ok(()) => {
                    stored.push(asset.id.clone());
                    self.images.push(asset);
                }
                Err(error) => {
                    tracing::warn!("failed to store image {}: {error}", upload.name);
                    self.notices.post("Failed to add image", NoticeKind::Error);
                }
            }
        }

        stored
    }

    /// Delete an image asset
    pub async fn delete_image(&mut self, id: &ImageId) -> Result<()> {
        if let Err(error) = self.store.delete::<ImageAsset>(id.as_str()).await {
            self.notices
                .post("Could not delete the image.", NoticeKind::Error);
            return Err(error);
        }

        self.images.retain(|image| image.id != *id);
        self.notices.post("Image deleted", NoticeKind::Success);
        Ok(())
    }

    /// Persist and apply a new settings record
    pub fn update_settings(&mut self, settings: Settings) -> Result<()> {
        if let Err(error) = self.settings_store.save(&settings) {
            self.notices
                .post("Could not save settings.", NoticeKind::Error);
            return Err(error);
        }

        self.settings = settings;
        self.notices.post("Settings saved!", NoticeKind::Success);
        Ok(())
    }

    fn note_index(&self, id: &NoteId) -> Result<usize> {
        self.notes
            .iter()
            .position(|note| note.id == *id)
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Repair the selection after the note mirror changed: fall back to the
    /// first note (or none) whenever the selected id is gone, and pick the
    /// first note when the collection becomes non-empty with nothing selected
    fn reconcile_selection(&mut self) {
        let selected_present = self
            .active_note
            .is_some_and(|id| self.notes.iter().any(|note| note.id == id));

        if !selected_present {
            self.active_note = self.notes.first().map(|note| note.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    async fn controller() -> (AppController, TempDir) {
        let tmp = TempDir::new().unwrap();
        let store = StoreHandle::in_memory();
        let settings_store = SettingsStore::new(tmp.path().join("settings.json"));

        let mut controller = AppController::new(store, settings_store);
        controller.load().await;
        (controller, tmp)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_create_note_defaults() {
        let (mut app, _tmp) = controller().await;

        let id = app.create_note().await.unwrap();
        let note = app.active_note().unwrap();

        assert_eq!(note.id, id);
        assert_eq!(note.title, "Untitled Note");
        assert_eq!(note.content, "");
        assert!(note.versions.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_new_notes_are_prepended_and_selected() {
        let (mut app, _tmp) = controller().await;

        let first = app.create_note().await.unwrap();
        let second = app.create_note().await.unwrap();

        assert_eq!(app.notes()[0].id, second);
        assert_eq!(app.notes()[1].id, first);
        assert_eq!(app.active_note_id(), Some(second));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_update_note_merges_and_preserves_order() {
        let (mut app, _tmp) = controller().await;

        let first = app.create_note().await.unwrap();
        let second = app.create_note().await.unwrap();

        app.update_note(&first, NotePatch::title("Renamed"))
            .await
            .unwrap();

        // Updates replace in place; creation order is untouched.
        assert_eq!(app.notes()[0].id, second);
        assert_eq!(app.notes()[1].id, first);
        assert_eq!(app.notes()[1].title, "Renamed");
        assert_eq!(app.notes()[1].content, "");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_update_unknown_note_is_not_found() {
        let (mut app, _tmp) = controller().await;

        let result = app
            .update_note(&NoteId::new(), NotePatch::title("ghost"))
            .await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_save_builds_version_history_newest_first() {
        let (mut app, _tmp) = controller().await;
        let id = app.create_note().await.unwrap();

        app.update_note(&id, NotePatch::content("Hello"))
            .await
            .unwrap();
        app.save_note(&id).await.unwrap();

        app.update_note(&id, NotePatch::content("Hello world"))
            .await
            .unwrap();
        app.save_note(&id).await.unwrap();

        let versions = &app.active_note().unwrap().versions;
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[0].content, "Hello world");
        assert_eq!(versions[1].content, "Hello");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_save_caps_versions_at_ten() {
        let (mut app, _tmp) = controller().await;
        let id = app.create_note().await.unwrap();

        for i in 0..12 {
            app.update_note(&id, NotePatch::content(format!("rev {i}")))
                .await
                .unwrap();
            app.save_note(&id).await.unwrap();
        }

        let versions = &app.active_note().unwrap().versions;
        assert_eq!(versions.len(), 10);
        assert_eq!(versions[0].content, "rev 11");
        assert_eq!(versions[9].content, "rev 2");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_updated_at_is_monotonic() {
        let (mut app, _tmp) = controller().await;
        let id = app.create_note().await.unwrap();

        let mut last = app.active_note().unwrap().updated_at;
        for i in 0..3 {
            app.update_note(&id, NotePatch::content(format!("edit {i}")))
                .await
                .unwrap();
            let now = app.active_note().unwrap().updated_at;
            assert!(now >= last);
            last = now;
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_delete_only_note_clears_selection() {
        let (mut app, _tmp) = controller().await;
        let id = app.create_note().await.unwrap();

        app.delete_note(&id).await.unwrap();

        assert!(app.notes().is_empty());
        assert_eq!(app.active_note_id(), None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_delete_active_note_selects_first_remaining() {
        let (mut app, _tmp) = controller().await;

        let first = app.create_note().await.unwrap();
        let second = app.create_note().await.unwrap();
        assert_eq!(app.active_note_id(), Some(second));

        app.delete_note(&second).await.unwrap();

        // The first note in mirror order becomes active.
        assert_eq!(app.active_note_id(), Some(first));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_delete_non_active_note_keeps_selection() {
        let (mut app, _tmp) = controller().await;

        let first = app.create_note().await.unwrap();
        let second = app.create_note().await.unwrap();

        app.delete_note(&first).await.unwrap();

        assert_eq!(app.active_note_id(), Some(second));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_select_unknown_note_is_ignored() {
        let (mut app, _tmp) = controller().await;
        let id = app.create_note().await.unwrap();

        app.select_note(&NoteId::new());
        assert_eq!(app.active_note_id(), Some(id));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_mirror_matches_store_after_mutations() {
        let (mut app, _tmp) = controller().await;

        let a = app.create_note().await.unwrap();
        let b = app.create_note().await.unwrap();
        let _c = app.create_note().await.unwrap();

        app.update_note(&a, NotePatch::content("kept"))
            .await
            .unwrap();
        app.delete_note(&b).await.unwrap();

        let mut mirrored: Vec<Note> = app.notes().to_vec();
        let mut persisted: Vec<Note> = app.store.read_all().await.unwrap();
        mirrored.sort_by_key(|note| note.id.as_str());
        persisted.sort_by_key(|note| note.id.as_str());
        assert_eq!(mirrored, persisted);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_reload_sorts_notes_by_recency() {
        let tmp = TempDir::new().unwrap();
        let store = StoreHandle::in_memory();
        let settings_store = SettingsStore::new(tmp.path().join("settings.json"));

        let mut app = AppController::new(store.clone(), settings_store.clone());
        app.load().await;
        let first = app.create_note().await.unwrap();
        let _second = app.create_note().await.unwrap();
        // Millisecond timestamps need a beat between mutations to order distinctly.
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        app.update_note(&first, NotePatch::content("touched"))
            .await
            .unwrap();

        // A fresh controller over the same store sees the touched note first.
        let mut reloaded = AppController::new(store, settings_store);
        reloaded.load().await;
        assert_eq!(reloaded.notes()[0].id, first);
        assert_eq!(reloaded.active_note_id(), Some(first));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_load_failure_continues_with_empty_dataset() {
        let tmp = TempDir::new().unwrap();
        // A directory is not a valid database file, so every read fails.
        let store = StoreHandle::new(tmp.path());
        let settings_store = SettingsStore::new(tmp.path().join("settings.json"));

        let mut app = AppController::new(store, settings_store);
        app.load().await;

        assert!(app.notes().is_empty());
        assert!(app.images().is_empty());
        let notice = app.notice().unwrap();
        assert_eq!(notice.message, "Could not load saved data.");
        assert_eq!(notice.kind, NoticeKind::Error);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_upload_skips_non_image_files() {
        let (mut app, _tmp) = controller().await;

        let stored = app
            .upload_images(vec![
                ImageUpload::new("photo.png", "image/png", vec![1, 2, 3]),
                ImageUpload::new("notes.txt", "text/plain", b"hello".to_vec()),
            ])
            .await;

        assert_eq!(stored.len(), 1);
        assert_eq!(app.images().len(), 1);
        assert_eq!(app.images()[0].name, "photo.png");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_delete_image() {
        let (mut app, _tmp) = controller().await;

        let stored = app
            .upload_images(vec![ImageUpload::new(
                "photo.png",
                "image/png",
                vec![1, 2, 3],
            )])
            .await;

        app.delete_image(&stored[0]).await.unwrap();
        assert!(app.images().is_empty());

        let persisted: Vec<ImageAsset> = app.store.read_all().await.unwrap();
        assert!(persisted.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_update_settings_persists_snapshot() {
        let tmp = TempDir::new().unwrap();
        let settings_store = SettingsStore::new(tmp.path().join("settings.json"));

        let mut app = AppController::new(StoreHandle::in_memory(), settings_store.clone());
        app.load().await;

        let settings = Settings {
            font_size: 20,
            assist_enabled: false,
            ..Settings::default()
        };
        app.update_settings(settings.clone()).unwrap();

        assert_eq!(app.settings(), &settings);
        assert_eq!(settings_store.load(), settings);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_filtered_notes_matches_title_case_insensitively() {
        let (mut app, _tmp) = controller().await;

        let groceries = app.create_note().await.unwrap();
        app.update_note(&groceries, NotePatch::title("Groceries"))
            .await
            .unwrap();
        let journal = app.create_note().await.unwrap();
        app.update_note(&journal, NotePatch::title("Journal"))
            .await
            .unwrap();

        let hits = app.filtered_notes("groc");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, groceries);

        assert_eq!(app.filtered_notes("").len(), 2);
    }
}
