//! Note model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Maximum number of version snapshots retained per note; older snapshots are
/// silently dropped once the cap is exceeded.
pub const MAX_VERSIONS: usize = 10;

/// Title given to freshly created notes
const DEFAULT_TITLE: &str = "Untitled Note";

/// A unique identifier for a note, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteId(Uuid);

impl NoteId {
    /// Create a new unique note ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A timestamped snapshot of a note's content, kept for history/undo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteVersion {
    /// Capture timestamp (Unix ms)
    pub timestamp: i64,
    /// Content at capture time
    pub content: String,
}

/// A partial note update; absent fields keep their previous value
#[derive(Debug, Clone, Default)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NotePatch {
    /// Patch that replaces only the title
    #[must_use]
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: None,
        }
    }

    /// Patch that replaces only the content
    #[must_use]
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            title: None,
            content: Some(content.into()),
        }
    }
}

/// A note in the system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier, assigned at creation
    pub id: NoteId,
    /// Short display title
    pub title: String,
    /// Rich-text payload, opaque serialized markup
    pub content: String,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last update timestamp (Unix ms); never moves backwards
    pub updated_at: i64,
    /// Version snapshots, newest first, at most [`MAX_VERSIONS`] entries
    pub versions: Vec<NoteVersion>,
}

impl Note {
    /// Create a new note with the given title and content
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: NoteId::new(),
            title: title.into(),
            content: content.into(),
            created_at: now,
            updated_at: now,
            versions: Vec::new(),
        }
    }

    /// Create an empty note with the default title
    #[must_use]
    pub fn untitled() -> Self {
        Self::new(DEFAULT_TITLE, "")
    }

    /// Shallow-merge a partial update over this note and refresh `updated_at`
    pub fn apply(&mut self, patch: NotePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        self.touch();
    }

    /// Capture the current content as a new version snapshot
    ///
    /// The snapshot is prepended (newest first) and the history truncated to
    /// [`MAX_VERSIONS`] entries.
    pub fn snapshot(&mut self) {
        let version = NoteVersion {
            timestamp: chrono::Utc::now().timestamp_millis(),
            content: self.content.clone(),
        };
        self.versions.insert(0, version);
        self.versions.truncate(MAX_VERSIONS);
        self.touch();
    }

    /// Refresh `updated_at`, keeping it monotonic even if the clock steps back
    fn touch(&mut self) {
        self.updated_at = chrono::Utc::now()
            .timestamp_millis()
            .max(self.updated_at);
    }
}
