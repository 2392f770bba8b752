//! Data models for Satchel

mod image;
mod note;
mod settings;

pub use image::{ImageAsset, ImageId, ImageUpload};
pub use note::{Note, NoteId, NotePatch, NoteVersion, MAX_VERSIONS};
pub use settings::{Settings, ThemeMode};
