//! satchel-core - Core library for Satchel
//!
//! This crate contains the shared models, durable store, and application
//! state logic used by Satchel front-ends. The store keeps two keyed object
//! collections (notes and images) in a local database; the state controller
//! mirrors them in memory and routes every mutation through the store before
//! committing it.

pub mod assist;
pub mod error;
pub mod models;
pub mod settings_store;
pub mod state;
pub mod store;

pub use error::{Error, Result};
pub use models::{Note, NoteId};
pub use state::AppController;
