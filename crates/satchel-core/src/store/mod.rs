//! Durable store layer for Satchel

mod connection;
mod handle;
mod migrations;
mod objects;

pub use connection::Store;
pub use handle::{StoreHandle, DB_FILE_NAME};
pub use objects::{Collection, LibSqlObjectRepository, ObjectRepository, StoredObject};
