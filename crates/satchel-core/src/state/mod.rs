//! Application state layer

mod controller;
mod notice;

pub use controller::AppController;
pub use notice::{Notice, NoticeBoard, NoticeKind, NOTICE_TTL};
