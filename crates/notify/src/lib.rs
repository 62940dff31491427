//! User-facing notifications for the listing editor.
//!
//! The editor never renders anything itself; it records what the user must
//! be told in a [`NoticeBoard`] and the front end drains it.

pub mod notice;

pub use notice::{Notice, NoticeBoard, NoticeKind};
