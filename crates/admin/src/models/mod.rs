//! Domain models for admin.
//!
//! - `session` - identity stored in the browser session
//! - `notice` - modal notices and confirmation dialogs

pub mod notice;
pub mod session;

pub use notice::{ConfirmDialog, Notice, NoticeKind};
pub use session::{CurrentAdmin, keys as session_keys};
