//! Domain Layer
//!
//! Records stored on the board and the rules attached to them.
//! This layer has NO network dependencies (serde and chrono only).

mod collection;
mod column;
mod contact;
mod record_id;
mod task;

pub use collection::Collection;
pub use column::{RemoteColumn, VisualColumn};
pub use contact::{group_by_letter, initials_of, AvatarImage, Contact, ContactDraft, AVATAR_PALETTE};
pub use record_id::RecordId;
pub use task::{parse_board_date, parse_deadline, now_stamp, Attachment, Priority, Task, TaskCategory, TaskDraft};
