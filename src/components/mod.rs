//! UI Components
//!
//! Board columns, cards and the status widgets around them.

mod board_column;
mod task_card;
mod quick_add;
mod summary_bar;
mod health_badge;
mod log_tail;

pub use board_column::BoardColumn;
pub use task_card::BoardCard;
pub use quick_add::QuickAdd;
pub use summary_bar::SummaryBar;
pub use health_badge::HealthBadge;
pub use log_tail::LogTail;
