//! Task Entity
//!
//! A card on the board. Field names follow the store's JSON layout.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::column::{RemoteColumn, VisualColumn};
use super::record_id::RecordId;

/// Format used for `createdAt` / `updatedAt`
const STAMP_FORMAT: &str = "%d.%m.%Y, %H:%M:%S";
/// Format used for `deadline`
const DEADLINE_FORMAT: &str = "%d.%m.%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::Urgent => "urgent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TaskCategory {
    #[default]
    #[serde(rename = "Technical Task")]
    TechnicalTask,
    #[serde(rename = "User Story")]
    UserStory,
    #[serde(rename = "Meeting")]
    Meeting,
}

impl TaskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::TechnicalTask => "Technical Task",
            TaskCategory::UserStory => "User Story",
            TaskCategory::Meeting => "Meeting",
        }
    }
}

/// File attached to a task, payload kept as text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Attachment {
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: u64,
    pub data: String,
}

/// Task as stored under `tasks/{id}`
///
/// List fields default to empty because the store drops empty arrays.
/// `column_id` stays textual so tasks with an unmapped column survive a
/// round trip through the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Task {
    pub title: String,
    pub description: String,
    pub deadline: String,
    pub priority: Priority,
    #[serde(rename = "type")]
    pub category: TaskCategory,
    #[serde(rename = "columnID")]
    pub column_id: String,
    pub assigned_users: Vec<String>,
    pub total_subtasks: Vec<String>,
    pub checked_subtasks: Vec<bool>,
    pub subtasks_completed: usize,
    pub attachments: Vec<Attachment>,
    #[serde(rename = "boardID")]
    pub board_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Task {
    pub fn remote_column(&self) -> Option<RemoteColumn> {
        RemoteColumn::parse(&self.column_id)
    }

    /// `None` when the stored column is not in the mapping table
    pub fn visual_column(&self) -> Option<VisualColumn> {
        self.remote_column().map(RemoteColumn::to_visual)
    }

    /// `(completed, total)`; counts from the checkbox list, not the cached number
    pub fn subtask_progress(&self) -> (usize, usize) {
        let done = self.checked_subtasks.iter().filter(|c| **c).count();
        (done, self.total_subtasks.len())
    }

    pub fn subtasks_consistent(&self) -> bool {
        self.total_subtasks.len() == self.checked_subtasks.len()
    }

    /// Refresh the redundant `subtasksCompleted` counter
    pub fn recount_subtasks(&mut self) {
        self.subtasks_completed = self.subtask_progress().0;
    }

    pub fn deadline_date(&self) -> Option<NaiveDate> {
        parse_deadline(&self.deadline)
    }

    pub fn created(&self) -> Option<NaiveDateTime> {
        parse_board_date(&self.created_at)
    }

    pub fn is_urgent(&self) -> bool {
        self.priority == Priority::Urgent
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.visual_column() != Some(VisualColumn::Done)
            && self.deadline_date().is_some_and(|d| d < today)
    }

    /// Case-insensitive match on title or description; empty query matches all
    pub fn matches(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        q.is_empty()
            || self.title.to_lowercase().contains(&q)
            || self.description.to_lowercase().contains(&q)
    }
}

/// Validated output of the task form
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub deadline: String,
    pub priority: Priority,
    pub category: TaskCategory,
    pub column: Option<VisualColumn>,
    pub assigned_users: Vec<String>,
    pub subtasks: Vec<String>,
    pub attachments: Vec<Attachment>,
}

impl TaskDraft {
    /// Build a fresh task; new tasks land in "to do" unless a column was picked
    pub fn into_task(self, id: &RecordId, stamp: &str) -> Task {
        let checked = vec![false; self.subtasks.len()];
        Task {
            title: self.title,
            description: self.description,
            deadline: self.deadline,
            priority: self.priority,
            category: self.category,
            column_id: self.column.unwrap_or(VisualColumn::ToDo).to_remote().as_str().to_string(),
            assigned_users: self.assigned_users,
            total_subtasks: self.subtasks,
            checked_subtasks: checked,
            subtasks_completed: 0,
            attachments: self.attachments,
            board_id: id.to_string(),
            created_at: stamp.to_string(),
            updated_at: stamp.to_string(),
        }
    }

    /// Apply an edit to an existing task, keeping checkbox state for subtasks
    /// whose text did not move
    pub fn apply_to(self, task: &mut Task, stamp: &str) {
        let checked = self
            .subtasks
            .iter()
            .map(|text| {
                task.total_subtasks
                    .iter()
                    .position(|old| old == text)
                    .and_then(|i| task.checked_subtasks.get(i).copied())
                    .unwrap_or(false)
            })
            .collect();
        task.title = self.title;
        task.description = self.description;
        task.deadline = self.deadline;
        task.priority = self.priority;
        task.category = self.category;
        if let Some(column) = self.column {
            task.column_id = column.to_remote().as_str().to_string();
        }
        task.assigned_users = self.assigned_users;
        task.total_subtasks = self.subtasks;
        task.checked_subtasks = checked;
        task.attachments = self.attachments;
        task.recount_subtasks();
        task.updated_at = stamp.to_string();
    }
}

/// Current local time in the board's stamp format
pub fn now_stamp() -> String {
    chrono::Local::now().format(STAMP_FORMAT).to_string()
}

/// Parse a `createdAt`-style stamp. Accepts RFC 3339, `DD.MM.YYYY, HH:MM:SS`
/// and a bare `DD.MM.YYYY`.
pub fn parse_board_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in [STAMP_FORMAT, "%d.%m.%Y %H:%M:%S", "%d.%m.%Y, %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    parse_deadline(s).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse a `DD.MM.YYYY` deadline (ISO dates are tolerated)
pub fn parse_deadline(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, DEADLINE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_store_layout() {
        let value = json!({
            "title": "Write docs",
            "priority": "urgent",
            "type": "User Story",
            "columnID": "review",
            "totalSubtasks": ["a", "b"],
            "checkedSubtasks": [true, false],
            "subtasksCompleted": 1,
            "boardID": "task-004",
            "createdAt": "03.02.2025, 10:00:00"
        });
        let task: Task = serde_json::from_value(value).unwrap();
        assert_eq!(task.priority, Priority::Urgent);
        assert_eq!(task.category, TaskCategory::UserStory);
        assert_eq!(task.visual_column(), Some(VisualColumn::AwaitFeedback));
        assert_eq!(task.subtask_progress(), (1, 2));
        // Dropped empty arrays come back as empty lists
        assert!(task.assigned_users.is_empty());
        assert!(task.attachments.is_empty());
    }

    #[test]
    fn test_overdue_needs_past_deadline_outside_done() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let task = |deadline: &str, column: &str| Task {
            deadline: deadline.into(),
            column_id: column.into(),
            ..Default::default()
        };
        assert!(task("09.03.2025", "toDo").is_overdue(today));
        assert!(task("2025-03-01", "inProgress").is_overdue(today));
        assert!(!task("10.03.2025", "toDo").is_overdue(today));
        assert!(!task("09.03.2025", "done").is_overdue(today));
        assert!(!task("", "toDo").is_overdue(today));
    }

    #[test]
    fn test_unmapped_column_is_kept() {
        let task: Task = serde_json::from_value(json!({ "columnID": "archived" })).unwrap();
        assert_eq!(task.column_id, "archived");
        assert_eq!(task.visual_column(), None);
    }

    #[test]
    fn test_draft_into_task() {
        let draft = TaskDraft {
            title: "Plan".to_string(),
            subtasks: vec!["one".to_string(), "two".to_string()],
            ..Default::default()
        };
        let id = RecordId::new("task", 1);
        let task = draft.into_task(&id, "01.01.2025, 09:00:00");
        assert_eq!(task.column_id, "toDo");
        assert_eq!(task.checked_subtasks, vec![false, false]);
        assert_eq!(task.board_id, "task-001");
        assert!(task.subtasks_consistent());
    }

    #[test]
    fn test_edit_keeps_checked_state_by_text() {
        let mut task = Task {
            total_subtasks: vec!["a".into(), "b".into()],
            checked_subtasks: vec![false, true],
            subtasks_completed: 1,
            ..Default::default()
        };
        let draft = TaskDraft {
            subtasks: vec!["b".into(), "c".into()],
            ..Default::default()
        };
        draft.apply_to(&mut task, "02.01.2025, 09:00:00");
        assert_eq!(task.checked_subtasks, vec![true, false]);
        assert_eq!(task.subtasks_completed, 1);
    }

    #[test]
    fn test_date_parsing() {
        assert!(parse_board_date("03.02.2025, 10:00:00").is_some());
        assert!(parse_board_date("2025-02-03T10:00:00Z").is_some());
        assert!(parse_board_date("03.02.2025").is_some());
        assert!(parse_board_date("yesterday").is_none());
        assert_eq!(parse_deadline("31.12.2025"), NaiveDate::from_ymd_opt(2025, 12, 31));
    }

    #[test]
    fn test_matches_query() {
        let task = Task { title: "Fix Login".into(), description: "oauth flow".into(), ..Default::default() };
        assert!(task.matches("login"));
        assert!(task.matches("OAuth"));
        assert!(task.matches("  "));
        assert!(!task.matches("billing"));
    }
}
