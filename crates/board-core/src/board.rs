//! Board View
//!
//! Groups the cached task set into the four visual columns and derives the
//! summary counters shown next to the board.

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::domain::{Priority, Task, VisualColumn};

/// A task ready to render, with its store key
#[derive(Debug, Clone, PartialEq)]
pub struct TaskCard {
    pub id: String,
    pub task: Task,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub column: VisualColumn,
    pub cards: Vec<TaskCard>,
}

/// The four columns, left to right
#[derive(Debug, Clone, PartialEq)]
pub struct BoardBuckets {
    pub buckets: Vec<Bucket>,
}

impl BoardBuckets {
    /// Group decoded task records by column.
    ///
    /// Records that do not parse as a task are skipped. Tasks whose
    /// `columnID` is not in the mapping table are left out of every bucket
    /// (they stay in the cache). Each bucket is stably sorted by `createdAt`
    /// ascending; unparseable stamps go last in their original order.
    pub fn group<'a>(records: impl IntoIterator<Item = (&'a str, &'a Value)>) -> Self {
        let mut buckets: Vec<Bucket> = VisualColumn::ALL
            .iter()
            .map(|c| Bucket { column: *c, cards: Vec::new() })
            .collect();

        for (id, record) in records {
            let task: Task = match serde_json::from_value(record.clone()) {
                Ok(task) => task,
                Err(e) => {
                    log::warn!("[board] skipping task {}: {}", id, e);
                    continue;
                }
            };
            match task.visual_column() {
                Some(column) => buckets[column.index()].cards.push(TaskCard { id: id.to_string(), task }),
                None => log::debug!("[board] task {} has unmapped column {:?}", id, task.column_id),
            }
        }

        for bucket in &mut buckets {
            bucket.cards.sort_by(|a, b| compare_created(a.task.created(), b.task.created()));
        }
        Self { buckets }
    }

    pub fn bucket(&self, column: VisualColumn) -> Option<&Bucket> {
        self.buckets.iter().find(|b| b.column == column)
    }

    /// Cards of `column`, empty when the bucket is missing
    pub fn cards(&self, column: VisualColumn) -> &[TaskCard] {
        self.bucket(column).map_or(&[], |b| b.cards.as_slice())
    }

    /// Column currently holding `id`
    pub fn column_of(&self, id: &str) -> Option<VisualColumn> {
        self.buckets
            .iter()
            .find(|b| b.cards.iter().any(|c| c.id == id))
            .map(|b| b.column)
    }

    /// Keep only cards matching the search query, preserving order
    pub fn filter(&self, query: &str) -> Self {
        Self {
            buckets: self
                .buckets
                .iter()
                .map(|b| Bucket {
                    column: b.column,
                    cards: b.cards.iter().filter(|c| c.task.matches(query)).cloned().collect(),
                })
                .collect(),
        }
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.cards.len()).sum()
    }
}

/// Parsed dates first (ascending), then unparseable ones
fn compare_created(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Counters for the summary view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardSummary {
    pub total: usize,
    pub to_do: usize,
    pub in_progress: usize,
    pub await_feedback: usize,
    pub done: usize,
    pub urgent: usize,
    /// Earliest deadline among urgent tasks that are not done
    pub next_urgent_deadline: Option<NaiveDate>,
}

impl BoardSummary {
    pub fn from_buckets(board: &BoardBuckets) -> Self {
        let count = |c: VisualColumn| board.cards(c).len();
        let open_urgent = board
            .buckets
            .iter()
            .filter(|b| b.column != VisualColumn::Done)
            .flat_map(|b| b.cards.iter())
            .filter(|c| c.task.priority == Priority::Urgent);
        Self {
            total: board.total(),
            to_do: count(VisualColumn::ToDo),
            in_progress: count(VisualColumn::InProgress),
            await_feedback: count(VisualColumn::AwaitFeedback),
            done: count(VisualColumn::Done),
            urgent: board
                .buckets
                .iter()
                .flat_map(|b| b.cards.iter())
                .filter(|c| c.task.is_urgent())
                .count(),
            next_urgent_deadline: open_urgent.filter_map(|c| c.task.deadline_date()).min(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records() -> Vec<(String, Value)> {
        vec![
            ("task-001".into(), json!({"title": "late", "columnID": "toDo", "createdAt": "05.01.2025, 10:00:00"})),
            ("task-002".into(), json!({"title": "early", "columnID": "toDo", "createdAt": "01.01.2025, 10:00:00"})),
            ("task-003".into(), json!({"title": "bad date", "columnID": "toDo", "createdAt": "someday"})),
            ("task-004".into(), json!({"title": "mid", "columnID": "toDo", "createdAt": "03.01.2025"})),
            ("task-005".into(), json!({"title": "review", "columnID": "review", "priority": "urgent", "deadline": "10.02.2025"})),
            ("task-006".into(), json!({"title": "lost", "columnID": "archived"})),
            ("task-007".into(), json!({"title": 12})),
            ("task-008".into(), json!({"title": "shipped", "columnID": "done", "priority": "urgent", "deadline": "01.02.2025"})),
        ]
    }

    fn group(records: &[(String, Value)]) -> BoardBuckets {
        BoardBuckets::group(records.iter().map(|(k, v)| (k.as_str(), v)))
    }

    #[test]
    fn test_group_sorts_by_created_with_invalid_last() {
        let recs = records();
        let board = group(&recs);
        let ids: Vec<&str> = board.cards(VisualColumn::ToDo).iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["task-002", "task-004", "task-001", "task-003"]);
        assert_eq!(board.cards(VisualColumn::AwaitFeedback).len(), 1);
        assert_eq!(board.column_of("task-008"), Some(VisualColumn::Done));
    }

    #[test]
    fn test_unmapped_and_malformed_tasks_are_excluded() {
        let recs = records();
        let board = group(&recs);
        assert_eq!(board.column_of("task-006"), None);
        assert_eq!(board.column_of("task-007"), None);
        assert_eq!(board.total(), 6);
    }

    #[test]
    fn test_grouping_is_idempotent() {
        let recs = records();
        assert_eq!(group(&recs), group(&recs));
    }

    #[test]
    fn test_filter_keeps_order() {
        let recs = records();
        let board = group(&recs).filter("E");
        let ids: Vec<&str> = board.cards(VisualColumn::ToDo).iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["task-002", "task-001", "task-003"]);
    }

    #[test]
    fn test_missing_buckets_count_as_empty() {
        let recs = records();
        let mut board = group(&recs);
        board.buckets.retain(|b| b.column == VisualColumn::ToDo);
        assert!(board.bucket(VisualColumn::Done).is_none());
        assert!(board.cards(VisualColumn::Done).is_empty());
        let summary = BoardSummary::from_buckets(&board);
        assert_eq!(summary.to_do, 4);
        assert_eq!(summary.done, 0);
        assert_eq!(BoardSummary::from_buckets(&BoardBuckets { buckets: Vec::new() }), BoardSummary::default());
    }

    #[test]
    fn test_summary_counts() {
        let recs = records();
        let summary = BoardSummary::from_buckets(&group(&recs));
        assert_eq!(summary.total, 6);
        assert_eq!(summary.to_do, 4);
        assert_eq!(summary.await_feedback, 1);
        assert_eq!(summary.done, 1);
        assert_eq!(summary.urgent, 2);
        // The done task's earlier deadline does not count
        assert_eq!(summary.next_urgent_deadline, NaiveDate::from_ymd_opt(2025, 2, 10));
    }
}
