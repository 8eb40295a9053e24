//! Column Assignment Model
//!
//! Fixed bijection between the board's visual column ids and the values the
//! store keeps in a task's `columnID` field.

use serde::{Deserialize, Serialize};

/// Column ids as rendered on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisualColumn {
    ToDo,
    InProgress,
    AwaitFeedback,
    Done,
}

/// Column values as persisted in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RemoteColumn {
    ToDo,
    InProgress,
    Review,
    Done,
}

impl VisualColumn {
    /// Board order, left to right
    pub const ALL: [VisualColumn; 4] = [
        VisualColumn::ToDo,
        VisualColumn::InProgress,
        VisualColumn::AwaitFeedback,
        VisualColumn::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VisualColumn::ToDo => "to-do",
            VisualColumn::InProgress => "in-progress",
            VisualColumn::AwaitFeedback => "await-feedback",
            VisualColumn::Done => "done",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "to-do" => Some(VisualColumn::ToDo),
            "in-progress" => Some(VisualColumn::InProgress),
            "await-feedback" => Some(VisualColumn::AwaitFeedback),
            "done" => Some(VisualColumn::Done),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VisualColumn::ToDo => "To do",
            VisualColumn::InProgress => "In progress",
            VisualColumn::AwaitFeedback => "Await feedback",
            VisualColumn::Done => "Done",
        }
    }

    /// `toRemoteColumn`
    pub fn to_remote(self) -> RemoteColumn {
        match self {
            VisualColumn::ToDo => RemoteColumn::ToDo,
            VisualColumn::InProgress => RemoteColumn::InProgress,
            VisualColumn::AwaitFeedback => RemoteColumn::Review,
            VisualColumn::Done => RemoteColumn::Done,
        }
    }

    /// Position in `ALL`
    pub fn index(self) -> usize {
        match self {
            VisualColumn::ToDo => 0,
            VisualColumn::InProgress => 1,
            VisualColumn::AwaitFeedback => 2,
            VisualColumn::Done => 3,
        }
    }
}

impl RemoteColumn {
    pub const ALL: [RemoteColumn; 4] = [
        RemoteColumn::ToDo,
        RemoteColumn::InProgress,
        RemoteColumn::Review,
        RemoteColumn::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteColumn::ToDo => "toDo",
            RemoteColumn::InProgress => "inProgress",
            RemoteColumn::Review => "review",
            RemoteColumn::Done => "done",
        }
    }

    /// Unmapped values yield `None`; callers drop such tasks from rendering.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "toDo" => Some(RemoteColumn::ToDo),
            "inProgress" => Some(RemoteColumn::InProgress),
            "review" => Some(RemoteColumn::Review),
            "done" => Some(RemoteColumn::Done),
            _ => None,
        }
    }

    /// `toVisualColumn`
    pub fn to_visual(self) -> VisualColumn {
        match self {
            RemoteColumn::ToDo => VisualColumn::ToDo,
            RemoteColumn::InProgress => VisualColumn::InProgress,
            RemoteColumn::Review => VisualColumn::AwaitFeedback,
            RemoteColumn::Done => VisualColumn::Done,
        }
    }
}

impl std::fmt::Display for VisualColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Display for RemoteColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_is_a_bijection() {
        for v in VisualColumn::ALL {
            assert_eq!(v.to_remote().to_visual(), v);
        }
        for r in RemoteColumn::ALL {
            assert_eq!(r.to_visual().to_remote(), r);
        }
    }

    #[test]
    fn test_string_forms() {
        assert_eq!(VisualColumn::AwaitFeedback.to_remote().as_str(), "review");
        assert_eq!(RemoteColumn::parse("inProgress").map(RemoteColumn::to_visual), Some(VisualColumn::InProgress));
        assert_eq!(RemoteColumn::parse("archived"), None);
        for v in VisualColumn::ALL {
            assert_eq!(VisualColumn::parse(v.as_str()), Some(v));
        }
    }

    #[test]
    fn test_serde_matches_wire_names() {
        assert_eq!(serde_json::to_string(&RemoteColumn::ToDo).unwrap(), "\"toDo\"");
        assert_eq!(serde_json::to_string(&VisualColumn::AwaitFeedback).unwrap(), "\"await-feedback\"");
    }
}
