//! Record Identifier
//!
//! Ids look like `task-007`: a prefix, a dash and a zero-padded number.

use serde::{Deserialize, Serialize};

/// Width the number is padded to
const PAD_WIDTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Build an id from its parts, padding the number to three digits
    pub fn new(prefix: &str, number: u32) -> Self {
        Self(format!("{}-{:0width$}", prefix, number, width = PAD_WIDTH))
    }

    /// Wrap an existing key without checking its shape
    pub fn from_key(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Split a well-formed key into `(prefix, number)`
    pub fn parse(key: &str) -> Option<(&str, u32)> {
        let (prefix, digits) = key.rsplit_once('-')?;
        if prefix.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(|n| (prefix, n))
    }

    pub fn prefix(&self) -> Option<&str> {
        Self::parse(&self.0).map(|(p, _)| p)
    }

    pub fn number(&self) -> Option<u32> {
        Self::parse(&self.0).map(|(_, n)| n)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pads_to_three_digits() {
        assert_eq!(RecordId::new("task", 7).as_str(), "task-007");
        assert_eq!(RecordId::new("contact", 42).as_str(), "contact-042");
        assert_eq!(RecordId::new("task", 1000).as_str(), "task-1000");
    }

    #[test]
    fn test_parse() {
        assert_eq!(RecordId::parse("task-007"), Some(("task", 7)));
        assert_eq!(RecordId::parse("my-task-012"), Some(("my-task", 12)));
        assert_eq!(RecordId::parse("task-"), None);
        assert_eq!(RecordId::parse("task-1a"), None);
        assert_eq!(RecordId::parse("-001"), None);
        assert_eq!(RecordId::parse("task"), None);
    }
}
