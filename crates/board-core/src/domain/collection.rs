//! Collection Names
//!
//! The remote snapshot holds one subtree per collection.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Tasks,
    Contacts,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Tasks, Collection::Contacts];

    /// Key of the subtree in the remote snapshot
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Tasks => "tasks",
            Collection::Contacts => "contacts",
        }
    }

    /// Prefix used for record ids in this collection
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Collection::Tasks => "task",
            Collection::Contacts => "contact",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
