use serde::{Deserialize, Serialize};
use std::fmt;

/// Membership roles on a space. Each role owns its own form, table and endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Manager,
    Writer,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Manager => "manager",
            Role::Writer => "writer",
        }
    }

    /// Plural name used for the table and row ids, e.g. `managers`.
    #[must_use]
    pub fn table_name(self) -> &'static str {
        match self {
            Role::Manager => "managers",
            Role::Writer => "writers",
        }
    }

    /// Element id of the row rendered at `index`.
    #[must_use]
    pub fn row_id(self, index: u32) -> String {
        format!("{}-entry-{index}", self.table_name())
    }

    /// Add and delete endpoint, relative to the configured base URL.
    #[must_use]
    pub fn default_endpoint(self) -> &'static str {
        match self {
            Role::Manager => "spaces/api/manager/",
            Role::Writer => "spaces/api/writer/",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
