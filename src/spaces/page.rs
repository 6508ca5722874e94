//! The space overview page: one add form and one membership table per role.
//! The CLI keeps it as a JSON snapshot between invocations.

use super::{role::Role, table::MembershipTable, upload::Overlay};
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("failed to read page snapshot: {0}")]
    Read(#[source] io::Error),
    #[error("failed to write page snapshot: {0}")]
    Write(#[source] io::Error),
    #[error("invalid page snapshot: {0}")]
    Format(#[from] serde_json::Error),
}

/// Add form of one role: its declared action URL and the current input value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddForm {
    pub action: String,
    #[serde(default, skip_serializing)]
    pub email: String,
}

impl AddForm {
    #[must_use]
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            email: String::new(),
        }
    }

    pub fn reset(&mut self) {
        self.email.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSection {
    pub form: AddForm,
    pub table: MembershipTable,
}

impl RoleSection {
    #[must_use]
    pub fn for_role(role: Role) -> Self {
        Self {
            form: AddForm::new(role.default_endpoint()),
            table: MembershipTable::new(role.default_endpoint()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub space_id: Option<u64>,
    pub managers: RoleSection,
    pub writers: RoleSection,
    #[serde(skip)]
    pub overlay: Overlay,
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Page {
    #[must_use]
    pub fn new(space_id: Option<u64>) -> Self {
        Self {
            space_id,
            managers: RoleSection::for_role(Role::Manager),
            writers: RoleSection::for_role(Role::Writer),
            overlay: Overlay::default(),
        }
    }

    #[must_use]
    pub fn section(&self, role: Role) -> &RoleSection {
        match role {
            Role::Manager => &self.managers,
            Role::Writer => &self.writers,
        }
    }

    pub fn section_mut(&mut self, role: Role) -> &mut RoleSection {
        match role {
            Role::Manager => &mut self.managers,
            Role::Writer => &mut self.writers,
        }
    }

    /// Loads a snapshot, falling back to an empty page when the file does not exist.
    ///
    /// # Errors
    /// Returns `PageError` if the file exists but cannot be read or decoded.
    pub fn load_or_default(path: &Path) -> Result<Self, PageError> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(PageError::Read(err)),
        }
    }

    /// # Errors
    /// Returns `PageError` if the snapshot cannot be encoded or written.
    pub fn save(&self, path: &Path) -> Result<(), PageError> {
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents).map_err(PageError::Write)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{Page, PageError};
    use crate::spaces::{role::Role, table::MembershipRow};

    #[test]
    fn missing_snapshot_yields_default_page() {
        let dir = tempfile::tempdir().unwrap();
        let page = Page::load_or_default(&dir.path().join("page.json")).unwrap();
        assert!(page.managers.table.is_empty());
        assert_eq!(page.writers.form.action, "spaces/api/writer/");
        assert!(page.overlay.is_interactive());
    }

    #[test]
    fn snapshot_keeps_rows_but_not_form_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");

        let mut page = Page::new(Some(7));
        page.managers.form.email = "typed@x.com".to_string();
        page.managers.table.append(MembershipRow::new(
            Role::Manager,
            1,
            "A".to_string(),
            "a@x.com".to_string(),
        ));
        page.save(&path).unwrap();

        let loaded = Page::load_or_default(&path).unwrap();
        assert_eq!(loaded.space_id, Some(7));
        assert_eq!(loaded.managers.table.rows(), page.managers.table.rows());
        assert!(loaded.managers.form.email.is_empty());
    }

    #[test]
    fn corrupt_snapshot_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            Page::load_or_default(&path),
            Err(PageError::Format(_))
        ));
    }
}
