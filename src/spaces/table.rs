//! Rendered membership tables. A table's rows are the client's only record of who
//! belongs to a space; display indexes are derived from the rows themselves.

use super::role::Role;
use serde::{Deserialize, Serialize};

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipRow {
    pub id: String,
    pub index: u32,
    pub name: String,
    pub email: String,
}

impl MembershipRow {
    #[must_use]
    pub fn new(role: Role, index: u32, name: String, email: String) -> Self {
        Self {
            id: role.row_id(index),
            index,
            name,
            email,
        }
    }

    /// The row's delete button: it points back at its own row and carries the email.
    #[must_use]
    pub fn delete_control(&self, role: Role) -> DeleteControl {
        DeleteControl {
            role,
            table_row_id: format!("#{}", self.id),
            email: self.email.clone(),
        }
    }
}

/// Attributes carried by a row's delete button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteControl {
    pub role: Role,
    pub table_row_id: String,
    pub email: String,
}

/// Next display index: the last rendered index plus one, or 1 for an empty table.
#[must_use]
pub fn next_index(rows: &[MembershipRow]) -> u32 {
    rows.last().map_or(0, |row| row.index).saturating_add(1)
}

/// Table body for one role together with its delete endpoint (`action-url`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipTable {
    pub action_url: String,
    #[serde(default)]
    pub rows: Vec<MembershipRow>,
}

impl MembershipTable {
    #[must_use]
    pub fn new(action_url: impl Into<String>) -> Self {
        Self {
            action_url: action_url.into(),
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[MembershipRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn append(&mut self, row: MembershipRow) {
        self.rows.push(row);
    }

    /// Removes the row with the given element id (`#` prefix optional).
    pub fn remove(&mut self, row_id: &str) -> Option<MembershipRow> {
        let row_id = row_id.trim_start_matches('#');
        let position = self.rows.iter().position(|row| row.id == row_id)?;
        Some(self.rows.remove(position))
    }

    /// Finds a row by element id (`managers-entry-2`, `#managers-entry-2`) or by
    /// its displayed index (`2`).
    #[must_use]
    pub fn find(&self, selector: &str) -> Option<&MembershipRow> {
        let selector = selector.trim().trim_start_matches('#');
        if let Ok(index) = selector.parse::<u32>() {
            return self.rows.iter().find(|row| row.index == index);
        }
        self.rows.iter().find(|row| row.id == selector)
    }
}

#[cfg(test)]
mod tests {
    use super::{next_index, MembershipRow, MembershipTable};
    use crate::spaces::role::Role;

    fn row(role: Role, index: u32, email: &str) -> MembershipRow {
        MembershipRow::new(role, index, format!("User {index}"), email.to_string())
    }

    #[test]
    fn next_index_starts_at_one() {
        assert_eq!(next_index(&[]), 1);
    }

    #[test]
    fn next_index_follows_last_row_not_row_count() {
        // Rows 1 and 2 were removed earlier; the last rendered index still wins.
        let rows = vec![row(Role::Writer, 3, "c@x.com"), row(Role::Writer, 7, "d@x.com")];
        assert_eq!(next_index(&rows), 8);
    }

    #[test]
    fn next_index_saturates() {
        let rows = vec![row(Role::Manager, u32::MAX, "a@x.com")];
        assert_eq!(next_index(&rows), u32::MAX);
    }

    #[test]
    fn remove_only_touches_the_identified_row() {
        let mut table = MembershipTable::new("spaces/api/writer/");
        table.append(row(Role::Writer, 1, "a@x.com"));
        table.append(row(Role::Writer, 2, "b@x.com"));
        table.append(row(Role::Writer, 3, "c@x.com"));

        let removed = table.remove("#writers-entry-2");
        assert_eq!(removed.map(|row| row.email), Some("b@x.com".to_string()));
        let emails: Vec<&str> = table.rows().iter().map(|row| row.email.as_str()).collect();
        assert_eq!(emails, vec!["a@x.com", "c@x.com"]);
        assert!(table.remove("writers-entry-2").is_none());
    }

    #[test]
    fn find_accepts_ids_and_indexes() {
        let mut table = MembershipTable::new("spaces/api/manager/");
        table.append(row(Role::Manager, 4, "a@x.com"));

        assert!(table.find("4").is_some());
        assert!(table.find("managers-entry-4").is_some());
        assert!(table.find("#managers-entry-4").is_some());
        assert!(table.find("1").is_none());
    }

    #[test]
    fn delete_control_points_at_its_row() {
        let row = row(Role::Manager, 1, "a@x.com");
        let control = row.delete_control(Role::Manager);
        assert_eq!(control.table_row_id, "#managers-entry-1");
        assert_eq!(control.email, "a@x.com");
    }
}
