//! Membership editor: the add and remove flows for managers and writers.
//!
//! Both flows follow the same three-way branch on the response:
//!
//! 1. **`200`:** the server's answer is applied to the table.
//! 2. **Other status:** the server's `message` (or `Unknown`) is shown, nothing changes.
//! 3. **Transport or decode failure:** a generic message is shown and the error is logged.
//!
//! Every outcome produces exactly one alert. Requests are never retried.

use super::{
    dialog::Dialog,
    page::Page,
    role::Role,
    table::{next_index, MembershipRow},
    types::{AddMemberResponse, MemberRequest},
};
use crate::api::{AppError, SpaceClient};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{error, info, info_span, Instrument};

const DEFAULT_SUCCESS: &str = "Success";
const UNKNOWN_REASON: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(MembershipRow),
    AlreadyPresent,
    Rejected { status: u16, reason: Option<String> },
    Failed,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(Option<MembershipRow>),
    Declined,
    Rejected { status: u16, reason: Option<String> },
    Failed,
}

/// User actions the editor reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    SubmitAdd(Role),
    ClickDelete {
        role: Role,
        table_row_id: String,
        email: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Add(AddOutcome),
    Remove(RemoveOutcome),
    /// The page was locked by an upload; the event never reached a handler.
    Ignored,
}

static EMAIL_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

#[must_use]
pub fn valid_email(email: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|re| re.is_match(email))
}

fn message_of(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn already_present_message(role: Role) -> String {
    format!("The user has already been added in this space as a {role}.")
}

fn add_rejected_message(role: Role, reason: &str) -> String {
    match role {
        Role::Manager => format!("Error while adding manager, reason: {reason}"),
        Role::Writer => {
            format!("Error while adding writer, reason: {reason}; Please reload the page.")
        }
    }
}

fn add_failed_message(role: Role) -> String {
    format!("Error while adding {role}; Please reload the page.")
}

fn remove_confirmation_message(email: &str) -> String {
    format!("Do you want to remove this user {email} from this space")
}

fn remove_rejected_message(role: Role, reason: &str) -> String {
    format!(
        "Removing {role} failed, Please try again or reload. Reason: {reason}; Please reload the page."
    )
}

fn remove_failed_message(role: Role) -> String {
    format!("Removing {role} failed, Please try again or reload.")
}

pub struct MembershipEditor<D: Dialog> {
    client: SpaceClient,
    dialog: D,
}

impl<D: Dialog> MembershipEditor<D> {
    #[must_use]
    pub fn new(client: SpaceClient, dialog: D) -> Self {
        Self { client, dialog }
    }

    #[must_use]
    pub fn dialog(&self) -> &D {
        &self.dialog
    }

    /// Routes a user action to the handler registered for its role.
    pub async fn dispatch(&mut self, page: &mut Page, event: UiEvent) -> EventOutcome {
        if !page.overlay.is_interactive() {
            return EventOutcome::Ignored;
        }

        match event {
            UiEvent::SubmitAdd(role) => EventOutcome::Add(self.add(page, role).await),
            UiEvent::ClickDelete {
                role,
                table_row_id,
                email,
            } => EventOutcome::Remove(self.remove(page, role, &table_row_id, &email).await),
        }
    }

    /// Submit handler of a role's add form.
    pub async fn add(&mut self, page: &mut Page, role: Role) -> AddOutcome {
        let section = page.section_mut(role);
        let email = section.form.email.trim().to_string();

        if !valid_email(&email) {
            self.dialog.alert("Please enter a valid email address.");
            return AddOutcome::Invalid;
        }

        let span = info_span!("spaces.add_member", role = %role);
        let response = match self
            .client
            .send_json(Method::POST, &section.form.action, &MemberRequest { email: &email })
            .instrument(span)
            .await
        {
            Ok(response) => response,
            Err(err) => return self.add_failed(role, &err),
        };

        if response.status != StatusCode::OK {
            let body: Value = match response.json() {
                Ok(body) => body,
                Err(err) => return self.add_failed(role, &err),
            };
            let reason = message_of(&body);
            self.dialog.alert(&add_rejected_message(
                role,
                reason.as_deref().unwrap_or(UNKNOWN_REASON),
            ));
            return AddOutcome::Rejected {
                status: response.status.as_u16(),
                reason,
            };
        }

        let data: AddMemberResponse = match response.json() {
            Ok(data) => data,
            Err(err) => return self.add_failed(role, &err),
        };

        let outcome = if data.changed {
            let Some(user) = data.user else {
                return self.add_failed(
                    role,
                    &AppError::Parse("changed membership without a user".to_string()),
                );
            };
            let index = next_index(section.table.rows());
            let row = MembershipRow::new(role, index, user.name, user.email);
            section.table.append(row.clone());
            info!(role = %role, row = %row.id, "member added");
            self.dialog
                .alert(data.message.as_deref().unwrap_or(DEFAULT_SUCCESS));
            AddOutcome::Added(row)
        } else {
            self.dialog.alert(&already_present_message(role));
            AddOutcome::AlreadyPresent
        };

        section.form.reset();
        outcome
    }

    /// Click handler of a row's delete control.
    pub async fn remove(
        &mut self,
        page: &mut Page,
        role: Role,
        table_row_id: &str,
        email: &str,
    ) -> RemoveOutcome {
        if !self.dialog.confirm(&remove_confirmation_message(email)) {
            return RemoveOutcome::Declined;
        }

        let table = &mut page.section_mut(role).table;
        let span = info_span!("spaces.remove_member", role = %role, row = %table_row_id);
        let response = match self
            .client
            .send_json(Method::DELETE, &table.action_url, &MemberRequest { email })
            .instrument(span)
            .await
        {
            Ok(response) => response,
            Err(err) => return self.remove_failed(role, email, &err),
        };

        // Every answer must carry a JSON body, whatever its status.
        let body: Value = match response.json() {
            Ok(body) => body,
            Err(err) => return self.remove_failed(role, email, &err),
        };

        let message = message_of(&body);
        if response.status == StatusCode::OK {
            let removed = table.remove(table_row_id);
            info!(role = %role, row = %table_row_id, "member removed");
            self.dialog
                .alert(message.as_deref().unwrap_or(DEFAULT_SUCCESS));
            RemoveOutcome::Removed(removed)
        } else {
            self.dialog.alert(&remove_rejected_message(
                role,
                message.as_deref().unwrap_or(UNKNOWN_REASON),
            ));
            RemoveOutcome::Rejected {
                status: response.status.as_u16(),
                reason: message,
            }
        }
    }

    fn remove_failed(&mut self, role: Role, email: &str, err: &AppError) -> RemoveOutcome {
        error!("removing {role} {email} failed: {err}");
        self.dialog.alert(&remove_failed_message(role));
        RemoveOutcome::Failed
    }

    fn add_failed(&mut self, role: Role, err: &AppError) -> AddOutcome {
        error!("adding {role} failed: {err}");
        self.dialog.alert(&add_failed_message(role));
        AddOutcome::Failed
    }
}
