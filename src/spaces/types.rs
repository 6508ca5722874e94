//! Request and response bodies of the membership endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct MemberRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct MemberSummary {
    pub name: String,
    pub email: String,
}

/// Body of a `200` add response. A missing `changed` reads as "no change".
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AddMemberResponse {
    #[serde(default)]
    pub changed: bool,
    pub message: Option<String>,
    pub user: Option<MemberSummary>,
}
