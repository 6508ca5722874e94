//! # Spaces (membership editor)
//!
//! `spaces` is the client side of a document space. A space owner attaches two
//! kinds of members to a space, **managers** and **writers**, and uploads
//! spreadsheets into it. This crate drives those interactions against the
//! space backend's JSON API.
//!
//! ## Page model
//!
//! The browser page is modelled as a [`spaces::page::Page`]: one add form and one
//! membership table per role. The table is the only state. Rows are appended when
//! the backend reports a change and removed after a confirmed delete; they are
//! never edited in place.
//!
//! ## Request layer
//!
//! [`api::SpaceClient`] sends every mutation with:
//! 1. **CSRF:** `X-CSRFToken`, taken from injected [`api::ApiConfig`].
//! 2. **Same origin:** relative action URLs resolve against the base URL; other
//!    origins are refused before any bytes leave the process.
//! 3. **Request id:** a ULID in `X-Request-Id`, also recorded on the tracing span.
//!
//! ## Outcomes
//!
//! Each user action produces exactly one notification through the
//! [`spaces::dialog::Dialog`] seam. Nothing is retried; the user re-initiates.

pub mod api;
pub mod cli;
pub mod spaces;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
