//! Space page components: membership editing for managers and writers, and the
//! spreadsheet upload safeguards.

pub mod dialog;
pub mod editor;
pub mod page;
pub mod role;
pub mod table;
pub mod types;
pub mod upload;

pub use self::dialog::{Dialog, RecordingDialog, TerminalDialog};
pub use self::editor::{AddOutcome, EventOutcome, MembershipEditor, RemoveOutcome, UiEvent};
pub use self::page::{Page, PageError};
pub use self::role::Role;
pub use self::table::{next_index, MembershipRow, MembershipTable};
pub use self::upload::{FileSelection, UploadForm, UploadOutcome};
