//! Spreadsheet upload safeguards: the file input rejects oversized or unsupported
//! files before they are ever submitted, and submitting the upload form disables
//! the page behind an advisory banner while the file is in flight.

use super::dialog::Dialog;
use crate::api::{AppError, SpaceClient};
use reqwest::multipart::{Form, Part};
use secrecy::ExposeSecret;
use std::{fmt, fs, io, path::Path, path::PathBuf};
use tracing::{debug, info};

/// Largest accepted upload: 24 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 24 * 1024 * 1024;

/// Declared MIME types accepted by the space backend.
pub const SUPPORTED_TYPES: [&str; 9] = [
    "text/tab-separated-values",
    "application/vnd.ms-excel.sheet.macroenabled.12",
    "application/vnd.ms-excel",
    "application/vnd.oasis.opendocument.spreadsheet",
    "application/x-vnd.oasis.opendocument.spreadsheet",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.template",
    "application/vnd.ms-excel.template.macroenabled.12",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "text/csv",
];

pub const UPLOAD_BANNER: &str = "Please wait while the file is uploaded. \
The page has been disabled for safety during upload.\n\
Please make sure your internet supports speeds of at least of 2mbps.";

/// Form field names expected by the upload view.
const DOCUMENT_FIELD: &str = "document";
const CSRF_FIELD: &str = "csrfmiddlewaretoken";

/// Declared type for a file name, derived from its extension the way browsers do.
/// Unknown extensions have no declared type.
#[must_use]
pub fn content_type_for(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => "text/csv",
        "tsv" => "text/tab-separated-values",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xltx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.template",
        "xlsm" => "application/vnd.ms-excel.sheet.macroenabled.12",
        "xltm" => "application/vnd.ms-excel.template.macroenabled.12",
        "ods" => "application/vnd.oasis.opendocument.spreadsheet",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => "",
    }
}

/// A file picked in the upload input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSelection {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub content_type: String,
}

impl FileSelection {
    /// Reads size and name from disk; the declared type comes from `content_type`
    /// when given, otherwise from the extension.
    ///
    /// # Errors
    /// Returns an error if the file metadata cannot be read.
    pub fn from_path(path: &Path, content_type: Option<&str>) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content_type = content_type
            .map(str::to_string)
            .unwrap_or_else(|| content_type_for(&name).to_string());

        Ok(Self {
            path: path.to_path_buf(),
            name,
            size: metadata.len(),
            content_type,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadViolation {
    TooLarge,
    UnsupportedType,
}

impl fmt::Display for UploadViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadViolation::TooLarge => f.write_str("The max file size is 24 MiB"),
            UploadViolation::UnsupportedType => f.write_str("File type is not supported"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRejection {
    pub violations: Vec<UploadViolation>,
}

impl fmt::Display for UploadRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.violations.iter().map(ToString::to_string).collect();
        f.write_str(&messages.join("\n"))
    }
}

impl std::error::Error for UploadRejection {}

/// Checks size and declared type; every violated rule is reported.
///
/// # Errors
/// Returns `UploadRejection` listing the violations.
pub fn validate_selection(file: &FileSelection) -> Result<(), UploadRejection> {
    let mut violations = Vec::new();
    if file.size > MAX_UPLOAD_BYTES {
        violations.push(UploadViolation::TooLarge);
    }
    if !SUPPORTED_TYPES.contains(&file.content_type.as_str()) {
        violations.push(UploadViolation::UnsupportedType);
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(UploadRejection { violations })
    }
}

/// The upload form's file input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileInput {
    selection: Option<FileSelection>,
}

impl FileInput {
    #[must_use]
    pub fn selection(&self) -> Option<&FileSelection> {
        self.selection.as_ref()
    }

    /// Change handler: keeps a valid selection, otherwise alerts once and clears it.
    pub fn change<D: Dialog>(&mut self, file: FileSelection, dialog: &mut D) -> bool {
        match validate_selection(&file) {
            Ok(()) => {
                debug!(file = %file.name, size = file.size, "file selected");
                self.selection = Some(file);
                true
            }
            Err(rejection) => {
                dialog.alert(&rejection.to_string());
                self.selection = None;
                false
            }
        }
    }
}

/// Page-wide interaction lock shown while an upload is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    interactive: bool,
    banner: Option<&'static str>,
}

impl Default for Overlay {
    fn default() -> Self {
        Self {
            interactive: true,
            banner: None,
        }
    }
}

impl Overlay {
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    #[must_use]
    pub fn banner(&self) -> Option<&'static str> {
        self.banner
    }

    /// Disables the page and shows the advisory banner. There is no release: the
    /// page is replaced once the server answers the upload.
    pub fn engage<D: Dialog>(&mut self, dialog: &mut D) {
        self.interactive = false;
        if self.banner.is_none() {
            self.banner = Some(UPLOAD_BANNER);
            dialog.banner(UPLOAD_BANNER);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The server took the form and answered with a page or a redirect.
    Accepted {
        status: u16,
        location: Option<String>,
    },
    Rejected {
        status: u16,
        reason: Option<String>,
    },
}

/// The space's upload form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    pub action: String,
    pub input: FileInput,
}

impl UploadForm {
    #[must_use]
    pub fn for_space(space_id: u64) -> Self {
        Self {
            action: format!("spaces/{space_id}/file_upload"),
            input: FileInput::default(),
        }
    }

    /// Submit handler: locks the page, then posts the selected file as multipart.
    ///
    /// # Errors
    /// Returns an error if nothing is selected, the file cannot be read, or the
    /// request fails before a response arrives.
    pub async fn submit<D: Dialog>(
        &self,
        client: &SpaceClient,
        overlay: &mut Overlay,
        dialog: &mut D,
    ) -> Result<UploadOutcome, AppError> {
        let file = self
            .input
            .selection()
            .ok_or_else(|| AppError::Config("No file selected.".to_string()))?;

        overlay.engage(dialog);

        let bytes = tokio::fs::read(&file.path).await.map_err(|err| {
            AppError::Serialization(format!("Failed to read {}: {err}", file.path.display()))
        })?;
        let part = Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(&file.content_type)
            .map_err(|err| AppError::Serialization(format!("Invalid content type: {err}")))?;
        let form = Form::new()
            .text(
                CSRF_FIELD,
                client.config().csrf_token.expose_secret().to_string(),
            )
            .part(DOCUMENT_FIELD, part);

        let response = client.send_multipart(&self.action, form).await?;
        let status = response.status;
        info!(status = status.as_u16(), file = %file.name, "upload answered");

        if status.is_success() || status.is_redirection() {
            Ok(UploadOutcome::Accepted {
                status: status.as_u16(),
                location: response.location,
            })
        } else {
            Ok(UploadOutcome::Rejected {
                status: status.as_u16(),
                reason: response.message(),
            })
        }
    }
}
