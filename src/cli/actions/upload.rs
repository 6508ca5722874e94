use crate::cli::globals::GlobalArgs;
use crate::spaces::{
    upload::FileInput, Dialog, FileSelection, Page, TerminalDialog, UploadForm, UploadOutcome,
};
use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::{path::PathBuf, time::Duration};
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOp {
    Check,
    Send { space_id: Option<u64> },
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub file: PathBuf,
    pub content_type: Option<String>,
    pub op: UploadOp,
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

fn outcome_message(outcome: &UploadOutcome) -> String {
    match outcome {
        UploadOutcome::Accepted { status, location } => match location {
            Some(location) => {
                format!("The file has been submitted ({status}); the portal continues at {location}")
            }
            None => format!("The file has been submitted ({status})."),
        },
        UploadOutcome::Rejected { status, reason } => format!(
            "Uploading the file failed ({status}), reason: {}",
            reason.as_deref().unwrap_or("Unknown")
        ),
    }
}

/// Run one upload action with the given dialog.
///
/// # Errors
/// Returns an error if the file cannot be inspected, no space is known, or the
/// page snapshot cannot be read or written.
pub async fn apply<D: Dialog>(args: Args, mut dialog: D) -> Result<Option<UploadOutcome>> {
    let Args {
        globals,
        file,
        content_type,
        op,
    } = args;

    let selection = FileSelection::from_path(&file, content_type.as_deref())
        .with_context(|| format!("failed to read {}", file.display()))?;

    match op {
        UploadOp::Check => {
            let mut input = FileInput::default();
            if input.change(selection, &mut dialog) {
                if let Some(selected) = input.selection() {
                    dialog.alert(&format!(
                        "{} ({} bytes, {}) can be uploaded.",
                        selected.name, selected.size, selected.content_type
                    ));
                }
            }
            Ok(None)
        }
        UploadOp::Send { space_id } => {
            let mut page = Page::load_or_default(&globals.page)
                .with_context(|| format!("failed to load page {}", globals.page.display()))?;
            let space_id = space_id
                .or(page.space_id)
                .ok_or_else(|| anyhow!("missing required argument: --space-id"))?;

            let mut form = UploadForm::for_space(space_id);
            if !form.input.change(selection, &mut dialog) {
                return Ok(None);
            }

            let client = globals.client()?;
            let progress = spinner("Uploading");
            let result = form.submit(&client, &mut page.overlay, &mut dialog).await;
            progress.finish_and_clear();

            let outcome = match result {
                Ok(outcome) => outcome,
                Err(err) => {
                    error!("upload failed: {err}");
                    dialog.alert("Uploading the file failed; Please try again.");
                    return Ok(None);
                }
            };
            dialog.alert(&outcome_message(&outcome));

            if page.space_id.is_none() {
                page.space_id = Some(space_id);
                page.save(&globals.page)
                    .with_context(|| format!("failed to save page {}", globals.page.display()))?;
            }

            Ok(Some(outcome))
        }
    }
}

/// Handle an upload action from the terminal.
/// # Errors
/// Returns an error if the action cannot be applied.
pub async fn execute(args: Args) -> Result<()> {
    apply(args, TerminalDialog::default()).await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{apply, outcome_message, Args, UploadOp};
    use crate::cli::globals::GlobalArgs;
    use crate::spaces::{Page, RecordingDialog, UploadOutcome};
    use anyhow::Result;
    use secrecy::SecretString;
    use std::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[test]
    fn rejected_outcome_falls_back_to_unknown() {
        let message = outcome_message(&UploadOutcome::Rejected {
            status: 403,
            reason: None,
        });
        assert_eq!(message, "Uploading the file failed (403), reason: Unknown");
    }

    #[tokio::test]
    async fn check_rejects_pdf_without_network() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("report.pdf");
        std::fs::write(&file, b"%PDF-1.7")?;

        let mut dialog = RecordingDialog::default();
        let outcome = apply(
            Args {
                globals: GlobalArgs::new(
                    "http://localhost:8000".to_string(),
                    dir.path().join("page.json"),
                ),
                file,
                content_type: None,
                op: UploadOp::Check,
            },
            &mut dialog,
        )
        .await?;
        assert!(outcome.is_none());
        assert_eq!(dialog.alerts, vec!["File type is not supported".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn send_remembers_space_id() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/spaces/3/file_upload"))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", "/spaces/3/overview"))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir()?;
        let file = dir.path().join("leads.csv");
        std::fs::write(&file, "name,email\n")?;
        let page_path = dir.path().join("page.json");
        let mut globals = GlobalArgs::new(server.uri(), page_path.clone());
        globals.set_csrf_token(SecretString::from("csrf-token"));

        let mut dialog = RecordingDialog::default();
        let outcome = apply(
            Args {
                globals,
                file,
                content_type: None,
                op: UploadOp::Send { space_id: Some(3) },
            },
            &mut dialog,
        )
        .await?;

        assert!(matches!(
            outcome,
            Some(UploadOutcome::Accepted { status: 302, .. })
        ));
        assert_eq!(dialog.banners.len(), 1);
        assert_eq!(dialog.alerts.len(), 1);
        assert_eq!(Page::load_or_default(&page_path)?.space_id, Some(3));
        Ok(())
    }
}
