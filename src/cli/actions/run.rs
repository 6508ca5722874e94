use crate::cli::actions::{members, upload, Action};
use anyhow::Result;

/// Execute the provided action.
// Single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Members(args) => members::execute(args).await,
        Action::Upload(args) => upload::execute(args).await,
    }
}
