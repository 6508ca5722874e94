//! User-facing notifications. Messages shown here must be safe to display and
//! never include tokens or cookies.

use dialoguer::Confirm;
use tracing::warn;

/// Modal notification surface of the page.
pub trait Dialog {
    /// Blocking notification, one per user action outcome.
    fn alert(&mut self, message: &str);

    /// Explicit yes/no question; `false` aborts the action.
    fn confirm(&mut self, message: &str) -> bool;

    /// Non-modal advisory banner.
    fn banner(&mut self, message: &str);
}

impl<T: Dialog + ?Sized> Dialog for &mut T {
    fn alert(&mut self, message: &str) {
        (**self).alert(message);
    }

    fn confirm(&mut self, message: &str) -> bool {
        (**self).confirm(message)
    }

    fn banner(&mut self, message: &str) {
        (**self).banner(message);
    }
}

/// Terminal dialog: alerts and banners go to stdout, confirmations are prompted.
#[derive(Debug, Default)]
pub struct TerminalDialog {
    assume_yes: bool,
}

impl TerminalDialog {
    #[must_use]
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Dialog for TerminalDialog {
    fn alert(&mut self, message: &str) {
        println!("{message}");
    }

    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        match Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
        {
            Ok(answer) => answer,
            Err(err) => {
                warn!("confirmation prompt failed: {err}");
                false
            }
        }
    }

    fn banner(&mut self, message: &str) {
        println!("{message}");
    }
}

/// Records every interaction; confirmations answer with a fixed reply.
#[derive(Debug, Default, Clone)]
pub struct RecordingDialog {
    pub reply: bool,
    pub alerts: Vec<String>,
    pub confirmations: Vec<String>,
    pub banners: Vec<String>,
}

impl RecordingDialog {
    #[must_use]
    pub fn replying(reply: bool) -> Self {
        Self {
            reply,
            ..Self::default()
        }
    }
}

impl Dialog for RecordingDialog {
    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.confirmations.push(message.to_string());
        self.reply
    }

    fn banner(&mut self, message: &str) {
        self.banners.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::{Dialog, RecordingDialog, TerminalDialog};

    #[test]
    fn terminal_dialog_assumes_yes_without_prompting() {
        let mut dialog = TerminalDialog::new(true);
        assert!(dialog.confirm("Do you want to remove this user a@x.com from this space"));
    }

    #[test]
    fn recording_dialog_replays_configured_answer() {
        let mut dialog = RecordingDialog::replying(false);
        assert!(!dialog.confirm("sure?"));
        dialog.alert("done");
        assert_eq!(dialog.confirmations, vec!["sure?".to_string()]);
        assert_eq!(dialog.alerts, vec!["done".to_string()]);
    }
}
