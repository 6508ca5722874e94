use crate::cli::globals::GlobalArgs;
use crate::spaces::{
    Dialog, EventOutcome, MembershipEditor, MembershipTable, Page, Role, TerminalDialog, UiEvent,
};
use anyhow::{anyhow, Context, Result};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberOp {
    Add { email: String },
    Remove { row: String, assume_yes: bool },
    List,
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub role: Role,
    pub op: MemberOp,
}

/// Render a role's table as aligned text.
#[must_use]
pub fn render_table(role: Role, table: &MembershipTable) -> String {
    if table.is_empty() {
        return format!("No {} in this space.", role.table_name());
    }

    let name_width = table
        .rows()
        .iter()
        .map(|row| row.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Name".len());

    let mut out = format!("{:>3}  {:<name_width$}  Email\n", "#", "Name");
    for row in table.rows() {
        out.push_str(&format!(
            "{:>3}  {:<name_width$}  {}\n",
            row.index, row.name, row.email
        ));
    }
    out
}

/// Run one membership action against the page snapshot with the given dialog.
///
/// # Errors
/// Returns an error if the page snapshot cannot be read or written, the row does
/// not exist, or the client cannot be configured.
pub async fn apply<D: Dialog>(args: Args, dialog: D) -> Result<Option<EventOutcome>> {
    let Args { globals, role, op } = args;
    let mut page = Page::load_or_default(&globals.page)
        .with_context(|| format!("failed to load page {}", globals.page.display()))?;

    let event = match op {
        MemberOp::List => {
            println!("{}", render_table(role, &page.section(role).table).trim_end());
            return Ok(None);
        }
        MemberOp::Add { email } => {
            page.section_mut(role).form.email = email;
            UiEvent::SubmitAdd(role)
        }
        MemberOp::Remove { row, .. } => {
            let control = page
                .section(role)
                .table
                .find(&row)
                .map(|found| found.delete_control(role))
                .ok_or_else(|| anyhow!("no {role} row matches {row}"))?;
            UiEvent::ClickDelete {
                role: control.role,
                table_row_id: control.table_row_id,
                email: control.email,
            }
        }
    };

    let mut editor = MembershipEditor::new(globals.client()?, dialog);
    let outcome = editor.dispatch(&mut page, event).await;
    debug!(?outcome, "membership action finished");

    page.save(&globals.page)
        .with_context(|| format!("failed to save page {}", globals.page.display()))?;

    Ok(Some(outcome))
}

/// Handle a membership action from the terminal.
/// # Errors
/// Returns an error if the action cannot be applied.
pub async fn execute(args: Args) -> Result<()> {
    let assume_yes = matches!(args.op, MemberOp::Remove { assume_yes: true, .. });
    apply(args, TerminalDialog::new(assume_yes)).await?;
    Ok(())
}
