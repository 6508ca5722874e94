use crate::spaces::Role;
use clap::{Arg, ArgAction, Command};

/// `manager` / `writer` subcommand: the role's add form and table.
pub fn subcommand(role: Role) -> Command {
    Command::new(role.as_str())
        .about(match role {
            Role::Manager => "Manage the space managers",
            Role::Writer => "Manage the space writers",
        })
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("add")
                .about("Submit the add form with an email address")
                .arg(
                    Arg::new("email")
                        .help("Email of an existing portal user")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("remove")
                .about("Press the delete button of a table row")
                .arg(
                    Arg::new("row")
                        .help("Row id (e.g. managers-entry-2) or displayed index")
                        .required(true),
                )
                .arg(
                    Arg::new("yes")
                        .short('y')
                        .long("yes")
                        .help("Confirm the removal without prompting")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("list").about("Print the table"))
}

pub fn with_args(command: Command) -> Command {
    command
        .subcommand(subcommand(Role::Manager))
        .subcommand(subcommand(Role::Writer))
}
