use crate::cli::{
    actions::{
        members::{self, MemberOp},
        upload::{self, UploadOp},
        Action,
    },
    globals::GlobalArgs,
};
use crate::spaces::Role;
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use std::path::PathBuf;

fn globals(matches: &clap::ArgMatches) -> Result<GlobalArgs> {
    let base_url = matches
        .get_one::<String>("base-url")
        .cloned()
        .context("missing required argument: --base-url")?;
    let page = matches
        .get_one::<PathBuf>("page")
        .cloned()
        .context("missing required argument: --page")?;

    let mut globals = GlobalArgs::new(base_url, page);
    if let Some(token) = matches.get_one::<String>("csrf-token") {
        globals.set_csrf_token(SecretString::from(token.clone()));
    }
    if let Some(cookie) = matches.get_one::<String>("session-cookie") {
        globals.set_session_cookie(SecretString::from(cookie.clone()));
    }

    Ok(globals)
}

fn member_op(matches: &clap::ArgMatches) -> Result<MemberOp> {
    match matches.subcommand() {
        Some(("add", sub_m)) => Ok(MemberOp::Add {
            email: sub_m
                .get_one::<String>("email")
                .cloned()
                .context("missing required argument: <email>")?,
        }),
        Some(("remove", sub_m)) => Ok(MemberOp::Remove {
            row: sub_m
                .get_one::<String>("row")
                .cloned()
                .context("missing required argument: <row>")?,
            assume_yes: sub_m.get_flag("yes"),
        }),
        Some(("list", _)) => Ok(MemberOp::List),
        _ => Err(anyhow!("unknown membership command")),
    }
}

fn upload_args(globals: GlobalArgs, matches: &clap::ArgMatches) -> Result<upload::Args> {
    let (op, sub_m) = match matches.subcommand() {
        Some(("check", sub_m)) => (UploadOp::Check, sub_m),
        Some(("send", sub_m)) => (
            UploadOp::Send {
                space_id: sub_m.get_one::<u64>("space-id").copied(),
            },
            sub_m,
        ),
        _ => return Err(anyhow!("unknown upload command")),
    };

    Ok(upload::Args {
        globals,
        file: sub_m
            .get_one::<PathBuf>("file")
            .cloned()
            .context("missing required argument: <file>")?,
        content_type: sub_m.get_one::<String>("content-type").cloned(),
        op,
    })
}

/// # Errors
/// Returns an error if required arguments are missing or the subcommand is unknown.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let globals = globals(matches)?;

    match matches.subcommand() {
        Some(("manager", sub_m)) => Ok(Action::Members(members::Args {
            globals,
            role: Role::Manager,
            op: member_op(sub_m)?,
        })),
        Some(("writer", sub_m)) => Ok(Action::Members(members::Args {
            globals,
            role: Role::Writer,
            op: member_op(sub_m)?,
        })),
        Some(("upload", sub_m)) => Ok(Action::Upload(upload_args(globals, sub_m)?)),
        _ => Err(anyhow!("missing subcommand")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::handler;
    use crate::cli::{
        actions::{members::MemberOp, upload::UploadOp, Action},
        commands,
    };
    use crate::spaces::Role;
    use secrecy::ExposeSecret;
    use std::path::PathBuf;

    #[test]
    fn dispatches_writer_remove() {
        let matches = commands::new().get_matches_from(vec![
            "spaces",
            "--csrf-token",
            "token",
            "--page",
            "page.json",
            "writer",
            "remove",
            "writers-entry-2",
            "-y",
        ]);

        let Action::Members(args) = handler(&matches).unwrap() else {
            panic!("expected a membership action");
        };
        assert_eq!(args.role, Role::Writer);
        assert_eq!(
            args.op,
            MemberOp::Remove {
                row: "writers-entry-2".to_string(),
                assume_yes: true
            }
        );
        assert_eq!(args.globals.csrf_token.expose_secret(), "token");
        assert_eq!(args.globals.page, PathBuf::from("page.json"));
    }

    #[test]
    fn dispatches_upload_check() {
        let matches =
            commands::new().get_matches_from(vec!["spaces", "upload", "check", "leads.csv"]);

        let Action::Upload(args) = handler(&matches).unwrap() else {
            panic!("expected an upload action");
        };
        assert_eq!(args.op, UploadOp::Check);
        assert_eq!(args.file, PathBuf::from("leads.csv"));
        assert!(args.content_type.is_none());
    }
}
