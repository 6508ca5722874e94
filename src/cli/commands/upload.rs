use clap::{Arg, Command};

fn file_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("file")
                .help("Spreadsheet to upload")
                .required(true)
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            Arg::new("content-type")
                .long("content-type")
                .help("Declared MIME type, derived from the file extension when omitted"),
        )
}

pub fn with_args(command: Command) -> Command {
    command.subcommand(
        Command::new("upload")
            .about("Upload a spreadsheet into the space")
            .subcommand_required(true)
            .arg_required_else_help(true)
            .subcommand(file_args(
                Command::new("check").about("Validate a file the way the upload input does"),
            ))
            .subcommand(file_args(
                Command::new("send")
                    .about("Validate and submit the upload form")
                    .arg(
                        Arg::new("space-id")
                            .long("space-id")
                            .help("Space receiving the file, defaults to the page's space")
                            .env("SPACES_SPACE_ID")
                            .value_parser(clap::value_parser!(u64)),
                    ),
            )),
    )
}
