use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("importwalk")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("importwalk")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress the summary header and log output").required(false))
        .subcommand_required(true)
        .subcommand(
            command!("walk")
                .about(
                    "Walk the spanning tree of the HTML Imports graph from an entry document and \
                report every document, import and selected element.",
                )
                .arg(
                    arg!(<ENTRY>)
                        .required(true)
                        .help("Path to the entry HTML document")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(-s --"select" <CSS>)
                        .required(false)
                        .action(clap::ArgAction::Append)
                        .help("CSS selector of elements to visit (repeatable)"),
                )
                .arg(
                    arg!(-t --"tag" <TAG>)
                        .required(false)
                        .action(clap::ArgAction::Append)
                        .help("Tag name of elements to visit (repeatable)"),
                )
                .arg(
                    arg!(--"omit" <PATH>)
                        .required(false)
                        .action(clap::ArgAction::Append)
                        .help("Document whose import subtree is skipped (repeatable)"),
                )
                .arg(arg!(--"json" "Print the recorded events as JSON").required(false)),
        )
        .subcommand(
            command!("order")
                .about("Print the documents of the spanning tree in traversal order")
                .arg(
                    arg!(<ENTRY>)
                        .required(true)
                        .help("Path to the entry HTML document")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--"omit" <PATH>)
                        .required(false)
                        .action(clap::ArgAction::Append)
                        .help("Document whose import subtree is skipped (repeatable)"),
                ),
        )
}
