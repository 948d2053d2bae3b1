use colored::Colorize;
use commands::command_argument_builder;
use importwalk::handlers::{handle_order, handle_walk};

mod commands;

fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    if !quiet {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .init();
    }

    let result = match chosen_command.subcommand() {
        Some(("walk", primary_command)) => handle_walk(primary_command, quiet),
        Some(("order", primary_command)) => handle_order(primary_command),
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
