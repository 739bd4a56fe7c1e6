//! Command-line interface for soyparse
//! Parses a soy template file and prints its AST in one of the available formats.
//!
//! Usage:
//!   soyparse `<path>` [--format `<format>`] [--max-depth `<n>`]  - Parse a file and print its AST
//!   soyparse list-formats                                    - List all available output formats
//!
//! Set `RUST_LOG=soyparse=debug` to see parser tracing on stderr.

use clap::{value_parser, Arg, ArgMatches, Command};
use soyparse::soy::processor::{available_formats, process_file, OutputFormat};
use soyparse::ParseOptions;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soyparse=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let matches = Command::new("soyparse")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for parsing soy template files and inspecting their AST")
        .arg_required_else_help(true)
        .subcommand_negates_reqs(true)
        .args_conflicts_with_subcommands(true)
        .arg(
            Arg::new("path")
                .help("Path to the soy file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format (e.g., 'ast-treeviz', 'ast-json')")
                .default_value("ast-treeviz"),
        )
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .help("Maximum block nesting depth accepted by the parser")
                .value_parser(value_parser!(usize)),
        )
        .subcommand(Command::new("list-formats").about("List available output formats"))
        .get_matches();

    match matches.subcommand() {
        Some(("list-formats", _)) => handle_list_formats_command(),
        _ => handle_parse_command(&matches),
    }
}

/// Handle the default parse command
fn handle_parse_command(matches: &ArgMatches) {
    let Some(path) = matches.get_one::<String>("path") else {
        fail("missing <path>");
    };
    let format_name = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("ast-treeviz");

    let format = OutputFormat::from_name(format_name).unwrap_or_else(|e| fail(e));
    let mut options = ParseOptions::default();
    if let Some(max_depth) = matches.get_one::<usize>("max-depth") {
        options.max_depth = *max_depth;
    }

    match process_file(path, &format, &options) {
        Ok(output) => print!("{}", output),
        Err(e) => fail(format!("{}: {}", path, e)),
    }
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Available output formats:\n");
    for format in available_formats() {
        println!("  {}", format.name());
        println!("    {}", format.description());
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}
