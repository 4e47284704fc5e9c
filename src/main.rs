//! aerocms CLI entry point
//!
//! Parses arguments, dispatches to the CLI module and reports failures on
//! stderr with a non-zero exit status. No logic lives here.

use aerocms::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
