//! Binary entry point: resolve where the library lives, start logging, load the
//! catalog and hand it to either a one-shot subcommand or the TUI.
use std::io;

use anyhow::Context;
use clap::Parser;
use personal_library_manager::cli::{self, Cli, Command};
use personal_library_manager::config::Config;
use personal_library_manager::{logging, run_app, App, Library};

/// Returning a `Result` bubbles up fatal start-up problems (an unreadable or
/// corrupt library file, an unwritable data directory) to the terminal instead
/// of crashing silently.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::resolve(cli.file)?;
    config.ensure_dirs()?;
    logging::init(&config.log_path)?;

    let mut library = Library::open(config.library_path())
        .context("failed to load the library; fix or move the file and try again")?;

    match cli.command {
        None | Some(Command::Tui) => {
            let mut app = App::new(library);
            run_app(&mut app)
        }
        Some(command) => cli::execute(command, &mut library, &mut io::stdout().lock()),
    }
}
