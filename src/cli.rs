//! One-shot command line front-end. Each subcommand opens the library, runs a
//! single store operation and prints the outcome; running without a
//! subcommand starts the interactive UI instead.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::models::{Book, PUBLICATION_YEARS};
use crate::store::Library;

#[derive(Debug, Parser)]
#[command(name = "personal-library-manager")]
#[command(about = "Catalog the books you own and track what you have read", long_about = None)]
pub struct Cli {
    /// Library file to use instead of ~/.personal-library-manager/library.json
    #[arg(short, long, global = true, env = "LIBRARY_MANAGER_FILE")]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive terminal UI (default)
    Tui,
    /// Print every book in insertion order
    List,
    /// Add a new book
    Add(AddArgs),
    /// Remove every book with the given title (case-insensitive)
    Remove(RemoveArgs),
    /// Search by title or author
    Search(SearchArgs),
    /// Show how many books you have and how many you have read
    Stats,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(short, long)]
    pub title: String,

    #[arg(short, long)]
    pub author: String,

    /// Publication year (1000-2025)
    #[arg(short, long)]
    pub year: String,

    #[arg(short, long)]
    pub genre: String,

    /// Mark the book as already read
    #[arg(short, long)]
    pub read: bool,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    pub title: String,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    pub query: String,

    /// Field to search: `title` or `author`
    #[arg(short, long, default_value = "title")]
    pub by: String,
}

/// Run a non-interactive subcommand against `library`, writing the
/// user-facing output to `out`.
pub fn execute<W: Write>(command: Command, library: &mut Library, out: &mut W) -> Result<()> {
    match command {
        Command::Tui => bail!("the terminal UI is started by the binary, not `execute`"),
        Command::List => list(library, out),
        Command::Add(args) => add(args, library, out),
        Command::Remove(args) => remove(args, library, out),
        Command::Search(args) => search(args, library, out),
        Command::Stats => stats(library, out),
    }
}

fn list<W: Write>(library: &Library, out: &mut W) -> Result<()> {
    if library.is_empty() {
        writeln!(out, "No books in your library yet.")?;
        return Ok(());
    }
    write_books(out, library.books())
}

fn add<W: Write>(args: AddArgs, library: &mut Library, out: &mut W) -> Result<()> {
    let book = Book::from_input(&args.title, &args.author, &args.year, &args.genre, args.read)?;
    if !PUBLICATION_YEARS.contains(&book.year) {
        bail!(
            "Year must be between {} and {}.",
            PUBLICATION_YEARS.start(),
            PUBLICATION_YEARS.end()
        );
    }

    let added = library.add(book).context("failed to add book")?;
    writeln!(out, "'{}' has been added to your library!", added.title)?;
    Ok(())
}

fn remove<W: Write>(args: RemoveArgs, library: &mut Library, out: &mut W) -> Result<()> {
    let removed = library
        .remove(&args.title)
        .context("failed to remove book")?;
    match removed {
        0 => writeln!(out, "No book titled '{}' was found.", args.title)?,
        1 => writeln!(out, "'{}' has been removed.", args.title)?,
        n => writeln!(out, "'{}' has been removed ({n} copies).", args.title)?,
    }
    Ok(())
}

fn search<W: Write>(args: SearchArgs, library: &Library, out: &mut W) -> Result<()> {
    let results: Vec<&Book> = library.search_by(&args.query, &args.by)?.collect();
    if results.is_empty() {
        writeln!(out, "No books found.")?;
        return Ok(());
    }
    for book in results {
        writeln!(out, "{book}")?;
    }
    Ok(())
}

fn stats<W: Write>(library: &Library, out: &mut W) -> Result<()> {
    let stats = library.statistics();
    writeln!(out, "Total Books: {}", stats.total)?;
    writeln!(out, "Books Read: {}", stats.read)?;
    writeln!(out, "Percentage Read: {:.2}%", stats.percent_read)?;
    Ok(())
}

fn write_books<W: Write>(out: &mut W, books: &[Book]) -> Result<()> {
    for book in books {
        writeln!(out, "{book}")?;
    }
    Ok(())
}
