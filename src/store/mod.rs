//! Record store split across logical submodules: raw file persistence and the
//! in-memory library that sits on top of it.

mod file;
mod library;

pub use file::{load_books, save_books};
pub use library::{Library, Search};
