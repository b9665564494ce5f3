//! Core library surface for the Personal Library Manager.
//!
//! The record store lives in [`store`]; [`ui`] and [`cli`] are the two
//! presentation layers calling into it. The `bin` target only wires
//! configuration, logging and one of the front-ends together.
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod store;
pub mod ui;

/// Error type surfaced by every store operation.
pub use error::LibraryError;

/// The domain types both front-ends manipulate.
pub use models::{Book, SearchField, Statistics};

/// Persistence entry points.
pub use store::{load_books, save_books, Library, Search};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
