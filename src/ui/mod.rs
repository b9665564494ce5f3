//! Ratatui front-end. `app` holds the state machine and rendering, `forms` and
//! `screens` the per-view state, `terminal` the raw-mode event loop.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
