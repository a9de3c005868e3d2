//! Ratatui front end. The submodules mirror the app's layering: `terminal`
//! owns the raw-mode event loop, `app` holds all state and key handling,
//! `screens` the per-screen list state, `forms` the modal input state, and
//! `helpers` small layout/error utilities.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
