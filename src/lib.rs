//! Core library surface for the Crochê Manager TUI application.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as potential external tooling can reuse the same
//! pieces: the schema initializer, the catalog maintenance operations, and
//! the interactive front end.
pub mod db;
pub mod models;
pub mod ui;

/// Convenience re-exports for the persistence layer. These are what
/// `main.rs` uses to bring up the embedded SQLite store and preload data.
pub use db::{ensure_schema, fetch_brand_names, fetch_yarns, seed_needles};

/// The domain types other layers manipulate.
pub use models::{Brand, InsertOutcome, Needle, Project, Recipe, RecipeKind, Yarn};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
