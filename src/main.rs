//! Binary entry point that glues the SQLite-backed catalog to the TUI. We
//! bring up the database (creating tables, repairing duplicates, seeding the
//! needle catalog), hydrate the initial app state, and drive the Ratatui
//! event loop until the user exits.
use croche_manager::{ensure_schema, fetch_brand_names, fetch_yarns, run_app, seed_needles, App};

/// Initialize persistence, load cached data, and launch the Ratatui event
/// loop. Returning a `Result` bubbles fatal initialization problems (for
/// example an unwritable home directory) to the terminal instead of crashing
/// silently.
fn main() -> anyhow::Result<()> {
    let conn = ensure_schema()?;
    let seeded = seed_needles(&conn)?;
    let yarns = fetch_yarns(&conn)?;
    let brand_names = fetch_brand_names(&conn)?;

    let mut app = App::new(conn, yarns, brand_names);
    app.note_seed_report(seeded);
    run_app(&mut app)
}
