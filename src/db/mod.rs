//! Persistence module split across logical submodules. Every function takes
//! an explicit `&Connection`; there is no global connection state.

mod brands;
mod connection;
mod needles;
mod projects;
mod recipes;
mod yarns;

pub use brands::{delete_brand, fetch_brand_names, fetch_brands, insert_brand};
pub use connection::{create_schema, ensure_schema};
pub use needles::{
    delete_needle_by_id, dedupe_needles, fetch_needles, insert_needle, seed_needles, SeedReport,
    STANDARD_SIZES,
};
pub use projects::fetch_projects;
pub use recipes::{create_recipe, delete_recipe_by_id, fetch_recipes};
pub use yarns::{
    bulk_insert_yarns, dedupe_yarns, delete_yarn_by_id, delete_yarn_by_name, fetch_yarns,
    insert_yarn,
};

use rusqlite::{Error as SqlError, ErrorCode};

/// Whether a SQLite error is a constraint violation. Guarded inserts use this
/// to turn a unique-index hit into a reported duplicate instead of a failure.
pub(crate) fn is_constraint_violation(err: &SqlError) -> bool {
    matches!(err.sqlite_error_code(), Some(ErrorCode::ConstraintViolation))
}
