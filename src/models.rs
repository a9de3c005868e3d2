//! Domain models that mirror the SQLite schema and get passed throughout the
//! TUI. These types stay light-weight data holders so other layers can focus
//! on presentation and persistence logic. Column names in the database are
//! Portuguese (the store predates this program and is shared with older
//! tooling); the Rust-side names are English.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone)]
/// A yarn (linha) in the stash. `name` is the natural key: the catalog never
/// holds two yarns with the same name.
pub struct Yarn {
    /// Primary key from the database. Kept around even when the UI only needs
    /// display information because delete flows bubble the id back to the
    /// persistence layer.
    pub id: i64,
    /// Unique yarn name, e.g. "Amigurumi Rosa".
    pub name: String,
    /// Brand as free text. Optional because old rows predate the brand table.
    pub brand: Option<String>,
    /// Weight of one skein in grams.
    pub skein_weight: f64,
}

impl fmt::Display for Yarn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Input for a yarn insert before it has an id. Used by the bulk entry flow
/// so parsed lines can be validated first and written later.
#[derive(Debug, Clone)]
pub struct NewYarn {
    pub name: String,
    pub brand: Option<String>,
    pub skein_weight: f64,
}

#[derive(Debug, Clone)]
/// A brand (marca) row. Purely a lookup table that speeds up data entry; no
/// foreign key points at it.
pub struct Brand {
    pub id: i64,
    pub name: String,
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Key used when deleting a brand: the UI deletes by id, older import
/// tooling deletes by exact name.
#[derive(Debug, Clone)]
pub enum BrandKey {
    Id(i64),
    Name(String),
}

#[derive(Debug, Clone)]
/// A crochet hook (agulha), identified by its millimeter size. `size` is the
/// natural key; the catalog is a deduplicated reference list.
pub struct Needle {
    pub id: i64,
    pub size: f64,
}

impl fmt::Display for Needle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mm", self.size)
    }
}

/// The two recipe kinds the schema accepts. The database stores the exact
/// Portuguese strings (the CHECK constraint predates this program), so the
/// conversions below must match them byte for byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeKind {
    Video,
    Image,
}

impl RecipeKind {
    /// The text stored in the `tipo` column.
    pub fn as_db_str(self) -> &'static str {
        match self {
            RecipeKind::Video => "vídeo",
            RecipeKind::Image => "imagem",
        }
    }

    /// Flip between the two kinds; drives the toggle in the recipe form.
    pub fn toggled(self) -> Self {
        match self {
            RecipeKind::Video => RecipeKind::Image,
            RecipeKind::Image => RecipeKind::Video,
        }
    }
}

impl fmt::Display for RecipeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_db_str())
    }
}

/// Raised when the `tipo` column holds text outside the CHECK-constrained
/// set, which only happens if the file was edited by something else.
#[derive(Debug, Error)]
#[error("unknown recipe kind: {0:?}")]
pub struct RecipeKindParseError(pub String);

impl FromStr for RecipeKind {
    type Err = RecipeKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vídeo" => Ok(RecipeKind::Video),
            "imagem" => Ok(RecipeKind::Image),
            other => Err(RecipeKindParseError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
/// A stored pattern reference (receita): a name, a kind, a path to the video
/// or image, and free-form notes. Independent of every other table.
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub kind: RecipeKind,
    /// Filesystem path or URL. Kept as raw text so non-web references work.
    pub path: Option<String>,
    pub notes: Option<String>,
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

#[derive(Debug, Clone)]
/// A tracked work-in-progress (projeto). Rows are written by the schema and
/// by external tooling; this program only lists them. `yarn_id` may point at
/// a yarn that no longer exists, which is an accepted state.
pub struct Project {
    pub id: i64,
    pub name: String,
    pub yarn_id: Option<i64>,
    pub color_name: Option<String>,
    pub color_code: Option<String>,
    pub skein_count: i64,
    pub skein_weight: f64,
    pub skein_unit_price: f64,
    pub remaining_weight: f64,
    /// Timestamp text as SQLite produced it (CURRENT_TIMESTAMP default).
    pub created_at: String,
}

/// Result of a guarded insert. Duplicates are an expected outcome the caller
/// reports to the user, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Duplicate,
}

impl InsertOutcome {
    pub fn is_inserted(self) -> bool {
        matches!(self, InsertOutcome::Inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipe_kind_round_trips_through_db_text() {
        for kind in [RecipeKind::Video, RecipeKind::Image] {
            assert_eq!(kind.as_db_str().parse::<RecipeKind>().unwrap(), kind);
        }
    }

    #[test]
    fn recipe_kind_rejects_unknown_text() {
        let err = "pdf".parse::<RecipeKind>().unwrap_err();
        assert_eq!(err.0, "pdf");
    }

    #[test]
    fn recipe_kind_toggle_alternates() {
        assert_eq!(RecipeKind::Video.toggled(), RecipeKind::Image);
        assert_eq!(RecipeKind::Image.toggled(), RecipeKind::Video);
    }
}
