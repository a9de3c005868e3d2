use anyhow::{Context, Result};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Error as SqlError};

use crate::models::{Recipe, RecipeKind};

/// Fetch all recipes, ordered case-insensitively by name.
pub fn fetch_recipes(conn: &Connection) -> Result<Vec<Recipe>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, nome, tipo, caminho, observacoes FROM receitas
             ORDER BY nome COLLATE NOCASE",
        )
        .context("failed to prepare recipe query")?;

    let recipes = stmt
        .query_map([], |row| {
            let kind_text: String = row.get(2)?;
            let kind = kind_text.parse::<RecipeKind>().map_err(|err| {
                SqlError::FromSqlConversionFailure(2, Type::Text, Box::new(err))
            })?;
            Ok(Recipe {
                id: row.get(0)?,
                name: row.get(1)?,
                kind,
                path: row.get(3)?,
                notes: row.get(4)?,
            })
        })
        .context("failed to iterate recipes")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect recipes")?;

    Ok(recipes)
}

/// Insert a recipe and echo the hydrated struct so callers can update UI
/// state without re-querying.
pub fn create_recipe(
    conn: &Connection,
    name: &str,
    kind: RecipeKind,
    path: Option<&str>,
    notes: Option<&str>,
) -> Result<Recipe> {
    conn.execute(
        "INSERT INTO receitas (nome, tipo, caminho, observacoes) VALUES (?1, ?2, ?3, ?4)",
        params![name, kind.as_db_str(), path, notes],
    )
    .context("failed to insert recipe")?;

    let id = conn.last_insert_rowid();
    Ok(Recipe {
        id,
        name: name.to_string(),
        kind,
        path: path.map(str::to_string),
        notes: notes.map(str::to_string),
    })
}

/// Remove a recipe by id, returning the affected-row count.
pub fn delete_recipe_by_id(conn: &Connection, id: i64) -> Result<usize> {
    conn.execute("DELETE FROM receitas WHERE id = ?1", params![id])
        .context("failed to delete recipe")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_schema;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn created_recipe_round_trips_through_fetch() {
        let conn = test_conn();
        let created = create_recipe(
            &conn,
            "Polvo amigurumi",
            RecipeKind::Video,
            Some("https://example.com/polvo"),
            Some("usar agulha 2.5"),
        )
        .unwrap();

        let recipes = fetch_recipes(&conn).unwrap();
        assert_eq!(recipes.len(), 1);
        let fetched = &recipes[0];
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.name, "Polvo amigurumi");
        assert_eq!(fetched.kind, RecipeKind::Video);
        assert_eq!(fetched.path.as_deref(), Some("https://example.com/polvo"));
        assert_eq!(fetched.notes.as_deref(), Some("usar agulha 2.5"));
    }

    #[test]
    fn image_recipes_may_omit_path_and_notes() {
        let conn = test_conn();
        create_recipe(&conn, "Sousplat", RecipeKind::Image, None, None).unwrap();
        let recipes = fetch_recipes(&conn).unwrap();
        assert_eq!(recipes[0].kind, RecipeKind::Image);
        assert!(recipes[0].path.is_none());
        assert!(recipes[0].notes.is_none());
    }

    #[test]
    fn delete_by_absent_id_returns_zero() {
        let conn = test_conn();
        let recipe = create_recipe(&conn, "Touca", RecipeKind::Image, None, None).unwrap();
        assert_eq!(delete_recipe_by_id(&conn, recipe.id + 1).unwrap(), 0);
        assert_eq!(delete_recipe_by_id(&conn, recipe.id).unwrap(), 1);
        assert!(fetch_recipes(&conn).unwrap().is_empty());
    }

    #[test]
    fn fetch_surfaces_foreign_kind_text_as_an_error() {
        let conn = test_conn();
        // Bypass the CHECK constraint the way another tool with a different
        // schema revision could: recreate the table without it.
        conn.execute("DROP TABLE receitas", []).unwrap();
        conn.execute(
            "CREATE TABLE receitas (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                nome TEXT NOT NULL,
                tipo TEXT NOT NULL,
                caminho TEXT,
                observacoes TEXT
            )",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO receitas (nome, tipo) VALUES ('Touca', 'pdf')",
            [],
        )
        .unwrap();

        assert!(fetch_recipes(&conn).is_err());
    }
}
