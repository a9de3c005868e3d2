use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::models::{Brand, BrandKey, InsertOutcome};

use super::is_constraint_violation;

/// Retrieve every brand sorted by name for the quick-selection list.
pub fn fetch_brands(conn: &Connection) -> Result<Vec<Brand>> {
    let mut stmt = conn
        .prepare("SELECT id, nome FROM marcas ORDER BY LOWER(nome), nome")
        .context("failed to prepare brand query")?;

    let brands = stmt
        .query_map([], |row| {
            Ok(Brand {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })
        .context("failed to iterate brands")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect brands")?;

    Ok(brands)
}

/// Brand names only, in the same order as `fetch_brands`. Feeds the
/// autocomplete in the yarn form.
pub fn fetch_brand_names(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT nome FROM marcas ORDER BY LOWER(nome), nome")
        .context("failed to prepare brand name query")?;

    let mut rows = stmt.query([]).context("failed to execute brand name query")?;

    let mut names = Vec::new();
    while let Some(row) = rows.next().context("failed to fetch brand row")? {
        let name: String = row.get(0).context("failed to read brand name")?;
        names.push(name);
    }

    Ok(names)
}

/// Insert a brand, relying on the declared UNIQUE column rather than a
/// separate existence check. A violation is reported as a duplicate outcome.
pub fn insert_brand(conn: &Connection, name: &str) -> Result<InsertOutcome> {
    match conn.execute("INSERT INTO marcas (nome) VALUES (?1)", params![name]) {
        Ok(_) => Ok(InsertOutcome::Inserted),
        Err(err) if is_constraint_violation(&err) => Ok(InsertOutcome::Duplicate),
        Err(err) => Err(err).context("failed to insert brand"),
    }
}

/// Remove a brand by id or exact name. Matching zero rows returns a zero
/// count; yarns keep their brand text regardless since `linhas.marca` is free
/// text, not a foreign key.
pub fn delete_brand(conn: &Connection, key: &BrandKey) -> Result<usize> {
    match key {
        BrandKey::Id(id) => conn
            .execute("DELETE FROM marcas WHERE id = ?1", params![id])
            .context("failed to delete brand by id"),
        BrandKey::Name(name) => conn
            .execute("DELETE FROM marcas WHERE nome = ?1", params![name])
            .context("failed to delete brand by name"),
    }
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
    fn seed_brand_is_present_and_protected_from_duplication() {
        let conn = test_conn();
        assert_eq!(
            insert_brand(&conn, "Círculo").unwrap(),
            InsertOutcome::Duplicate
        );
        let names = fetch_brand_names(&conn).unwrap();
        assert_eq!(names, vec!["Círculo".to_string()]);
    }

    #[test]
    fn insert_and_delete_by_id() {
        let conn = test_conn();
        assert_eq!(
            insert_brand(&conn, "Pingouin").unwrap(),
            InsertOutcome::Inserted
        );
        let brand = fetch_brands(&conn)
            .unwrap()
            .into_iter()
            .find(|b| b.name == "Pingouin")
            .unwrap();

        assert_eq!(delete_brand(&conn, &BrandKey::Id(brand.id)).unwrap(), 1);
        assert_eq!(delete_brand(&conn, &BrandKey::Id(brand.id)).unwrap(), 0);
    }

    #[test]
    fn delete_by_name_matches_exact_text_only() {
        let conn = test_conn();
        insert_brand(&conn, "Amigurumi").unwrap();

        assert_eq!(
            delete_brand(&conn, &BrandKey::Name("amigurumi".into())).unwrap(),
            0
        );
        assert_eq!(
            delete_brand(&conn, &BrandKey::Name("Amigurumi".into())).unwrap(),
            1
        );
    }
}
