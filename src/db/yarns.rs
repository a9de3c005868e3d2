use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::models::{InsertOutcome, NewYarn, Yarn};

use super::is_constraint_violation;

/// Retrieve every yarn sorted by name. The query doubles as the single source
/// of truth for how the UI orders the stash list.
pub fn fetch_yarns(conn: &Connection) -> Result<Vec<Yarn>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, nome, marca, peso_novelo FROM linhas
             ORDER BY nome COLLATE NOCASE",
        )
        .context("failed to prepare yarn query")?;

    let yarns = stmt
        .query_map([], |row| {
            Ok(Yarn {
                id: row.get(0)?,
                name: row.get(1)?,
                brand: row.get(2)?,
                skein_weight: row.get(3)?,
            })
        })
        .context("failed to iterate yarns")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect yarns")?;

    Ok(yarns)
}

/// Insert a yarn only if its name is not already in the catalog. A duplicate
/// is an expected outcome, reported as a value so the caller can tell the
/// user "already exists" without treating it as a failure.
pub fn insert_yarn(
    conn: &Connection,
    name: &str,
    brand: Option<&str>,
    skein_weight: f64,
) -> Result<InsertOutcome> {
    let mut stmt = conn
        .prepare("SELECT 1 FROM linhas WHERE nome = ?1 LIMIT 1")
        .context("failed to prepare yarn existence check")?;
    if stmt
        .exists(params![name])
        .context("failed to check for existing yarn")?
    {
        return Ok(InsertOutcome::Duplicate);
    }

    // The unique index backstops the check above; a violation here means the
    // row appeared between check and insert, which we still report as a
    // duplicate rather than an error.
    match conn.execute(
        "INSERT INTO linhas (nome, marca, peso_novelo) VALUES (?1, ?2, ?3)",
        params![name, brand, skein_weight],
    ) {
        Ok(_) => Ok(InsertOutcome::Inserted),
        Err(err) if is_constraint_violation(&err) => Ok(InsertOutcome::Duplicate),
        Err(err) => Err(err).context("failed to insert yarn"),
    }
}

/// Insert a batch of parsed yarn entries in order, applying the same guard as
/// `insert_yarn` to each. The first occurrence of a name wins; later
/// collisions are reported as duplicates alongside the name so the caller can
/// list what was ignored.
pub fn bulk_insert_yarns(
    conn: &Connection,
    entries: &[NewYarn],
) -> Result<Vec<(String, InsertOutcome)>> {
    let mut results = Vec::with_capacity(entries.len());
    for entry in entries {
        let outcome = insert_yarn(conn, &entry.name, entry.brand.as_deref(), entry.skein_weight)?;
        results.push((entry.name.clone(), outcome));
    }
    Ok(results)
}

/// Remove a yarn by id. Matching zero rows is not an error; the count lets
/// the caller report "removed: 0".
pub fn delete_yarn_by_id(conn: &Connection, id: i64) -> Result<usize> {
    conn.execute("DELETE FROM linhas WHERE id = ?1", params![id])
        .context("failed to delete yarn by id")
}

/// Remove a yarn by exact name match, returning the affected-row count.
pub fn delete_yarn_by_name(conn: &Connection, name: &str) -> Result<usize> {
    conn.execute("DELETE FROM linhas WHERE nome = ?1", params![name])
        .context("failed to delete yarn by name")
}

/// Collapse yarns sharing a name down to the row with the smallest id. A
/// single set-based DELETE keeps the repair atomic; the return value is the
/// number of rows removed (zero when the catalog is already clean).
pub fn dedupe_yarns(conn: &Connection) -> Result<usize> {
    conn.execute(
        "DELETE FROM linhas
         WHERE id NOT IN (
             SELECT MIN(id) FROM linhas GROUP BY nome
         )",
        [],
    )
    .context("failed to remove duplicate yarns")
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

    /// Connection with a legacy-style linhas table: no unique index, so
    /// duplicate rows can be planted to exercise the repair path.
    fn legacy_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute(
            "CREATE TABLE linhas (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                nome TEXT NOT NULL,
                marca TEXT,
                peso_novelo REAL NOT NULL
            )",
            [],
        )
        .unwrap();
        conn
    }

    #[test]
    fn second_insert_with_same_name_is_a_duplicate() {
        let conn = test_conn();
        let first = insert_yarn(&conn, "Amigurumi Rosa", Some("Círculo"), 50.0).unwrap();
        assert_eq!(first, InsertOutcome::Inserted);

        let second = insert_yarn(&conn, "Amigurumi Rosa", Some("Outra"), 100.0).unwrap();
        assert_eq!(second, InsertOutcome::Duplicate);

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM linhas WHERE nome = 'Amigurumi Rosa'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn insert_accepts_missing_brand() {
        let conn = test_conn();
        insert_yarn(&conn, "Duna", None, 100.0).unwrap();
        let yarns = fetch_yarns(&conn).unwrap();
        assert_eq!(yarns.len(), 1);
        assert!(yarns[0].brand.is_none());
    }

    #[test]
    fn delete_by_absent_id_returns_zero_and_changes_nothing() {
        let conn = test_conn();
        insert_yarn(&conn, "Barroco", Some("Círculo"), 400.0).unwrap();

        assert_eq!(delete_yarn_by_id(&conn, 9999).unwrap(), 0);
        assert_eq!(fetch_yarns(&conn).unwrap().len(), 1);
    }

    #[test]
    fn delete_by_name_reports_affected_rows() {
        let conn = test_conn();
        insert_yarn(&conn, "Barroco", Some("Círculo"), 400.0).unwrap();

        assert_eq!(delete_yarn_by_name(&conn, "Barroco").unwrap(), 1);
        assert_eq!(delete_yarn_by_name(&conn, "Barroco").unwrap(), 0);
        assert!(fetch_yarns(&conn).unwrap().is_empty());
    }

    #[test]
    fn dedupe_keeps_the_smallest_id_per_name() {
        let conn = legacy_conn();
        for weight in [50.0, 60.0, 70.0] {
            conn.execute(
                "INSERT INTO linhas (nome, marca, peso_novelo) VALUES ('Anne', NULL, ?1)",
                params![weight],
            )
            .unwrap();
        }
        conn.execute(
            "INSERT INTO linhas (nome, marca, peso_novelo) VALUES ('Duna', NULL, 100.0)",
            [],
        )
        .unwrap();

        let removed = dedupe_yarns(&conn).unwrap();
        assert_eq!(removed, 2);

        let (id, weight): (i64, f64) = conn
            .query_row(
                "SELECT id, peso_novelo FROM linhas WHERE nome = 'Anne'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(id, 1);
        assert_eq!(weight, 50.0);

        // Clean table is a no-op.
        assert_eq!(dedupe_yarns(&conn).unwrap(), 0);
    }

    #[test]
    fn bulk_insert_keeps_the_first_of_colliding_names() {
        let conn = test_conn();
        let entries = vec![
            NewYarn {
                name: "Linha A".into(),
                brand: Some("Marca X".into()),
                skein_weight: 50.0,
            },
            NewYarn {
                name: "Linha A".into(),
                brand: Some("Marca Y".into()),
                skein_weight: 60.0,
            },
        ];

        let results = bulk_insert_yarns(&conn, &entries).unwrap();
        assert_eq!(results[0], ("Linha A".to_string(), InsertOutcome::Inserted));
        assert_eq!(results[1], ("Linha A".to_string(), InsertOutcome::Duplicate));

        let (brand, weight): (String, f64) = conn
            .query_row(
                "SELECT marca, peso_novelo FROM linhas WHERE nome = 'Linha A'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(brand, "Marca X");
        assert_eq!(weight, 50.0);
    }

    #[test]
    fn deleting_a_referenced_yarn_leaves_the_project_row_dangling() {
        let conn = test_conn();
        insert_yarn(&conn, "Barroco", Some("Círculo"), 400.0).unwrap();
        let yarn_id = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO projetos (nome, linha_id, qtd_novelos, peso_novelo, valor_novelo, peso_restante)
             VALUES ('Tapete', ?1, 3, 400.0, 25.9, 1200.0)",
            params![yarn_id],
        )
        .unwrap();

        // No cascade is defined; the orphaned reference is an accepted state.
        assert_eq!(delete_yarn_by_id(&conn, yarn_id).unwrap(), 1);
        let orphan: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM projetos WHERE linha_id = ?1",
                params![yarn_id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(orphan, 1);
    }
}
