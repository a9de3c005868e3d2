use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::models::{InsertOutcome, Needle};

use super::is_constraint_violation;

/// The standard hook sizes (millimeters) every stash is expected to carry.
/// Seeding inserts these in order, skipping any already present.
pub const STANDARD_SIZES: [f64; 11] = [1.25, 1.5, 1.75, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0, 6.0];

/// Counts reported by `seed_needles`: rows removed by the duplicate repair
/// and sizes newly inserted from the reference list.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedReport {
    pub removed: usize,
    pub inserted: usize,
}

/// Retrieve the needle catalog ordered by size.
pub fn fetch_needles(conn: &Connection) -> Result<Vec<Needle>> {
    let mut stmt = conn
        .prepare("SELECT id, tamanho FROM agulhas ORDER BY tamanho")
        .context("failed to prepare needle query")?;

    let needles = stmt
        .query_map([], |row| {
            Ok(Needle {
                id: row.get(0)?,
                size: row.get(1)?,
            })
        })
        .context("failed to iterate needles")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect needles")?;

    Ok(needles)
}

/// Insert a needle only if its size is not already catalogued. The same
/// check-then-insert guard as yarns, with the unique index as a backstop.
pub fn insert_needle(conn: &Connection, size: f64) -> Result<InsertOutcome> {
    let mut stmt = conn
        .prepare("SELECT 1 FROM agulhas WHERE tamanho = ?1 LIMIT 1")
        .context("failed to prepare needle existence check")?;
    if stmt
        .exists(params![size])
        .context("failed to check for existing needle")?
    {
        return Ok(InsertOutcome::Duplicate);
    }

    match conn.execute("INSERT INTO agulhas (tamanho) VALUES (?1)", params![size]) {
        Ok(_) => Ok(InsertOutcome::Inserted),
        Err(err) if is_constraint_violation(&err) => Ok(InsertOutcome::Duplicate),
        Err(err) => Err(err).context("failed to insert needle"),
    }
}

/// Remove a needle by id, returning the affected-row count.
pub fn delete_needle_by_id(conn: &Connection, id: i64) -> Result<usize> {
    conn.execute("DELETE FROM agulhas WHERE id = ?1", params![id])
        .context("failed to delete needle")
}

/// Collapse needles sharing a size down to the row with the smallest id, in
/// one set-based DELETE. Returns the number of rows removed.
pub fn dedupe_needles(conn: &Connection) -> Result<usize> {
    conn.execute(
        "DELETE FROM agulhas
         WHERE id NOT IN (
             SELECT MIN(id) FROM agulhas GROUP BY tamanho
         )",
        [],
    )
    .context("failed to remove duplicate needles")
}

/// Bring the catalog up to the standard reference list: repair duplicates
/// first, then insert every missing standard size. Running this repeatedly
/// leaves the table unchanged after the first pass.
pub fn seed_needles(conn: &Connection) -> Result<SeedReport> {
    let removed = dedupe_needles(conn)?;

    let mut inserted = 0;
    for size in STANDARD_SIZES {
        if insert_needle(conn, size)?.is_inserted() {
            inserted += 1;
        }
    }

    Ok(SeedReport { removed, inserted })
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
    fn seeding_an_empty_table_inserts_every_standard_size() {
        let conn = test_conn();
        let report = seed_needles(&conn).unwrap();
        assert_eq!(report.removed, 0);
        assert_eq!(report.inserted, STANDARD_SIZES.len());

        let needles = fetch_needles(&conn).unwrap();
        assert_eq!(needles.len(), 11);
        let sizes: Vec<f64> = needles.iter().map(|n| n.size).collect();
        assert_eq!(sizes, STANDARD_SIZES.to_vec());
    }

    #[test]
    fn reseeding_leaves_the_catalog_unchanged() {
        let conn = test_conn();
        seed_needles(&conn).unwrap();
        let before: Vec<(i64, f64)> = fetch_needles(&conn)
            .unwrap()
            .into_iter()
            .map(|n| (n.id, n.size))
            .collect();

        let report = seed_needles(&conn).unwrap();
        assert_eq!(report.removed, 0);
        assert_eq!(report.inserted, 0);

        let after: Vec<(i64, f64)> = fetch_needles(&conn)
            .unwrap()
            .into_iter()
            .map(|n| (n.id, n.size))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn insert_guard_rejects_an_existing_size() {
        let conn = test_conn();
        assert_eq!(insert_needle(&conn, 5.5).unwrap(), InsertOutcome::Inserted);
        assert_eq!(insert_needle(&conn, 5.5).unwrap(), InsertOutcome::Duplicate);
    }

    #[test]
    fn dedupe_keeps_the_smallest_id_per_size() {
        // Legacy table without the unique index, so duplicates can exist.
        let conn = Connection::open_in_memory().unwrap();
        conn.execute(
            "CREATE TABLE agulhas (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                tamanho REAL NOT NULL
            )",
            [],
        )
        .unwrap();
        for size in [3.0, 3.0, 3.0, 4.0, 4.0] {
            conn.execute("INSERT INTO agulhas (tamanho) VALUES (?1)", params![size])
                .unwrap();
        }

        assert_eq!(dedupe_needles(&conn).unwrap(), 3);
        let survivors: Vec<(i64, f64)> = fetch_needles(&conn)
            .unwrap()
            .into_iter()
            .map(|n| (n.id, n.size))
            .collect();
        assert_eq!(survivors, vec![(1, 3.0), (4, 4.0)]);

        assert_eq!(dedupe_needles(&conn).unwrap(), 0);
    }

    #[test]
    fn delete_by_absent_id_returns_zero() {
        let conn = test_conn();
        seed_needles(&conn).unwrap();
        assert_eq!(delete_needle_by_id(&conn, 9999).unwrap(), 0);
        assert_eq!(fetch_needles(&conn).unwrap().len(), 11);
    }
}
