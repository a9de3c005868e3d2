use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use rusqlite::Connection;

use super::{needles, yarns};

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".croche-manager";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "croche.db";

/// Seed brand inserted on first run; by far the most common brand in a
/// Brazilian crochet stash, so it should always be selectable.
const SEED_BRAND: &str = "Círculo";

/// Ensure the database file exists, bring the schema up to date, and return a
/// live connection. Foreign keys stay at SQLite's default (off): the
/// `projetos.linha_id` reference is documentation, and deleting a yarn that a
/// project still points at must keep working. The dangling reference is an
/// accepted state.
pub fn ensure_schema() -> Result<Connection> {
    let db_path = db_path()?;

    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(&db_path).context("failed to open SQLite database")?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Create every table, repair duplicates, declare the natural-key indexes,
/// and seed reference rows. Safe to run any number of times.
///
/// Ordering matters: the unique indexes on `linhas.nome` and
/// `agulhas.tamanho` are declared only after the duplicate repair, because a
/// database written by older tooling may still contain colliding rows and
/// `CREATE UNIQUE INDEX` would refuse to build over them.
pub fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS linhas (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nome TEXT NOT NULL,
            marca TEXT,
            peso_novelo REAL NOT NULL
        )",
        [],
    )
    .context("failed to create linhas table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS marcas (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nome TEXT NOT NULL UNIQUE
        )",
        [],
    )
    .context("failed to create marcas table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS projetos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nome TEXT NOT NULL,
            linha_id INTEGER,
            cor_nome TEXT,
            cor_numero TEXT,
            qtd_novelos INTEGER NOT NULL,
            peso_novelo REAL NOT NULL,
            valor_novelo REAL NOT NULL,
            peso_restante REAL NOT NULL,
            data_criacao TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (linha_id) REFERENCES linhas (id)
        )",
        [],
    )
    .context("failed to create projetos table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS agulhas (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            tamanho REAL NOT NULL
        )",
        [],
    )
    .context("failed to create agulhas table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS receitas (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nome TEXT NOT NULL,
            tipo TEXT CHECK(tipo IN ('vídeo', 'imagem')) NOT NULL,
            caminho TEXT,
            observacoes TEXT
        )",
        [],
    )
    .context("failed to create receitas table")?;

    yarns::dedupe_yarns(conn)?;
    needles::dedupe_needles(conn)?;

    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_linhas_nome_unique ON linhas (nome)",
        [],
    )
    .context("failed to create unique index on linhas.nome")?;
    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_agulhas_tamanho_unique ON agulhas (tamanho)",
        [],
    )
    .context("failed to create unique index on agulhas.tamanho")?;

    conn.execute(
        "INSERT OR IGNORE INTO marcas (nome) VALUES (?1)",
        [SEED_BRAND],
    )
    .context("failed to seed brand row")?;

    Ok(())
}

/// Resolve the absolute path to the SQLite database inside the user's home.
fn db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_count(conn: &Connection) -> i64 {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
             AND name IN ('linhas', 'marcas', 'projetos', 'agulhas', 'receitas')",
            [],
            |row| row.get(0),
        )
        .unwrap()
    }

    fn index_count(conn: &Connection) -> i64 {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index'
             AND name IN ('idx_linhas_nome_unique', 'idx_agulhas_tamanho_unique')",
            [],
            |row| row.get(0),
        )
        .unwrap()
    }

    fn seed_brand_count(conn: &Connection) -> i64 {
        conn.query_row(
            "SELECT COUNT(*) FROM marcas WHERE nome = 'Círculo'",
            [],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn create_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        assert_eq!(table_count(&conn), 5);
        assert_eq!(index_count(&conn), 2);
        assert_eq!(seed_brand_count(&conn), 1);

        create_schema(&conn).unwrap();
        assert_eq!(table_count(&conn), 5);
        assert_eq!(index_count(&conn), 2);
        assert_eq!(seed_brand_count(&conn), 1);
    }

    #[test]
    fn create_schema_preserves_existing_rows() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO linhas (nome, marca, peso_novelo) VALUES ('Barroco', 'Círculo', 400.0)",
            [],
        )
        .unwrap();

        create_schema(&conn).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM linhas", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn create_schema_repairs_legacy_duplicates_before_indexing() {
        // Simulate a database written by older tooling: the agulhas table
        // exists without the unique index and already holds duplicates.
        let conn = Connection::open_in_memory().unwrap();
        conn.execute(
            "CREATE TABLE agulhas (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                tamanho REAL NOT NULL
            )",
            [],
        )
        .unwrap();
        for _ in 0..3 {
            conn.execute("INSERT INTO agulhas (tamanho) VALUES (4.0)", [])
                .unwrap();
        }

        create_schema(&conn).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM agulhas", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn create_schema_works_on_a_file_backed_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("croche.db");
        {
            let conn = Connection::open(&path).unwrap();
            create_schema(&conn).unwrap();
        }
        // Reopen and run again; the second pass must leave everything as is.
        let conn = Connection::open(&path).unwrap();
        create_schema(&conn).unwrap();
        assert_eq!(table_count(&conn), 5);
        assert_eq!(seed_brand_count(&conn), 1);
    }

    #[test]
    fn recipe_kind_check_constraint_rejects_other_text() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        let result = conn.execute(
            "INSERT INTO receitas (nome, tipo) VALUES ('Touca', 'pdf')",
            [],
        );
        assert!(result.is_err());
    }
}
