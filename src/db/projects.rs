use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::models::Project;

/// Fetch all projects, newest first. Projects are written by the schema and
/// by external tooling; this crate only reads them for the overview screen,
/// so there are no insert/update/delete helpers here.
pub fn fetch_projects(conn: &Connection) -> Result<Vec<Project>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, nome, linha_id, cor_nome, cor_numero, qtd_novelos,
                    peso_novelo, valor_novelo, peso_restante, data_criacao
             FROM projetos
             ORDER BY data_criacao DESC, id DESC",
        )
        .context("failed to prepare project query")?;

    let projects = stmt
        .query_map([], |row| {
            Ok(Project {
                id: row.get(0)?,
                name: row.get(1)?,
                yarn_id: row.get(2)?,
                color_name: row.get(3)?,
                color_code: row.get(4)?,
                skein_count: row.get(5)?,
                skein_weight: row.get(6)?,
                skein_unit_price: row.get(7)?,
                remaining_weight: row.get(8)?,
                created_at: row.get(9)?,
            })
        })
        .context("failed to iterate projects")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect projects")?;

    Ok(projects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_schema;
    use rusqlite::params;

    #[test]
    fn fetch_orders_newest_first_and_reads_every_column() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO projetos
                 (nome, linha_id, cor_nome, cor_numero, qtd_novelos,
                  peso_novelo, valor_novelo, peso_restante, data_criacao)
             VALUES ('Tapete', NULL, 'Cru', '8176', 3, 400.0, 25.9, 950.0,
                     '2024-01-10 12:00:00')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO projetos
                 (nome, linha_id, cor_nome, cor_numero, qtd_novelos,
                  peso_novelo, valor_novelo, peso_restante, data_criacao)
             VALUES ('Bolsa', 1, NULL, NULL, 2, 200.0, 18.5, 400.0,
                     '2024-03-02 09:30:00')",
            params![],
        )
        .unwrap();

        let projects = fetch_projects(&conn).unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].name, "Bolsa");
        assert_eq!(projects[0].yarn_id, Some(1));
        assert_eq!(projects[1].name, "Tapete");
        assert_eq!(projects[1].color_code.as_deref(), Some("8176"));
        assert_eq!(projects[1].remaining_weight, 950.0);
    }
}
