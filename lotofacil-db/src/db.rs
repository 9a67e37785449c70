use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use crate::models::{Draw, parse_numbers};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    draw_id  INTEGER PRIMARY KEY,
    numbers  TEXT NOT NULL
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("lotofacil.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

/// Retourne `false` si le concours existait déjà.
pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (draw_id, numbers) VALUES (?1, ?2)",
        rusqlite::params![draw.id, draw.joined()],
    ).with_context(|| format!("Échec de l'insertion du concours {}", draw.id))?;
    Ok(changed > 0)
}

fn query_draws(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id, numbers)| {
            let parsed = parse_numbers(&numbers)
                .with_context(|| format!("Concours {} corrompu dans le cache", id))?;
            Draw::new(id, &parsed)
        })
        .collect()
}

/// Historique complet, du plus ancien au plus récent.
pub fn fetch_history(conn: &Connection) -> Result<Vec<Draw>> {
    query_draws(conn, "SELECT draw_id, numbers FROM draws ORDER BY draw_id ASC", [])
}

/// Les `limit` derniers concours, le plus récent en premier.
pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    query_draws(
        conn,
        "SELECT draw_id, numbers FROM draws ORDER BY draw_id DESC LIMIT ?1",
        [limit],
    )
}

pub fn last_draw_id(conn: &Connection) -> Result<Option<u32>> {
    let id: Option<u32> = conn.query_row("SELECT MAX(draw_id) FROM draws", [], |row| row.get(0))?;
    Ok(id)
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}
