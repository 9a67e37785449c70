use anyhow::{Context, Result};
use lotofacil_db::rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

use lotofacil_db::db::{fetch_history, insert_draw};
use lotofacil_db::models::{Draw, parse_numbers};

/// Une ligne du fichier cache : `concurso,dezenas` avec les numéros joints par des tirets.
#[derive(Debug, Serialize, Deserialize)]
struct CacheRecord {
    concurso: u32,
    dezenas: String,
}

impl CacheRecord {
    fn into_draw(self) -> Result<Draw> {
        let numbers = parse_numbers(&self.dezenas)
            .with_context(|| format!("Concours {} : numéros illisibles", self.concurso))?;
        Draw::new(self.concurso, &numbers)
    }
}

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

pub fn import_csv(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;
    import_reader(conn, file)
}

fn import_reader<R: Read>(conn: &Connection, input: R) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };

    for record_result in reader.deserialize::<CacheRecord>() {
        result.total_records += 1;
        let draw = record_result
            .context("Ligne illisible")
            .and_then(CacheRecord::into_draw);
        match draw {
            Ok(draw) => match insert_draw(&tx, &draw) {
                Ok(true) => result.inserted += 1,
                Ok(false) => result.skipped += 1,
                Err(e) => {
                    log::error!("Erreur insertion ligne {}: {:#}", result.total_records, e);
                    result.errors += 1;
                }
            },
            Err(e) => {
                log::error!("Erreur ligne {}: {:#}", result.total_records, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    Ok(result)
}

/// Écrit tout l'historique, du plus ancien au plus récent. Retourne le nombre de lignes.
pub fn export_csv(conn: &Connection, path: &Path) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Impossible de créer {:?}", path))?;
    let history = fetch_history(conn)?;
    for draw in &history {
        writer.serialize(CacheRecord {
            concurso: draw.id,
            dezenas: draw.joined(),
        })?;
    }
    writer.flush()?;
    Ok(history.len())
}
