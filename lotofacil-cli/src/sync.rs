use std::time::Duration;

use anyhow::{Context, Result};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use serde::Deserialize;

use lotofacil_db::db::{insert_draw, last_draw_id};
use lotofacil_db::models::Draw;
use lotofacil_db::rusqlite::Connection;

pub const DEFAULT_BASE_URL: &str = "https://servicebus2.caixa.gov.br/portaldeloterias/api/lotofacil/";

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub base_url: String,
    pub concurrency: usize,
    pub timeout: Duration,
    /// Accepte les certificats TLS invalides (chaîne cassée côté Caixa).
    pub insecure: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            concurrency: 16,
            timeout: Duration::from_secs(30),
            insecure: false,
        }
    }
}

/// Réponse de l'API, réduite aux champs utiles.
#[derive(Debug, Deserialize)]
struct ApiDraw {
    numero: u32,
    #[serde(rename = "listaDezenas")]
    lista_dezenas: Vec<String>,
}

impl ApiDraw {
    fn into_draw(self) -> Result<Draw> {
        let numbers = self
            .lista_dezenas
            .iter()
            .map(|s| {
                s.trim()
                    .parse::<u8>()
                    .with_context(|| format!("Numéro '{}' illisible (concours {})", s, self.numero))
            })
            .collect::<Result<Vec<u8>>>()?;
        Draw::new(self.numero, &numbers)
    }
}

#[derive(Debug, Default)]
pub struct SyncResult {
    pub last_cached: u32,
    /// `None` si l'API n'a pas répondu.
    pub latest: Option<u32>,
    pub inserted: u32,
    pub failed: u32,
}

fn draw_url(base_url: &str, id: u32) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), id)
}

fn build_client(config: &SyncConfig) -> Result<Client> {
    Client::builder()
        .timeout(config.timeout)
        .danger_accept_invalid_certs(config.insecure)
        .build()
        .context("Impossible de créer le client HTTP")
}

async fn fetch_draw(client: &Client, url: &str) -> Result<Draw> {
    let payload: ApiDraw = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Requête {} échouée", url))?
        .error_for_status()?
        .json()
        .await
        .with_context(|| format!("Réponse {} illisible", url))?;
    payload.into_draw()
}

/// Complète le cache avec les concours manquants. Une API injoignable n'est
/// pas une erreur : le cache reste tel quel.
pub fn sync_history(conn: &Connection, config: &SyncConfig) -> Result<SyncResult> {
    let runtime = tokio::runtime::Runtime::new()
        .context("Impossible de démarrer le runtime tokio")?;
    runtime.block_on(sync_async(conn, config))
}

async fn sync_async(conn: &Connection, config: &SyncConfig) -> Result<SyncResult> {
    let last_cached = last_draw_id(conn)?.unwrap_or(0);
    let mut result = SyncResult {
        last_cached,
        ..SyncResult::default()
    };

    let client = build_client(config)?;
    let latest = match fetch_draw(&client, &config.base_url).await {
        Ok(draw) => draw,
        Err(e) => {
            log::warn!("Dernier concours indisponible, cache conservé : {:#}", e);
            return Ok(result);
        }
    };
    result.latest = Some(latest.id);

    if latest.id <= last_cached {
        log::info!("Cache à jour (concours {})", last_cached);
        return Ok(result);
    }

    let missing = (last_cached + 1)..latest.id;
    let pb = ProgressBar::new(missing.len() as u64);
    pb.set_style(ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
        .progress_chars("=> "));
    pb.set_message("concours");

    let responses: Vec<(u32, Result<Draw>)> = futures::stream::iter(missing)
        .map(|id| {
            let client = &client;
            let url = draw_url(&config.base_url, id);
            async move { (id, fetch_draw(client, &url).await) }
        })
        .buffer_unordered(config.concurrency.max(1))
        .inspect(|_| pb.inc(1))
        .collect()
        .await;
    pb.finish_and_clear();

    let mut draws = vec![latest];
    for (id, response) in responses {
        match response {
            Ok(draw) => draws.push(draw),
            Err(e) => {
                log::warn!("Concours {} ignoré : {:#}", id, e);
                result.failed += 1;
            }
        }
    }
    draws.sort_by_key(|d| d.id);

    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;
    for draw in &draws {
        if insert_draw(&tx, draw)? {
            result.inserted += 1;
        }
    }
    tx.commit().context("Échec du commit")?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_payload() {
        let json = r#"{
            "numero": 3210,
            "dataApuracao": "14/10/2024",
            "listaDezenas": ["01","02","04","05","06","08","10","11","13","16","18","20","21","23","25"],
            "acumulado": false
        }"#;
        let payload: ApiDraw = serde_json::from_str(json).unwrap();
        let draw = payload.into_draw().unwrap();
        assert_eq!(draw.id, 3210);
        assert_eq!(draw.numbers, [1, 2, 4, 5, 6, 8, 10, 11, 13, 16, 18, 20, 21, 23, 25]);
    }

    #[test]
    fn test_reject_malformed_payload() {
        let short = r#"{"numero": 5, "listaDezenas": ["01","02","03"]}"#;
        let payload: ApiDraw = serde_json::from_str(short).unwrap();
        assert!(payload.into_draw().is_err());

        let garbage = r#"{"numero": 5, "listaDezenas": ["01","xx","03","04","05","06","07","08","09","10","11","12","13","14","15"]}"#;
        let payload: ApiDraw = serde_json::from_str(garbage).unwrap();
        assert!(payload.into_draw().is_err());
    }

    #[test]
    fn test_draw_url() {
        assert_eq!(
            draw_url(DEFAULT_BASE_URL, 42),
            "https://servicebus2.caixa.gov.br/portaldeloterias/api/lotofacil/42"
        );
        assert_eq!(draw_url("http://localhost:8080", 7), "http://localhost:8080/7");
    }

    #[test]
    fn test_unreachable_api_keeps_cache() {
        let conn = Connection::open_in_memory().unwrap();
        lotofacil_db::db::migrate(&conn).unwrap();
        insert_draw(&conn, &Draw::new(12, &(1..=15).collect::<Vec<u8>>()).unwrap()).unwrap();

        // Port fermé en local : la connexion est refusée immédiatement
        let config = SyncConfig {
            base_url: "http://127.0.0.1:9/".to_string(),
            timeout: Duration::from_secs(2),
            ..SyncConfig::default()
        };
        let result = sync_history(&conn, &config).unwrap();
        assert_eq!(result.last_cached, 12);
        assert_eq!(result.latest, None);
        assert_eq!(result.inserted, 0);
        assert_eq!(last_draw_id(&conn).unwrap(), Some(12));
    }

    #[test]
    fn test_default_config() {
        let config = SyncConfig::default();
        assert_eq!(config.concurrency, 16);
        assert!(!config.insecure);
        assert!(config.base_url.ends_with('/'));
    }
}
