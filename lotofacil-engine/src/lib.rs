pub mod check;
pub mod config;
pub mod error;
pub mod pool;
pub mod ranking;
pub mod search;
pub mod validator;

use lotofacil_db::models::Draw;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::pool::{CandidatePool, build_pool};
use crate::ranking::{RankingTable, ScoreTable, build_ranking};
use crate::search::{SearchOutcome, search};

/// Tout ce qu'un passage du moteur a calculé, pour affichage.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub short: RankingTable,
    pub long: RankingTable,
    pub pool: CandidatePool,
    pub composite: ScoreTable,
    /// Identifiant du concours utilisé pour la règle de recouvrement.
    pub previous_draw_id: Option<u32>,
    pub outcome: SearchOutcome,
}

/// Classements court et long, pool de candidats, puis recherche de la
/// meilleure combinaison. `history` est trié du plus ancien au plus récent.
pub fn generate(history: &[Draw], config: &EngineConfig) -> Result<Prediction, EngineError> {
    let short = build_ranking(history, config.short_window)?;
    let long = build_ranking(history, config.long_window)?;
    let (pool, composite) = build_pool(&short, &long, config.pool_size, config.weights)?;
    log::debug!("Pool de candidats : {:?}", pool.numbers);

    let previous = history.last();
    let outcome = search(&pool, &composite, previous, config)?;

    Ok(Prediction {
        short,
        long,
        pool,
        composite,
        previous_draw_id: previous.map(|d| d.id),
        outcome,
    })
}

/// Historique synthétique : le concours i couvre 15 numéros consécutifs
/// (modulo 25) à partir de 7i.
pub fn make_test_history(n: usize) -> Vec<Draw> {
    (0..n)
        .map(|i| {
            let start = (i * 7) % 25;
            let mut numbers = [0u8; 15];
            for (j, slot) in numbers.iter_mut().enumerate() {
                *slot = ((start + j) % 25 + 1) as u8;
            }
            numbers.sort();
            Draw { id: i as u32 + 1, numbers }
        })
        .collect()
}
