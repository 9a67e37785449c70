use lotofacil_db::models::{NUMBER_COUNT, PICK_COUNT};

use crate::config::Weights;
use crate::error::EngineError;
use crate::ranking::{RankingTable, ScoreTable};
use crate::validator::check_numbers;

/// Les K meilleurs numéros par score composite, du meilleur au moins bon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePool {
    pub numbers: Vec<u8>,
}

impl CandidatePool {
    /// Refuse les numéros hors de 1..=25 et les doublons.
    pub fn new(numbers: Vec<u8>) -> Result<Self, EngineError> {
        check_numbers(&numbers)?;
        Ok(Self { numbers })
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}

/// Mélange pondéré des z-scores courts et longs.
pub fn composite_scores(short: &RankingTable, long: &RankingTable, weights: Weights) -> ScoreTable {
    let mut scores = [0.0f64; NUMBER_COUNT];
    for (i, score) in scores.iter_mut().enumerate() {
        let n = (i + 1) as u8;
        *score = weights.short * short.z_score(n) + weights.long * long.z_score(n);
    }
    ScoreTable::from_scores(scores)
}

/// Trie les numéros par score composite décroissant et garde les `pool_size` premiers.
/// À score égal, le plus petit numéro passe devant.
pub fn build_pool(
    short: &RankingTable,
    long: &RankingTable,
    pool_size: usize,
    weights: Weights,
) -> Result<(CandidatePool, ScoreTable), EngineError> {
    if pool_size < PICK_COUNT {
        return Err(EngineError::InsufficientPool { size: pool_size });
    }
    if pool_size > NUMBER_COUNT {
        return Err(EngineError::InvalidPoolSize { size: pool_size });
    }

    let composite = composite_scores(short, long, weights);
    let pool = rank_pool(&composite, pool_size)?;
    Ok((pool, composite))
}

fn rank_pool(composite: &ScoreTable, pool_size: usize) -> Result<CandidatePool, EngineError> {
    let mut numbers: Vec<u8> = (1..=NUMBER_COUNT as u8).collect();
    numbers.sort_by(|&a, &b| {
        composite
            .score(b)
            .total_cmp(&composite.score(a))
            .then(a.cmp(&b))
    });
    numbers.truncate(pool_size);
    CandidatePool::new(numbers)
}
