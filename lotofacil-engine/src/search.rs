use chrono::Datelike;
use itertools::Itertools;
use rand::SeedableRng;
use rand::rngs::StdRng;

use lotofacil_db::models::{Draw, PICK_COUNT};

use crate::config::{EngineConfig, RuleSet, SearchStrategy};
use crate::error::EngineError;
use crate::pool::CandidatePool;
use crate::ranking::ScoreTable;
use crate::validator::check_rules;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Triée par ordre croissant.
    pub combination: [u8; PICK_COUNT],
    pub score: f64,
    /// Aucune combinaison valide : ce sont les 15 premiers numéros du pool.
    pub fallback: bool,
    pub evaluated: usize,
    pub valid: usize,
}

/// Seed déterministe basé sur la date du jour (YYYYMMDD).
pub fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    let y = today.year() as u64;
    let m = today.month() as u64;
    let d = today.day() as u64;
    y * 10_000 + m * 100 + d
}

/// Meilleure combinaison valide vue jusqu'ici. Une égalité de score ne
/// remplace pas la combinaison déjà retenue.
struct BestTracker<'a> {
    composite: &'a ScoreTable,
    previous: Option<&'a Draw>,
    rules: &'a RuleSet,
    best: Option<([u8; PICK_COUNT], f64)>,
    evaluated: usize,
    valid: usize,
}

impl<'a> BestTracker<'a> {
    fn new(composite: &'a ScoreTable, previous: Option<&'a Draw>, rules: &'a RuleSet) -> Self {
        Self {
            composite,
            previous,
            rules,
            best: None,
            evaluated: 0,
            valid: 0,
        }
    }

    /// `subset` vient d'un `CandidatePool` : 15 numéros distincts et dans l'intervalle.
    fn consider(&mut self, subset: &[u8]) {
        self.evaluated += 1;
        if !check_rules(subset, self.previous, self.rules).valid {
            return;
        }
        self.valid += 1;

        // Somme sur la combinaison triée : le score ne dépend pas de l'ordre du pool
        let combination = sorted_combination(subset);
        let score = self.composite.total(&combination);
        match self.best {
            Some((_, best_score)) if score <= best_score => {}
            _ => self.best = Some((combination, score)),
        }
    }

    fn finish(self, pool: &CandidatePool) -> SearchOutcome {
        match self.best {
            Some((combination, score)) => SearchOutcome {
                combination,
                score,
                fallback: false,
                evaluated: self.evaluated,
                valid: self.valid,
            },
            None => {
                let combination = sorted_combination(&pool.numbers[..PICK_COUNT]);
                SearchOutcome {
                    combination,
                    score: self.composite.total(&combination),
                    fallback: true,
                    evaluated: self.evaluated,
                    valid: 0,
                }
            }
        }
    }
}

fn sorted_combination(subset: &[u8]) -> [u8; PICK_COUNT] {
    let mut combination = [0u8; PICK_COUNT];
    combination.copy_from_slice(subset);
    combination.sort();
    combination
}

/// Recherche selon la stratégie de `config`.
pub fn search(
    pool: &CandidatePool,
    composite: &ScoreTable,
    previous: Option<&Draw>,
    config: &EngineConfig,
) -> Result<SearchOutcome, EngineError> {
    let outcome = match config.strategy {
        SearchStrategy::Exhaustive => {
            search_exhaustive(pool, composite, previous, &config.rules, config.max_exhaustive_pool)?
        }
        SearchStrategy::Sampled { samples, seed } => {
            search_sampled(pool, composite, previous, &config.rules, samples, seed.unwrap_or_else(date_seed))?
        }
    };

    if outcome.fallback {
        log::warn!(
            "Aucune combinaison valide parmi {} : repli sur les {} premiers numéros du pool",
            outcome.evaluated, PICK_COUNT
        );
    } else {
        log::info!(
            "{} combinaisons évaluées, {} valides, meilleur score {:.4}",
            outcome.evaluated, outcome.valid, outcome.score
        );
    }
    Ok(outcome)
}

/// Énumère tous les sous-ensembles de 15 numéros du pool, dans l'ordre
/// lexicographique du pool. C(21,15) = 54 264 : le pool est plafonné à `max_pool`.
pub fn search_exhaustive(
    pool: &CandidatePool,
    composite: &ScoreTable,
    previous: Option<&Draw>,
    rules: &RuleSet,
    max_pool: usize,
) -> Result<SearchOutcome, EngineError> {
    if pool.len() < PICK_COUNT {
        return Err(EngineError::InsufficientPool { size: pool.len() });
    }
    if pool.len() > max_pool {
        return Err(EngineError::PoolTooLarge { size: pool.len(), max: max_pool });
    }

    let mut tracker = BestTracker::new(composite, previous, rules);
    for subset in pool.numbers.iter().copied().combinations(PICK_COUNT) {
        tracker.consider(&subset);
    }
    Ok(tracker.finish(pool))
}

/// Tire `samples` sous-ensembles uniformément dans le pool. Pas de plafond sur
/// la taille du pool ; le résultat dépend du seed.
pub fn search_sampled(
    pool: &CandidatePool,
    composite: &ScoreTable,
    previous: Option<&Draw>,
    rules: &RuleSet,
    samples: usize,
    seed: u64,
) -> Result<SearchOutcome, EngineError> {
    if pool.len() < PICK_COUNT {
        return Err(EngineError::InsufficientPool { size: pool.len() });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut tracker = BestTracker::new(composite, previous, rules);
    let mut subset = Vec::with_capacity(PICK_COUNT);

    for _ in 0..samples {
        subset.clear();
        subset.extend(
            rand::seq::index::sample(&mut rng, pool.len(), PICK_COUNT)
                .iter()
                .map(|i| pool.numbers[i]),
        );
        tracker.consider(&subset);
    }
    Ok(tracker.finish(pool))
}
