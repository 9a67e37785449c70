use lotofacil_db::models::{Draw, NUMBER_COUNT};

use crate::error::EngineError;

/// Un score réel par numéro, indexé de 1 à 25.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreTable {
    scores: [f64; NUMBER_COUNT],
}

impl ScoreTable {
    pub fn from_scores(scores: [f64; NUMBER_COUNT]) -> Self {
        Self { scores }
    }

    pub fn score(&self, number: u8) -> f64 {
        self.scores[(number - 1) as usize]
    }

    /// Somme des scores de `numbers`.
    pub fn total(&self, numbers: &[u8]) -> f64 {
        numbers.iter().map(|&n| self.score(n)).sum()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.scores
    }
}

#[derive(Debug, Clone)]
pub struct NumberScore {
    pub number: u8,
    pub frequency: u32,
    pub gap: u32,
    pub z_score: f64,
}

/// Fréquences et z-scores des 25 numéros sur une fenêtre de concours.
#[derive(Debug, Clone)]
pub struct RankingTable {
    /// Nombre de concours réellement analysés.
    pub window: usize,
    pub frequencies: [u32; NUMBER_COUNT],
    /// Concours écoulés depuis la dernière sortie (0 = sorti au dernier concours).
    pub gaps: [u32; NUMBER_COUNT],
    pub z_scores: ScoreTable,
    pub mean: f64,
    pub std_dev: f64,
}

impl RankingTable {
    pub fn z_score(&self, number: u8) -> f64 {
        self.z_scores.score(number)
    }

    pub fn frequency(&self, number: u8) -> u32 {
        self.frequencies[(number - 1) as usize]
    }

    pub fn entries(&self) -> Vec<NumberScore> {
        (1..=NUMBER_COUNT as u8)
            .map(|n| NumberScore {
                number: n,
                frequency: self.frequency(n),
                gap: self.gaps[(n - 1) as usize],
                z_score: self.z_score(n),
            })
            .collect()
    }
}

/// Classement sur les `window_size` derniers concours de `history` (ordre croissant).
/// Une fenêtre plus grande que l'historique prend tout l'historique.
pub fn build_ranking(history: &[Draw], window_size: usize) -> Result<RankingTable, EngineError> {
    if history.is_empty() {
        return Err(EngineError::EmptyHistory);
    }
    if window_size == 0 {
        return Err(EngineError::InvalidWindow);
    }

    let start = history.len().saturating_sub(window_size);
    let table = rank_window(&history[start..]);
    log::debug!(
        "Classement sur {} concours : moyenne {:.3}, écart-type {:.3}",
        table.window, table.mean, table.std_dev
    );
    Ok(table)
}

/// Calcule les z-scores d'une fenêtre déjà découpée. Une fenêtre vide donne
/// des fréquences nulles et des z-scores nuls.
pub fn rank_window(window: &[Draw]) -> RankingTable {
    let mut frequencies = [0u32; NUMBER_COUNT];
    let mut gaps = [window.len() as u32; NUMBER_COUNT];

    for (age, draw) in window.iter().rev().enumerate() {
        for &n in &draw.numbers {
            let idx = (n - 1) as usize;
            frequencies[idx] += 1;
            if gaps[idx] == window.len() as u32 {
                gaps[idx] = age as u32;
            }
        }
    }

    let n = NUMBER_COUNT as f64;
    let mean = frequencies.iter().map(|&f| f as f64).sum::<f64>() / n;
    let variance = frequencies
        .iter()
        .map(|&f| (f as f64 - mean).powi(2))
        .sum::<f64>()
        / n;
    let std_dev = variance.sqrt();
    // Fréquences toutes égales : z-scores nuls plutôt que NaN
    let divisor = if std_dev > 0.0 { std_dev } else { 1.0 };

    let mut z = [0.0f64; NUMBER_COUNT];
    for (score, &f) in z.iter_mut().zip(frequencies.iter()) {
        *score = (f as f64 - mean) / divisor;
    }

    RankingTable {
        window: window.len(),
        frequencies,
        gaps,
        z_scores: ScoreTable::from_scores(z),
        mean,
        std_dev,
    }
}
