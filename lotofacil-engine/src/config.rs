use serde::{Deserialize, Serialize};

/// Nombres premiers de 1 à 25.
pub const PRIMES: [u8; 9] = [2, 3, 5, 7, 11, 13, 17, 19, 23];

/// Intervalle fermé `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: u32,
    pub max: u32,
}

impl Bounds {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u32) -> bool {
        self.min <= value && value <= self.max
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Pondération courte/longue du score composite. La somme devrait valoir 1.0
/// mais n'est pas vérifiée.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub short: f64,
    pub long: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self { short: 0.7, long: 0.3 }
    }
}

/// Deux révisions des règles coexistent en amont sans qu'aucune ne fasse
/// autorité : elles diffèrent sur les bornes premiers et recouvrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RuleRevision {
    /// Premiers [3,7], recouvrement [7,11].
    #[default]
    Relaxed,
    /// Premiers [4,6], recouvrement [8,10].
    Strict,
}

impl RuleRevision {
    pub fn rules(self) -> RuleSet {
        match self {
            RuleRevision::Relaxed => RuleSet::relaxed(),
            RuleRevision::Strict => RuleSet::strict(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// Nombre de numéros pairs.
    pub parity: Bounds,
    /// Nombre de numéros appartenant à `prime_set`.
    pub primes: Bounds,
    /// Somme des 15 numéros.
    pub sum: Bounds,
    /// Numéros communs avec le concours précédent.
    pub overlap: Bounds,
    pub prime_set: Vec<u8>,
}

impl RuleSet {
    pub fn relaxed() -> Self {
        Self {
            parity: Bounds::new(6, 9),
            primes: Bounds::new(3, 7),
            sum: Bounds::new(180, 230),
            overlap: Bounds::new(7, 11),
            prime_set: PRIMES.to_vec(),
        }
    }

    pub fn strict() -> Self {
        Self {
            primes: Bounds::new(4, 6),
            overlap: Bounds::new(8, 10),
            ..Self::relaxed()
        }
    }

    pub fn is_prime(&self, number: u8) -> bool {
        self.prime_set.contains(&number)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::relaxed()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum SearchStrategy {
    /// Énumère tous les sous-ensembles de 15 numéros du pool.
    #[default]
    Exhaustive,
    /// Tire `samples` sous-ensembles au hasard. Sans seed, la date du jour sert de seed.
    Sampled { samples: usize, seed: Option<u64> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub short_window: usize,
    pub long_window: usize,
    pub pool_size: usize,
    pub weights: Weights,
    pub rules: RuleSet,
    pub strategy: SearchStrategy,
    /// Au-delà, C(K,15) explose : la recherche exhaustive refuse le pool.
    pub max_exhaustive_pool: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            short_window: 10,
            long_window: 100,
            pool_size: 21,
            weights: Weights::default(),
            rules: RuleSet::default(),
            strategy: SearchStrategy::default(),
            max_exhaustive_pool: 21,
        }
    }
}

pub fn save_config(config: &EngineConfig, path: &std::path::Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn load_config(path: &std::path::Path) -> anyhow::Result<EngineConfig> {
    let json = std::fs::read_to_string(path)?;
    let config: EngineConfig = serde_json::from_str(&json)?;
    Ok(config)
}
