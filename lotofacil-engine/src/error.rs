use thiserror::Error;

use lotofacil_db::models::{NUMBER_COUNT, PICK_COUNT};

/// Conditions qui empêchent le moteur de produire une combinaison.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("historique vide : aucun concours à analyser")]
    EmptyHistory,

    #[error("fenêtre d'analyse invalide : au moins 1 concours requis")]
    InvalidWindow,

    #[error("pool de {size} numéros insuffisant (minimum {})", PICK_COUNT)]
    InsufficientPool { size: usize },

    #[error("taille de pool {size} invalide (maximum {})", NUMBER_COUNT)]
    InvalidPoolSize { size: usize },

    #[error("pool de {size} numéros trop grand pour une recherche exhaustive (maximum {max})")]
    PoolTooLarge { size: usize, max: usize },

    #[error("combinaison de {len} numéros, {} attendus", PICK_COUNT)]
    InvalidCombination { len: usize },

    #[error("numéro {number} hors de l'intervalle 1-{}", NUMBER_COUNT)]
    NumberOutOfRange { number: u8 },

    #[error("numéro {number} en double")]
    DuplicateNumber { number: u8 },
}
