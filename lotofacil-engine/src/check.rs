use lotofacil_db::models::Draw;

/// Rang de gain d'une grille de 15 numéros (11 bons numéros minimum).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrizeTier {
    Jackpot,
    Fourteen,
    Prize(usize),
    NoPrize(usize),
}

impl PrizeTier {
    pub fn from_hits(hits: usize) -> Self {
        match hits {
            15.. => PrizeTier::Jackpot,
            14 => PrizeTier::Fourteen,
            11..=13 => PrizeTier::Prize(hits),
            _ => PrizeTier::NoPrize(hits),
        }
    }

    pub fn is_winning(&self) -> bool {
        !matches!(self, PrizeTier::NoPrize(_))
    }
}

impl std::fmt::Display for PrizeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrizeTier::Jackpot => write!(f, "15 POINTS (MAXIMUM) !"),
            PrizeTier::Fourteen => write!(f, "14 POINTS !"),
            PrizeTier::Prize(n) => write!(f, "{} POINTS (GAGNANT)", n),
            PrizeTier::NoPrize(n) => write!(f, "{} bons numéros, pas de gain", n),
        }
    }
}

pub fn count_hits(ticket: &[u8], draw: &Draw) -> usize {
    ticket.iter().filter(|&&n| draw.contains(n)).count()
}
