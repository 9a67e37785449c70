use lotofacil_db::models::{Draw, NUMBER_COUNT, PICK_COUNT};

use crate::config::RuleSet;
use crate::error::EngineError;

/// Première règle en échec, ou `Ok` si toutes passent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    Parity,
    Prime,
    Sum,
    Overlap,
    Ok,
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reason::Parity => write!(f, "PARITÉ"),
            Reason::Prime => write!(f, "PREMIERS"),
            Reason::Sum => write!(f, "SOMME"),
            Reason::Overlap => write!(f, "RECOUVREMENT"),
            Reason::Ok => write!(f, "OK"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub reason: Reason,
}

impl ValidationResult {
    fn pass() -> Self {
        Self { valid: true, reason: Reason::Ok }
    }

    fn fail(reason: Reason) -> Self {
        Self { valid: false, reason }
    }
}

/// Les quantités que mesurent les règles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombinationStats {
    pub evens: u32,
    pub primes: u32,
    pub sum: u32,
    /// `None` sans concours précédent.
    pub overlap: Option<u32>,
}

pub fn combination_stats(combination: &[u8], previous: Option<&Draw>, rules: &RuleSet) -> CombinationStats {
    CombinationStats {
        evens: combination.iter().filter(|&&n| n % 2 == 0).count() as u32,
        primes: combination.iter().filter(|&&n| rules.is_prime(n)).count() as u32,
        sum: combination.iter().map(|&n| n as u32).sum(),
        overlap: previous.map(|draw| combination.iter().filter(|&&n| draw.contains(n)).count() as u32),
    }
}

/// Numéros dans 1..=25, sans doublon.
pub fn check_numbers(numbers: &[u8]) -> Result<(), EngineError> {
    let mut seen = [false; NUMBER_COUNT];
    for &number in numbers {
        if number == 0 || number as usize > NUMBER_COUNT {
            return Err(EngineError::NumberOutOfRange { number });
        }
        let slot = &mut seen[(number - 1) as usize];
        if *slot {
            return Err(EngineError::DuplicateNumber { number });
        }
        *slot = true;
    }
    Ok(())
}

/// Vérifie, dans l'ordre, parité, premiers, somme puis recouvrement avec le
/// concours précédent. S'arrête à la première règle en échec.
///
/// Une entrée qui n'est pas une combinaison (15 numéros distincts de 1 à 25)
/// est une erreur, pas un échec de règle.
pub fn validate(
    combination: &[u8],
    previous: Option<&Draw>,
    rules: &RuleSet,
) -> Result<ValidationResult, EngineError> {
    if combination.len() != PICK_COUNT {
        return Err(EngineError::InvalidCombination { len: combination.len() });
    }
    check_numbers(combination)?;
    Ok(check_rules(combination, previous, rules))
}

/// Règles seules, sur une combinaison déjà contrôlée.
pub(crate) fn check_rules(combination: &[u8], previous: Option<&Draw>, rules: &RuleSet) -> ValidationResult {
    let evens = combination.iter().filter(|&&n| n % 2 == 0).count() as u32;
    if !rules.parity.contains(evens) {
        return ValidationResult::fail(Reason::Parity);
    }

    let primes = combination.iter().filter(|&&n| rules.is_prime(n)).count() as u32;
    if !rules.primes.contains(primes) {
        return ValidationResult::fail(Reason::Prime);
    }

    let sum: u32 = combination.iter().map(|&n| n as u32).sum();
    if !rules.sum.contains(sum) {
        return ValidationResult::fail(Reason::Sum);
    }

    if let Some(draw) = previous {
        if !overlap_ok(combination, draw, rules) {
            return ValidationResult::fail(Reason::Overlap);
        }
    }

    ValidationResult::pass()
}

pub fn overlap_ok(combination: &[u8], previous: &Draw, rules: &RuleSet) -> bool {
    let shared = combination.iter().filter(|&&n| previous.contains(n)).count() as u32;
    rules.overlap.contains(shared)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(id: u32, numbers: &[u8]) -> Draw {
        Draw::new(id, numbers).unwrap()
    }

    const SIX_EVENS: [u8; 15] = [1, 2, 3, 5, 8, 9, 10, 13, 15, 20, 21, 22, 23, 24, 25];
    const FIVE_EVENS: [u8; 15] = [1, 3, 7, 8, 9, 12, 13, 15, 17, 18, 19, 20, 21, 22, 23];
    const NINE_EVENS: [u8; 15] = [2, 4, 7, 8, 10, 12, 13, 16, 17, 18, 19, 22, 23, 24, 25];
    const TEN_EVENS: [u8; 15] = [2, 6, 7, 8, 12, 13, 14, 16, 17, 18, 20, 22, 23, 24, 25];
    const SUM_180: [u8; 15] = [5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19];
    const SUM_179: [u8; 15] = [4, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19];
    const SUM_230: [u8; 15] = [1, 5, 6, 10, 11, 12, 14, 17, 19, 20, 21, 22, 23, 24, 25];
    const SUM_231: [u8; 15] = [4, 5, 6, 9, 11, 12, 14, 16, 19, 20, 21, 22, 23, 24, 25];
    const TWO_PRIMES: [u8; 15] = [3, 6, 8, 9, 10, 12, 14, 15, 17, 18, 20, 21, 22, 24, 25];
    const SEVEN_PRIMES: [u8; 15] = [2, 3, 5, 8, 9, 11, 12, 15, 17, 19, 20, 21, 22, 23, 24];
    const EIGHT_PRIMES: [u8; 15] = [1, 2, 3, 4, 5, 7, 8, 11, 13, 18, 19, 20, 22, 23, 25];

    #[test]
    fn test_parity_bounds() {
        let rules = RuleSet::relaxed();
        assert_eq!(validate(&SIX_EVENS, None, &rules).unwrap().reason, Reason::Ok);
        assert_eq!(validate(&NINE_EVENS, None, &rules).unwrap().reason, Reason::Ok);
        assert_eq!(validate(&FIVE_EVENS, None, &rules).unwrap(), ValidationResult::fail(Reason::Parity));
        assert_eq!(validate(&TEN_EVENS, None, &rules).unwrap(), ValidationResult::fail(Reason::Parity));
    }

    #[test]
    fn test_sum_bounds() {
        let rules = RuleSet::relaxed();
        assert!(validate(&SUM_180, None, &rules).unwrap().valid);
        assert!(validate(&SUM_230, None, &rules).unwrap().valid);
        assert_eq!(validate(&SUM_179, None, &rules).unwrap().reason, Reason::Sum);
        assert_eq!(validate(&SUM_231, None, &rules).unwrap().reason, Reason::Sum);
    }

    #[test]
    fn test_prime_bounds() {
        let relaxed = RuleSet::relaxed();
        assert_eq!(validate(&TWO_PRIMES, None, &relaxed).unwrap().reason, Reason::Prime);
        assert_eq!(validate(&EIGHT_PRIMES, None, &relaxed).unwrap().reason, Reason::Prime);
        assert!(validate(&SEVEN_PRIMES, None, &relaxed).unwrap().valid);

        let strict = RuleSet::strict();
        assert_eq!(validate(&SEVEN_PRIMES, None, &strict).unwrap().reason, Reason::Prime);
    }

    #[test]
    fn test_first_failure_wins() {
        // 1..15 : parité et premiers valides, somme 120
        let rules = RuleSet::relaxed();
        let low: Vec<u8> = (1..=15).collect();
        assert_eq!(validate(&low, None, &rules).unwrap().reason, Reason::Sum);

        // 5 pairs et somme hors bornes : la parité est signalée en premier
        let odd_heavy = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 13, 15, 17, 19];
        assert_eq!(validate(&odd_heavy, None, &rules).unwrap().reason, Reason::Parity);
    }

    #[test]
    fn test_overlap_rule() {
        let rules = RuleSet::relaxed();
        let previous = draw(1, &(1..=15).collect::<Vec<u8>>());

        let eleven_shared = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 16, 17, 18, 19];
        assert!(overlap_ok(&eleven_shared, &previous, &rules));

        let five_shared = [1, 2, 3, 4, 5, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25];
        assert_eq!(validate(&five_shared, Some(&previous), &rules).unwrap(), ValidationResult::fail(Reason::Overlap));
        // Sans concours précédent la règle est ignorée
        assert!(validate(&five_shared, None, &rules).unwrap().valid);
    }

    #[test]
    fn test_overlap_revisions() {
        let previous = draw(1, &(1..=15).collect::<Vec<u8>>());
        let eleven_shared = [5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 22, 23, 24, 25];

        assert!(validate(&eleven_shared, Some(&previous), &RuleSet::relaxed()).unwrap().valid);
        assert_eq!(
            validate(&eleven_shared, Some(&previous), &RuleSet::strict()).unwrap().reason,
            Reason::Overlap
        );
    }

    #[test]
    fn test_validate_is_pure() {
        let rules = RuleSet::relaxed();
        let previous = draw(3, &SUM_180);
        let first = validate(&SUM_230, Some(&previous), &rules).unwrap();
        for _ in 0..10 {
            assert_eq!(validate(&SUM_230, Some(&previous), &rules).unwrap(), first);
        }
    }

    #[test]
    fn test_rejects_wrong_length() {
        let rules = RuleSet::relaxed();
        let fourteen: Vec<u8> = (5..=18).collect();
        assert_eq!(
            validate(&fourteen, None, &rules),
            Err(EngineError::InvalidCombination { len: 14 })
        );
        // 4..19 passerait toutes les règles si la longueur n'était pas contrôlée
        let sixteen: Vec<u8> = (4..=19).collect();
        assert_eq!(
            validate(&sixteen, None, &rules),
            Err(EngineError::InvalidCombination { len: 16 })
        );
        assert_eq!(validate(&[], None, &rules), Err(EngineError::InvalidCombination { len: 0 }));
    }

    #[test]
    fn test_rejects_duplicates_and_out_of_range() {
        let rules = RuleSet::relaxed();
        let doubled = [5, 5, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 20];
        assert_eq!(validate(&doubled, None, &rules), Err(EngineError::DuplicateNumber { number: 5 }));

        let mut zero = SUM_180;
        zero[0] = 0;
        assert_eq!(validate(&zero, None, &rules), Err(EngineError::NumberOutOfRange { number: 0 }));

        let mut high = SUM_180;
        high[14] = 26;
        assert_eq!(validate(&high, None, &rules), Err(EngineError::NumberOutOfRange { number: 26 }));
    }

    #[test]
    fn test_check_numbers() {
        assert!(check_numbers(&(1..=25).collect::<Vec<u8>>()).is_ok());
        assert!(check_numbers(&[]).is_ok());
        assert_eq!(check_numbers(&[3, 1, 3]), Err(EngineError::DuplicateNumber { number: 3 }));
        assert_eq!(check_numbers(&[1, 30]), Err(EngineError::NumberOutOfRange { number: 30 }));
    }

    #[test]
    fn test_combination_stats() {
        let rules = RuleSet::relaxed();
        let previous = draw(1, &(1..=15).collect::<Vec<u8>>());
        let stats = combination_stats(&SUM_180, Some(&previous), &rules);
        assert_eq!(stats, CombinationStats { evens: 7, primes: 6, sum: 180, overlap: Some(11) });
        assert_eq!(combination_stats(&SUM_180, None, &rules).overlap, None);
    }
}
