use anyhow::{Context, Result, bail};

/// Nombre de numéros jouables (1 à 25).
pub const NUMBER_COUNT: usize = 25;

/// Nombre de numéros tirés à chaque concours.
pub const PICK_COUNT: usize = 15;

/// Un concours : identifiant et ses 15 numéros, triés par ordre croissant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub id: u32,
    pub numbers: [u8; PICK_COUNT],
}

impl Draw {
    pub fn new(id: u32, numbers: &[u8]) -> Result<Self> {
        if id == 0 {
            bail!("Identifiant de concours invalide : 0");
        }
        validate_numbers(numbers).with_context(|| format!("Concours {} invalide", id))?;

        let mut sorted = [0u8; PICK_COUNT];
        sorted.copy_from_slice(numbers);
        sorted.sort();

        Ok(Self { id, numbers: sorted })
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers.binary_search(&number).is_ok()
    }

    /// Format du cache : "1-2-3-...".
    pub fn joined(&self) -> String {
        self.numbers
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// Lit une liste de numéros séparés par des tirets ("01-02-...", zéros initiaux acceptés).
pub fn parse_numbers(s: &str) -> Result<Vec<u8>> {
    s.trim()
        .split('-')
        .map(|part| {
            let part = part.trim();
            part.parse::<u8>()
                .with_context(|| format!("Impossible de parser le numéro '{}'", part))
        })
        .collect()
}

pub fn validate_numbers(numbers: &[u8]) -> Result<()> {
    if numbers.len() != PICK_COUNT {
        bail!("Attendu {} numéros, reçu {}", PICK_COUNT, numbers.len());
    }
    for &n in numbers {
        if n < 1 || n as usize > NUMBER_COUNT {
            bail!("Numéro {} hors limites (1-{})", n, NUMBER_COUNT);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Numéro en double : {}", numbers[i]);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIRST_FIFTEEN: [u8; 15] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

    #[test]
    fn test_validate_numbers_ok() {
        assert!(validate_numbers(&FIRST_FIFTEEN).is_ok());
        assert!(validate_numbers(&[11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25]).is_ok());
    }

    #[test]
    fn test_validate_numbers_out_of_range() {
        let mut numbers = FIRST_FIFTEEN;
        numbers[0] = 0;
        assert!(validate_numbers(&numbers).is_err());
        numbers[0] = 26;
        assert!(validate_numbers(&numbers).is_err());
    }

    #[test]
    fn test_validate_numbers_duplicate() {
        let mut numbers = FIRST_FIFTEEN;
        numbers[14] = 1;
        assert!(validate_numbers(&numbers).is_err());
    }

    #[test]
    fn test_validate_numbers_wrong_count() {
        assert!(validate_numbers(&FIRST_FIFTEEN[..14]).is_err());
        assert!(validate_numbers(&[]).is_err());
    }

    #[test]
    fn test_draw_new_sorts() {
        let draw = Draw::new(42, &[15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1]).unwrap();
        assert_eq!(draw.numbers, FIRST_FIFTEEN);
        assert_eq!(draw.id, 42);
    }

    #[test]
    fn test_draw_new_rejects_zero_id() {
        assert!(Draw::new(0, &FIRST_FIFTEEN).is_err());
    }

    #[test]
    fn test_draw_contains() {
        let draw = Draw::new(1, &FIRST_FIFTEEN).unwrap();
        assert!(draw.contains(1));
        assert!(draw.contains(15));
        assert!(!draw.contains(16));
    }

    #[test]
    fn test_joined_and_parse() {
        let draw = Draw::new(7, &FIRST_FIFTEEN).unwrap();
        assert_eq!(draw.joined(), "1-2-3-4-5-6-7-8-9-10-11-12-13-14-15");
        let parsed = parse_numbers(&draw.joined()).unwrap();
        assert_eq!(Draw::new(7, &parsed).unwrap(), draw);
    }

    #[test]
    fn test_parse_numbers_zero_padded() {
        assert_eq!(parse_numbers("01-02-25").unwrap(), vec![1, 2, 25]);
        assert!(parse_numbers("01-xx-25").is_err());
    }
}
