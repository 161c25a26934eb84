//! Canonical lookup keys.
//!
//! Equivalent requests must hit the same cache row, so every key is
//! normalized once here and used consistently on both read and write.

use shared::{Error, Result};
use std::fmt;

/// A normalized CEP: exactly eight digits, no separators.
///
/// The bare digit string is the internal lookup key; [`CepKey::hyphenated`]
/// renders the `NNNNN-NNN` display form used in payloads.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CepKey(String);

impl CepKey {
    pub fn parse(raw: &str) -> Result<Self> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() != 8 {
            return Err(Error::InvalidKey(format!(
                "CEP must contain exactly 8 digits, got {:?}",
                raw.trim()
            )));
        }
        Ok(Self(digits))
    }

    /// The bare 8-digit lookup key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display form: `NNNNN-NNN`.
    pub fn hyphenated(&self) -> String {
        format!("{}-{}", &self.0[..5], &self.0[5..])
    }
}

impl fmt::Display for CepKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A composite coordinate key, both axes fixed to 8 decimal places so that
/// floating-point jitter from repeated geocoding of the same address
/// collapses to a single cache row.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CoordKey(String);

impl CoordKey {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self(format!("{lat:.8},{lng:.8}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CoordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cep_formatting_variants_normalize_identically() {
        let plain = CepKey::parse("01001000").unwrap();
        let hyphenated = CepKey::parse("01001-000").unwrap();
        let padded = CepKey::parse("  01001-000 ").unwrap();
        let dotted = CepKey::parse("01.001-000").unwrap();

        assert_eq!(plain, hyphenated);
        assert_eq!(plain, padded);
        assert_eq!(plain, dotted);
        assert_eq!(plain.as_str(), "01001000");
    }

    #[test]
    fn cep_normalization_is_idempotent() {
        let once = CepKey::parse("01310-100").unwrap();
        let twice = CepKey::parse(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn cep_hyphenated_display_form() {
        let key = CepKey::parse("01001000").unwrap();
        assert_eq!(key.hyphenated(), "01001-000");
    }

    #[test]
    fn cep_rejects_wrong_digit_count() {
        assert!(matches!(CepKey::parse("1234"), Err(Error::InvalidKey(_))));
        assert!(matches!(
            CepKey::parse("123456789"),
            Err(Error::InvalidKey(_))
        ));
        assert!(matches!(CepKey::parse(""), Err(Error::InvalidKey(_))));
        assert!(matches!(CepKey::parse("abcdefgh"), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn coord_key_absorbs_trailing_float_noise() {
        let a = CoordKey::new(-23.5505, -46.6333);
        let b = CoordKey::new(-23.55050000000001, -46.63330000000002);
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "-23.55050000,-46.63330000");
    }

    #[test]
    fn coord_key_distinguishes_real_differences() {
        let a = CoordKey::new(-23.5505, -46.6333);
        let b = CoordKey::new(-23.5506, -46.6333);
        assert_ne!(a, b);
    }
}
