//! Location name normalization

use std::fmt;

/// Canonicalized location name used for all city/province matching.
///
/// Construction normalizes the raw name: lowercased, Latin diacritics folded,
/// leading "provincia de/del " and trailing " province/state/region" stripped,
/// surrounding whitespace trimmed. Stored names are normalized the same way at
/// comparison time; they are never persisted in normalized form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location(String);

impl Location {
    pub fn normalize(raw: &str) -> Self {
        let folded: String = raw.to_lowercase().chars().map(fold_diacritic).collect();
        let mut name = folded.trim();
        for prefix in ["provincia del ", "provincia de "] {
            if let Some(rest) = name.strip_prefix(prefix) {
                name = rest;
                break;
            }
        }
        for suffix in [" province", " state", " region"] {
            if let Some(rest) = name.strip_suffix(suffix) {
                name = rest;
                break;
            }
        }
        Self(name.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `stored` names this location once normalized.
    pub fn matches(&self, stored: &str) -> bool {
        Location::normalize(stored) == *self
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_case_whitespace_and_prefix() {
        assert_eq!(Location::normalize("Provincia de Loja").as_str(), "loja");
        assert_eq!(Location::normalize("  LOJA ").as_str(), "loja");
        assert_eq!(Location::normalize("Provincia del Guayas").as_str(), "guayas");
    }

    #[test]
    fn folds_diacritics() {
        assert_eq!(Location::normalize("Manabí").as_str(), "manabi");
        assert_eq!(Location::normalize("Cañar").as_str(), "canar");
        assert_eq!(Location::normalize("GALÁPAGOS").as_str(), "galapagos");
    }

    #[test]
    fn strips_trailing_qualifiers() {
        assert_eq!(Location::normalize("Pichincha Province").as_str(), "pichincha");
        assert_eq!(Location::normalize("Azuay region").as_str(), "azuay");
        assert_eq!(Location::normalize("Texas state").as_str(), "texas");
    }

    #[test]
    fn matches_stored_values() {
        let input = Location::normalize("quito");
        assert!(input.matches("Quito"));
        assert!(input.matches(" QUITO "));
        assert!(!input.matches("Guayaquil"));
    }
}
