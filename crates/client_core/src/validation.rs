//! Gatekeeping for search input before it is committed as a query term.

use shared::{
    domain::{PokemonId, SearchKind},
    error::{ApiError, ErrorCode},
};
use thiserror::Error;

const ACCENTED_NAME_LETTERS: &[char] = &['á', 'é', 'í', 'ó', 'ú', 'Á', 'É', 'Í', 'Ó', 'Ú', 'ñ', 'Ñ'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SearchRejection {
    #[error("Name must be at least 3 characters.")]
    NameTooShort,
    #[error("Name must not contain special characters or numbers.")]
    NameInvalidCharacters,
    #[error("Number must contain digits only (e.g. 25 or #025).")]
    NumberNotDigits,
    #[error("Number must be greater than 0.")]
    NumberNotPositive,
    #[error("Type must be at least 3 characters.")]
    TypeTooShort,
    #[error("Type must contain letters only (e.g. water, fire, poison).")]
    TypeInvalidCharacters,
}

impl SearchRejection {
    pub fn is_too_short(self) -> bool {
        matches!(
            self,
            SearchRejection::NameTooShort | SearchRejection::TypeTooShort
        )
    }
}

impl From<SearchRejection> for ApiError {
    fn from(rejection: SearchRejection) -> Self {
        ApiError::new(ErrorCode::Validation, rejection.to_string())
    }
}

/// Checks `raw` against the policy of `kind`. Blank input is always accepted
/// because committing it cancels the search.
pub fn validate_search(raw: &str, kind: SearchKind) -> Result<(), SearchRejection> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(());
    }

    match kind {
        SearchKind::Name => {
            if trimmed.chars().count() < kind.min_length() {
                return Err(SearchRejection::NameTooShort);
            }
            if !trimmed.chars().all(is_name_char) {
                return Err(SearchRejection::NameInvalidCharacters);
            }
        }
        SearchKind::Number => {
            let digits = strip_number_prefix(trimmed);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(SearchRejection::NumberNotDigits);
            }
            if digits.bytes().all(|b| b == b'0') {
                return Err(SearchRejection::NumberNotPositive);
            }
        }
        SearchKind::Type => {
            if trimmed.chars().count() < kind.min_length() {
                return Err(SearchRejection::TypeTooShort);
            }
            if !trimmed
                .chars()
                .all(|c| c.is_ascii_alphabetic() || c.is_whitespace())
            {
                return Err(SearchRejection::TypeInvalidCharacters);
            }
        }
    }

    Ok(())
}

/// Canonical form of an accepted term: numbers lose surrounding whitespace
/// and the `#` prefix, names and types are trimmed and lower-cased.
pub fn normalize_search_term(raw: &str, kind: SearchKind) -> String {
    let trimmed = raw.trim();
    match kind {
        SearchKind::Number => strip_number_prefix(trimmed).to_string(),
        SearchKind::Name | SearchKind::Type => trimmed.to_lowercase(),
    }
}

/// Parses a number search term (`"25"`, `"025"`, `"#025"`) into an id.
pub fn parse_pokemon_number(term: &str) -> Option<PokemonId> {
    let digits = strip_number_prefix(term.trim());
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits
        .parse::<i64>()
        .ok()
        .filter(|id| *id >= 1)
        .map(PokemonId)
}

fn strip_number_prefix(value: &str) -> &str {
    value.strip_prefix('#').unwrap_or(value)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c.is_whitespace() || ACCENTED_NAME_LETTERS.contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_is_accepted_for_every_kind() {
        for kind in [SearchKind::Name, SearchKind::Number, SearchKind::Type] {
            assert_eq!(validate_search("", kind), Ok(()));
            assert_eq!(validate_search("   \t ", kind), Ok(()));
        }
    }

    #[test]
    fn name_requires_three_letters() {
        assert_eq!(
            validate_search("pi", SearchKind::Name),
            Err(SearchRejection::NameTooShort)
        );
        assert_eq!(
            validate_search("  pi  ", SearchKind::Name),
            Err(SearchRejection::NameTooShort)
        );
        assert!(SearchRejection::NameTooShort.is_too_short());
        assert!(SearchRejection::NameTooShort
            .to_string()
            .contains("at least 3 characters"));
        assert_eq!(validate_search("pikachu", SearchKind::Name), Ok(()));
    }

    #[test]
    fn rejection_becomes_validation_error() {
        let err = ApiError::from(SearchRejection::TypeTooShort);
        assert_eq!(err.code, ErrorCode::Validation);
        assert_eq!(err.message, "Type must be at least 3 characters.");
        assert!(!err.is_retryable());
    }

    #[test]
    fn name_accepts_accents_spaces_and_enye() {
        assert_eq!(validate_search("Mr Mime", SearchKind::Name), Ok(()));
        assert_eq!(validate_search("Flabébé", SearchKind::Name), Ok(()));
        assert_eq!(validate_search("ÑAÑA", SearchKind::Name), Ok(()));
        assert_eq!(validate_search("ááá", SearchKind::Name), Ok(()));
    }

    #[test]
    fn name_rejects_digits_and_symbols() {
        assert_eq!(
            validate_search("porygon2", SearchKind::Name),
            Err(SearchRejection::NameInvalidCharacters)
        );
        assert_eq!(
            validate_search("mr.mime", SearchKind::Name),
            Err(SearchRejection::NameInvalidCharacters)
        );
        assert_eq!(
            validate_search("ho-oh", SearchKind::Name),
            Err(SearchRejection::NameInvalidCharacters)
        );
    }

    #[test]
    fn number_accepts_optional_hash_prefix() {
        assert_eq!(validate_search("#025", SearchKind::Number), Ok(()));
        assert_eq!(validate_search("025", SearchKind::Number), Ok(()));
        assert_eq!(validate_search(" 7 ", SearchKind::Number), Ok(()));
        assert_eq!(parse_pokemon_number("#025"), Some(PokemonId(25)));
        assert_eq!(parse_pokemon_number("025"), Some(PokemonId(25)));
    }

    #[test]
    fn number_rejects_non_digits_and_zero() {
        assert_eq!(
            validate_search("abc", SearchKind::Number),
            Err(SearchRejection::NumberNotDigits)
        );
        assert_eq!(
            validate_search("#", SearchKind::Number),
            Err(SearchRejection::NumberNotDigits)
        );
        assert_eq!(
            validate_search("##5", SearchKind::Number),
            Err(SearchRejection::NumberNotDigits)
        );
        assert_eq!(
            validate_search("-4", SearchKind::Number),
            Err(SearchRejection::NumberNotDigits)
        );
        assert_eq!(
            validate_search("000", SearchKind::Number),
            Err(SearchRejection::NumberNotPositive)
        );
        assert_eq!(
            validate_search("#0", SearchKind::Number),
            Err(SearchRejection::NumberNotPositive)
        );
    }

    #[test]
    fn number_has_no_upper_bound() {
        assert_eq!(validate_search("99999", SearchKind::Number), Ok(()));
        assert_eq!(
            validate_search("123456789012345678901234567890", SearchKind::Number),
            Ok(())
        );
        assert_eq!(parse_pokemon_number("123456789012345678901234567890"), None);
    }

    #[test]
    fn type_is_ascii_only() {
        assert_eq!(validate_search("fire", SearchKind::Type), Ok(()));
        assert_eq!(
            validate_search("fi", SearchKind::Type),
            Err(SearchRejection::TypeTooShort)
        );
        assert_eq!(
            validate_search("ááá", SearchKind::Type),
            Err(SearchRejection::TypeInvalidCharacters)
        );
        assert_eq!(
            validate_search("fire2", SearchKind::Type),
            Err(SearchRejection::TypeInvalidCharacters)
        );
    }

    #[test]
    fn normalizes_terms_per_kind() {
        assert_eq!(normalize_search_term("  PikaChu ", SearchKind::Name), "pikachu");
        assert_eq!(normalize_search_term(" Water ", SearchKind::Type), "water");
        assert_eq!(normalize_search_term(" #007 ", SearchKind::Number), "007");
        assert_eq!(normalize_search_term("007", SearchKind::Number), "007");
    }
}
