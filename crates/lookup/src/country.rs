//! Country-hint handling for the provider chain.

/// Fallback country code when the hint is absent or unrecognized.
pub const DEFAULT_COUNTRY_CODE: &str = "us";

/// Whether the country hint names the primary market, i.e. whether the
/// country-specific primary provider applies.
pub fn is_primary_market(country_hint: Option<&str>) -> bool {
    country_hint.is_some_and(|h| h.trim().eq_ignore_ascii_case("india"))
}

/// Map a free-form country hint to the ISO code the global provider expects.
///
/// The form captures country as free text, so cover the common spellings and
/// pass two-letter codes through; anything else falls back to the default.
pub fn iso_code(country_hint: Option<&str>) -> String {
    let Some(hint) = country_hint else {
        return DEFAULT_COUNTRY_CODE.to_string();
    };

    let hint = hint.trim();
    match hint.to_ascii_lowercase().as_str() {
        "india" => "in".to_string(),
        "united states" | "united states of america" | "usa" => "us".to_string(),
        "united kingdom" | "great britain" | "uk" => "gb".to_string(),
        "germany" => "de".to_string(),
        "france" => "fr".to_string(),
        "canada" => "ca".to_string(),
        "australia" => "au".to_string(),
        code if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) => {
            code.to_string()
        }
        _ => DEFAULT_COUNTRY_CODE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_market_match_is_case_insensitive() {
        assert!(is_primary_market(Some("India")));
        assert!(is_primary_market(Some("  INDIA ")));
        assert!(!is_primary_market(Some("Indonesia")));
        assert!(!is_primary_market(None));
    }

    #[test]
    fn known_country_names_map_to_iso_codes() {
        assert_eq!(iso_code(Some("India")), "in");
        assert_eq!(iso_code(Some("United Kingdom")), "gb");
        assert_eq!(iso_code(Some("DE")), "de");
    }

    #[test]
    fn missing_or_unknown_hint_falls_back_to_default() {
        assert_eq!(iso_code(None), "us");
        assert_eq!(iso_code(Some("Atlantis")), "us");
    }
}
