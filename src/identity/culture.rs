//! Bounded predefined-culture validation and normalization.
//!
//! A component identity carries a culture tag, but the set of acceptable tags
//! is deliberately finite: an attacker-supplied culture string either matches
//! one of the predefined names below (ASCII case-insensitively) or the parse
//! fails. This bounds any cache a host culture subsystem might maintain when
//! it later materializes culture objects from these tags. Matching folds only
//! `A`-`Z` to lowercase, so no locale-aware comparison is ever involved.
//!
//! Matches normalize to the table's canonical casing (`EN-us` becomes
//! `en-US`); the absent/invariant culture is represented by the literal
//! [`NEUTRAL_CULTURE`].

use std::cmp::Ordering;

use crate::Result;

/// Canonical spelling of the neutral (invariant) culture.
pub const NEUTRAL_CULTURE: &str = "neutral";

/// Predefined culture names, in their canonical casing.
///
/// Sorted by their ASCII-lowercased form so [`normalize_culture`] can binary
/// search with folded comparisons.
static PREDEFINED_CULTURES: &[&str] = &[
    "af", "af-ZA", "ar", "ar-AE", "ar-BH", "ar-DZ", "ar-EG", "ar-IQ", "ar-JO",
    "ar-KW", "ar-LB", "ar-LY", "ar-MA", "ar-OM", "ar-QA", "ar-SA", "ar-SY",
    "ar-TN", "ar-YE", "az", "az-Cyrl-AZ", "az-Latn-AZ", "be", "be-BY", "bg",
    "bg-BG", "ca", "ca-ES", "cs", "cs-CZ", "da", "da-DK", "de", "de-AT",
    "de-CH", "de-DE", "de-LI", "de-LU", "el", "el-GR", "en", "en-AU", "en-BZ",
    "en-CA", "en-GB", "en-IE", "en-IN", "en-JM", "en-NZ", "en-PH", "en-TT",
    "en-US", "en-ZA", "en-ZW", "es", "es-AR", "es-BO", "es-CL", "es-CO",
    "es-CR", "es-DO", "es-EC", "es-ES", "es-GT", "es-HN", "es-MX", "es-NI",
    "es-PA", "es-PE", "es-PR", "es-PY", "es-SV", "es-US", "es-UY", "es-VE",
    "et", "et-EE", "eu", "eu-ES", "fa", "fa-IR", "fi", "fi-FI", "fr", "fr-BE",
    "fr-CA", "fr-CH", "fr-FR", "fr-LU", "fr-MC", "gl", "gl-ES", "gu", "gu-IN",
    "he", "he-IL", "hi", "hi-IN", "hr", "hr-HR", "hu", "hu-HU", "hy", "hy-AM",
    "id", "id-ID", "is", "is-IS", "it", "it-CH", "it-IT", "ja", "ja-JP", "ka",
    "ka-GE", "kk", "kk-KZ", "kn", "kn-IN", "ko", "ko-KR", "lt", "lt-LT", "lv",
    "lv-LV", "mk", "mk-MK", "mr", "mr-IN", "ms", "ms-BN", "ms-MY", "nb-NO",
    "nl", "nl-BE", "nl-NL", "nn-NO", "no", "pa", "pa-IN", "pl", "pl-PL", "pt",
    "pt-BR", "pt-PT", "ro", "ro-RO", "ru", "ru-RU", "sk", "sk-SK", "sl",
    "sl-SI", "sq", "sq-AL", "sr", "sr-Cyrl-RS", "sr-Latn-RS", "sv", "sv-FI",
    "sv-SE", "sw", "sw-KE", "ta", "ta-IN", "te", "te-IN", "th", "th-TH", "tr",
    "tr-TR", "uk", "uk-UA", "ur", "ur-PK", "uz", "uz-Cyrl-UZ", "uz-Latn-UZ",
    "vi", "vi-VN", "zh-CN", "zh-Hans", "zh-Hant", "zh-HK", "zh-MO", "zh-SG",
    "zh-TW",
];

/// Folds only `A`-`Z`; every other byte compares as-is.
fn ascii_fold(b: u8) -> u8 {
    if b.is_ascii_uppercase() {
        b + 0x20
    } else {
        b
    }
}

fn cmp_folded(a: &str, b: &str) -> Ordering {
    let mut lhs = a.bytes().map(ascii_fold);
    let mut rhs = b.bytes().map(ascii_fold);
    loop {
        match (lhs.next(), rhs.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => match l.cmp(&r) {
                Ordering::Equal => {}
                other => return other,
            },
        }
    }
}

/// Compares two culture tags ASCII case-insensitively.
pub(crate) fn eq_folded(a: &str, b: &str) -> bool {
    cmp_folded(a, b) == Ordering::Equal
}

/// Resolves a culture value to its canonical predefined spelling.
///
/// Empty input and the literals `null` / `neutral` (any ASCII casing) resolve
/// to [`NEUTRAL_CULTURE`]; anything else must match the predefined table.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] for a culture name outside the
/// predefined set.
pub(crate) fn normalize_culture(value: &str) -> Result<&'static str> {
    if value.is_empty() || eq_folded(value, "null") || eq_folded(value, NEUTRAL_CULTURE) {
        return Ok(NEUTRAL_CULTURE);
    }

    match PREDEFINED_CULTURES.binary_search_by(|probe| cmp_folded(probe, value)) {
        Ok(index) => Ok(PREDEFINED_CULTURES[index]),
        Err(_) => Err(malformed_error!("Unrecognized culture name '{}'", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sorted_by_folded_key() {
        for window in PREDEFINED_CULTURES.windows(2) {
            assert_eq!(
                cmp_folded(window[0], window[1]),
                Ordering::Less,
                "{} vs {}",
                window[0],
                window[1]
            );
        }
    }

    #[test]
    fn test_neutral_aliases() {
        for value in ["", "null", "NULL", "neutral", "NeUtRaL"] {
            assert_eq!(normalize_culture(value).unwrap(), NEUTRAL_CULTURE);
        }
    }

    #[test]
    fn test_canonical_casing_restored() {
        assert_eq!(normalize_culture("en-US").unwrap(), "en-US");
        assert_eq!(normalize_culture("EN-us").unwrap(), "en-US");
        assert_eq!(normalize_culture("EN-gb").unwrap(), "en-GB");
        assert_eq!(normalize_culture("ZH-hans").unwrap(), "zh-Hans");
        assert_eq!(normalize_culture("de").unwrap(), "de");
    }

    #[test]
    fn test_unknown_cultures_rejected() {
        for value in ["en-US_XYZ", "xx", "en-", "en US", "en\0US", "el-GR2"] {
            assert!(normalize_culture(value).is_err(), "{value:?}");
        }
    }

    #[test]
    fn test_eq_folded_is_ascii_only() {
        assert!(eq_folded("en-US", "EN-us"));
        assert!(!eq_folded("stra\u{00DF}e", "STRA\u{1E9E}E"));
    }
}
