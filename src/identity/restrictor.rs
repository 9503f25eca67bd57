//! Character-level validation of extracted name components.
//!
//! Both parsers hand every name they extract (a type name, a component name)
//! through this module before accepting it. Validation is table-driven for
//! ASCII: two fixed 128-entry allow tables, one for component names and one
//! for type names. The type-name table is the stricter of the two because
//! comma and semicolon are structural inside the type grammar, while a
//! component name only reaches this module after structural delimiters have
//! already been stripped.
//!
//! Code points at or above U+0080 are only acceptable when
//! [`ParseOptions::allow_non_ascii_identifiers`] is set, and even then only
//! when their Unicode general category is a letter, mark, number or ordinary
//! punctuation/symbol category. Control, separator, format, surrogate,
//! private-use and unassigned code points are rejected unconditionally, which
//! closes the usual confusable and resource-exhaustion loopholes (zero-width
//! joiners, line separators, private-use glyphs, ...).

use unicode_general_category::{get_general_category, GeneralCategory};

use crate::{options::ParseOptions, Result};

/// Builds a 128-entry allow table covering `lowest..=0x7E` minus the banned set.
const fn allow_table(lowest: u8, banned: &[u8]) -> [bool; 128] {
    let mut table = [false; 128];
    let mut i = lowest as usize;
    while i <= 0x7E {
        table[i] = true;
        i += 1;
    }
    let mut j = 0;
    while j < banned.len() {
        table[banned[j] as usize] = false;
        j += 1;
    }
    table
}

/// Characters legal inside a component (defining-assembly) name.
///
/// Printable ASCII including space, minus quoting and path-like metacharacters.
/// Comma and semicolon are permitted here; the component-identity parser strips
/// its own structural commas before validation.
const COMPONENT_NAME_ALLOWED: [bool; 128] = allow_table(0x20, b"\"'*/:?[\\]");

/// Characters legal inside a type name.
///
/// Stricter than the component table: space, comma, semicolon and ampersand
/// are structural in the type grammar and therefore banned at this level.
const TYPE_NAME_ALLOWED: [bool; 128] = allow_table(0x21, b"\"&'*,/:;?[\\]");

/// Returns whether a non-ASCII scalar value is acceptable inside an identifier.
///
/// The acceptable general categories are letters, marks, numbers and the
/// ordinary punctuation/symbol categories. Everything else (Cc, Cf, Cs, Co,
/// Cn, Zs, Zl, Zp) is rejected.
fn is_permitted_non_ascii(c: char) -> bool {
    if c.is_control() || c.is_whitespace() {
        return false;
    }

    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
            | GeneralCategory::NonspacingMark
            | GeneralCategory::SpacingMark
            | GeneralCategory::EnclosingMark
            | GeneralCategory::DecimalNumber
            | GeneralCategory::LetterNumber
            | GeneralCategory::OtherNumber
            | GeneralCategory::ConnectorPunctuation
            | GeneralCategory::DashPunctuation
            | GeneralCategory::OpenPunctuation
            | GeneralCategory::ClosePunctuation
            | GeneralCategory::InitialPunctuation
            | GeneralCategory::FinalPunctuation
            | GeneralCategory::OtherPunctuation
            | GeneralCategory::MathSymbol
            | GeneralCategory::CurrencySymbol
            | GeneralCategory::ModifierSymbol
            | GeneralCategory::OtherSymbol
    )
}

fn ensure_valid(name: &str, table: &[bool; 128], options: &ParseOptions) -> Result<()> {
    if name.is_empty() {
        return Err(crate::Error::Empty);
    }

    for c in name.chars() {
        let code_point = c as u32;
        let allowed = if code_point < 0x80 {
            table[code_point as usize]
        } else {
            options.allow_non_ascii_identifiers && is_permitted_non_ascii(c)
        };

        if !allowed {
            return Err(crate::Error::DisallowedIdentifier(code_point));
        }
    }

    Ok(())
}

/// Validates a component (defining-assembly) name, with structural delimiters
/// already stripped by the caller.
///
/// # Errors
/// Returns [`crate::Error::Empty`] for an empty name, or
/// [`crate::Error::DisallowedIdentifier`] carrying the first offending code point.
pub(crate) fn ensure_valid_component_name(name: &str, options: &ParseOptions) -> Result<()> {
    ensure_valid(name, &COMPONENT_NAME_ALLOWED, options)
}

/// Validates a single extracted type name (never a whole type string).
///
/// # Errors
/// Returns [`crate::Error::Empty`] for an empty name, or
/// [`crate::Error::DisallowedIdentifier`] carrying the first offending code point.
pub(crate) fn ensure_valid_type_name(name: &str, options: &ParseOptions) -> Result<()> {
    ensure_valid(name, &TYPE_NAME_ALLOWED, options)
}
