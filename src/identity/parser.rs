//! Parser for component full names.
//!
//! A component full name is a possibly-quoted simple name followed by
//! `, Key=Value` pairs, e.g.
//! `"My\,Lib", Version=1.2.3.4, Culture=en-US, PublicKeyToken=b77a5c561934e089`.
//! The name section supports one layer of `'`/`"` quoting and backslash
//! escaping of `,` and `=` (the only two escape sequences). The recognized
//! keys are exactly `Version`, `Culture` and `PublicKeyToken`, case-sensitive;
//! anything else, and any duplicated key, fails the whole parse.
//!
//! Only the space character is ever trimmed. Tabs, newlines and other
//! whitespace are never silently dropped, so an embedded control character
//! fails validation instead of disappearing.

use std::sync::Arc;

use crate::identity::component::ComponentIdentity;
use crate::identity::culture::{normalize_culture, NEUTRAL_CULTURE};
use crate::identity::keytoken::KeyToken;
use crate::identity::restrictor::ensure_valid_component_name;
use crate::identity::version::ComponentVersion;
use crate::options::ParseOptions;
use crate::Result;

/// Parses a component full name into a [`ComponentIdentity`].
///
/// # Errors
/// Every failure is wrapped into one [`crate::Error::ComponentParse`]
/// carrying the original input text.
pub(crate) fn parse_component_identity(
    input: &str,
    options: &ParseOptions,
) -> Result<ComponentIdentity> {
    parse_inner(input, options).map_err(|source| crate::Error::ComponentParse {
        input: input.to_string(),
        source: Box::new(source),
    })
}

fn parse_inner(input: &str, options: &ParseOptions) -> Result<ComponentIdentity> {
    let (raw_name, trailing) = split_name(input)?;
    let name = strip_surrounding_quotes(trim_spaces(&raw_name));
    ensure_valid_component_name(name, options)?;

    let mut version: Option<ComponentVersion> = None;
    let mut culture: Option<&'static str> = None;
    let mut key_token: Option<Option<KeyToken>> = None;

    let mut rest = trim_spaces(trailing);
    if rest.len() >= 2 && rest.starts_with(',') {
        rest = &rest[1..];
    }

    while !rest.is_empty() {
        let (token, remainder) = split_forbid_empty_trailer(rest, ',');
        rest = remainder;

        let (key, value) = match token.find('=') {
            Some(idx) => (trim_spaces(&token[..idx]), trim_spaces(&token[idx + 1..])),
            None => (trim_spaces(token), ""),
        };

        match key {
            "Version" => {
                if version.is_some() {
                    return Err(malformed_error!("Duplicate 'Version' token"));
                }
                version = Some(ComponentVersion::parse(value)?);
            }
            "Culture" => {
                if culture.is_some() {
                    return Err(malformed_error!("Duplicate 'Culture' token"));
                }
                culture = Some(normalize_culture(value)?);
            }
            "PublicKeyToken" => {
                if key_token.is_some() {
                    return Err(malformed_error!("Duplicate 'PublicKeyToken' token"));
                }
                // The null literal is exact; "NULL" is not a 16-hex token
                // either, so it fails below.
                key_token = Some(if value == "null" {
                    None
                } else {
                    Some(KeyToken::parse(value)?)
                });
            }
            other => {
                return Err(malformed_error!(
                    "Unrecognized token '{}' in component full name",
                    other
                ));
            }
        }
    }

    Ok(ComponentIdentity::from_parts(
        Arc::from(name),
        version,
        culture.unwrap_or(NEUTRAL_CULTURE),
        key_token.flatten(),
    ))
}

/// Splits the input into the (unescaped) raw name and the trailing data.
///
/// The name region ends at the first unquoted, unescaped comma. A leading
/// quote swallows everything up to the matching close quote; a backslash
/// starts escape processing that runs until an unescaped comma or the end of
/// input.
fn split_name(input: &str) -> Result<(String, &str)> {
    let Some(idx) = input.find(['\\', ',', '\'', '"']) else {
        return Ok((input.to_string(), ""));
    };

    match input.as_bytes()[idx] {
        b',' => Ok((input[..idx].to_string(), &input[idx..])),
        quote @ (b'\'' | b'"') => {
            // Keep the open quote in the buffer; the quote layer is stripped
            // after space trimming so interior spaces survive.
            let mut name = String::from(&input[..=idx]);
            let rest = unescape_into(&mut name, input, idx + 1, quote as char, true, false)?;
            Ok((name, &input[rest..]))
        }
        _ => {
            let mut name = String::from(&input[..idx]);
            let rest = unescape_into(&mut name, input, idx, ',', false, true)?;
            Ok((name, &input[rest..]))
        }
    }
}

/// Copies characters from `input[start..]` into `buf`, resolving `\,` and
/// `\=` escapes, until `terminator` is seen. Returns the byte offset where
/// the remainder begins.
fn unescape_into(
    buf: &mut String,
    input: &str,
    start: usize,
    terminator: char,
    consume_terminator: bool,
    end_of_input_terminates: bool,
) -> Result<usize> {
    let mut chars = input[start..].char_indices();
    while let Some((offset, c)) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some((_, escaped @ (',' | '='))) => buf.push(escaped),
                _ => return Err(malformed_error!("Invalid escape sequence in name")),
            }
        } else if c == terminator {
            if consume_terminator {
                buf.push(c);
                return Ok(start + offset + c.len_utf8());
            }
            return Ok(start + offset);
        } else {
            buf.push(c);
        }
    }

    if end_of_input_terminates {
        Ok(input.len())
    } else {
        Err(malformed_error!("Unterminated quote in name"))
    }
}

/// Trims only the space character, never other whitespace.
fn trim_spaces(value: &str) -> &str {
    value.trim_matches(' ')
}

/// Removes one layer of matching surrounding quotes, if present.
fn strip_surrounding_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Splits at `separator`, treating a separator in final position as part of
/// the left half so a dangling trailer fails downstream validation instead of
/// vanishing.
fn split_forbid_empty_trailer(input: &str, separator: char) -> (&str, &str) {
    match input.find(separator) {
        Some(idx) if idx + separator.len_utf8() < input.len() => {
            (&input[..idx], &input[idx + separator.len_utf8()..])
        }
        _ => (input, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<ComponentIdentity> {
        parse_component_identity(input, &ParseOptions::default())
    }

    #[test]
    fn test_bare_name() {
        let id = parse("Hello").unwrap();
        assert_eq!(id.name(), "Hello");
        assert_eq!(id.version(), None);
        assert_eq!(id.culture(), "neutral");
        assert_eq!(id.key_token(), None);
    }

    #[test]
    fn test_name_spaces_trimmed() {
        assert_eq!(parse("  Hello  ").unwrap().name(), "Hello");
    }

    #[test]
    fn test_quoting_preserves_interior_spaces_and_structure() {
        assert_eq!(parse("'Hello'").unwrap().name(), "Hello");
        assert_eq!(parse("\" Hello \"").unwrap().name(), " Hello ");
        assert_eq!(parse("\"Hello, there\"").unwrap().name(), "Hello, there");
        assert_eq!(parse("\"Hello\\=,there\" ").unwrap().name(), "Hello=,there");
    }

    #[test]
    fn test_escapes_without_quotes() {
        assert_eq!(parse("Hel\\,lo").unwrap().name(), "Hel,lo");
        assert_eq!(parse("Hel\\=lo, Version=1.0").unwrap().name(), "Hel=lo");
    }

    #[test]
    fn test_all_tokens() {
        let id = parse("Hello, Version=1.2.3.4, Culture=en-US, PublicKeyToken=B77A5C561934E089")
            .unwrap();
        assert_eq!(id.name(), "Hello");
        assert_eq!(id.version().unwrap().to_string(), "1.2.3.4");
        assert_eq!(id.culture(), "en-US");
        assert_eq!(id.key_token().unwrap(), &KeyToken::ECMA);
    }

    #[test]
    fn test_token_spaces_trimmed_and_culture_canonicalized() {
        let id = parse("Hello , Culture = EN-gb , PublicKeyToken = null").unwrap();
        assert_eq!(id.culture(), "en-GB");
        assert_eq!(id.key_token(), None);
    }

    #[test]
    fn test_malformed_inputs() {
        for bad in [
            "",
            "Hello,",
            "Hello, ",
            "Hello, Version=1.2\0.3.4",
            "Hello, Version=1.2.3.4,",
            "Hello, Version=1.0, Version=1.0",
            "Hello, version=1.2.3,4",
            "Hello, Culture=en-US_XYZ",
            "Hello, PublicKeyToken=12345",
            "Hello, PublicKeyToken=NULL",
            "Hello, PublicKeyToken=Null",
            "Hello, SomeKey=SomeValue",
            "Hello, Version",
            "'Hello",
            "Hello\\x",
            "\"Hello\"x",
        ] {
            let result = parse(bad);
            assert!(
                matches!(result, Err(crate::Error::ComponentParse { .. })),
                "{bad:?} => {result:?}"
            );
        }
    }

    #[test]
    fn test_tab_is_not_trimmed() {
        assert!(parse("Hello, Version=\t1.0").is_err());
        assert!(parse("\tHello").is_err());
    }

    #[test]
    fn test_split_forbid_empty_trailer() {
        assert_eq!(split_forbid_empty_trailer("a,b", ','), ("a", "b"));
        assert_eq!(split_forbid_empty_trailer("a,", ','), ("a,", ""));
        assert_eq!(split_forbid_empty_trailer("ab", ','), ("ab", ""));
    }
}
