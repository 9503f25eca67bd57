//! Configuration for parsing type-name and component-identity strings.
//!
//! [`ParseOptions`] controls the two knobs the parsers expose: whether
//! non-ASCII code points are acceptable inside identifiers, and how deeply a
//! type string may nest before the parse is aborted. The defaults are the
//! safe choice for untrusted input and should only be loosened deliberately.

/// Options which control the behavior of the type-name and component-identity parsers.
///
/// # Examples
///
/// ```rust
/// use dotid::{ParseOptions, TypeIdentity};
///
/// let options = ParseOptions {
///     max_recursive_depth: 4,
///     ..ParseOptions::default()
/// };
/// let parsed = TypeIdentity::parse_assembly_qualified_name("System.Int32[]", &options)?;
/// assert_eq!(parsed.name(), "System.Int32[]");
/// # Ok::<(), dotid::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Allows identifiers to contain code points above U+007F.
    ///
    /// Even when enabled, non-ASCII code points are still subject to a Unicode
    /// general-category filter: control, separator, format, surrogate, private-use
    /// and unassigned code points are always rejected. Defaults to `false`.
    pub allow_non_ascii_identifiers: bool,

    /// Maximum recursion depth allowed while parsing a single type string.
    ///
    /// One shared counter bounds nested generic arguments and decorator
    /// application across the whole parse; exceeding it aborts with
    /// [`crate::Error::RecursionLimit`]. Must be greater than zero.
    /// Defaults to `10`.
    pub max_recursive_depth: usize,
}

/// Default maximum recursion depth for type-string parsing.
pub const DEFAULT_MAX_RECURSIVE_DEPTH: usize = 10;

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            allow_non_ascii_identifiers: false,
            max_recursive_depth: DEFAULT_MAX_RECURSIVE_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ParseOptions::default();
        assert!(!options.allow_non_ascii_identifiers);
        assert_eq!(options.max_recursive_depth, 10);
    }
}
