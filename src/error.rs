use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every failure reported while validating identifiers, parsing component identities or
/// type-name strings, or operating on a parsed tree falls into one of the variants below.
/// Parsing is fail-fast: the first bad token aborts the whole operation and no partial
/// result is ever produced.
///
/// # Error Categories
///
/// ## Input Validation Errors
/// - [`Error::Malformed`] - Input text that violates the grammar
/// - [`Error::Empty`] - An identifier that must not be empty was empty
/// - [`Error::DisallowedIdentifier`] - An identifier contained a forbidden code point
/// - [`Error::ComponentParse`] - A component-identity string could not be parsed
///
/// ## Resource Bounding Errors
/// - [`Error::RecursionLimit`] - Maximum recursion depth exceeded
///
/// ## Usage Errors
/// - [`Error::ArityMismatch`] - Generic argument count does not match the declared arity
/// - [`Error::ShapeMisuse`] - An operation was applied to a node of the wrong shape
/// - [`Error::BindingDisallowed`] - A type-binding callback rejected the identity
///
/// # Examples
///
/// ```rust
/// use dotid::{Error, ParseOptions, TypeIdentity};
///
/// match TypeIdentity::parse_assembly_qualified_name("List[[", &ParseOptions::default()) {
///     Ok(id) => println!("parsed {}", id),
///     Err(Error::RecursionLimit(max)) => eprintln!("nested deeper than {}", max),
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("bad type string: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The input text is damaged and could not be parsed.
    ///
    /// This error indicates that a type-name or component-identity string does not
    /// conform to the expected grammar. The error includes the source location where
    /// the malformation was detected for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Provided identifier was empty.
    ///
    /// Type names and component names must contain at least one character.
    #[error("Identifier must not be empty")]
    Empty,

    /// An identifier contained a code point outside the allow tables.
    ///
    /// Carries the offending code point (surrogate pairs are reconstructed before
    /// reporting, so the value is always a full scalar value).
    #[error("Identifier contains disallowed code point U+{0:04X}")]
    DisallowedIdentifier(u32),

    /// Recursion limit reached.
    ///
    /// To prevent stack overflow and unbounded work on adversarial input, a maximum
    /// recursion depth is enforced across one whole parse. This error indicates that
    /// limit was exceeded.
    ///
    /// The associated value shows the recursion limit that was reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// Generic argument count does not match the arity declared by the type name.
    #[error("Generic type expects {expected} argument(s) but {actual} were supplied")]
    ArityMismatch {
        /// Arity declared by the backtick suffix of the type name
        expected: usize,
        /// Number of generic arguments actually supplied
        actual: usize,
    },

    /// An operation was applied to a tree node of the wrong shape.
    ///
    /// Asking for the rank of a non-array node, or invoking a shape-specific visitor
    /// method on a mismatched node, is a programming error rather than an input error.
    #[error("Operation not valid for this type shape: {0}")]
    ShapeMisuse(String),

    /// A component-identity string could not be parsed.
    ///
    /// Wraps the underlying cause together with the original text, so a caller sees
    /// one error for the whole `Name, Key=Value, ...` parse.
    #[error("Cannot parse component identity '{input}': {source}")]
    ComponentParse {
        /// The original text handed to the component-identity parser
        input: String,
        /// The underlying failure
        #[source]
        source: Box<Error>,
    },

    /// A type-binding callback rejected the identity.
    ///
    /// Deliberately opaque: whatever the callback did (returned nothing or failed) is
    /// never leaked back to the untrusted caller.
    #[error("The requested type is disallowed")]
    BindingDisallowed,
}
