//! Public key tokens: exactly-8-byte signing-key identifiers.
//!
//! A key token is the truncated hash of the public key a component was signed
//! with, always rendered as 16 lowercase hex characters. The byte and text
//! forms are interchangeable and always agree.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::hash::{HashKind, RandomizedHash};
use crate::Result;

/// An 8-byte public key token with a canonical lowercase-hex string form.
///
/// # Examples
///
/// ```rust
/// use dotid::KeyToken;
///
/// let token = KeyToken::parse("B77A5C561934E089")?;
/// assert_eq!(token, KeyToken::ECMA);
/// assert_eq!(token.to_string(), "b77a5c561934e089");
/// # Ok::<(), dotid::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct KeyToken {
    bytes: [u8; 8],
}

impl KeyToken {
    /// Token of the ECMA standard signing key (`b77a5c561934e089`).
    pub const ECMA: KeyToken = KeyToken::from_bytes([0xb7, 0x7a, 0x5c, 0x56, 0x19, 0x34, 0xe0, 0x89]);

    /// Token of the Microsoft signing key (`b03f5f7f11d50a3a`).
    pub const MICROSOFT: KeyToken =
        KeyToken::from_bytes([0xb0, 0x3f, 0x5f, 0x7f, 0x11, 0xd5, 0x0a, 0x3a]);

    /// Token of the ASP.NET Core signing key (`adb9793829ddae60`).
    pub const MICROSOFT_ASPNETCORE: KeyToken =
        KeyToken::from_bytes([0xad, 0xb9, 0x79, 0x38, 0x29, 0xdd, 0xae, 0x60]);

    /// Token of the shared Microsoft signing key (`31bf3856ad364e35`).
    pub const MICROSOFT_SHARED: KeyToken =
        KeyToken::from_bytes([0x31, 0xbf, 0x38, 0x56, 0xad, 0x36, 0x4e, 0x35]);

    /// Token of the Silverlight platform signing key (`7cec85d7bea7798e`).
    pub const SILVERLIGHT_PLATFORM: KeyToken =
        KeyToken::from_bytes([0x7c, 0xec, 0x85, 0xd7, 0xbe, 0xa7, 0x79, 0x8e]);

    /// Creates a token directly from its 8 raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 8]) -> Self {
        KeyToken { bytes }
    }

    /// Parses a token from its 16-hex-character text form (either letter case).
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] unless the input is exactly 16 hex
    /// characters.
    pub fn parse(value: &str) -> Result<Self> {
        if value.len() != 16 {
            return Err(malformed_error!(
                "Public key token must be exactly 16 hex characters, got '{}'",
                value
            ));
        }

        let mut bytes = [0u8; 8];
        hex::decode_to_slice(value, &mut bytes)
            .map_err(|_| malformed_error!("Invalid hex in public key token '{}'", value))?;
        Ok(KeyToken { bytes })
    }

    /// The raw 8 token bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.bytes
    }
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.bytes))
    }
}

impl Hash for KeyToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut hasher = RandomizedHash::with_kind(HashKind::KeyToken);
        hasher.add_bytes(&self.bytes);
        state.write_u64(hasher.finish());
    }
}
