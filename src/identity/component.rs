//! The structured identity of a defining component ("assembly").
//!
//! A [`ComponentIdentity`] is the parsed form of a component full name such
//! as `MyLib, Version=1.2.3.4, Culture=neutral, PublicKeyToken=b77a5c561934e089`.
//! It is immutable, cheap to clone, and safe to use as a map key: equality is
//! structural and hashing goes through the process-seeded randomized
//! accumulator.

use std::fmt::{self, Write};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::hash::{HashKind, RandomizedHash};
use crate::identity::culture::NEUTRAL_CULTURE;
use crate::identity::parser::parse_component_identity;
use crate::identity::restrictor::ensure_valid_component_name;
use crate::identity::{ComponentVersion, KeyToken};
use crate::options::ParseOptions;
use crate::Result;

/// A parsed component (defining-assembly) identity.
///
/// Carries the simple name plus the optional version, the normalized culture
/// tag, and the optional public key token. Nothing here is ever resolved
/// against a real component; this is identity only.
///
/// # Examples
///
/// ```rust
/// use dotid::{ComponentIdentity, ParseOptions};
///
/// let id = ComponentIdentity::parse("Hello, Version=1.2.3.4", &ParseOptions::default())?;
/// assert_eq!(id.name(), "Hello");
/// assert_eq!(id.culture(), "neutral");
/// assert_eq!(
///     id.to_string(),
///     "Hello, Version=1.2.3.4, Culture=neutral, PublicKeyToken=null"
/// );
/// # Ok::<(), dotid::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentIdentity {
    name: Arc<str>,
    version: Option<ComponentVersion>,
    culture: &'static str,
    key_token: Option<KeyToken>,
}

impl ComponentIdentity {
    /// Parses a component full name, including quoting/escaping and
    /// `Key=Value` pairs.
    ///
    /// # Errors
    /// Any malformed input surfaces as one [`crate::Error::ComponentParse`]
    /// wrapping the underlying cause together with the original text.
    pub fn parse(input: &str, options: &ParseOptions) -> Result<Self> {
        parse_component_identity(input, options)
    }

    /// Creates an identity from a bare simple name (neutral culture, no
    /// version, no key token).
    ///
    /// # Errors
    /// Fails if the name does not pass component-name validation.
    pub fn from_name(name: &str, options: &ParseOptions) -> Result<Self> {
        ensure_valid_component_name(name, options)?;
        Ok(ComponentIdentity {
            name: Arc::from(name),
            version: None,
            culture: NEUTRAL_CULTURE,
            key_token: None,
        })
    }

    pub(crate) fn from_parts(
        name: Arc<str>,
        version: Option<ComponentVersion>,
        culture: &'static str,
        key_token: Option<KeyToken>,
    ) -> Self {
        ComponentIdentity {
            name,
            version,
            culture,
            key_token,
        }
    }

    /// Returns a copy of this identity with the given version.
    #[must_use]
    pub fn with_version(&self, version: Option<ComponentVersion>) -> Self {
        ComponentIdentity {
            name: Arc::clone(&self.name),
            version,
            culture: self.culture,
            key_token: self.key_token,
        }
    }

    /// Returns a copy of this identity with the given culture value, which is
    /// normalized against the predefined culture set.
    ///
    /// # Errors
    /// Fails for a culture name outside the predefined set.
    pub fn with_culture(&self, culture: &str) -> Result<Self> {
        Ok(ComponentIdentity {
            name: Arc::clone(&self.name),
            version: self.version,
            culture: crate::identity::culture::normalize_culture(culture)?,
            key_token: self.key_token,
        })
    }

    /// Returns a copy of this identity with the given public key token.
    #[must_use]
    pub fn with_key_token(&self, key_token: Option<KeyToken>) -> Self {
        ComponentIdentity {
            name: Arc::clone(&self.name),
            version: self.version,
            culture: self.culture,
            key_token,
        }
    }

    /// The simple name of the component.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The version, if one was specified.
    #[must_use]
    pub fn version(&self) -> Option<&ComponentVersion> {
        self.version.as_ref()
    }

    /// The normalized culture tag (`"neutral"` or a predefined culture name).
    #[must_use]
    pub fn culture(&self) -> &str {
        self.culture
    }

    /// The public key token, if one was specified.
    #[must_use]
    pub fn key_token(&self) -> Option<&KeyToken> {
        self.key_token.as_ref()
    }
}

/// Writes the simple name, quoting and escaping it if it contains characters
/// that are structural in a component full name.
fn write_escaped_name(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    let needs_quotes = name.starts_with(' ') || name.ends_with(' ');
    if needs_quotes {
        f.write_char('"')?;
    }
    for c in name.chars() {
        if c == ',' || c == '=' {
            f.write_char('\\')?;
        }
        f.write_char(c)?;
    }
    if needs_quotes {
        f.write_char('"')?;
    }
    Ok(())
}

impl fmt::Display for ComponentIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_escaped_name(f, &self.name)?;
        if let Some(version) = &self.version {
            write!(f, ", Version={}", version)?;
        }
        write!(f, ", Culture={}", self.culture)?;
        match &self.key_token {
            Some(token) => write!(f, ", PublicKeyToken={}", token),
            None => f.write_str(", PublicKeyToken=null"),
        }
    }
}

impl ComponentIdentity {
    pub(crate) fn randomized_hash(&self) -> u64 {
        let mut hasher = RandomizedHash::with_kind(HashKind::Component);
        hasher.add_str(&self.name);
        match &self.version {
            Some(version) => hasher.add_version(version),
            None => hasher.add_u64(0),
        }
        hasher.add_str(self.culture);
        match &self.key_token {
            Some(token) => hasher.add_bytes(token.as_bytes()),
            None => hasher.add_u64(0),
        }
        hasher.finish()
    }
}

impl Hash for ComponentIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.randomized_hash());
    }
}
