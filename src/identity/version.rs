//! Strict component-version parsing and formatting.
//!
//! A component version is `major.minor[.build[.revision]]` with two to four
//! dot-separated decimal parts. Parsing here is deliberately stricter than a
//! general-purpose numeric parser: only ASCII digits and dots are accepted,
//! so embedded NUL bytes, signs, or whitespace that a lenient integer parser
//! might tolerate fail the parse. The number of parts supplied is preserved,
//! so `1.2.3` and `1.2.3.0` are distinct values and each renders back exactly
//! as written.

use std::fmt;

use crate::Result;

/// Version information for a component identity.
///
/// `major` and `minor` are always present; `build` and `revision` are
/// optional, and `revision` can only be present when `build` is.
///
/// # Examples
///
/// ```rust
/// use dotid::ComponentVersion;
///
/// let version = ComponentVersion::parse("1.2.3.4")?;
/// assert_eq!(version.major(), 1);
/// assert_eq!(version.revision(), Some(4));
/// assert_eq!(version.to_string(), "1.2.3.4");
///
/// let short = ComponentVersion::parse("1.2")?;
/// assert_eq!(short.build(), None);
/// assert_ne!(short, ComponentVersion::parse("1.2.0")?);
/// # Ok::<(), dotid::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentVersion {
    major: u16,
    minor: u16,
    build: Option<u16>,
    revision: Option<u16>,
}

impl ComponentVersion {
    /// Creates a two-part version.
    #[must_use]
    pub fn new(major: u16, minor: u16) -> Self {
        ComponentVersion {
            major,
            minor,
            build: None,
            revision: None,
        }
    }

    /// Creates a four-part version.
    #[must_use]
    pub fn new_full(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        ComponentVersion {
            major,
            minor,
            build: Some(build),
            revision: Some(revision),
        }
    }

    /// Parses a version from its dotted-decimal text form.
    ///
    /// # Errors
    /// Fails for anything other than two to four dot-separated runs of ASCII
    /// digits, or when a part overflows 16 bits.
    pub fn parse(value: &str) -> Result<Self> {
        // Reject everything a lenient integer parser might wave through.
        if !value.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
            return Err(malformed_error!("Invalid version format: '{}'", value));
        }

        let mut parts = [None::<u16>; 4];
        let mut count = 0;
        for part in value.split('.') {
            if count == 4 {
                return Err(malformed_error!(
                    "Version has too many components: '{}'",
                    value
                ));
            }
            if part.is_empty() {
                return Err(malformed_error!("Invalid version format: '{}'", value));
            }
            let number = part
                .parse::<u16>()
                .map_err(|_| malformed_error!("Version component out of range: '{}'", value))?;
            parts[count] = Some(number);
            count += 1;
        }

        match (parts[0], parts[1]) {
            (Some(major), Some(minor)) => Ok(ComponentVersion {
                major,
                minor,
                build: parts[2],
                revision: parts[3],
            }),
            _ => Err(malformed_error!(
                "Version requires at least major and minor components: '{}'",
                value
            )),
        }
    }

    /// The major version number.
    #[must_use]
    pub fn major(&self) -> u16 {
        self.major
    }

    /// The minor version number.
    #[must_use]
    pub fn minor(&self) -> u16 {
        self.minor
    }

    /// The build number, if one was supplied.
    #[must_use]
    pub fn build(&self) -> Option<u16> {
        self.build
    }

    /// The revision number, if one was supplied.
    #[must_use]
    pub fn revision(&self) -> Option<u16> {
        self.revision
    }
}

impl fmt::Display for ComponentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(build) = self.build {
            write!(f, ".{}", build)?;
            if let Some(revision) = self.revision {
                write!(f, ".{}", revision)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_two_to_four_parts() {
        assert_eq!(
            ComponentVersion::parse("1.2").unwrap(),
            ComponentVersion::new(1, 2)
        );
        let three = ComponentVersion::parse("1.2.3").unwrap();
        assert_eq!(three.build(), Some(3));
        assert_eq!(three.revision(), None);
        assert_eq!(
            ComponentVersion::parse("1.2.3.4").unwrap(),
            ComponentVersion::new_full(1, 2, 3, 4)
        );
    }

    #[test]
    fn test_part_count_preserved_in_display_and_equality() {
        assert_eq!(ComponentVersion::parse("1.2.3").unwrap().to_string(), "1.2.3");
        assert_eq!(ComponentVersion::parse("1.2").unwrap().to_string(), "1.2");
        assert_ne!(
            ComponentVersion::parse("1.2.3").unwrap(),
            ComponentVersion::parse("1.2.3.0").unwrap()
        );
    }

    #[test]
    fn test_leading_zeros_accepted() {
        assert_eq!(
            ComponentVersion::parse("01.002").unwrap(),
            ComponentVersion::new(1, 2)
        );
    }

    #[test]
    fn test_strictness() {
        for bad in [
            "", "1", "1.", ".1", "1..2", "1.2.3.4.5", "1.2\0.3", "1.2 .3", " 1.2", "1.+2",
            "1.-2", "1.2,", "a.b", "1.2.3.4,",
        ] {
            assert!(ComponentVersion::parse(bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn test_overflow_rejected() {
        assert!(ComponentVersion::parse("65535.0").is_ok());
        assert!(ComponentVersion::parse("65536.0").is_err());
    }

    #[test]
    fn test_ordering() {
        let a = ComponentVersion::parse("1.2").unwrap();
        let b = ComponentVersion::parse("1.2.0").unwrap();
        let c = ComponentVersion::parse("1.10").unwrap();
        assert!(a < b);
        assert!(b < c);
    }
}
