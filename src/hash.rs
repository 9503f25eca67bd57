//! Randomized structural hashing for parsed identities.
//!
//! Parsed identities are routinely used as map and set keys over
//! attacker-influenced data, so their hash codes must not be predictable.
//! Every accumulator starts from a seed generated once per process at
//! startup, further diversified by the logical [`HashKind`] of the value
//! being hashed. Distinct random headers are mixed in before string data,
//! raw byte data and version data, so two different kinds of variable-length
//! payload placed adjacently cannot trivially be forced to collide.
//!
//! Hash codes are stable only within one process run. They must never be
//! persisted, serialized, or compared across processes.

use once_cell::sync::Lazy;
use rand::RngCore;

use crate::identity::ComponentVersion;

/// Random material drawn once at process startup.
struct ProcessSeed {
    key: u64,
    string_header: u64,
    bytes_header: u64,
    version_header: u64,
}

static PROCESS_SEED: Lazy<ProcessSeed> = Lazy::new(|| {
    let mut rng = rand::rng();
    ProcessSeed {
        key: rng.next_u64(),
        string_header: rng.next_u64(),
        bytes_header: rng.next_u64(),
        version_header: rng.next_u64(),
    }
});

/// The logical kind of value an accumulator is hashing.
///
/// Each kind derives its own starting state from the process seed, so equal
/// byte content hashed under different kinds lands in unrelated buckets.
#[derive(Debug, Clone, Copy)]
pub(crate) enum HashKind {
    Component,
    KeyToken,
    ElementalType,
    ArrayType,
    PointerType,
    ConstructedGenericType,
}

const MIX_PRIME: u64 = 0x0000_0100_0000_01B3;

/// A structural hash accumulator seeded per process and per [`HashKind`].
pub(crate) struct RandomizedHash {
    state: u64,
}

impl RandomizedHash {
    /// Starts an accumulator for one logical kind of value.
    pub(crate) fn with_kind(kind: HashKind) -> Self {
        let mut hasher = RandomizedHash {
            state: PROCESS_SEED.key,
        };
        hasher.mix(kind as u64 + 1);
        hasher
    }

    fn mix(&mut self, value: u64) {
        self.state = (self.state ^ value).wrapping_mul(MIX_PRIME);
        self.state ^= self.state >> 32;
    }

    /// Mixes a fixed-width value.
    pub(crate) fn add_u64(&mut self, value: u64) {
        self.mix(value);
    }

    /// Mixes raw bytes, preceded by the byte-data header and the length.
    pub(crate) fn add_bytes(&mut self, bytes: &[u8]) {
        self.mix(PROCESS_SEED.bytes_header);
        self.mix(bytes.len() as u64);
        for chunk in bytes.chunks(8) {
            let mut word = [0u8; 8];
            word[..chunk.len()].copy_from_slice(chunk);
            self.mix(u64::from_le_bytes(word));
        }
    }

    /// Mixes text, preceded by the string-data header and the length.
    pub(crate) fn add_str(&mut self, text: &str) {
        self.mix(PROCESS_SEED.string_header);
        self.mix(text.len() as u64);
        for chunk in text.as_bytes().chunks(8) {
            let mut word = [0u8; 8];
            word[..chunk.len()].copy_from_slice(chunk);
            self.mix(u64::from_le_bytes(word));
        }
    }

    /// Mixes a component version, preceded by the version header.
    ///
    /// Absent parts are mixed as a sentinel outside the `u16` range so `1.2`
    /// and `1.2.0` hash differently, matching their inequality.
    pub(crate) fn add_version(&mut self, version: &ComponentVersion) {
        const ABSENT: u64 = u64::MAX;
        self.mix(PROCESS_SEED.version_header);
        self.mix(u64::from(version.major()));
        self.mix(u64::from(version.minor()));
        self.mix(version.build().map_or(ABSENT, u64::from));
        self.mix(version.revision().map_or(ABSENT, u64::from));
    }

    /// Finishes the accumulator, returning the hash code.
    pub(crate) fn finish(&self) -> u64 {
        let mut result = self.state;
        result ^= result >> 29;
        result = result.wrapping_mul(0xBF58_476D_1CE4_E5B9);
        result ^= result >> 32;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash_of(build: impl FnOnce(&mut RandomizedHash)) -> u64 {
        let mut hasher = RandomizedHash::with_kind(HashKind::ElementalType);
        build(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_deterministic_within_process() {
        let a = hash_of(|h| h.add_str("System.Int32"));
        let b = hash_of(|h| h.add_str("System.Int32"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_kind_separates_equal_content() {
        let mut a = RandomizedHash::with_kind(HashKind::Component);
        let mut b = RandomizedHash::with_kind(HashKind::KeyToken);
        a.add_str("payload");
        b.add_str("payload");
        assert_ne!(a.finish(), b.finish());
    }

    #[test]
    fn test_string_and_byte_payloads_do_not_collide() {
        let a = hash_of(|h| h.add_str("abcd"));
        let b = hash_of(|h| h.add_bytes(b"abcd"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_adjacent_fields_are_length_prefixed() {
        let a = hash_of(|h| {
            h.add_str("ab");
            h.add_str("cd");
        });
        let b = hash_of(|h| {
            h.add_str("abc");
            h.add_str("d");
        });
        assert_ne!(a, b);
    }

    #[test]
    fn test_version_part_count_affects_hash() {
        let two = ComponentVersion::parse("1.2").unwrap();
        let three = ComponentVersion::parse("1.2.0").unwrap();
        assert_ne!(
            hash_of(|h| h.add_version(&two)),
            hash_of(|h| h.add_version(&three))
        );
    }
}
