//! Content fingerprints for change detection between builds.

use sha2::{Digest, Sha512};
use std::fmt;
use std::io;
use std::path::Path;
use std::str::FromStr;

/// Number of raw digest bytes in a [`Fingerprint`].
const DIGEST_LEN: usize = 64;

/// A SHA-512 digest of a file's byte contents.
///
/// Two sources with the same `Fingerprint` are assumed to have identical
/// content. The canonical text form is exactly [`Fingerprint::HEX_LEN`]
/// lowercase hex digits; anything else is rejected when parsing.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; DIGEST_LEN]);

impl Fingerprint {
    /// Length of the hex representation.
    pub const HEX_LEN: usize = DIGEST_LEN * 2;

    /// Computes the fingerprint of a byte slice.
    pub fn from_bytes(data: &[u8]) -> Self {
        let digest = Sha512::digest(data);
        let mut bytes = [0u8; DIGEST_LEN];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    /// Computes the fingerprint of a file by streaming its contents.
    pub fn of_file(path: &Path) -> io::Result<Self> {
        let mut file = std::fs::File::open(path)?;
        let mut hasher = Sha512::new();
        io::copy(&mut file, &mut hasher)?;
        let mut bytes = [0u8; DIGEST_LEN];
        bytes.copy_from_slice(&hasher.finalize());
        Ok(Self(bytes))
    }

    /// Returns the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Error returned when a hex string is not a valid [`Fingerprint`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseFingerprintError {
    /// The digest has the wrong number of hex digits.
    #[error("digest has {found} hex digits, expected {expected}")]
    Length {
        /// Required digit count.
        expected: usize,
        /// Digit count actually found.
        found: usize,
    },
    /// The digest contains a character that is not a hex digit.
    #[error("invalid hex digit {0:?} in digest")]
    InvalidDigit(char),
}

impl FromStr for Fingerprint {
    type Err = ParseFingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != Self::HEX_LEN {
            return Err(ParseFingerprintError::Length {
                expected: Self::HEX_LEN,
                found: s.chars().count(),
            });
        }
        let mut bytes = [0u8; DIGEST_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|e| match e {
            hex::FromHexError::InvalidHexCharacter { c, .. } => {
                ParseFingerprintError::InvalidDigit(c)
            }
            _ => ParseFingerprintError::Length {
                expected: Self::HEX_LEN,
                found: s.len(),
            },
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}
