//! A single `path:digest` manifest line.

use std::fmt;
use std::str::FromStr;

use anvil_common::{Fingerprint, ParseFingerprintError};

/// The last known fingerprint of one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintRecord {
    /// Normalized source path, relative to the project directory.
    pub source: String,
    /// Content fingerprint of the source when it was last compiled.
    pub fingerprint: Fingerprint,
}

impl FingerprintRecord {
    /// Creates a record for `source`.
    pub fn new(source: impl Into<String>, fingerprint: Fingerprint) -> Self {
        Self {
            source: source.into(),
            fingerprint,
        }
    }
}

/// Why a manifest line could not be read as a [`FingerprintRecord`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// The line has no `:` between path and digest.
    #[error("missing ':' separator")]
    MissingSeparator,
    /// The path part is empty.
    #[error("empty source path")]
    EmptyPath,
    /// The digest part is not a valid fingerprint.
    #[error(transparent)]
    Digest(#[from] ParseFingerprintError),
}

impl FromStr for FingerprintRecord {
    type Err = RecordError;

    /// Parses `<path>:<digest>`, splitting on the last `:` so that paths
    /// with drive letters survive.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (source, digest) = line.rsplit_once(':').ok_or(RecordError::MissingSeparator)?;
        if source.is_empty() {
            return Err(RecordError::EmptyPath);
        }
        let fingerprint = digest.trim().parse::<Fingerprint>()?;
        Ok(Self::new(source, fingerprint))
    }
}

impl fmt::Display for FingerprintRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.fingerprint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digest() -> Fingerprint {
        Fingerprint::from_bytes(b"int a;")
    }

    #[test]
    fn parse_display_form() {
        let record = FingerprintRecord::new("src/core/a.c", digest());
        let line = record.to_string();
        assert!(line.starts_with("src/core/a.c:"));
        assert_eq!(line.len(), "src/core/a.c:".len() + Fingerprint::HEX_LEN);
        assert_eq!(line.parse::<FingerprintRecord>().unwrap(), record);
    }

    #[test]
    fn drive_letter_path_survives() {
        let line = format!("C:/proj/src/a.c:{}", digest());
        let record: FingerprintRecord = line.parse().unwrap();
        assert_eq!(record.source, "C:/proj/src/a.c");
    }

    #[test]
    fn missing_separator_rejected() {
        assert_eq!(
            "src/a.c".parse::<FingerprintRecord>().unwrap_err(),
            RecordError::MissingSeparator
        );
    }

    #[test]
    fn empty_path_rejected() {
        let line = format!(":{}", digest());
        assert_eq!(
            line.parse::<FingerprintRecord>().unwrap_err(),
            RecordError::EmptyPath
        );
    }

    #[test]
    fn short_digest_rejected() {
        let err = "src/a.c:deadbeef".parse::<FingerprintRecord>().unwrap_err();
        assert!(matches!(
            err,
            RecordError::Digest(ParseFingerprintError::Length { found: 8, .. })
        ));
    }

    #[test]
    fn trailing_carriage_return_tolerated() {
        let line = format!("src/a.c:{}\r", digest());
        assert_eq!(line.parse::<FingerprintRecord>().unwrap().fingerprint, digest());
    }
}
