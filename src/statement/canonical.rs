//! Canonical Message Serialization
//!
//! The exact bytes a wallet signs for a post or comment. Verification must
//! rebuild the same bytes, so the layout is fixed:
//!
//! - [`MessageFormat::LengthPrefixed`]: `GARMENT_STATEMENT_V1`, then each field
//!   as a 4-byte big-endian length followed by its bytes.
//! - [`MessageFormat::Delimited`]: `content|context_id|timestamp`. Fields may
//!   not contain `|`.
//!
//! The timestamp is always the decimal integer of milliseconds.

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Domain tag opening every length-prefixed message.
pub const STATEMENT_DOMAIN: &[u8] = b"GARMENT_STATEMENT_V1";

/// Field separator of the delimited format.
pub const FIELD_DELIMITER: char = '|';

/// Byte layout of a canonical message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageFormat {
    /// Domain tag plus length-prefixed fields.
    #[default]
    LengthPrefixed,
    /// Fields joined by `|`.
    Delimited,
}

impl MessageFormat {
    /// Stable name used in configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LengthPrefixed => "length-prefixed",
            Self::Delimited => "delimited",
        }
    }
}

/// Statement fields that cannot be serialized canonically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatementError {
    /// A field contains the delimiter of the delimited format.
    #[error("{field} contains the '{FIELD_DELIMITER}' delimiter")]
    DelimiterInField {
        /// Offending field name.
        field: &'static str,
    },
    /// A field does not fit a 32-bit length prefix.
    #[error("{field} is too long to length-prefix ({len} bytes)")]
    FieldTooLong {
        /// Offending field name.
        field: &'static str,
        /// Field length in bytes.
        len: usize,
    },
}

/// Build the canonical message in the default (length-prefixed) format.
pub fn canonical_message(
    content: &str,
    context_id: &str,
    timestamp_ms: i64,
) -> Result<Vec<u8>, StatementError> {
    canonical_message_with_format(content, context_id, timestamp_ms, MessageFormat::default())
}

/// Build the canonical message in the given format.
pub fn canonical_message_with_format(
    content: &str,
    context_id: &str,
    timestamp_ms: i64,
    format: MessageFormat,
) -> Result<Vec<u8>, StatementError> {
    let timestamp = timestamp_ms.to_string();
    let fields = [
        ("content", content),
        ("context_id", context_id),
        ("timestamp", timestamp.as_str()),
    ];

    match format {
        MessageFormat::LengthPrefixed => {
            let body: usize = fields.iter().map(|(_, value)| 4 + value.len()).sum();
            let mut out = Vec::with_capacity(STATEMENT_DOMAIN.len() + body);
            out.extend_from_slice(STATEMENT_DOMAIN);

            for (field, value) in fields {
                let len = u32::try_from(value.len())
                    .map_err(|_| StatementError::FieldTooLong { field, len: value.len() })?;
                out.extend_from_slice(&len.to_be_bytes());
                out.extend_from_slice(value.as_bytes());
            }
            Ok(out)
        }
        MessageFormat::Delimited => {
            for (field, value) in &fields[..2] {
                if value.contains(FIELD_DELIMITER) {
                    return Err(StatementError::DelimiterInField { field });
                }
            }
            Ok(format!("{content}{FIELD_DELIMITER}{context_id}{FIELD_DELIMITER}{timestamp}").into_bytes())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimited_layout() {
        let msg = canonical_message_with_format("hello", "post-1", 1_700_000_000_000, MessageFormat::Delimited)
            .unwrap();
        assert_eq!(msg, b"hello|post-1|1700000000000");
    }

    #[test]
    fn test_delimited_rejects_delimiter() {
        let result = canonical_message_with_format("a|b", "post-1", 1, MessageFormat::Delimited);
        assert_eq!(result, Err(StatementError::DelimiterInField { field: "content" }));

        let result = canonical_message_with_format("ab", "post|1", 1, MessageFormat::Delimited);
        assert_eq!(result, Err(StatementError::DelimiterInField { field: "context_id" }));
    }

    #[test]
    fn test_length_prefixed_layout() {
        let msg = canonical_message("hi", "p", -5).unwrap();

        let mut expected = STATEMENT_DOMAIN.to_vec();
        expected.extend_from_slice(&[0, 0, 0, 2]);
        expected.extend_from_slice(b"hi");
        expected.extend_from_slice(&[0, 0, 0, 1]);
        expected.extend_from_slice(b"p");
        expected.extend_from_slice(&[0, 0, 0, 2]);
        expected.extend_from_slice(b"-5");

        assert_eq!(msg, expected);
    }

    #[test]
    fn test_length_prefixed_is_injective() {
        // Same concatenation, different field boundaries
        let a = canonical_message("ab", "c", 1).unwrap();
        let b = canonical_message("a", "bc", 1).unwrap();
        assert_ne!(a, b);

        // Delimiter inside content is harmless
        let c = canonical_message("x|y", "z", 1).unwrap();
        let d = canonical_message("x", "y|z", 1).unwrap();
        assert_ne!(c, d);
    }

    #[test]
    fn test_every_field_matters() {
        for format in [MessageFormat::LengthPrefixed, MessageFormat::Delimited] {
            let base = canonical_message_with_format("c", "g", 10, format).unwrap();
            assert_ne!(base, canonical_message_with_format("C", "g", 10, format).unwrap());
            assert_ne!(base, canonical_message_with_format("c", "G", 10, format).unwrap());
            assert_ne!(base, canonical_message_with_format("c", "g", 11, format).unwrap());
        }
    }

    #[test]
    fn test_deterministic() {
        let a = canonical_message("same", "ctx", 42).unwrap();
        let b = canonical_message("same", "ctx", 42).unwrap();
        assert_eq!(a, b);
    }
}
