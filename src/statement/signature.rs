//! Ed25519 Statement Verification
//!
//! Checks that a post or comment was signed by the key it claims. Every
//! failure (bad encoding, wrong length, invalid point, forged signature)
//! folds into `false`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ed25519_dalek::{Signature, VerifyingKey, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};
use serde::{Serialize, Deserialize};
use tracing::debug;

use super::canonical::{canonical_message_with_format, MessageFormat, StatementError};

/// Verify a detached Ed25519 signature over `message`.
///
/// Returns false for a signature that is not 64 bytes, a public key that is
/// not 32 bytes or not a valid curve point, or a mismatched signature.
pub fn verify(message: &[u8], signature: &[u8], public_key: &[u8]) -> bool {
    let Ok(pub_key_array): Result<[u8; PUBLIC_KEY_LENGTH], _> = public_key.try_into() else {
        return false;
    };
    let Ok(sig_array): Result<[u8; SIGNATURE_LENGTH], _> = signature.try_into() else {
        return false;
    };

    let Ok(verifying_key) = VerifyingKey::from_bytes(&pub_key_array) else {
        return false;
    };
    let signature = Signature::from_bytes(&sig_array);

    verifying_key.verify_strict(message, &signature).is_ok()
}

/// Verify with a base64 signature and a base58 public key.
pub fn verify_encoded(message: &[u8], signature_b64: &str, public_key_b58: &str) -> bool {
    let (Some(signature), Some(public_key)) =
        (decode_signature(signature_b64), decode_public_key(public_key_b58))
    else {
        debug!("Statement signature or key failed to decode");
        return false;
    };
    verify(message, &signature, &public_key)
}

/// Decode a standard-alphabet base64 signature.
pub fn decode_signature(signature_b64: &str) -> Option<Vec<u8>> {
    STANDARD.decode(signature_b64.trim()).ok()
}

/// Encode signature bytes as standard-alphabet base64.
pub fn encode_signature(signature: &[u8]) -> String {
    STANDARD.encode(signature)
}

/// Decode a base58 public key.
pub fn decode_public_key(public_key_b58: &str) -> Option<Vec<u8>> {
    bs58::decode(public_key_b58.trim()).into_vec().ok()
}

/// Encode public key bytes as base58.
pub fn encode_public_key(public_key: &[u8]) -> String {
    bs58::encode(public_key).into_string()
}

/// Lifecycle of a statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementStatus {
    /// No signature attached.
    Unsigned,
    /// Signature attached, not yet checked.
    Signed,
    /// Signature checked and valid.
    VerifiedValid,
    /// Signature checked and rejected.
    VerifiedInvalid,
}

impl StatementStatus {
    /// Whether the statement may be shown as authored by its key.
    pub fn is_verified(self) -> bool {
        matches!(self, Self::VerifiedValid)
    }
}

/// A user-authored post or comment with its detached signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedStatement {
    /// Free-text content.
    pub content: String,
    /// Post or thread the statement belongs to.
    pub context_id: String,
    /// Unix timestamp in milliseconds.
    pub timestamp_ms: i64,
    /// Claimed author key (base58).
    pub public_key: String,
    /// Detached signature (base64).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl SignedStatement {
    /// Create an unsigned statement.
    pub fn unsigned(
        content: impl Into<String>,
        context_id: impl Into<String>,
        timestamp_ms: i64,
        public_key: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            context_id: context_id.into(),
            timestamp_ms,
            public_key: public_key.into(),
            signature: None,
        }
    }

    /// Attach a base64 signature.
    pub fn with_signature(mut self, signature_b64: impl Into<String>) -> Self {
        self.signature = Some(signature_b64.into());
        self
    }

    /// Bytes the author must have signed.
    pub fn canonical_message(&self, format: MessageFormat) -> Result<Vec<u8>, StatementError> {
        canonical_message_with_format(&self.content, &self.context_id, self.timestamp_ms, format)
    }

    /// Status before verification.
    pub fn status(&self) -> StatementStatus {
        if self.signature.is_some() {
            StatementStatus::Signed
        } else {
            StatementStatus::Unsigned
        }
    }

    /// Check the signature. Never mutates the statement.
    pub fn verify(&self, format: MessageFormat) -> StatementStatus {
        let Some(signature) = &self.signature else {
            return StatementStatus::Unsigned;
        };

        let valid = match self.canonical_message(format) {
            Ok(message) => verify_encoded(&message, signature, &self.public_key),
            Err(e) => {
                debug!("Statement for {} not canonicalizable: {}", self.context_id, e);
                false
            }
        };

        if valid {
            StatementStatus::VerifiedValid
        } else {
            StatementStatus::VerifiedInvalid
        }
    }
}
