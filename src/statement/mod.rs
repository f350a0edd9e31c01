//! Signed Statements
//!
//! Authenticates posts and comments against the key that claims to have
//! written them. The crate only verifies; signing happens in the user's wallet.

pub mod canonical;
pub mod signature;

pub use canonical::{
    canonical_message, canonical_message_with_format, MessageFormat, StatementError,
    FIELD_DELIMITER, STATEMENT_DOMAIN,
};
pub use signature::{
    decode_public_key, decode_signature, encode_public_key, encode_signature, verify,
    verify_encoded, SignedStatement, StatementStatus,
};
