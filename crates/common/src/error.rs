//! Error types shared across crates.
//!
//! Two layers exist. [`EngineError`] keeps operation failures and tag mismatches
//! apart so that in-process callers can tell them apart. [`CrypterError`] is the
//! facade error and deliberately folds both decrypt outcomes into one variant.
//! Do not forward the [`EngineError`] distinction across a trust boundary: telling a
//! remote peer *why* decryption failed gives it a tag oracle.

use thiserror::Error;

/// Outcome of a failed seal or open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Context setup, configuration, or an update/finalize step failed.
    ///
    /// Covers wrong key length, unsupported nonce length and calls made out of
    /// order. Which step failed is not reported.
    #[error("aead operation failed")]
    Operation,

    /// The supplied tag did not match. No plaintext is released.
    #[error("authentication failed")]
    Authentication,
}

impl EngineError {
    /// True when the failure came from tag verification.
    pub fn is_authentication(&self) -> bool {
        matches!(self, EngineError::Authentication)
    }
}

/// Errors produced by the key-size-inferring crypter facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CrypterError {
    /// The key is neither 16 nor 32 bytes.
    #[error("aes key must be 128 or 256 bits")]
    KeyNot128Or256BitLength,

    /// Encryption failed.
    #[error("failed to encrypt data")]
    FailedToEncryptData,

    /// Decryption failed, for any reason including tag mismatch.
    #[error("failed to decrypt data")]
    FailedToDecryptData,
}
