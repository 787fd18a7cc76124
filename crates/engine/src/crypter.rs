//! Key-size-inferring AES-GCM facade.
//!
//! Callers hand over a key and get the variant chosen for them: 16-byte keys use
//! AES-128-GCM and 32-byte keys use AES-256-GCM. Decrypt failures are reported as a
//! single [`CrypterError::FailedToDecryptData`], whatever the cause, so this layer
//! is safe to expose to untrusted peers.

use gcm_common::{CrypterError, Flavor, Sealed, Tag};

use crate::crypto;

/// Encrypt `data` with the AES-GCM variant matching `key`'s length.
///
/// # Errors
///
/// Returns [`CrypterError::KeyNot128Or256BitLength`] for any other key length and
/// [`CrypterError::FailedToEncryptData`] if the engine fails.
pub fn encrypt_aes_gcm(
    data: &[u8],
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
) -> Result<Sealed, CrypterError> {
    let flavor = flavor_for(key)?;
    crypto::seal(flavor, key, iv, aad, data).map_err(|_| CrypterError::FailedToEncryptData)
}

/// Decrypt `data` with the AES-GCM variant matching `key`'s length.
///
/// # Errors
///
/// Returns [`CrypterError::KeyNot128Or256BitLength`] for an unsupported key length
/// and [`CrypterError::FailedToDecryptData`] for everything else, including a tag
/// that is not 16 bytes or does not verify.
pub fn decrypt_aes_gcm(
    data: &[u8],
    key: &[u8],
    iv: &[u8],
    tag: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>, CrypterError> {
    let flavor = flavor_for(key)?;
    let tag: Tag = tag
        .try_into()
        .map_err(|_| CrypterError::FailedToDecryptData)?;
    crypto::open(flavor, data, aad, &tag, key, iv).map_err(|_| CrypterError::FailedToDecryptData)
}

fn flavor_for(key: &[u8]) -> Result<Flavor, CrypterError> {
    Flavor::for_key_len(key.len()).ok_or(CrypterError::KeyNot128Or256BitLength)
}
