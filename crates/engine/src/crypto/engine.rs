//! Seal and open: the two operations of the engine.
//!
//! Both are linear pipelines over a fresh [`CipherContext`]. Nothing is shared
//! between calls, so concurrent use from many threads needs no locking.

use gcm_common::{EngineError, Flavor, Sealed, Tag};

use super::context::CipherContext;
use super::primitive::{Direction, GcmPrimitive, OpensslGcm};

/// Encrypt and authenticate `plaintext` under `key` and `nonce`.
///
/// `aad` is authenticated but not encrypted. The ciphertext has the same length as
/// the plaintext and the tag is always 16 bytes. The output is deterministic for
/// identical inputs.
///
/// # Precondition
///
/// A `(key, nonce)` pair must be used for at most one seal. Reusing a nonce under
/// GCM leaks the XOR of plaintexts and allows tag forgery. This function cannot
/// detect reuse; generating unique nonces is the caller's job.
///
/// # Errors
///
/// Returns [`EngineError::Operation`] if the key length does not match `flavor`,
/// the nonce is empty or longer than the cipher accepts, or the cipher fails. The error does not say which step failed.
pub fn seal(
    flavor: Flavor,
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<Sealed, EngineError> {
    seal_with(OpensslGcm::new(flavor), key, nonce, aad, plaintext)
        .inspect_err(|e| tracing::debug!(%flavor, error = %e, "seal failed"))
}

/// Verify `tag` and decrypt `ciphertext`.
///
/// Plaintext is returned only when the tag verifies. Otherwise none of it leaves
/// the engine.
///
/// # Errors
///
/// Returns [`EngineError::Authentication`] if the tag does not match, which means
/// the ciphertext, tag or AAD was altered, or the wrong key or nonce was used.
/// Returns [`EngineError::Operation`] for setup failures as in [`seal`].
pub fn open(
    flavor: Flavor,
    ciphertext: &[u8],
    aad: &[u8],
    tag: &Tag,
    key: &[u8],
    nonce: &[u8],
) -> Result<Vec<u8>, EngineError> {
    open_with(OpensslGcm::new(flavor), ciphertext, aad, tag, key, nonce)
        .inspect_err(|e| tracing::debug!(%flavor, error = %e, "open failed"))
}

#[tracing::instrument(
    level = "trace",
    skip_all,
    fields(flavor = %primitive.flavor(), key_bits = primitive.flavor().key_bits(), nonce_len = nonce.len(), aad_len = aad.len(), len = plaintext.len())
)]
pub(crate) fn seal_with<P: GcmPrimitive>(
    primitive: P,
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<Sealed, EngineError> {
    let mut ctx = CipherContext::new(primitive, Direction::Encrypt);
    ctx.set_nonce_len(nonce.len())?;
    ctx.bind(key, nonce)?;
    ctx.set_padding(false)?;
    ctx.update_aad(aad)?;
    ctx.update(plaintext)?;

    ctx.finalize()?;
    let tag = ctx.tag()?;
    let ciphertext = ctx.into_output()?;

    Ok(Sealed { ciphertext, tag })
}

#[tracing::instrument(
    level = "trace",
    skip_all,
    fields(flavor = %primitive.flavor(), key_bits = primitive.flavor().key_bits(), nonce_len = nonce.len(), aad_len = aad.len(), len = ciphertext.len())
)]
pub(crate) fn open_with<P: GcmPrimitive>(
    primitive: P,
    ciphertext: &[u8],
    aad: &[u8],
    tag: &Tag,
    key: &[u8],
    nonce: &[u8],
) -> Result<Vec<u8>, EngineError> {
    let mut ctx = CipherContext::new(primitive, Direction::Decrypt);
    ctx.set_nonce_len(nonce.len())?;
    ctx.bind(key, nonce)?;
    ctx.set_padding(false)?;
    ctx.update_aad(aad)?;
    ctx.update(ciphertext)?;
    ctx.set_tag(tag)?;

    ctx.finalize()?;
    ctx.into_output()
}
