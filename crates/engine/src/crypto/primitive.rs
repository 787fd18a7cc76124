//! Binding to the underlying AES-GCM implementation.
//!
//! The engine never implements GCM itself. [`GcmPrimitive`] is the seam to the
//! trusted cipher library; [`OpensslGcm`] is the production binding onto OpenSSL's
//! EVP interface through `openssl::symm::Crypter`.

use std::os::raw::c_int;

use gcm_common::{Flavor, Tag, TAG_LEN};
use openssl::symm::{Cipher, Crypter, Mode};
use thiserror::Error;

/// Which way a context runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

/// Failure reported by a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    /// Allocation, initialisation, key/IV setup or an update step failed.
    #[error("primitive rejected its inputs")]
    Setup,

    /// Decrypt finalisation failed; the tag did not verify.
    #[error("tag verification failed")]
    Verification,
}

/// Staged AES-GCM cipher, one instance per call.
///
/// Calls arrive in pipeline order: `start`, `set_padding`, `update_aad`*,
/// `update`*, then `set_tag` + `finalize` (decrypt) or `finalize` + `tag`
/// (encrypt). Output slices passed to `update` and `finalize` carry at least
/// [`OUTPUT_SLACK`] spare bytes.
#[cfg_attr(test, mockall::automock)]
pub trait GcmPrimitive {
    /// Variant this primitive is bound to.
    fn flavor(&self) -> Flavor;

    /// Initialise the cipher, set the IV length to `nonce.len()`, then bind key and IV.
    fn start(&mut self, direction: Direction, key: &[u8], nonce: &[u8]) -> Result<(), PrimitiveError>;

    fn set_padding(&mut self, enabled: bool) -> Result<(), PrimitiveError>;

    /// Authenticate `aad` without producing output.
    fn update_aad(&mut self, aad: &[u8]) -> Result<(), PrimitiveError>;

    /// Process `input`, writing into `output`; returns the bytes written.
    fn update(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, PrimitiveError>;

    /// Expected tag for decryption. Must precede `finalize`.
    fn set_tag(&mut self, tag: &Tag) -> Result<(), PrimitiveError>;

    /// Complete the operation; for decryption this is the tag check.
    fn finalize(&mut self, output: &mut [u8]) -> Result<usize, PrimitiveError>;

    /// Tag computed by a finalised encryption.
    fn tag(&self) -> Result<Tag, PrimitiveError>;
}

/// Spare output room given to each update/finalize call.
pub const OUTPUT_SLACK: usize = 16;

/// [`GcmPrimitive`] backed by an OpenSSL `EVP_CIPHER_CTX`.
///
/// The context is allocated in [`GcmPrimitive::start`] and freed when this value
/// is dropped. OpenSSL wipes the key schedule on free.
pub struct OpensslGcm {
    flavor: Flavor,
    direction: Direction,
    crypter: Option<Crypter>,
}

impl OpensslGcm {
    pub fn new(flavor: Flavor) -> Self {
        Self {
            flavor,
            direction: Direction::Encrypt,
            crypter: None,
        }
    }

    fn cipher(&self) -> Cipher {
        match self.flavor {
            Flavor::Aes128Gcm => Cipher::aes_128_gcm(),
            Flavor::Aes256Gcm => Cipher::aes_256_gcm(),
        }
    }

    fn crypter(&mut self) -> Result<&mut Crypter, PrimitiveError> {
        self.crypter.as_mut().ok_or(PrimitiveError::Setup)
    }
}

// The `openssl` crate panics on lengths that do not fit a C int.
fn fits_c_int(len: usize) -> Result<(), PrimitiveError> {
    c_int::try_from(len).map(|_| ()).map_err(|_| PrimitiveError::Setup)
}

impl GcmPrimitive for OpensslGcm {
    fn flavor(&self) -> Flavor {
        self.flavor
    }

    fn start(&mut self, direction: Direction, key: &[u8], nonce: &[u8]) -> Result<(), PrimitiveError> {
        let cipher = self.cipher();
        if self.crypter.is_some() || key.len() != cipher.key_len() || nonce.is_empty() {
            return Err(PrimitiveError::Setup);
        }
        fits_c_int(nonce.len())?;

        let mode = match direction {
            Direction::Encrypt => Mode::Encrypt,
            Direction::Decrypt => Mode::Decrypt,
        };
        let crypter = Crypter::new(cipher, mode, key, Some(nonce)).map_err(|e| {
            tracing::trace!(error = %e, "cipher initialisation failed");
            PrimitiveError::Setup
        })?;

        self.direction = direction;
        self.crypter = Some(crypter);
        Ok(())
    }

    fn set_padding(&mut self, enabled: bool) -> Result<(), PrimitiveError> {
        self.crypter()?.pad(enabled);
        Ok(())
    }

    fn update_aad(&mut self, aad: &[u8]) -> Result<(), PrimitiveError> {
        fits_c_int(aad.len())?;
        self.crypter()?
            .aad_update(aad)
            .map_err(|_| PrimitiveError::Setup)
    }

    fn update(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, PrimitiveError> {
        fits_c_int(input.len())?;
        if output.len() < input.len() + OUTPUT_SLACK {
            return Err(PrimitiveError::Setup);
        }
        self.crypter()?
            .update(input, output)
            .map_err(|_| PrimitiveError::Setup)
    }

    fn set_tag(&mut self, tag: &Tag) -> Result<(), PrimitiveError> {
        if self.direction != Direction::Decrypt {
            return Err(PrimitiveError::Setup);
        }
        self.crypter()?
            .set_tag(tag)
            .map_err(|_| PrimitiveError::Setup)
    }

    fn finalize(&mut self, output: &mut [u8]) -> Result<usize, PrimitiveError> {
        if output.len() < OUTPUT_SLACK {
            return Err(PrimitiveError::Setup);
        }
        let direction = self.direction;
        self.crypter()?.finalize(output).map_err(|_| match direction {
            Direction::Encrypt => PrimitiveError::Setup,
            Direction::Decrypt => PrimitiveError::Verification,
        })
    }

    fn tag(&self) -> Result<Tag, PrimitiveError> {
        if self.direction != Direction::Encrypt {
            return Err(PrimitiveError::Setup);
        }
        let crypter = self.crypter.as_ref().ok_or(PrimitiveError::Setup)?;
        let mut tag = [0u8; TAG_LEN];
        crypter
            .get_tag(&mut tag)
            .map_err(|_| PrimitiveError::Setup)?;
        Ok(tag)
    }
}
