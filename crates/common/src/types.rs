//! Value types exchanged between the engine and its callers.
//!
//! Everything here is call-scoped: nothing is persisted and nothing outlives the
//! seal or open invocation that produced it.

use std::fmt;

/// Byte length of a GCM authentication tag (always 128 bits).
pub const TAG_LEN: usize = 16;

/// A 16-byte GCM authentication tag.
pub type Tag = [u8; TAG_LEN];

// ---------------------------------------------------------------------------
// Flavor
// ---------------------------------------------------------------------------

/// AES-GCM variant, selected by key size.
///
/// The block size is 128 bits for both; the number in the name is the key size.
/// Discriminants match the raw values used across the C boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Flavor {
    /// AES-128-GCM, 16-byte key.
    Aes128Gcm = 0,
    /// AES-256-GCM, 32-byte key.
    Aes256Gcm = 1,
}

impl Flavor {
    /// Required key length in bytes.
    pub const fn key_len(self) -> usize {
        match self {
            Flavor::Aes128Gcm => 16,
            Flavor::Aes256Gcm => 32,
        }
    }

    /// Key size in bits.
    pub const fn key_bits(self) -> usize {
        self.key_len() * 8
    }

    /// Pick the flavor whose key length is `len`, if any.
    pub const fn for_key_len(len: usize) -> Option<Self> {
        match len {
            16 => Some(Flavor::Aes128Gcm),
            32 => Some(Flavor::Aes256Gcm),
            _ => None,
        }
    }
}

impl TryFrom<u32> for Flavor {
    type Error = u32;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Flavor::Aes128Gcm),
            1 => Ok(Flavor::Aes256Gcm),
            other => Err(other),
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flavor::Aes128Gcm => f.write_str("aes-128-gcm"),
            Flavor::Aes256Gcm => f.write_str("aes-256-gcm"),
        }
    }
}

// ---------------------------------------------------------------------------
// Seal output
// ---------------------------------------------------------------------------

/// Output of a successful seal: ciphertext plus its detached tag.
///
/// `ciphertext.len()` always equals the plaintext length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    /// Encrypted bytes, same length as the plaintext.
    pub ciphertext: Vec<u8>,
    /// Authentication tag over the AAD and ciphertext.
    pub tag: Tag,
}
