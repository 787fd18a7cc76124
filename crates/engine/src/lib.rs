//! `gcm-engine`: AES-128-GCM and AES-256-GCM seal and open.
//!
//! A thin layer over the OpenSSL GCM ciphers exposing two operations to
//! higher-level callers:
//!
//! * [`seal`]: encrypt and authenticate, returning ciphertext and a detached 16-byte tag.
//! * [`open`]: verify the tag and decrypt, releasing plaintext only on success.
//!
//! Key management, nonce generation and message framing belong to the caller.
//! Foreign-language bindings link against the C ABI in [`ffi`].

pub mod config;
pub mod crypter;
pub mod crypto;
pub mod ffi;
pub mod telemetry;

pub use crypto::{open, seal};
pub use gcm_common::{CrypterError, EngineError, Flavor, Sealed, Tag, TAG_LEN};
