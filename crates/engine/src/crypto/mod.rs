//! AES-GCM seal/open engine.
//!
//! This module is free of configuration and FFI concerns. It provides the two
//! operations used by the crypter facade and the C ABI.
//!
//! # Layers
//!
//! ```text
//! engine     seal / open pipelines
//! context    call-scoped staged cipher context, wiped on drop
//! primitive  seam to the OpenSSL GCM cipher
//! ```

mod context;
pub mod engine;
pub mod primitive;

pub use engine::{open, seal};
