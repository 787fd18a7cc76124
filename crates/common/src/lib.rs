//! Common types and errors shared by the AES-GCM engine crates.

pub mod error;
pub mod types;

pub use error::{CrypterError, EngineError};
pub use types::{Flavor, Sealed, Tag, TAG_LEN};
