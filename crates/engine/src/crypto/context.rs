//! Call-scoped cipher context.
//!
//! A [`CipherContext`] walks a fixed pipeline:
//!
//! ```text
//! new -> set_nonce_len -> bind -> set_padding(false) -> update_aad* -> update*
//!     -> (encrypt) finalize -> tag
//!     -> (decrypt) set_tag -> finalize
//! ```
//!
//! Any call made out of order fails with [`EngineError::Operation`]. Output from
//! every update accumulates in one owned buffer, which is wiped when the context
//! is dropped or fails.

use gcm_common::{EngineError, Tag};
use zeroize::Zeroize;

use super::primitive::{Direction, GcmPrimitive, PrimitiveError, OUTPUT_SLACK};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Created,
    NonceLenSet,
    Bound,
    Configured,
    Finalized,
    Failed,
}

pub(crate) struct CipherContext<P: GcmPrimitive> {
    primitive: P,
    direction: Direction,
    stage: Stage,
    nonce_len: usize,
    buffer: Vec<u8>,
    data_started: bool,
    tag_set: bool,
    tag: Option<Tag>,
}

impl<P: GcmPrimitive> CipherContext<P> {
    /// Bind a variant and direction. No key or nonce yet.
    pub(crate) fn new(primitive: P, direction: Direction) -> Self {
        Self {
            primitive,
            direction,
            stage: Stage::Created,
            nonce_len: 0,
            buffer: Vec::new(),
            data_started: false,
            tag_set: false,
            tag: None,
        }
    }

    /// Declare the nonce length. Always called, including for 12-byte nonces.
    pub(crate) fn set_nonce_len(&mut self, len: usize) -> Result<(), EngineError> {
        self.expect_stage(Stage::Created)?;
        if len == 0 {
            return self.fail();
        }
        self.nonce_len = len;
        self.stage = Stage::NonceLenSet;
        Ok(())
    }

    /// Bind key and nonce. Both lengths are checked before the primitive sees them.
    pub(crate) fn bind(&mut self, key: &[u8], nonce: &[u8]) -> Result<(), EngineError> {
        self.expect_stage(Stage::NonceLenSet)?;
        if key.len() != self.primitive.flavor().key_len() || nonce.len() != self.nonce_len {
            return self.fail();
        }
        let started = self.primitive.start(self.direction, key, nonce);
        self.step(started)?;
        self.stage = Stage::Bound;
        Ok(())
    }

    /// GCM is a counter-mode construction; only `false` is accepted.
    pub(crate) fn set_padding(&mut self, enabled: bool) -> Result<(), EngineError> {
        self.expect_stage(Stage::Bound)?;
        if enabled {
            return self.fail();
        }
        let padded = self.primitive.set_padding(false);
        self.step(padded)?;
        self.stage = Stage::Configured;
        Ok(())
    }

    /// Feed associated data. Must come before any call to [`Self::update`].
    pub(crate) fn update_aad(&mut self, aad: &[u8]) -> Result<(), EngineError> {
        self.expect_stage(Stage::Configured)?;
        if self.data_started {
            return self.fail();
        }
        let fed = self.primitive.update_aad(aad);
        self.step(fed)
    }

    /// Feed data; produced bytes are appended to the output in call order.
    pub(crate) fn update(&mut self, data: &[u8]) -> Result<(), EngineError> {
        self.expect_stage(Stage::Configured)?;
        self.data_started = true;

        let start = self.buffer.len();
        self.buffer.resize(start + data.len() + OUTPUT_SLACK, 0);
        let written = self.primitive.update(data, &mut self.buffer[start..]);
        let written = self.step(written)?;
        self.buffer.truncate(start + written);
        Ok(())
    }

    /// Supply the tag to verify. Decrypt only, before finalize.
    pub(crate) fn set_tag(&mut self, tag: &Tag) -> Result<(), EngineError> {
        self.expect_stage(Stage::Configured)?;
        if self.direction != Direction::Decrypt {
            return self.fail();
        }
        let set = self.primitive.set_tag(tag);
        self.step(set)?;
        self.tag_set = true;
        Ok(())
    }

    /// Finish the operation and return the occupied output length.
    ///
    /// For decryption this is where the tag is checked. On mismatch everything
    /// produced so far is wiped and [`EngineError::Authentication`] is returned.
    pub(crate) fn finalize(&mut self) -> Result<usize, EngineError> {
        self.expect_stage(Stage::Configured)?;
        if self.direction == Direction::Decrypt && !self.tag_set {
            return self.fail();
        }

        let start = self.buffer.len();
        self.buffer.resize(start + OUTPUT_SLACK, 0);
        let written = match self.primitive.finalize(&mut self.buffer[start..]) {
            Ok(n) => n,
            Err(PrimitiveError::Verification) if self.direction == Direction::Decrypt => {
                self.discard();
                return Err(EngineError::Authentication);
            }
            Err(_) => return self.fail(),
        };
        self.buffer.truncate(start + written);

        if self.direction == Direction::Encrypt {
            let tag = self.primitive.tag();
            self.tag = Some(self.step(tag)?);
        }
        self.stage = Stage::Finalized;
        Ok(self.buffer.len())
    }

    /// Tag produced by a finalized encryption.
    pub(crate) fn tag(&self) -> Result<Tag, EngineError> {
        match (self.stage, self.direction, self.tag) {
            (Stage::Finalized, Direction::Encrypt, Some(tag)) => Ok(tag),
            _ => Err(EngineError::Operation),
        }
    }

    /// Hand the output buffer to the caller. Only valid after a successful finalize.
    pub(crate) fn into_output(mut self) -> Result<Vec<u8>, EngineError> {
        self.expect_stage(Stage::Finalized)?;
        Ok(std::mem::take(&mut self.buffer))
    }

    fn step<T>(&mut self, result: Result<T, PrimitiveError>) -> Result<T, EngineError> {
        match result {
            Ok(value) => Ok(value),
            Err(_) => self.fail(),
        }
    }

    fn expect_stage(&mut self, stage: Stage) -> Result<(), EngineError> {
        if self.stage == stage {
            Ok(())
        } else {
            self.fail()
        }
    }

    fn fail<T>(&mut self) -> Result<T, EngineError> {
        self.discard();
        Err(EngineError::Operation)
    }

    fn discard(&mut self) {
        self.buffer.zeroize();
        self.stage = Stage::Failed;
    }
}

impl<P: GcmPrimitive> Drop for CipherContext<P> {
    fn drop(&mut self) {
        self.buffer.zeroize();
        tracing::trace!(stage = ?self.stage, "cipher context released");
    }
}
