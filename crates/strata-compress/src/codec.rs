use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use strata_codec::{Codec, CodecError, CodecResult, Context};
use tracing::{debug, trace};

use crate::compressor::Compressor;
use crate::error::CompressionError;

// ---------------------------------------------------------------------------
// CompressingCodec
// ---------------------------------------------------------------------------

/// Decorator that compresses the bytes produced by an inner codec.
///
/// - `encode`: inner encode, then compress. An inner failure is returned
///   unchanged and nothing is compressed.
/// - `decode`: decompress, then inner decode. A decompression failure stops
///   the call; the inner codec is never invoked.
///
/// Empty payloads are not special-cased here: they go to the compressor
/// as-is, and the [`Compressor`] contract decides what they mean.
#[derive(Clone)]
pub struct CompressingCodec<C> {
    inner: C,
    compressor: Arc<dyn Compressor>,
}

impl<C: Codec> CompressingCodec<C> {
    /// Wrap `inner` with `compressor`.
    pub fn new(inner: C, compressor: Arc<dyn Compressor>) -> Self {
        Self { inner, compressor }
    }

    /// A builder that rejects a missing inner codec or compressor with
    /// [`CodecError::Config`].
    pub fn builder() -> CompressingCodecBuilder<C> {
        CompressingCodecBuilder {
            inner: None,
            compressor: None,
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn compressor(&self) -> &dyn Compressor {
        self.compressor.as_ref()
    }

    pub fn into_inner(self) -> C {
        self.inner
    }

    fn stage_error(&self, op: &str, err: CompressionError) -> CodecError {
        let name = self.compressor.name();
        debug!(compressor = name, op, error = %err, "compression stage failed");
        CodecError::stage(format!("{name} {op}"), err)
    }
}

impl<C: Codec> Codec for CompressingCodec<C> {
    fn encode<T>(&self, ctx: &Context, value: Option<&T>) -> CodecResult<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        let raw = self.inner.encode(ctx, value)?;
        let packed = self
            .compressor
            .compress(&raw)
            .map_err(|e| self.stage_error("compress", e))?;
        trace!(
            compressor = self.compressor.name(),
            raw = raw.len(),
            packed = packed.len(),
            "compressed payload"
        );
        Ok(packed)
    }

    fn decode<T>(&self, ctx: &Context, data: &[u8], dest: Option<&mut T>) -> CodecResult<()>
    where
        T: DeserializeOwned,
    {
        let raw = self
            .compressor
            .decompress(data)
            .map_err(|e| self.stage_error("decompress", e))?;
        trace!(
            compressor = self.compressor.name(),
            packed = data.len(),
            raw = raw.len(),
            "decompressed payload"
        );
        self.inner.decode(ctx, &raw, dest)
    }
}

impl<C: fmt::Debug> fmt::Debug for CompressingCodec<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompressingCodec")
            .field("inner", &self.inner)
            .field("compressor", &self.compressor.name())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// CompressingCodecBuilder
// ---------------------------------------------------------------------------

/// Builder for [`CompressingCodec`] with eager validation.
pub struct CompressingCodecBuilder<C> {
    inner: Option<C>,
    compressor: Option<Arc<dyn Compressor>>,
}

impl<C: Codec> CompressingCodecBuilder<C> {
    pub fn inner(mut self, inner: C) -> Self {
        self.inner = Some(inner);
        self
    }

    pub fn compressor(mut self, compressor: Arc<dyn Compressor>) -> Self {
        self.compressor = Some(compressor);
        self
    }

    pub fn build(self) -> CodecResult<CompressingCodec<C>> {
        let inner = self
            .inner
            .ok_or_else(|| CodecError::Config("inner codec is required".into()))?;
        let compressor = self
            .compressor
            .ok_or_else(|| CodecError::Config("compressor is required".into()))?;
        Ok(CompressingCodec::new(inner, compressor))
    }
}
