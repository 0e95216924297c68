use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{decode_target, format_error};
use crate::codec::Codec;
use crate::context::Context;
use crate::error::CodecResult;

const FORMAT: &str = "yaml";

/// YAML serializer backed by `serde_yaml`.
///
/// Like [`MessagePackCodec`](super::MessagePackCodec), `encode(None)`
/// succeeds with no bytes and decoding empty bytes is a no-op.
#[derive(Clone, Copy, Debug, Default)]
pub struct YamlCodec;

impl YamlCodec {
    pub const fn new() -> Self {
        Self
    }
}

impl Codec for YamlCodec {
    fn encode<T>(&self, ctx: &Context, value: Option<&T>) -> CodecResult<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        ctx.ensure_active()?;
        let Some(value) = value else {
            return Ok(Vec::new());
        };
        let text = serde_yaml::to_string(value).map_err(|e| format_error(FORMAT, e))?;
        Ok(text.into_bytes())
    }

    fn decode<T>(&self, ctx: &Context, data: &[u8], dest: Option<&mut T>) -> CodecResult<()>
    where
        T: DeserializeOwned,
    {
        let Some(dest) = decode_target(ctx, data, dest)? else {
            return Ok(());
        };
        *dest = serde_yaml::from_slice(data).map_err(|e| format_error(FORMAT, e))?;
        Ok(())
    }
}
