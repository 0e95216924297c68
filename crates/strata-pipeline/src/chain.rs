use serde::de::DeserializeOwned;
use serde::Serialize;
use strata_codec::{Codec, CodecResult, Context};
use strata_compress::CompressingCodec;
use strata_crypto::EncryptingCodec;
use tracing::{debug, warn};

use crate::config::{PipelineConfig, StageOrder};

/// A codec chain whose shape is chosen at runtime.
///
/// Each variant is a concrete nesting of decorators around the serializer
/// `S`, named by the order stages run on encode.
#[derive(Clone, Debug)]
pub enum Chain<S> {
    Plain(S),
    Compressed(CompressingCodec<S>),
    Encrypted(EncryptingCodec<S>),
    CompressThenEncrypt(EncryptingCodec<CompressingCodec<S>>),
    EncryptThenCompress(CompressingCodec<EncryptingCodec<S>>),
}

impl<S: Codec> Chain<S> {
    /// Validate `config` and assemble the chain it describes.
    ///
    /// Key derivation, if any, happens here and not on first use.
    pub fn from_config(serializer: S, config: &PipelineConfig) -> CodecResult<Self> {
        config.validate()?;
        let compressor = config
            .compression
            .as_ref()
            .map(|c| c.build())
            .transpose()?;

        let chain = match (compressor, &config.encryption) {
            (None, None) => Self::Plain(serializer),
            (Some(compressor), None) => {
                Self::Compressed(CompressingCodec::new(serializer, compressor))
            }
            (None, Some(encryption)) => Self::Encrypted(encryption.wrap(serializer)?),
            (Some(compressor), Some(encryption)) => match config.order {
                StageOrder::CompressThenEncrypt => Self::CompressThenEncrypt(
                    encryption.wrap(CompressingCodec::new(serializer, compressor))?,
                ),
                StageOrder::EncryptThenCompress => {
                    warn!("encrypt-then-compress chain: ciphertext will not compress");
                    Self::EncryptThenCompress(CompressingCodec::new(
                        encryption.wrap(serializer)?,
                        compressor,
                    ))
                }
            },
        };
        debug!(stages = ?chain.describe(), "built codec chain");
        Ok(chain)
    }

    /// Stage labels in encode order, e.g.
    /// `["serialize", "compress:zstd", "encrypt:aes-256-gcm"]`.
    pub fn describe(&self) -> Vec<String> {
        let serialize = "serialize".to_string();
        let compress = |name: &str| format!("compress:{name}");
        let encrypt = |name: &str| format!("encrypt:{name}");
        match self {
            Self::Plain(_) => vec![serialize],
            Self::Compressed(c) => vec![serialize, compress(c.compressor().name())],
            Self::Encrypted(e) => vec![serialize, encrypt(e.cipher().algorithm())],
            Self::CompressThenEncrypt(e) => vec![
                serialize,
                compress(e.inner().compressor().name()),
                encrypt(e.cipher().algorithm()),
            ],
            Self::EncryptThenCompress(c) => vec![
                serialize,
                encrypt(c.inner().cipher().algorithm()),
                compress(c.compressor().name()),
            ],
        }
    }
}

impl<S: Codec> Codec for Chain<S> {
    fn encode<T>(&self, ctx: &Context, value: Option<&T>) -> CodecResult<Vec<u8>>
    where
        T: Serialize + ?Sized,
    {
        match self {
            Self::Plain(c) => c.encode(ctx, value),
            Self::Compressed(c) => c.encode(ctx, value),
            Self::Encrypted(c) => c.encode(ctx, value),
            Self::CompressThenEncrypt(c) => c.encode(ctx, value),
            Self::EncryptThenCompress(c) => c.encode(ctx, value),
        }
    }

    fn decode<T>(&self, ctx: &Context, data: &[u8], dest: Option<&mut T>) -> CodecResult<()>
    where
        T: DeserializeOwned,
    {
        match self {
            Self::Plain(c) => c.decode(ctx, data, dest),
            Self::Compressed(c) => c.decode(ctx, data, dest),
            Self::Encrypted(c) => c.decode(ctx, data, dest),
            Self::CompressThenEncrypt(c) => c.decode(ctx, data, dest),
            Self::EncryptThenCompress(c) => c.decode(ctx, data, dest),
        }
    }
}

#[cfg(test)]
mod tests {
    use strata_codec::JsonCodec;
    use strata_compress::CompressorKind;
    use strata_crypto::{Argon2Profile, SecurityLevel};

    use super::*;
    use crate::config::{CompressionConfig, EncryptionConfig};

    fn encryption() -> EncryptionConfig {
        EncryptionConfig::with_passphrase("chain tests")
            .security_level(SecurityLevel::Low)
            .profile(Argon2Profile::Fast)
    }

    #[test]
    fn plain_config_builds_plain_chain() {
        let chain = Chain::from_config(JsonCodec::new(), &PipelineConfig::default()).unwrap();
        assert!(matches!(chain, Chain::Plain(_)));
        assert_eq!(chain.describe(), vec!["serialize"]);
    }

    #[test]
    fn shapes_follow_config() {
        let compression = CompressionConfig::new(CompressorKind::Lz4);

        let chain = Chain::from_config(
            JsonCodec::new(),
            &PipelineConfig::default().with_compression(compression.clone()),
        )
        .unwrap();
        assert_eq!(chain.describe(), vec!["serialize", "compress:lz4"]);

        let chain = Chain::from_config(
            JsonCodec::new(),
            &PipelineConfig::default().with_encryption(encryption()),
        )
        .unwrap();
        assert_eq!(chain.describe(), vec!["serialize", "encrypt:aes-128-gcm"]);

        let both = PipelineConfig::default()
            .with_compression(compression)
            .with_encryption(encryption());
        let chain = Chain::from_config(JsonCodec::new(), &both).unwrap();
        assert!(matches!(chain, Chain::CompressThenEncrypt(_)));
        assert_eq!(
            chain.describe(),
            vec!["serialize", "compress:lz4", "encrypt:aes-128-gcm"]
        );

        let reversed = both.with_order(StageOrder::EncryptThenCompress);
        let chain = Chain::from_config(JsonCodec::new(), &reversed).unwrap();
        assert!(matches!(chain, Chain::EncryptThenCompress(_)));
        assert_eq!(
            chain.describe(),
            vec!["serialize", "encrypt:aes-128-gcm", "compress:lz4"]
        );
    }

    #[test]
    fn invalid_config_builds_nothing() {
        let config =
            PipelineConfig::default().with_encryption(EncryptionConfig::with_passphrase(""));
        let err = Chain::from_config(JsonCodec::new(), &config).unwrap_err();
        assert!(err.is_config());
    }
}
