use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strata_codec::{Codec, CodecError, CodecResult};
use strata_compress::{Compressor, CompressorKind};
use strata_crypto::{Argon2Profile, EncryptingCodec, SecurityLevel};

use crate::error::{PipelineError, PipelineResult};

// ---------------------------------------------------------------------------
// StageOrder
// ---------------------------------------------------------------------------

/// Which stage runs first on encode. Decode always runs the mirror order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageOrder {
    /// serialize, compress, encrypt.
    #[default]
    CompressThenEncrypt,
    /// serialize, encrypt, compress. Ciphertext barely compresses, so this
    /// mostly exists for interop with data written that way.
    EncryptThenCompress,
}

impl fmt::Display for StageOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CompressThenEncrypt => "compress-then-encrypt",
            Self::EncryptThenCompress => "encrypt-then-compress",
        })
    }
}

// ---------------------------------------------------------------------------
// PipelineConfig
// ---------------------------------------------------------------------------

/// Declarative description of a codec chain.
///
/// ```toml
/// order = "compress-then-encrypt"
///
/// [compression]
/// algorithm = "zstd"
/// level = 3
///
/// [encryption]
/// passphrase_env = "STRATA_PASSPHRASE"
/// security_level = "medium"
/// profile = "balanced"
/// ```
///
/// Both tables are optional. With neither, the chain is just the serializer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub order: StageOrder,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<CompressionConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption: Option<EncryptionConfig>,
}

impl PipelineConfig {
    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> PipelineResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> PipelineResult<String> {
        Ok(toml::to_string(self)?)
    }

    pub fn with_compression(mut self, compression: CompressionConfig) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn with_encryption(mut self, encryption: EncryptionConfig) -> Self {
        self.encryption = Some(encryption);
        self
    }

    pub fn with_order(mut self, order: StageOrder) -> Self {
        self.order = order;
        self
    }

    /// Check composition rules without deriving any key material.
    ///
    /// - compression levels must be valid for the chosen algorithm
    /// - encryption needs exactly one passphrase source, and a literal
    ///   passphrase must not be empty
    /// - `encrypt-then-compress` needs both stages
    pub fn validate(&self) -> CodecResult<()> {
        if let Some(compression) = &self.compression {
            compression.build()?;
        }
        if let Some(encryption) = &self.encryption {
            encryption.validate()?;
        }
        if self.order == StageOrder::EncryptThenCompress
            && (self.compression.is_none() || self.encryption.is_none())
        {
            return Err(CodecError::Config(format!(
                "order \"{}\" requires both compression and encryption",
                self.order
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CompressionConfig
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompressionConfig {
    pub algorithm: CompressorKind,
    /// Algorithm-specific level. Not accepted for lz4.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i32>,
    /// Upper bound on decompressed output, in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_decompressed_size: Option<usize>,
}

impl CompressionConfig {
    pub fn new(algorithm: CompressorKind) -> Self {
        Self {
            algorithm,
            level: None,
            max_decompressed_size: None,
        }
    }

    pub fn level(mut self, level: i32) -> Self {
        self.level = Some(level);
        self
    }

    pub fn max_decompressed_size(mut self, limit: usize) -> Self {
        self.max_decompressed_size = Some(limit);
        self
    }

    pub fn build(&self) -> CodecResult<Arc<dyn Compressor>> {
        self.algorithm
            .build_with(self.level, self.max_decompressed_size)
            .map_err(|e| CodecError::Config(format!("compression: {e}")))
    }
}

// ---------------------------------------------------------------------------
// EncryptionConfig
// ---------------------------------------------------------------------------

/// Encryption settings. Exactly one of `passphrase` and `passphrase_env`
/// must be set.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EncryptionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<String>,
    /// Name of an environment variable holding the passphrase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passphrase_env: Option<String>,
    #[serde(default)]
    pub security_level: SecurityLevel,
    #[serde(default)]
    pub profile: Argon2Profile,
}

impl EncryptionConfig {
    pub fn with_passphrase(passphrase: impl Into<String>) -> Self {
        Self {
            passphrase: Some(passphrase.into()),
            ..Self::default()
        }
    }

    pub fn from_env(var: impl Into<String>) -> Self {
        Self {
            passphrase_env: Some(var.into()),
            ..Self::default()
        }
    }

    pub fn security_level(mut self, level: SecurityLevel) -> Self {
        self.security_level = level;
        self
    }

    pub fn profile(mut self, profile: Argon2Profile) -> Self {
        self.profile = profile;
        self
    }

    fn validate(&self) -> CodecResult<()> {
        match (&self.passphrase, &self.passphrase_env) {
            (Some(_), Some(_)) => Err(CodecError::Config(
                "set either passphrase or passphrase_env, not both".into(),
            )),
            (None, None) => Err(CodecError::Config(
                "encryption requires passphrase or passphrase_env".into(),
            )),
            (Some(p), None) if p.is_empty() => {
                Err(CodecError::Config("passphrase cannot be empty".into()))
            }
            (None, Some(var)) if var.is_empty() => {
                Err(CodecError::Config("passphrase_env cannot be empty".into()))
            }
            _ => Ok(()),
        }
    }

    /// The passphrase, reading the environment if configured that way.
    pub fn resolve_passphrase(&self) -> CodecResult<String> {
        self.validate()?;
        match (&self.passphrase, &self.passphrase_env) {
            (Some(p), _) => Ok(p.clone()),
            (None, Some(var)) => std::env::var(var).map_err(|_| {
                CodecError::Config(format!("environment variable {var} is not set"))
            }),
            (None, None) => Err(CodecError::Config(
                "encryption requires passphrase or passphrase_env".into(),
            )),
        }
    }

    /// Derive the key and wrap `inner`.
    pub fn wrap<C: Codec>(&self, inner: C) -> CodecResult<EncryptingCodec<C>> {
        EncryptingCodec::builder()
            .passphrase(self.resolve_passphrase()?)
            .inner(inner)
            .security_level(self.security_level)
            .profile(self.profile)
            .build()
    }
}

impl fmt::Debug for EncryptionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionConfig")
            .field("passphrase", &self.passphrase.as_ref().map(|_| "[REDACTED]"))
            .field("passphrase_env", &self.passphrase_env)
            .field("security_level", &self.security_level)
            .field("profile", &self.profile)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const FULL: &str = r#"
order = "encrypt-then-compress"

[compression]
algorithm = "gzip"
level = 9
max_decompressed_size = 1048576

[encryption]
passphrase = "from the file"
security_level = "high"
profile = "fast"
"#;

    #[test]
    fn parses_full_config() {
        let config = PipelineConfig::from_toml_str(FULL).unwrap();
        assert_eq!(config.order, StageOrder::EncryptThenCompress);
        let compression = config.compression.unwrap();
        assert_eq!(compression.algorithm, CompressorKind::Gzip);
        assert_eq!(compression.level, Some(9));
        assert_eq!(compression.max_decompressed_size, Some(1 << 20));
        let encryption = config.encryption.unwrap();
        assert_eq!(encryption.security_level, SecurityLevel::High);
        assert_eq!(encryption.profile, Argon2Profile::Fast);
    }

    #[test]
    fn empty_document_is_plain() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn defaults_fill_in() {
        let config = PipelineConfig::from_toml_str(
            "[compression]\nalgorithm = \"lz4\"\n\n[encryption]\npassphrase = \"pw\"\n",
        )
        .unwrap();
        assert_eq!(config.order, StageOrder::CompressThenEncrypt);
        let encryption = config.encryption.unwrap();
        assert_eq!(encryption.security_level, SecurityLevel::Medium);
        assert_eq!(encryption.profile, Argon2Profile::Balanced);
    }

    #[test]
    fn rejects_unknown_keys_and_values() {
        assert!(matches!(
            PipelineConfig::from_toml_str("ordr = \"compress-then-encrypt\""),
            Err(PipelineError::Parse(_))
        ));
        assert!(matches!(
            PipelineConfig::from_toml_str("[compression]\nalgorithm = \"brotli\"\n"),
            Err(PipelineError::Parse(_))
        ));
    }

    #[test]
    fn rejects_bad_levels() {
        for text in [
            "[compression]\nalgorithm = \"lz4\"\nlevel = 1\n",
            "[compression]\nalgorithm = \"gzip\"\nlevel = 10\n",
            "[compression]\nalgorithm = \"zstd\"\nlevel = 0\n",
        ] {
            let err = PipelineConfig::from_toml_str(text).unwrap_err();
            assert!(err.is_config(), "{text}: {err}");
        }
    }

    #[test]
    fn passphrase_sources_are_exclusive() {
        let both = EncryptionConfig {
            passphrase: Some("a".into()),
            passphrase_env: Some("B".into()),
            ..EncryptionConfig::default()
        };
        assert!(both.validate().unwrap_err().is_config());
        assert!(EncryptionConfig::default().validate().unwrap_err().is_config());
        assert!(EncryptionConfig::with_passphrase("")
            .validate()
            .unwrap_err()
            .is_config());
    }

    #[test]
    fn passphrase_from_environment() {
        let var = "STRATA_PIPELINE_TEST_PASSPHRASE";
        std::env::set_var(var, "env secret");
        let config = EncryptionConfig::from_env(var);
        assert_eq!(config.resolve_passphrase().unwrap(), "env secret");

        let missing = EncryptionConfig::from_env("STRATA_PIPELINE_TEST_UNSET_VARIABLE");
        assert!(missing.resolve_passphrase().unwrap_err().is_config());
    }

    #[test]
    fn order_needs_both_stages() {
        let config = PipelineConfig::default().with_order(StageOrder::EncryptThenCompress);
        assert!(config.validate().unwrap_err().is_config());
    }

    #[test]
    fn debug_redacts_passphrase() {
        let config = PipelineConfig::from_toml_str(FULL).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("from the file"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn toml_roundtrip() {
        let config = PipelineConfig::default()
            .with_compression(CompressionConfig::new(CompressorKind::Zstd).level(5))
            .with_encryption(EncryptionConfig::from_env("STRATA_PASSPHRASE"));
        let text = config.to_toml_string().unwrap();
        assert_eq!(PipelineConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FULL.as_bytes()).unwrap();
        let config = PipelineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.order, StageOrder::EncryptThenCompress);

        let dir = tempfile::tempdir().unwrap();
        let err = PipelineConfig::from_file(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
    }
}
