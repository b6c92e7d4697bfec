//! Configuration for the process-wide caches.
//!
//! The only tunable state in the engine is the capacity of the node store
//! and its derived caches. The config is defined by a struct. A builder
//! pattern is used to construct the config, but it can also be constructed
//! by deserializing a file. Currently only toml files are supported, with
//! the following format:
//!
//! ```toml,ignore
//! node_store_capacity = 16777216
//! successor_memo_capacity = 16777216
//! zero_pyramid_capacity = 1024
//! ```
//!
//! Example of how to use the builder:
//! ```
//! use std::num::NonZeroUsize;
//! use hashlife::UniverseConfigBuilder;
//!
//! let config = UniverseConfigBuilder::default()
//!     .node_store_capacity(NonZeroUsize::new(1 << 24))
//!     .build()
//!     .unwrap();
//! ```

use std::ffi::OsString;
use std::fs::File;
use std::io::Read;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;

use derive_builder::Builder;
use log::debug;
use serde::Deserialize;
use thiserror::Error;

/// Cached zero-pyramid levels. Way more than any reachable level, so the
/// pyramid is unbounded in practice while still having a hard cap.
pub const DEFAULT_ZERO_PYRAMID_CAPACITY: usize = 1024;

// -------------------------------------------------------------------------------------------------
// Main struct.

/// Capacity tuning for a [crate::NodeStore].
///
/// `None` capacities mean unbounded (the default). A bounded store never
/// evicts inside a computation; instead the whole world is compacted between
/// computations (see [crate::Universe]), because the successor memo holds
/// node identities and must be dropped in the same breath as the store.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Builder)]
#[serde(default, deny_unknown_fields)]
pub struct UniverseConfig {
    /// Maximum number of interned non-leaf nodes before a compaction is
    /// scheduled.
    #[builder(default)]
    pub node_store_capacity: Option<NonZeroUsize>,

    /// Maximum number of successor memo entries before a compaction is
    /// scheduled.
    #[builder(default)]
    pub successor_memo_capacity: Option<NonZeroUsize>,

    /// Maximum number of cached canonical empty nodes.
    #[builder(default = "DEFAULT_ZERO_PYRAMID_CAPACITY")]
    pub zero_pyramid_capacity: usize,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        UniverseConfig {
            node_store_capacity: None,
            successor_memo_capacity: None,
            zero_pyramid_capacity: DEFAULT_ZERO_PYRAMID_CAPACITY,
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Deserialization.

/// Supported file types for the deserialization.
enum FileType {
    Toml,
}

impl FromStr for FileType {
    type Err = UniverseConfigError;

    fn from_str(ext: &str) -> Result<FileType, Self::Err> {
        match ext {
            "toml" => Ok(FileType::Toml),
            _ => Err(UniverseConfigError::UnsupportedFileType {
                ext: ext.to_owned(),
            }),
        }
    }
}

impl UniverseConfig {
    /// Parse a config file into a [UniverseConfig]. Fields missing from the
    /// file keep their defaults.
    pub fn deserialize(config_file_path: PathBuf) -> Result<Self, UniverseConfigError> {
        debug!(
            "Attempting to parse {:?} as a file containing a universe config",
            config_file_path.clone().into_os_string()
        );

        let ext = config_file_path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or(UniverseConfigError::UnknownFileType(
                config_file_path.clone().into_os_string(),
            ))?;

        let config = match FileType::from_str(ext)? {
            FileType::Toml => {
                let mut buf = String::new();
                File::open(config_file_path)?.read_to_string(&mut buf)?;
                toml::from_str::<UniverseConfig>(&buf)?
            }
        };

        Ok(config)
    }
}

#[derive(Error, Debug)]
pub enum UniverseConfigError {
    #[error("Unable to find file extension for path {0:?}")]
    UnknownFileType(OsString),
    #[error("Unsupported file type with extension {ext:?}")]
    UnsupportedFileType { ext: String },
    #[error("Error reading the file")]
    FileIo(#[from] std::io::Error),
    #[error("Deserialization error")]
    MalformedConfig(#[from] toml::de::Error),
}

// -------------------------------------------------------------------------------------------------
// Unit tests.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::assert_err;

    #[test]
    fn builder_defaults_match_default() {
        let built = UniverseConfigBuilder::default().build().unwrap();
        assert_eq!(built, UniverseConfig::default());
        assert_eq!(built.zero_pyramid_capacity, DEFAULT_ZERO_PYRAMID_CAPACITY);
        assert!(built.node_store_capacity.is_none());
    }

    #[test]
    fn toml_with_partial_fields_keeps_defaults() {
        let config: UniverseConfig = toml::from_str("node_store_capacity = 16777216").unwrap();

        assert_eq!(
            config.node_store_capacity,
            NonZeroUsize::new(16777216)
        );
        assert!(config.successor_memo_capacity.is_none());
        assert_eq!(config.zero_pyramid_capacity, DEFAULT_ZERO_PYRAMID_CAPACITY);
    }

    #[test]
    fn unknown_toml_field_gives_err() {
        let result = toml::from_str::<UniverseConfig>("max_thread_count = 8");
        assert!(result.is_err());
    }

    #[test]
    fn deserialize_checks_the_file_extension() {
        assert_err!(
            UniverseConfig::deserialize(PathBuf::from("config.json")),
            Err(UniverseConfigError::UnsupportedFileType { .. })
        );
        assert_err!(
            UniverseConfig::deserialize(PathBuf::from("config")),
            Err(UniverseConfigError::UnknownFileType(_))
        );
    }

    #[test]
    fn deserialize_reads_a_toml_file() {
        let path = std::env::temp_dir().join("universe_config_test.toml");
        std::fs::write(&path, "successor_memo_capacity = 4096\n").unwrap();

        let config = UniverseConfig::deserialize(path.clone()).unwrap();
        std::fs::remove_file(path).ok();

        assert_eq!(config.successor_memo_capacity, NonZeroUsize::new(4096));
    }
}
