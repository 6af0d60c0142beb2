//! TOML configuration file support for the convert command.
//!
//! Settings not given on the command line can come from a file:
//!
//! ```toml
//! # mzxml.toml
//! [read]
//! default_schema = "3.1"
//! buffer_size = 131072
//!
//! [write]
//! escape_text = true
//! write_index = true
//! ```

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::Path;

use mzxml::mzxml::{ReaderConfig, SchemaVersion, WriterConfig};

/// Root configuration structure for mzxml.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Reader settings.
    #[serde(default)]
    pub read: ReadConfig,

    /// Writer settings.
    #[serde(default)]
    pub write: WriteConfig,
}

/// Settings applied when loading the input.
#[derive(Debug, Default, Deserialize)]
pub struct ReadConfig {
    /// Schema assumed when a document names none, e.g. "2.1".
    pub default_schema: Option<String>,

    /// Capacity of the file read buffer in bytes.
    pub buffer_size: Option<usize>,
}

/// Settings applied when storing the output.
#[derive(Debug, Default, Deserialize)]
pub struct WriteConfig {
    /// Escape markup characters in free text.
    pub escape_text: Option<bool>,

    /// Record scan offsets in the index.
    pub write_index: Option<bool>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Reader configuration with the file's values over the defaults.
    pub fn reader_config(&self) -> Result<ReaderConfig> {
        let mut config = ReaderConfig::default();
        if let Some(schema) = &self.read.default_schema {
            let schema: SchemaVersion = schema
                .parse()
                .map_err(|e: String| anyhow!(e))
                .context("Invalid [read] default_schema")?;
            config = config.with_default_schema(schema);
        }
        if let Some(buffer_size) = self.read.buffer_size {
            config = config.with_buffer_size(buffer_size);
        }
        Ok(config)
    }

    /// Writer configuration with the file's values over the defaults.
    pub fn writer_config(&self) -> WriterConfig {
        let mut config = WriterConfig::default();
        if let Some(escape_text) = self.write.escape_text {
            config = config.with_escape_text(escape_text);
        }
        if let Some(write_index) = self.write.write_index {
            config = config.with_index(write_index);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [read]
            default_schema = "3.1"
            buffer_size = 131072

            [write]
            escape_text = true
            write_index = false
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.read.default_schema.as_deref(), Some("3.1"));
        assert_eq!(config.read.buffer_size, Some(131_072));
        assert_eq!(config.write.escape_text, Some(true));
        assert_eq!(config.write.write_index, Some(false));

        let reader = config.reader_config().unwrap();
        assert_eq!(reader.default_schema, SchemaVersion::Mzxml3_1);
        assert_eq!(reader.buffer_size, 131_072);
        let writer = config.writer_config();
        assert!(writer.escape_text);
        assert!(!writer.write_index);
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [write]
            escape_text = true
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.write.escape_text, Some(true));
        assert_eq!(config.write.write_index, None);
        assert!(config.writer_config().write_index);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.read.default_schema, None);
        assert_eq!(
            config.reader_config().unwrap().default_schema,
            SchemaVersion::CURRENT
        );
    }

    #[test]
    fn test_invalid_schema() {
        let config = Config::from_str("[read]\ndefault_schema = \"9.9\"\n").unwrap();
        assert!(config.reader_config().is_err());
    }
}
