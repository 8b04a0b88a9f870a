//! Structured documents on disk (the project manifest)
//!
//! The document format follows the file extension. Writes go through
//! [`io::write_atomic`], so a reader never sees a half-written manifest.

use std::fmt;

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, NormalizedPath, Result, io};

/// Serialization format of a document, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Toml,
    Json,
}

impl Format {
    /// Format for `path`: `.yml`/`.yaml`, `.toml` or `.json`, in any case.
    pub fn of(path: &NormalizedPath) -> Result<Self> {
        let extension = path.extension().unwrap_or_default();
        match extension.to_ascii_lowercase().as_str() {
            "yml" | "yaml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    fn decode<T: DeserializeOwned>(self, text: &str) -> std::result::Result<T, String> {
        match self {
            Self::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
            Self::Toml => toml::from_str(text).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        }
    }

    fn encode<T: Serialize>(self, value: &T) -> std::result::Result<String, String> {
        match self {
            Self::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
            Self::Toml => toml::to_string_pretty(value).map_err(|e| e.to_string()),
            Self::Json => serde_json::to_string_pretty(value)
                .map(|json| json + "\n")
                .map_err(|e| e.to_string()),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Yaml => "YAML",
            Self::Toml => "TOML",
            Self::Json => "JSON",
        })
    }
}

/// Read and deserialize the document at `path`.
pub fn read_document<T: DeserializeOwned>(path: &NormalizedPath) -> Result<T> {
    let format = Format::of(path)?;
    let text = io::read_text(path)?;
    format.decode(&text).map_err(|message| Error::ConfigParse {
        path: path.to_native(),
        format,
        message,
    })
}

/// Serialize `value` and replace the document at `path` with it.
pub fn write_document<T: Serialize>(path: &NormalizedPath, value: &T) -> Result<()> {
    let format = Format::of(path)?;
    let text = format.encode(value).map_err(|message| Error::ConfigSerialize {
        path: path.to_native(),
        format,
        message,
    })?;
    io::write_atomic(path, text.as_bytes())
}
