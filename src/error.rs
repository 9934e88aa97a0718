use std::path::PathBuf;
use thiserror::Error;

/// Everything that can abort a run. There is no partial-result mode, so every
/// variant is fatal and bubbles up to `main`.
#[derive(Error, Debug)]
pub enum BiomeColorError {
    #[error("texture not found or unreadable: {path} ({reason})")]
    AssetNotFound { path: PathBuf, reason: String },

    #[error("malformed definition for '{biome}': {detail}")]
    MalformedDefinition { biome: String, detail: String },

    #[error("biome '{0}' has no texture samples")]
    EmptyBiome(String),

    #[error("variant '{variant}' references unknown biome '{source_name}'")]
    UnknownSourceBiome {
        variant: String,
        source_name: String,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

impl BiomeColorError {
    pub fn malformed(biome: &str, detail: impl Into<String>) -> Self {
        Self::MalformedDefinition {
            biome: biome.to_string(),
            detail: detail.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BiomeColorError>;
