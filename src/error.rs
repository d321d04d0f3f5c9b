use std::path::PathBuf;

/// Errors raised around the synthesis engine: reading inputs, parsing
/// configuration and type catalogues, writing output.
///
/// The engine itself never fails; see [`crate::synth::Diagnostics`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid metadata in {origin}: {source}")]
    Metadata {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid type catalogue in {origin}: {source}")]
    Catalog {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration in {origin}: {source}")]
    ConfigSyntax {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid URL {url}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported location {0}")]
    UnsupportedLocation(String),

    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("failed to render schema: {0}")]
    Render(String),

    #[error("failed to serialize schema: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
