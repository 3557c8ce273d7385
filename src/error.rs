//! Error types for the protoc-gen-mongoose crate.

use std::path::PathBuf;

/// Errors that can occur while generating Mongoose schemas.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The plugin request or descriptor set is not valid protobuf.
    #[error("failed to decode descriptor input: {0}")]
    Decode(#[from] prost::DecodeError),

    /// The descriptor files decode but do not form a consistent schema,
    /// e.g. a missing import or an unresolved type name.
    #[error("invalid descriptor set: {0}")]
    Descriptor(#[from] prost_reflect::DescriptorError),

    /// The plugin parameter string contains an unknown key or value.
    #[error("invalid plugin parameter '{0}' (expected target=ts or target=js)")]
    Parameter(String),

    /// A file requested for generation is not part of the descriptor set.
    #[error("file '{name}' not found in descriptor set (available: {available})")]
    FileNotFound { name: String, available: String },

    /// Failed to write generated schema files.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read a file from disk.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to talk to the host over stdin/stdout.
    #[error("plugin i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
