//! Decoding of the protoc plugin request.
//!
//! Custom options travel as extension fields of `FieldOptions` and
//! `MessageOptions`. `prost_types` drops those as unknown fields, so the
//! descriptor files are handed to prost-reflect still encoded: its
//! [`DescriptorPool::decode`] keeps extension options and resolves them
//! against the extensions declared in the same pool.

use std::path::Path;

use prost::Message;
use prost_reflect::DescriptorPool;
use prost_types::compiler::CodeGeneratorRequest;

use crate::error::{Error, Result};

/// A decoded plugin request.
#[derive(Debug, Clone)]
pub struct PluginRequest {
    /// Files explicitly listed on the protoc command line.
    pub file_to_generate: Vec<String>,
    /// Parameter string passed via `--mongoose_opt`.
    pub parameter: Option<String>,
    /// Every file in the request, with extension options intact.
    pub pool: DescriptorPool,
}

/// `CodeGeneratorRequest.proto_file`, each entry left encoded.
#[derive(Clone, PartialEq, Message)]
struct EncodedProtoFiles {
    #[prost(bytes = "vec", repeated, tag = "15")]
    proto_file: Vec<Vec<u8>>,
}

/// A `FileDescriptorSet` assembled from already-encoded files.
#[derive(Clone, PartialEq, Message)]
struct EncodedFileSet {
    #[prost(bytes = "vec", repeated, tag = "1")]
    file: Vec<Vec<u8>>,
}

/// Decode a plugin request from the raw bytes protoc sent on stdin.
pub fn decode_request(bytes: &[u8]) -> Result<PluginRequest> {
    let request = CodeGeneratorRequest::decode(bytes)?;
    let encoded = EncodedProtoFiles::decode(bytes)?;
    let set = EncodedFileSet {
        file: encoded.proto_file,
    };
    let pool = DescriptorPool::decode(set.encode_to_vec().as_slice())?;

    Ok(PluginRequest {
        file_to_generate: request.file_to_generate,
        parameter: request.parameter,
        pool,
    })
}

/// Load a serialized `FileDescriptorSet` from disk.
///
/// Produce one with `protoc --include_imports -o set.pb <files>` so that the
/// custom option declarations travel with the messages that use them.
pub fn load_descriptor_set(path: &Path) -> Result<DescriptorPool> {
    let bytes = std::fs::read(path).map_err(|e| Error::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(DescriptorPool::decode(bytes.as_slice())?)
}
