//! Generate Mongoose schemas from Protocol Buffer messages.
//!
//! `protoc-gen-mongoose` is a `protoc` plugin. For every top-level message in
//! the files being compiled it emits one module exporting a Mongoose
//! `Schema`, translating protobuf field types and a small set of custom
//! options into Mongoose's vocabulary.
//!
//! # Features
//!
//! - Maps protobuf scalars, enums and `google.protobuf.Timestamp` to
//!   Mongoose types; other nested messages become `Schema.Types.Mixed`
//! - Honors `unique`, `required` and `index` field options and a
//!   `collection` message option declared in the schema's own options file
//! - Preserves field declaration order
//! - Skips extension-declaration files and files without messages
//! - Deterministic output: byte-identical across runs
//!
//! # Usage
//!
//! ```text
//! protoc --plugin=protoc-gen-mongoose --mongoose_out=models \
//!        --mongoose_opt=target=ts user.proto
//! ```
//!
//! or, from Rust, with the raw request bytes:
//!
//! ```no_run
//! let request = std::fs::read("request.bin")?;
//! let response = protoc_gen_mongoose::generate_from_bytes(&request)?;
//! eprintln!("generated {} schemas", response.file.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod codegen;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod options;
pub mod schema;
pub mod type_map;

use prost_types::compiler::CodeGeneratorResponse;

use crate::codegen::Artifact;
use crate::config::Config;
use crate::descriptor::PluginRequest;
use crate::error::Result;

/// Run the generator over a decoded plugin request.
pub fn generate_artifacts(request: &PluginRequest) -> Result<Vec<Artifact>> {
    let config = Config::from_parameter(request.parameter.as_deref())?;
    let ingested = schema::ingest(&request.pool, &request.file_to_generate)?;
    let (artifacts, _) = codegen::generate(&ingested, config.target);
    Ok(artifacts)
}

/// Decode a plugin request and produce the response for the host.
///
/// Any error is fatal: the caller decides how to report it, typically via
/// [`codegen::error_response`].
pub fn generate_from_bytes(bytes: &[u8]) -> Result<CodeGeneratorResponse> {
    let request = descriptor::decode_request(bytes)?;
    let artifacts = generate_artifacts(&request)?;
    Ok(codegen::build_response(artifacts))
}
