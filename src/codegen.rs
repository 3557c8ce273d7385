//! Mongoose schema code generation.
//!
//! Every message of every ingested file becomes one artifact:
//!
//! ```text
//! // Code generated by protoc-gen-mongoose. DO NOT EDIT.
//! // source: user.proto
//!
//! import { Schema } from 'mongoose';
//!
//! export const UserSchema = new Schema({
//!   id: { type: String, unique: true },
//!   age: Number
//! }, {
//!   collection: 'users',
//!   timestamps: true
//! });
//! ```
//!
//! Rendering is a pure function of the resolved [`Message`]: identical input
//! always produces byte-identical output. Artifacts are returned to the
//! caller; only [`write_artifacts`] touches the filesystem.

use std::fmt::Write;
use std::path::Path;

use prost_types::compiler::CodeGeneratorResponse;
use prost_types::compiler::code_generator_response::{Feature, File};
use serde::Serialize;

use crate::config::Target;
use crate::error::{Error, Result};
use crate::schema::{Field, Ingested, Message};

/// One generated file, named relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub name: String,
    pub content: String,
}

/// Statistics collected during generation for reporting.
#[derive(Debug, Default, Serialize)]
pub struct GenerationStats {
    pub files_processed: usize,
    pub files_skipped: usize,
    pub schemas_generated: usize,
}

/// Render every message of the ingested files, in input order.
pub fn generate(ingested: &Ingested, target: Target) -> (Vec<Artifact>, GenerationStats) {
    let mut stats = GenerationStats {
        files_skipped: ingested.skipped.len(),
        ..Default::default()
    };
    let mut artifacts = Vec::new();

    for file in &ingested.files {
        for message in &file.messages {
            let artifact = Artifact {
                name: artifact_name(&message.name, target),
                content: render_message(&file.name, message, target),
            };
            tracing::debug!(source = %file.name, artifact = %artifact.name, "generated schema");
            artifacts.push(artifact);
            stats.schemas_generated += 1;
        }
        stats.files_processed += 1;
    }

    (artifacts, stats)
}

/// `User` → `user.schema.ts`.
pub fn artifact_name(message_name: &str, target: Target) -> String {
    format!("{}{}", message_name.to_lowercase(), target.file_suffix())
}

/// The export a message's schema is bound to: `User` → `UserSchema`.
pub fn export_name(message_name: &str) -> String {
    format!("{message_name}Schema")
}

/// Render the schema module for one message.
pub fn render_message(source_file: &str, message: &Message, target: Target) -> String {
    let mut out = String::new();

    writeln!(out, "// Code generated by protoc-gen-mongoose. DO NOT EDIT.").unwrap();
    writeln!(out, "// source: {source_file}").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "{}", target.import_statement()).unwrap();
    writeln!(out).unwrap();
    writeln!(
        out,
        "{} = new Schema({{",
        target.export_binding(&export_name(&message.name))
    )
    .unwrap();

    let last = message.fields.len().saturating_sub(1);
    for (i, field) in message.fields.iter().enumerate() {
        let separator = if i == last { "" } else { "," };
        writeln!(out, "  {}{separator}", field_entry(field)).unwrap();
    }

    writeln!(out, "}}, {{").unwrap();
    writeln!(
        out,
        "  collection: '{}',",
        escape_single_quoted(&message.collection_name)
    )
    .unwrap();
    writeln!(out, "  timestamps: true").unwrap();
    writeln!(out, "}});").unwrap();

    out
}

/// `name: Type`, or `name: { type: Type, <flags> }` when any flag is set.
fn field_entry(field: &Field) -> String {
    let ty = field.target.as_mongoose();
    if field.options.is_empty() {
        return format!("{}: {ty}", field.name);
    }

    let mut entry = format!("{}: {{ type: {ty}", field.name);
    for flag in field.options.flags() {
        write!(entry, ", {}: true", flag.key()).unwrap();
    }
    entry.push_str(" }");
    entry
}

/// The collection name is emitted verbatim; only the characters that would
/// end the literal are escaped.
fn escape_single_quoted(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

// ── Host hand-off ──────────────────────────────────────────────────────

/// Wrap generated artifacts in a plugin response.
pub fn build_response(artifacts: Vec<Artifact>) -> CodeGeneratorResponse {
    CodeGeneratorResponse {
        supported_features: Some(Feature::Proto3Optional as u64),
        file: artifacts
            .into_iter()
            .map(|a| File {
                name: Some(a.name),
                content: Some(a.content),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

/// A response that reports a fatal error and carries no files.
pub fn error_response(err: &Error) -> CodeGeneratorResponse {
    CodeGeneratorResponse {
        error: Some(err.to_string()),
        supported_features: Some(Feature::Proto3Optional as u64),
        ..Default::default()
    }
}

/// Write artifacts under `output_dir`, creating directories as needed.
pub fn write_artifacts(output_dir: &Path, artifacts: &[Artifact]) -> Result<()> {
    for artifact in artifacts {
        write_file(&output_dir.join(&artifact.name), &artifact.content)?;
    }
    Ok(())
}

/// Write content to a file, creating parent directories as needed.
fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::Write {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, content).map_err(|e| Error::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}
