//! The resolved message model and descriptor ingestion.
//!
//! [`ingest`] turns the descriptor files of one generation run into
//! [`SchemaFile`]s whose messages carry fully resolved options. Nothing is
//! re-queried after this point; the emitter works only on this model.

use prost_reflect::{DescriptorPool, FieldDescriptor, FileDescriptor, MessageDescriptor};
use serde::Serialize;
use crate::error::{Error, Result};
use crate::options::{ExtensionRegistry, FieldOptions, default_collection_name};
use crate::type_map::{FieldKind, TargetFieldType, map_field_kind};

/// Files whose name contains this marker declare extensions, not documents.
pub const OPTIONS_FILE_MARKER: &str = "options";

/// One `.proto` file selected for generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaFile {
    pub name: String,
    pub messages: Vec<Message>,
}

impl SchemaFile {
    pub fn should_skip(&self) -> bool {
        should_skip(&self.name, self.messages.len())
    }
}

/// A top-level message with its resolved collection name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub name: String,
    /// Declaration order.
    pub fields: Vec<Field>,
    /// Never empty.
    pub collection_name: String,
}

impl Message {
    /// Build a message, falling back to the default collection name when
    /// there is no override.
    pub fn new(name: impl Into<String>, fields: Vec<Field>, collection: Option<String>) -> Self {
        let name = name.into();
        let collection_name = collection
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| default_collection_name(&name));
        Self {
            name,
            fields,
            collection_name,
        }
    }
}

/// A message field with its mapped type and resolved flags.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    pub target: TargetFieldType,
    pub options: FieldOptions,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldKind, options: FieldOptions) -> Self {
        let target = map_field_kind(&kind);
        Self {
            name: name.into(),
            kind,
            target,
            options,
        }
    }
}

/// Result of ingesting a descriptor set.
#[derive(Debug, Default)]
pub struct Ingested {
    /// Files that produce schemas, in input order.
    pub files: Vec<SchemaFile>,
    /// Candidate files that were skipped.
    pub skipped: Vec<String>,
}

/// Skip files with no messages, and extension-declaration files.
pub fn should_skip(file_name: &str, message_count: usize) -> bool {
    message_count == 0 || file_name.contains(OPTIONS_FILE_MARKER)
}

/// Select and resolve the files to generate.
///
/// `requested` names the candidates, in the order to generate them; when
/// empty, every file in the pool is a candidate. Extension declarations are
/// looked up across the whole pool regardless.
pub fn ingest(pool: &DescriptorPool, requested: &[String]) -> Result<Ingested> {
    let candidates = select_candidates(pool, requested)?;

    let mut ingested = Ingested::default();
    for file in candidates {
        if should_skip(file.name(), file.messages().len()) {
            tracing::debug!(file = file.name(), "skipping file");
            ingested.skipped.push(file.name().to_string());
            continue;
        }
        let registry = ExtensionRegistry::for_file(pool, &file);
        let messages = file
            .messages()
            .map(|message| resolve_message(&registry, &message))
            .collect();
        ingested.files.push(SchemaFile {
            name: file.name().to_string(),
            messages,
        });
    }
    Ok(ingested)
}

fn select_candidates(pool: &DescriptorPool, requested: &[String]) -> Result<Vec<FileDescriptor>> {
    if requested.is_empty() {
        return Ok(pool.files().collect());
    }
    requested
        .iter()
        .map(|name| {
            pool.get_file_by_name(name)
                .ok_or_else(|| file_not_found(pool, name))
        })
        .collect()
}

fn file_not_found(pool: &DescriptorPool, name: &str) -> Error {
    let available: Vec<String> = pool.files().map(|f| f.name().to_string()).collect();
    Error::FileNotFound {
        name: name.to_string(),
        available: if available.len() > 10 {
            format!(
                "{} ... and {} more",
                available[..10].join(", "),
                available.len() - 10
            )
        } else {
            available.join(", ")
        },
    }
}

fn resolve_message(registry: &ExtensionRegistry, message: &MessageDescriptor) -> Message {
    let fields = message
        .fields()
        .map(|field| resolve_field(registry, &field))
        .collect();
    let collection = registry.resolve_collection(&message.options());
    Message::new(message.name(), fields, collection)
}

fn resolve_field(registry: &ExtensionRegistry, field: &FieldDescriptor) -> Field {
    let options = registry.resolve_field(&field.options());
    let resolved = Field::new(field.name(), FieldKind::from_field(field), options);
    tracing::trace!(
        field = %resolved.name,
        target = ?resolved.target,
        options = ?resolved.options,
        "resolved field"
    );
    resolved
}
