//! Shared request fixtures.
//!
//! Requests are built by hand the way protoc would send them: the options
//! declaration file, `google/protobuf/descriptor.proto` and
//! `google/protobuf/timestamp.proto` travel alongside the files being
//! generated. `prost_types` cannot carry custom option values, so these
//! mirrors of the descriptor messages keep `options` as raw bytes.

#![allow(dead_code)]

use prost::encoding::{WireType, encode_key, encode_varint};
use prost_types::field_descriptor_proto::Type;

pub const UNIQUE: u32 = 50001;
pub const REQUIRED: u32 = 50002;
pub const INDEX: u32 = 50003;
pub const COLLECTION: u32 = 50101;

const LABEL_OPTIONAL: i32 = 1;

#[derive(Clone, PartialEq, prost::Message)]
pub struct CodeGeneratorRequest {
    #[prost(string, repeated, tag = "1")]
    pub file_to_generate: Vec<String>,
    #[prost(string, optional, tag = "2")]
    pub parameter: Option<String>,
    #[prost(message, repeated, tag = "15")]
    pub proto_file: Vec<FileDescriptorProto>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct FileDescriptorSet {
    #[prost(message, repeated, tag = "1")]
    pub file: Vec<FileDescriptorProto>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct FileDescriptorProto {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub package: Option<String>,
    #[prost(string, repeated, tag = "3")]
    pub dependency: Vec<String>,
    #[prost(message, repeated, tag = "4")]
    pub message_type: Vec<DescriptorProto>,
    #[prost(message, repeated, tag = "5")]
    pub enum_type: Vec<EnumDescriptorProto>,
    #[prost(message, repeated, tag = "7")]
    pub extension: Vec<FieldDescriptorProto>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DescriptorProto {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(message, repeated, tag = "2")]
    pub field: Vec<FieldDescriptorProto>,
    #[prost(message, repeated, tag = "5")]
    pub extension_range: Vec<ExtensionRange>,
    #[prost(bytes = "vec", optional, tag = "7")]
    pub options: Option<Vec<u8>>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ExtensionRange {
    #[prost(int32, optional, tag = "1")]
    pub start: Option<i32>,
    #[prost(int32, optional, tag = "2")]
    pub end: Option<i32>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct FieldDescriptorProto {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub extendee: Option<String>,
    #[prost(int32, optional, tag = "3")]
    pub number: Option<i32>,
    #[prost(int32, optional, tag = "4")]
    pub label: Option<i32>,
    #[prost(int32, optional, tag = "5")]
    pub r#type: Option<i32>,
    #[prost(string, optional, tag = "6")]
    pub type_name: Option<String>,
    #[prost(bytes = "vec", optional, tag = "8")]
    pub options: Option<Vec<u8>>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct EnumDescriptorProto {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(message, repeated, tag = "2")]
    pub value: Vec<EnumValueDescriptorProto>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct EnumValueDescriptorProto {
    #[prost(string, optional, tag = "1")]
    pub name: Option<String>,
    #[prost(int32, optional, tag = "2")]
    pub number: Option<i32>,
}

// ── Option payloads ────────────────────────────────────────────────────

/// Encoded `FieldOptions` setting the given boolean extensions, in order.
pub fn flags(set: &[(u32, bool)]) -> Vec<u8> {
    let mut raw = Vec::new();
    for (number, value) in set {
        encode_key(*number, WireType::Varint, &mut raw);
        encode_varint(u64::from(*value), &mut raw);
    }
    raw
}

/// Encoded `MessageOptions` with a collection override.
pub fn collection(name: &str) -> Vec<u8> {
    string_option(COLLECTION, name)
}

pub fn string_option(number: u32, value: &str) -> Vec<u8> {
    let mut raw = Vec::new();
    encode_key(number, WireType::LengthDelimited, &mut raw);
    encode_varint(value.len() as u64, &mut raw);
    raw.extend_from_slice(value.as_bytes());
    raw
}

/// An unrelated option encoded as a group holding one varint.
pub fn group_option(number: u32) -> Vec<u8> {
    let mut raw = Vec::new();
    encode_key(number, WireType::StartGroup, &mut raw);
    encode_key(1, WireType::Varint, &mut raw);
    encode_varint(7, &mut raw);
    encode_key(number, WireType::EndGroup, &mut raw);
    raw
}

// ── Descriptor builders ────────────────────────────────────────────────

fn options_message(name: &str) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        extension_range: vec![ExtensionRange {
            start: Some(1000),
            end: Some(536_870_912),
        }],
        ..Default::default()
    }
}

/// The parts of `descriptor.proto` that custom options extend.
pub fn descriptor_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("google/protobuf/descriptor.proto".to_string()),
        package: Some("google.protobuf".to_string()),
        message_type: vec![
            options_message("FieldOptions"),
            options_message("MessageOptions"),
        ],
        ..Default::default()
    }
}

pub fn extension(name: &str, number: u32, ty: Type, extendee: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        extendee: Some(extendee.to_string()),
        number: Some(number as i32),
        label: Some(LABEL_OPTIONAL),
        r#type: Some(ty as i32),
        ..Default::default()
    }
}

/// An extension-declaration file for the given package and numbers.
pub fn extensions_file(
    name: &str,
    package: &str,
    [unique, required, index, collection]: [u32; 4],
) -> FileDescriptorProto {
    let field_options = ".google.protobuf.FieldOptions";
    FileDescriptorProto {
        name: Some(name.to_string()),
        package: Some(package.to_string()),
        dependency: vec!["google/protobuf/descriptor.proto".to_string()],
        extension: vec![
            extension("unique", unique, Type::Bool, field_options),
            extension("required", required, Type::Bool, field_options),
            extension("index", index, Type::Bool, field_options),
            extension(
                "collection",
                collection,
                Type::String,
                ".google.protobuf.MessageOptions",
            ),
        ],
        ..Default::default()
    }
}

pub fn options_file() -> FileDescriptorProto {
    extensions_file(
        "mongoose/options.proto",
        "mongoose",
        [UNIQUE, REQUIRED, INDEX, COLLECTION],
    )
}

pub fn timestamp_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("google/protobuf/timestamp.proto".to_string()),
        package: Some("google.protobuf".to_string()),
        message_type: vec![message(
            "Timestamp",
            vec![
                scalar("seconds", Type::Int64, &[]),
                scalar("nanos", Type::Int32, &[]),
            ],
            None,
        )],
        ..Default::default()
    }
}

pub fn scalar(name: &str, ty: Type, opts: &[(u32, bool)]) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        label: Some(LABEL_OPTIONAL),
        r#type: Some(ty as i32),
        options: (!opts.is_empty()).then(|| flags(opts)),
        ..Default::default()
    }
}

pub fn reference(name: &str, ty: Type, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        label: Some(LABEL_OPTIONAL),
        r#type: Some(ty as i32),
        type_name: Some(type_name.to_string()),
        ..Default::default()
    }
}

/// A message whose fields are numbered in declaration order.
pub fn message(
    name: &str,
    mut fields: Vec<FieldDescriptorProto>,
    options: Option<Vec<u8>>,
) -> DescriptorProto {
    for (i, field) in fields.iter_mut().enumerate() {
        field.number.get_or_insert(i as i32 + 1);
    }
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        options,
        ..Default::default()
    }
}

pub fn app_file(
    name: &str,
    dependency: &[&str],
    messages: Vec<DescriptorProto>,
) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.to_string()),
        package: Some("app".to_string()),
        dependency: dependency.iter().map(|s| s.to_string()).collect(),
        message_type: messages,
        ..Default::default()
    }
}

pub fn user_file() -> FileDescriptorProto {
    app_file(
        "app/user.proto",
        &["mongoose/options.proto"],
        vec![message(
            "User",
            vec![
                scalar("id", Type::String, &[(UNIQUE, true)]),
                scalar("email", Type::String, &[(REQUIRED, true)]),
                scalar("name", Type::String, &[(INDEX, true)]),
            ],
            None,
        )],
    )
}

pub fn event_file() -> FileDescriptorProto {
    let mut file = app_file(
        "app/event.proto",
        &["mongoose/options.proto", "google/protobuf/timestamp.proto"],
        vec![
            message(
                "Event",
                vec![
                    reference("occurredAt", Type::Message, ".google.protobuf.Timestamp"),
                    reference("payload", Type::Message, ".app.Payload"),
                    reference("status", Type::Enum, ".app.Status"),
                    scalar("attempts", Type::Uint32, &[]),
                    scalar("score", Type::Double, &[]),
                    scalar("archived", Type::Bool, &[]),
                    scalar("blob", Type::Bytes, &[]),
                    // Flags declared in reverse, one explicitly false.
                    scalar(
                        "code",
                        Type::String,
                        &[(INDEX, true), (REQUIRED, false), (UNIQUE, true)],
                    ),
                ],
                Some(collection("audit_log")),
            ),
            message("Payload", vec![scalar("body", Type::String, &[])], None),
        ],
    );
    file.enum_type.push(EnumDescriptorProto {
        name: Some("Status".to_string()),
        value: vec![EnumValueDescriptorProto {
            name: Some("STATUS_UNKNOWN".to_string()),
            number: Some(0),
        }],
    });
    file
}

/// Every fixture file, dependencies first.
pub fn all_files() -> Vec<FileDescriptorProto> {
    vec![
        descriptor_file(),
        options_file(),
        timestamp_file(),
        user_file(),
        event_file(),
    ]
}

pub fn request(files_to_generate: &[&str], parameter: Option<&str>) -> CodeGeneratorRequest {
    CodeGeneratorRequest {
        file_to_generate: files_to_generate.iter().map(|s| s.to_string()).collect(),
        parameter: parameter.map(str::to_string),
        proto_file: all_files(),
    }
}

pub fn tempdir() -> std::path::PathBuf {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let id = COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!(
        "protoc-gen-mongoose-test-{}-{}",
        std::process::id(),
        id
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
