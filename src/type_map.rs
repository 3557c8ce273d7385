//! Maps protobuf field kinds to Mongoose schema types.
//!
//! # Type Mapping Table
//!
//! | Protobuf kind | Mongoose type | Notes |
//! |---------------|---------------|-------|
//! | `double`, `float`, `int32`, `int64`, `uint32`, `uint64`, `sint*`, `fixed*`, `sfixed*` | `Number` | |
//! | `string` | `String` | |
//! | `bool` | `Boolean` | |
//! | `bytes` | `Buffer` | |
//! | `google.protobuf.Timestamp` | `Date` | The only recognized well-known type |
//! | any other message | `Schema.Types.Mixed` | Nested structure is left untyped |
//! | enum | `String` | Stores the symbolic name, not the number |
//! | Unknown scalar codes | `String` | Fallback, not an error |

use prost_reflect::{FieldDescriptor, Kind};
use prost_types::field_descriptor_proto::Type;
use serde::Serialize;

/// Fully-qualified name of the well-known timestamp type.
pub const TIMESTAMP_TYPE: &str = "google.protobuf.Timestamp";

/// The declared kind of a protobuf field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// A built-in scalar, carried as its raw descriptor type code.
    Scalar(i32),
    /// A reference to another message, by fully-qualified name.
    Message(String),
    /// A reference to an enum, by fully-qualified name.
    Enum(String),
}

impl FieldKind {
    /// Classify a resolved field. Groups count as messages.
    pub fn from_field(field: &FieldDescriptor) -> Self {
        let scalar = |ty: Type| Self::Scalar(ty as i32);
        match field.kind() {
            Kind::Message(message) => Self::Message(message.full_name().to_string()),
            Kind::Enum(en) => Self::Enum(en.full_name().to_string()),
            Kind::Double => scalar(Type::Double),
            Kind::Float => scalar(Type::Float),
            Kind::Int32 => scalar(Type::Int32),
            Kind::Int64 => scalar(Type::Int64),
            Kind::Uint32 => scalar(Type::Uint32),
            Kind::Uint64 => scalar(Type::Uint64),
            Kind::Sint32 => scalar(Type::Sint32),
            Kind::Sint64 => scalar(Type::Sint64),
            Kind::Fixed32 => scalar(Type::Fixed32),
            Kind::Fixed64 => scalar(Type::Fixed64),
            Kind::Sfixed32 => scalar(Type::Sfixed32),
            Kind::Sfixed64 => scalar(Type::Sfixed64),
            Kind::Bool => scalar(Type::Bool),
            Kind::String => scalar(Type::String),
            Kind::Bytes => scalar(Type::Bytes),
        }
    }
}

/// The Mongoose primitive a field is emitted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TargetFieldType {
    String,
    Number,
    Boolean,
    BinaryBuffer,
    Date,
    MixedOrOpaque,
}

impl TargetFieldType {
    /// The expression naming this type in a Mongoose schema.
    pub fn as_mongoose(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Number => "Number",
            Self::Boolean => "Boolean",
            Self::BinaryBuffer => "Buffer",
            Self::Date => "Date",
            Self::MixedOrOpaque => "Schema.Types.Mixed",
        }
    }
}

/// Map a field kind to the Mongoose type it is stored as.
pub fn map_field_kind(kind: &FieldKind) -> TargetFieldType {
    match kind {
        FieldKind::Scalar(code) => map_scalar(*code),
        FieldKind::Message(type_name) if is_timestamp(type_name) => TargetFieldType::Date,
        FieldKind::Message(_) => TargetFieldType::MixedOrOpaque,
        FieldKind::Enum(_) => TargetFieldType::String,
    }
}

/// Map a raw scalar type code.
///
/// Codes that are not scalars (message, enum, group) or that are unknown to
/// this protobuf version fall back to `String`.
pub fn map_scalar(code: i32) -> TargetFieldType {
    match Type::try_from(code) {
        Ok(
            Type::Double
            | Type::Float
            | Type::Int64
            | Type::Uint64
            | Type::Int32
            | Type::Fixed64
            | Type::Fixed32
            | Type::Uint32
            | Type::Sfixed32
            | Type::Sfixed64
            | Type::Sint32
            | Type::Sint64,
        ) => TargetFieldType::Number,
        Ok(Type::Bool) => TargetFieldType::Boolean,
        Ok(Type::String) => TargetFieldType::String,
        Ok(Type::Bytes) => TargetFieldType::BinaryBuffer,
        Ok(Type::Group | Type::Message | Type::Enum) | Err(_) => TargetFieldType::String,
    }
}

/// protoc always emits a leading dot on resolved type names; hand-built
/// descriptors may not.
fn is_timestamp(type_name: &str) -> bool {
    type_name.strip_prefix('.').unwrap_or(type_name) == TIMESTAMP_TYPE
}
