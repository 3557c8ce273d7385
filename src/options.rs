//! Resolution of the custom Mongoose extensions.
//!
//! The extensions are declared once, typically in a `mongoose/options.proto`
//! that every schema imports:
//!
//! ```proto
//! extend google.protobuf.FieldOptions {
//!   bool unique = 50001;
//!   bool required = 50002;
//!   bool index = 50003;
//! }
//! extend google.protobuf.MessageOptions {
//!   string collection = 50101;
//! }
//! ```
//!
//! Field numbers are not fixed. [`ExtensionRegistry`] finds the declarations
//! by name in the descriptor pool, then each field's and message's options
//! are queried once and turned into plain [`FieldOptions`] / collection-name
//! records.

use prost_reflect::{DescriptorPool, DynamicMessage, ExtensionDescriptor, FileDescriptor};
use serde::Serialize;

const FIELD_OPTIONS: &str = "google.protobuf.FieldOptions";
const MESSAGE_OPTIONS: &str = "google.protobuf.MessageOptions";
const COLLECTION: &str = "collection";

/// A boolean field extension, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldFlag {
    Unique,
    Required,
    Index,
}

impl FieldFlag {
    /// All flags in the order they are emitted.
    pub const ALL: [Self; 3] = [Self::Unique, Self::Required, Self::Index];

    /// Name of the extension declaration, which is also the Mongoose key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Unique => "unique",
            Self::Required => "required",
            Self::Index => "index",
        }
    }
}

/// Field extensions that resolved to `true`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldOptions {
    pub unique: bool,
    pub required: bool,
    pub index: bool,
}

impl FieldOptions {
    pub fn is_empty(&self) -> bool {
        !(self.unique || self.required || self.index)
    }

    pub fn is_set(&self, flag: FieldFlag) -> bool {
        match flag {
            FieldFlag::Unique => self.unique,
            FieldFlag::Required => self.required,
            FieldFlag::Index => self.index,
        }
    }

    fn set(&mut self, flag: FieldFlag) {
        match flag {
            FieldFlag::Unique => self.unique = true,
            FieldFlag::Required => self.required = true,
            FieldFlag::Index => self.index = true,
        }
    }

    /// The flags that are set, always in `unique, required, index` order.
    pub fn flags(&self) -> impl Iterator<Item = FieldFlag> + '_ {
        FieldFlag::ALL.into_iter().filter(|flag| self.is_set(*flag))
    }
}

/// The Mongoose extensions visible to one schema file.
#[derive(Debug, Default, Clone)]
pub struct ExtensionRegistry {
    unique: Option<ExtensionDescriptor>,
    required: Option<ExtensionDescriptor>,
    index: Option<ExtensionDescriptor>,
    collection: Option<ExtensionDescriptor>,
}

impl ExtensionRegistry {
    /// Look up the extension declarations for `file`.
    ///
    /// Extensions are matched by simple name and extended message, in any
    /// package. When several files declare the same name, the one declared
    /// in `file` or one of its direct imports wins over the rest.
    pub fn for_file(pool: &DescriptorPool, file: &FileDescriptor) -> Self {
        let mut visible: Vec<String> = file.dependencies().map(|d| d.name().to_string()).collect();
        visible.push(file.name().to_string());

        let pick = |extendee: &str, name: &str| select_extension(pool, &visible, extendee, name);
        Self {
            unique: pick(FIELD_OPTIONS, FieldFlag::Unique.key()),
            required: pick(FIELD_OPTIONS, FieldFlag::Required.key()),
            index: pick(FIELD_OPTIONS, FieldFlag::Index.key()),
            collection: pick(MESSAGE_OPTIONS, COLLECTION),
        }
    }

    fn flag(&self, flag: FieldFlag) -> Option<&ExtensionDescriptor> {
        match flag {
            FieldFlag::Unique => self.unique.as_ref(),
            FieldFlag::Required => self.required.as_ref(),
            FieldFlag::Index => self.index.as_ref(),
        }
    }

    /// Field number of a flag extension, if declared.
    pub fn flag_number(&self, flag: FieldFlag) -> Option<u32> {
        self.flag(flag).map(ExtensionDescriptor::number)
    }

    pub fn collection_number(&self) -> Option<u32> {
        self.collection.as_ref().map(ExtensionDescriptor::number)
    }

    /// Resolve the flag extensions from a field's `FieldOptions`.
    ///
    /// A flag that is present but false is dropped, same as an absent one.
    pub fn resolve_field(&self, options: &DynamicMessage) -> FieldOptions {
        let mut resolved = FieldOptions::default();
        for flag in FieldFlag::ALL {
            let Some(ext) = self.flag(flag) else {
                continue;
            };
            if options.has_extension(ext) && options.get_extension(ext).as_bool() == Some(true) {
                resolved.set(flag);
            }
        }
        resolved
    }

    /// The `collection` override from a message's `MessageOptions`, verbatim.
    pub fn resolve_collection(&self, options: &DynamicMessage) -> Option<String> {
        let ext = self.collection.as_ref()?;
        if !options.has_extension(ext) {
            return None;
        }
        options.get_extension(ext).as_str().map(str::to_string)
    }
}

fn select_extension(
    pool: &DescriptorPool,
    visible: &[String],
    extendee: &str,
    name: &str,
) -> Option<ExtensionDescriptor> {
    let mut candidates: Vec<ExtensionDescriptor> = pool
        .all_extensions()
        .filter(|ext| ext.name() == name && ext.containing_message().full_name() == extendee)
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let chosen = candidates
        .iter()
        .position(|ext| visible.iter().any(|f| f == ext.parent_file().name()))
        .unwrap_or(0);
    for (i, ignored) in candidates.iter().enumerate() {
        if i != chosen {
            tracing::debug!(
                extension = ignored.full_name(),
                chosen = candidates[chosen].full_name(),
                "ignoring extension with the same name"
            );
        }
    }
    Some(candidates.swap_remove(chosen))
}

/// Default collection name: lower-cased message name plus a literal `s`.
///
/// This does not know about irregular plurals; `Person` becomes `persons`
/// and `Address` becomes `addresss`.
pub fn default_collection_name(message_name: &str) -> String {
    format!("{}s", message_name.to_lowercase())
}
