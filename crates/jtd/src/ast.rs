//! Schema AST.
//!
//! Schemas are stored in a flat arena rather than as owned trees so that
//! definitions can reference one another (including themselves) without
//! `Rc`/`RefCell`. A [`Schema`] is just an arena plus the `NodeId` of its
//! root and the name-to-node map of its `definitions`.

use indexmap::IndexMap;

/// Index into a [`Schema`]'s arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// The eight JTD schema forms (RFC 8927 §2.2), plus the `nullable` wrapper
/// which applies uniformly across all of them.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub nullable: bool,
    pub form: Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    Boolean,
    String,
    Timestamp,
    Float32,
    Float64,
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
}

impl PrimitiveType {
    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::String => "string",
            PrimitiveType::Timestamp => "timestamp",
            PrimitiveType::Float32 => "float32",
            PrimitiveType::Float64 => "float64",
            PrimitiveType::Int8 => "int8",
            PrimitiveType::Uint8 => "uint8",
            PrimitiveType::Int16 => "int16",
            PrimitiveType::Uint16 => "uint16",
            PrimitiveType::Int32 => "int32",
            PrimitiveType::Uint32 => "uint32",
        }
    }

    pub fn from_keyword(s: &str) -> Option<Self> {
        Some(match s {
            "boolean" => PrimitiveType::Boolean,
            "string" => PrimitiveType::String,
            "timestamp" => PrimitiveType::Timestamp,
            "float32" => PrimitiveType::Float32,
            "float64" => PrimitiveType::Float64,
            "int8" => PrimitiveType::Int8,
            "uint8" => PrimitiveType::Uint8,
            "int16" => PrimitiveType::Int16,
            "uint16" => PrimitiveType::Uint16,
            "int32" => PrimitiveType::Int32,
            "uint32" => PrimitiveType::Uint32,
            _ => return None,
        })
    }

    /// Inclusive `[min, max]` range for the integer types. `None` for types
    /// with no integer range (booleans, strings, timestamps, floats).
    pub fn integer_range(self) -> Option<(i128, i128)> {
        match self {
            PrimitiveType::Int8 => Some((-128, 127)),
            PrimitiveType::Uint8 => Some((0, 255)),
            PrimitiveType::Int16 => Some((-32768, 32767)),
            PrimitiveType::Uint16 => Some((0, 65535)),
            PrimitiveType::Int32 => Some((-2147483648, 2147483647)),
            PrimitiveType::Uint32 => Some((0, 4294967295)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Form {
    Empty,
    Ref(String),
    Type(PrimitiveType),
    Enum(Vec<String>),
    Elements(NodeId),
    Properties {
        properties: IndexMap<String, NodeId>,
        optional_properties: IndexMap<String, NodeId>,
        additional_properties: bool,
        /// Whether the `properties` keyword was present in the schema
        /// (even as `{}`), as opposed to the form being reached solely via
        /// `optionalProperties`/`additionalProperties`. Decides which
        /// keyword name is blamed in the schema path when the instance
        /// isn't even an object.
        has_properties_keyword: bool,
    },
    Values(NodeId),
    Discriminator {
        tag: String,
        mapping: IndexMap<String, NodeId>,
    },
}

/// A compiled JTD schema: an arena of nodes, the root node, and the
/// top-level `definitions` map (name to arena node).
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub(crate) arena: Vec<SchemaNode>,
    pub(crate) definitions: IndexMap<String, NodeId>,
    pub(crate) root: NodeId,
}

impl Schema {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &SchemaNode {
        &self.arena[id.0]
    }

    pub fn definition(&self, name: &str) -> Option<NodeId> {
        self.definitions.get(name).copied()
    }

    pub fn definitions(&self) -> &IndexMap<String, NodeId> {
        &self.definitions
    }
}
