//! RFC 8927 JSON Type Definition: compile a schema document once, then
//! validate any number of instances against it cheaply.
//!
//! ```
//! use jtd::Jtd;
//! use serde_json::json;
//!
//! let jtd = Jtd::compile(&json!({
//!     "properties": { "name": { "type": "string" } },
//! })).unwrap();
//!
//! assert!(jtd.validate(&json!({ "name": "ok" })).is_empty());
//! assert!(!jtd.validate(&json!({})).is_empty());
//! ```

mod ast;
mod compiler;
mod timestamp;
mod validator;

pub use ast::{Form, NodeId, PrimitiveType, Schema, SchemaNode};
pub use compiler::CompileError;
pub use timestamp::is_valid_rfc3339;
pub use validator::{validate, ValidationErrorItem};

/// A compiled schema, ready to validate instances against.
#[derive(Debug, Clone, PartialEq)]
pub struct Jtd {
    schema: Schema,
}

impl Jtd {
    /// Compile a JTD schema document.
    pub fn compile(schema_json: &json_value::JsonValue) -> Result<Self, CompileError> {
        Ok(Self { schema: compiler::compile(schema_json)? })
    }

    /// Validate an instance, returning every RFC 8927 violation found. An
    /// empty vector means the instance is valid.
    pub fn validate(&self, instance: &json_value::JsonValue) -> Vec<ValidationErrorItem> {
        validator::validate(&self.schema, instance)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}
