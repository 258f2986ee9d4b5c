//! jsonkit — JSON Type Definition and JSONPath tooling over a shared JSON
//! value model.
//!
//! Re-exports the individual crates so a consumer can depend on just this
//! one: [`jtd`] compiles and validates against RFC 8927 schemas,
//! [`json_path`] compiles and evaluates Goessner-style JSONPath
//! expressions, [`json_pointer`] implements RFC 6901, and [`json_value`]
//! is the shared value model both cores validate/query against.

pub use json_path;
pub use json_pointer;
pub use json_value;
pub use jtd;

pub use json_path::CompiledPath;
pub use json_value::JsonValue;
pub use jtd::Jtd;
