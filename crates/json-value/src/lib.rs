//! Shared JSON value model for the JTD and JSONPath crates.
//!
//! JSON text parsing and printing are external concerns; this crate only
//! defines the in-memory value representation both engines operate over
//! and a small numeric adapter for converting a JSON number into the
//! concrete Rust representations JTD's `type` keyword needs.

pub mod numeric;

/// The JSON value model shared by the JTD validator and the JSONPath engine.
///
/// Backed by `serde_json::Value` with `preserve_order` (so object key order
/// from the source document survives round-trips) and `arbitrary_precision`
/// (so a number's lexical form is retained until a caller asks for a
/// specific numeric interpretation via [`numeric`]).
pub type JsonValue = serde_json::Value;
