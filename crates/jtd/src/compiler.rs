//! Compiles a JSON Type Definition schema document into a [`Schema`] AST.
//!
//! Enforces RFC 8927 well-formedness: every schema must unambiguously
//! belong to exactly one of the eight forms, `definitions` may only appear
//! at the schema root, `nullable` must be a strict JSON boolean, enums must
//! be non-empty with no duplicate values, and `properties`/`optionalProperties`
//! keys must be disjoint. Violations are hard compile errors, never warnings.

use indexmap::{IndexMap, IndexSet};
use json_value::JsonValue;
use thiserror::Error;

use crate::ast::{Form, NodeId, PrimitiveType, Schema, SchemaNode};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompileError {
    #[error("schema at {path} must be a JSON object")]
    NotAnObject { path: String },
    #[error("schema at {path} has unknown keyword(s): {keys:?}")]
    UnknownKeywords { path: String, keys: Vec<String> },
    #[error("schema at {path} does not match any of the eight JTD forms")]
    AmbiguousForm { path: String },
    #[error("`definitions` may only appear at the schema root (found at {path})")]
    DefinitionsNotAtRoot { path: String },
    #[error("`definitions` at {path} must be an object")]
    DefinitionsNotAnObject { path: String },
    #[error("`nullable` at {path} must be a boolean")]
    NullableNotBoolean { path: String },
    #[error("`metadata` at {path} must be an object")]
    MetadataNotAnObject { path: String },
    #[error("`ref` at {path} must be a string")]
    RefNotAString { path: String },
    #[error("`ref` at {path} names undefined definition {name:?}")]
    UnresolvedRef { path: String, name: String },
    #[error("`type` at {path} must be a string")]
    TypeNotAString { path: String },
    #[error("`type` at {path} names unknown primitive type {name:?}")]
    UnknownType { path: String, name: String },
    #[error("`enum` at {path} must be a non-empty array of strings")]
    InvalidEnum { path: String },
    #[error("`enum` at {path} contains duplicate value {value:?}")]
    DuplicateEnumValue { path: String, value: String },
    #[error("`properties`/`optionalProperties` at {path} must be objects")]
    PropertiesNotAnObject { path: String },
    #[error("`additionalProperties` at {path} must be a boolean")]
    AdditionalPropertiesNotBoolean { path: String },
    #[error("key {key:?} at {path} is declared in both `properties` and `optionalProperties`")]
    RequiredOptionalOverlap { path: String, key: String },
    #[error("`values` at {path} must be an object")]
    ValuesInvalidSchema { path: String },
    #[error("`discriminator` at {path} must be a string")]
    DiscriminatorNotAString { path: String },
    #[error("`mapping` at {path} must be an object")]
    MappingNotAnObject { path: String },
    #[error("mapped schema {key:?} at {path} must use the properties form")]
    MappingValueNotProperties { path: String, key: String },
    #[error("mapped schema {key:?} at {path} must not be nullable")]
    MappingValueNullable { path: String, key: String },
    #[error(
        "mapped schema {key:?} at {path} redeclares the discriminator tag {tag:?} as a property"
    )]
    MappingValueRedeclaresTag { path: String, key: String, tag: String },
    #[error("pure `ref` cycle detected among definitions: {chain:?}")]
    PureRefCycle { chain: Vec<String> },
}

const FORM_KEYS: &[&str] = &[
    "ref",
    "type",
    "enum",
    "elements",
    "properties",
    "optionalProperties",
    "additionalProperties",
    "values",
    "discriminator",
    "mapping",
];

struct Compiler {
    arena: Vec<SchemaNode>,
    definitions: IndexMap<String, NodeId>,
}

/// Compile a JSON schema document into a [`Schema`].
pub fn compile(schema_json: &JsonValue) -> Result<Schema, CompileError> {
    let mut compiler = Compiler {
        arena: Vec::new(),
        definitions: IndexMap::new(),
    };

    // Pass 1: register definitions (if any) so refs can resolve regardless
    // of declaration order, including cyclic ones.
    if let JsonValue::Object(obj) = schema_json {
        if let Some(defs) = obj.get("definitions") {
            let defs_obj = defs
                .as_object()
                .ok_or_else(|| CompileError::DefinitionsNotAnObject { path: "#/definitions".into() })?;
            for (name, def_schema) in defs_obj {
                let path = format!("#/definitions/{name}");
                let node_id = compiler.compile_node(def_schema, &path, false)?;
                compiler.definitions.insert(name.clone(), node_id);
            }
        }
    }

    check_no_pure_ref_cycles(&compiler)?;

    let root = compiler.compile_node(schema_json, "#", true)?;

    check_refs_resolve(&compiler)?;

    Ok(Schema {
        arena: compiler.arena,
        definitions: compiler.definitions,
        root,
    })
}

fn check_refs_resolve(compiler: &Compiler) -> Result<(), CompileError> {
    for node in &compiler.arena {
        if let Form::Ref(name) = &node.form {
            if !compiler.definitions.contains_key(name) {
                return Err(CompileError::UnresolvedRef {
                    path: "#".to_string(),
                    name: name.clone(),
                });
            }
        }
    }
    Ok(())
}

/// A definition whose form is `Ref` and whose ref chain never reaches a
/// non-`Ref` form is a no-op that can never terminate validation, and is
/// rejected rather than silently accepted.
fn check_no_pure_ref_cycles(compiler: &Compiler) -> Result<(), CompileError> {
    for name in compiler.definitions.keys() {
        let mut seen = IndexSet::new();
        let mut current_name = name.clone();
        loop {
            if !seen.insert(current_name.clone()) {
                let mut chain: Vec<String> = seen.into_iter().collect();
                chain.push(current_name);
                return Err(CompileError::PureRefCycle { chain });
            }
            let node_id = match compiler.definitions.get(&current_name) {
                Some(&id) => id,
                // `current_name` isn't a definition at all: a dangling ref,
                // not a cycle. Leave it for `check_refs_resolve` to report
                // as `UnresolvedRef`.
                None => break,
            };
            match &compiler.arena[node_id.0].form {
                Form::Ref(next) => {
                    current_name = next.clone();
                }
                _ => break,
            }
        }
    }
    Ok(())
}

impl Compiler {
    fn push(&mut self, node: SchemaNode) -> NodeId {
        let id = NodeId(self.arena.len());
        self.arena.push(node);
        id
    }

    fn compile_node(
        &mut self,
        value: &JsonValue,
        path: &str,
        is_root: bool,
    ) -> Result<NodeId, CompileError> {
        let obj = value
            .as_object()
            .ok_or_else(|| CompileError::NotAnObject { path: path.to_string() })?;

        for key in obj.keys() {
            let known = matches!(
                key.as_str(),
                "nullable" | "metadata" | "definitions"
            ) || FORM_KEYS.contains(&key.as_str());
            if !known {
                return Err(CompileError::UnknownKeywords {
                    path: path.to_string(),
                    keys: vec![key.clone()],
                });
            }
        }

        if !is_root && obj.contains_key("definitions") {
            return Err(CompileError::DefinitionsNotAtRoot { path: path.to_string() });
        }

        let nullable = match obj.get("nullable") {
            None => false,
            Some(JsonValue::Bool(b)) => *b,
            Some(_) => return Err(CompileError::NullableNotBoolean { path: path.to_string() }),
        };

        if let Some(metadata) = obj.get("metadata") {
            if !metadata.is_object() {
                return Err(CompileError::MetadataNotAnObject { path: path.to_string() });
            }
        }

        let present: Vec<&str> = FORM_KEYS
            .iter()
            .copied()
            .filter(|k| obj.contains_key(*k))
            .collect();

        let form = match present.as_slice() {
            [] => Form::Empty,
            ["ref"] => {
                let name = obj
                    .get("ref")
                    .unwrap()
                    .as_str()
                    .ok_or_else(|| CompileError::RefNotAString { path: path.to_string() })?
                    .to_string();
                Form::Ref(name)
            }
            ["type"] => {
                let name = obj
                    .get("type")
                    .unwrap()
                    .as_str()
                    .ok_or_else(|| CompileError::TypeNotAString { path: path.to_string() })?;
                let ty = PrimitiveType::from_keyword(name).ok_or_else(|| CompileError::UnknownType {
                    path: path.to_string(),
                    name: name.to_string(),
                })?;
                Form::Type(ty)
            }
            ["enum"] => {
                let arr = obj
                    .get("enum")
                    .unwrap()
                    .as_array()
                    .filter(|a| !a.is_empty())
                    .ok_or_else(|| CompileError::InvalidEnum { path: path.to_string() })?;
                let mut seen = IndexSet::new();
                let mut values = Vec::with_capacity(arr.len());
                for v in arr {
                    let s = v
                        .as_str()
                        .ok_or_else(|| CompileError::InvalidEnum { path: path.to_string() })?
                        .to_string();
                    if !seen.insert(s.clone()) {
                        return Err(CompileError::DuplicateEnumValue { path: path.to_string(), value: s });
                    }
                    values.push(s);
                }
                Form::Enum(values)
            }
            ["elements"] => {
                let elem_schema = obj.get("elements").unwrap();
                let id = self.compile_node(elem_schema, &format!("{path}/elements"), false)?;
                Form::Elements(id)
            }
            ["values"] => {
                let values_schema = obj.get("values").unwrap();
                if !values_schema.is_object() {
                    return Err(CompileError::ValuesInvalidSchema { path: path.to_string() });
                }
                let id = self.compile_node(values_schema, &format!("{path}/values"), false)?;
                Form::Values(id)
            }
            ["discriminator", "mapping"] | ["mapping", "discriminator"] => {
                self.compile_discriminator(obj, path)?
            }
            keys if keys.iter().all(|k| {
                matches!(*k, "properties" | "optionalProperties" | "additionalProperties")
            }) =>
            {
                self.compile_properties(obj, path)?
            }
            _ => return Err(CompileError::AmbiguousForm { path: path.to_string() }),
        };

        Ok(self.push(SchemaNode { nullable, form }))
    }

    fn compile_properties(
        &mut self,
        obj: &serde_json::Map<String, JsonValue>,
        path: &str,
    ) -> Result<Form, CompileError> {
        let mut properties = IndexMap::new();
        if let Some(props) = obj.get("properties") {
            let props_obj = props
                .as_object()
                .ok_or_else(|| CompileError::PropertiesNotAnObject { path: path.to_string() })?;
            for (key, schema) in props_obj {
                let id = self.compile_node(schema, &format!("{path}/properties/{key}"), false)?;
                properties.insert(key.clone(), id);
            }
        }

        let mut optional_properties = IndexMap::new();
        if let Some(props) = obj.get("optionalProperties") {
            let props_obj = props
                .as_object()
                .ok_or_else(|| CompileError::PropertiesNotAnObject { path: path.to_string() })?;
            for (key, schema) in props_obj {
                if properties.contains_key(key) {
                    return Err(CompileError::RequiredOptionalOverlap {
                        path: path.to_string(),
                        key: key.clone(),
                    });
                }
                let id =
                    self.compile_node(schema, &format!("{path}/optionalProperties/{key}"), false)?;
                optional_properties.insert(key.clone(), id);
            }
        }

        // RFC 8927 defaults `additionalProperties` to `false`. A schema
        // consisting solely of `additionalProperties` still uses this form,
        // with empty `properties`/`optionalProperties` maps.
        let additional_properties = match obj.get("additionalProperties") {
            None => false,
            Some(JsonValue::Bool(b)) => *b,
            Some(_) => {
                return Err(CompileError::AdditionalPropertiesNotBoolean { path: path.to_string() })
            }
        };

        Ok(Form::Properties {
            properties,
            optional_properties,
            additional_properties,
            has_properties_keyword: obj.contains_key("properties"),
        })
    }

    fn compile_discriminator(
        &mut self,
        obj: &serde_json::Map<String, JsonValue>,
        path: &str,
    ) -> Result<Form, CompileError> {
        let tag = obj
            .get("discriminator")
            .unwrap()
            .as_str()
            .ok_or_else(|| CompileError::DiscriminatorNotAString { path: path.to_string() })?
            .to_string();

        let mapping_obj = obj
            .get("mapping")
            .unwrap()
            .as_object()
            .ok_or_else(|| CompileError::MappingNotAnObject { path: path.to_string() })?;

        let mut mapping = IndexMap::new();
        for (key, schema) in mapping_obj {
            let mapping_path = format!("{path}/mapping/{key}");
            let id = self.compile_node(schema, &mapping_path, false)?;
            let node = &self.arena[id.0];
            if node.nullable {
                return Err(CompileError::MappingValueNullable {
                    path: mapping_path,
                    key: key.clone(),
                });
            }
            match &node.form {
                Form::Properties { properties, optional_properties, .. } => {
                    if properties.contains_key(&tag) || optional_properties.contains_key(&tag) {
                        return Err(CompileError::MappingValueRedeclaresTag {
                            path: mapping_path,
                            key: key.clone(),
                            tag: tag.clone(),
                        });
                    }
                }
                _ => {
                    return Err(CompileError::MappingValueNotProperties {
                        path: mapping_path,
                        key: key.clone(),
                    })
                }
            }
            mapping.insert(key.clone(), id);
        }

        Ok(Form::Discriminator { tag, mapping })
    }
}
