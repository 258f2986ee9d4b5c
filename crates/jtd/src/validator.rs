//! Stack-based JTD validator.
//!
//! Validation is driven by an explicit LIFO work stack rather than native
//! recursion, so deeply nested instances (arbitrary JSON from an untrusted
//! source) cannot blow the call stack, and so the order errors are
//! produced in is a pure function of stack discipline rather than of
//! whatever order the compiler happens to emit recursive calls in.

use json_value::{numeric, JsonValue};

use crate::ast::{Form, NodeId, PrimitiveType, Schema};

/// One validation failure, as an RFC 6901 JSON Pointer pair: where in the
/// instance the problem was found, and which part of the schema it
/// violates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrorItem {
    pub instance_path: String,
    pub schema_path: String,
}

struct Frame<'a> {
    node: NodeId,
    instance: &'a JsonValue,
    instance_path: Vec<String>,
    schema_path: Vec<String>,
    /// Set while validating the nested `properties` schema a discriminator
    /// mapped to, so that schema's own `additionalProperties` check does
    /// not flag the tag key it never had to declare.
    inherited_tag: Option<String>,
}

fn with(components: &[String], suffix: &str) -> Vec<String> {
    let mut out = components.to_vec();
    out.push(suffix.to_string());
    out
}

fn pointer(components: &[String]) -> String {
    if components.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    for c in components {
        out.push('/');
        out.push_str(&c.replace('~', "~0").replace('/', "~1"));
    }
    out
}

/// Validate `instance` against `schema`, returning every failure found.
/// An empty vector means the instance is valid.
pub fn validate(schema: &Schema, instance: &JsonValue) -> Vec<ValidationErrorItem> {
    let mut errors = Vec::new();
    let mut stack = vec![Frame {
        node: schema.root(),
        instance,
        instance_path: Vec::new(),
        schema_path: Vec::new(),
        inherited_tag: None,
    }];

    while let Some(frame) = stack.pop() {
        step(schema, frame, &mut stack, &mut errors);
    }

    errors
}

fn step<'a>(
    schema: &Schema,
    frame: Frame<'a>,
    stack: &mut Vec<Frame<'a>>,
    errors: &mut Vec<ValidationErrorItem>,
) {
    let Frame { node, instance, instance_path, schema_path, inherited_tag } = frame;
    let schema_node = schema.node(node);

    // The `empty` form accepts any instance, nullable or not.
    if matches!(schema_node.form, Form::Empty) {
        return;
    }

    if schema_node.nullable && instance.is_null() {
        return;
    }

    match &schema_node.form {
        Form::Empty => unreachable!(),
        Form::Ref(name) => {
            let target = schema.definition(name).expect("compiler resolves all refs");
            let mut ref_schema_path = schema_path.clone();
            ref_schema_path.push("definitions".to_string());
            ref_schema_path.push(name.clone());
            stack.push(Frame {
                node: target,
                instance,
                instance_path,
                schema_path: ref_schema_path,
                inherited_tag,
            });
        }
        Form::Type(ty) => {
            validate_type(*ty, instance, &instance_path, &schema_path, errors);
        }
        Form::Enum(values) => match instance.as_str() {
            Some(s) if values.iter().any(|v| v == s) => {}
            _ => errors.push(ValidationErrorItem {
                instance_path: pointer(&instance_path),
                schema_path: pointer(&with(&schema_path, "enum")),
            }),
        },
        Form::Elements(elem_node) => match instance.as_array() {
            Some(arr) => {
                let mut elem_schema_path = schema_path.clone();
                elem_schema_path.push("elements".to_string());
                for (idx, child) in arr.iter().enumerate().rev() {
                    let mut child_path = instance_path.clone();
                    child_path.push(idx.to_string());
                    stack.push(Frame {
                        node: *elem_node,
                        instance: child,
                        instance_path: child_path,
                        schema_path: elem_schema_path.clone(),
                        inherited_tag: None,
                    });
                }
            }
            None => errors.push(ValidationErrorItem {
                instance_path: pointer(&instance_path),
                schema_path: pointer(&with(&schema_path, "elements")),
            }),
        },
        Form::Values(values_node) => match instance.as_object() {
            Some(obj) => {
                let mut values_schema_path = schema_path.clone();
                values_schema_path.push("values".to_string());
                for (key, child) in obj.iter().rev() {
                    let mut child_path = instance_path.clone();
                    child_path.push(key.clone());
                    stack.push(Frame {
                        node: *values_node,
                        instance: child,
                        instance_path: child_path,
                        schema_path: values_schema_path.clone(),
                        inherited_tag: None,
                    });
                }
            }
            None => errors.push(ValidationErrorItem {
                instance_path: pointer(&instance_path),
                schema_path: pointer(&with(&schema_path, "values")),
            }),
        },
        Form::Properties {
            properties,
            optional_properties,
            additional_properties,
            has_properties_keyword,
        } => match instance.as_object() {
            Some(obj) => validate_properties(
                properties,
                optional_properties,
                *additional_properties,
                obj,
                &instance_path,
                &schema_path,
                inherited_tag.as_deref(),
                stack,
                errors,
            ),
            None => {
                let blamed = if *has_properties_keyword { "properties" } else { "optionalProperties" };
                errors.push(ValidationErrorItem {
                    instance_path: pointer(&instance_path),
                    schema_path: pointer(&with(&schema_path, blamed)),
                })
            }
        },
        Form::Discriminator { tag, mapping } => match instance.as_object() {
            Some(obj) => match obj.get(tag) {
                None => errors.push(ValidationErrorItem {
                    instance_path: pointer(&instance_path),
                    schema_path: pointer(&with(&schema_path, "discriminator")),
                }),
                Some(JsonValue::String(tag_value)) => match mapping.get(tag_value) {
                    // The mapped schema is validated as if it were its own
                    // schema: the discriminator/mapping path does not carry
                    // into the nested properties form's own schema path.
                    Some(mapped_node) => stack.push(Frame {
                        node: *mapped_node,
                        instance,
                        instance_path,
                        schema_path,
                        inherited_tag: Some(tag.clone()),
                    }),
                    None => {
                        let mut tag_path = instance_path.clone();
                        tag_path.push(tag.clone());
                        errors.push(ValidationErrorItem {
                            instance_path: pointer(&tag_path),
                            schema_path: pointer(&with(&schema_path, "mapping")),
                        });
                    }
                },
                Some(_) => {
                    let mut tag_path = instance_path.clone();
                    tag_path.push(tag.clone());
                    errors.push(ValidationErrorItem {
                        instance_path: pointer(&tag_path),
                        schema_path: pointer(&with(&schema_path, "discriminator")),
                    });
                }
            },
            None => errors.push(ValidationErrorItem {
                instance_path: pointer(&instance_path),
                schema_path: pointer(&with(&schema_path, "discriminator")),
            }),
        },
    }
}

#[allow(clippy::too_many_arguments)]
fn validate_properties<'a>(
    properties: &'a indexmap::IndexMap<String, NodeId>,
    optional_properties: &'a indexmap::IndexMap<String, NodeId>,
    additional_properties: bool,
    obj: &'a serde_json::Map<String, JsonValue>,
    instance_path: &[String],
    schema_path: &[String],
    inherited_tag: Option<&str>,
    stack: &mut Vec<Frame<'a>>,
    errors: &mut Vec<ValidationErrorItem>,
) {
    // Missing-required errors in forward declared order, independent of the
    // stack-push order below.
    for (key, _) in properties.iter() {
        if !obj.contains_key(key) {
            let mut child_schema_path = schema_path.to_vec();
            child_schema_path.push("properties".to_string());
            child_schema_path.push(key.clone());
            errors.push(ValidationErrorItem {
                instance_path: pointer(instance_path),
                schema_path: pointer(&child_schema_path),
            });
        }
    }

    // Present children, reversed so they pop off the LIFO stack in declared
    // order.
    for (key, &node) in properties.iter().rev() {
        if let Some(child) = obj.get(key) {
            let mut child_path = instance_path.to_vec();
            child_path.push(key.clone());
            let mut child_schema_path = schema_path.to_vec();
            child_schema_path.push("properties".to_string());
            child_schema_path.push(key.clone());
            stack.push(Frame {
                node,
                instance: child,
                instance_path: child_path,
                schema_path: child_schema_path,
                inherited_tag: None,
            });
        }
    }

    for (key, &node) in optional_properties.iter().rev() {
        if let Some(child) = obj.get(key) {
            let mut child_path = instance_path.to_vec();
            child_path.push(key.clone());
            let mut child_schema_path = schema_path.to_vec();
            child_schema_path.push("optionalProperties".to_string());
            child_schema_path.push(key.clone());
            stack.push(Frame {
                node,
                instance: child,
                instance_path: child_path,
                schema_path: child_schema_path,
                inherited_tag: None,
            });
        }
    }

    if !additional_properties {
        for key in obj.keys() {
            if properties.contains_key(key)
                || optional_properties.contains_key(key)
                || inherited_tag == Some(key.as_str())
            {
                continue;
            }
            let mut child_path = instance_path.to_vec();
            child_path.push(key.clone());
            errors.push(ValidationErrorItem {
                instance_path: pointer(&child_path),
                schema_path: pointer(schema_path),
            });
        }
    }
}

fn validate_type(
    ty: PrimitiveType,
    instance: &JsonValue,
    instance_path: &[String],
    schema_path: &[String],
    errors: &mut Vec<ValidationErrorItem>,
) {
    let ok = match ty {
        PrimitiveType::Boolean => instance.is_boolean(),
        PrimitiveType::String => instance.is_string(),
        PrimitiveType::Timestamp => instance
            .as_str()
            .is_some_and(crate::timestamp::is_valid_rfc3339),
        PrimitiveType::Float32 | PrimitiveType::Float64 => instance.is_number(),
        _ => match (instance, ty.integer_range()) {
            (JsonValue::Number(n), Some((min, max))) => {
                numeric::to_integer_in_range(n, min, max).is_ok()
            }
            _ => false,
        },
    };

    if !ok {
        errors.push(ValidationErrorItem {
            instance_path: pointer(instance_path),
            schema_path: pointer(&with(schema_path, "type")),
        });
    }
}
