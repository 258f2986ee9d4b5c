//! JSONPath utility helpers.

use crate::types::{
    ComparisonOperator, FilterExpression, JSONPath, LogicalOperator, PathSegment, Selector,
    ValueExpression,
};

/// Convert JSONPath AST to string representation.
pub fn json_path_to_string(path: &JSONPath) -> String {
    let mut out = String::from("$");
    for segment in &path.segments {
        out.push_str(&segment_to_string(segment));
    }
    out
}

/// Compare two JSONPath ASTs for structural equality.
pub fn json_path_equals(path1: &JSONPath, path2: &JSONPath) -> bool {
    path1 == path2
}

/// Return property names explicitly referenced by name selectors.
pub fn get_accessed_properties(path: &JSONPath) -> Vec<String> {
    let mut properties = Vec::new();

    for segment in &path.segments {
        for selector in &segment.selectors {
            if let Selector::Name(name) = selector {
                properties.push(name.clone());
            }
        }
    }

    properties
}

fn segment_to_string(segment: &PathSegment) -> String {
    if segment.selectors.len() == 1 {
        let selector = &segment.selectors[0];
        if segment.recursive {
            format!("..{}", selector_to_segment_tail(selector))
        } else {
            selector_to_segment(selector)
        }
    } else {
        let joined = segment
            .selectors
            .iter()
            .map(selector_to_segment)
            .collect::<Vec<_>>()
            .join(",");
        if segment.recursive {
            format!("..[{}]", joined)
        } else {
            format!("[{}]", joined)
        }
    }
}

fn selector_to_segment(selector: &Selector) -> String {
    match selector {
        Selector::Name(name) => {
            if is_identifier(name) {
                format!(".{}", name)
            } else {
                format!("['{}']", escape_single_quoted(name))
            }
        }
        Selector::Index(index) => format!("[{}]", index),
        Selector::Slice { start, end, step } => {
            let mut s = String::from("[");
            if let Some(v) = start {
                s.push_str(&v.to_string());
            }
            s.push(':');
            if let Some(v) = end {
                s.push_str(&v.to_string());
            }
            if let Some(v) = step {
                s.push(':');
                s.push_str(&v.to_string());
            }
            s.push(']');
            s
        }
        Selector::Wildcard => String::from(".*"),
        Selector::Filter(expr) => format!("[?({})]", filter_expression_to_string(expr)),
        Selector::ScriptIndex(offset) => format!("[({})]", script_index_expr(*offset)),
    }
}

fn script_index_expr(offset: isize) -> String {
    match offset.cmp(&0) {
        std::cmp::Ordering::Equal => "@.length".to_string(),
        std::cmp::Ordering::Greater => format!("@.length+{}", offset),
        std::cmp::Ordering::Less => format!("@.length{}", offset),
    }
}

fn selector_to_segment_tail(selector: &Selector) -> String {
    match selector {
        Selector::Name(name) => {
            if is_identifier(name) {
                name.clone()
            } else {
                format!("['{}']", escape_single_quoted(name))
            }
        }
        Selector::Index(index) => format!("[{}]", index),
        Selector::Slice { .. } => selector_to_segment(selector),
        Selector::Wildcard => String::from("*"),
        Selector::Filter(_) => selector_to_segment(selector),
        Selector::ScriptIndex(_) => selector_to_segment(selector),
    }
}

/// Render a filter expression back to the `?( ... )` source syntax it was
/// parsed from.
fn filter_expression_to_string(expr: &FilterExpression) -> String {
    match expr {
        FilterExpression::Comparison { operator, left, right } => format!(
            "{} {} {}",
            value_expression_to_string(left),
            comparison_operator_to_str(*operator),
            value_expression_to_string(right)
        ),
        FilterExpression::Logical { operator, left, right } => {
            let op = match operator {
                LogicalOperator::And => "&&",
                LogicalOperator::Or => "||",
            };
            format!(
                "{} {} {}",
                filter_expression_to_string(left),
                op,
                filter_expression_to_string(right)
            )
        }
        FilterExpression::Existence { path } => format!("@{}", filter_path_to_string(path)),
        FilterExpression::CurrentNode => String::from("@"),
        FilterExpression::Paren(inner) => format!("({})", filter_expression_to_string(inner)),
        FilterExpression::Negation(inner) => format!("!{}", filter_expression_to_string(inner)),
    }
}

fn value_expression_to_string(expr: &ValueExpression) -> String {
    match expr {
        ValueExpression::Current => String::from("@"),
        ValueExpression::Root => String::from("$"),
        ValueExpression::Literal(v) => literal_to_string(v),
        ValueExpression::Path(path) => format!("@{}", filter_path_to_string(path)),
    }
}

fn filter_path_to_string(path: &JSONPath) -> String {
    path.segments.iter().map(segment_to_string).collect()
}

fn comparison_operator_to_str(op: ComparisonOperator) -> &'static str {
    match op {
        ComparisonOperator::Equal => "==",
        ComparisonOperator::NotEqual => "!=",
        ComparisonOperator::Less => "<",
        ComparisonOperator::LessEqual => "<=",
        ComparisonOperator::Greater => ">",
        ComparisonOperator::GreaterEqual => ">=",
    }
}

fn literal_to_string(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => format!("\"{}\"", escape_double_quoted(s)),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => String::from("null"),
        serde_json::Value::Number(n) => n.to_string(),
        // Arrays/objects are never produced by the filter literal grammar.
        other => other.to_string(),
    }
}

fn escape_double_quoted(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(ch),
        }
    }
    out
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

fn escape_single_quoted(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            _ => out.push(ch),
        }
    }
    out
}
