//! Type definitions for JSON Pointer.

use serde_json::Value;

/// A step in a JSON Pointer path.
///
/// Can be either a string (object key) or number (array index).
pub type PathStep = String;

/// A JSON Pointer path.
pub type Path = Vec<PathStep>;

/// The key used to reach a [`Reference`] from its containing object or array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceKey {
    /// An array index.
    Index(usize),
    /// An object property name.
    String(String),
}

impl ReferenceKey {
    /// The numeric index, if this key identifies an array element.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            ReferenceKey::Index(idx) => Some(*idx),
            ReferenceKey::String(_) => None,
        }
    }
}

/// A reference to a value in a JSON document.
///
/// Contains the target value, the object that contains it, and the key used
/// to access it.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    /// The target value. `None` if the value doesn't exist or is null.
    pub val: Option<Value>,
    /// The object or array containing the target value.
    pub obj: Option<Value>,
    /// The key (string for objects, index for arrays) used to access the value.
    pub key: Option<ReferenceKey>,
}

impl Reference {
    /// Check if this reference points to an array element.
    pub fn is_array_reference(&self) -> bool {
        matches!(&self.obj, Some(Value::Array(_)))
    }

    /// Check if this reference points to an object property.
    pub fn is_object_reference(&self) -> bool {
        matches!(&self.obj, Some(Value::Object(_)))
    }

    /// Check if this reference points to the end of an array.
    ///
    /// Returns true if the key is equal to the array length.
    pub fn is_array_end(&self) -> bool {
        if let (Some(Value::Array(arr)), Some(key)) = (&self.obj, &self.key) {
            if let Some(idx) = key.as_index() {
                return idx == arr.len();
            }
        }
        false
    }

    /// Get the array containing the referenced value.
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match &self.obj {
            Some(Value::Array(arr)) => Some(arr),
            _ => None,
        }
    }

    /// Get the object containing the referenced value.
    pub fn as_object(&self) -> Option<&serde_json::Map<String, Value>> {
        match &self.obj {
            Some(Value::Object(map)) => Some(map),
            _ => None,
        }
    }

    /// Get the numeric index if this is an array reference.
    pub fn index(&self) -> Option<usize> {
        self.key.as_ref().and_then(|k| k.as_index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reference_is_array() {
        let doc = json!([1, 2, 3]);
        let ref_val = Reference {
            val: Some(json!(2)),
            obj: Some(doc.clone()),
            key: Some(ReferenceKey::Index(1)),
        };
        assert!(ref_val.is_array_reference());
        assert!(!ref_val.is_object_reference());
        assert_eq!(ref_val.index(), Some(1));
    }

    #[test]
    fn test_reference_is_object() {
        let doc = json!({"foo": "bar"});
        let ref_val = Reference {
            val: Some(json!("bar")),
            obj: Some(doc.clone()),
            key: Some(ReferenceKey::String("foo".to_string())),
        };
        assert!(ref_val.is_object_reference());
        assert!(!ref_val.is_array_reference());
        assert_eq!(ref_val.index(), None);
    }

    #[test]
    fn test_reference_array_end() {
        let doc = json!([1, 2, 3]);
        let ref_val = Reference {
            val: None,
            obj: Some(doc.clone()),
            key: Some(ReferenceKey::Index(3)),
        };
        assert!(ref_val.is_array_end());
    }
}
