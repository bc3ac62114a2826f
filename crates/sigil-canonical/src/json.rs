//! JSON payload adapter
//!
//! Converts a `serde_json::Value` tree into signable fields without any
//! runtime reflection. The per-field policy the host would otherwise
//! declare on its types is supplied as a [`SigningPolicy`]: a mapping from
//! field name to exclusion/order rules, applied by name at every nesting
//! level.
//!
//! Floats are rejected up front: different platforms render them
//! inconsistently, which would break canonical-form determinism.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use sigil_canonical::{generate_token, JsonSignable, SigningPolicy};
//!
//! let payload = json!({
//!     "account": "acct-1042",
//!     "amount": 1999,
//!     "trace_id": "req-7", // not part of the signed surface
//! });
//!
//! let policy = SigningPolicy::new()
//!     .order("account", 1)
//!     .order("amount", 2)
//!     .exclude("trace_id");
//!
//! let signable = JsonSignable::new(&payload, &policy).unwrap();
//! let token = generate_token(&signable, "a shared secret").unwrap();
//! assert!(!token.is_empty());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sigil_core::{Field, FieldValue, ScalarValue, Signable};
use std::collections::BTreeMap;

use crate::error::CanonicalError;

/// Signing rules for one field name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldRule {
    #[serde(default)]
    pub excluded: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

/// Declarative per-field signing policy.
///
/// The serializable counterpart of per-property annotations: a map from
/// field name to [`FieldRule`]. Rules match by name at every nesting level
/// of the payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct SigningPolicy {
    rules: BTreeMap<String, FieldRule>,
}

impl SigningPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude a field name from signing.
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.rules.entry(name.into()).or_default().excluded = true;
        self
    }

    /// Give a field name an explicit signing order.
    pub fn order(mut self, name: impl Into<String>, order: i32) -> Self {
        self.rules.entry(name.into()).or_default().order = Some(order);
        self
    }

    fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.rules.get(name)
    }
}

/// A JSON payload converted into signable fields.
///
/// Conversion happens eagerly in [`JsonSignable::new`], so every payload
/// problem (floats, mixed collections) is reported before anything is
/// signed.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonSignable {
    fields: Vec<Field>,
}

impl JsonSignable {
    /// Convert a JSON object into signable fields under the given policy.
    ///
    /// # Errors
    ///
    /// Returns [`CanonicalError`] for non-object roots, float values,
    /// collections mixing scalars and objects, and collections nested
    /// directly inside collections.
    pub fn new(payload: &Value, policy: &SigningPolicy) -> Result<Self, CanonicalError> {
        match payload {
            Value::Object(map) => Ok(Self {
                fields: object_fields(map, policy)?,
            }),
            _ => Err(CanonicalError::NonObjectRoot),
        }
    }
}

impl Signable for JsonSignable {
    fn describe_fields(&self) -> Vec<Field> {
        self.fields.clone()
    }
}

fn object_fields(
    map: &Map<String, Value>,
    policy: &SigningPolicy,
) -> Result<Vec<Field>, CanonicalError> {
    let mut fields = Vec::with_capacity(map.len());

    for (name, value) in map {
        let mut field = Field::new(name.clone(), field_value(name, value, policy)?);
        if let Some(rule) = policy.rule(name) {
            if rule.excluded {
                field = field.excluded();
            }
            if let Some(order) = rule.order {
                field = field.order(order);
            }
        }
        fields.push(field);
    }

    Ok(fields)
}

fn field_value(
    name: &str,
    value: &Value,
    policy: &SigningPolicy,
) -> Result<FieldValue, CanonicalError> {
    match value {
        Value::Null => Ok(FieldValue::Empty),
        Value::Bool(flag) => Ok(FieldValue::Scalar(ScalarValue::Bool(*flag))),
        Value::Number(number) => scalar_number(name, number).map(FieldValue::Scalar),
        Value::String(text) => Ok(FieldValue::Scalar(ScalarValue::Text(text.clone()))),
        Value::Object(map) => Ok(FieldValue::Object(object_fields(map, policy)?)),
        Value::Array(items) => array_value(name, items, policy),
    }
}

fn scalar_number(name: &str, number: &serde_json::Number) -> Result<ScalarValue, CanonicalError> {
    if let Some(int) = number.as_i64() {
        Ok(ScalarValue::Int(int))
    } else if let Some(uint) = number.as_u64() {
        Ok(ScalarValue::UInt(uint))
    } else {
        Err(CanonicalError::FloatNotAllowed {
            field: name.to_string(),
        })
    }
}

fn array_value(
    name: &str,
    items: &[Value],
    policy: &SigningPolicy,
) -> Result<FieldValue, CanonicalError> {
    if items.iter().any(|item| matches!(item, Value::Array(_))) {
        return Err(CanonicalError::NestedArray {
            field: name.to_string(),
        });
    }

    if items.iter().any(|item| matches!(item, Value::Object(_))) {
        let mut elements = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Value::Null => elements.push(None),
                Value::Object(map) => elements.push(Some(object_fields(map, policy)?)),
                _ => {
                    return Err(CanonicalError::MixedCollection {
                        field: name.to_string(),
                    })
                }
            }
        }
        Ok(FieldValue::ObjectList(elements))
    } else {
        let mut elements = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Value::Null => elements.push(None),
                Value::Bool(flag) => elements.push(Some(ScalarValue::Bool(*flag))),
                Value::Number(number) => elements.push(Some(scalar_number(name, number)?)),
                Value::String(text) => elements.push(Some(ScalarValue::Text(text.clone()))),
                // Arrays and objects were ruled out above.
                Value::Array(_) | Value::Object(_) => {
                    return Err(CanonicalError::MixedCollection {
                        field: name.to_string(),
                    })
                }
            }
        }
        Ok(FieldValue::ScalarList(elements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::canonicalize;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn no_policy() -> SigningPolicy {
        SigningPolicy::new()
    }

    #[test]
    fn test_non_object_root_rejected() {
        assert_eq!(
            JsonSignable::new(&json!("just a string"), &no_policy()),
            Err(CanonicalError::NonObjectRoot)
        );
        assert_eq!(
            JsonSignable::new(&json!([1, 2]), &no_policy()),
            Err(CanonicalError::NonObjectRoot)
        );
    }

    #[test]
    fn test_float_rejected() {
        let result = JsonSignable::new(&json!({"temperature": 0.7}), &no_policy());
        assert_eq!(
            result,
            Err(CanonicalError::FloatNotAllowed {
                field: "temperature".to_string()
            })
        );
    }

    #[test]
    fn test_nested_float_rejected() {
        let result = JsonSignable::new(&json!({"outer": {"inner": 0.5}}), &no_policy());
        assert!(matches!(
            result,
            Err(CanonicalError::FloatNotAllowed { .. })
        ));
    }

    #[test]
    fn test_float_as_string_accepted() {
        assert!(JsonSignable::new(&json!({"temperature": "0.7"}), &no_policy()).is_ok());
    }

    #[test]
    fn test_mixed_collection_rejected() {
        let result = JsonSignable::new(&json!({"items": [{"a": 1}, "scalar"]}), &no_policy());
        assert_eq!(
            result,
            Err(CanonicalError::MixedCollection {
                field: "items".to_string()
            })
        );
    }

    #[test]
    fn test_nested_array_rejected() {
        let result = JsonSignable::new(&json!({"grid": [[1, 2], [3, 4]]}), &no_policy());
        assert_eq!(
            result,
            Err(CanonicalError::NestedArray {
                field: "grid".to_string()
            })
        );
    }

    #[test]
    fn test_scalar_shapes() {
        let signable = JsonSignable::new(
            &json!({
                "text": "value",
                "flag": true,
                "count": 42,
                "offset": -9,
                "missing": null,
            }),
            &no_policy(),
        )
        .unwrap();

        let fields = signable.describe_fields();
        assert_eq!(fields.len(), 5);
        assert!(fields.contains(&Field::new("missing", FieldValue::Empty)));
        assert!(fields.contains(&Field::new("count", 42i64)));
        assert!(fields.contains(&Field::new("offset", -9i64)));
    }

    #[test]
    fn test_scalar_array_with_nulls() {
        let signable =
            JsonSignable::new(&json!({"tags": ["x", null, "y"]}), &no_policy()).unwrap();
        assert_eq!(
            signable.describe_fields(),
            vec![Field::new(
                "tags",
                FieldValue::scalar_list_opt([Some("x"), None, Some("y")])
            )]
        );
    }

    #[test]
    fn test_object_array_with_nulls() {
        let signable =
            JsonSignable::new(&json!({"items": [{"a": 1}, null]}), &no_policy()).unwrap();
        assert_eq!(
            signable.describe_fields(),
            vec![Field::new(
                "items",
                FieldValue::ObjectList(vec![Some(vec![Field::new("a", 1i64)]), None])
            )]
        );
    }

    #[test]
    fn test_policy_exclusion_changes_canonical_form() {
        let payload = json!({"kept": "a", "dropped": "b"});
        let open = JsonSignable::new(&payload, &no_policy()).unwrap();
        let restricted =
            JsonSignable::new(&payload, &SigningPolicy::new().exclude("dropped")).unwrap();

        assert_ne!(canonicalize(&open), canonicalize(&restricted));
        assert!(!canonicalize(&restricted).contains('b'));
    }

    #[test]
    fn test_policy_order_changes_canonical_form() {
        let payload = json!({"first": "1", "second": "2"});
        let forward = SigningPolicy::new().order("first", 1).order("second", 2);
        let reversed = SigningPolicy::new().order("first", 2).order("second", 1);

        let one = JsonSignable::new(&payload, &forward).unwrap();
        let two = JsonSignable::new(&payload, &reversed).unwrap();
        assert_ne!(canonicalize(&one), canonicalize(&two));
    }

    #[test]
    fn test_policy_applies_at_every_level() {
        let payload = json!({"child": {"kept": "a", "dropped": "b"}});
        let policy = SigningPolicy::new().exclude("dropped");
        let signable = JsonSignable::new(&payload, &policy).unwrap();
        assert!(!canonicalize(&signable).contains('b'));
    }

    #[test]
    fn test_policy_round_trips_through_json() {
        let policy = SigningPolicy::new().exclude("trace_id").order("account", 1);
        let encoded = serde_json::to_string(&policy).unwrap();
        let decoded: SigningPolicy = serde_json::from_str(&encoded).unwrap();
        assert_eq!(policy, decoded);
    }

    #[test]
    fn test_policy_file_format() {
        let decoded: SigningPolicy = serde_json::from_str(
            r#"{"trace_id": {"excluded": true}, "account": {"order": 1}}"#,
        )
        .unwrap();
        assert_eq!(
            decoded,
            SigningPolicy::new().exclude("trace_id").order("account", 1)
        );
    }
}
