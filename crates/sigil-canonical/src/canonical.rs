//! Canonical string construction
//!
//! Turns a [`Signable`] object graph into one deterministic string. Field
//! extraction applies the per-field policy (exclusion, explicit order, name
//! tie-break); value formatting renders every value shape to
//! locale-independent text; the canonicalizer joins the results with a
//! reserved separator marker.

use chrono::SecondsFormat;
use sigil_core::{Field, FieldValue, ScalarValue, Signable};

/// Reserved marker terminating every formatted field.
///
/// A private-use sequence rather than plain punctuation, so it cannot
/// collide with legitimately formatted values.
pub const FIELD_SEPARATOR: &str = "|#FieldSeparator#|";

/// Reserved marker for missing values, distinct from the empty string.
pub const EMPTY_VALUE: &str = "|#EmptyValue#|";

/// Build the canonical string for a signable object.
///
/// For a fixed object value the result is identical on every call. The
/// object graph must be acyclic and must not be mutated concurrently during
/// the call; neither is checked at runtime.
///
/// # Example
///
/// ```rust
/// use sigil_canonical::{canonicalize, FIELD_SEPARATOR};
/// use sigil_core::{Field, Signable};
///
/// struct Tag {
///     name: String,
/// }
///
/// impl Signable for Tag {
///     fn describe_fields(&self) -> Vec<Field> {
///         vec![Field::new("name", self.name.as_str())]
///     }
/// }
///
/// let tag = Tag { name: "alpha".to_string() };
/// assert_eq!(canonicalize(&tag), format!("alpha{}", FIELD_SEPARATOR));
/// ```
pub fn canonicalize<T: Signable>(obj: &T) -> String {
    canonicalize_fields(&obj.describe_fields())
}

/// Build the canonical string for an optional object.
///
/// `None` yields a single empty-object marker field, so signing "no object"
/// stays distinguishable from signing an object with zero included fields.
pub fn canonicalize_optional<T: Signable>(obj: Option<&T>) -> String {
    match obj {
        Some(obj) => canonicalize(obj),
        None => format!("{EMPTY_VALUE}{FIELD_SEPARATOR}"),
    }
}

/// Build the canonical string for an explicit field list.
///
/// This is the recursion entry used for nested objects: each included
/// field's formatted value is appended, terminated by [`FIELD_SEPARATOR`].
pub fn canonicalize_fields(fields: &[Field]) -> String {
    let mut output = String::new();

    for field in ordered_fields(fields) {
        output.push_str(&format_value(&field.value));
        output.push_str(FIELD_SEPARATOR);
    }

    output
}

/// Extract the fields to sign, in signing order.
///
/// Excluded fields are dropped. The rest sort by ascending resolved order;
/// ties break by byte-wise name comparison. Declaration order is never
/// significant.
fn ordered_fields(fields: &[Field]) -> Vec<&Field> {
    let mut included: Vec<&Field> = fields.iter().filter(|f| !f.excluded).collect();

    included.sort_by(|a, b| {
        a.resolved_order()
            .cmp(&b.resolved_order())
            .then_with(|| a.name.as_bytes().cmp(b.name.as_bytes()))
    });

    included
}

/// Render one field value to canonical text.
fn format_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Empty => EMPTY_VALUE.to_string(),
        FieldValue::Scalar(scalar) => format_scalar(scalar),
        FieldValue::ScalarList(items) => {
            let rendered: Vec<String> = items
                .iter()
                .map(|item| {
                    item.as_ref()
                        .map(format_scalar)
                        .unwrap_or_else(|| EMPTY_VALUE.to_string())
                })
                .collect();
            rendered.join(FIELD_SEPARATOR)
        }
        FieldValue::Object(fields) => canonicalize_fields(fields),
        FieldValue::ObjectList(items) => {
            let mut output = String::new();
            // The separator terminates every element, never only joins, so
            // element count stays unambiguous with embedded missing values.
            for item in items {
                match item {
                    Some(fields) => output.push_str(&canonicalize_fields(fields)),
                    None => output.push_str(EMPTY_VALUE),
                }
                output.push_str(FIELD_SEPARATOR);
            }
            output
        }
    }
}

/// Render one scalar to locale-independent text.
fn format_scalar(value: &ScalarValue) -> String {
    match value {
        ScalarValue::Text(text) => text.clone(),
        ScalarValue::Bool(true) => "true".to_string(),
        ScalarValue::Bool(false) => "false".to_string(),
        ScalarValue::Int(number) => number.to_string(),
        ScalarValue::UInt(number) => number.to_string(),
        ScalarValue::Timestamp(timestamp) => {
            timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
        }
    }
}
