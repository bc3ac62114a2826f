//! Sigil field model
//!
//! This module contains the declaration-independent view of a signable
//! object: named fields carrying a raw value, an optional signing order and
//! an exclusion flag. Hosts expose their objects through the [`Signable`]
//! trait; the canonicalizer consumes the resulting field lists.

use chrono::{DateTime, Utc};

/// Order bucket for fields that declare no explicit order.
///
/// Unordered fields sort after every explicitly ordered field; ties are
/// broken by field name.
pub const DEFAULT_FIELD_ORDER: i32 = i32::MAX;

/// A single leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Text(String),
    Bool(bool),
    Int(i64),
    UInt(u64),
    Timestamp(DateTime<Utc>),
}

/// The raw value of one signable field.
///
/// `Empty` is the null sentinel: it is distinct from `Text("")`, so an
/// explicitly empty string and a missing value canonicalize differently.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// No value (the host's `None`/null).
    Empty,
    Scalar(ScalarValue),
    /// Collection of scalar elements; `None` elements are legal.
    ScalarList(Vec<Option<ScalarValue>>),
    /// A nested signable object, already described as fields.
    Object(Vec<Field>),
    /// Collection of nested objects; `None` elements are legal.
    ObjectList(Vec<Option<Vec<Field>>>),
}

impl FieldValue {
    /// Describe a nested signable object.
    pub fn nested<T: Signable>(obj: &T) -> Self {
        FieldValue::Object(obj.describe_fields())
    }

    /// Describe an optional nested object; `None` becomes [`FieldValue::Empty`].
    pub fn nested_opt<T: Signable>(obj: Option<&T>) -> Self {
        obj.map_or(FieldValue::Empty, Self::nested)
    }

    /// Describe a collection of nested signable objects.
    pub fn nested_list<'a, T, I>(items: I) -> Self
    where
        T: Signable + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        FieldValue::ObjectList(
            items
                .into_iter()
                .map(|obj| Some(obj.describe_fields()))
                .collect(),
        )
    }

    /// Describe a collection of nested objects with possibly-missing elements.
    pub fn nested_list_opt<'a, T, I>(items: I) -> Self
    where
        T: Signable + 'a,
        I: IntoIterator<Item = Option<&'a T>>,
    {
        FieldValue::ObjectList(
            items
                .into_iter()
                .map(|obj| obj.map(|o| o.describe_fields()))
                .collect(),
        )
    }

    /// Build a scalar collection value.
    pub fn scalar_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ScalarValue>,
    {
        FieldValue::ScalarList(items.into_iter().map(|s| Some(s.into())).collect())
    }

    /// Build a scalar collection value with possibly-missing elements.
    pub fn scalar_list_opt<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<ScalarValue>,
    {
        FieldValue::ScalarList(items.into_iter().map(|s| s.map(Into::into)).collect())
    }
}

/// One signable field: name, raw value and signing policy.
///
/// The policy facets replace the original per-property annotations: a field
/// is either signed or [`excluded`](Field::excluded), and may carry an
/// explicit [`order`](Field::order). Fields without an explicit order fall
/// into the [`DEFAULT_FIELD_ORDER`] bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: FieldValue,
    pub order: Option<i32>,
    pub excluded: bool,
}

impl Field {
    /// Create an included, unordered field.
    pub fn new(name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            order: None,
            excluded: false,
        }
    }

    /// Declare an explicit signing order for this field.
    pub fn order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    /// Exclude this field from signing.
    pub fn excluded(mut self) -> Self {
        self.excluded = true;
        self
    }

    /// The explicit order, or the maximum-order default bucket.
    pub fn resolved_order(&self) -> i32 {
        self.order.unwrap_or(DEFAULT_FIELD_ORDER)
    }
}

/// Capability exposed by types that can be signed.
///
/// Implementations return a snapshot of the object's fields. Nested objects
/// are described by recursively applying the same capability, via
/// [`FieldValue::nested`] and friends.
///
/// # Preconditions
///
/// The object graph must be acyclic, and the object must not be mutated
/// concurrently while a signing call is walking it. Neither condition is
/// checked at runtime.
pub trait Signable {
    /// Enumerate the object's fields in declaration-independent form.
    fn describe_fields(&self) -> Vec<Field>;
}

impl From<ScalarValue> for FieldValue {
    fn from(value: ScalarValue) -> Self {
        FieldValue::Scalar(value)
    }
}

impl<T: Into<ScalarValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Empty, |v| FieldValue::Scalar(v.into()))
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Text(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Text(value)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        ScalarValue::Int(i64::from(value))
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int(value)
    }
}

impl From<u32> for ScalarValue {
    fn from(value: u32) -> Self {
        ScalarValue::UInt(u64::from(value))
    }
}

impl From<u64> for ScalarValue {
    fn from(value: u64) -> Self {
        ScalarValue::UInt(value)
    }
}

impl From<DateTime<Utc>> for ScalarValue {
    fn from(value: DateTime<Utc>) -> Self {
        ScalarValue::Timestamp(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Scalar(value.into())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Scalar(value.into())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Scalar(value.into())
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Scalar(value.into())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Scalar(value.into())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Scalar(value.into())
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Scalar(value.into())
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Scalar(value.into())
    }
}
