//! Read-only access to an already-parsed trace document.
//!
//! The analysis never touches a concrete document type. It walks the tree
//! through [`TraceValue`], which never fails: looking up a missing field or
//! converting a value of the wrong type yields an *absent* value, zero, or an
//! empty string. "Missing" and "present but wrong type" are indistinguishable,
//! so a malformed trace degrades to a partial report instead of an error.
//!
//! [`JsonValue`] adapts a [`serde_json::Value`]; tests build fixtures with
//! `serde_json::json!`.

/// Navigable node of a semi-structured trace document.
pub trait TraceValue: Clone {
    /// Field of an object, or an absent value.
    fn field(&self, name: &str) -> Self;

    /// False for absent values (missing fields, out-of-range entries).
    fn valid(&self) -> bool;

    /// Numeric value as `f64`; 0.0 if not a number.
    fn as_double(&self) -> f64;

    /// Numeric value as `i64`; 0 if not a number.
    fn as_long(&self) -> i64;

    /// String value; empty if not a string.
    fn as_string(&self) -> String;

    /// Array entries in document order; empty if not an array.
    fn entries(&self) -> Vec<Self>;

    /// Object fields in document order; empty if not an object.
    fn fields(&self) -> Vec<(String, Self)>;
}

/// [`TraceValue`] over a borrowed [`serde_json::Value`].
///
/// `None` is the absent marker. Field order follows the document because the
/// crate enables serde_json's `preserve_order`.
#[derive(Debug, Clone, Copy)]
pub struct JsonValue<'a>(Option<&'a serde_json::Value>);

impl<'a> JsonValue<'a> {
    pub fn new(value: &'a serde_json::Value) -> Self {
        Self(Some(value))
    }

    /// An absent value.
    pub fn absent() -> Self {
        Self(None)
    }
}

impl TraceValue for JsonValue<'_> {
    fn field(&self, name: &str) -> Self {
        Self(self.0.and_then(|v| v.as_object()).and_then(|o| o.get(name)))
    }

    fn valid(&self) -> bool {
        self.0.is_some()
    }

    fn as_double(&self) -> f64 {
        self.0.and_then(|v| v.as_f64()).unwrap_or(0.0)
    }

    fn as_long(&self) -> i64 {
        match self.0 {
            Some(v) => v
                .as_i64()
                .or_else(|| v.as_f64().map(|f| f as i64))
                .unwrap_or(0),
            None => 0,
        }
    }

    fn as_string(&self) -> String {
        self.0
            .and_then(|v| v.as_str())
            .map(str::to_owned)
            .unwrap_or_default()
    }

    fn entries(&self) -> Vec<Self> {
        match self.0.and_then(|v| v.as_array()) {
            Some(array) => array.iter().map(|v| Self(Some(v))).collect(),
            None => Vec::new(),
        }
    }

    fn fields(&self) -> Vec<(String, Self)> {
        match self.0.and_then(|v| v.as_object()) {
            Some(object) => object
                .iter()
                .map(|(k, v)| (k.clone(), Self(Some(v))))
                .collect(),
            None => Vec::new(),
        }
    }
}
