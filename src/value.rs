//! Dynamic values handed to the store by the scripting layer
//!
//! `Value` is the tagged union every `configure` call receives. The store only
//! inspects its shape and coerces it; it never evaluates anything.
//!
//! Accessors never cast blindly: each `get_as_*` returns a [`Mismatch`] when the
//! runtime shape is not the one asked for, and the store turns that into
//! [`Error::TypeMismatch`](crate::Error::TypeMismatch) naming the offending key.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::Error;

/// Map payload of a [`Value::Map`], in the order the script wrote its entries
pub type ValueMap = IndexMap<String, Value>;

// =============================================================================
// Value Kind
// =============================================================================

/// Runtime shape of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    String,
    List,
    Map,
    Handle,
}

impl ValueKind {
    /// Human readable name used in error messages
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "boolean",
            ValueKind::Int => "integer",
            ValueKind::Float => "number",
            ValueKind::String => "string",
            ValueKind::List => "list",
            ValueKind::Map => "map",
            ValueKind::Handle => "handle",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Shape Mismatch
// =============================================================================

/// A value did not have the shape an accessor asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub expected: String,
    pub actual: String,
}

impl Mismatch {
    fn new(expected: impl Into<String>, actual: &Value) -> Self {
        Self {
            expected: expected.into(),
            actual: actual.describe(),
        }
    }

    /// Attach the configure key (or sub-field path) the value was bound to
    pub fn for_key(self, key: impl Into<String>) -> Error {
        Error::TypeMismatch {
            key: key.into(),
            expected: self.expected,
            actual: self.actual,
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {}, got {}", self.expected, self.actual)
    }
}

// =============================================================================
// Opaque Handle
// =============================================================================

/// Opaque reference to an object owned by another subsystem
///
/// Cloning a handle shares the referent. Two handles are equal only when they
/// point at the same object.
#[derive(Clone)]
pub struct Handle {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Handle {
    /// Wrap an owned object
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wrap an already shared object without copying it
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            inner: value,
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Type name of the wrapped object
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Check the concrete type of the wrapped object
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Get a shared reference to the wrapped object if it is a `T`
    #[must_use]
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner).downcast::<T>().ok()
    }

    /// Whether both handles point at the same object
    #[must_use]
    pub fn ptr_eq(&self, other: &Handle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.type_name).finish()
    }
}

impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

// =============================================================================
// Value
// =============================================================================

/// A runtime-typed value produced by the expression layer
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(ValueMap),
    Handle(Handle),
}

impl Value {
    /// Wrap an arbitrary object as an opaque handle value
    pub fn handle<T: Any + Send + Sync>(value: T) -> Self {
        Value::Handle(Handle::new(value))
    }

    /// Runtime shape of this value
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::List(_) => ValueKind::List,
            Value::Map(_) => ValueKind::Map,
            Value::Handle(_) => ValueKind::Handle,
        }
    }

    fn describe(&self) -> String {
        match self {
            Value::Handle(h) => format!("handle<{}>", h.type_name()),
            other => other.kind().to_string(),
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[must_use]
    pub fn is_map_like(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// True only for the literal boolean `true`
    ///
    /// Strings, numbers and every other shape are false no matter how truthy
    /// they look.
    #[must_use]
    pub fn is_boolean_true(&self) -> bool {
        matches!(self, Value::Bool(true))
    }

    /// Look up an entry if this value is a map
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(key),
            _ => None,
        }
    }

    pub fn get_as_map(&self) -> Result<&ValueMap, Mismatch> {
        match self {
            Value::Map(map) => Ok(map),
            other => Err(Mismatch::new(ValueKind::Map.as_str(), other)),
        }
    }

    /// Take the map payload by value
    pub fn into_map(self) -> Result<ValueMap, Mismatch> {
        match self {
            Value::Map(map) => Ok(map),
            other => Err(Mismatch::new(ValueKind::Map.as_str(), &other)),
        }
    }

    pub fn get_as_list(&self) -> Result<&[Value], Mismatch> {
        match self {
            Value::List(items) => Ok(items),
            other => Err(Mismatch::new(ValueKind::List.as_str(), other)),
        }
    }

    pub fn get_as_string(&self) -> Result<&str, Mismatch> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(Mismatch::new(ValueKind::String.as_str(), other)),
        }
    }

    pub fn get_as_bool(&self) -> Result<bool, Mismatch> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(Mismatch::new(ValueKind::Bool.as_str(), other)),
        }
    }

    /// Integer view of a numeric value
    ///
    /// Floats are accepted only when they carry no fractional part, since
    /// script engines routinely hand over whole numbers as doubles.
    pub fn get_as_int(&self) -> Result<i64, Mismatch> {
        match self {
            Value::Int(n) => Ok(*n),
            #[allow(clippy::cast_possible_truncation)]
            Value::Float(f)
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 =>
            {
                Ok(*f as i64)
            }
            other => Err(Mismatch::new(ValueKind::Int.as_str(), other)),
        }
    }

    /// Resolve an opaque handle to its concrete type
    pub fn get_value<T: Any + Send + Sync>(&self) -> Result<Arc<T>, Mismatch> {
        match self {
            Value::Handle(h) => h
                .downcast::<T>()
                .ok_or_else(|| Mismatch::new(std::any::type_name::<T>(), self)),
            other => Err(Mismatch::new(std::any::type_name::<T>(), other)),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Value::Map(map)
    }
}

impl From<Handle> for Value {
    fn from(h: Handle) -> Self {
        Value::Handle(h)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => {
                Value::Map(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
            Value::Handle(h) => serializer.serialize_str(&format!("#<{}>", h.type_name())),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_boolean_true_is_strict() {
        assert!(Value::Bool(true).is_boolean_true());
        assert!(!Value::Bool(false).is_boolean_true());
        assert!(!Value::from("true").is_boolean_true());
        assert!(!Value::Int(1).is_boolean_true());
        assert!(!Value::Null.is_boolean_true());
        assert!(!Value::from(json!({"a": true})).is_boolean_true());
    }

    #[test]
    fn test_from_json() {
        let value = Value::from(json!({
            "name": "x",
            "count": 3,
            "ratio": 0.5,
            "tags": ["a", "b"],
            "none": null
        }));

        assert!(value.is_map_like());
        assert_eq!(value.get("name"), Some(&Value::from("x")));
        assert_eq!(value.get("count"), Some(&Value::Int(3)));
        assert_eq!(value.get("ratio"), Some(&Value::Float(0.5)));
        assert_eq!(value.get("none"), Some(&Value::Null));
        assert_eq!(value.get("tags").unwrap().get_as_list().unwrap().len(), 2);
    }

    #[test]
    fn test_get_as_int() {
        assert_eq!(Value::Int(42).get_as_int(), Ok(42));
        assert_eq!(Value::Float(5000.0).get_as_int(), Ok(5000));
        assert!(Value::Float(1.5).get_as_int().is_err());
        assert!(Value::from("10").get_as_int().is_err());
    }

    #[test]
    fn test_mismatch_describes_both_sides() {
        let err = Value::from("x").get_as_map().unwrap_err();
        assert_eq!(err.expected, "map");
        assert_eq!(err.actual, "string");
        assert_eq!(err.to_string(), "expected map, got string");
    }

    #[test]
    fn test_handle_downcast_and_identity() {
        #[derive(Debug, PartialEq)]
        struct Token(u8);

        let handle = Handle::new(Token(7));
        let copy = handle.clone();
        let other = Handle::new(Token(7));

        assert!(handle.is::<Token>());
        assert_eq!(*handle.downcast::<Token>().unwrap(), Token(7));
        assert!(handle.downcast::<String>().is_none());
        assert!(handle.ptr_eq(&copy));
        assert_ne!(handle, other);

        let value = Value::from(handle);
        assert_eq!(value.get_value::<Token>().unwrap().0, 7);
        let err = value.get_value::<String>().unwrap_err();
        assert!(err.actual.starts_with("handle<"));
    }

    #[test]
    fn test_serialize_renders_handles_as_text() {
        let mut map = ValueMap::new();
        map.insert("n".into(), Value::Int(1));
        map.insert("h".into(), Value::handle(5u8));
        let json = serde_json::to_value(Value::Map(map)).unwrap();

        assert_eq!(json["n"], json!(1));
        assert_eq!(json["h"], json!("#<u8>"));
    }

    #[test]
    fn test_from_json_keeps_entry_order() {
        let value = Value::from(json!({"zeta": 1, "alpha": 2, "mid": 3}));
        let keys: Vec<&str> = value.get_as_map().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<String>), Value::Null);
        assert_eq!(Value::from(Some("a")), Value::from("a"));
    }
}
