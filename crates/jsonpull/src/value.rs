//! JSON value tree.
//!
//! [`Value`] is a closed sum type over every JSON scalar and container.
//! Objects preserve insertion order and duplicate-key inserts overwrite in
//! place, keeping the position of the first insertion.

use core::fmt;

use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::{config::JsonConfig, error::CoercionError, generator::Generator};

/// Ordered string-keyed mapping used by [`Value::Object`].
pub type Map = IndexMap<String, Value>;
/// Ordered heterogeneous sequence used by [`Value::Array`].
pub type Array = Vec<Value>;

/// A JSON value as defined by [RFC 8259], with integers and exact-precision
/// decimals kept apart.
///
/// # Examples
///
/// ```
/// use jsonpull::{Map, Value};
///
/// let mut map = Map::new();
/// map.insert("key".to_string(), Value::String("value".into()));
/// let v = Value::Object(map);
/// assert_eq!(v.to_string(), r#"{"key":"value"}"#);
/// ```
///
/// [RFC 8259]: https://datatracker.ietf.org/doc/html/rfc8259
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// The literal `null`.
    Null,
    /// `true` or `false`.
    Bool(bool),
    /// A number without fractional part or exponent, held as `i64`.
    Int(i64),
    /// A fractional or exponent-form number, held at exact precision.
    Decimal(Decimal),
    /// A string.
    String(String),
    /// An ordered sequence of values.
    Array(Array),
    /// An insertion-ordered string-keyed mapping.
    Object(Map),
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl Value {
    /// Returns `true` if the value is [`Null`].
    ///
    /// [`Null`]: Value::Null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` if the value is [`Bool`].
    ///
    /// [`Bool`]: Value::Bool
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(..))
    }

    /// Returns `true` if the value is [`Int`] or [`Decimal`].
    ///
    /// [`Int`]: Value::Int
    /// [`Decimal`]: Value::Decimal
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Int(..) | Self::Decimal(..))
    }

    /// Returns `true` if the value is [`String`].
    ///
    /// [`String`]: Value::String
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    /// Returns `true` if the value is [`Array`].
    ///
    /// [`Array`]: Value::Array
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    /// Returns `true` if the value is [`Object`].
    ///
    /// [`Object`]: Value::Object
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }

    /// Borrows the string payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer payload, if any.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the numeric payload widened to an exact decimal.
    #[must_use]
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Int(i) => Some(Decimal::from(*i)),
            Self::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    /// Returns the boolean payload, if any. See [`to_bool`](Self::to_bool)
    /// for the coercing variant.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrows the array payload, if any.
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Borrows the object payload, if any.
    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(m) => Some(m),
            _ => None,
        }
    }

    /// Coerces this value to a boolean.
    ///
    /// `true`, the strings `"true"` and `"1"`, and one-valued numbers map
    /// to `true`; `false`, `"false"`, `"0"`, and zero-valued numbers map
    /// to `false`. Anything else is a [`CoercionError::NotBoolean`].
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonpull::Value;
    ///
    /// assert_eq!(Value::String("false".into()).to_bool(), Ok(false));
    /// assert!(Value::String("maybe".into()).to_bool().is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// [`CoercionError::NotBoolean`] for any non-coercible value.
    pub fn to_bool(&self) -> Result<bool, CoercionError> {
        match self {
            Self::Bool(b) => Ok(*b),
            Self::Int(1) => Ok(true),
            Self::Int(0) => Ok(false),
            Self::Decimal(d) if *d == Decimal::ONE => Ok(true),
            Self::Decimal(d) if *d == Decimal::ZERO => Ok(false),
            Self::String(s) if s == "true" || s == "1" => Ok(true),
            Self::String(s) if s == "false" || s == "0" => Ok(false),
            _ => Err(CoercionError::NotBoolean),
        }
    }

    /// Looks up a key when this value is an object.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|m| m.get(key))
    }

    /// Typed object getter: the string under `key`, if present.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Like [`get_str`](Self::get_str) but falls back to `default` when
    /// the key is missing or not a string.
    #[must_use]
    pub fn get_str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get_str(key).unwrap_or(default)
    }

    /// Typed object getter: the integer under `key`, if present.
    #[must_use]
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    /// Like [`get_i64`](Self::get_i64) with an explicit default.
    #[must_use]
    pub fn get_i64_or(&self, key: &str, default: i64) -> i64 {
        self.get_i64(key).unwrap_or(default)
    }

    /// Coercing object getter for booleans.
    ///
    /// # Errors
    ///
    /// [`CoercionError::NotBoolean`] when the key is missing, null, or the
    /// value cannot be coerced.
    pub fn get_bool(&self, key: &str) -> Result<bool, CoercionError> {
        match self.get(key) {
            Some(v) => v.to_bool(),
            None => Err(CoercionError::NotBoolean),
        }
    }

    /// Like [`get_bool`](Self::get_bool), but the explicitly requested
    /// default stands in for a missing, null, or uncoercible value.
    #[must_use]
    pub fn get_bool_or(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(Value::Null) | None => default,
            Some(v) => v.to_bool().unwrap_or(default),
        }
    }
}

/// `Display` renders compact JSON through the [`Generator`], so the text a
/// value formats to is exactly what the generator would emit.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out: Vec<u8> = Vec::new();
        let mut generator = Generator::new(&mut out, JsonConfig::default());
        generator
            .write_value(self)
            .and_then(|()| generator.close())
            .map_err(|_| fmt::Error)?;
        f.write_str(core::str::from_utf8(&out).map_err(|_| fmt::Error)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates() {
        assert!(Value::Null.is_null());
        assert!(Value::Bool(true).is_bool());
        assert!(Value::Int(1).is_number());
        assert!(Value::Decimal(Decimal::new(15, 1)).is_number());
        assert!(Value::String("x".into()).is_string());
        assert!(Value::Array(vec![]).is_array());
        assert!(Value::Object(Map::new()).is_object());
    }

    #[test]
    fn boolean_coercion_contract() {
        assert_eq!(Value::Bool(true).to_bool(), Ok(true));
        assert_eq!(Value::Int(1).to_bool(), Ok(true));
        assert_eq!(Value::Int(0).to_bool(), Ok(false));
        assert_eq!(Value::String("true".into()).to_bool(), Ok(true));
        assert_eq!(Value::String("1".into()).to_bool(), Ok(true));
        assert_eq!(Value::String("0".into()).to_bool(), Ok(false));
        assert_eq!(Value::Decimal(Decimal::ONE).to_bool(), Ok(true));
        // The literal string "false" coerces to false, never true.
        assert_eq!(Value::String("false".into()).to_bool(), Ok(false));
        assert_eq!(
            Value::Int(2).to_bool(),
            Err(CoercionError::NotBoolean)
        );
        assert_eq!(
            Value::String("yes".into()).to_bool(),
            Err(CoercionError::NotBoolean)
        );
        assert_eq!(Value::Null.to_bool(), Err(CoercionError::NotBoolean));
    }

    #[test]
    fn typed_getters_with_defaults() {
        let mut map = Map::new();
        map.insert("name".to_string(), Value::from("alice"));
        map.insert("age".to_string(), Value::from(30i64));
        map.insert("active".to_string(), Value::from("yes"));
        let v = Value::Object(map);

        assert_eq!(v.get_str("name"), Some("alice"));
        assert_eq!(v.get_str_or("missing", "bob"), "bob");
        assert_eq!(v.get_i64("age"), Some(30));
        assert_eq!(v.get_i64_or("missing", -1), -1);
        assert!(v.get_bool("name").is_err());
        assert!(v.get_bool_or("missing", true));
        // "yes" is uncoercible, so the requested default wins.
        assert!(!v.get_bool_or("active", false));
    }

    #[test]
    fn object_insert_order_and_overwrite() {
        let mut map = Map::new();
        map.insert("a".to_string(), Value::Int(1));
        map.insert("b".to_string(), Value::Int(2));
        map.insert("a".to_string(), Value::Int(3));
        assert_eq!(map.len(), 2);
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(map["a"], Value::Int(3));
    }

    #[test]
    fn serde_round_trip() {
        let mut map = Map::new();
        map.insert("price".to_string(), Value::Decimal(Decimal::new(150, 2)));
        map.insert(
            "items".to_string(),
            Value::Array(vec![Value::Int(1), Value::Null, Value::from("x")]),
        );
        let v = Value::Object(map);
        let text = serde_json::to_string(&v).unwrap();
        let back: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn display_is_compact_json() {
        let mut map = Map::new();
        map.insert("k".to_string(), Value::Array(vec![
            Value::Null,
            Value::Bool(false),
            Value::Int(-5),
        ]));
        assert_eq!(
            Value::Object(map).to_string(),
            r#"{"k":[null,false,-5]}"#
        );
    }
}
