use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::key::Key;

/// Typed property value as stored remotely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Null
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    I(i64),
    /// Double
    F(f64),
    /// String
    S(String),
    /// Binary
    B(Bytes),
    /// Timestamp (microseconds since epoch)
    Ts(i64),
    /// Key reference
    K(Key),
    /// List
    L(Vec<Value>),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::S(s.into())
    }

    pub fn integer(i: i64) -> Self {
        Value::I(i)
    }

    pub fn double(f: f64) -> Self {
        Value::F(f)
    }

    pub fn binary(b: impl Into<Bytes>) -> Self {
        Value::B(b.into())
    }

    pub fn timestamp(micros: i64) -> Self {
        Value::Ts(micros)
    }

    pub fn key(k: Key) -> Self {
        Value::K(k)
    }

    pub fn list(values: Vec<Value>) -> Self {
        Value::L(values)
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::S(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::I(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::F(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&Bytes> {
        match self {
            Value::B(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<i64> {
        match self {
            Value::Ts(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn as_key(&self) -> Option<&Key> {
        match self {
            Value::K(k) => Some(k),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::L(l) => Some(l),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_constructors_and_accessors() {
        let s = Value::string("hello");
        assert_eq!(s.as_string(), Some("hello"));
        assert_eq!(s.as_integer(), None);

        let i = Value::integer(42);
        assert_eq!(i.as_integer(), Some(42));

        let f = Value::double(2.5);
        assert_eq!(f.as_double(), Some(2.5));

        let b = Value::binary(b"blob".to_vec());
        assert_eq!(b.as_binary().map(|b| b.as_ref()), Some(b"blob".as_ref()));
    }

    #[test]
    fn test_value_timestamp() {
        let now = 1609459200000000i64; // 2021-01-01 00:00:00 UTC in micros
        let ts = Value::timestamp(now);
        assert_eq!(ts.as_timestamp(), Some(now));

        let before_epoch = Value::timestamp(-1000);
        assert_eq!(before_epoch.as_timestamp(), Some(-1000));
    }

    #[test]
    fn test_value_key_reference() {
        let v = Value::key(Key::with_id("Task", 9));
        assert_eq!(v.as_key().and_then(|k| k.id()), Some(9));
    }

    #[test]
    fn test_value_list_and_null() {
        let v = Value::list(vec![Value::integer(1), Value::string("two")]);
        let items = v.as_list().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].as_string(), Some("two"));

        assert!(Value::Null.is_null());
        assert!(!v.is_null());
    }
}
