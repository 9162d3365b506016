use std::cmp::Ordering;
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A numeric metric value.
///
/// Integers are kept as `i128` so that any `u64` or `i64` counter, and the
/// `2^64` wrap modulus, can be represented without loss. Only integers in
/// `i64::MIN..=u64::MAX` can be serialized. Arithmetic between
/// two integers stays integral; a float on either side promotes the result
/// to a float.
#[derive(Debug, Clone, Copy)]
pub enum Value {
    Integer(i128),
    Float(f64),
}

impl Value {
    /// Modulus of a 32-bit counter.
    pub const WRAP_32: Value = Value::Integer(1_i128 << 32);
    /// Modulus of a 64-bit counter.
    pub const WRAP_64: Value = Value::Integer(1_i128 << 64);

    pub const ZERO: Value = Value::Integer(0);

    pub fn as_f64(self) -> f64 {
        match self {
            Value::Integer(i) => i as f64,
            Value::Float(f) => f,
        }
    }

    /// Returns `self - rhs`, or `None` on integer overflow.
    pub fn checked_sub(self, rhs: Value) -> Option<Value> {
        match (self, rhs) {
            (Value::Integer(a), Value::Integer(b)) => a.checked_sub(b).map(Value::Integer),
            (a, b) => Some(Value::Float(a.as_f64() - b.as_f64())),
        }
    }

    /// Returns `self + rhs`, or `None` on integer overflow.
    pub fn checked_add(self, rhs: Value) -> Option<Value> {
        match (self, rhs) {
            (Value::Integer(a), Value::Integer(b)) => a.checked_add(b).map(Value::Integer),
            (a, b) => Some(Value::Float(a.as_f64() + b.as_f64())),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Integer(i128::from(value))
                }
            }
        )*
    };
}

impl_from_int!(u8, u16, u32, u64, i8, i16, i32, i64);

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Value::Integer(i) => {
                if let Ok(u) = u64::try_from(i) {
                    serializer.serialize_u64(u)
                } else if let Ok(s) = i64::try_from(i) {
                    serializer.serialize_i64(s)
                } else {
                    Err(serde::ser::Error::custom(format!(
                        "integer {i} is outside the storable range"
                    )))
                }
            }
            Value::Float(f) if f.is_finite() => serializer.serialize_f64(f),
            Value::Float(f) => Err(serde::ser::Error::custom(format!(
                "non-finite value {f} cannot be stored"
            ))),
        }
    }
}

struct ValueVisitor;

impl Visitor<'_> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer or floating point number")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<Value, E> {
        Ok(Value::Integer(v))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Value, E> {
        i128::try_from(v)
            .map(Value::Integer)
            .map_err(|_| E::invalid_value(de::Unexpected::Other("u128 out of range"), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}
