//! Datum - native values handed to the query builder.
//!
//! A `Datum` is any JSON-like value a caller can pass where a term is
//! expected. Coercion turns scalars into DATUM terms, arrays into
//! MAKE_ARRAY terms and objects into MAKE_OBJ terms.
//!
//! # Supported Types
//!
//! - **Null**: Absence of a value
//! - **Boolean**: true or false
//! - **Integer**: signed 64-bit integers, and unsigned ones above `i64::MAX`
//! - **Number**: f64 floating point numbers
//! - **String**: UTF-8 encoded text
//! - **Array**: Ordered list of datums
//! - **Object**: Key-value map, iterated in insertion order
//!
//! # Example
//!
//! ```rust
//! use reqlwire::reql::Datum;
//! use indexmap::IndexMap;
//!
//! let arr_val = Datum::from(vec![1, 2, 3]);
//!
//! let mut obj = IndexMap::new();
//! obj.insert("name".to_string(), Datum::from("Alice"));
//! obj.insert("age".to_string(), Datum::from(30));
//! let obj_val = Datum::Object(obj);
//!
//! assert!(arr_val.as_array().is_some());
//! assert_eq!(obj_val.to_string(), r#"{"name": "Alice", "age": 30}"#);
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A JSON-like value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Datum {
    Null,
    Boolean(bool),
    Integer(i64),
    Unsigned(u64),
    Number(f64),
    String(String),
    Array(Vec<Datum>),
    Object(IndexMap<String, Datum>),
}

impl Datum {
    /// Check if datum is null
    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }

    /// True for null, booleans, numbers and strings.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Datum::Array(_) | Datum::Object(_))
    }

    /// Get as string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Datum::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as number. Integers beyond 2^53 lose precision here.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Datum::Integer(n) => Some(*n as f64),
            Datum::Unsigned(n) => Some(*n as f64),
            Datum::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as signed integer, if the value is an integer that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Datum::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as unsigned integer, if the value is a non-negative integer.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Datum::Integer(n) => u64::try_from(*n).ok(),
            Datum::Unsigned(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Datum::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as array
    pub fn as_array(&self) -> Option<&Vec<Datum>> {
        match self {
            Datum::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Get as object
    pub fn as_object(&self) -> Option<&IndexMap<String, Datum>> {
        match self {
            Datum::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Converts a scalar datum into its JSON form.
    ///
    /// Returns `None` for arrays, objects and non-finite numbers, none of
    /// which may appear as a raw value in an encoded term.
    pub fn to_wire_scalar(&self) -> Option<serde_json::Value> {
        match self {
            Datum::Null => Some(serde_json::Value::Null),
            Datum::Boolean(b) => Some(serde_json::Value::Bool(*b)),
            Datum::Integer(n) => Some(serde_json::Value::from(*n)),
            Datum::Unsigned(n) => Some(serde_json::Value::from(*n)),
            Datum::Number(n) => serde_json::Number::from_f64(*n).map(serde_json::Value::Number),
            Datum::String(s) => Some(serde_json::Value::String(s.clone())),
            Datum::Array(_) | Datum::Object(_) => None,
        }
    }
}

// Conversions
impl From<bool> for Datum {
    fn from(b: bool) -> Self {
        Datum::Boolean(b)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),+) => {
        $(impl From<$ty> for Datum {
            fn from(n: $ty) -> Self {
                Datum::Integer(n as i64)
            }
        })+
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<isize> for Datum {
    fn from(n: isize) -> Self {
        Datum::from(n as i64)
    }
}

// Unsigned values that fit in i64 are kept as `Integer` so equal numbers
// compare equal whatever type they came from.
impl From<u64> for Datum {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(n) => Datum::Integer(n),
            Err(_) => Datum::Unsigned(n),
        }
    }
}

impl From<usize> for Datum {
    fn from(n: usize) -> Self {
        Datum::from(n as u64)
    }
}

impl From<f32> for Datum {
    fn from(n: f32) -> Self {
        Datum::Number(n as f64)
    }
}

impl From<f64> for Datum {
    fn from(n: f64) -> Self {
        Datum::Number(n)
    }
}

impl From<serde_json::Number> for Datum {
    fn from(n: serde_json::Number) -> Self {
        if let Some(n) = n.as_i64() {
            Datum::Integer(n)
        } else if let Some(n) = n.as_u64() {
            Datum::Unsigned(n)
        } else {
            Datum::Number(n.as_f64().unwrap_or(f64::NAN))
        }
    }
}

impl From<String> for Datum {
    fn from(s: String) -> Self {
        Datum::String(s)
    }
}

impl From<&str> for Datum {
    fn from(s: &str) -> Self {
        Datum::String(s.to_string())
    }
}

impl<T: Into<Datum>> From<Vec<T>> for Datum {
    fn from(items: Vec<T>) -> Self {
        Datum::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Datum>> From<Option<T>> for Datum {
    fn from(value: Option<T>) -> Self {
        value.map_or(Datum::Null, Into::into)
    }
}

impl<T: Into<Datum>> From<IndexMap<String, T>> for Datum {
    fn from(map: IndexMap<String, T>) -> Self {
        Datum::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl From<serde_json::Value> for Datum {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Datum::Null,
            serde_json::Value::Bool(b) => Datum::Boolean(b),
            serde_json::Value::Number(n) => Datum::from(n),
            serde_json::Value::String(s) => Datum::String(s),
            serde_json::Value::Array(arr) => {
                Datum::Array(arr.into_iter().map(Datum::from).collect())
            }
            serde_json::Value::Object(obj) => {
                Datum::Object(obj.into_iter().map(|(k, v)| (k, Datum::from(v))).collect())
            }
        }
    }
}

impl std::fmt::Display for Datum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Datum::Null => write!(f, "null"),
            Datum::Boolean(b) => write!(f, "{}", b),
            Datum::Integer(n) => write!(f, "{}", n),
            Datum::Unsigned(n) => write!(f, "{}", n),
            Datum::Number(n) => write!(f, "{:?}", n),
            Datum::String(s) => write!(f, "{:?}", s),
            Datum::Array(arr) => {
                write!(f, "[")?;
                for (i, item) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Datum::Object(obj) => {
                write!(f, "{{")?;
                for (i, (key, value)) in obj.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}
