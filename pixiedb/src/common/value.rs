use crate::common::{TAG_ARRAY, TAG_BOOL, TAG_F64, TAG_I64, TAG_MAP, TAG_STRING, TAG_TIMESTAMP};
use crate::errors::{ErrorKind, PixieError, PixieResult};
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use indexmap::IndexMap;
use itertools::Itertools;
use std::any::Any;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};

/// Ordered key-value storage of a [Value::Map].
///
/// Keys are [Value]s so that a map built in memory can hold any key, but only
/// string keys can be encoded. Insertion order is kept so that a decoded map
/// re-encodes to the same bytes; it is not significant for equality.
pub type ValueMap = IndexMap<Value, Value>;

/// Represents a document payload. It can be a scalar like [Value::I64] or
/// [Value::String] or a composite like [Value::Array] or [Value::Map].
///
/// The set of variants is closed: every variant has a wire encoding, and
/// anything else is rejected with [ErrorKind::UnsupportedValueType].
///
/// # Variants
/// - I64(i64): 64-bit signed integer
/// - F64(f64): IEEE-754 double, kept bit-for-bit
/// - String(String): UTF-8 text
/// - Bool(bool): boolean true/false
/// - Timestamp(DateTime<Utc>): UTC instant with nanosecond precision
/// - Array(Vec<Value>): ordered sequence of values
/// - Map(ValueMap): key-value mapping, keys must be strings to be encoded
///
/// # Usage
/// ```rust
/// use pixiedb::common::Value;
/// use pixiedb::{map, val};
///
/// let v: Value = 42.into();
/// assert_eq!(v, val!(42));
///
/// let user = map! { "name": "Alice", "age": 30, "langs": ["Rust", "C++"] };
/// assert_eq!(user.get("name").and_then(|v| v.as_string()), Some("Alice"));
/// ```
#[derive(Clone)]
pub enum Value {
    /// Represents a signed 64-bit integer value.
    I64(i64),
    /// Represents a 64-bit floating point value.
    F64(f64),
    /// Represents a string value.
    String(String),
    /// Represents a boolean value.
    Bool(bool),
    /// Represents a point in time, normalized to UTC.
    Timestamp(DateTime<Utc>),
    /// Represents an array value.
    Array(Vec<Value>),
    /// Represents a map.
    Map(ValueMap),
}

impl Default for Value {
    /// An empty map, the payload of a document created without data.
    fn default() -> Self {
        Value::Map(ValueMap::new())
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_debug_string(0))
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_pretty_json(0))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::I64(a), Value::I64(b)) => a == b,
            // total order equality: bit-exact, so NaN == NaN and 0.0 != -0.0
            (Value::F64(a), Value::F64(b)) => a.total_cmp(b).is_eq(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tag().hash(state);
        match self {
            Value::I64(v) => v.hash(state),
            Value::F64(v) => v.to_bits().hash(state),
            Value::String(v) => v.hash(state),
            Value::Bool(v) => v.hash(state),
            Value::Timestamp(v) => v.hash(state),
            Value::Array(v) => v.hash(state),
            // map equality ignores order, so only the size takes part
            Value::Map(v) => v.len().hash(state),
        }
    }
}

impl Value {
    /// Creates a new [Value] from the given value using runtime type inspection.
    ///
    /// Supports the integer types that fit in an `i64`, `f32`/`f64`, `bool`,
    /// `String`/`&'static str`, `DateTime<Utc>`, `Vec<Value>`, [ValueMap] and
    /// [Value] itself. Any other type fails with
    /// [ErrorKind::UnsupportedValueType], as does a `u64`/`usize` beyond `i64::MAX`.
    pub fn new<T: Any>(value: T) -> PixieResult<Value> {
        let any = &value as &dyn Any;

        if let Some(v) = any.downcast_ref::<i64>() {
            Ok(Value::I64(*v))
        } else if let Some(v) = any.downcast_ref::<i32>() {
            Ok(Value::I64(*v as i64))
        } else if let Some(v) = any.downcast_ref::<i16>() {
            Ok(Value::I64(*v as i64))
        } else if let Some(v) = any.downcast_ref::<i8>() {
            Ok(Value::I64(*v as i64))
        } else if let Some(v) = any.downcast_ref::<u32>() {
            Ok(Value::I64(*v as i64))
        } else if let Some(v) = any.downcast_ref::<u16>() {
            Ok(Value::I64(*v as i64))
        } else if let Some(v) = any.downcast_ref::<u8>() {
            Ok(Value::I64(*v as i64))
        } else if let Some(v) = any.downcast_ref::<u64>() {
            integer_from(i64::try_from(*v).ok(), "u64")
        } else if let Some(v) = any.downcast_ref::<usize>() {
            integer_from(i64::try_from(*v).ok(), "usize")
        } else if let Some(v) = any.downcast_ref::<isize>() {
            integer_from(i64::try_from(*v).ok(), "isize")
        } else if let Some(v) = any.downcast_ref::<f64>() {
            Ok(Value::F64(*v))
        } else if let Some(v) = any.downcast_ref::<f32>() {
            Ok(Value::F64(*v as f64))
        } else if let Some(v) = any.downcast_ref::<bool>() {
            Ok(Value::Bool(*v))
        } else if let Some(v) = any.downcast_ref::<String>() {
            Ok(Value::String(v.clone()))
        } else if let Some(v) = any.downcast_ref::<&'static str>() {
            Ok(Value::String(v.to_string()))
        } else if let Some(v) = any.downcast_ref::<DateTime<Utc>>() {
            Ok(Value::Timestamp(*v))
        } else if let Some(v) = any.downcast_ref::<Vec<Value>>() {
            Ok(Value::Array(v.clone()))
        } else if let Some(v) = any.downcast_ref::<ValueMap>() {
            Ok(Value::Map(v.clone()))
        } else if let Some(v) = any.downcast_ref::<Value>() {
            Ok(v.clone())
        } else {
            let type_name = std::any::type_name::<T>();
            log::error!("Unsupported type {} to convert to Value", type_name);
            Err(PixieError::new(
                &format!("Unsupported type {} to convert to Value", type_name),
                ErrorKind::UnsupportedValueType,
            ))
        }
    }

    /// Creates a new [Value] from anything that implements [`Into<Value>`].
    pub fn from<T: Into<Value>>(value: T) -> Value {
        value.into()
    }

    /// Creates a [Value::Array] from a vector of convertible values.
    pub fn from_vec<T: Into<Value>>(values: Vec<T>) -> Value {
        Value::Array(values.into_iter().map(|v| v.into()).collect())
    }

    /// Wire type tag of this value.
    pub fn tag(&self) -> u8 {
        match self {
            Value::I64(_) => TAG_I64,
            Value::F64(_) => TAG_F64,
            Value::String(_) => TAG_STRING,
            Value::Bool(_) => TAG_BOOL,
            Value::Timestamp(_) => TAG_TIMESTAMP,
            Value::Array(_) => TAG_ARRAY,
            Value::Map(_) => TAG_MAP,
        }
    }

    /// Human readable name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::I64(_) => "integer",
            Value::F64(_) => "float",
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Timestamp(_) => "timestamp",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::Timestamp(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut ValueMap> {
        match self {
            Value::Map(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_i64(&self) -> bool {
        matches!(self, Value::I64(_))
    }

    pub fn is_f64(&self) -> bool {
        matches!(self, Value::F64(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_timestamp(&self) -> bool {
        matches!(self, Value::Timestamp(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Returns `true` for an empty map, array or string.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::String(v) => v.is_empty(),
            Value::Array(v) => v.is_empty(),
            Value::Map(v) => v.is_empty(),
            _ => false,
        }
    }

    /// Looks up a string key when this value is a [Value::Map].
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()
            .and_then(|map| map.get(&Value::String(key.to_string())))
    }

    pub(crate) fn to_pretty_json(&self, indent: usize) -> String {
        match self {
            Value::I64(v) => v.to_string(),
            Value::F64(v) => format!("{:?}", v),
            Value::String(v) => format!("{:?}", v),
            Value::Bool(v) => v.to_string(),
            Value::Timestamp(v) => {
                format!("\"{}\"", v.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Value::Array(v) => {
                if v.is_empty() {
                    return "[]".to_string();
                }

                let indent_str = " ".repeat(indent + 2);
                let items = v
                    .iter()
                    .map(|value| format!("{}{}", indent_str, value.to_pretty_json(indent + 2)))
                    .join(",\n");
                format!("[\n{}\n{}]", items, " ".repeat(indent))
            }
            Value::Map(v) => {
                if v.is_empty() {
                    return "{}".to_string();
                }

                let indent_str = " ".repeat(indent + 2);
                let items = v
                    .iter()
                    .map(|(key, value)| {
                        format!(
                            "{}{}: {}",
                            indent_str,
                            key.to_pretty_json(indent + 2),
                            value.to_pretty_json(indent + 2)
                        )
                    })
                    .join(",\n");
                format!("{{\n{}\n{}}}", items, " ".repeat(indent))
            }
        }
    }

    pub(crate) fn to_debug_string(&self, indent: usize) -> String {
        match self {
            Value::I64(v) => format!("i64({})", v),
            Value::F64(v) => format!("f64({:?})", v),
            Value::String(v) => format!("string({:?})", v),
            Value::Bool(v) => format!("bool({})", v),
            Value::Timestamp(v) => format!(
                "timestamp({})",
                v.to_rfc3339_opts(SecondsFormat::Nanos, true)
            ),
            Value::Array(v) => {
                if v.is_empty() {
                    return "array([])".to_string();
                }

                let indent_str = " ".repeat(indent + 2);
                let items = v
                    .iter()
                    .map(|value| format!("{}{}", indent_str, value.to_debug_string(indent + 2)))
                    .join(",\n");
                format!("array([\n{}\n{}])", items, " ".repeat(indent))
            }
            Value::Map(v) => {
                if v.is_empty() {
                    return "map({})".to_string();
                }

                let indent_str = " ".repeat(indent + 2);
                let items = v
                    .iter()
                    .map(|(key, value)| {
                        format!(
                            "{}{}: {}",
                            indent_str,
                            key.to_debug_string(indent + 2),
                            value.to_debug_string(indent + 2)
                        )
                    })
                    .join(",\n");
                format!("map({{\n{}\n{}}})", items, " ".repeat(indent))
            }
        }
    }
}

fn integer_from(value: Option<i64>, type_name: &str) -> PixieResult<Value> {
    match value {
        Some(v) => Ok(Value::I64(v)),
        None => {
            log::error!("{} value does not fit in a 64-bit signed integer", type_name);
            Err(PixieError::new(
                &format!("{} value does not fit in a 64-bit signed integer", type_name),
                ErrorKind::UnsupportedValueType,
            ))
        }
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                #[inline]
                fn from(value: $t) -> Self {
                    Value::I64(value as i64)
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Value {
    #[inline]
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<f32> for Value {
    #[inline]
    fn from(value: f32) -> Self {
        Value::F64(value as f64)
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(value: DateTime<Tz>) -> Self {
        Value::Timestamp(value.with_timezone(&Utc))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::Array(value.into_iter().map(|v| v.into()).collect())
    }
}

impl From<ValueMap> for Value {
    fn from(value: ValueMap) -> Self {
        Value::Map(value)
    }
}

/// A macro to create a `Value` from a given expression.
///
/// ```rust
/// use pixiedb::common::Value;
/// use pixiedb::val;
///
/// assert_eq!(val!(42), Value::I64(42));
/// assert_eq!(val!("hello"), Value::String("hello".to_string()));
/// assert_eq!(val!(true), Value::Bool(true));
/// ```
#[macro_export]
macro_rules! val {
    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}

/// Creates a [Value::Map] from `key: value` pairs. Values may be nested maps
/// in braces, arrays in brackets, or any expression convertible into a value.
///
/// ```rust
/// use pixiedb::map;
///
/// let user = map! {
///     "name": "Alice",
///     "address": { "city": "Osaka", "zip": 5300001 },
///     "tags": ["admin", "ops"],
/// };
/// assert!(user.is_map());
/// ```
#[macro_export]
macro_rules! map {
    () => {
        $crate::common::Value::Map($crate::common::ValueMap::new())
    };

    ($($key:tt : $value:tt),+ $(,)?) => {
        {
            let mut map = $crate::common::ValueMap::new();
            $(
                map.insert($crate::common::Value::from($key), $crate::map_value!($value));
            )+
            $crate::common::Value::Map(map)
        }
    };
}

/// Helper macro to convert values for the map! macro.
#[macro_export]
macro_rules! map_value {
    // match a nested map
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::map!{ $($key : $value),* }
    };

    // match an array of values
    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::map_value!($value)),*])
    };

    // match an expression
    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
