// dashvtk_variant/src/variant.rs

#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl Number {
    #[inline]
    pub const fn is_int(&self) -> bool {
        matches!(self, Number::I64(_) | Number::U64(_))
    }

    #[inline]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::F64(_))
    }

    #[inline]
    pub fn as_i64_lossy(&self) -> Option<i64> {
        match *self {
            Number::I64(v) => Some(v),
            Number::U64(v) => i64::try_from(v).ok(),
            Number::F64(_) => None,
        }
    }

    #[inline]
    pub fn as_f64_lossy(&self) -> f64 {
        match *self {
            Number::I64(v) => v as f64,
            Number::U64(v) => v as f64,
            Number::F64(v) => v,
        }
    }

    /// Integral value, accepting floats with no fractional part (`3.0`).
    pub fn as_integral(&self) -> Option<i64> {
        match *self {
            Number::F64(v) if v.fract() == 0.0 && v.is_finite() => {
                if v >= i64::MIN as f64 && v <= i64::MAX as f64 {
                    Some(v as i64)
                } else {
                    None
                }
            }
            Number::F64(_) => None,
            _ => self.as_i64_lossy(),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I64(v) => write!(f, "{v}"),
            Number::U64(v) => write!(f, "{v}"),
            Number::F64(v) => write!(f, "{v}"),
        }
    }
}

/// Coarse shape of a value, used when reporting type mismatches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Integer,
    Float,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Float => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A property value: what a node carries for each schema entry.
#[derive(Clone, Debug, PartialEq)]
pub enum Variant {
    Null,

    Bool(bool),
    Number(Number),

    String(Arc<str>),

    // --- Containers (serde_json-like) ---
    Array(Vec<Variant>),

    // Deterministic ordering by default (stable serialization).
    Object(BTreeMap<Arc<str>, Variant>),
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Null => write!(f, "null"),
            Variant::Bool(v) => write!(f, "{v}"),
            Variant::Number(v) => write!(f, "{v}"),
            Variant::String(v) => write!(f, "{:?}", v.as_ref()),
            Variant::Array(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            }
            Variant::Object(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {}", key.as_ref(), value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

// -------------------- Constructors --------------------

impl Variant {
    #[inline]
    pub const fn null() -> Self {
        Variant::Null
    }
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Variant::Null)
    }

    #[inline]
    pub fn string<S: AsRef<str>>(s: S) -> Self {
        Variant::String(Arc::<str>::from(s.as_ref()))
    }

    #[inline]
    pub fn object() -> Self {
        Variant::Object(BTreeMap::new())
    }

    #[inline]
    pub fn array() -> Self {
        Variant::Array(Vec::new())
    }

    /// Object from `(key, value)` pairs; later keys win.
    pub fn object_from<K, V, I>(entries: I) -> Self
    where
        K: AsRef<str>,
        V: Into<Variant>,
        I: IntoIterator<Item = (K, V)>,
    {
        Variant::Object(
            entries
                .into_iter()
                .map(|(k, v)| (Arc::<str>::from(k.as_ref()), v.into()))
                .collect(),
        )
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Variant::Null => ValueKind::Null,
            Variant::Bool(_) => ValueKind::Bool,
            Variant::Number(n) if n.is_int() => ValueKind::Integer,
            Variant::Number(_) => ValueKind::Float,
            Variant::String(_) => ValueKind::String,
            Variant::Array(_) => ValueKind::Array,
            Variant::Object(_) => ValueKind::Object,
        }
    }
}

// -------------------- Accessors --------------------

impl Variant {
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Variant::Bool(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_number(&self) -> Option<Number> {
        match *self {
            Variant::Number(n) => Some(n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_f64_lossy(&self) -> Option<f64> {
        self.as_number().map(|n| n.as_f64_lossy())
    }

    #[inline]
    pub fn as_integral(&self) -> Option<i64> {
        self.as_number().and_then(|n| n.as_integral())
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&[Variant]> {
        match self {
            Variant::Array(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Variant>> {
        match self {
            Variant::Array(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<&BTreeMap<Arc<str>, Variant>> {
        match self {
            Variant::Object(m) => Some(m),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object_mut(&mut self) -> Option<&mut BTreeMap<Arc<str>, Variant>> {
        match self {
            Variant::Object(m) => Some(m),
            _ => None,
        }
    }

    /// Member lookup on an object value.
    pub fn get(&self, key: &str) -> Option<&Variant> {
        self.as_object().and_then(|m| m.get(key))
    }

    /// Flat numeric view of an array; `None` if any element is not a number.
    pub fn numbers(&self) -> Option<Vec<f64>> {
        self.as_array()?
            .iter()
            .map(Variant::as_f64_lossy)
            .collect::<Option<Vec<_>>>()
    }

    /// Integral view of an array; `None` if any element is not integral.
    pub fn integers(&self) -> Option<Vec<i64>> {
        self.as_array()?
            .iter()
            .map(Variant::as_integral)
            .collect::<Option<Vec<_>>>()
    }

    /// Shallow merge: keys of `overrides` replace keys of `self`.
    /// Returns `false` (and leaves `self` untouched) unless both are objects.
    pub fn merge_object(&mut self, overrides: &Variant) -> bool {
        match (self.as_object_mut(), overrides.as_object()) {
            (Some(base), Some(over)) => {
                for (k, v) in over {
                    base.insert(k.clone(), v.clone());
                }
                true
            }
            _ => false,
        }
    }
}

// -------------------- From impls (ergonomic construction) --------------------

impl From<bool> for Variant {
    #[inline]
    fn from(v: bool) -> Self {
        Variant::Bool(v)
    }
}
impl From<Number> for Variant {
    #[inline]
    fn from(v: Number) -> Self {
        Variant::Number(v)
    }
}

impl From<i32> for Variant {
    #[inline]
    fn from(v: i32) -> Self {
        Variant::Number(Number::I64(v as i64))
    }
}
impl From<i64> for Variant {
    #[inline]
    fn from(v: i64) -> Self {
        Variant::Number(Number::I64(v))
    }
}
impl From<u8> for Variant {
    #[inline]
    fn from(v: u8) -> Self {
        Variant::Number(Number::I64(v as i64))
    }
}
impl From<u32> for Variant {
    #[inline]
    fn from(v: u32) -> Self {
        Variant::Number(Number::I64(v as i64))
    }
}
impl From<u64> for Variant {
    #[inline]
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(v) => Variant::Number(Number::I64(v)),
            Err(_) => Variant::Number(Number::U64(v)),
        }
    }
}
impl From<usize> for Variant {
    #[inline]
    fn from(v: usize) -> Self {
        Variant::from(v as u64)
    }
}

impl From<f32> for Variant {
    #[inline]
    fn from(v: f32) -> Self {
        Variant::Number(Number::F64(v as f64))
    }
}
impl From<f64> for Variant {
    #[inline]
    fn from(v: f64) -> Self {
        Variant::Number(Number::F64(v))
    }
}

impl From<&str> for Variant {
    #[inline]
    fn from(v: &str) -> Self {
        Variant::String(Arc::<str>::from(v))
    }
}
impl From<String> for Variant {
    #[inline]
    fn from(v: String) -> Self {
        Variant::String(Arc::<str>::from(v))
    }
}
impl From<Arc<str>> for Variant {
    #[inline]
    fn from(v: Arc<str>) -> Self {
        Variant::String(v)
    }
}

impl<T: Into<Variant>> From<Vec<T>> for Variant {
    #[inline]
    fn from(v: Vec<T>) -> Self {
        Variant::Array(v.into_iter().map(Into::into).collect())
    }
}
impl<T: Into<Variant>, const N: usize> From<[T; N]> for Variant {
    #[inline]
    fn from(v: [T; N]) -> Self {
        Variant::Array(v.into_iter().map(Into::into).collect())
    }
}
impl From<BTreeMap<Arc<str>, Variant>> for Variant {
    #[inline]
    fn from(v: BTreeMap<Arc<str>, Variant>) -> Self {
        Variant::Object(v)
    }
}
impl<T: Into<Variant>> From<Option<T>> for Variant {
    #[inline]
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Variant::Null)
    }
}

// -------------------- JSON conversion --------------------

impl Variant {
    pub fn from_json_value(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Variant::Null,
            JsonValue::Bool(v) => Variant::Bool(v),
            JsonValue::Number(v) => {
                if let Some(i) = v.as_i64() {
                    Variant::from(i)
                } else if let Some(u) = v.as_u64() {
                    Variant::from(u)
                } else if let Some(f) = v.as_f64() {
                    Variant::from(f)
                } else {
                    Variant::Null
                }
            }
            JsonValue::String(v) => Variant::from(v),
            JsonValue::Array(values) => {
                Variant::Array(values.into_iter().map(Variant::from_json_value).collect())
            }
            JsonValue::Object(object) => Variant::Object(
                object
                    .into_iter()
                    .map(|(k, v)| (Arc::<str>::from(k), Variant::from_json_value(v)))
                    .collect::<BTreeMap<Arc<str>, Variant>>(),
            ),
        }
    }

    pub fn to_json_value(&self) -> JsonValue {
        match self {
            Variant::Null => JsonValue::Null,
            Variant::Bool(v) => JsonValue::Bool(*v),
            Variant::Number(v) => number_to_json_value(*v),
            Variant::String(v) => JsonValue::String(v.as_ref().to_string()),
            Variant::Array(v) => JsonValue::Array(v.iter().map(Variant::to_json_value).collect()),
            Variant::Object(v) => JsonValue::Object(
                v.iter()
                    .map(|(k, v)| (k.as_ref().to_string(), v.to_json_value()))
                    .collect::<JsonMap<String, JsonValue>>(),
            ),
        }
    }
}

fn number_to_json_value(number: Number) -> JsonValue {
    match number {
        Number::I64(v) => JsonValue::Number(JsonNumber::from(v)),
        Number::U64(v) => JsonValue::Number(JsonNumber::from(v)),
        Number::F64(v) => float_to_json(v),
    }
}

// NaN and infinities have no JSON spelling.
fn float_to_json(value: f64) -> JsonValue {
    match JsonNumber::from_f64(value) {
        Some(v) => JsonValue::Number(v),
        None => JsonValue::Null,
    }
}
