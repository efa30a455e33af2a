use std::fmt;

use dashvtk_variant::ValueKind;

use crate::domain::PropertyIssue;

/// JavaScript typed-array element types a DataArray can be sent as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypedArrayKind {
    Int8,
    Uint8,
    Uint8Clamped,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    Float64,
}

impl TypedArrayKind {
    pub const ALL: &'static [TypedArrayKind] = &[
        TypedArrayKind::Int8,
        TypedArrayKind::Uint8,
        TypedArrayKind::Uint8Clamped,
        TypedArrayKind::Int16,
        TypedArrayKind::Uint16,
        TypedArrayKind::Int32,
        TypedArrayKind::Uint32,
        TypedArrayKind::Float32,
        TypedArrayKind::Float64,
    ];

    pub const NAMES: &'static [&'static str] = &[
        "Int8Array",
        "Uint8Array",
        "Uint8ClampedArray",
        "Int16Array",
        "Uint16Array",
        "Int32Array",
        "Uint32Array",
        "Float32Array",
        "Float64Array",
    ];

    pub const fn as_str(self) -> &'static str {
        Self::NAMES[self as usize]
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| Self::ALL[i])
    }

    pub const fn is_integer(self) -> bool {
        !matches!(self, TypedArrayKind::Float32 | TypedArrayKind::Float64)
    }

    /// Inclusive value range for integer kinds.
    pub const fn integer_range(self) -> Option<(i64, i64)> {
        match self {
            TypedArrayKind::Int8 => Some((i8::MIN as i64, i8::MAX as i64)),
            TypedArrayKind::Uint8 | TypedArrayKind::Uint8Clamped => Some((0, u8::MAX as i64)),
            TypedArrayKind::Int16 => Some((i16::MIN as i64, i16::MAX as i64)),
            TypedArrayKind::Uint16 => Some((0, u16::MAX as i64)),
            TypedArrayKind::Int32 => Some((i32::MIN as i64, i32::MAX as i64)),
            TypedArrayKind::Uint32 => Some((0, u32::MAX as i64)),
            TypedArrayKind::Float32 | TypedArrayKind::Float64 => None,
        }
    }

    /// Checks that every value is representable in this element type.
    pub fn check_values(self, values: &[f64]) -> Result<(), PropertyIssue> {
        let Some((min, max)) = self.integer_range() else {
            return Ok(());
        };
        for (i, v) in values.iter().enumerate() {
            if !v.is_finite() || v.fract() != 0.0 {
                return Err(PropertyIssue::TypeMismatch {
                    expected: "integer",
                    found: ValueKind::Float,
                });
            }
            if *v < min as f64 || *v > max as f64 {
                return Err(PropertyIssue::OutOfDomain(format!(
                    "{self} value at {i} ({v}) is outside {min}..={max}"
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for TypedArrayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
