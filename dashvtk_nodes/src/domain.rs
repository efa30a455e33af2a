use dashvtk_variant::{ValueKind, Variant};
use thiserror::Error;

/// Why a property value was refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropertyIssue {
    #[error("unknown property")]
    Unknown,
    #[error("property is read-only")]
    ReadOnly,
    #[error("required property is missing")]
    Missing,
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: ValueKind,
    },
    #[error("{0}")]
    OutOfDomain(String),
    #[error("not a trigger property")]
    NotATrigger,
}

/// Set of values a property accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Domain {
    Any,
    Bool,
    Number {
        min: Option<f64>,
        max: Option<f64>,
    },
    Integer {
        min: Option<i64>,
        max: Option<i64>,
    },
    String,
    OneOf(&'static [&'static str]),
    NumberArray {
        len: Option<usize>,
    },
    IntegerArray {
        len: Option<usize>,
        min: Option<i64>,
    },
    /// Array of strings drawn from a fixed set.
    StringSet(&'static [&'static str]),
    Object,
    ObjectArray,
}

impl Domain {
    pub const NUMBER: Domain = Domain::Number {
        min: None,
        max: None,
    };
    pub const PORT: Domain = Domain::Integer {
        min: Some(0),
        max: None,
    };
    pub const VEC2: Domain = Domain::NumberArray { len: Some(2) };
    pub const VEC3: Domain = Domain::NumberArray { len: Some(3) };
    pub const NUMBERS: Domain = Domain::NumberArray { len: None };

    pub const fn expected(&self) -> &'static str {
        match self {
            Domain::Any => "any value",
            Domain::Bool => "boolean",
            Domain::Number { .. } => "number",
            Domain::Integer { .. } => "integer",
            Domain::String | Domain::OneOf(_) => "string",
            Domain::NumberArray { .. } => "array of numbers",
            Domain::IntegerArray { .. } => "array of integers",
            Domain::StringSet(_) => "array of strings",
            Domain::Object => "object",
            Domain::ObjectArray => "array of objects",
        }
    }

    pub fn check(&self, value: &Variant) -> Result<(), PropertyIssue> {
        let mismatch = || PropertyIssue::TypeMismatch {
            expected: self.expected(),
            found: value.kind(),
        };
        match *self {
            Domain::Any => Ok(()),
            Domain::Bool => value.as_bool().map(|_| ()).ok_or_else(mismatch),
            Domain::Number { min, max } => {
                let n = value.as_f64_lossy().ok_or_else(mismatch)?;
                check_range(n, min, max)
            }
            Domain::Integer { min, max } => {
                let n = value.as_integral().ok_or_else(mismatch)?;
                check_range(n as f64, min.map(|m| m as f64), max.map(|m| m as f64))
            }
            Domain::String => value.as_str().map(|_| ()).ok_or_else(mismatch),
            Domain::OneOf(options) => {
                let s = value.as_str().ok_or_else(mismatch)?;
                if options.contains(&s) {
                    Ok(())
                } else {
                    Err(PropertyIssue::OutOfDomain(format!(
                        "`{s}` is not one of: {}",
                        options.join(", ")
                    )))
                }
            }
            Domain::NumberArray { len } => {
                let values = value.numbers().ok_or_else(mismatch)?;
                check_len(values.len(), len)
            }
            Domain::IntegerArray { len, min } => {
                let values = value.integers().ok_or_else(mismatch)?;
                check_len(values.len(), len)?;
                match (min, min.and_then(|m| values.iter().find(|v| **v < m))) {
                    (Some(min), Some(bad)) => Err(PropertyIssue::OutOfDomain(format!(
                        "value {bad} is below minimum {min}"
                    ))),
                    _ => Ok(()),
                }
            }
            Domain::StringSet(options) => {
                let items = value.as_array().ok_or_else(mismatch)?;
                for item in items {
                    let s = item.as_str().ok_or_else(mismatch)?;
                    if !options.contains(&s) {
                        return Err(PropertyIssue::OutOfDomain(format!(
                            "`{s}` is not one of: {}",
                            options.join(", ")
                        )));
                    }
                }
                Ok(())
            }
            Domain::Object => value.as_object().map(|_| ()).ok_or_else(mismatch),
            Domain::ObjectArray => {
                let items = value.as_array().ok_or_else(mismatch)?;
                if items.iter().all(|i| i.as_object().is_some()) {
                    Ok(())
                } else {
                    Err(mismatch())
                }
            }
        }
    }
}

fn check_range(n: f64, min: Option<f64>, max: Option<f64>) -> Result<(), PropertyIssue> {
    if let Some(min) = min {
        if n < min {
            return Err(PropertyIssue::OutOfDomain(format!(
                "value {n} is below minimum {min}"
            )));
        }
    }
    if let Some(max) = max {
        if n > max {
            return Err(PropertyIssue::OutOfDomain(format!(
                "value {n} is above maximum {max}"
            )));
        }
    }
    Ok(())
}

fn check_len(found: usize, expected: Option<usize>) -> Result<(), PropertyIssue> {
    match expected {
        Some(len) if len != found => Err(PropertyIssue::OutOfDomain(format!(
            "expected {len} values, found {found}"
        ))),
        _ => Ok(()),
    }
}
