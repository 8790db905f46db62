//! JavaScript object-literal subset
//!
//! The engine file is only ever touched through three named assignments
//! (`scales`, `scaleCitations`, `scaleCategories`). This module finds such an
//! assignment, reads its object literal into ordered [`JsValue`]s and writes
//! it back in a fixed layout. It is not a JavaScript parser: functions,
//! spreads, computed keys and template interpolation are rejected.

pub mod locate;
pub mod parser;
pub mod writer;

pub use locate::{find_assignment, Assignment};
pub use parser::parse_object;
pub use writer::write_object;

/// Ordered key/value members of an object literal.
pub type Members = Vec<(String, JsValue)>;

#[derive(Debug, Clone, PartialEq)]
pub enum JsValue {
    String(String),
    /// Source spelling of the number, so untouched values are re-emitted as read.
    Number(String),
    Bool(bool),
    Null,
    Array(Vec<JsValue>),
    Object(Members),
}

impl JsValue {
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    pub fn number(value: f64) -> Self {
        Self::Number(format_number(value))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value; numeric strings are accepted as well.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(raw) => raw.replace('_', "").parse().ok(),
            Self::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Members> {
        match self {
            Self::Object(members) => Some(members),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::Array(_) | Self::Object(_))
    }
}

/// First member named `key`.
pub fn member<'a>(members: &'a [(String, JsValue)], key: &str) -> Option<&'a JsValue> {
    members.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

/// Integral values print without a fractional part (`21`, not `21.0`).
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
