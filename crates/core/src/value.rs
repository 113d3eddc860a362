//! Attribute value types for lensdb
//!
//! This module defines:
//! - AttrValue: the value stored in an entity attribute
//! - ValueType: the type discriminator for attribute values
//!
//! ## Value Model
//!
//! - Four types only: Long, Double, Text, Bool
//! - No implicit coercions: `Long(1) != Double(1.0)`
//! - Values are totally ordered so they can key indices and drive sorts.
//!   Doubles use IEEE-754 `totalOrder`: `NaN == NaN`, `-0.0 < 0.0`.
//! - Values of different types order by type rank (Long < Double < Text < Bool).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Attribute value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// 64-bit signed integer
    Long,
    /// 64-bit floating point
    Double,
    /// UTF-8 string
    Text,
    /// Boolean
    Bool,
}

impl ValueType {
    /// Type name as used in configuration files
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Long => "long",
            ValueType::Double => "double",
            ValueType::Text => "text",
            ValueType::Bool => "bool",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Long => "Long",
            ValueType::Double => "Double",
            ValueType::Text => "Text",
            ValueType::Bool => "Bool",
        };
        f.write_str(name)
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "long" | "int" | "integer" => Ok(ValueType::Long),
            "double" | "float" | "real" => Ok(ValueType::Double),
            "text" | "string" => Ok(ValueType::Text),
            "bool" | "boolean" => Ok(ValueType::Bool),
            other => Err(format!("unknown value type '{}'", other)),
        }
    }
}

/// An attribute value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AttrValue {
    /// 64-bit signed integer
    Long(i64),
    /// 64-bit floating point (IEEE-754)
    Double(f64),
    /// UTF-8 string
    Text(String),
    /// Boolean value
    Bool(bool),
}

impl AttrValue {
    /// Get the value type
    pub fn value_type(&self) -> ValueType {
        match self {
            AttrValue::Long(_) => ValueType::Long,
            AttrValue::Double(_) => ValueType::Double,
            AttrValue::Text(_) => ValueType::Text,
            AttrValue::Bool(_) => ValueType::Bool,
        }
    }

    /// Get as i64 if this is a Long
    pub fn as_long(&self) -> Option<i64> {
        match self {
            AttrValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as f64 if this is a Double
    pub fn as_double(&self) -> Option<f64> {
        match self {
            AttrValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as &str if this is a Text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get as bool if this is a Bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttrValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            AttrValue::Long(_) => 0,
            AttrValue::Double(_) => 1,
            AttrValue::Text(_) => 2,
            AttrValue::Bool(_) => 3,
        }
    }
}

impl PartialEq for AttrValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AttrValue {}

impl Ord for AttrValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (AttrValue::Long(a), AttrValue::Long(b)) => a.cmp(b),
            (AttrValue::Double(a), AttrValue::Double(b)) => a.total_cmp(b),
            (AttrValue::Text(a), AttrValue::Text(b)) => a.cmp(b),
            (AttrValue::Bool(a), AttrValue::Bool(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for AttrValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for AttrValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            AttrValue::Long(v) => v.hash(state),
            // consistent with total_cmp equality
            AttrValue::Double(v) => v.to_bits().hash(state),
            AttrValue::Text(s) => s.hash(state),
            AttrValue::Bool(b) => b.hash(state),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Long(v) => write!(f, "{}", v),
            AttrValue::Double(v) => write!(f, "{}", v),
            AttrValue::Text(s) => write!(f, "{:?}", s),
            AttrValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        AttrValue::Long(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Double(v)
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}
