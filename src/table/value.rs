use std::fmt;
use std::num::ParseFloatError;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// A single cell of an event table
///
/// Source tables are heterogeneous: the same column may hold integers in one export and strings
/// in another (`1430` versus `"14:30"`). Cells keep whatever the loader produced and every engine
/// interprets them on demand.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate", untagged)
)]
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Missing,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// `true` for absent cells, `NaN` floats and blank strings.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Float(x) => x.is_nan(),
            Value::Text(s) => s.trim().is_empty(),
            Value::Int(_) => false,
        }
    }

    /// Interpret the cell as a number.
    ///
    /// Missing cells give `Ok(None)`. Text is parsed after trimming and a malformed string is
    /// reported as an error instead of being treated as missing.
    pub fn number(&self) -> Result<Option<f64>, ParseFloatError> {
        if self.is_missing() {
            return Ok(None);
        }
        match self {
            Value::Int(x) => Ok(Some(*x as f64)),
            Value::Float(x) => Ok(Some(*x)),
            Value::Text(s) => s.trim().parse::<f64>().map(Some),
            Value::Missing => Ok(None),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Missing
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => write!(f, "NaN"),
            Value::Int(x) => write!(f, "{}", x),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(x: i64) -> Self {
        Value::Int(x)
    }
}

impl From<i32> for Value {
    fn from(x: i32) -> Self {
        Value::Int(x as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(x: Option<T>) -> Self {
        x.map(Into::into).unwrap_or(Value::Missing)
    }
}
