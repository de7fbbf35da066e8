//! Optional-field access over untyped CricAPI payloads.
//!
//! The upstream shape differs between match formats (a Twenty20 scorecard may
//! omit whole sections), so every lookup in the flattener goes through
//! [`Field`]: a missing key, a null, or a value of the wrong shape reads as
//! "absent" instead of an error.

use serde_json::Value;

#[derive(Debug, Clone, Copy)]
pub struct Field<'a>(Option<&'a Value>);

impl<'a> Field<'a> {
    pub fn of(value: &'a Value) -> Self {
        Self(Some(value))
    }

    pub fn get(self, key: &str) -> Field<'a> {
        Self(self.0.and_then(|v| v.get(key)))
    }

    pub fn at(self, idx: usize) -> Field<'a> {
        Self(self.0.and_then(|v| v.get(idx)))
    }

    /// Elements of an array. Anything that is not an array reads as empty.
    pub fn items(self) -> &'a [Value] {
        self.0
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Scalar as text. Strings are returned exactly as sent upstream.
    pub fn string(self) -> Option<String> {
        match self.0? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn int(self) -> Option<i64> {
        match self.0? {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.is_finite())
                    .map(|f| f as i64)
            }),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    pub fn float(self) -> Option<f64> {
        match self.0? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            _ => None,
        }
    }

    pub fn bool(self) -> Option<bool> {
        match self.0? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Some(true),
                "false" | "0" | "no" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}
