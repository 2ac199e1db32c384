//! Scalar leaf values

use serde_json::Value;
use std::path::PathBuf;

/// Read/write capability for one leaf field.
///
/// Errors are plain reasons; the calling loader wraps them with the field
/// name and the source they came from.
pub trait Scalar {
    /// Assign from text, as found in environment variables, flags and
    /// declared defaults.
    fn parse_str(&mut self, raw: &str) -> Result<(), String>;

    /// Assign from a decoded file value. `null` leaves the field unchanged.
    fn assign_json(&mut self, value: &Value) -> Result<(), String>;

    /// Current value as text; empty for zero-valued optional fields.
    fn render(&self) -> String;

    fn is_zero(&self) -> bool;

    /// Bool fields accept a bare `--flag`.
    fn is_switch(&self) -> bool {
        false
    }

    /// Short type name used as the flag value placeholder.
    fn kind(&self) -> &'static str;
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "table",
    }
}

/// Boolean text forms, matching the usual flag-parsing conventions.
pub fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        other => Err(format!("invalid boolean '{other}'")),
    }
}

macro_rules! signed_scalar {
    ($($ty:ty),*) => {$(
        impl Scalar for $ty {
            fn parse_str(&mut self, raw: &str) -> Result<(), String> {
                *self = raw.trim().parse::<$ty>().map_err(|e| e.to_string())?;
                Ok(())
            }

            fn assign_json(&mut self, value: &Value) -> Result<(), String> {
                match value {
                    Value::Null => Ok(()),
                    Value::Number(n) => {
                        let wide = n.as_i64().ok_or_else(|| format!("{n} is not an integer"))?;
                        *self = <$ty>::try_from(wide)
                            .map_err(|_| format!("{wide} is out of range for {}", stringify!($ty)))?;
                        Ok(())
                    }
                    other => Err(format!("expected integer, found {}", describe(other))),
                }
            }

            fn render(&self) -> String {
                self.to_string()
            }

            fn is_zero(&self) -> bool {
                *self == 0
            }

            fn kind(&self) -> &'static str {
                "int"
            }
        }
    )*};
}

macro_rules! unsigned_scalar {
    ($($ty:ty),*) => {$(
        impl Scalar for $ty {
            fn parse_str(&mut self, raw: &str) -> Result<(), String> {
                *self = raw.trim().parse::<$ty>().map_err(|e| e.to_string())?;
                Ok(())
            }

            fn assign_json(&mut self, value: &Value) -> Result<(), String> {
                match value {
                    Value::Null => Ok(()),
                    Value::Number(n) => {
                        let wide = n
                            .as_u64()
                            .ok_or_else(|| format!("{n} is not an unsigned integer"))?;
                        *self = <$ty>::try_from(wide)
                            .map_err(|_| format!("{wide} is out of range for {}", stringify!($ty)))?;
                        Ok(())
                    }
                    other => Err(format!("expected integer, found {}", describe(other))),
                }
            }

            fn render(&self) -> String {
                self.to_string()
            }

            fn is_zero(&self) -> bool {
                *self == 0
            }

            fn kind(&self) -> &'static str {
                "uint"
            }
        }
    )*};
}

macro_rules! float_scalar {
    ($($ty:ty),*) => {$(
        impl Scalar for $ty {
            fn parse_str(&mut self, raw: &str) -> Result<(), String> {
                *self = raw.trim().parse::<$ty>().map_err(|e| e.to_string())?;
                Ok(())
            }

            fn assign_json(&mut self, value: &Value) -> Result<(), String> {
                match value {
                    Value::Null => Ok(()),
                    Value::Number(n) => {
                        let wide = n.as_f64().ok_or_else(|| format!("{n} is not a float"))?;
                        *self = wide as $ty;
                        Ok(())
                    }
                    other => Err(format!("expected float, found {}", describe(other))),
                }
            }

            fn render(&self) -> String {
                self.to_string()
            }

            fn is_zero(&self) -> bool {
                *self == 0.0
            }

            fn kind(&self) -> &'static str {
                "float"
            }
        }
    )*};
}

signed_scalar!(i8, i16, i32, i64, isize);
unsigned_scalar!(u8, u16, u32, u64, usize);
float_scalar!(f32, f64);

impl Scalar for bool {
    fn parse_str(&mut self, raw: &str) -> Result<(), String> {
        *self = parse_bool(raw.trim())?;
        Ok(())
    }

    fn assign_json(&mut self, value: &Value) -> Result<(), String> {
        match value {
            Value::Null => Ok(()),
            Value::Bool(b) => {
                *self = *b;
                Ok(())
            }
            other => Err(format!("expected boolean, found {}", describe(other))),
        }
    }

    fn render(&self) -> String {
        self.to_string()
    }

    fn is_zero(&self) -> bool {
        !*self
    }

    fn is_switch(&self) -> bool {
        true
    }

    fn kind(&self) -> &'static str {
        "bool"
    }
}

/// Text form of a scalar file value; strings are taken verbatim.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl Scalar for String {
    fn parse_str(&mut self, raw: &str) -> Result<(), String> {
        *self = raw.to_string();
        Ok(())
    }

    fn assign_json(&mut self, value: &Value) -> Result<(), String> {
        if value.is_null() {
            return Ok(());
        }
        *self = scalar_text(value)
            .ok_or_else(|| format!("expected string, found {}", describe(value)))?;
        Ok(())
    }

    fn render(&self) -> String {
        self.clone()
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn kind(&self) -> &'static str {
        "string"
    }
}

impl Scalar for char {
    fn parse_str(&mut self, raw: &str) -> Result<(), String> {
        *self = raw.parse::<char>().map_err(|e| e.to_string())?;
        Ok(())
    }

    fn assign_json(&mut self, value: &Value) -> Result<(), String> {
        match value {
            Value::Null => Ok(()),
            Value::String(s) => self.parse_str(s),
            other => Err(format!("expected character, found {}", describe(other))),
        }
    }

    fn render(&self) -> String {
        if self.is_zero() {
            String::new()
        } else {
            self.to_string()
        }
    }

    fn is_zero(&self) -> bool {
        *self == '\0'
    }

    fn kind(&self) -> &'static str {
        "char"
    }
}

impl Scalar for PathBuf {
    fn parse_str(&mut self, raw: &str) -> Result<(), String> {
        *self = PathBuf::from(raw);
        Ok(())
    }

    fn assign_json(&mut self, value: &Value) -> Result<(), String> {
        match value {
            Value::Null => Ok(()),
            Value::String(s) => self.parse_str(s),
            other => Err(format!("expected path string, found {}", describe(other))),
        }
    }

    fn render(&self) -> String {
        self.display().to_string()
    }

    fn is_zero(&self) -> bool {
        self.as_os_str().is_empty()
    }

    fn kind(&self) -> &'static str {
        "path"
    }
}

/// Lists are written as one comma-separated value in text sources.
impl Scalar for Vec<String> {
    fn parse_str(&mut self, raw: &str) -> Result<(), String> {
        *self = raw
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.to_string())
            .collect();
        Ok(())
    }

    fn assign_json(&mut self, value: &Value) -> Result<(), String> {
        match value {
            Value::Null => Ok(()),
            Value::String(s) => self.parse_str(s),
            Value::Array(items) => {
                let mut parsed = Vec::with_capacity(items.len());
                for item in items {
                    let text = scalar_text(item)
                        .ok_or_else(|| format!("expected string item, found {}", describe(item)))?;
                    parsed.push(text);
                }
                *self = parsed;
                Ok(())
            }
            other => Err(format!("expected list, found {}", describe(other))),
        }
    }

    fn render(&self) -> String {
        self.join(",")
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn kind(&self) -> &'static str {
        "list"
    }
}

impl<T: Scalar + Default> Scalar for Option<T> {
    fn parse_str(&mut self, raw: &str) -> Result<(), String> {
        let mut inner = T::default();
        inner.parse_str(raw)?;
        *self = Some(inner);
        Ok(())
    }

    fn assign_json(&mut self, value: &Value) -> Result<(), String> {
        if value.is_null() {
            *self = None;
            return Ok(());
        }
        let mut inner = T::default();
        inner.assign_json(value)?;
        *self = Some(inner);
        Ok(())
    }

    fn render(&self) -> String {
        self.as_ref().map(Scalar::render).unwrap_or_default()
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }

    fn is_switch(&self) -> bool {
        T::default().is_switch()
    }

    fn kind(&self) -> &'static str {
        T::default().kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integer_parse_and_range() {
        let mut port: u16 = 0;
        port.parse_str("8080").expect("parse");
        assert_eq!(port, 8080);

        assert!(port.parse_str("eighty").is_err());
        assert!(port.assign_json(&json!(70000)).is_err());
        assert!(port.assign_json(&json!(-1)).is_err());
        assert_eq!(port, 8080, "failed assignments leave the value alone");

        let mut offset: i32 = 0;
        offset.assign_json(&json!(-12)).expect("assign");
        assert_eq!(offset, -12);
    }

    #[test]
    fn test_bool_accepts_flag_style_forms() {
        let mut enabled = false;
        for raw in ["1", "t", "T", "TRUE", "true", "True"] {
            enabled = false;
            enabled.parse_str(raw).expect("parse");
            assert!(enabled, "{raw} should parse as true");
        }
        for raw in ["0", "f", "F", "FALSE", "false", "False"] {
            enabled = true;
            enabled.parse_str(raw).expect("parse");
            assert!(!enabled, "{raw} should parse as false");
        }
        assert!(enabled.parse_str("yes").is_err());
        assert!(enabled.is_switch());
    }

    #[test]
    fn test_string_accepts_scalar_file_values() {
        let mut version = String::new();
        version.assign_json(&json!(1.5)).expect("number");
        assert_eq!(version, "1.5");
        version.assign_json(&json!("2.0")).expect("string");
        assert_eq!(version, "2.0");
        version.assign_json(&Value::Null).expect("null");
        assert_eq!(version, "2.0");
        assert!(version.assign_json(&json!({"a": 1})).is_err());
    }

    #[test]
    fn test_list_from_text_and_array() {
        let mut tags: Vec<String> = Vec::new();
        tags.parse_str(" api, edge ,, blue ").expect("parse");
        assert_eq!(tags, vec!["api", "edge", "blue"]);
        assert_eq!(tags.render(), "api,edge,blue");

        tags.assign_json(&json!(["a", 2, true])).expect("array");
        assert_eq!(tags, vec!["a", "2", "true"]);
        assert!(tags.assign_json(&json!([["nested"]])).is_err());
    }

    #[test]
    fn test_option_wraps_inner_scalar() {
        let mut timeout: Option<u64> = None;
        assert!(timeout.is_zero());
        assert_eq!(timeout.render(), "");
        timeout.parse_str("30").expect("parse");
        assert_eq!(timeout, Some(30));
        timeout.assign_json(&Value::Null).expect("null");
        assert_eq!(timeout, None);

        let verbose: Option<bool> = None;
        assert!(verbose.is_switch());
        assert_eq!(verbose.kind(), "bool");
    }

    #[test]
    fn test_zero_values() {
        assert!(0u8.is_zero());
        assert!(0.0f64.is_zero());
        assert!(String::new().is_zero());
        assert!(PathBuf::new().is_zero());
        assert!('\0'.is_zero());
        assert!(!'x'.is_zero());
        assert!(!"x".to_string().is_zero());
    }
}
