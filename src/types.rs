//! Core types shared by the validator, the keyword handlers and the finder.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Deep equality with JSON number semantics (`1` equals `1.0`).
pub fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| json_equal(x, y))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(k, v)| y.get(k).is_some_and(|other| json_equal(v, other)))
        }
        _ => a == b,
    }
}

/// Direction of the data under validation.
///
/// Changes the meaning of `readOnly` (rejected in requests) and
/// `writeOnly` (rejected in responses).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Request,
    Response,
}

impl Direction {
    /// The schema keyword whose presence is forbidden in this direction.
    pub fn forbidden_keyword(&self) -> &'static str {
        match self {
            Direction::Request => "readOnly",
            Direction::Response => "writeOnly",
        }
    }

    /// Create direction from a request flag (true = Request, false = Response).
    pub fn from_request_flag(is_request: bool) -> Self {
        if is_request {
            Direction::Request
        } else {
            Direction::Response
        }
    }
}

/// A value of the `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

impl SchemaType {
    /// Parse a type name. Returns `None` for names outside the OpenAPI set.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "string" => Some(SchemaType::String),
            "number" => Some(SchemaType::Number),
            "integer" => Some(SchemaType::Integer),
            "boolean" => Some(SchemaType::Boolean),
            "array" => Some(SchemaType::Array),
            "object" => Some(SchemaType::Object),
            "null" => Some(SchemaType::Null),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Integer => "integer",
            SchemaType::Boolean => "boolean",
            SchemaType::Array => "array",
            SchemaType::Object => "object",
            SchemaType::Null => "null",
        }
    }

    /// Whether `value` is an instance of this type.
    ///
    /// Integers are numbers without a fractional part, so `3.0` is an integer.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (SchemaType::String, Value::String(_)) => true,
            (SchemaType::Number, Value::Number(_)) => true,
            (SchemaType::Integer, Value::Number(n)) => {
                n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
            }
            (SchemaType::Boolean, Value::Bool(_)) => true,
            (SchemaType::Array, Value::Array(_)) => true,
            (SchemaType::Object, Value::Object(_)) => true,
            (SchemaType::Null, Value::Null) => true,
            _ => false,
        }
    }
}

/// Options for a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Whether the data is a request or a response.
    pub direction: Direction,
    /// When false, the `format` keyword is treated as an annotation only.
    /// Defaults to true.
    pub formats: bool,
}

impl ValidateOptions {
    /// Create options for a direction with format checking enabled.
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            formats: true,
        }
    }

    /// Enable or disable `format` checking.
    pub fn formats(mut self, formats: bool) -> Self {
        self.formats = formats;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn direction_forbidden_keyword() {
        assert_eq!(Direction::Request.forbidden_keyword(), "readOnly");
        assert_eq!(Direction::Response.forbidden_keyword(), "writeOnly");
    }

    #[test]
    fn schema_type_parse() {
        assert_eq!(SchemaType::parse("string"), Some(SchemaType::String));
        assert_eq!(SchemaType::parse("null"), Some(SchemaType::Null));
        assert_eq!(SchemaType::parse("text"), None);
        assert_eq!(SchemaType::parse(""), None);
    }

    #[test]
    fn integer_accepts_whole_floats() {
        assert!(SchemaType::Integer.matches(&json!(3)));
        assert!(SchemaType::Integer.matches(&json!(3.0)));
        assert!(!SchemaType::Integer.matches(&json!(3.5)));
        assert!(!SchemaType::Integer.matches(&json!("3")));
    }

    #[test]
    fn number_accepts_integers() {
        assert!(SchemaType::Number.matches(&json!(1)));
        assert!(SchemaType::Number.matches(&json!(0.0)));
    }

    #[test]
    fn json_equal_compares_numbers_by_value() {
        assert!(json_equal(&json!(1), &json!(1.0)));
        assert!(json_equal(&json!({"a": [1, 2]}), &json!({"a": [1.0, 2]})));
        assert!(!json_equal(&json!([1, 2]), &json!([2, 1])));
        assert!(!json_equal(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
    }

    #[test]
    fn validate_options_default_formats_on() {
        let opts = ValidateOptions::new(Direction::Request);
        assert!(opts.formats);
        assert!(!opts.formats(false).formats);
    }
}
