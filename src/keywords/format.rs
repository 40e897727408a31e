//! `format` for strings (`date`, `date-time`, `email`, `uuid`, `byte`,
//! `ipv4`, `ipv6`, `uri`) and numbers (`int32`, `int64`, `float`, `double`).
//! Unknown formats are accepted.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::OnceLock;

use base64::Engine;
use chrono::{DateTime, NaiveDate};
use regex::Regex;
use serde_json::{Number, Value};
use uuid::Uuid;

use super::Context;
use crate::error::{InvalidSchema, ValidateError};

pub(super) fn format(cx: &Context<'_>, value: &Value) -> Result<(), ValidateError> {
    let name = value
        .as_str()
        .ok_or_else(|| InvalidSchema::new("format", "expected a format name"))?;
    if !cx.validator.options().formats {
        return Ok(());
    }

    let valid = match cx.data {
        Value::String(s) => string_format(name, s),
        Value::Number(n) => number_format(name, n),
        _ => true,
    };
    if !valid {
        return Err(cx.mismatch("format", format!("value is not a valid {}", name)));
    }
    Ok(())
}

fn string_format(name: &str, s: &str) -> bool {
    match name {
        "date" => NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok(),
        "date-time" => DateTime::parse_from_rfc3339(s).is_ok(),
        "email" => email_regex().is_match(s),
        "uuid" => s.len() == 36 && Uuid::parse_str(s).is_ok(),
        "byte" => base64::engine::general_purpose::STANDARD.decode(s).is_ok(),
        "ipv4" => s.parse::<Ipv4Addr>().is_ok(),
        "ipv6" => s.parse::<Ipv6Addr>().is_ok(),
        "uri" => uri_regex().is_match(s),
        _ => true,
    }
}

fn number_format(name: &str, n: &Number) -> bool {
    match name {
        "int32" => match n.as_i64() {
            Some(i) => i32::try_from(i).is_ok(),
            None => n.as_f64().is_some_and(|f| {
                f.fract() == 0.0 && f >= f64::from(i32::MIN) && f <= f64::from(i32::MAX)
            }),
        },
        "int64" => n.is_i64() || n.as_f64().is_some_and(|f| f.fract() == 0.0 && f.abs() < 9.2e18),
        "float" => n.as_f64().is_some_and(|f| f.abs() <= f64::from(f32::MAX)),
        "double" => n.as_f64().is_some_and(f64::is_finite),
        _ => true,
    }
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"))
}

fn uri_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:\S*$").expect("uri regex"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn num(value: Value) -> Number {
        match value {
            Value::Number(n) => n,
            other => panic!("not a number: {}", other),
        }
    }

    #[test]
    fn dates() {
        assert!(string_format("date", "2024-02-29"));
        assert!(!string_format("date", "2023-02-29"));
        assert!(string_format("date-time", "2024-01-01T10:00:00Z"));
        assert!(string_format("date-time", "2024-01-01T10:00:00.5+02:00"));
        assert!(!string_format("date-time", "2024-01-01 10:00"));
    }

    #[test]
    fn identifiers() {
        assert!(string_format("uuid", "67e55044-10b1-426f-9247-bb680e5fe0c8"));
        assert!(!string_format("uuid", "67e5504410b1426f9247bb680e5fe0c8"));
        assert!(string_format("email", "someone@example.com"));
        assert!(!string_format("email", "someone@"));
        assert!(string_format("uri", "https://example.com/a?b=c"));
        assert!(!string_format("uri", "not a uri"));
    }

    #[test]
    fn addresses_and_bytes() {
        assert!(string_format("ipv4", "192.168.0.1"));
        assert!(!string_format("ipv4", "256.0.0.1"));
        assert!(string_format("ipv6", "::1"));
        assert!(string_format("byte", "aGVsbG8="));
        assert!(!string_format("byte", "not base64!"));
    }

    #[test]
    fn unknown_formats_pass() {
        assert!(string_format("password", "hunter2"));
        assert!(number_format("decimal", &num(json!(1.5))));
    }

    #[test]
    fn integer_ranges() {
        assert!(number_format("int32", &num(json!(2147483647))));
        assert!(!number_format("int32", &num(json!(2147483648u64))));
        assert!(!number_format("int32", &num(json!(1.5))));
        assert!(number_format("int32", &num(json!(3.0))));
        assert!(!number_format("int32", &num(json!(3.0e10))));
        assert!(number_format("int64", &num(json!(-5))));
        assert!(!number_format("int64", &num(json!(u64::MAX))));
    }
}
