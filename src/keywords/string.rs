//! String keywords: `minLength`, `maxLength`, `pattern`.
//!
//! Lengths are counted in Unicode code points. Patterns are ECMA-262 style
//! and may use look-around and backreferences.

use fancy_regex::Regex;
use serde_json::Value;

use super::{expect_non_negative, Context};
use crate::error::{InvalidSchema, ValidateError};

pub(super) fn min_length(cx: &Context<'_>, value: &Value) -> Result<(), ValidateError> {
    let min = expect_non_negative("minLength", value)?;
    let Some(s) = cx.data.as_str() else {
        return Ok(());
    };

    let len = s.chars().count();
    if (len as u64) < min {
        return Err(cx.mismatch(
            "minLength",
            format!("string must be at least {} characters, got {}", min, len),
        ));
    }
    Ok(())
}

pub(super) fn max_length(cx: &Context<'_>, value: &Value) -> Result<(), ValidateError> {
    let max = expect_non_negative("maxLength", value)?;
    let Some(s) = cx.data.as_str() else {
        return Ok(());
    };

    let len = s.chars().count();
    if (len as u64) > max {
        return Err(cx.mismatch(
            "maxLength",
            format!("string must be at most {} characters, got {}", max, len),
        ));
    }
    Ok(())
}

/// Patterns are unanchored: the string matches if any part of it does.
pub(super) fn pattern(cx: &Context<'_>, value: &Value) -> Result<(), ValidateError> {
    let source = value
        .as_str()
        .ok_or_else(|| InvalidSchema::new("pattern", "expected a regular expression string"))?;
    let re = Regex::new(source)
        .map_err(|e| InvalidSchema::new("pattern", format!("cannot compile {}: {}", source, e)))?;
    let Some(s) = cx.data.as_str() else {
        return Ok(());
    };

    let matched = re.is_match(s).map_err(|e| {
        InvalidSchema::new("pattern", format!("cannot evaluate {}: {}", source, e))
    })?;
    if !matched {
        return Err(cx.mismatch("pattern", format!("string does not match {}", source)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breadcrumb::BreadCrumb;
    use crate::types::Direction;
    use crate::validator::SchemaValidator;
    use serde_json::json;

    fn check(data: &Value, pattern_source: &str) -> Result<(), ValidateError> {
        let validator = SchemaValidator::for_direction(Direction::Request);
        let schema = json!({ "pattern": pattern_source });
        let cx = Context {
            validator: &validator,
            data,
            schema: schema.as_object().unwrap(),
            breadcrumb: &BreadCrumb::empty(),
            refs: &[],
        };
        pattern(&cx, &schema["pattern"])
    }

    #[test]
    fn look_ahead_is_supported() {
        assert!(check(&json!("hello"), r"^(?!\s*$).+").is_ok());
        let err = check(&json!("   "), r"^(?!\s*$).+").unwrap_err();
        assert!(!err.is_invalid_schema());
    }

    #[test]
    fn backreference_is_supported() {
        assert!(check(&json!("abab"), r"^(ab)\1$").is_ok());
        assert!(check(&json!("abba"), r"^(ab)\1$").is_err());
    }

    #[test]
    fn unbalanced_pattern_is_invalid() {
        assert!(check(&json!("x"), "(unclosed").unwrap_err().is_invalid_schema());
    }
}
