//! Numeric keywords.
//!
//! `exclusiveMinimum`/`exclusiveMaximum` are boolean modifiers of
//! `minimum`/`maximum` in OpenAPI 3.0 and standalone bounds in 3.1; both
//! forms are accepted.

use serde_json::Value;

use super::{expect_number, Context};
use crate::error::{InvalidSchema, ValidateError};

/// Tolerance for `multipleOf` on quotients that are not exact in binary.
const MULTIPLE_OF_EPSILON: f64 = 1e-9;

pub(super) fn minimum(cx: &Context<'_>, value: &Value) -> Result<(), ValidateError> {
    let min = expect_number("minimum", value)?;
    let Some(n) = cx.data.as_f64() else {
        return Ok(());
    };

    if exclusive_modifier(cx, "exclusiveMinimum") {
        if n <= min {
            return Err(cx.mismatch("minimum", format!("value must be greater than {}", min)));
        }
    } else if n < min {
        return Err(cx.mismatch("minimum", format!("value must be at least {}", min)));
    }
    Ok(())
}

pub(super) fn maximum(cx: &Context<'_>, value: &Value) -> Result<(), ValidateError> {
    let max = expect_number("maximum", value)?;
    let Some(n) = cx.data.as_f64() else {
        return Ok(());
    };

    if exclusive_modifier(cx, "exclusiveMaximum") {
        if n >= max {
            return Err(cx.mismatch("maximum", format!("value must be less than {}", max)));
        }
    } else if n > max {
        return Err(cx.mismatch("maximum", format!("value must be at most {}", max)));
    }
    Ok(())
}

pub(super) fn exclusive_minimum(cx: &Context<'_>, value: &Value) -> Result<(), ValidateError> {
    let Some(bound) = standalone_bound("exclusiveMinimum", value)? else {
        return Ok(());
    };
    match cx.data.as_f64() {
        Some(n) if n <= bound => Err(cx.mismatch(
            "exclusiveMinimum",
            format!("value must be greater than {}", bound),
        )),
        _ => Ok(()),
    }
}

pub(super) fn exclusive_maximum(cx: &Context<'_>, value: &Value) -> Result<(), ValidateError> {
    let Some(bound) = standalone_bound("exclusiveMaximum", value)? else {
        return Ok(());
    };
    match cx.data.as_f64() {
        Some(n) if n >= bound => Err(cx.mismatch(
            "exclusiveMaximum",
            format!("value must be less than {}", bound),
        )),
        _ => Ok(()),
    }
}

pub(super) fn multiple_of(cx: &Context<'_>, value: &Value) -> Result<(), ValidateError> {
    let divisor = expect_number("multipleOf", value)?;
    if divisor <= 0.0 {
        return Err(InvalidSchema::new("multipleOf", "expected a number greater than 0").into());
    }
    let Some(n) = cx.data.as_f64() else {
        return Ok(());
    };

    let quotient = n / divisor;
    if (quotient - quotient.round()).abs() > MULTIPLE_OF_EPSILON {
        return Err(cx.mismatch("multipleOf", format!("value must be a multiple of {}", divisor)));
    }
    Ok(())
}

fn exclusive_modifier(cx: &Context<'_>, keyword: &str) -> bool {
    cx.schema.get(keyword).and_then(Value::as_bool) == Some(true)
}

/// `None` for the boolean modifier form, which `minimum`/`maximum` handle.
fn standalone_bound(keyword: &str, value: &Value) -> Result<Option<f64>, InvalidSchema> {
    match value {
        Value::Bool(_) => Ok(None),
        other => expect_number(keyword, other).map(Some),
    }
}
