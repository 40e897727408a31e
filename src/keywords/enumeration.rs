use serde_json::Value;

use super::Context;
use crate::error::{InvalidSchema, ValidateError};
use crate::types::json_equal;

pub(super) fn validate_enum(cx: &Context<'_>, value: &Value) -> Result<(), ValidateError> {
    let allowed = value
        .as_array()
        .ok_or_else(|| InvalidSchema::new("enum", "expected a list of values"))?;

    if allowed.iter().any(|candidate| json_equal(candidate, cx.data)) {
        return Ok(());
    }
    Err(cx.mismatch("enum", format!("value must be one of {}", value)))
}
