//! Array keywords: `items`, `minItems`, `maxItems`, `uniqueItems`.

use serde_json::Value;

use super::{expect_bool, expect_non_negative, expect_schema, Context};
use crate::error::ValidateError;
use crate::types::json_equal;

pub(super) fn items(cx: &Context<'_>, value: &Value) -> Result<(), ValidateError> {
    let item_schema = expect_schema("items", value)?;
    let Some(data) = cx.data.as_array() else {
        return Ok(());
    };

    for (index, item) in data.iter().enumerate() {
        cx.validator
            .validate_at(item, item_schema, &cx.breadcrumb.push(index))?;
    }
    Ok(())
}

pub(super) fn min_items(cx: &Context<'_>, value: &Value) -> Result<(), ValidateError> {
    let min = expect_non_negative("minItems", value)?;
    match cx.data.as_array() {
        Some(data) if (data.len() as u64) < min => Err(cx.mismatch(
            "minItems",
            format!("array must have at least {} items, has {}", min, data.len()),
        )),
        _ => Ok(()),
    }
}

pub(super) fn max_items(cx: &Context<'_>, value: &Value) -> Result<(), ValidateError> {
    let max = expect_non_negative("maxItems", value)?;
    match cx.data.as_array() {
        Some(data) if (data.len() as u64) > max => Err(cx.mismatch(
            "maxItems",
            format!("array must have at most {} items, has {}", max, data.len()),
        )),
        _ => Ok(()),
    }
}

pub(super) fn unique_items(cx: &Context<'_>, value: &Value) -> Result<(), ValidateError> {
    if !expect_bool("uniqueItems", value)? {
        return Ok(());
    }
    let Some(data) = cx.data.as_array() else {
        return Ok(());
    };

    for (i, a) in data.iter().enumerate() {
        if let Some(j) = data[i + 1..].iter().position(|b| json_equal(a, b)) {
            return Err(cx.mismatch(
                "uniqueItems",
                format!("items at {} and {} are equal", i, i + 1 + j),
            ));
        }
    }
    Ok(())
}
