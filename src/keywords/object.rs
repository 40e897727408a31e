//! Object keywords: `properties`, `required`, `additionalProperties`,
//! `minProperties`, `maxProperties`.

use serde_json::Value;

use super::{expect_non_negative, expect_schema, Context};
use crate::error::{InvalidSchema, SchemaMismatch, ValidateError};
use crate::types::json_type_name;

pub(super) fn properties(cx: &Context<'_>, value: &Value) -> Result<(), ValidateError> {
    let Some(declared) = value.as_object() else {
        return Err(InvalidSchema::new(
            "properties",
            format!("expected an object, got {}", json_type_name(value)),
        )
        .into());
    };
    let Some(data) = cx.data.as_object() else {
        return Ok(());
    };

    for (name, sub_schema) in declared {
        expect_schema("properties", sub_schema)?;
        if let Some(child) = data.get(name) {
            cx.validator
                .validate_at(child, sub_schema, &cx.breadcrumb.push(name.as_str()))?;
        }
    }
    Ok(())
}

/// Required properties that are read-only are not required in requests;
/// write-only ones are not required in responses.
pub(super) fn required(cx: &Context<'_>, value: &Value) -> Result<(), ValidateError> {
    let names = value
        .as_array()
        .ok_or_else(|| InvalidSchema::new("required", "expected a list of property names"))?;
    let Some(data) = cx.data.as_object() else {
        return Ok(());
    };

    let forbidden = cx.validator.options().direction.forbidden_keyword();
    for name in names {
        let name = name
            .as_str()
            .ok_or_else(|| InvalidSchema::new("required", "expected a list of property names"))?;
        if data.contains_key(name) {
            continue;
        }
        let exempt = cx
            .schema
            .get("properties")
            .and_then(|props| props.get(name))
            .and_then(|prop| prop.get(forbidden))
            .and_then(Value::as_bool)
            == Some(true);
        if !exempt {
            return Err(cx.mismatch("required", format!("required property {} is missing", name)));
        }
    }
    Ok(())
}

pub(super) fn additional_properties(cx: &Context<'_>, value: &Value) -> Result<(), ValidateError> {
    expect_schema("additionalProperties", value)?;
    let Some(data) = cx.data.as_object() else {
        return Ok(());
    };
    if value == &Value::Bool(true) {
        return Ok(());
    }

    let declared = cx.schema.get("properties").and_then(Value::as_object);
    for (key, child) in data {
        if declared.is_some_and(|props| props.contains_key(key)) {
            continue;
        }
        let crumb = cx.breadcrumb.push(key.as_str());
        if value == &Value::Bool(false) {
            return Err(SchemaMismatch::keyword_mismatch(
                "additionalProperties",
                format!("additional property {} is not allowed", key),
                child,
                &crumb,
            )
            .into());
        }
        cx.validator.validate_at(child, value, &crumb)?;
    }
    Ok(())
}

pub(super) fn min_properties(cx: &Context<'_>, value: &Value) -> Result<(), ValidateError> {
    let min = expect_non_negative("minProperties", value)?;
    match cx.data.as_object() {
        Some(data) if (data.len() as u64) < min => Err(cx.mismatch(
            "minProperties",
            format!("object must have at least {} properties, has {}", min, data.len()),
        )),
        _ => Ok(()),
    }
}

pub(super) fn max_properties(cx: &Context<'_>, value: &Value) -> Result<(), ValidateError> {
    let max = expect_non_negative("maxProperties", value)?;
    match cx.data.as_object() {
        Some(data) if (data.len() as u64) > max => Err(cx.mismatch(
            "maxProperties",
            format!("object must have at most {} properties, has {}", max, data.len()),
        )),
        _ => Ok(()),
    }
}
