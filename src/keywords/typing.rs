use serde_json::Value;

use super::Context;
use crate::error::{InvalidSchema, SchemaMismatch, ValidateError};
use crate::types::{json_type_name, SchemaType};

/// `type`: a single name (OpenAPI 3.0) or a list of names (3.1).
pub(super) fn validate_type(cx: &Context<'_>, value: &Value) -> Result<(), ValidateError> {
    let types = parse_types(value)?;

    if types.iter().any(|t| t.matches(cx.data)) {
        return Ok(());
    }
    if cx.data.is_null() && cx.schema.get("nullable").and_then(Value::as_bool) == Some(true) {
        return Ok(());
    }

    Err(SchemaMismatch::type_mismatch(
        types.iter().map(|t| t.name().to_string()).collect(),
        cx.data,
        cx.breadcrumb,
    )
    .into())
}

fn parse_types(value: &Value) -> Result<Vec<SchemaType>, InvalidSchema> {
    let parse_one = |v: &Value| {
        v.as_str()
            .and_then(SchemaType::parse)
            .ok_or_else(|| InvalidSchema::new("type", format!("unknown type {}", v)))
    };

    match value {
        Value::String(_) => Ok(vec![parse_one(value)?]),
        Value::Array(list) if !list.is_empty() => list.iter().map(parse_one).collect(),
        other => Err(InvalidSchema::new(
            "type",
            format!("expected a type name or list of names, got {}", json_type_name(other)),
        )),
    }
}
