//! Combinators: `allOf`, `anyOf`, `oneOf`, `not`.
//!
//! Each branch re-validates the same data at the same location. Data
//! mismatches inside a branch are counted, never surfaced as-is, except for
//! `allOf`. An invalid sub-schema always propagates.

use serde_json::Value;
use tracing::debug;

use super::{expect_schema, expect_schema_list, Context};
use crate::error::ValidateError;

/// Reports the first failing branch in list order.
pub(super) fn all_of(cx: &Context<'_>, value: &Value) -> Result<(), ValidateError> {
    for schema in expect_schema_list("allOf", value)? {
        cx.reapply(schema)?;
    }
    Ok(())
}

pub(super) fn any_of(cx: &Context<'_>, value: &Value) -> Result<(), ValidateError> {
    for schema in expect_schema_list("anyOf", value)? {
        if branch_matches(cx, schema)? {
            return Ok(());
        }
    }
    Err(cx.mismatch("anyOf", "data must match at least one schema, but matched none"))
}

/// Every branch is evaluated; only an exact count of one succeeds.
pub(super) fn one_of(cx: &Context<'_>, value: &Value) -> Result<(), ValidateError> {
    let mut matched = 0usize;
    for schema in expect_schema_list("oneOf", value)? {
        if branch_matches(cx, schema)? {
            matched += 1;
        }
    }

    debug!(breadcrumb = %cx.breadcrumb, matched, "oneOf evaluated");
    if matched != 1 {
        return Err(cx.mismatch(
            "oneOf",
            format!("data must match exactly one schema, but matched {}", matched),
        ));
    }
    Ok(())
}

pub(super) fn not(cx: &Context<'_>, value: &Value) -> Result<(), ValidateError> {
    if branch_matches(cx, expect_schema("not", value)?)? {
        return Err(cx.mismatch("not", "data must not match the schema"));
    }
    Ok(())
}

fn branch_matches(cx: &Context<'_>, schema: &Value) -> Result<bool, ValidateError> {
    match cx.reapply(schema) {
        Ok(()) => Ok(true),
        Err(ValidateError::Mismatch(_)) => Ok(false),
        Err(err) => Err(err),
    }
}
