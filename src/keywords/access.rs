//! Direction-sensitive keywords. A node that is validated at all is present
//! in the data, so `readOnly: true` fails every request and `writeOnly: true`
//! fails every response.

use serde_json::Value;

use super::{expect_bool, Context};
use crate::error::ValidateError;
use crate::types::Direction;

pub(super) fn read_only(cx: &Context<'_>, value: &Value) -> Result<(), ValidateError> {
    forbid_in(cx, value, "readOnly", Direction::Request)
}

pub(super) fn write_only(cx: &Context<'_>, value: &Value) -> Result<(), ValidateError> {
    forbid_in(cx, value, "writeOnly", Direction::Response)
}

fn forbid_in(
    cx: &Context<'_>,
    value: &Value,
    keyword: &str,
    forbidden: Direction,
) -> Result<(), ValidateError> {
    if expect_bool(keyword, value)? && cx.validator.options().direction == forbidden {
        let direction = match forbidden {
            Direction::Request => "request",
            Direction::Response => "response",
        };
        return Err(cx.mismatch(
            keyword,
            format!("property is {} and must not appear in a {}", keyword, direction),
        ));
    }
    Ok(())
}
