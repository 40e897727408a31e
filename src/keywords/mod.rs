//! Keyword registry.
//!
//! Every supported schema keyword maps to one validator function. The
//! orchestrator walks [`REGISTRY`] in order and calls an entry only when the
//! keyword is present on the schema node, so the order of this table is the
//! evaluation order.

mod access;
mod array;
mod combinators;
mod enumeration;
mod format;
mod numeric;
mod object;
mod string;
mod typing;

use serde_json::{Map, Value};

use crate::breadcrumb::BreadCrumb;
use crate::error::{InvalidSchema, SchemaMismatch, ValidateError};
use crate::types::json_type_name;
use crate::validator::SchemaValidator;

/// Everything a keyword validator may look at.
pub(crate) struct Context<'a> {
    pub validator: &'a SchemaValidator<'a>,
    pub data: &'a Value,
    /// The whole schema node, for keywords that read their siblings.
    pub schema: &'a Map<String, Value>,
    pub breadcrumb: &'a BreadCrumb,
    /// References followed to reach this node without consuming data.
    pub refs: &'a [String],
}

impl Context<'_> {
    /// A keyword mismatch for the current value and location.
    pub fn mismatch(&self, keyword: &str, message: impl Into<String>) -> ValidateError {
        SchemaMismatch::keyword_mismatch(keyword, message, self.data, self.breadcrumb).into()
    }

    /// Validate the same data at the same location against another schema.
    pub fn reapply(&self, schema: &Value) -> Result<(), ValidateError> {
        self.validator
            .validate_node(self.data, schema, self.breadcrumb, self.refs)
    }
}

/// Validates `Context::data` against one keyword's value.
pub(crate) type KeywordFn = fn(&Context<'_>, &Value) -> Result<(), ValidateError>;

pub(crate) struct Keyword {
    pub name: &'static str,
    pub validate: KeywordFn,
    /// Still evaluated when `nullable: true` has accepted a null.
    pub on_null: bool,
}

impl Keyword {
    const fn new(name: &'static str, validate: KeywordFn) -> Self {
        Self {
            name,
            validate,
            on_null: false,
        }
    }

    const fn presence(name: &'static str, validate: KeywordFn) -> Self {
        Self {
            name,
            validate,
            on_null: true,
        }
    }
}

pub(crate) const REGISTRY: &[Keyword] = &[
    Keyword::new("type", typing::validate_type),
    Keyword::new("properties", object::properties),
    Keyword::new("required", object::required),
    Keyword::new("additionalProperties", object::additional_properties),
    Keyword::new("minProperties", object::min_properties),
    Keyword::new("maxProperties", object::max_properties),
    Keyword::new("items", array::items),
    Keyword::new("minItems", array::min_items),
    Keyword::new("maxItems", array::max_items),
    Keyword::new("uniqueItems", array::unique_items),
    Keyword::new("minLength", string::min_length),
    Keyword::new("maxLength", string::max_length),
    Keyword::new("pattern", string::pattern),
    Keyword::new("format", format::format),
    Keyword::new("minimum", numeric::minimum),
    Keyword::new("maximum", numeric::maximum),
    Keyword::new("exclusiveMinimum", numeric::exclusive_minimum),
    Keyword::new("exclusiveMaximum", numeric::exclusive_maximum),
    Keyword::new("multipleOf", numeric::multiple_of),
    Keyword::new("enum", enumeration::validate_enum),
    Keyword::presence("readOnly", access::read_only),
    Keyword::presence("writeOnly", access::write_only),
    Keyword::new("allOf", combinators::all_of),
    Keyword::new("anyOf", combinators::any_of),
    Keyword::new("oneOf", combinators::one_of),
    Keyword::new("not", combinators::not),
];

/// Names of all keywords the validator evaluates, in evaluation order.
pub fn supported_keywords() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|keyword| keyword.name)
}

// --- Keyword value shape checks ---

/// A sub-schema: an object or a boolean.
pub(crate) fn expect_schema<'v>(keyword: &str, value: &'v Value) -> Result<&'v Value, InvalidSchema> {
    match value {
        Value::Object(_) | Value::Bool(_) => Ok(value),
        other => Err(InvalidSchema::new(
            keyword,
            format!("expected a schema, got {}", json_type_name(other)),
        )),
    }
}

/// A non-empty list of sub-schemas.
pub(crate) fn expect_schema_list<'v>(
    keyword: &str,
    value: &'v Value,
) -> Result<&'v [Value], InvalidSchema> {
    let Some(list) = value.as_array() else {
        return Err(InvalidSchema::new(
            keyword,
            format!("expected a list of schemas, got {}", json_type_name(value)),
        ));
    };
    if list.is_empty() {
        return Err(InvalidSchema::new(keyword, "expected at least one schema"));
    }
    for item in list {
        expect_schema(keyword, item)?;
    }
    Ok(list)
}

pub(crate) fn expect_non_negative(keyword: &str, value: &Value) -> Result<u64, InvalidSchema> {
    match value.as_u64() {
        Some(n) => Ok(n),
        None => match value.as_f64() {
            Some(f) if f >= 0.0 && f.fract() == 0.0 => Ok(f as u64),
            _ => Err(InvalidSchema::new(keyword, "expected a non-negative integer")),
        },
    }
}

pub(crate) fn expect_number(keyword: &str, value: &Value) -> Result<f64, InvalidSchema> {
    value
        .as_f64()
        .ok_or_else(|| InvalidSchema::new(keyword, format!("expected a number, got {}", json_type_name(value))))
}

pub(crate) fn expect_bool(keyword: &str, value: &Value) -> Result<bool, InvalidSchema> {
    value
        .as_bool()
        .ok_or_else(|| InvalidSchema::new(keyword, format!("expected a boolean, got {}", json_type_name(value))))
}
