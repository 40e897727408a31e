//! Recursive schema validation.

use serde_json::{Map, Value};
use tracing::trace;

use crate::breadcrumb::BreadCrumb;
use crate::error::{InvalidSchema, SchemaMismatch, ValidateError};
use crate::keywords::{Context, Keyword, REGISTRY};
use crate::loader::navigate_fragment;
use crate::types::{json_type_name, Direction, ValidateOptions};

/// Walks a schema node and a data value in lockstep.
///
/// Holds no state besides its options and an optional borrowed document, so
/// one validator can be shared by any number of threads validating against
/// the same document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchemaValidator<'d> {
    options: ValidateOptions,
    document: Option<&'d Value>,
}

impl<'d> SchemaValidator<'d> {
    pub fn new(options: ValidateOptions) -> Self {
        Self {
            options,
            document: None,
        }
    }

    /// A validator for `direction` with default options.
    pub fn for_direction(direction: Direction) -> Self {
        Self::new(ValidateOptions::new(direction))
    }

    /// Resolve `#/...` references against `document` while validating.
    ///
    /// Without a document any `$ref` left in a schema is an invalid schema.
    pub fn with_document<'e>(self, document: &'e Value) -> SchemaValidator<'e> {
        SchemaValidator {
            options: self.options,
            document: Some(document),
        }
    }

    pub fn options(&self) -> &ValidateOptions {
        &self.options
    }

    /// Validate `data` against `schema`, starting at the root location.
    ///
    /// # Errors
    ///
    /// Returns `ValidateError::Mismatch` for the first violation found, or
    /// `ValidateError::InvalidSchema` if the schema cannot be evaluated.
    pub fn validate(&self, data: &Value, schema: &Value) -> Result<(), ValidateError> {
        self.validate_at(data, schema, &BreadCrumb::empty())
    }

    /// Validate `data` located at `breadcrumb` against `schema`.
    pub fn validate_at(
        &self,
        data: &Value,
        schema: &Value,
        breadcrumb: &BreadCrumb,
    ) -> Result<(), ValidateError> {
        self.validate_node(data, schema, breadcrumb, &[])
    }

    /// `refs` holds the references followed since the data last moved one
    /// level down. Seeing one of them again means the schema loops in place.
    pub(crate) fn validate_node(
        &self,
        data: &Value,
        schema: &Value,
        breadcrumb: &BreadCrumb,
        refs: &[String],
    ) -> Result<(), ValidateError> {
        let node = match schema {
            Value::Object(node) => node,
            Value::Bool(true) => return Ok(()),
            Value::Bool(false) => {
                return Err(SchemaMismatch::keyword_mismatch(
                    "false",
                    "no value is allowed here",
                    data,
                    breadcrumb,
                )
                .into())
            }
            other => {
                return Err(InvalidSchema::new(
                    "schema",
                    format!("expected an object, got {}", json_type_name(other)),
                )
                .into())
            }
        };
        trace!(breadcrumb = %breadcrumb, "validating node");

        let nullable = match node.get("nullable") {
            Some(Value::Bool(b)) => *b,
            Some(_) => return Err(InvalidSchema::new("nullable", "expected a boolean").into()),
            None => false,
        };
        let cx = Context {
            validator: self,
            data,
            schema: node,
            breadcrumb,
            refs,
        };

        // An accepted null still counts as present for readOnly/writeOnly.
        if data.is_null() && nullable {
            return walk(&cx, |keyword| keyword.on_null);
        }

        if let Some(reference) = node.get("$ref") {
            self.follow_ref(data, reference, breadcrumb, refs)?;
        }
        if data.is_null() && rejects_untyped_null(node) {
            // A malformed keyword is reported ahead of the null.
            if let Err(err @ ValidateError::InvalidSchema(_)) = walk(&cx, |_| true) {
                return Err(err);
            }
            return Err(SchemaMismatch::type_mismatch(
                vec!["non-null value".to_string()],
                data,
                breadcrumb,
            )
            .into());
        }

        walk(&cx, |_| true)
    }

    fn follow_ref(
        &self,
        data: &Value,
        reference: &Value,
        breadcrumb: &BreadCrumb,
        refs: &[String],
    ) -> Result<(), ValidateError> {
        let reference = reference
            .as_str()
            .ok_or_else(|| InvalidSchema::new("$ref", "expected a reference string"))?;
        let Some(document) = self.document else {
            return Err(InvalidSchema::new(
                "$ref",
                format!("cannot resolve {} without a document", reference),
            )
            .into());
        };
        if !reference.starts_with('#') {
            return Err(InvalidSchema::new(
                "$ref",
                format!("external reference {} is not supported", reference),
            )
            .into());
        }
        if refs.iter().any(|seen| seen == reference) {
            return Err(InvalidSchema::new(
                "$ref",
                format!("{} loops back to itself without descending into the data", reference),
            )
            .into());
        }

        let target = navigate_fragment(document, reference)
            .map_err(|e| InvalidSchema::new("$ref", e.to_string()))?;
        trace!(breadcrumb = %breadcrumb, reference, "following reference");
        let mut trail = refs.to_vec();
        trail.push(reference.to_string());
        self.validate_node(data, target, breadcrumb, &trail)
    }
}

/// Evaluate the registry keywords present on the node, in registry order.
fn walk(cx: &Context<'_>, applies: impl Fn(&Keyword) -> bool) -> Result<(), ValidateError> {
    for keyword in REGISTRY.iter().filter(|keyword| applies(*keyword)) {
        if let Some(value) = cx.schema.get(keyword.name) {
            (keyword.validate)(cx, value)?;
        }
    }
    Ok(())
}

/// A node with constraints but no `type` still rejects null; `type` itself
/// decides when it is declared. `readOnly`/`writeOnly` alone constrain
/// presence, not type.
fn rejects_untyped_null(node: &Map<String, Value>) -> bool {
    !node.contains_key("type")
        && REGISTRY
            .iter()
            .any(|keyword| !keyword.on_null && node.contains_key(keyword.name))
}

/// Validate `data` against `schema` in the given direction.
///
/// Use [`SchemaValidator`] directly to change options or to validate many
/// payloads with the same configuration.
pub fn validate(data: &Value, schema: &Value, direction: Direction) -> Result<(), ValidateError> {
    SchemaValidator::for_direction(direction).validate(data, schema)
}
