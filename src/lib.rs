//! OpenAPI Schema Validator
//!
//! Validates decoded request and response data (bodies, parameters,
//! headers) against OpenAPI 3.x Schema Objects and reports exactly where and
//! why the data does not match.
//!
//! # Example
//!
//! ```
//! use openapi_validator::{validate, Direction, Segment, ValidateError};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "array",
//!     "items": { "type": "string" }
//! });
//!
//! let err = validate(&json!(["valid1", "valid2", 0.0]), &schema, Direction::Request)
//!     .unwrap_err();
//! let ValidateError::Mismatch(mismatch) = err else { panic!("expected a mismatch") };
//!
//! assert_eq!(mismatch.breadcrumb().to_chain(), vec![Segment::Index(2)]);
//! assert_eq!(mismatch.data(), &json!(0.0));
//! assert_eq!(mismatch.to_string(), "at $[2]: expected string, got number");
//! ```
//!
//! # Direction
//!
//! | Keyword | Request | Response |
//! |---------|---------|----------|
//! | `readOnly: true` | Property must be absent, not required | Allowed |
//! | `writeOnly: true` | Allowed | Property must be absent, not required |
//!
//! # Null
//!
//! `null` passes a node only when it says `nullable: true`, lists `"null"`
//! in `type`, or has no constraints at all. A null accepted through
//! `nullable` is still a present property for `readOnly`/`writeOnly`.
//!
//! # References
//!
//! [`resolve_refs`] inlines internal `$ref`s but leaves recursive ones in
//! place. Attach the document with [`SchemaValidator::with_document`] and
//! those are followed while validating.
//!
//! # Errors
//!
//! A [`ValidateError::Mismatch`] means the data is wrong. A
//! [`ValidateError::InvalidSchema`] means the schema itself cannot be
//! evaluated (for example `oneOf: 3`), whatever the data.

mod breadcrumb;
mod error;
mod finder;
mod keywords;
mod loader;
mod types;
mod validator;

pub use breadcrumb::{BreadCrumb, Segment};
pub use error::{FinderError, InvalidSchema, LoadError, SchemaMismatch, ValidateError};
pub use finder::{
    find_media_type_schema, OperationAddress, ParameterLocation, ResponseAddress, SpecFinder,
};
pub use keywords::supported_keywords;
pub use loader::{
    is_url, load_document, load_document_auto, load_document_str, navigate_fragment, resolve_refs,
};
pub use types::{json_equal, json_type_name, Direction, SchemaType, ValidateOptions};
pub use validator::{validate, SchemaValidator};

#[cfg(feature = "remote")]
pub use loader::load_document_url;
