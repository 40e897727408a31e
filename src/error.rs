//! Error types for document loading, operation lookup and validation.

use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

use crate::breadcrumb::BreadCrumb;
use crate::types::json_type_name;

/// Errors while loading an OpenAPI document or schema.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid YAML: {source}")]
    InvalidYaml {
        #[source]
        source: serde_yaml::Error,
    },

    // Reference errors (exit code 2)
    #[error("unresolved reference: {reference}")]
    UnresolvedRef { reference: String },

    #[error("external reference not supported: {reference}")]
    ExternalRef { reference: String },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}

/// Errors while locating the schemas for an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinderError {
    #[error("no path matching {path}")]
    NoPath { path: String },

    #[error("no operation {method} for path {path}")]
    NoOperation { path: String, method: String },

    #[error("no response {status} (and no default) for {method} {path}")]
    NoResponseCode {
        path: String,
        method: String,
        status: u16,
    },

    #[error("no content declared for media type {media_type}")]
    NoMediaType { media_type: String },
}

impl FinderError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Data does not match the schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaMismatch {
    /// The data's JSON type is not one of the declared types.
    #[error("at {breadcrumb}: expected {}, got {}", .expected.join(" or "), json_type_name(.data))]
    TypeMismatch {
        expected: Vec<String>,
        data: Value,
        breadcrumb: BreadCrumb,
    },

    /// A keyword constraint was violated.
    #[error("at {breadcrumb}: keyword {keyword} failed: {message}")]
    KeywordMismatch {
        keyword: String,
        message: String,
        data: Value,
        breadcrumb: BreadCrumb,
    },
}

impl SchemaMismatch {
    pub(crate) fn type_mismatch(expected: Vec<String>, data: &Value, breadcrumb: &BreadCrumb) -> Self {
        SchemaMismatch::TypeMismatch {
            expected,
            data: data.clone(),
            breadcrumb: breadcrumb.clone(),
        }
    }

    pub(crate) fn keyword_mismatch(
        keyword: &str,
        message: impl Into<String>,
        data: &Value,
        breadcrumb: &BreadCrumb,
    ) -> Self {
        SchemaMismatch::KeywordMismatch {
            keyword: keyword.to_string(),
            message: message.into(),
            data: data.clone(),
            breadcrumb: breadcrumb.clone(),
        }
    }

    /// The violated keyword; `type` for type mismatches.
    pub fn keyword(&self) -> &str {
        match self {
            SchemaMismatch::TypeMismatch { .. } => "type",
            SchemaMismatch::KeywordMismatch { keyword, .. } => keyword,
        }
    }

    /// The innermost offending value.
    pub fn data(&self) -> &Value {
        match self {
            SchemaMismatch::TypeMismatch { data, .. } => data,
            SchemaMismatch::KeywordMismatch { data, .. } => data,
        }
    }

    /// Where in the data the mismatch was detected.
    pub fn breadcrumb(&self) -> &BreadCrumb {
        match self {
            SchemaMismatch::TypeMismatch { breadcrumb, .. } => breadcrumb,
            SchemaMismatch::KeywordMismatch { breadcrumb, .. } => breadcrumb,
        }
    }
}

/// The schema itself is malformed and cannot be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid schema: keyword {keyword}: {message}")]
pub struct InvalidSchema {
    pub keyword: String,
    pub message: String,
}

impl InvalidSchema {
    pub(crate) fn new(keyword: &str, message: impl Into<String>) -> Self {
        Self {
            keyword: keyword.to_string(),
            message: message.into(),
        }
    }
}

/// Errors during validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Mismatch(#[from] SchemaMismatch),

    #[error(transparent)]
    InvalidSchema(#[from] InvalidSchema),
}

impl ValidateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ValidateError::Mismatch(_) => 1,
            ValidateError::InvalidSchema(_) => 2,
        }
    }

    /// The data mismatch, if this is one.
    pub fn mismatch(&self) -> Option<&SchemaMismatch> {
        match self {
            ValidateError::Mismatch(m) => Some(m),
            ValidateError::InvalidSchema(_) => None,
        }
    }

    pub fn is_invalid_schema(&self) -> bool {
        matches!(self, ValidateError::InvalidSchema(_))
    }
}
