//! Locating the schemas that govern an operation.
//!
//! The finder reads a ref-resolved OpenAPI document (see
//! [`resolve_refs`](crate::resolve_refs)) and hands out the parameter, body,
//! header and security nodes that apply to a path + method, and optionally a
//! response status.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::FinderError;

/// Where a parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    /// The value of the parameter's `in` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Cookie => "cookie",
        }
    }
}

/// A path template and HTTP method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationAddress {
    path: String,
    method: String,
}

impl OperationAddress {
    /// Method is normalized to lowercase, as used for keys in path items.
    pub fn new(path: impl Into<String>, method: impl AsRef<str>) -> Self {
        Self {
            path: path.into(),
            method: method.as_ref().to_lowercase(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn method(&self) -> &str {
        &self.method
    }
}

/// An operation plus a response status code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResponseAddress {
    operation: OperationAddress,
    status: u16,
}

impl ResponseAddress {
    pub fn new(operation: OperationAddress, status: u16) -> Self {
        Self { operation, status }
    }

    pub fn operation(&self) -> &OperationAddress {
        &self.operation
    }

    pub fn status(&self) -> u16 {
        self.status
    }
}

/// Read-only view over an OpenAPI document.
#[derive(Debug, Clone, Copy)]
pub struct SpecFinder<'a> {
    document: &'a Value,
}

impl<'a> SpecFinder<'a> {
    pub fn new(document: &'a Value) -> Self {
        Self { document }
    }

    /// The path item for the address's path template.
    ///
    /// # Errors
    ///
    /// Returns `FinderError::NoPath` if the document has no such path.
    pub fn find_path_item(&self, addr: &OperationAddress) -> Result<&'a Map<String, Value>, FinderError> {
        self.document
            .get("paths")
            .and_then(|paths| paths.get(addr.path()))
            .and_then(Value::as_object)
            .ok_or_else(|| FinderError::NoPath {
                path: addr.path().to_string(),
            })
    }

    /// The operation object for the address's path and method.
    pub fn find_operation(&self, addr: &OperationAddress) -> Result<&'a Map<String, Value>, FinderError> {
        self.find_path_item(addr)?
            .get(addr.method())
            .and_then(Value::as_object)
            .ok_or_else(|| FinderError::NoOperation {
                path: addr.path().to_string(),
                method: addr.method().to_string(),
            })
    }

    /// Parameters carried in `location`, keyed by name.
    ///
    /// Operation-level parameters take precedence; path-level parameters
    /// fill in names the operation does not declare.
    pub fn find_parameters(
        &self,
        addr: &OperationAddress,
        location: ParameterLocation,
    ) -> Result<Map<String, Value>, FinderError> {
        let operation = self.find_operation(addr)?;
        let path_item = self.find_path_item(addr)?;

        let mut found = Map::new();
        for parameter in parameters_in(operation, location) {
            if let Some(name) = parameter.get("name").and_then(Value::as_str) {
                found.insert(name.to_string(), parameter.clone());
            }
        }
        for parameter in parameters_in(path_item, location) {
            if let Some(name) = parameter.get("name").and_then(Value::as_str) {
                found
                    .entry(name.to_string())
                    .or_insert_with(|| parameter.clone());
            }
        }
        Ok(found)
    }

    pub fn find_path_specs(&self, addr: &OperationAddress) -> Result<Map<String, Value>, FinderError> {
        self.find_parameters(addr, ParameterLocation::Path)
    }

    pub fn find_query_specs(&self, addr: &OperationAddress) -> Result<Map<String, Value>, FinderError> {
        self.find_parameters(addr, ParameterLocation::Query)
    }

    /// Request header parameters. For response headers use
    /// [`find_response_header_specs`](Self::find_response_header_specs).
    pub fn find_header_specs(&self, addr: &OperationAddress) -> Result<Map<String, Value>, FinderError> {
        self.find_parameters(addr, ParameterLocation::Header)
    }

    pub fn find_cookie_specs(&self, addr: &OperationAddress) -> Result<Map<String, Value>, FinderError> {
        self.find_parameters(addr, ParameterLocation::Cookie)
    }

    /// The request body `content` map, keyed by media type. Empty when the
    /// operation declares no request body.
    pub fn find_body_spec(&self, addr: &OperationAddress) -> Result<Map<String, Value>, FinderError> {
        Ok(self
            .find_operation(addr)?
            .get("requestBody")
            .and_then(|body| body.get("content"))
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default())
    }

    /// The response object for the status code, falling back to `default`.
    ///
    /// # Errors
    ///
    /// Returns `FinderError::NoResponseCode` when neither exists.
    pub fn find_response_spec(&self, addr: &ResponseAddress) -> Result<&'a Map<String, Value>, FinderError> {
        let operation = self.find_operation(addr.operation())?;
        let responses = operation.get("responses").and_then(Value::as_object);
        let code = addr.status().to_string();

        if let Some(response) = responses.and_then(|r| r.get(&code)).and_then(Value::as_object) {
            return Ok(response);
        }
        if let Some(response) = responses.and_then(|r| r.get("default")).and_then(Value::as_object) {
            debug!(status = addr.status(), "falling back to default response");
            return Ok(response);
        }
        Err(FinderError::NoResponseCode {
            path: addr.operation().path().to_string(),
            method: addr.operation().method().to_string(),
            status: addr.status(),
        })
    }

    /// The response `content` map, keyed by media type.
    pub fn find_response_body_spec(&self, addr: &ResponseAddress) -> Result<Map<String, Value>, FinderError> {
        Ok(self
            .find_response_spec(addr)?
            .get("content")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default())
    }

    /// The response `headers` map, keyed by header name.
    pub fn find_response_header_specs(
        &self,
        addr: &ResponseAddress,
    ) -> Result<Map<String, Value>, FinderError> {
        Ok(self
            .find_response_spec(addr)?
            .get("headers")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default())
    }

    /// Security requirements: the operation's own when it declares the
    /// `security` key (even as an empty list), else the document's.
    pub fn find_security_specs(&self, addr: &OperationAddress) -> Result<Vec<Value>, FinderError> {
        let operation = self.find_operation(addr)?;
        let declared = match operation.get("security") {
            Some(security) => Some(security),
            None => self.document.get("security"),
        };
        Ok(declared
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    /// `components.securitySchemes`, or an empty map.
    pub fn find_security_schemes(&self) -> Map<String, Value> {
        self.document
            .get("components")
            .and_then(|c| c.get("securitySchemes"))
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }
}

/// The schema for `media_type` in a `content` map.
///
/// Parameters such as `; charset=utf-8` are ignored. Falls back to a
/// `type/*` range and then to `*/*`.
pub fn find_media_type_schema<'c>(
    content: &'c Map<String, Value>,
    media_type: &str,
) -> Result<&'c Value, FinderError> {
    let essence = media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    let range = essence
        .split_once('/')
        .map(|(kind, _)| format!("{}/*", kind))
        .unwrap_or_default();

    [essence.as_str(), range.as_str(), "*/*"]
        .iter()
        .filter(|key| !key.is_empty())
        .find_map(|key| content.get(*key))
        .and_then(|media| media.get("schema"))
        .ok_or_else(|| FinderError::NoMediaType {
            media_type: media_type.to_string(),
        })
}

fn parameters_in(
    owner: &Map<String, Value>,
    location: ParameterLocation,
) -> impl Iterator<Item = &Value> {
    owner
        .get("parameters")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(move |p| p.get("in").and_then(Value::as_str) == Some(location.as_str()))
}
