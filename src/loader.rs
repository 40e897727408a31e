//! OpenAPI document loading from files, strings, and HTTP URLs.
//!
//! Documents may be JSON or YAML. [`resolve_refs`] inlines internal `$ref`
//! pointers so the validator only ever sees fully resolved schema nodes.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::LoadError;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Load a document from a file path.
///
/// Files ending in `.yaml` or `.yml` are parsed as YAML, everything else
/// as JSON.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist, or a parse
/// error if the content is malformed.
pub fn load_document(path: &Path) -> Result<Value, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    debug!(path = %path.display(), yaml = is_yaml, "loading document");
    if is_yaml {
        parse_yaml(&content)
    } else {
        serde_json::from_str(&content).map_err(|source| LoadError::InvalidJson { source })
    }
}

/// Load a document from a string.
///
/// Text starting with `{` or `[` is parsed as JSON, anything else as YAML.
pub fn load_document_str(content: &str) -> Result<Value, LoadError> {
    let trimmed = content.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
    } else {
        parse_yaml(content)
    }
}

/// Load a document from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `LoadError::NetworkError` if the request fails, or a parse error
/// if the body is malformed.
#[cfg(feature = "remote")]
pub fn load_document_url(url: &str) -> Result<Value, LoadError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|source| LoadError::NetworkError {
            url: url.to_string(),
            source,
        })?;

    let response = client
        .get(url)
        .send()
        .map_err(|source| LoadError::NetworkError {
            url: url.to_string(),
            source,
        })?;

    // Check for HTTP errors before parsing
    let response = response
        .error_for_status()
        .map_err(|source| LoadError::NetworkError {
            url: url.to_string(),
            source,
        })?;

    let body = response.text().map_err(|source| LoadError::NetworkError {
        url: url.to_string(),
        source,
    })?;
    debug!(url, bytes = body.len(), "fetched document");
    load_document_str(&body)
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load a document from a file path or URL.
///
/// URL loading requires the `remote` feature.
pub fn load_document_auto(source: &str) -> Result<Value, LoadError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_document_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(LoadError::FileNotFound {
                path: std::path::PathBuf::from(source),
            })
        }
    } else {
        load_document(Path::new(source))
    }
}

/// Navigate a JSON Pointer fragment (e.g. "#/components/schemas/Pet").
///
/// The fragment may start with '#'. An empty pointer returns the document.
pub fn navigate_fragment<'a>(document: &'a Value, fragment: &str) -> Result<&'a Value, LoadError> {
    let path = fragment.trim_start_matches('#').trim_start_matches('/');
    if path.is_empty() {
        return Ok(document);
    }

    let mut current = document;
    for part in path.split('/') {
        // Unescape JSON Pointer encoding (~1 = /, ~0 = ~)
        let key = part.replace("~1", "/").replace("~0", "~");
        let next = match current {
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            other => other.get(&key),
        };
        current = next.ok_or_else(|| LoadError::UnresolvedRef {
            reference: fragment.to_string(),
        })?;
    }
    Ok(current)
}

/// Return a copy of `document` with every internal `$ref` inlined.
///
/// Keys written next to a `$ref` take precedence over the keys of the
/// referenced node.
///
/// A reference back into a node that is already being inlined (a recursive
/// schema such as a tree node) is left in place as `$ref`. Validate such a
/// document with [`SchemaValidator::with_document`](crate::SchemaValidator::with_document)
/// so those references are followed on demand.
///
/// # Errors
///
/// `ExternalRef` for references into other documents, `UnresolvedRef` for
/// pointers that lead nowhere.
pub fn resolve_refs(document: &Value) -> Result<Value, LoadError> {
    let mut stack = Vec::new();
    resolve_value(document, document, &mut stack)
}

fn resolve_value(value: &Value, root: &Value, stack: &mut Vec<String>) -> Result<Value, LoadError> {
    match value {
        Value::Object(map) => resolve_object(map, root, stack),
        Value::Array(items) => items
            .iter()
            .map(|item| resolve_value(item, root, stack))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        other => Ok(other.clone()),
    }
}

fn resolve_object(
    map: &Map<String, Value>,
    root: &Value,
    stack: &mut Vec<String>,
) -> Result<Value, LoadError> {
    let Some(reference) = map.get("$ref").and_then(Value::as_str) else {
        let mut result = Map::new();
        for (key, value) in map {
            result.insert(key.clone(), resolve_value(value, root, stack)?);
        }
        return Ok(Value::Object(result));
    };

    if !reference.starts_with('#') {
        return Err(LoadError::ExternalRef {
            reference: reference.to_string(),
        });
    }
    if stack.iter().any(|seen| seen == reference) {
        debug!(reference, "keeping recursive reference");
        let mut result = Map::new();
        for (key, value) in map {
            let value = if key == "$ref" {
                value.clone()
            } else {
                resolve_value(value, root, stack)?
            };
            result.insert(key.clone(), value);
        }
        return Ok(Value::Object(result));
    }

    let target = navigate_fragment(root, reference)?;
    stack.push(reference.to_string());
    let resolved = resolve_value(target, root, stack);
    stack.pop();

    let mut result = Map::new();
    for (key, value) in map {
        if key != "$ref" {
            result.insert(key.clone(), resolve_value(value, root, stack)?);
        }
    }
    match resolved? {
        Value::Object(target) => {
            for (key, value) in target {
                result.entry(key).or_insert(value);
            }
            Ok(Value::Object(result))
        }
        // A reference to a non-object replaces the node entirely.
        other if result.is_empty() => Ok(other),
        other => Err(LoadError::UnresolvedRef {
            reference: format!("{} (resolves to {}, not an object)", reference, other),
        }),
    }
}

fn parse_yaml(content: &str) -> Result<Value, LoadError> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|source| LoadError::InvalidYaml { source })?;
    Ok(yaml_to_json(yaml))
}

/// YAML allows non-string keys (`200:` under `responses`); JSON does not.
fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            Value::Array(items.into_iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                map.insert(yaml_key(key), yaml_to_json(value));
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        other => yaml_to_json(other).to_string(),
    }
}
