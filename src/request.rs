//! Request builder: operation + options + config -> fully resolved HTTP request.

use reqwest::Method;
use serde_json::{Map, Value};

use crate::config::{ClientConfig, Region};
use crate::error::ApiError;

/// Options passed to an operation. Routed to the query string.
pub type Options = Map<String, Value>;

/// Options forwarded to the query string verbatim. Anything else is a
/// content filter and ends up JSON-encoded in a single `query` parameter.
pub const STRUCTURAL_OPTIONS: &[&str] = &[
    "limit",
    "skip",
    "environment",
    "locale",
    "include_count",
    "include_schema",
    "include_workflow",
    "order_by",
];

/// Static description of one API operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub name: &'static str,
    pub method: OperationMethod,
    /// Path relative to the region base URL. Placeholders: `{uid}`,
    /// `{content_type_uid}`, `{entry_uid}`.
    pub path: &'static str,
}

/// HTTP verbs used by the catalog. Kept `Copy` so descriptors stay `const`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl OperationMethod {
    pub fn to_method(self) -> Method {
        match self {
            OperationMethod::Get => Method::GET,
            OperationMethod::Post => Method::POST,
            OperationMethod::Put => Method::PUT,
            OperationMethod::Delete => Method::DELETE,
        }
    }

    /// Only mutating verbs carry a body.
    pub fn takes_body(self) -> bool {
        matches!(self, OperationMethod::Post | OperationMethod::Put)
    }
}

/// A fully resolved request, consumed once by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// Build the request for `operation`.
///
/// `path_params` are `(placeholder, value)` pairs. The body is dropped for
/// non-mutating methods.
pub fn build_request(
    operation: &OperationDescriptor,
    path_params: &[(&str, &str)],
    options: &Options,
    body: Option<Value>,
    config: &ClientConfig,
) -> Result<RequestDescriptor, ApiError> {
    let region: Region = config
        .region
        .parse()
        .map_err(|region| ApiError::InvalidRegion {
            region,
            supported: Region::supported_codes(),
        })?;

    let path = expand_path(operation.path, path_params)?;
    let query = build_query_string(options);

    let base_url = config
        .base_url
        .as_deref()
        .map(|url| url.trim_end_matches('/'))
        .unwrap_or_else(|| region.base_url());
    let mut url = format!("{}{}", base_url, path);
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }

    Ok(RequestDescriptor {
        method: operation.method.to_method(),
        url,
        headers: build_headers(config),
        body: if operation.method.takes_body() {
            body
        } else {
            None
        },
    })
}

/// Standard headers. The management token is used for every operation.
pub fn build_headers(config: &ClientConfig) -> Vec<(String, String)> {
    let mut headers = vec![
        ("api_key".to_string(), config.api_key.clone()),
        ("authorization".to_string(), config.management_token.clone()),
        ("Content-Type".to_string(), "application/json".to_string()),
    ];
    if let Some(ref branch) = config.branch {
        headers.push(("branch".to_string(), branch.clone()));
    }
    headers
}

/// Substitute `{name}` placeholders with percent-encoded values.
fn expand_path(template: &str, params: &[(&str, &str)]) -> Result<String, ApiError> {
    let mut path = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        path.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after
            .find('}')
            .ok_or_else(|| ApiError::MissingPathParam(after.to_string()))?;
        let name = &after[..end];
        let value = params
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| *v)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::MissingPathParam(name.to_string()))?;
        path.push_str(&urlencoding::encode(value));
        rest = &after[end + 1..];
    }
    path.push_str(rest);

    Ok(path)
}

/// Partition options into structural params and a JSON `query` filter.
///
/// The filter object is only created once a non-structural key shows up,
/// so purely paginated requests keep their plain URLs.
pub fn build_query_string(options: &Options) -> String {
    let mut params = Vec::new();
    let mut filter: Option<Map<String, Value>> = None;

    for (key, value) in options {
        if value.is_null() {
            continue;
        }
        if STRUCTURAL_OPTIONS.contains(&key.as_str()) {
            params.push(format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(&scalar_to_string(value))
            ));
        } else {
            filter
                .get_or_insert_with(Map::new)
                .insert(key.clone(), value.clone());
        }
    }

    if let Some(filter) = filter {
        let encoded = Value::Object(filter).to_string();
        params.push(format!("query={}", urlencoding::encode(&encoded)));
    }

    params.join("&")
}

/// Query-string form of a value: strings unquoted, everything else as JSON.
fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
