//! Contentstack Content Management API client.
//!
//! Resource-specific operations live in [`crate::api`]; this module owns the
//! shared plumbing: building a request, sending it, and normalizing the outcome.

use reqwest::Client;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::request::{build_request, OperationDescriptor, Options, RequestDescriptor};
use crate::response::{normalize, read_body};

/// Client bound to one immutable [`ClientConfig`].
#[derive(Clone)]
pub struct ContentstackClient {
    config: ClientConfig,
    http_client: Client,
}

impl ContentstackClient {
    /// Create a new client with its own connection pool.
    ///
    /// # Errors
    /// Returns `ApiError::HttpClientInit` if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http_client = Client::builder()
            .build()
            .map_err(|e| ApiError::HttpClientInit(e.to_string()))?;

        Ok(Self::with_http_client(config, http_client))
    }

    /// Create a client sharing an existing connection pool.
    pub fn with_http_client(config: ClientConfig, http_client: Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Same credentials and connection pool, different region.
    pub fn with_region(&self, region: impl Into<String>) -> Self {
        Self {
            config: self.config.with_region(region),
            http_client: self.http_client.clone(),
        }
    }

    /// Build and execute one catalog operation.
    pub(crate) async fn call(
        &self,
        operation: &OperationDescriptor,
        path_params: &[(&str, &str)],
        options: &Options,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let request = build_request(operation, path_params, options, body, &self.config)?;
        tracing::debug!(operation = operation.name, "Contentstack operation");
        self.execute(request).await
    }

    /// Send a prebuilt request and normalize the response.
    pub async fn execute(&self, request: RequestDescriptor) -> Result<Value, ApiError> {
        let RequestDescriptor {
            method,
            url,
            headers,
            body,
        } = request;

        tracing::debug!(method = %method, url = %url, "Contentstack API request");

        let mut builder = self.http_client.request(method, &url);
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(ref body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|source| {
            // builder errors never reach the network
            if source.is_builder() {
                ApiError::InvalidRequest(error_chain(&source))
            } else {
                ApiError::Transport { source }
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| ApiError::ResponseBody { status, source })?;

        let status = status.as_u16();
        let result = normalize(status, read_body(&text));
        match result {
            Ok(_) => tracing::debug!(status, "Contentstack API response"),
            Err(ref e) => tracing::warn!(status, error = %e, "Contentstack API error"),
        }
        result
    }
}

/// Error text followed by each underlying cause.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl std::fmt::Debug for ContentstackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentstackClient")
            .field("region", &self.config.region)
            .field("branch", &self.config.branch)
            .finish()
    }
}
