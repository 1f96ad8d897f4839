//! Publish / unpublish operations.
//!
//! The content type and entry UIDs are part of the path; the body names the
//! target environments and locales.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::client::ContentstackClient;
use crate::error::ApiError;
use crate::request::{OperationDescriptor, OperationMethod, Options};

pub const PUBLISH_ENTRY: OperationDescriptor = OperationDescriptor {
    name: "publish_entry",
    method: OperationMethod::Post,
    path: "/content_types/{content_type_uid}/entries/{entry_uid}/publish",
};

pub const UNPUBLISH_ENTRY: OperationDescriptor = OperationDescriptor {
    name: "unpublish_entry",
    method: OperationMethod::Post,
    path: "/content_types/{content_type_uid}/entries/{entry_uid}/unpublish",
};

/// Targets of a publish or unpublish call.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PublishRequest {
    /// Environment names to (un)publish to
    pub environments: Vec<String>,
    /// Locale codes to (un)publish; empty means the entry's master locale
    #[serde(default)]
    pub locales: Vec<String>,
    /// Locale of the entry version being published
    pub locale: Option<String>,
    /// Entry version to publish
    pub version: Option<u64>,
}

impl PublishRequest {
    pub fn new(environments: Vec<String>) -> Self {
        Self {
            environments,
            ..Self::default()
        }
    }

    /// Wire body: `{"entry": {"environments", "locales"}, "locale", "version"}`.
    pub fn to_body(&self) -> Value {
        let mut body = json!({
            "entry": {
                "environments": self.environments,
                "locales": self.locales,
            }
        });
        if let Some(ref locale) = self.locale {
            body["locale"] = json!(locale);
        }
        if let Some(version) = self.version {
            body["version"] = json!(version);
        }
        body
    }
}

impl ContentstackClient {
    pub async fn publish_entry(
        &self,
        content_type_uid: &str,
        entry_uid: &str,
        request: &PublishRequest,
        options: &Options,
    ) -> Result<Value, ApiError> {
        self.call(
            &PUBLISH_ENTRY,
            &[("content_type_uid", content_type_uid), ("entry_uid", entry_uid)],
            options,
            Some(request.to_body()),
        )
        .await
    }

    pub async fn unpublish_entry(
        &self,
        content_type_uid: &str,
        entry_uid: &str,
        request: &PublishRequest,
        options: &Options,
    ) -> Result<Value, ApiError> {
        self.call(
            &UNPUBLISH_ENTRY,
            &[("content_type_uid", content_type_uid), ("entry_uid", entry_uid)],
            options,
            Some(request.to_body()),
        )
        .await
    }
}
