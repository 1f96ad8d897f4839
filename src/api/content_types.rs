//! Content type operations.

use serde_json::Value;

use crate::client::ContentstackClient;
use crate::error::ApiError;
use crate::request::{OperationDescriptor, OperationMethod, Options};

pub const LIST_CONTENT_TYPES: OperationDescriptor = OperationDescriptor {
    name: "list_content_types",
    method: OperationMethod::Get,
    path: "/content_types",
};

pub const GET_CONTENT_TYPE: OperationDescriptor = OperationDescriptor {
    name: "get_content_type",
    method: OperationMethod::Get,
    path: "/content_types/{uid}",
};

pub const CREATE_CONTENT_TYPE: OperationDescriptor = OperationDescriptor {
    name: "create_content_type",
    method: OperationMethod::Post,
    path: "/content_types",
};

pub const UPDATE_CONTENT_TYPE: OperationDescriptor = OperationDescriptor {
    name: "update_content_type",
    method: OperationMethod::Put,
    path: "/content_types/{uid}",
};

impl ContentstackClient {
    /// List all content types in the stack.
    pub async fn get_content_types(&self, options: &Options) -> Result<Value, ApiError> {
        self.call(&LIST_CONTENT_TYPES, &[], options, None).await
    }

    /// Get a single content type by UID.
    pub async fn get_content_type(&self, uid: &str, options: &Options) -> Result<Value, ApiError> {
        self.call(&GET_CONTENT_TYPE, &[("uid", uid)], options, None)
            .await
    }

    /// Create a content type. `data` is the full body: `{"content_type": {...}}`.
    pub async fn create_content_type(&self, data: Value) -> Result<Value, ApiError> {
        self.call(&CREATE_CONTENT_TYPE, &[], &Options::new(), Some(data))
            .await
    }

    /// Replace a content type's schema. `data` is `{"content_type": {...}}`.
    pub async fn update_content_type(&self, uid: &str, data: Value) -> Result<Value, ApiError> {
        self.call(&UPDATE_CONTENT_TYPE, &[("uid", uid)], &Options::new(), Some(data))
            .await
    }
}
