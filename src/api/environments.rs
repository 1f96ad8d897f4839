//! Environment operations.

use serde_json::Value;

use crate::client::ContentstackClient;
use crate::error::ApiError;
use crate::request::{OperationDescriptor, OperationMethod, Options};

pub const LIST_ENVIRONMENTS: OperationDescriptor = OperationDescriptor {
    name: "list_environments",
    method: OperationMethod::Get,
    path: "/environments",
};

pub const GET_ENVIRONMENT: OperationDescriptor = OperationDescriptor {
    name: "get_environment",
    method: OperationMethod::Get,
    path: "/environments/{uid}",
};

impl ContentstackClient {
    pub async fn get_environments(&self, options: &Options) -> Result<Value, ApiError> {
        self.call(&LIST_ENVIRONMENTS, &[], options, None).await
    }

    /// Get an environment by name or UID.
    pub async fn get_environment(&self, uid: &str, options: &Options) -> Result<Value, ApiError> {
        self.call(&GET_ENVIRONMENT, &[("uid", uid)], options, None)
            .await
    }
}
