//! Asset operations.

use serde_json::Value;

use crate::client::ContentstackClient;
use crate::error::ApiError;
use crate::request::{OperationDescriptor, OperationMethod, Options};

pub const LIST_ASSETS: OperationDescriptor = OperationDescriptor {
    name: "list_assets",
    method: OperationMethod::Get,
    path: "/assets",
};

pub const GET_ASSET: OperationDescriptor = OperationDescriptor {
    name: "get_asset",
    method: OperationMethod::Get,
    path: "/assets/{uid}",
};

pub const UPLOAD_ASSET: OperationDescriptor = OperationDescriptor {
    name: "upload_asset",
    method: OperationMethod::Post,
    path: "/assets",
};

impl ContentstackClient {
    pub async fn get_assets(&self, options: &Options) -> Result<Value, ApiError> {
        self.call(&LIST_ASSETS, &[], options, None).await
    }

    pub async fn get_asset(&self, uid: &str, options: &Options) -> Result<Value, ApiError> {
        self.call(&GET_ASSET, &[("uid", uid)], options, None).await
    }

    /// Create an asset from a JSON body (e.g. `{"asset": {"url": ...}}`).
    pub async fn upload_asset(&self, data: Value) -> Result<Value, ApiError> {
        self.call(&UPLOAD_ASSET, &[], &Options::new(), Some(data))
            .await
    }
}
