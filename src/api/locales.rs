//! Language (locale) operations.

use serde_json::Value;

use crate::client::ContentstackClient;
use crate::error::ApiError;
use crate::request::{OperationDescriptor, OperationMethod, Options};

pub const LIST_LANGUAGES: OperationDescriptor = OperationDescriptor {
    name: "list_languages",
    method: OperationMethod::Get,
    path: "/locales",
};

impl ContentstackClient {
    /// List the languages configured on the stack.
    pub async fn get_languages(&self, options: &Options) -> Result<Value, ApiError> {
        self.call(&LIST_LANGUAGES, &[], options, None).await
    }
}
