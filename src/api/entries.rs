//! Entry operations.

use serde_json::Value;

use crate::client::ContentstackClient;
use crate::error::ApiError;
use crate::request::{OperationDescriptor, OperationMethod, Options};

pub const LIST_ENTRIES: OperationDescriptor = OperationDescriptor {
    name: "list_entries",
    method: OperationMethod::Get,
    path: "/content_types/{content_type_uid}/entries",
};

pub const GET_ENTRY: OperationDescriptor = OperationDescriptor {
    name: "get_entry",
    method: OperationMethod::Get,
    path: "/content_types/{content_type_uid}/entries/{entry_uid}",
};

pub const CREATE_ENTRY: OperationDescriptor = OperationDescriptor {
    name: "create_entry",
    method: OperationMethod::Post,
    path: "/content_types/{content_type_uid}/entries",
};

pub const UPDATE_ENTRY: OperationDescriptor = OperationDescriptor {
    name: "update_entry",
    method: OperationMethod::Put,
    path: "/content_types/{content_type_uid}/entries/{entry_uid}",
};

pub const DELETE_ENTRY: OperationDescriptor = OperationDescriptor {
    name: "delete_entry",
    method: OperationMethod::Delete,
    path: "/content_types/{content_type_uid}/entries/{entry_uid}",
};

pub const LOCALIZE_ENTRY: OperationDescriptor = OperationDescriptor {
    name: "localize_entry",
    method: OperationMethod::Post,
    path: "/content_types/{content_type_uid}/entries/{entry_uid}/localize",
};

impl ContentstackClient {
    /// List entries of a content type. Non-structural options become a
    /// JSON content filter.
    pub async fn get_entries(
        &self,
        content_type_uid: &str,
        options: &Options,
    ) -> Result<Value, ApiError> {
        self.call(
            &LIST_ENTRIES,
            &[("content_type_uid", content_type_uid)],
            options,
            None,
        )
        .await
    }

    /// Get a single entry.
    pub async fn get_entry(
        &self,
        content_type_uid: &str,
        entry_uid: &str,
        options: &Options,
    ) -> Result<Value, ApiError> {
        self.call(
            &GET_ENTRY,
            &[("content_type_uid", content_type_uid), ("entry_uid", entry_uid)],
            options,
            None,
        )
        .await
    }

    /// Create an entry. `data` is the full body: `{"entry": {...}}`.
    pub async fn create_entry(
        &self,
        content_type_uid: &str,
        data: Value,
        options: &Options,
    ) -> Result<Value, ApiError> {
        self.call(
            &CREATE_ENTRY,
            &[("content_type_uid", content_type_uid)],
            options,
            Some(data),
        )
        .await
    }

    /// Update an entry. `data` is the full body: `{"entry": {...}}`.
    pub async fn update_entry(
        &self,
        content_type_uid: &str,
        entry_uid: &str,
        data: Value,
        options: &Options,
    ) -> Result<Value, ApiError> {
        self.call(
            &UPDATE_ENTRY,
            &[("content_type_uid", content_type_uid), ("entry_uid", entry_uid)],
            options,
            Some(data),
        )
        .await
    }

    pub async fn delete_entry(
        &self,
        content_type_uid: &str,
        entry_uid: &str,
        options: &Options,
    ) -> Result<Value, ApiError> {
        self.call(
            &DELETE_ENTRY,
            &[("content_type_uid", content_type_uid), ("entry_uid", entry_uid)],
            options,
            None,
        )
        .await
    }

    /// Create a localized version of an entry. The target `locale` is sent
    /// as a query parameter and wins over any `locale` in `options`.
    pub async fn localize_entry(
        &self,
        content_type_uid: &str,
        entry_uid: &str,
        data: Value,
        locale: &str,
        options: &Options,
    ) -> Result<Value, ApiError> {
        let options = with_locale(options, locale);
        self.call(
            &LOCALIZE_ENTRY,
            &[("content_type_uid", content_type_uid), ("entry_uid", entry_uid)],
            &options,
            Some(data),
        )
        .await
    }
}

fn with_locale(options: &Options, locale: &str) -> Options {
    let mut options = options.clone();
    options.insert("locale".to_string(), Value::String(locale.to_string()));
    options
}
