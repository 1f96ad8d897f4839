//! Contentstack Content Management API operations.
//!
//! Each resource module declares its [`OperationDescriptor`]s and adds the
//! matching methods to [`ContentstackClient`](crate::client::ContentstackClient).

pub mod assets;
pub mod content_types;
pub mod entries;
pub mod environments;
pub mod locales;
pub mod publishing;

use crate::request::OperationDescriptor;

pub use publishing::PublishRequest;

/// Every operation the client exposes.
pub const CATALOG: &[OperationDescriptor] = &[
    content_types::LIST_CONTENT_TYPES,
    content_types::GET_CONTENT_TYPE,
    content_types::CREATE_CONTENT_TYPE,
    content_types::UPDATE_CONTENT_TYPE,
    entries::LIST_ENTRIES,
    entries::GET_ENTRY,
    entries::CREATE_ENTRY,
    entries::UPDATE_ENTRY,
    entries::DELETE_ENTRY,
    assets::LIST_ASSETS,
    assets::GET_ASSET,
    assets::UPLOAD_ASSET,
    environments::LIST_ENVIRONMENTS,
    environments::GET_ENVIRONMENT,
    publishing::PUBLISH_ENTRY,
    publishing::UNPUBLISH_ENTRY,
    locales::LIST_LANGUAGES,
    entries::LOCALIZE_ENTRY,
];
