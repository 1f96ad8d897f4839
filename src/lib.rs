//! Contentstack MCP Server
//!
//! Bridges the Contentstack Content Management API to the Model Context
//! Protocol. The same operations are available directly through
//! [`ContentstackClient`].

pub mod api;
pub mod client;
pub mod config;
pub mod debug;
pub mod error;
pub mod request;
pub mod response;
pub mod server;
pub mod tools;

#[cfg(test)]
mod test_support;

pub use api::PublishRequest;
pub use client::ContentstackClient;
pub use config::{ClientConfig, ConfigOverrides, Region, Settings};
pub use error::{ApiError, ConfigError};
pub use request::{build_request, Options, RequestDescriptor};
pub use server::ContentstackServer;
pub use tools::{DispatchError, ToolDispatcher};
