//! Tool catalog and dispatcher.
//!
//! Each tool's argument shape is a typed struct; its JSON Schema is derived
//! once, compiled once, and checked before the arguments are deserialized so
//! that callers get every violation in one message.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use jsonschema::error::{TypeKind, ValidationErrorKind};
use jsonschema::{Draft, JSONSchema};
use once_cell::sync::Lazy;
use rmcp::model::{ErrorCode, ErrorData as McpError};
use rmcp::schemars::{self, JsonSchema};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::api::PublishRequest;
use crate::client::ContentstackClient;
use crate::config::{ClientConfig, ConfigOverrides};
use crate::error::ApiError;

pub const GET_CONTENT_TYPES: &str = "contentstack_get_content_types";
pub const GET_CONTENT_TYPE: &str = "contentstack_get_content_type";
pub const CREATE_CONTENT_TYPE: &str = "contentstack_create_content_type";
pub const UPDATE_CONTENT_TYPE: &str = "contentstack_update_content_type";
pub const GET_ENTRIES: &str = "contentstack_get_entries";
pub const GET_ENTRY: &str = "contentstack_get_entry";
pub const CREATE_ENTRY: &str = "contentstack_create_entry";
pub const UPDATE_ENTRY: &str = "contentstack_update_entry";
pub const DELETE_ENTRY: &str = "contentstack_delete_entry";
pub const GET_ASSETS: &str = "contentstack_get_assets";
pub const GET_ASSET: &str = "contentstack_get_asset";
pub const UPLOAD_ASSET: &str = "contentstack_upload_asset";
pub const GET_ENVIRONMENTS: &str = "contentstack_get_environments";
pub const GET_ENVIRONMENT: &str = "contentstack_get_environment";
pub const PUBLISH_ENTRY: &str = "contentstack_publish_entry";
pub const UNPUBLISH_ENTRY: &str = "contentstack_unpublish_entry";
pub const GET_LANGUAGES: &str = "contentstack_get_languages";
pub const LOCALIZE_ENTRY: &str = "contentstack_localize_entry";

// ============================================================================
// Tool Argument Structs
// ============================================================================

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListArgs {
    /// Query parameters (limit, skip, environment, locale, include_count, ...). Any other key is sent as a JSON content filter.
    pub query: Option<Map<String, Value>>,
    /// Contentstack region (NA, EU, AZURE_NA, AZURE_EU, GCP_NA, GCP_EU)
    pub region: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct UidArgs {
    /// UID of the resource
    pub uid: String,
    /// Additional query parameters
    pub options: Option<Map<String, Value>>,
    /// Contentstack region (NA, EU, AZURE_NA, AZURE_EU, GCP_NA, GCP_EU)
    pub region: Option<String>,
}

/// Content type payload; the schema goes inside `content_type`.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ContentTypeData {
    /// Content type definition (title, uid, schema, options)
    pub content_type: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateContentTypeArgs {
    /// Request body: {"content_type": {...}}
    pub data: ContentTypeData,
    /// Contentstack region (NA, EU, AZURE_NA, AZURE_EU, GCP_NA, GCP_EU)
    pub region: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateContentTypeArgs {
    /// Content type UID
    pub uid: String,
    /// Request body: {"content_type": {...}}
    pub data: ContentTypeData,
    /// Contentstack region (NA, EU, AZURE_NA, AZURE_EU, GCP_NA, GCP_EU)
    pub region: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GetEntriesArgs {
    /// Content type UID
    pub content_type_uid: String,
    /// Query parameters (limit, skip, environment, locale, include_count, ...). Any other key is sent as a JSON content filter.
    pub query: Option<Map<String, Value>>,
    /// Contentstack region (NA, EU, AZURE_NA, AZURE_EU, GCP_NA, GCP_EU)
    pub region: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EntryArgs {
    /// Content type UID
    pub content_type_uid: String,
    /// Entry UID
    pub entry_uid: String,
    /// Options for environment, locale, and other parameters
    pub options: Option<Map<String, Value>>,
    /// Contentstack region (NA, EU, AZURE_NA, AZURE_EU, GCP_NA, GCP_EU)
    pub region: Option<String>,
}

/// Entry payload; field values go inside `entry`.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct EntryData {
    /// Entry field values (title, url, custom fields)
    pub entry: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateEntryArgs {
    /// Content type UID
    pub content_type_uid: String,
    /// Request body: {"entry": {...}}
    pub data: EntryData,
    /// Options for environment, locale, and other parameters
    pub options: Option<Map<String, Value>>,
    /// Contentstack region (NA, EU, AZURE_NA, AZURE_EU, GCP_NA, GCP_EU)
    pub region: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateEntryArgs {
    /// Content type UID
    pub content_type_uid: String,
    /// Entry UID
    pub entry_uid: String,
    /// Request body: {"entry": {...}}
    pub data: EntryData,
    /// Options for environment, locale, and other parameters
    pub options: Option<Map<String, Value>>,
    /// Contentstack region (NA, EU, AZURE_NA, AZURE_EU, GCP_NA, GCP_EU)
    pub region: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct UploadAssetArgs {
    /// Asset body, e.g. {"asset": {"url": "...", "title": "..."}}
    pub data: Map<String, Value>,
    /// Contentstack region (NA, EU, AZURE_NA, AZURE_EU, GCP_NA, GCP_EU)
    pub region: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PublishArgs {
    /// Content type UID
    pub content_type_uid: String,
    /// Entry UID
    pub entry_uid: String,
    /// Environment names to target
    pub environments: Vec<String>,
    /// Locale codes to target
    pub locales: Option<Vec<String>>,
    /// Locale of the entry version
    pub locale: Option<String>,
    /// Entry version
    pub version: Option<u64>,
    /// Additional query parameters
    pub options: Option<Map<String, Value>>,
    /// Contentstack region (NA, EU, AZURE_NA, AZURE_EU, GCP_NA, GCP_EU)
    pub region: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LocalizeEntryArgs {
    /// Content type UID
    pub content_type_uid: String,
    /// Entry UID
    pub entry_uid: String,
    /// Target locale code (e.g. "fr-fr")
    pub locale: String,
    /// Request body: {"entry": {...}} with the localized field values
    pub data: EntryData,
    /// Additional query parameters
    pub options: Option<Map<String, Value>>,
    /// Contentstack region (NA, EU, AZURE_NA, AZURE_EU, GCP_NA, GCP_EU)
    pub region: Option<String>,
}

// ============================================================================
// Catalog
// ============================================================================

/// Detects a common argument mistake and explains the fix.
type HintFn = fn(&Value) -> Option<String>;

/// A tool as advertised over MCP.
#[derive(Clone)]
pub struct ToolDef {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
    hint: Option<HintFn>,
}

impl std::fmt::Debug for ToolDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDef").field("name", &self.name).finish()
    }
}

fn schema_for<T: JsonSchema>() -> Value {
    let generator = schemars::generate::SchemaSettings::draft07()
        .with(|s| s.inline_subschemas = true)
        .into_generator();
    let mut schema = serde_json::to_value(generator.into_root_schema_for::<T>())
        .unwrap_or_else(|_| json!({"type": "object"}));
    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$schema");
        obj.remove("title");
    }
    schema
}

fn tool<T: JsonSchema>(
    name: &'static str,
    description: &'static str,
    hint: Option<HintFn>,
) -> ToolDef {
    ToolDef {
        name,
        description,
        input_schema: schema_for::<T>(),
        hint,
    }
}

static TOOL_CATALOG: Lazy<Vec<ToolDef>> = Lazy::new(|| {
    vec![
        tool::<ListArgs>(GET_CONTENT_TYPES, "Get all content types from Contentstack", None),
        tool::<UidArgs>(GET_CONTENT_TYPE, "Get a specific content type by UID", None),
        tool::<CreateContentTypeArgs>(
            CREATE_CONTENT_TYPE,
            "Create a new content type. The definition goes inside data.content_type.",
            Some(content_type_hint),
        ),
        tool::<UpdateContentTypeArgs>(
            UPDATE_CONTENT_TYPE,
            "Update an existing content type. The definition goes inside data.content_type.",
            Some(content_type_hint),
        ),
        tool::<GetEntriesArgs>(
            GET_ENTRIES,
            "Get entries for a content type. Pagination keys go to the URL; other query keys are sent as a JSON content filter.",
            None,
        ),
        tool::<EntryArgs>(GET_ENTRY, "Get a specific entry by UID", None),
        tool::<CreateEntryArgs>(
            CREATE_ENTRY,
            "Create a new entry. Field values go inside data.entry.",
            Some(entry_hint),
        ),
        tool::<UpdateEntryArgs>(
            UPDATE_ENTRY,
            "Update an existing entry. Field values go inside data.entry.",
            Some(entry_hint),
        ),
        tool::<EntryArgs>(DELETE_ENTRY, "Delete an entry", None),
        tool::<ListArgs>(GET_ASSETS, "Get assets from Contentstack", None),
        tool::<UidArgs>(GET_ASSET, "Get a specific asset by UID", None),
        tool::<UploadAssetArgs>(UPLOAD_ASSET, "Create an asset from a JSON body", None),
        tool::<ListArgs>(GET_ENVIRONMENTS, "Get all environments from Contentstack", None),
        tool::<UidArgs>(GET_ENVIRONMENT, "Get a specific environment by name or UID", None),
        tool::<PublishArgs>(
            PUBLISH_ENTRY,
            "Publish an entry to one or more environments",
            Some(publish_hint),
        ),
        tool::<PublishArgs>(
            UNPUBLISH_ENTRY,
            "Unpublish an entry from one or more environments",
            Some(publish_hint),
        ),
        tool::<ListArgs>(GET_LANGUAGES, "Get all languages configured on the stack", None),
        tool::<LocalizeEntryArgs>(
            LOCALIZE_ENTRY,
            "Create a localized version of an entry. Localized field values go inside data.entry.",
            Some(entry_hint),
        ),
    ]
});

static TOOL_VALIDATORS: Lazy<HashMap<&'static str, JSONSchema>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for tool in TOOL_CATALOG.iter() {
        match JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&tool.input_schema)
        {
            Ok(schema) => {
                map.insert(tool.name, schema);
            }
            Err(e) => tracing::error!(tool = tool.name, error = %e, "Invalid tool schema"),
        }
    }
    map
});

pub fn tool_catalog() -> &'static [ToolDef] {
    &TOOL_CATALOG
}

pub fn tool_by_name(name: &str) -> Option<&'static ToolDef> {
    TOOL_CATALOG.iter().find(|tool| tool.name == name)
}

// ============================================================================
// Hints
// ============================================================================

const CAMEL_CASE_FIELDS: &[(&str, &str)] = &[
    ("content_type_uid", "contentTypeUid"),
    ("entry_uid", "entryUid"),
];

fn entry_hint(args: &Value) -> Option<String> {
    match args.get("data") {
        Some(Value::Object(data)) if !data.contains_key("entry") => Some(
            "wrap the entry fields in an \"entry\" object, e.g. {\"data\": {\"entry\": {\"title\": \"My entry\"}}}"
                .to_string(),
        ),
        None if args.get("entry").is_some() => Some(
            "pass the entry inside \"data\", e.g. {\"data\": {\"entry\": {...}}}".to_string(),
        ),
        _ => None,
    }
}

fn content_type_hint(args: &Value) -> Option<String> {
    match args.get("data") {
        Some(Value::Object(data)) if !data.contains_key("content_type") => Some(
            "wrap the definition in a \"content_type\" object, e.g. {\"data\": {\"content_type\": {\"title\": \"Blog\", \"uid\": \"blog\", \"schema\": [...]}}}"
                .to_string(),
        ),
        None if args.get("content_type").is_some() => Some(
            "pass the definition inside \"data\", e.g. {\"data\": {\"content_type\": {...}}}"
                .to_string(),
        ),
        _ => None,
    }
}

fn publish_hint(args: &Value) -> Option<String> {
    if args.get("data").is_some() {
        return Some(
            "pass contentTypeUid, entryUid and environments (plus optional locales, locale, version) directly instead of a \"data\" object"
                .to_string(),
        );
    }
    if args.get("environment").is_some() {
        return Some("use \"environments\" (an array of environment names)".to_string());
    }
    None
}

fn naming_hint(args: &Value) -> Option<String> {
    let renames: Vec<String> = CAMEL_CASE_FIELDS
        .iter()
        .filter(|(snake, _)| args.get(*snake).is_some())
        .map(|(snake, camel)| format!("use '{}' instead of '{}'", camel, snake))
        .collect();
    if renames.is_empty() {
        None
    } else {
        Some(renames.join("; "))
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Check `args` against the tool's schema, listing every violation.
pub fn validate_tool_args(tool: &ToolDef, args: &Value) -> Result<(), DispatchError> {
    let Some(schema) = TOOL_VALIDATORS.get(tool.name) else {
        return Err(DispatchError::SchemaUnavailable(tool.name.to_string()));
    };
    if let Err(errors) = schema.validate(args) {
        let violations: Vec<String> = errors.map(|err| render_violation(&err)).collect();
        return Err(DispatchError::InvalidParams(format_violations(
            tool, args, violations,
        )));
    }
    Ok(())
}

fn render_violation(err: &jsonschema::ValidationError<'_>) -> String {
    let instance_path = if err.instance_path.to_string().is_empty() {
        "(root)".to_string()
    } else {
        err.instance_path.to_string()
    };
    match &err.kind {
        ValidationErrorKind::Required { property } => {
            let prop = property
                .as_str()
                .map(|s| s.to_string())
                .unwrap_or_else(|| property.to_string());
            format!("{}: missing required field '{}'", instance_path, prop)
        }
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            let fields = unexpected
                .iter()
                .map(|f| format!("'{}'", f))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}: unexpected field {}", instance_path, fields)
        }
        ValidationErrorKind::Type { kind } => {
            format!("{}: expected {}", instance_path, format_type_kind(kind))
        }
        _ => format!("{}: {}", instance_path, err),
    }
}

fn format_type_kind(kind: &TypeKind) -> String {
    match kind {
        TypeKind::Single(primitive) => primitive.to_string(),
        TypeKind::Multiple(types) => {
            let list: Vec<String> = (*types).into_iter().map(|t| t.to_string()).collect();
            if list.is_empty() {
                "unknown".to_string()
            } else {
                list.join(" | ")
            }
        }
    }
}

fn format_violations(tool: &ToolDef, args: &Value, violations: Vec<String>) -> String {
    let mut lines = vec![format!("Invalid arguments for {}:", tool.name)];
    lines.extend(violations.into_iter().map(|v| format!("- {}", v)));

    let hints = [tool.hint.and_then(|hint| hint(args)), naming_hint(args)];
    for hint in hints.into_iter().flatten() {
        lines.push(format!("Hint: {}", hint));
    }
    lines.join("\n")
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Failure of a single tool call.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("{0}")]
    InvalidParams(String),

    #[error("Argument schema for {0} is unavailable")]
    SchemaUnavailable(String),

    #[error("Error executing {tool}: {source}")]
    Api {
        tool: String,
        #[source]
        source: ApiError,
    },
}

impl DispatchError {
    /// Map onto the MCP error channel.
    pub fn into_mcp_error(self) -> McpError {
        let (code, data) = match &self {
            DispatchError::UnknownTool(_) => (ErrorCode::METHOD_NOT_FOUND, None),
            DispatchError::InvalidParams(_) => (ErrorCode::INVALID_PARAMS, None),
            DispatchError::SchemaUnavailable(_) => (ErrorCode::INTERNAL_ERROR, None),
            DispatchError::Api { source, .. } => (
                ErrorCode::INTERNAL_ERROR,
                source.status().map(|status| {
                    json!({
                        "status": status.as_u16(),
                        "body": source.body().cloned().unwrap_or(Value::Null),
                    })
                }),
            ),
        };
        McpError {
            code,
            message: Cow::from(self.to_string()),
            data,
        }
    }
}

/// Process-environment lookup, injectable for tests.
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Routes tool calls to [`ContentstackClient`] operations.
#[derive(Clone)]
pub struct ToolDispatcher {
    defaults: ConfigOverrides,
    fallback: ConfigOverrides,
    env: EnvLookup,
    http_client: reqwest::Client,
}

impl ToolDispatcher {
    /// `defaults` are explicit startup values (CLI), `fallback` comes from
    /// the config file. The process environment sits between the two.
    pub fn new(defaults: ConfigOverrides, fallback: ConfigOverrides) -> Result<Self, ApiError> {
        Self::with_env(
            defaults,
            fallback,
            Arc::new(|key: &str| std::env::var(key).ok()),
        )
    }

    pub fn with_env(
        defaults: ConfigOverrides,
        fallback: ConfigOverrides,
        env: EnvLookup,
    ) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::HttpClientInit(e.to_string()))?;
        Ok(Self {
            defaults,
            fallback,
            env,
            http_client,
        })
    }

    /// Config snapshot for one call; a tool's `region` argument wins.
    pub fn client_config(&self, region: Option<&str>) -> ClientConfig {
        let mut overrides = self.defaults.clone();
        if let Some(region) = region {
            overrides.region = Some(region.to_string());
        }
        ClientConfig::resolve(&overrides, &self.fallback, |key| (self.env)(key))
    }

    /// Validate and run one tool call, returning the raw API payload.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<Map<String, Value>>,
    ) -> Result<Value, DispatchError> {
        let tool = tool_by_name(name).ok_or_else(|| DispatchError::UnknownTool(name.to_string()))?;
        let args = Value::Object(arguments.unwrap_or_default());
        validate_tool_args(tool, &args)?;

        let region = args.get("region").and_then(Value::as_str);
        let client =
            ContentstackClient::with_http_client(self.client_config(region), self.http_client.clone());

        self.run(&client, tool.name, args)
            .await
            .map_err(|source| match source {
                RunError::Params(message) => DispatchError::InvalidParams(message),
                RunError::Api(source) => DispatchError::Api {
                    tool: tool.name.to_string(),
                    source,
                },
            })
    }

    async fn run(
        &self,
        client: &ContentstackClient,
        name: &str,
        args: Value,
    ) -> Result<Value, RunError> {
        let result = match name {
            GET_CONTENT_TYPES => {
                let a: ListArgs = parse(name, args)?;
                client.get_content_types(&a.query.unwrap_or_default()).await
            }
            GET_CONTENT_TYPE => {
                let a: UidArgs = parse(name, args)?;
                client
                    .get_content_type(&a.uid, &a.options.unwrap_or_default())
                    .await
            }
            CREATE_CONTENT_TYPE => {
                let a: CreateContentTypeArgs = parse(name, args)?;
                client
                    .create_content_type(json!({ "content_type": a.data.content_type }))
                    .await
            }
            UPDATE_CONTENT_TYPE => {
                let a: UpdateContentTypeArgs = parse(name, args)?;
                client
                    .update_content_type(&a.uid, json!({ "content_type": a.data.content_type }))
                    .await
            }
            GET_ENTRIES => {
                let a: GetEntriesArgs = parse(name, args)?;
                client
                    .get_entries(&a.content_type_uid, &a.query.unwrap_or_default())
                    .await
            }
            GET_ENTRY => {
                let a: EntryArgs = parse(name, args)?;
                client
                    .get_entry(&a.content_type_uid, &a.entry_uid, &a.options.unwrap_or_default())
                    .await
            }
            CREATE_ENTRY => {
                let a: CreateEntryArgs = parse(name, args)?;
                client
                    .create_entry(
                        &a.content_type_uid,
                        json!({ "entry": a.data.entry }),
                        &a.options.unwrap_or_default(),
                    )
                    .await
            }
            UPDATE_ENTRY => {
                let a: UpdateEntryArgs = parse(name, args)?;
                client
                    .update_entry(
                        &a.content_type_uid,
                        &a.entry_uid,
                        json!({ "entry": a.data.entry }),
                        &a.options.unwrap_or_default(),
                    )
                    .await
            }
            DELETE_ENTRY => {
                let a: EntryArgs = parse(name, args)?;
                client
                    .delete_entry(&a.content_type_uid, &a.entry_uid, &a.options.unwrap_or_default())
                    .await
            }
            GET_ASSETS => {
                let a: ListArgs = parse(name, args)?;
                client.get_assets(&a.query.unwrap_or_default()).await
            }
            GET_ASSET => {
                let a: UidArgs = parse(name, args)?;
                client.get_asset(&a.uid, &a.options.unwrap_or_default()).await
            }
            UPLOAD_ASSET => {
                let a: UploadAssetArgs = parse(name, args)?;
                client.upload_asset(Value::Object(a.data)).await
            }
            GET_ENVIRONMENTS => {
                let a: ListArgs = parse(name, args)?;
                client.get_environments(&a.query.unwrap_or_default()).await
            }
            GET_ENVIRONMENT => {
                let a: UidArgs = parse(name, args)?;
                client
                    .get_environment(&a.uid, &a.options.unwrap_or_default())
                    .await
            }
            PUBLISH_ENTRY | UNPUBLISH_ENTRY => {
                let a: PublishArgs = parse(name, args)?;
                let request = PublishRequest {
                    environments: a.environments,
                    locales: a.locales.unwrap_or_default(),
                    locale: a.locale,
                    version: a.version,
                };
                let options = a.options.unwrap_or_default();
                if name == PUBLISH_ENTRY {
                    client
                        .publish_entry(&a.content_type_uid, &a.entry_uid, &request, &options)
                        .await
                } else {
                    client
                        .unpublish_entry(&a.content_type_uid, &a.entry_uid, &request, &options)
                        .await
                }
            }
            GET_LANGUAGES => {
                let a: ListArgs = parse(name, args)?;
                client.get_languages(&a.query.unwrap_or_default()).await
            }
            LOCALIZE_ENTRY => {
                let a: LocalizeEntryArgs = parse(name, args)?;
                client
                    .localize_entry(
                        &a.content_type_uid,
                        &a.entry_uid,
                        json!({ "entry": a.data.entry }),
                        &a.locale,
                        &a.options.unwrap_or_default(),
                    )
                    .await
            }
            other => return Err(RunError::Params(format!("Unknown tool: {}", other))),
        };
        result.map_err(RunError::Api)
    }
}

impl std::fmt::Debug for ToolDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDispatcher")
            .field("region", &self.defaults.region)
            .finish()
    }
}

enum RunError {
    Params(String),
    Api(ApiError),
}

fn parse<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, RunError> {
    serde_json::from_value(args)
        .map_err(|e| RunError::Params(format!("Invalid arguments for {}: {}", tool, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ENV_API_KEY, ENV_BASE_URL, ENV_MANAGEMENT_TOKEN, ENV_REGION};
    use crate::test_support::{CapturedRequest, MockServer};

    fn dispatcher(env: &[(&'static str, &'static str)]) -> ToolDispatcher {
        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ToolDispatcher::with_env(
            ConfigOverrides::default(),
            ConfigOverrides::default(),
            Arc::new(move |key: &str| env.get(key).cloned()),
        )
        .unwrap()
    }

    fn args(value: Value) -> Option<Map<String, Value>> {
        value.as_object().cloned()
    }

    /// Dispatcher aimed at a loopback server answering `{"ok": true}`.
    async fn wired_dispatcher() -> (ToolDispatcher, MockServer) {
        let server = MockServer::json(200, r#"{"ok":true}"#).await;
        let defaults = ConfigOverrides {
            base_url: Some(server.base_url()),
            ..ConfigOverrides::default()
        };
        let dispatcher = ToolDispatcher::with_env(
            defaults,
            ConfigOverrides::default(),
            Arc::new(|key: &str| match key {
                ENV_API_KEY => Some("blt-key".to_string()),
                ENV_MANAGEMENT_TOKEN => Some("cs-token".to_string()),
                _ => None,
            }),
        )
        .unwrap();
        (dispatcher, server)
    }

    async fn dispatch_once(name: &str, arguments: Value) -> CapturedRequest {
        let (dispatcher, server) = wired_dispatcher().await;
        let result = dispatcher.dispatch(name, args(arguments)).await.unwrap();
        assert_eq!(result, json!({"ok": true}));
        let mut requests = server.requests();
        assert_eq!(requests.len(), 1, "{}", name);
        requests.remove(0)
    }

    fn invalid_params(result: Result<Value, DispatchError>) -> String {
        match result {
            Err(DispatchError::InvalidParams(message)) => message,
            other => panic!("expected InvalidParams, got {:?}", other),
        }
    }

    #[test]
    fn test_catalog_lists_every_tool_once() {
        let names: std::collections::HashSet<_> = tool_catalog().iter().map(|t| t.name).collect();
        assert_eq!(names.len(), 18);
        assert_eq!(tool_catalog().len(), 18);
        assert!(tool_by_name(GET_ENTRY).is_some());
        assert!(tool_by_name("contentstack_nope").is_none());
    }

    #[test]
    fn test_every_schema_compiles() {
        for tool in tool_catalog() {
            assert!(TOOL_VALIDATORS.contains_key(tool.name), "{}", tool.name);
            assert_eq!(tool.input_schema["type"], json!("object"), "{}", tool.name);
        }
    }

    #[test]
    fn test_missing_validator_is_an_error() {
        let tool = ToolDef {
            name: "contentstack_uncompiled",
            description: "",
            input_schema: json!({"type": "object"}),
            hint: None,
        };
        let err = validate_tool_args(&tool, &json!({})).unwrap_err();
        assert!(matches!(err, DispatchError::SchemaUnavailable(ref n) if n == "contentstack_uncompiled"));
        assert_eq!(err.into_mcp_error().code, ErrorCode::INTERNAL_ERROR);
    }

    #[test]
    fn test_schema_required_fields() {
        let schema = &tool_by_name(UPDATE_ENTRY).unwrap().input_schema;
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(required.contains(&"contentTypeUid"));
        assert!(required.contains(&"entryUid"));
        assert!(required.contains(&"data"));
        assert!(!required.contains(&"region"));
        assert_eq!(schema["additionalProperties"], json!(false));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let err = dispatcher(&[])
            .dispatch("contentstack_launch_rocket", None)
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::UnknownTool(ref n) if n == "contentstack_launch_rocket"));
        let mcp = err.into_mcp_error();
        assert_eq!(mcp.code, ErrorCode::METHOD_NOT_FOUND);
        assert_eq!(mcp.message, "Unknown tool: contentstack_launch_rocket");
    }

    #[tokio::test]
    async fn test_missing_required_field_is_named() {
        let message = invalid_params(
            dispatcher(&[])
                .dispatch(GET_ENTRY, args(json!({"contentTypeUid": "blog"})))
                .await,
        );
        assert!(message.starts_with("Invalid arguments for contentstack_get_entry:"));
        assert!(message.contains("missing required field 'entryUid'"));
    }

    #[tokio::test]
    async fn test_missing_arguments_lists_every_required_field() {
        let message = invalid_params(dispatcher(&[]).dispatch(GET_ENTRY, None).await);
        assert!(message.contains("'contentTypeUid'"));
        assert!(message.contains("'entryUid'"));
    }

    #[tokio::test]
    async fn test_wrong_type_and_unexpected_field() {
        let message = invalid_params(
            dispatcher(&[])
                .dispatch(
                    GET_CONTENT_TYPE,
                    args(json!({"uid": 42, "verbose": true})),
                )
                .await,
        );
        assert!(message.contains("/uid: expected string"));
        assert!(message.contains("unexpected field 'verbose'"));
    }

    #[tokio::test]
    async fn test_entry_wrap_hint() {
        let message = invalid_params(
            dispatcher(&[])
                .dispatch(
                    CREATE_ENTRY,
                    args(json!({"contentTypeUid": "blog", "data": {"title": "Hello"}})),
                )
                .await,
        );
        assert!(message.contains("/data: missing required field 'entry'"));
        assert!(message.contains("Hint: wrap the entry fields in an \"entry\" object"));
    }

    #[tokio::test]
    async fn test_content_type_wrap_hint() {
        let message = invalid_params(
            dispatcher(&[])
                .dispatch(
                    CREATE_CONTENT_TYPE,
                    args(json!({"data": {"title": "Blog", "uid": "blog"}})),
                )
                .await,
        );
        assert!(message.contains("Hint: wrap the definition in a \"content_type\" object"));
    }

    #[tokio::test]
    async fn test_legacy_publish_shape_hint() {
        let message = invalid_params(
            dispatcher(&[])
                .dispatch(
                    PUBLISH_ENTRY,
                    args(json!({"data": {"entries": [{"uid": "e1"}], "environments": ["prod"]}})),
                )
                .await,
        );
        assert!(message.contains("missing required field 'contentTypeUid'"));
        assert!(message.contains("Hint: pass contentTypeUid, entryUid and environments"));
    }

    #[tokio::test]
    async fn test_snake_case_naming_hint() {
        let message = invalid_params(
            dispatcher(&[])
                .dispatch(
                    GET_ENTRIES,
                    args(json!({"content_type_uid": "blog"})),
                )
                .await,
        );
        assert!(message.contains("Hint: use 'contentTypeUid' instead of 'content_type_uid'"));
    }

    #[test]
    fn test_no_hint_for_plain_missing_field() {
        assert_eq!(entry_hint(&json!({"contentTypeUid": "x"})), None);
        assert_eq!(publish_hint(&json!({"contentTypeUid": "x"})), None);
        assert_eq!(naming_hint(&json!({"contentTypeUid": "x"})), None);
    }

    #[test]
    fn test_client_config_region_precedence() {
        let d = dispatcher(&[(ENV_REGION, "EU"), (ENV_API_KEY, "env-key")]);
        assert_eq!(d.client_config(None).region, "EU");
        assert_eq!(d.client_config(Some("GCP_NA")).region, "GCP_NA");
        assert_eq!(d.client_config(Some("GCP_NA")).api_key, "env-key");
    }

    #[tokio::test]
    async fn test_invalid_region_maps_to_internal_error() {
        let err = dispatcher(&[])
            .dispatch(GET_CONTENT_TYPES, args(json!({"region": "MARS"})))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Api { source: ApiError::InvalidRegion { .. }, .. }
        ));
        let mcp = err.into_mcp_error();
        assert_eq!(mcp.code, ErrorCode::INTERNAL_ERROR);
        assert!(mcp
            .message
            .starts_with("Error executing contentstack_get_content_types: Invalid region: MARS."));
        assert!(mcp.data.is_none());
    }

    #[test]
    fn test_remote_error_carries_status_data() {
        let err = DispatchError::Api {
            tool: GET_ENTRY.to_string(),
            source: crate::response::normalize(404, Some(json!({"error_message": "X"})))
                .unwrap_err(),
        };
        let mcp = err.into_mcp_error();
        assert_eq!(mcp.message, "Error executing contentstack_get_entry: X");
        assert_eq!(
            mcp.data,
            Some(json!({"status": 404, "body": {"error_message": "X"}}))
        );
    }

    #[tokio::test]
    async fn test_publish_posts_targets_to_publish_path() {
        let request = dispatch_once(
            PUBLISH_ENTRY,
            json!({
                "contentTypeUid": "blog",
                "entryUid": "blt01",
                "environments": ["production"],
                "locales": ["en-us", "fr-fr"],
                "locale": "en-us",
                "version": 3
            }),
        )
        .await;
        assert_eq!(request.method, "POST");
        assert_eq!(request.target, "/content_types/blog/entries/blt01/publish");
        assert_eq!(request.header("api_key"), Some("blt-key"));
        assert_eq!(request.header("authorization"), Some("cs-token"));
        assert_eq!(
            request.body,
            Some(json!({
                "entry": {"environments": ["production"], "locales": ["en-us", "fr-fr"]},
                "locale": "en-us",
                "version": 3
            }))
        );
    }

    #[tokio::test]
    async fn test_unpublish_posts_to_unpublish_path() {
        let request = dispatch_once(
            UNPUBLISH_ENTRY,
            json!({"contentTypeUid": "blog", "entryUid": "blt01", "environments": ["staging"]}),
        )
        .await;
        assert_eq!(request.method, "POST");
        assert_eq!(request.target, "/content_types/blog/entries/blt01/unpublish");
        assert_eq!(
            request.body,
            Some(json!({"entry": {"environments": ["staging"], "locales": []}}))
        );
    }

    #[tokio::test]
    async fn test_localize_sends_locale_in_query() {
        let request = dispatch_once(
            LOCALIZE_ENTRY,
            json!({
                "contentTypeUid": "blog",
                "entryUid": "blt01",
                "locale": "fr-fr",
                "data": {"entry": {"title": "Bonjour"}}
            }),
        )
        .await;
        assert_eq!(request.method, "POST");
        assert_eq!(
            request.target,
            "/content_types/blog/entries/blt01/localize?locale=fr-fr"
        );
        assert_eq!(request.body, Some(json!({"entry": {"title": "Bonjour"}})));
    }

    #[tokio::test]
    async fn test_upload_asset_posts_data_as_body() {
        let request = dispatch_once(
            UPLOAD_ASSET,
            json!({"data": {"asset": {"url": "https://example.com/a.png", "title": "A"}}}),
        )
        .await;
        assert_eq!(request.method, "POST");
        assert_eq!(request.target, "/assets");
        assert_eq!(
            request.body,
            Some(json!({"asset": {"url": "https://example.com/a.png", "title": "A"}}))
        );
    }

    #[tokio::test]
    async fn test_get_entries_routes_filter_to_query_param() {
        let request = dispatch_once(
            GET_ENTRIES,
            json!({"contentTypeUid": "blog", "query": {"limit": 5, "title": "Hello"}}),
        )
        .await;
        assert_eq!(request.method, "GET");
        assert_eq!(
            request.target,
            "/content_types/blog/entries?limit=5&query=%7B%22title%22%3A%22Hello%22%7D"
        );
        assert_eq!(request.body, None);
    }

    #[tokio::test]
    async fn test_delete_entry_sends_no_body() {
        let request = dispatch_once(
            DELETE_ENTRY,
            json!({"contentTypeUid": "blog", "entryUid": "blt01"}),
        )
        .await;
        assert_eq!(request.method, "DELETE");
        assert_eq!(request.target, "/content_types/blog/entries/blt01");
        assert_eq!(request.body, None);
    }

    #[tokio::test]
    async fn test_base_url_from_env_reaches_server() {
        let server = MockServer::json(200, r#"{"environments":[]}"#).await;
        let base_url = server.base_url();
        let dispatcher = ToolDispatcher::with_env(
            ConfigOverrides::default(),
            ConfigOverrides::default(),
            Arc::new(move |key: &str| (key == ENV_BASE_URL).then(|| base_url.clone())),
        )
        .unwrap();
        let result = dispatcher
            .dispatch(GET_ENVIRONMENTS, None)
            .await
            .unwrap();
        assert_eq!(result, json!({"environments": []}));
        assert_eq!(server.requests()[0].target, "/environments");
    }
}
