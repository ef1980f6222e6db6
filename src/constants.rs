//! Centralized string constants for the Scalr CLI
//!
//! This module contains commonly used string literals to:
//! - Reduce string duplication
//! - Keep wire-format conventions in one place
//! - Ensure consistency across the codebase

// HTTP Headers
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_USER_AGENT: &str = "User-Agent";
pub const HEADER_PREFER: &str = "Prefer";
pub const PREFER_PREVIEW_PROFILE: &str = "profile=preview";

// Content Types
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_JSON_API: &str = "application/vnd.api+json";

// Normalized wire format field names
pub const FIELD_DATA: &str = "data";
pub const FIELD_ID: &str = "id";
pub const FIELD_TYPE: &str = "type";

// Pagination
pub const PARAM_PAGE_NUMBER: &str = "page[number]";
pub const PARAM_PAGE_SIZE: &str = "page[size]";
pub const PARAM_FIELDS: &str = "fields";
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Parameters that never become flags
pub const IGNORED_PARAMETERS: &[&str] = &[PARAM_PAGE_NUMBER, PARAM_PAGE_SIZE, PARAM_FIELDS];

// Flag names that fall back to the configured account
pub const FLAG_ACCOUNT: &str = "account";
pub const FLAG_ACCOUNT_ID: &str = "account-id";

// OpenAPI Extensions
pub const EXT_RESOURCE: &str = "x-resource";

// Environment Variables
pub const ENV_HOSTNAME: &str = "SCALR_HOSTNAME";
pub const ENV_TOKEN: &str = "SCALR_TOKEN";
pub const ENV_ACCOUNT: &str = "SCALR_ACCOUNT";
pub const ENV_CONFIG_DIR: &str = "SCALR_CONFIG_DIR";
pub const ENV_LOG: &str = "SCALR_LOG";
pub const ENV_LOG_FORMAT: &str = "SCALR_LOG_FORMAT";
pub const ENV_LOG_FILE: &str = "SCALR_LOG_FILE";
pub const ENV_LOG_MAX_BODY: &str = "SCALR_LOG_MAX_BODY";

// Default Values
pub const DEFAULT_BASE_PATH: &str = "/api/iacp/v3";
pub const DEFAULT_SCHEMA_PATH: &str = "openapi-preview.yml";
pub const DEFAULT_SCHEMA_TTL_SECS: u64 = 24 * 60 * 60;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RELAXED_METHODS: &[&str] = &[HTTP_METHOD_PATCH];
pub const DEFAULT_GROUP: &str = "Other";
pub const DEFAULT_LOG_MAX_BODY: usize = 1000;

// File and directory names
pub const CONFIG_DIR_NAME: &str = ".scalr";
pub const CONFIG_FILENAME: &str = "config.toml";
pub const CACHE_FILE_PREFIX: &str = "cache-";

// Schema Types
pub const SCHEMA_TYPE_STRING: &str = "string";
pub const SCHEMA_TYPE_NUMBER: &str = "number";
pub const SCHEMA_TYPE_INTEGER: &str = "integer";
pub const SCHEMA_TYPE_BOOLEAN: &str = "boolean";
pub const SCHEMA_TYPE_ARRAY: &str = "array";
pub const SCHEMA_TYPE_OBJECT: &str = "object";

// HTTP Methods
pub const HTTP_METHOD_GET: &str = "GET";
pub const HTTP_METHOD_POST: &str = "POST";
pub const HTTP_METHOD_PUT: &str = "PUT";
pub const HTTP_METHOD_DELETE: &str = "DELETE";
pub const HTTP_METHOD_PATCH: &str = "PATCH";
pub const HTTP_METHOD_HEAD: &str = "HEAD";
pub const HTTP_METHOD_OPTIONS: &str = "OPTIONS";

// Error Context Messages
pub const ERR_API_CREDENTIALS: &str =
    "Check your API credentials and authentication configuration.";
pub const ERR_PERMISSION_DENIED: &str =
    "Your credentials may be valid but lack permission for this operation.";
pub const ERR_ENDPOINT_NOT_FOUND: &str = "Check that the API endpoint and parameters are correct.";
pub const ERR_RATE_LIMITED: &str = "You're making requests too quickly. Wait before trying again.";
pub const ERR_SERVER_ERROR: &str = "The API server is experiencing issues. Try again later.";
pub const ERR_CONNECTION: &str = "Check that the API server is running and accessible.";
pub const ERR_TIMEOUT: &str = "The API server may be slow or unresponsive. Try again later.";
pub const ERR_SCHEMA_UNAVAILABLE: &str =
    "Check SCALR_HOSTNAME and network access, or retry with --refresh-schema.";

// File System Messages
pub const ERR_FILE_NOT_FOUND: &str = "Check that the file path is correct and the file exists.";
pub const ERR_PERMISSION: &str = "Check file permissions or run with appropriate privileges.";

// Validation Messages
pub const ERR_YAML_SYNTAX: &str = "Check that the schema document is valid YAML syntax.";
pub const ERR_JSON_SYNTAX: &str = "Check that your request body or response contains valid JSON.";
pub const ERR_TOML_SYNTAX: &str = "Check that your configuration file is valid TOML syntax.";

// CLI Messages
pub const MSG_USE_LIST: &str = "Use --list to see available commands.";
pub const MSG_USE_DESCRIBE: &str = "Use --describe <COMMAND> to see the flags of a command.";
pub const MSG_NOT_CONFIGURED: &str =
    "Set SCALR_HOSTNAME and SCALR_TOKEN, or add hostname/token to ~/.scalr/config.toml.";

/// Check if a content type is the normalized wire format
#[must_use]
pub fn is_json_api_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|media| media.trim().eq_ignore_ascii_case(CONTENT_TYPE_JSON_API))
}
