use crate::constants;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Schema unavailable: {reason}")]
    SchemaUnavailable { reason: String },
    #[error("Invalid schema for operation '{operation}': {reason}")]
    SchemaInvalid { operation: String, reason: String },
    #[error("Unsupported field type '{kind}' for '{field}'")]
    UnsupportedFieldType { field: String, kind: String },
    #[error("Duplicate flag '-{name}' in operation '{operation}'")]
    DuplicateFlag { operation: String, name: String },
    #[error("Missing required flag(s): {}", .names.join(", "))]
    MissingRequiredFlags { names: Vec<String> },
    #[error("Invalid value '{value}' for flag '-{flag}': expected {expected}")]
    InvalidFlagValue {
        flag: String,
        value: String,
        expected: String,
    },
    #[error("Command '{name}' not found")]
    UnknownCommand { name: String },
    #[error("Invalid arguments: {0}")]
    Usage(String),
    #[error("Server responded with status {status}")]
    RemoteError { status: u16, body: String },
    #[error("Malformed response: {reason}")]
    MalformedResponse { reason: String },
}

/// JSON representation of an error for structured output
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonError {
    pub error_type: String,
    pub message: String,
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl Error {
    /// Creates a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a schema-unavailable error
    pub fn schema_unavailable(reason: impl Into<String>) -> Self {
        Self::SchemaUnavailable {
            reason: reason.into(),
        }
    }

    /// Creates a malformed-response error
    pub fn malformed_response(reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            reason: reason.into(),
        }
    }

    /// Add context to an error for better user messaging
    #[must_use]
    pub fn with_context(self, context: &str) -> Self {
        match self {
            Self::Network(e) => Self::Config(format!("{context}: {e}")),
            Self::Io(e) => Self::Config(format!("{context}: {e}")),
            _ => self,
        }
    }

    /// Convert error to JSON representation for structured output
    #[must_use]
    pub fn to_json(&self) -> JsonError {
        let mut details = None;
        let (error_type, context) = match self {
            Self::Io(io_err) => {
                let context = match io_err.kind() {
                    std::io::ErrorKind::NotFound => Some(constants::ERR_FILE_NOT_FOUND),
                    std::io::ErrorKind::PermissionDenied => Some(constants::ERR_PERMISSION),
                    _ => None,
                };
                ("FileSystem", context)
            }
            Self::Network(req_err) => {
                let context = if req_err.is_connect() {
                    Some(constants::ERR_CONNECTION)
                } else if req_err.is_timeout() {
                    Some(constants::ERR_TIMEOUT)
                } else {
                    None
                };
                ("Network", context)
            }
            Self::Yaml(_) => ("YAMLParsing", Some(constants::ERR_YAML_SYNTAX)),
            Self::Json(_) => ("JSONParsing", Some(constants::ERR_JSON_SYNTAX)),
            Self::Toml(_) => ("TOMLParsing", Some(constants::ERR_TOML_SYNTAX)),
            Self::Config(_) => ("Configuration", None),
            Self::SchemaUnavailable { .. } => {
                ("SchemaUnavailable", Some(constants::ERR_SCHEMA_UNAVAILABLE))
            }
            Self::SchemaInvalid { .. } => ("SchemaInvalid", None),
            Self::UnsupportedFieldType { .. } => ("UnsupportedFieldType", None),
            Self::DuplicateFlag { .. } => ("DuplicateFlag", None),
            Self::MissingRequiredFlags { names } => {
                details = Some(serde_json::json!({ "missing": names }));
                ("MissingRequiredFlags", Some(constants::MSG_USE_DESCRIBE))
            }
            Self::InvalidFlagValue { .. } => ("InvalidFlagValue", Some(constants::MSG_USE_DESCRIBE)),
            Self::UnknownCommand { .. } => ("UnknownCommand", Some(constants::MSG_USE_LIST)),
            Self::Usage(_) => ("Usage", Some(constants::MSG_USE_DESCRIBE)),
            Self::RemoteError { status, body } => {
                details = Some(serde_json::json!({
                    "status": status,
                    "body": serde_json::from_str::<serde_json::Value>(body)
                        .unwrap_or_else(|_| serde_json::Value::String(body.clone())),
                }));
                ("RemoteError", remote_hint(*status))
            }
            Self::MalformedResponse { .. } => ("MalformedResponse", None),
        };

        JsonError {
            error_type: error_type.to_string(),
            message: self.to_string(),
            context: context.map(str::to_string),
            details,
        }
    }
}

/// Maps an HTTP status to a short remediation hint
#[must_use]
pub const fn remote_hint(status: u16) -> Option<&'static str> {
    match status {
        401 => Some(constants::ERR_API_CREDENTIALS),
        403 => Some(constants::ERR_PERMISSION_DENIED),
        404 => Some(constants::ERR_ENDPOINT_NOT_FOUND),
        429 => Some(constants::ERR_RATE_LIMITED),
        500..=599 => Some(constants::ERR_SERVER_ERROR),
        _ => None,
    }
}
