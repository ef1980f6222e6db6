use serde::{Deserialize, Serialize};

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Default, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// API hostname, optionally with a scheme (`example.scalr.io`)
    pub hostname: Option<String>,
    pub token: Option<String>,
    /// Default account for `account` / `account-id` flags
    pub account: Option<String>,
    pub base_path: Option<String>,
    /// Schema document name below the base path
    pub schema_path: Option<String>,
    /// Schema cache lifetime, such as `24h` or `30m`
    pub schema_ttl: Option<String>,
    pub page_size: Option<u32>,
    pub timeout_secs: Option<u64>,
    /// HTTP verbs whose body flags are never enforced as required
    pub relaxed_required_methods: Option<Vec<String>>,
}
