use crate::config::models::ConfigFile;
use crate::constants;
use crate::duration::parse_duration;
use crate::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resolved runtime configuration of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    /// Scheme and host, without a trailing slash
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub account: Option<String>,
    pub base_path: String,
    pub schema_path: String,
    pub schema_ttl: Duration,
    pub page_size: u32,
    pub timeout: Duration,
    /// Upper-cased HTTP verbs
    pub relaxed_required_methods: Vec<String>,
    pub config_dir: PathBuf,
}

impl Context {
    /// Merges environment values over the config file over defaults
    ///
    /// # Errors
    /// Returns `Config` for an unparsable `schema_ttl` or a zero `page_size`.
    pub fn from_sources<F>(file: ConfigFile, env: F, config_dir: PathBuf) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = |name: &str| env(name).filter(|value| !value.trim().is_empty());

        let hostname = from_env(constants::ENV_HOSTNAME).or(file.hostname);
        let schema_ttl = match file.schema_ttl.as_deref() {
            Some(ttl) => parse_duration(ttl)?,
            None => Duration::from_secs(constants::DEFAULT_SCHEMA_TTL_SECS),
        };
        let page_size = file.page_size.unwrap_or(constants::DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(Error::config("page_size must be greater than zero"));
        }

        Ok(Self {
            base_url: hostname.as_deref().map(normalize_base_url),
            token: from_env(constants::ENV_TOKEN).or(file.token),
            account: from_env(constants::ENV_ACCOUNT).or(file.account),
            base_path: normalize_base_path(
                file.base_path
                    .as_deref()
                    .unwrap_or(constants::DEFAULT_BASE_PATH),
            ),
            schema_path: file
                .schema_path
                .unwrap_or_else(|| constants::DEFAULT_SCHEMA_PATH.to_string())
                .trim_start_matches('/')
                .to_string(),
            schema_ttl,
            page_size,
            timeout: Duration::from_secs(
                file.timeout_secs.unwrap_or(constants::DEFAULT_TIMEOUT_SECS),
            ),
            relaxed_required_methods: file
                .relaxed_required_methods
                .unwrap_or_else(|| {
                    constants::DEFAULT_RELAXED_METHODS
                        .iter()
                        .map(ToString::to_string)
                        .collect()
                })
                .iter()
                .map(|method| method.trim().to_uppercase())
                .collect(),
            config_dir,
        })
    }

    /// Scheme and host, or a `Config` error when no hostname is configured
    ///
    /// # Errors
    /// Returns `Config` when the hostname is missing.
    pub fn require_base_url(&self) -> Result<&str, Error> {
        self.base_url
            .as_deref()
            .ok_or_else(|| Error::config(format!("hostname is not set. {}", constants::MSG_NOT_CONFIGURED)))
    }

    /// # Errors
    /// Returns `Config` when the token is missing.
    pub fn require_token(&self) -> Result<&str, Error> {
        self.token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::config(format!("token is not set. {}", constants::MSG_NOT_CONFIGURED)))
    }

    /// Base URL all operation paths are appended to
    ///
    /// # Errors
    /// Returns `Config` when the hostname is missing.
    pub fn api_url(&self) -> Result<String, Error> {
        Ok(format!("{}{}", self.require_base_url()?, self.base_path))
    }

    /// URL of the schema document
    ///
    /// # Errors
    /// Returns `Config` when the hostname is missing.
    pub fn schema_url(&self) -> Result<String, Error> {
        Ok(format!("{}/{}", self.api_url()?, self.schema_path))
    }

    /// Headers sent with every API call
    ///
    /// # Errors
    /// Returns `Config` when the token is missing.
    pub fn auth_headers(&self) -> Result<Vec<(String, String)>, Error> {
        Ok(vec![
            (constants::HEADER_USER_AGENT.to_string(), user_agent()),
            (
                constants::HEADER_AUTHORIZATION.to_string(),
                format!("Bearer {}", self.require_token()?),
            ),
            (
                constants::HEADER_PREFER.to_string(),
                constants::PREFER_PREVIEW_PROFILE.to_string(),
            ),
        ])
    }

    #[must_use]
    pub fn relaxes_required(&self, method: &str) -> bool {
        self.relaxed_required_methods
            .iter()
            .any(|relaxed| relaxed.eq_ignore_ascii_case(method))
    }
}

#[must_use]
pub fn user_agent() -> String {
    format!("scalr-cli/{}", env!("CARGO_PKG_VERSION"))
}

/// Prepends `https://` unless a scheme is given; drops trailing slashes
fn normalize_base_url(hostname: &str) -> String {
    let hostname = hostname.trim().trim_end_matches('/');
    if hostname.starts_with("http://") || hostname.starts_with("https://") {
        hostname.to_string()
    } else {
        format!("https://{hostname}")
    }
}

fn normalize_base_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// Default configuration directory, `~/.scalr`
///
/// # Errors
/// Returns `Config` when the home directory cannot be determined.
pub fn default_config_dir() -> Result<PathBuf, Error> {
    dirs::home_dir()
        .map(|home| home.join(constants::CONFIG_DIR_NAME))
        .ok_or_else(|| Error::config("could not determine the home directory"))
}

/// Reads `config.toml` from `dir`; a missing file yields the empty config
///
/// # Errors
/// Returns `Io` for unreadable files and `Toml` for invalid content.
pub fn load_config_file(dir: &Path) -> Result<ConfigFile, Error> {
    let path = dir.join(constants::CONFIG_FILENAME);
    match std::fs::read_to_string(&path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file");
            Ok(ConfigFile::default())
        }
        Err(e) => Err(Error::Io(e).with_context(&format!("reading {}", path.display()))),
    }
}
