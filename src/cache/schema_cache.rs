use crate::atomic::atomic_write_sync;
use crate::cache::fingerprint::{file_age, host_key};
use crate::config::Context;
use crate::constants;
use crate::error::Error;
use crate::spec::SchemaIndex;
use crate::transport::{ApiRequest, Transport};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// On-disk copy of the API's schema document, refreshed after a TTL
#[derive(Debug, Clone)]
pub struct SchemaCache {
    path: PathBuf,
    ttl: Duration,
}

impl SchemaCache {
    /// Cache for the schema `schema_path` served by `base_url`, stored under `dir`
    #[must_use]
    pub fn new(dir: &Path, base_url: &str, schema_path: &str, ttl: Duration) -> Self {
        let schema_file = schema_path.rsplit('/').next().unwrap_or(schema_path);
        let file_name = format!(
            "{}{}-{schema_file}",
            constants::CACHE_FILE_PREFIX,
            host_key(base_url)
        );
        Self {
            path: dir.join(file_name),
            ttl,
        }
    }

    /// # Errors
    /// Returns `Config` when no hostname is configured.
    pub fn for_context(context: &Context) -> Result<Self, Error> {
        Ok(Self::new(
            &context.config_dir,
            context.require_base_url()?,
            &context.schema_path,
            context.schema_ttl,
        ))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a cached copy exists and is younger than the TTL
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        file_age(&self.path).is_some_and(|age| age < self.ttl)
    }

    /// Cached document, if present and fresh
    #[must_use]
    pub fn read_fresh(&self) -> Option<String> {
        if !self.is_fresh() {
            return None;
        }
        std::fs::read_to_string(&self.path).ok()
    }

    /// Loads the operation index, downloading the document from `url` when the
    /// cached copy is missing, stale, unparsable, or `force_refresh` is set.
    ///
    /// # Errors
    /// Returns `SchemaUnavailable` when the document cannot be fetched or parsed.
    pub fn load_index<T: Transport + ?Sized>(
        &self,
        transport: &T,
        url: &str,
        force_refresh: bool,
    ) -> Result<SchemaIndex, Error> {
        if !force_refresh {
            if let Some(content) = self.read_fresh() {
                match SchemaIndex::parse(&content) {
                    Ok(index) => {
                        tracing::debug!(path = %self.path.display(), "using cached schema");
                        return Ok(index);
                    }
                    Err(e) => {
                        tracing::warn!(path = %self.path.display(), error = %e, "discarding unreadable schema cache");
                    }
                }
            }
        }

        let content = Self::fetch(transport, url)?;
        let index = SchemaIndex::parse(&content)?;
        if let Err(e) = self.store(&content) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write schema cache");
        }
        Ok(index)
    }

    fn fetch<T: Transport + ?Sized>(transport: &T, url: &str) -> Result<String, Error> {
        tracing::info!(url, "downloading schema");
        let request = ApiRequest::get(url).header(
            constants::HEADER_USER_AGENT,
            crate::config::context::user_agent(),
        );
        let response = transport
            .send(&request)
            .map_err(|e| Error::schema_unavailable(format!("failed to download {url}: {e}")))?;
        if !response.is_success() {
            return Err(Error::schema_unavailable(format!(
                "{url} returned status {}",
                response.status
            )));
        }
        Ok(response.body)
    }

    /// # Errors
    /// Returns `Io` when the cache directory or file cannot be written.
    pub fn store(&self, content: &str) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        atomic_write_sync(&self.path, content.as_bytes())?;
        Ok(())
    }
}
