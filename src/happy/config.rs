use log::{debug, info, warn};
use serde::Serialize;
use url::Url;

use crate::happy::{KeyValueStore, StoreError};

/// Server used when neither a stored override nor a build default exists.
pub const DEFAULT_SERVER_URL: &str = "https://api.cluster-fluster.com";

/// Store namespace kept apart from session storage so the override survives logout.
pub const STORE_NAMESPACE: &str = "server-config";

pub const CUSTOM_SERVER_URL_KEY: &str = "custom-server-url";

/// Default server baked in at compile time through `HAPPY_SERVER_URL`.
pub fn build_time_default() -> Option<&'static str> {
    option_env!("HAPPY_SERVER_URL").filter(|url| !url.is_empty())
}

/// Host details of the effective server, derived on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedServerInfo {
    pub hostname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    pub is_custom: bool,
}

/// Resolves the server URL the app talks to.
///
/// Priority: stored override, then the build default, then
/// [`DEFAULT_SERVER_URL`]. Exactly one source wins.
pub struct ServerConfig<S> {
    store: S,
    build_default: Option<String>,
}

impl<S: KeyValueStore> ServerConfig<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            build_default: build_time_default().map(str::to_string),
        }
    }

    /// Replaces the compile-time default, mainly for tests and embedders.
    pub fn with_build_default(mut self, url: Option<String>) -> Self {
        self.build_default = url.filter(|url| !url.is_empty());
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn build_default(&self) -> Option<&str> {
        self.build_default.as_deref()
    }

    /// The stored override, if any. Read failures count as no override.
    pub fn custom_url(&self) -> Option<String> {
        match self.store.get(CUSTOM_SERVER_URL_KEY) {
            Ok(value) => value.filter(|url| !url.is_empty()),
            Err(e) => {
                warn!("Failed to read stored server URL, using defaults: {}", e);
                None
            }
        }
    }

    pub fn effective_url(&self) -> String {
        self.custom_url()
            .or_else(|| self.build_default.clone())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
    }

    /// Stores `url` trimmed, or clears the override when it is `None` or blank.
    ///
    /// The value is not validated here; run it through
    /// [`validate_syntax`](crate::happy::validate_syntax) first.
    pub fn set_custom_url(&self, url: Option<&str>) -> Result<(), StoreError> {
        match url.map(str::trim).filter(|url| !url.is_empty()) {
            Some(url) => {
                self.store.set(CUSTOM_SERVER_URL_KEY, url)?;
                info!("Custom server URL set to {}", url);
            }
            None => {
                self.store.delete(CUSTOM_SERVER_URL_KEY)?;
                info!("Custom server URL cleared");
            }
        }
        Ok(())
    }

    /// True when the effective URL is anything but [`DEFAULT_SERVER_URL`].
    pub fn is_using_custom_server(&self) -> bool {
        self.effective_url() != DEFAULT_SERVER_URL
    }

    pub fn resolved_info(&self) -> ResolvedServerInfo {
        let url = self.effective_url();
        let is_custom = url != DEFAULT_SERVER_URL;

        match Url::parse(&url) {
            Ok(parsed) => ResolvedServerInfo {
                hostname: parsed.host_str().unwrap_or_default().to_string(),
                port: parsed.port(),
                is_custom,
            },
            Err(e) => {
                debug!("Effective server URL {:?} does not parse: {}", url, e);
                ResolvedServerInfo {
                    hostname: url,
                    port: None,
                    is_custom,
                }
            }
        }
    }
}
