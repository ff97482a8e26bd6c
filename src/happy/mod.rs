mod config;
mod error;
mod probe;
mod screen;
mod store;
mod validate;

pub use config::{
    CUSTOM_SERVER_URL_KEY, DEFAULT_SERVER_URL, ResolvedServerInfo, STORE_NAMESPACE, ServerConfig,
    build_time_default,
};
pub use error::{ErrorKind, ServerUrlError, StoreError};
pub use probe::{Prober, SERVER_MARKER};
pub use screen::{Confirmation, ProbeRequest, ScreenState, SettingsScreen};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use validate::validate_syntax;
