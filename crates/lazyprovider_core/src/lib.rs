//! Core routing and dispatch for LazyProvider.
//! Maps `content://` identifiers to registered tables and forwards CRUD to a
//! backing store, notifying observers of mutations.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod routing;
pub mod service;
pub mod store;

pub use config::{ConfigError, ProviderConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LoggingError};
pub use model::entity::{CatalogEntry, EntityType};
pub use model::uri::{ResourceUri, UriParseError, CONTENT_SCHEME};
pub use model::values::{ColumnValue, ContentValues, ResultSet};
pub use notify::{ChangeNotifier, ContentObserver, NoopNotifier, ObserverHandle, ObserverRegistry};
pub use routing::{
    Cardinality, ContentRouter, ResolvedRoute, RouteCode, RouterBuildError, RouterBuilder,
    RoutingError,
};
pub use service::{ContentDispatcher, ProviderError, ProviderResult};
pub use store::{BackingStore, SqliteStore, StoreError, StoreQuery, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
