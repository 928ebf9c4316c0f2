//! Provider use-case layer.
//!
//! # Responsibility
//! - Resolve identifiers through the router and delegate CRUD to the store.
//! - Fire change notifications after mutating calls.
//!
//! # Invariants
//! - Routing failures short-circuit before any store call.
//! - Services stay storage-agnostic.

pub mod dispatcher;

pub use dispatcher::{ContentDispatcher, ProviderError, ProviderResult};
