//! Identifier routing: matcher, type registry and mime cache.
//!
//! # Responsibility
//! - Build the immutable route table from the startup catalog.
//! - Resolve identifiers to route codes, entity types and content types.
//!
//! # Invariants
//! - The authority is fixed when the builder is created.
//! - A built `ContentRouter` is read-only apart from its write-once mime
//!   slots; reinitialization means building a new router.

pub mod code;
pub mod error;
pub mod matcher;
pub mod mime;
pub mod types;

pub use code::{Cardinality, RouteCode};
pub use error::{RouterBuildError, RoutingError};
pub use matcher::{RouteEntry, RoutePair, UriMatcher};
pub use mime::{format_mime_type, MimeTypeCache};
pub use types::TypeRegistry;

use crate::model::entity::{CatalogEntry, EntityType};
use crate::model::uri::ResourceUri;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static AUTHORITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._\-]*$").expect("valid authority regex"));
static TABLE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid table name regex"));

/// Returns whether `value` is an acceptable provider authority.
pub fn is_valid_authority(value: &str) -> bool {
    AUTHORITY_RE.is_match(value)
}

/// Returns whether `value` is an acceptable table name.
pub fn is_valid_table_name(value: &str) -> bool {
    TABLE_NAME_RE.is_match(value)
}

/// Successful resolution of one identifier.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedRoute<'a> {
    pub code: RouteCode,
    pub cardinality: Cardinality,
    pub entity: &'a EntityType,
}

impl ResolvedRoute<'_> {
    pub fn table_name(&self) -> &str {
        &self.entity.table_name
    }
}

/// Collects catalog entries before the route table is frozen.
#[derive(Debug)]
pub struct RouterBuilder {
    matcher: UriMatcher,
    types: TypeRegistry,
}

impl RouterBuilder {
    /// Registers the collection and item routes for one entity type.
    ///
    /// # Errors
    /// - `InvalidTableName` for names that are not SQL identifiers.
    /// - `DuplicateTable` when the lower-cased table is already registered.
    /// - `DuplicateEntity` when the entity name is already registered.
    pub fn register(&mut self, entity: EntityType) -> Result<RoutePair, RouterBuildError> {
        if !is_valid_table_name(&entity.table_name) {
            return Err(RouterBuildError::InvalidTableName(entity.table_name));
        }
        if self.types.find_by_name(&entity.name).is_some() {
            return Err(RouterBuildError::DuplicateEntity(entity.name));
        }

        let pair = self.matcher.add_table(&entity)?;
        self.types.push(entity)?;
        Ok(pair)
    }

    /// Builder-style [`RouterBuilder::register`] for catalog entries.
    pub fn with_entry(mut self, entry: &CatalogEntry) -> Result<Self, RouterBuildError> {
        self.register(entry.entity_type())?;
        Ok(self)
    }

    /// Freezes the registered routes.
    pub fn build(self) -> ContentRouter {
        let authority = self.matcher.authority().to_string();
        let mime = MimeTypeCache::new(authority.as_str(), self.matcher.route_count());

        info!(
            "event=router_build module=routing status=ok entity_count={} route_count={}",
            self.types.len(),
            self.matcher.route_count()
        );

        ContentRouter {
            authority,
            matcher: self.matcher,
            types: self.types,
            mime,
        }
    }
}

/// Immutable route table shared by dispatchers.
#[derive(Debug)]
pub struct ContentRouter {
    authority: String,
    matcher: UriMatcher,
    types: TypeRegistry,
    mime: MimeTypeCache,
}

impl ContentRouter {
    /// Starts a router for `authority`.
    ///
    /// # Errors
    /// - `InvalidAuthority` when `authority` is empty or has characters
    ///   outside `[A-Za-z0-9._-]`.
    pub fn builder(authority: &str) -> Result<RouterBuilder, RouterBuildError> {
        let authority = authority.trim();
        if !is_valid_authority(authority) {
            return Err(RouterBuildError::InvalidAuthority(authority.to_string()));
        }
        Ok(RouterBuilder {
            matcher: UriMatcher::new(authority),
            types: TypeRegistry::new(),
        })
    }

    /// Builds a router from an ordered startup catalog.
    pub fn from_catalog(
        authority: &str,
        catalog: &[CatalogEntry],
    ) -> Result<Self, RouterBuildError> {
        let builder = catalog
            .iter()
            .try_fold(Self::builder(authority)?, |builder, entry| {
                builder.with_entry(entry)
            })?;
        Ok(builder.build())
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn matcher(&self) -> &UriMatcher {
        &self.matcher
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn mime_cache(&self) -> &MimeTypeCache {
        &self.mime
    }

    /// Matches a parsed identifier; `None` means no registered pattern fits.
    pub fn match_uri(&self, uri: &ResourceUri) -> Option<RouteCode> {
        self.matcher.match_uri(uri)
    }

    pub fn type_for(&self, code: RouteCode) -> Option<&EntityType> {
        self.types.type_for(code)
    }

    /// Resolves an identifier to its route code and entity type.
    pub fn resolve(&self, uri: &ResourceUri) -> Result<ResolvedRoute<'_>, RoutingError> {
        let code = self
            .match_uri(uri)
            .ok_or_else(|| RoutingError::NoMatch(uri.to_string()))?;
        let entity = self
            .type_for(code)
            .ok_or(RoutingError::UnknownRouteCode(code))?;
        Ok(ResolvedRoute {
            code,
            cardinality: code.cardinality(),
            entity,
        })
    }

    /// Parses and resolves an identifier string.
    pub fn resolve_str(&self, uri: &str) -> Result<ResolvedRoute<'_>, RoutingError> {
        let uri = ResourceUri::parse(uri)?;
        self.resolve(&uri)
    }

    /// Content type for a route code issued by this router.
    pub fn mime_type_for_code(&self, code: RouteCode) -> Result<Cow<'_, str>, RoutingError> {
        let entity = self
            .type_for(code)
            .ok_or(RoutingError::UnknownRouteCode(code))?;
        Ok(self.mime.mime_type_for(code, entity, code.cardinality()))
    }

    /// Content type for an identifier.
    pub fn mime_type(&self, uri: &ResourceUri) -> Result<Cow<'_, str>, RoutingError> {
        let route = self.resolve(uri)?;
        Ok(self
            .mime
            .mime_type_for(route.code, route.entity, route.cardinality))
    }

    /// Builds `content://<authority>/<table>` plus `/<id>` when given.
    ///
    /// The table segment is lower-cased, matching the registered patterns.
    pub fn create_uri(&self, entity: &EntityType, id: Option<i64>) -> ResourceUri {
        let collection = ResourceUri::content(self.authority.as_str(), [entity.routing_segment()]);
        match id {
            Some(id) => collection.with_appended_id(id),
            None => collection,
        }
    }
}
