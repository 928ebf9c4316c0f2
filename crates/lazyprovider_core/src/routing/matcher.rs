//! URI pattern matcher.
//!
//! # Responsibility
//! - Hold the collection and item patterns for every registered table.
//! - Map a parsed identifier onto exactly one route code, or none.
//!
//! # Invariants
//! - Table segments are stored lower-cased and matched case-insensitively
//!   against the percent-decoded path.
//! - Item routes accept a single non-empty run of ASCII digits after the
//!   table segment; anything else is no match.
//! - Scheme and authority must match exactly; there are no prefix matches.

use crate::model::entity::EntityType;
use crate::model::uri::{ResourceUri, CONTENT_SCHEME};
use crate::routing::code::{Cardinality, RouteCode};
use crate::routing::error::RouterBuildError;
use std::collections::HashMap;

/// One registered pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// `<table>` or `<table>/#`.
    pub pattern: String,
    pub code: RouteCode,
    pub entity: EntityType,
    pub cardinality: Cardinality,
}

/// Collection and item codes issued for one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutePair {
    pub collection: RouteCode,
    pub item: RouteCode,
}

#[derive(Debug)]
pub struct UriMatcher {
    authority: String,
    tables: HashMap<String, RoutePair>,
    entries: Vec<RouteEntry>,
}

impl UriMatcher {
    pub(crate) fn new(authority: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            tables: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Adds the collection and item patterns for `entity`.
    ///
    /// Codes are derived from the registration order.
    pub(crate) fn add_table(&mut self, entity: &EntityType) -> Result<RoutePair, RouterBuildError> {
        let segment = entity.routing_segment();
        if self.tables.contains_key(segment.as_str()) {
            return Err(RouterBuildError::DuplicateTable(entity.table_name.clone()));
        }

        let entry_index = self.tables.len();
        let code_for = |cardinality| {
            RouteCode::for_entry(entry_index, cardinality)
                .ok_or(RouterBuildError::RouteCodeOverflow(entry_index))
        };
        let pair = RoutePair {
            collection: code_for(Cardinality::Collection)?,
            item: code_for(Cardinality::Item)?,
        };

        self.entries.push(RouteEntry {
            pattern: segment.clone(),
            code: pair.collection,
            entity: entity.clone(),
            cardinality: Cardinality::Collection,
        });
        self.entries.push(RouteEntry {
            pattern: format!("{segment}/#"),
            code: pair.item,
            entity: entity.clone(),
            cardinality: Cardinality::Item,
        });
        self.tables.insert(segment, pair);

        Ok(pair)
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Registered patterns in code order.
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn route_count(&self) -> usize {
        self.entries.len()
    }

    /// Matches `uri` against the registered patterns.
    pub fn match_uri(&self, uri: &ResourceUri) -> Option<RouteCode> {
        if uri.scheme() != CONTENT_SCHEME || uri.authority() != self.authority {
            return None;
        }

        match uri.path_segments() {
            [table] => self.lookup(table).map(|pair| pair.collection),
            [table, id] if is_numeric_segment(id) => self.lookup(table).map(|pair| pair.item),
            _ => None,
        }
    }

    fn lookup(&self, table_segment: &str) -> Option<&RoutePair> {
        self.tables.get(table_segment.to_lowercase().as_str())
    }
}

fn is_numeric_segment(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}
