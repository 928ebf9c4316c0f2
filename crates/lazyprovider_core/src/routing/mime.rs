//! Lazily computed content-type labels.
//!
//! # Responsibility
//! - Compute `vnd.<authority>.<dir|item>/vnd.<authority>.<table>` per route.
//! - Cache the first computed value for each route code.
//!
//! # Invariants
//! - One slot per issued route code, allocated when the router is built, so
//!   the cache never holds more than `2 × entity types` entries.
//! - A slot stays empty until its code is resolved once; written slots never
//!   change.
//! - The computed value is pure, so concurrent first access needs no lock
//!   beyond the slot's own write-once cell.

use crate::model::entity::EntityType;
use crate::routing::code::{Cardinality, RouteCode};
use once_cell::sync::OnceCell;
use std::borrow::Cow;

/// Formats the content-type string for one table and cardinality.
pub fn format_mime_type(authority: &str, cardinality: Cardinality, table_name: &str) -> String {
    format!(
        "vnd.{authority}.{}/vnd.{authority}.{table_name}",
        cardinality.mime_label()
    )
}

#[derive(Debug)]
pub struct MimeTypeCache {
    authority: String,
    slots: Vec<OnceCell<String>>,
}

impl MimeTypeCache {
    pub(crate) fn new(authority: impl Into<String>, route_count: usize) -> Self {
        Self {
            authority: authority.into(),
            slots: (0..route_count).map(|_| OnceCell::new()).collect(),
        }
    }

    /// Returns the content type for `code`, computing it on first access.
    ///
    /// `entity.table_name` is used in its declared casing. Codes outside the
    /// slot range are computed but not cached.
    pub fn mime_type_for(
        &self,
        code: RouteCode,
        entity: &EntityType,
        cardinality: Cardinality,
    ) -> Cow<'_, str> {
        let compute = || format_mime_type(&self.authority, cardinality, &entity.table_name);
        match self.slots.get(code.slot()) {
            Some(slot) => Cow::Borrowed(slot.get_or_init(compute).as_str()),
            None => Cow::Owned(compute()),
        }
    }

    /// Returns the cached value for `code` without computing it.
    pub fn cached(&self, code: RouteCode) -> Option<&str> {
        self.slots
            .get(code.slot())
            .and_then(OnceCell::get)
            .map(String::as_str)
    }

    /// Number of populated entries.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Upper bound on entries: one per issued route code.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}
