//! Entity type tokens and startup catalog entries.
//!
//! # Responsibility
//! - Identify one persisted entity class and its declared table name.
//! - Describe the `(table name, entity type)` pairs consumed at startup.
//!
//! # Invariants
//! - `table_name` keeps its declared casing; routing lower-cases a copy.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Opaque type token for one entity class served by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityType {
    /// Stable entity name, e.g. `com.example.Item`.
    pub name: String,
    /// Declared table name in original casing.
    pub table_name: String,
}

impl EntityType {
    pub fn new(name: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_name: table_name.into(),
        }
    }

    /// Table segment used in identifiers and route patterns.
    pub fn routing_segment(&self) -> String {
        self.table_name.to_lowercase()
    }
}

impl Display for EntityType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.table_name)
    }
}

/// One row of the startup catalog.
///
/// Serialized as `{ "table_name": ..., "entity": ... }` in provider configs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub table_name: String,
    pub entity: String,
}

impl CatalogEntry {
    pub fn new(table_name: impl Into<String>, entity: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            entity: entity.into(),
        }
    }

    pub fn entity_type(&self) -> EntityType {
        EntityType::new(self.entity.as_str(), self.table_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogEntry, EntityType};

    #[test]
    fn routing_segment_is_lowercase_and_table_name_is_untouched() {
        let entity = EntityType::new("com.example.Item", "Items");
        assert_eq!(entity.routing_segment(), "items");
        assert_eq!(entity.table_name, "Items");
    }

    #[test]
    fn catalog_entry_builds_entity_type() {
        let entry = CatalogEntry::new("Notes", "com.example.Note");
        assert_eq!(
            entry.entity_type(),
            EntityType::new("com.example.Note", "Notes")
        );
    }
}
