//! Route code to entity type lookup.

use crate::model::entity::EntityType;
use crate::routing::code::RouteCode;
use crate::routing::error::RouterBuildError;

/// Entity types indexed by catalog position.
///
/// Both codes of one catalog entry resolve to the same entity.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    entities: Vec<EntityType>,
}

impl TypeRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entity: EntityType) -> Result<(), RouterBuildError> {
        if self.entities.iter().any(|known| known.name == entity.name) {
            return Err(RouterBuildError::DuplicateEntity(entity.name));
        }
        self.entities.push(entity);
        Ok(())
    }

    /// Returns the entity a route code addresses.
    ///
    /// Codes not issued by the owning router yield `None`.
    pub fn type_for(&self, code: RouteCode) -> Option<&EntityType> {
        self.entities.get(code.entry_index())
    }

    pub fn find_by_name(&self, name: &str) -> Option<&EntityType> {
        self.entities.iter().find(|entity| entity.name == name)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityType> {
        self.entities.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::TypeRegistry;
    use crate::model::entity::EntityType;
    use crate::routing::code::RouteCode;
    use crate::routing::error::RouterBuildError;

    #[test]
    fn both_codes_of_an_entry_resolve_to_the_same_entity() {
        let mut registry = TypeRegistry::new();
        registry
            .push(EntityType::new("com.example.Item", "Items"))
            .unwrap();

        let collection = RouteCode::from_raw(1).unwrap();
        let item = RouteCode::from_raw(2).unwrap();
        assert_eq!(registry.type_for(collection).unwrap().name, "com.example.Item");
        assert_eq!(registry.type_for(collection), registry.type_for(item));
    }

    #[test]
    fn unknown_code_is_absent() {
        let mut registry = TypeRegistry::new();
        registry
            .push(EntityType::new("com.example.Item", "Items"))
            .unwrap();
        assert!(registry.type_for(RouteCode::from_raw(3).unwrap()).is_none());
    }

    #[test]
    fn rejects_duplicate_entity_name() {
        let mut registry = TypeRegistry::new();
        registry
            .push(EntityType::new("com.example.Item", "Items"))
            .unwrap();
        let err = registry
            .push(EntityType::new("com.example.Item", "OtherItems"))
            .unwrap_err();
        assert!(matches!(err, RouterBuildError::DuplicateEntity(_)));
    }
}
