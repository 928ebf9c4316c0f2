//! Route codes and cardinality.
//!
//! # Invariants
//! - Catalog entry `i` owns collection code `2i + 1` and item code `2i + 2`.
//! - Odd codes address collections, even codes address single items.
//! - Code `0` is never issued.

use std::fmt::{Display, Formatter};

/// Whether an identifier addresses a whole table or one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    Collection,
    Item,
}

impl Cardinality {
    /// Mime subtype label: `dir` for collections, `item` for items.
    pub fn mime_label(self) -> &'static str {
        match self {
            Self::Collection => "dir",
            Self::Item => "item",
        }
    }
}

impl Display for Cardinality {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Collection => f.write_str("collection"),
            Self::Item => f.write_str("item"),
        }
    }
}

/// Identifier of one registered `(entity type, cardinality)` route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteCode(u32);

impl RouteCode {
    /// Wraps a raw code; `0` is rejected.
    pub fn from_raw(raw: u32) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }

    /// Code for catalog entry `entry_index`; `None` once the entry's item
    /// code would not fit in a `u32`.
    pub(crate) fn for_entry(entry_index: usize, cardinality: Cardinality) -> Option<Self> {
        let base = u32::try_from(entry_index).ok()?.checked_mul(2)?;
        let item = base.checked_add(2)?;
        Some(match cardinality {
            Cardinality::Collection => Self(item - 1),
            Cardinality::Item => Self(item),
        })
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn cardinality(self) -> Cardinality {
        if self.0 % 2 == 0 {
            Cardinality::Item
        } else {
            Cardinality::Collection
        }
    }

    /// Index of the catalog entry this code was issued for.
    pub fn entry_index(self) -> usize {
        ((self.0 - 1) / 2) as usize
    }

    /// Zero-based slot in per-code tables such as the mime cache.
    pub(crate) fn slot(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl Display for RouteCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{Cardinality, RouteCode};

    #[test]
    fn codes_alternate_collection_and_item() {
        for index in 0..4 {
            let collection = RouteCode::for_entry(index, Cardinality::Collection).unwrap();
            let item = RouteCode::for_entry(index, Cardinality::Item).unwrap();
            assert_eq!(collection.get(), (index as u32) * 2 + 1);
            assert_eq!(item.get(), (index as u32) * 2 + 2);
            assert_eq!(collection.cardinality(), Cardinality::Collection);
            assert_eq!(item.cardinality(), Cardinality::Item);
            assert_eq!(collection.entry_index(), index);
            assert_eq!(item.entry_index(), index);
        }
    }

    #[test]
    fn entry_index_past_the_code_space_is_not_encoded() {
        let last = ((u32::MAX - 2) / 2) as usize;
        assert_eq!(
            RouteCode::for_entry(last, Cardinality::Item).map(RouteCode::get),
            Some(u32::MAX - 1)
        );
        assert!(RouteCode::for_entry(last + 1, Cardinality::Collection).is_none());
        assert!(RouteCode::for_entry(last + 1, Cardinality::Item).is_none());
        assert!(RouteCode::for_entry(usize::MAX, Cardinality::Collection).is_none());
    }

    #[test]
    fn zero_is_not_a_route_code() {
        assert!(RouteCode::from_raw(0).is_none());
        assert_eq!(RouteCode::from_raw(3).map(RouteCode::get), Some(3));
    }
}
