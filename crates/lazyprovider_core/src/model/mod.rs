//! Provider-facing data model.
//!
//! # Responsibility
//! - Define the entity type tokens supplied by the startup catalog.
//! - Define resource identifiers and the column value shapes exchanged with
//!   backing stores.
//!
//! # Invariants
//! - Model types carry no routing state; they are plain values.

pub mod entity;
pub mod uri;
pub mod values;
