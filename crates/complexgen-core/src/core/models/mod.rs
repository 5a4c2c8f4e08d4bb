//! Data model for complexes and the leaf values they are built from.
//!
//! - [`entity`]: chemical entities, compared by identifier.
//! - [`site`]: binding sites between two entity kinds.
//! - [`complex`]: the immutable complex graph with its structural mutators.
//! - [`signature`]: canonical signatures used for structural equality.

pub mod complex;
pub mod entity;
pub mod ids;
pub mod signature;
pub mod site;
