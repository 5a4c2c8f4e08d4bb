//! # complexgen Core Library
//!
//! Rule-based generation of molecular complex species. Starting from a set of chemical
//! entities and binding sites, the library applies add, bind, release and remove rules
//! until no new complex or reaction appears, and reports every species and elementary
//! reaction it found.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Immutable data models (`ChemicalEntity`, `BindingSite`,
//!   `ComplexEntity`) with structural equality through canonical signatures, and the pure
//!   `CandidateCondition` predicates.
//!
//! - **[`engine`]: The Logic Core.** Modifications, reactors, the universe of known
//!   complexes, the species registry, configuration and progress reporting. Reactors can be
//!   processed in parallel with the `parallel` feature.
//!
//! - **[`workflows`]: The Public API.** [`workflows::generate::run`] executes a complete
//!   generation: binding site discovery, seeding, the pre-reaction phase, the main fixpoint
//!   and registration.

pub mod core;
pub mod engine;
pub mod workflows;
