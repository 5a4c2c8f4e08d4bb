//! # Engine Module
//!
//! The stateful layer of the generator: it turns reaction rules into reactors,
//! iterates them over a growing universe of complexes and records every species and
//! reaction element it encounters.
//!
//! ## Architecture
//!
//! - **Modifications** ([`modification`]) - The four graph-rewriting operators and the
//!   buffer that collects candidates and outcomes for one application
//! - **Reactors** ([`reactor`]) - Rule chains with their candidate conditions, and the
//!   reactors that apply them to every eligible combination
//! - **Reaction elements** ([`element`]) - Substrate and product multisets of one reaction
//! - **Universe** ([`state`]) - The working set of complexes with its settled/fresh split
//! - **Registry** ([`registry`]) - The species handed back to the caller
//! - **Configuration** ([`config`]) - Rule sets, declared entities and the iteration budget
//! - **Progress Monitoring** ([`progress`]) - Phase and pass events for user feedback
//! - **Error Handling** ([`error`]) - Engine-specific error types
//!
//! Reactors only revisit combinations that include a complex discovered in the
//! previous pass, so each fixpoint pass costs in proportion to what changed.

pub mod config;
pub(crate) mod context;
pub mod element;
pub mod error;
pub mod modification;
pub mod progress;
pub mod reactor;
pub mod registry;
pub mod state;
pub(crate) mod tasks;
