//! The steps a generation run is made of.
//!
//! Each submodule performs one stage of the workflow: collecting the binding sites
//! the rules mention, seeding the universe with minimal complexes, iterating a set of
//! reactors to a fixpoint, and registering the final species.

pub mod fixpoint;
pub mod registration;
pub mod seeding;
pub mod site_discovery;
