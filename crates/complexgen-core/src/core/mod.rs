//! # Core Module
//!
//! Stateless building blocks of complex generation.
//!
//! ## Overview
//!
//! The core module holds the data model every other layer works on: chemical
//! entities, the binding sites joining them, and [`models::complex::ComplexEntity`],
//! an immutable graph of entities whose equality is structural. It also defines the
//! [`conditions::CandidateCondition`] predicates used to select which complexes a
//! rule may act on.
//!
//! ## Architecture
//!
//! - **Models** ([`models`]) - Entities, binding sites, complexes and their canonical signatures
//! - **Conditions** ([`conditions`]) - Pure predicates over complexes
//!
//! Nothing in this module holds mutable state; every graph operation returns a new
//! complex, which allows the engine to reuse a candidate across any number of rule
//! applications.

pub mod conditions;
pub mod models;
