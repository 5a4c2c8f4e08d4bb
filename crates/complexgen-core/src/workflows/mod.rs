//! # Workflows Module
//!
//! High-level entry points that run a complete generation from a validated
//! configuration to a populated species registry.
//!
//! - **Generation Workflow** ([`generate`]) - Site discovery, seeding, the pre-reaction
//!   phase, the main fixpoint and species registration.

pub mod generate;
