use super::element::ReactionElement;
use super::error::EngineError;
use crate::core::models::complex::ComplexEntity;
use crate::core::models::entity::ChemicalEntity;
use crate::core::models::site::BindingSite;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModificationKind {
    Add,
    Bind,
    Release,
    Remove,
}

impl fmt::Display for ModificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Add => "Add",
                Self::Bind => "Bind",
                Self::Release => "Release",
                Self::Remove => "Remove",
            }
        )
    }
}

/// A graph-rewriting operator acting on one or two candidate complexes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComplexEntityModification {
    /// Attaches a new part holding `entity` to a free instance of `site`. The new
    /// part exposes `site` plus `exposes`.
    Add {
        entity: ChemicalEntity,
        site: BindingSite,
        exposes: BTreeSet<BindingSite>,
    },
    /// Joins two complexes at `site`.
    Bind { site: BindingSite },
    /// Splits a complex at an edge occupying `site`.
    Release { site: BindingSite },
    /// Detaches a leaf part holding `entity` that is attached through `site`.
    Remove {
        entity: ChemicalEntity,
        site: BindingSite,
    },
}

impl ComplexEntityModification {
    /// An Add whose new part exposes `site` only.
    pub fn add(entity: ChemicalEntity, site: BindingSite) -> Self {
        Self::Add {
            entity,
            site,
            exposes: BTreeSet::new(),
        }
    }

    /// Returns a copy in which an Add's new part also exposes every site of `sites`
    /// that names its entity, as a seeded copy of that entity would.
    pub fn exposing_discovered(&self, sites: &BTreeSet<BindingSite>) -> Self {
        match self {
            Self::Add {
                entity,
                site,
                exposes,
            } => Self::Add {
                entity: entity.clone(),
                site: site.clone(),
                exposes: exposes
                    .iter()
                    .chain(sites.iter().filter(|known| known.concerns(entity)))
                    .cloned()
                    .collect(),
            },
            other => other.clone(),
        }
    }

    pub fn kind(&self) -> ModificationKind {
        match self {
            Self::Add { .. } => ModificationKind::Add,
            Self::Bind { .. } => ModificationKind::Bind,
            Self::Release { .. } => ModificationKind::Release,
            Self::Remove { .. } => ModificationKind::Remove,
        }
    }

    /// The number of candidates one application consumes.
    pub fn arity(&self) -> usize {
        match self {
            Self::Bind { .. } => 2,
            Self::Add { .. } | Self::Release { .. } | Self::Remove { .. } => 1,
        }
    }

    pub fn site(&self) -> &BindingSite {
        match self {
            Self::Add { site, .. }
            | Self::Bind { site }
            | Self::Release { site }
            | Self::Remove { site, .. } => site,
        }
    }

    /// The entity moved by an Add or Remove.
    pub fn entity(&self) -> Option<&ChemicalEntity> {
        match self {
            Self::Add { entity, .. } | Self::Remove { entity, .. } => Some(entity),
            Self::Bind { .. } | Self::Release { .. } => None,
        }
    }

    /// Cheap structural precheck: `false` means the modification can never apply
    /// to `complex`, whatever the other candidate is.
    pub fn admits(&self, complex: &ComplexEntity) -> bool {
        match self {
            Self::Add { site, .. } | Self::Bind { site } => complex.has_unoccupied_site(site),
            Self::Release { site } => complex.is_site_occupied(site),
            Self::Remove { entity, site } => {
                complex.is_site_occupied(site) && complex.contains_entity(entity)
            }
        }
    }

    /// Returns the reverse operation.
    ///
    /// Only Bind has a context-free inverse (Release at the same site). Add, Remove
    /// and Release would need to know which parts to restore, so inverting them is
    /// an error.
    pub fn invert(&self) -> Result<Self, EngineError> {
        match self {
            Self::Bind { site } => Ok(Self::Release { site: site.clone() }),
            other => Err(EngineError::UnsupportedInversion { kind: other.kind() }),
        }
    }

    /// Applies the operator to `candidates`, returning the product multiset of every
    /// structurally distinct outcome. An empty result is a guard failure, not an error.
    pub fn outcomes(
        &self,
        candidates: &[ComplexEntity],
    ) -> Result<Vec<Vec<ComplexEntity>>, EngineError> {
        if candidates.len() != self.arity() {
            warn!(
                kind = %self.kind(),
                expected = self.arity(),
                found = candidates.len(),
                "Modification applied with the wrong number of candidates."
            );
            return Err(EngineError::ArityMismatch {
                kind: self.kind(),
                expected: self.arity(),
                found: candidates.len(),
            });
        }

        let outcomes = match self {
            Self::Add {
                entity,
                site,
                exposes,
            } => candidates[0]
                .add_all_exposing(entity, site, exposes)
                .into_iter()
                .map(|product| vec![product])
                .collect(),
            Self::Bind { site } => candidates[0]
                .bind_all(&candidates[1], site)
                .into_iter()
                .map(|product| vec![product])
                .collect(),
            Self::Release { site } => candidates[0]
                .unbind_all(site)
                .into_iter()
                .map(|(left, right)| vec![left, right])
                .collect(),
            Self::Remove { entity, site } => candidates[0]
                .remove_all(entity, site)
                .into_iter()
                .map(|product| vec![product])
                .collect(),
        };
        Ok(outcomes)
    }
}

impl fmt::Display for ComplexEntityModification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entity() {
            Some(entity) => write!(f, "{} {} at {}", self.kind(), entity, self.site().name()),
            None => write!(f, "{} at {}", self.kind(), self.site().name()),
        }
    }
}

/// Accumulator driving one modification through repeated applications.
///
/// Candidates are collected with [`add_candidate`](Self::add_candidate), the
/// operator runs on [`apply`](Self::apply), and the buffer is reset with
/// [`clear`](Self::clear) before the next combination. Results never survive a
/// `clear`.
#[derive(Debug, Clone)]
pub struct ModificationBuffer {
    modification: ComplexEntityModification,
    candidates: Vec<ComplexEntity>,
    results: Vec<Vec<ComplexEntity>>,
}

impl ModificationBuffer {
    pub fn new(modification: ComplexEntityModification) -> Self {
        Self {
            modification,
            candidates: Vec::with_capacity(2),
            results: Vec::new(),
        }
    }

    pub fn modification(&self) -> &ComplexEntityModification {
        &self.modification
    }

    pub fn add_candidate(&mut self, candidate: ComplexEntity) {
        self.candidates.push(candidate);
    }

    pub fn candidates(&self) -> &[ComplexEntity] {
        &self.candidates
    }

    pub fn add_result(&mut self, products: Vec<ComplexEntity>) {
        self.results.push(products);
    }

    pub fn add_all_results(&mut self, results: impl IntoIterator<Item = Vec<ComplexEntity>>) {
        self.results.extend(results);
    }

    pub fn results(&self) -> &[Vec<ComplexEntity>] {
        &self.results
    }

    /// Runs the modification on the collected candidates and stores its outcomes.
    pub fn apply(&mut self) -> Result<(), EngineError> {
        let outcomes = self.modification.outcomes(&self.candidates)?;
        trace!(
            modification = %self.modification,
            outcomes = outcomes.len(),
            "Applied modification."
        );
        self.add_all_results(outcomes);
        Ok(())
    }

    /// Pairs the candidates with each stored outcome and resets the buffer.
    pub fn take_elements(&mut self) -> Vec<ReactionElement> {
        let substrates = std::mem::take(&mut self.candidates);
        std::mem::take(&mut self.results)
            .into_iter()
            .map(|products| ReactionElement::new(substrates.clone(), products))
            .collect()
    }

    pub fn clear(&mut self) {
        self.candidates.clear();
        self.results.clear();
    }
}
