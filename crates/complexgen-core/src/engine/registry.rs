use crate::core::models::complex::ComplexEntity;
use crate::core::models::entity::ChemicalEntity;
use crate::core::models::signature::Signature;
use std::collections::HashMap;

/// The species discovered by a generation run, keyed by canonical signature.
///
/// The registry is an owned value handed back to the caller; inserting a complex
/// whose structural twin is already present keeps the first one.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entries: HashMap<Signature, ComplexEntity>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, complex: ComplexEntity) -> bool {
        let key = complex.signature().clone();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, complex);
        true
    }

    pub fn get(&self, signature: &Signature) -> Option<&ComplexEntity> {
        self.entries.get(signature)
    }

    pub fn contains(&self, complex: &ComplexEntity) -> bool {
        self.entries.contains_key(complex.signature())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComplexEntity> {
        self.entries.values()
    }

    /// All species ordered by part count, then signature.
    pub fn sorted(&self) -> Vec<&ComplexEntity> {
        let mut species: Vec<_> = self.entries.values().collect();
        species.sort_by(|a, b| {
            a.node_count()
                .cmp(&b.node_count())
                .then_with(|| a.signature().cmp(b.signature()))
        });
        species
    }

    /// Species holding at least one part of `entity`.
    pub fn containing<'a>(
        &'a self,
        entity: &'a ChemicalEntity,
    ) -> impl Iterator<Item = &'a ComplexEntity> + 'a {
        self.entries
            .values()
            .filter(move |complex| complex.contains_entity(entity))
    }
}
