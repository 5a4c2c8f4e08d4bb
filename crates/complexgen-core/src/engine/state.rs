use crate::core::models::complex::ComplexEntity;
use crate::core::models::signature::Signature;
use std::collections::HashSet;

/// The working set of complexes a fixpoint phase reacts over.
///
/// Complexes keep their insertion order. Everything at index `settled` and beyond
/// is *fresh*: discovered since the last [`settle`](Self::settle) and not yet
/// combined with the rest of the universe. Every combination made only of settled
/// complexes has already been processed by every reactor.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    complexes: Vec<ComplexEntity>,
    members: HashSet<Signature>,
    settled: usize,
}

impl Universe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `complex` unless a structurally equal one is present.
    /// Returns `true` if it was new.
    pub fn insert(&mut self, complex: ComplexEntity) -> bool {
        if !self.members.insert(complex.signature().clone()) {
            return false;
        }
        self.complexes.push(complex);
        true
    }

    pub fn contains(&self, complex: &ComplexEntity) -> bool {
        self.members.contains(complex.signature())
    }

    pub fn len(&self) -> usize {
        self.complexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.complexes.is_empty()
    }

    pub fn as_slice(&self) -> &[ComplexEntity] {
        &self.complexes
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComplexEntity> {
        self.complexes.iter()
    }

    pub fn fresh(&self) -> &[ComplexEntity] {
        &self.complexes[self.settled..]
    }

    pub fn fresh_count(&self) -> usize {
        self.complexes.len() - self.settled
    }

    pub fn is_fresh(&self, index: usize) -> bool {
        index >= self.settled
    }

    /// Marks every current member as settled.
    pub fn settle(&mut self) {
        self.settled = self.complexes.len();
    }

    /// Marks every member as fresh again, forcing the next pass to revisit all
    /// combinations.
    pub fn reset_fresh(&mut self) {
        self.settled = 0;
    }

    /// Returns a copy without the complexes whose signatures are in `removed`.
    /// All remaining members are fresh in the copy.
    pub fn without(&self, removed: &HashSet<Signature>) -> Self {
        self.iter()
            .filter(|complex| !removed.contains(complex.signature()))
            .cloned()
            .collect()
    }

    pub fn into_vec(self) -> Vec<ComplexEntity> {
        self.complexes
    }
}

impl FromIterator<ComplexEntity> for Universe {
    fn from_iter<I: IntoIterator<Item = ComplexEntity>>(iter: I) -> Self {
        let mut universe = Universe::new();
        universe.extend(iter);
        universe
    }
}

impl Extend<ComplexEntity> for Universe {
    fn extend<I: IntoIterator<Item = ComplexEntity>>(&mut self, iter: I) {
        for complex in iter {
            self.insert(complex);
        }
    }
}
