use super::element::ReactionElement;
use super::error::EngineError;
use super::modification::{ComplexEntityModification, ModificationBuffer};
use super::state::Universe;
use crate::core::conditions::CandidateCondition;
use crate::core::models::complex::ComplexEntity;
use std::collections::HashSet;
use tracing::trace;

/// A named rule: one modification plus the conditions its candidates must meet.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionChain {
    pub name: String,
    pub modification: ComplexEntityModification,
    /// Conditions on the first (or only) candidate.
    pub conditions: Vec<CandidateCondition>,
    /// Conditions on the second candidate of a bind. Ignored by unary modifications.
    pub partner_conditions: Vec<CandidateCondition>,
}

impl ReactionChain {
    pub fn new(name: impl Into<String>, modification: ComplexEntityModification) -> Self {
        Self {
            name: name.into(),
            modification,
            conditions: Vec::new(),
            partner_conditions: Vec::new(),
        }
    }

    pub fn with_condition(mut self, condition: CandidateCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn with_partner_condition(mut self, condition: CandidateCondition) -> Self {
        self.partner_conditions.push(condition);
        self
    }

    /// Returns `true` if any condition looks at an entity or site of `complex`.
    pub fn concerns(&self, complex: &ComplexEntity) -> bool {
        self.conditions
            .iter()
            .chain(self.partner_conditions.iter())
            .any(|condition| condition.concerns(complex))
    }

    fn accepts_primary(&self, complex: &ComplexEntity) -> bool {
        self.modification.admits(complex) && self.conditions.iter().all(|c| c.test(complex))
    }

    fn accepts_partner(&self, complex: &ComplexEntity) -> bool {
        self.modification.admits(complex)
            && self.partner_conditions.iter().all(|c| c.test(complex))
    }
}

/// Drives a [`ReactionChain`] over a [`Universe`], remembering every reaction element
/// it has produced.
#[derive(Debug, Clone)]
pub struct Reactor {
    chain: ReactionChain,
    elements: HashSet<ReactionElement>,
    buffer: ModificationBuffer,
}

impl Reactor {
    pub fn new(chain: ReactionChain) -> Self {
        let buffer = ModificationBuffer::new(chain.modification.clone());
        Self {
            chain,
            elements: HashSet::new(),
            buffer,
        }
    }

    pub fn name(&self) -> &str {
        &self.chain.name
    }

    pub fn chain(&self) -> &ReactionChain {
        &self.chain
    }

    pub fn elements(&self) -> &HashSet<ReactionElement> {
        &self.elements
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// The elements in canonical order.
    pub fn sorted_elements(&self) -> Vec<ReactionElement> {
        let mut elements: Vec<_> = self.elements.iter().cloned().collect();
        elements.sort_unstable();
        elements
    }

    /// Applies the chain to every eligible combination that involves at least one
    /// fresh complex of `universe` and returns the elements not seen before.
    ///
    /// Unary modifications visit each fresh complex. Bind visits ordered pairs,
    /// self-pairs included, where at least one side is fresh.
    pub fn process(&mut self, universe: &Universe) -> Result<Vec<ReactionElement>, EngineError> {
        let complexes = universe.as_slice();
        let mut discovered = Vec::new();

        match self.chain.modification.arity() {
            1 => {
                for candidate in universe.fresh() {
                    if self.chain.accepts_primary(candidate) {
                        self.react(&[candidate], &mut discovered)?;
                    }
                }
            }
            _ => {
                let primaries: Vec<usize> = (0..complexes.len())
                    .filter(|&i| self.chain.accepts_primary(&complexes[i]))
                    .collect();
                let partners: Vec<usize> = (0..complexes.len())
                    .filter(|&j| self.chain.accepts_partner(&complexes[j]))
                    .collect();

                for &i in &primaries {
                    for &j in &partners {
                        if !universe.is_fresh(i) && !universe.is_fresh(j) {
                            continue;
                        }
                        self.react(&[&complexes[i], &complexes[j]], &mut discovered)?;
                    }
                }
            }
        }

        trace!(
            chain = %self.chain.name,
            discovered = discovered.len(),
            "Reactor processed universe."
        );
        Ok(discovered)
    }

    fn react(
        &mut self,
        candidates: &[&ComplexEntity],
        discovered: &mut Vec<ReactionElement>,
    ) -> Result<(), EngineError> {
        self.buffer.clear();
        for &candidate in candidates {
            self.buffer.add_candidate(candidate.clone());
        }
        self.buffer.apply()?;
        for element in self.buffer.take_elements() {
            if self.elements.insert(element.clone()) {
                discovered.push(element);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::entity::ChemicalEntity;
    use crate::core::models::site::BindingSite;

    struct Fixture {
        ligand: ChemicalEntity,
        site: BindingSite,
        protein: ComplexEntity,
        ligand_free: ComplexEntity,
    }

    fn fixture() -> Fixture {
        let protein = ChemicalEntity::new("Protein");
        let ligand = ChemicalEntity::new("Ligand");
        let site = BindingSite::for_pair(&protein, &ligand);
        Fixture {
            protein: ComplexEntity::from_entity(protein, [site.clone()]),
            ligand_free: ComplexEntity::from_entity(ligand.clone(), [site.clone()]),
            ligand,
            site,
        }
    }

    fn bind_reactor(f: &Fixture) -> Reactor {
        Reactor::new(ReactionChain::new(
            "complexation",
            ComplexEntityModification::Bind {
                site: f.site.clone(),
            },
        ))
    }

    #[test]
    fn bind_reactor_finds_the_single_heterodimer() {
        let f = fixture();
        let universe: Universe = [f.protein.clone(), f.ligand_free.clone()]
            .into_iter()
            .collect();
        let mut reactor = bind_reactor(&f);

        let discovered = reactor.process(&universe).unwrap();

        // Both orderings of the pair collapse onto one element.
        assert_eq!(discovered.len(), 1);
        assert_eq!(reactor.element_count(), 1);
        let element = &discovered[0];
        assert_eq!(element.substrates().len(), 2);
        assert_eq!(element.products().len(), 1);
        assert_eq!(element.products()[0].node_count(), 2);
    }

    #[test]
    fn settled_pairs_are_not_revisited() {
        let f = fixture();
        let mut universe: Universe = [f.protein.clone(), f.ligand_free.clone()]
            .into_iter()
            .collect();
        let mut reactor = bind_reactor(&f);
        reactor.process(&universe).unwrap();

        universe.settle();
        let again = reactor.process(&universe).unwrap();
        assert!(again.is_empty());
        assert_eq!(reactor.element_count(), 1);
    }

    #[test]
    fn repeated_processing_is_deduplicated() {
        let f = fixture();
        let universe: Universe = [f.protein.clone(), f.ligand_free.clone()]
            .into_iter()
            .collect();
        let mut reactor = bind_reactor(&f);
        reactor.process(&universe).unwrap();

        let again = reactor.process(&universe).unwrap();
        assert!(again.is_empty());
        assert_eq!(reactor.element_count(), 1);
    }

    #[test]
    fn conditions_filter_candidates() {
        let f = fixture();
        let bound = f.protein.bind(&f.ligand_free, &f.site).unwrap();
        let universe: Universe = [bound.clone(), f.protein.clone()].into_iter().collect();

        let chain = ReactionChain::new(
            "dissociation",
            ComplexEntityModification::Release {
                site: f.site.clone(),
            },
        )
        .with_condition(CandidateCondition::HasExactly {
            entity: f.ligand.clone(),
            count: 2,
        });
        let mut reactor = Reactor::new(chain);
        assert!(reactor.process(&universe).unwrap().is_empty());

        let chain = ReactionChain::new(
            "dissociation",
            ComplexEntityModification::Release {
                site: f.site.clone(),
            },
        )
        .with_condition(CandidateCondition::HasAny(f.ligand.clone()));
        let mut reactor = Reactor::new(chain);
        let discovered = reactor.process(&universe).unwrap();
        assert_eq!(discovered.len(), 1);
        assert_eq!(discovered[0].substrates(), &[bound][..]);
    }

    #[test]
    fn partner_conditions_apply_to_second_candidate_only() {
        let f = fixture();
        let universe: Universe = [f.protein.clone(), f.ligand_free.clone()]
            .into_iter()
            .collect();
        let chain = ReactionChain::new(
            "complexation",
            ComplexEntityModification::Bind {
                site: f.site.clone(),
            },
        )
        .with_condition(CandidateCondition::HasNone(f.ligand.clone()))
        .with_partner_condition(CandidateCondition::HasAny(f.ligand.clone()));
        let mut reactor = Reactor::new(chain);

        let discovered = reactor.process(&universe).unwrap();
        assert_eq!(discovered.len(), 1);
    }

    #[test]
    fn homotypic_site_forms_a_dimer_from_a_self_pair() {
        let monomer = ChemicalEntity::new("Monomer");
        let site = BindingSite::for_pair(&monomer, &monomer);
        let single = ComplexEntity::from_entity(monomer.clone(), [site.clone()]);
        let universe: Universe = [single.clone()].into_iter().collect();

        let mut reactor = Reactor::new(ReactionChain::new(
            "dimerization",
            ComplexEntityModification::Bind { site },
        ));
        let discovered = reactor.process(&universe).unwrap();

        assert_eq!(discovered.len(), 1);
        assert_eq!(discovered[0].substrates(), &[single.clone(), single][..]);
        assert_eq!(discovered[0].products()[0].count_parts(&monomer), 2);
    }

    #[test]
    fn concerns_follows_conditions() {
        let f = fixture();
        let chain = ReactionChain::new(
            "complexation",
            ComplexEntityModification::Bind {
                site: f.site.clone(),
            },
        );
        assert!(!chain.concerns(&f.protein));

        let chain = chain.with_partner_condition(CandidateCondition::HasAny(f.ligand.clone()));
        assert!(chain.concerns(&f.ligand_free));
        assert!(!chain.concerns(&f.protein));
    }
}
