use crate::core::models::complex::ComplexEntity;
use crate::core::models::entity::ChemicalEntity;
use crate::core::models::site::BindingSite;
use crate::engine::config::GenerationConfig;
use crate::engine::state::Universe;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info, instrument};

/// Builds the initial universe: one free complex per entity, exposing every
/// discovered site that names the entity.
///
/// Entities declared in the configuration come first, in declaration order,
/// followed by the remaining site entities in site order.
#[instrument(skip_all, name = "seeding_task")]
pub fn run(config: &GenerationConfig, sites: &BTreeSet<BindingSite>) -> Universe {
    let mut seen = HashSet::new();
    let mut entities: Vec<&ChemicalEntity> = Vec::new();

    let declared = config.entities.iter();
    let from_sites = sites.iter().flat_map(|site| {
        let (first, second) = site.slots();
        [first, second]
    });
    for entity in declared.chain(from_sites) {
        if seen.insert(entity.identifier()) {
            entities.push(entity);
        }
    }

    let universe: Universe = entities
        .into_iter()
        .map(|entity| {
            let exposed: Vec<BindingSite> = sites
                .iter()
                .filter(|site| site.concerns(entity))
                .cloned()
                .collect();
            debug!(
                entity = %entity,
                sites = ?exposed.iter().map(BindingSite::name).collect::<Vec<_>>(),
                "Seeding minimal complex."
            );
            ComplexEntity::from_entity(entity.clone(), exposed)
        })
        .collect();

    info!(species = universe.len(), "Seeded universe.");
    universe
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::GenerationConfigBuilder;
    use crate::engine::modification::ComplexEntityModification;
    use crate::engine::reactor::ReactionChain;

    #[test]
    fn every_entity_gets_one_minimal_complex_with_its_sites() {
        let a = ChemicalEntity::new("A");
        let b = ChemicalEntity::new("B");
        let c = ChemicalEntity::new("C");
        let lonely = ChemicalEntity::new("Lonely").with_mass(12.0);
        let ab = BindingSite::for_pair(&a, &b);
        let bc = BindingSite::for_pair(&b, &c);

        let config = GenerationConfigBuilder::new()
            .entity(lonely.clone())
            .entity(b.clone())
            .reaction(ReactionChain::new(
                "ab",
                ComplexEntityModification::Bind { site: ab.clone() },
            ))
            .reaction(ReactionChain::new(
                "bc",
                ComplexEntityModification::Bind { site: bc.clone() },
            ))
            .build()
            .unwrap();
        let sites: BTreeSet<_> = [ab.clone(), bc.clone()].into_iter().collect();

        let universe = run(&config, &sites);

        assert_eq!(universe.len(), 4);
        assert_eq!(universe.fresh_count(), 4);
        assert!(universe.contains(&ComplexEntity::of(lonely.clone())));
        assert!(universe.contains(&ComplexEntity::from_entity(
            b.clone(),
            [ab.clone(), bc.clone()]
        )));
        assert!(universe.contains(&ComplexEntity::from_entity(a, [ab])));
        assert!(universe.contains(&ComplexEntity::from_entity(c, [bc])));

        let first = &universe.as_slice()[0];
        assert!(first.contains_entity(&lonely));
        assert!(universe.iter().all(|complex| complex.node_count() == 1));
    }
}
