use crate::core::models::site::BindingSite;
use crate::engine::config::GenerationConfig;
use std::collections::BTreeSet;
use tracing::{debug, instrument};

/// Collects the site of every pre-reaction and main chain.
#[instrument(skip_all, name = "site_discovery_task")]
pub fn run(config: &GenerationConfig) -> BTreeSet<BindingSite> {
    let sites: BTreeSet<BindingSite> = config
        .chains()
        .map(|chain| chain.modification.site().clone())
        .collect();
    debug!(count = sites.len(), "Discovered binding sites.");
    sites
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::entity::ChemicalEntity;
    use crate::engine::config::GenerationConfigBuilder;
    use crate::engine::modification::ComplexEntityModification;
    use crate::engine::reactor::ReactionChain;

    #[test]
    fn sites_are_collected_once_across_phases() {
        let a = ChemicalEntity::new("A");
        let b = ChemicalEntity::new("B");
        let c = ChemicalEntity::new("C");
        let ab = BindingSite::for_pair(&a, &b);
        let bc = BindingSite::for_pair(&b, &c);

        let config = GenerationConfigBuilder::new()
            .pre_reaction(ReactionChain::new(
                "prime",
                ComplexEntityModification::add(c.clone(), bc.clone()),
            ))
            .reaction(ReactionChain::new(
                "bind",
                ComplexEntityModification::Bind { site: ab.clone() },
            ))
            .reaction(ReactionChain::new(
                "release",
                ComplexEntityModification::Release { site: ab.clone() },
            ))
            .build()
            .unwrap();

        let sites = run(&config);
        assert_eq!(sites.len(), 2);
        assert!(sites.contains(&ab));
        assert!(sites.contains(&bc));
    }
}
