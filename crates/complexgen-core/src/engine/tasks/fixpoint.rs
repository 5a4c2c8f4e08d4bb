use crate::engine::context::GenerationContext;
use crate::engine::element::ReactionElement;
use crate::engine::error::EngineError;
use crate::engine::progress::Progress;
use crate::engine::reactor::Reactor;
use crate::engine::state::Universe;
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

type PassResult = Result<Vec<ReactionElement>, EngineError>;

/// Iterates `reactors` over `universe` until a full pass yields no new reaction
/// element, folding every new substrate and product into the universe between
/// passes.
///
/// Returns the number of passes executed, the final empty pass included. Fails
/// with [`EngineError::NotConverged`] once the configured pass budget is spent.
#[instrument(skip_all, name = "fixpoint_task", fields(phase = phase))]
pub fn run(
    phase: &'static str,
    reactors: &mut [Reactor],
    universe: &mut Universe,
    context: &GenerationContext,
) -> Result<usize, EngineError> {
    if reactors.is_empty() {
        info!("No reactors in phase; nothing to iterate.");
        return Ok(0);
    }

    let mut iteration = 0;
    loop {
        iteration += 1;
        if let Some(limit) = context.iteration_budget() {
            if iteration > limit {
                warn!(
                    limit,
                    species = universe.len(),
                    "Iteration budget exhausted before reaching a fixpoint."
                );
                return Err(EngineError::NotConverged {
                    phase,
                    iterations: limit,
                });
            }
        }

        context.reporter.report(Progress::PassStart {
            iteration,
            reactors: reactors.len() as u64,
        });

        let results = process_all(reactors, universe, context);

        universe.settle();
        let mut new_reactions = 0;
        let mut new_species = 0;
        for result in results {
            let elements = result?;
            new_reactions += elements.len();
            for element in elements {
                for complex in element.participants() {
                    if universe.insert(complex.clone()) {
                        new_species += 1;
                    }
                }
            }
        }

        context.reporter.report(Progress::PassFinish {
            iteration,
            new_reactions,
            new_species,
        });
        info!(
            iteration,
            new_reactions,
            new_species,
            species = universe.len(),
            "Fixpoint pass finished."
        );

        if new_reactions == 0 {
            return Ok(iteration);
        }
    }
}

fn process_all(
    reactors: &mut [Reactor],
    snapshot: &Universe,
    context: &GenerationContext,
) -> Vec<PassResult> {
    #[cfg(not(feature = "parallel"))]
    let iterator = reactors.iter_mut();

    #[cfg(feature = "parallel")]
    let iterator = reactors.par_iter_mut();

    iterator
        .map(|reactor| {
            let result = reactor.process(snapshot);
            context.reporter.report(Progress::ReactorProcessed);
            result
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::complex::ComplexEntity;
    use crate::core::models::entity::ChemicalEntity;
    use crate::core::models::site::BindingSite;
    use crate::engine::config::{GenerationConfig, GenerationConfigBuilder};
    use crate::engine::modification::ComplexEntityModification;
    use crate::engine::progress::ProgressReporter;
    use crate::engine::reactor::ReactionChain;

    fn config_with(chains: Vec<ReactionChain>, budget: Option<usize>) -> GenerationConfig {
        chains
            .into_iter()
            .fold(GenerationConfigBuilder::new(), |builder, chain| {
                builder.reaction(chain)
            })
            .max_iterations(budget)
            .build()
            .unwrap()
    }

    #[test]
    fn bind_release_pair_converges_in_three_passes() {
        let a = ChemicalEntity::new("A");
        let b = ChemicalEntity::new("B");
        let site = BindingSite::for_pair(&a, &b);
        let config = config_with(
            vec![
                ReactionChain::new("bind", ComplexEntityModification::Bind { site: site.clone() }),
                ReactionChain::new(
                    "release",
                    ComplexEntityModification::Release { site: site.clone() },
                ),
            ],
            Some(10),
        );
        let reporter = ProgressReporter::new();
        let context = GenerationContext::new(&config, &reporter);
        let mut reactors: Vec<Reactor> = config.reactions.iter().cloned().map(Reactor::new).collect();
        let mut universe: Universe = [
            ComplexEntity::from_entity(a, [site.clone()]),
            ComplexEntity::from_entity(b, [site.clone()]),
        ]
        .into_iter()
        .collect();

        let passes = run("main", &mut reactors, &mut universe, &context).unwrap();

        // Pass 1 binds, pass 2 releases the dimer, pass 3 finds nothing new.
        assert_eq!(passes, 3);
        assert_eq!(universe.len(), 3);
        assert_eq!(reactors[0].element_count(), 1);
        assert_eq!(reactors[1].element_count(), 1);
        assert!(universe.fresh().is_empty());
    }

    #[test]
    fn extra_pass_after_convergence_adds_nothing() {
        let a = ChemicalEntity::new("A");
        let b = ChemicalEntity::new("B");
        let c = ChemicalEntity::new("C");
        let ab = BindingSite::for_pair(&a, &b);
        let bc = BindingSite::for_pair(&b, &c);
        let config = config_with(
            vec![
                ReactionChain::new("ab", ComplexEntityModification::Bind { site: ab.clone() }),
                ReactionChain::new("bc", ComplexEntityModification::Bind { site: bc.clone() }),
            ],
            None,
        );
        let reporter = ProgressReporter::new();
        let context = GenerationContext::new(&config, &reporter);
        let mut reactors: Vec<Reactor> = config.reactions.iter().cloned().map(Reactor::new).collect();
        let mut universe: Universe = [
            ComplexEntity::from_entity(a, [ab.clone()]),
            ComplexEntity::from_entity(b, [ab.clone(), bc.clone()]),
            ComplexEntity::from_entity(c, [bc]),
        ]
        .into_iter()
        .collect();
        run("main", &mut reactors, &mut universe, &context).unwrap();
        let species = universe.len();

        universe.reset_fresh();
        for reactor in &mut reactors {
            assert!(reactor.process(&universe).unwrap().is_empty());
        }
        assert_eq!(universe.len(), species);
        assert_eq!(species, 6);
    }

    #[test]
    fn budget_stops_an_unbounded_polymerization() {
        let monomer = ChemicalEntity::new("Monomer");
        let head = BindingSite::named("head", &monomer, &monomer);
        let tail = BindingSite::named("tail", &monomer, &monomer);
        let config = config_with(
            vec![
                ReactionChain::new("head", ComplexEntityModification::Bind { site: head.clone() }),
                ReactionChain::new("tail", ComplexEntityModification::Bind { site: tail.clone() }),
            ],
            Some(4),
        );
        let reporter = ProgressReporter::new();
        let context = GenerationContext::new(&config, &reporter);
        let mut reactors: Vec<Reactor> = config.reactions.iter().cloned().map(Reactor::new).collect();
        let mut universe: Universe = [ComplexEntity::from_entity(monomer, [head, tail])]
            .into_iter()
            .collect();

        let err = run("main", &mut reactors, &mut universe, &context).unwrap_err();
        assert!(matches!(
            err,
            EngineError::NotConverged {
                phase: "main",
                iterations: 4
            }
        ));
    }

    #[test]
    fn empty_reactor_set_needs_no_pass() {
        let a = ChemicalEntity::new("A");
        let b = ChemicalEntity::new("B");
        let config = config_with(
            vec![ReactionChain::new(
                "bind",
                ComplexEntityModification::Bind {
                    site: BindingSite::for_pair(&a, &b),
                },
            )],
            None,
        );
        let reporter = ProgressReporter::new();
        let context = GenerationContext::new(&config, &reporter);
        let mut universe = Universe::new();
        assert_eq!(run("pre", &mut [], &mut universe, &context).unwrap(), 0);
    }
}
