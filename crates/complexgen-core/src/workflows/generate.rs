use crate::core::models::signature::Signature;
use crate::core::models::site::BindingSite;
use crate::engine::config::GenerationConfig;
use crate::engine::context::GenerationContext;
use crate::engine::element::ReactionElement;
use crate::engine::error::EngineError;
use crate::engine::modification::ComplexEntityModification;
use crate::engine::progress::ProgressReporter;
use crate::engine::reactor::{ReactionChain, Reactor};
use crate::engine::registry::EntityRegistry;
use crate::engine::state::Universe;
use crate::engine::tasks;
use std::collections::{BTreeSet, HashSet};
use tracing::{info, instrument};

/// The reactions one chain produced, in canonical order.
#[derive(Debug, Clone)]
pub struct ChainReport {
    pub name: String,
    pub modification: ComplexEntityModification,
    pub elements: Vec<ReactionElement>,
}

impl ChainReport {
    fn from_reactor(reactor: &Reactor) -> Self {
        Self {
            name: reactor.name().to_string(),
            modification: reactor.chain().modification.clone(),
            elements: reactor.sorted_elements(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub registry: EntityRegistry,
    pub binding_sites: BTreeSet<BindingSite>,
    pub pre_reactions: Vec<ChainReport>,
    pub reactions: Vec<ChainReport>,
    pub pre_iterations: usize,
    pub main_iterations: usize,
}

impl GenerationResult {
    pub fn iterations(&self) -> usize {
        self.pre_iterations + self.main_iterations
    }

    pub fn reaction_count(&self) -> usize {
        self.pre_reactions
            .iter()
            .chain(self.reactions.iter())
            .map(|report| report.elements.len())
            .sum()
    }
}

#[instrument(skip_all, name = "generation_workflow")]
pub fn run(
    config: &GenerationConfig,
    reporter: &ProgressReporter,
) -> Result<GenerationResult, EngineError> {
    let context = GenerationContext::new(config, reporter);

    // === Phase 1: Binding site discovery and seeding ===
    let (binding_sites, mut universe) = reporter.phase("Seeding", || {
        info!("Discovering binding sites and seeding minimal complexes.");
        let sites = tasks::site_discovery::run(config);
        let universe = tasks::seeding::run(config, &sites);
        (sites, universe)
    });

    // === Phase 2: Pre-reactions ===
    let (pre_reactions, pre_iterations) = if config.pre_reactions.is_empty() {
        (Vec::new(), 0)
    } else {
        reporter.phase("Pre-reactions", || {
            run_pre_reactions(&mut universe, &binding_sites, &context)
        })?
    };

    // === Phase 3: Main reactions ===
    let (reactions, main_iterations) = reporter.phase("Main Reactions", || {
        let mut reactors = reactors_for(&config.reactions, &binding_sites);
        let iterations = tasks::fixpoint::run("main", &mut reactors, &mut universe, &context)?;
        Ok::<_, EngineError>((reports_for(&reactors), iterations))
    })?;

    // === Phase 4: Registration ===
    let registry = reporter.phase("Registration", || tasks::registration::run(&universe));

    let result = GenerationResult {
        registry,
        binding_sites,
        pre_reactions,
        reactions,
        pre_iterations,
        main_iterations,
    };
    info!(
        species = result.registry.len(),
        reactions = result.reaction_count(),
        iterations = result.iterations(),
        "Generation complete."
    );
    Ok(result)
}

/// Runs the pre-reaction chains to a fixpoint, then replaces every complex they
/// consumed by what they produced.
///
/// Intermediates, complexes both produced and consumed, are dropped as well.
fn run_pre_reactions(
    universe: &mut Universe,
    binding_sites: &BTreeSet<BindingSite>,
    context: &GenerationContext,
) -> Result<(Vec<ChainReport>, usize), EngineError> {
    info!(
        chains = context.config.pre_reactions.len(),
        "Running pre-reactions."
    );
    let mut reactors = reactors_for(&context.config.pre_reactions, binding_sites);
    let iterations = tasks::fixpoint::run("pre-reactions", &mut reactors, universe, context)?;

    let consumed: HashSet<Signature> = reactors
        .iter()
        .flat_map(|reactor| reactor.elements())
        .flat_map(|element| element.substrates())
        .map(|complex| complex.signature().clone())
        .collect();

    // Products were folded in during the fixpoint, so the universe already holds them.
    let before = universe.len();
    *universe = universe.without(&consumed);
    info!(
        removed = before - universe.len(),
        remaining = universe.len(),
        "Replaced pre-reaction substrates by their products."
    );

    Ok((reports_for(&reactors), iterations))
}

/// Builds one reactor per chain. Parts attached by an Add expose the same sites
/// as the seeded copy of their entity.
fn reactors_for(
    chains: &[ReactionChain],
    binding_sites: &BTreeSet<BindingSite>,
) -> Vec<Reactor> {
    chains
        .iter()
        .cloned()
        .map(|mut chain| {
            chain.modification = chain.modification.exposing_discovered(binding_sites);
            Reactor::new(chain)
        })
        .collect()
}

fn reports_for(reactors: &[Reactor]) -> Vec<ChainReport> {
    reactors.iter().map(ChainReport::from_reactor).collect()
}
