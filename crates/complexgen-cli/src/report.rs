use complexgen::engine::config::GenerationConfig;
use complexgen::workflows::generate::{ChainReport, GenerationResult};
use std::fmt;

/// Renders a generation result as plain text: species first, then the reactions of
/// every chain.
pub fn render_generation(result: &GenerationResult) -> String {
    GenerationReport(result).to_string()
}

/// Summarizes a validated configuration without running it.
pub fn render_check(config: &GenerationConfig) -> String {
    CheckReport(config).to_string()
}

struct GenerationReport<'a>(&'a GenerationResult);

impl fmt::Display for GenerationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let species = result.registry.sorted();

        writeln!(f, "# Species ({})", species.len())?;
        for (i, complex) in species.iter().enumerate() {
            writeln!(
                f,
                "{:>4}. {}  [parts: {}, bonds: {}]",
                i + 1,
                complex,
                complex.node_count(),
                complex.edge_count()
            )?;
            writeln!(f, "      {}", complex.signature())?;
        }

        if !result.pre_reactions.is_empty() {
            writeln!(f)?;
            writeln!(f, "# Pre-reactions ({} passes)", result.pre_iterations)?;
            write_chains(f, &result.pre_reactions)?;
        }

        writeln!(f)?;
        writeln!(f, "# Reactions ({} passes)", result.main_iterations)?;
        write_chains(f, &result.reactions)
    }
}

fn write_chains(f: &mut fmt::Formatter<'_>, reports: &[ChainReport]) -> fmt::Result {
    for report in reports {
        writeln!(
            f,
            "## {} ({}): {} element(s)",
            report.name,
            report.modification,
            report.elements.len()
        )?;
        for element in &report.elements {
            writeln!(f, "  {}", element)?;
        }
    }
    Ok(())
}

struct CheckReport<'a>(&'a GenerationConfig);

impl fmt::Display for CheckReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.0;
        let mut sites: Vec<_> = config
            .chains()
            .map(|chain| chain.modification.site())
            .collect();
        sites.sort();
        sites.dedup();

        writeln!(f, "Declared entities: {}", config.entities.len())?;
        for entity in &config.entities {
            writeln!(f, "  - {}", entity)?;
        }
        writeln!(f, "Binding sites in use: {}", sites.len())?;
        for site in sites {
            writeln!(f, "  - {}", site)?;
        }
        writeln!(f, "Pre-reaction chains: {}", config.pre_reactions.len())?;
        for chain in &config.pre_reactions {
            writeln!(f, "  - {}: {}", chain.name, chain.modification)?;
        }
        writeln!(f, "Reaction chains: {}", config.reactions.len())?;
        for chain in &config.reactions {
            writeln!(f, "  - {}: {}", chain.name, chain.modification)?;
        }
        match config.max_iterations {
            Some(limit) => writeln!(f, "Iteration budget: {} passes per phase", limit),
            None => writeln!(f, "Iteration budget: unbounded"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use complexgen::core::models::entity::ChemicalEntity;
    use complexgen::core::models::site::BindingSite;
    use complexgen::engine::config::GenerationConfigBuilder;
    use complexgen::engine::modification::ComplexEntityModification;
    use complexgen::engine::progress::ProgressReporter;
    use complexgen::engine::reactor::ReactionChain;
    use complexgen::workflows;

    fn dimer_config() -> GenerationConfig {
        let a = ChemicalEntity::new("Protein");
        let b = ChemicalEntity::new("SmallMolecule");
        GenerationConfigBuilder::new()
            .entity(a.clone())
            .reaction(ReactionChain::new(
                "complexation",
                ComplexEntityModification::Bind {
                    site: BindingSite::for_pair(&a, &b),
                },
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn generation_report_lists_species_and_reactions() {
        let result = workflows::generate::run(&dimer_config(), &ProgressReporter::new()).unwrap();
        let report = render_generation(&result);

        assert!(report.starts_with("# Species (3)"));
        assert!(report.contains("Protein:SmallMolecule  [parts: 2, bonds: 1]"));
        assert!(report.contains("## complexation (Bind at Protein-SmallMolecule): 1 element(s)"));
        assert!(report.contains(" + "));
        assert!(report.contains(" -> Protein:SmallMolecule"));
        assert!(!report.contains("# Pre-reactions"));
        assert!(report.ends_with('\n'));
    }

    #[test]
    fn check_report_summarizes_configuration() {
        let report = render_check(&dimer_config());

        assert!(report.contains("Declared entities: 1"));
        assert!(report.contains("Binding sites in use: 1"));
        assert!(report.contains("Protein-SmallMolecule (Protein:SmallMolecule)"));
        assert!(report.contains("  - complexation: Bind at Protein-SmallMolecule"));
        assert!(report.contains("Iteration budget: 1000 passes per phase"));
    }

    #[test]
    fn check_report_marks_unbounded_budget() {
        let mut config = dimer_config();
        config.max_iterations = None;
        let report = render_check(&config);

        assert!(report.ends_with("Iteration budget: unbounded\n"));
        assert!(report.contains("Pre-reaction chains: 0"));
    }
}
