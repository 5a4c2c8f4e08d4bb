use super::modification::ComplexEntityModification;
use super::reactor::ReactionChain;
use crate::core::models::entity::ChemicalEntity;
use std::collections::HashSet;
use thiserror::Error;

/// Upper bound on fixpoint passes per phase unless configured otherwise.
pub const DEFAULT_MAX_ITERATIONS: usize = 1_000;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    /// Entities declared up front, seeded even if no binding site names them.
    pub entities: Vec<ChemicalEntity>,
    /// Chains run to a fixpoint before the main rule set; their substrates are
    /// replaced by their products afterwards.
    pub pre_reactions: Vec<ReactionChain>,
    pub reactions: Vec<ReactionChain>,
    /// Maximum number of passes per phase; `None` lets a phase run until it converges.
    pub max_iterations: Option<usize>,
}

impl GenerationConfig {
    pub fn chains(&self) -> impl Iterator<Item = &ReactionChain> {
        self.pre_reactions.iter().chain(self.reactions.iter())
    }
}

pub struct GenerationConfigBuilder {
    entities: Vec<ChemicalEntity>,
    pre_reactions: Vec<ReactionChain>,
    reactions: Vec<ReactionChain>,
    max_iterations: Option<usize>,
}

impl Default for GenerationConfigBuilder {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            pre_reactions: Vec::new(),
            reactions: Vec::new(),
            max_iterations: Some(DEFAULT_MAX_ITERATIONS),
        }
    }
}

impl GenerationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entity(mut self, entity: ChemicalEntity) -> Self {
        self.entities.push(entity);
        self
    }
    pub fn entities(mut self, entities: impl IntoIterator<Item = ChemicalEntity>) -> Self {
        self.entities.extend(entities);
        self
    }
    pub fn pre_reaction(mut self, chain: ReactionChain) -> Self {
        self.pre_reactions.push(chain);
        self
    }
    pub fn reaction(mut self, chain: ReactionChain) -> Self {
        self.reactions.push(chain);
        self
    }
    pub fn max_iterations(mut self, limit: Option<usize>) -> Self {
        self.max_iterations = limit;
        self
    }

    pub fn build(self) -> Result<GenerationConfig, ConfigError> {
        if self.pre_reactions.is_empty() && self.reactions.is_empty() {
            return Err(ConfigError::MissingParameter("reactions"));
        }
        if self.max_iterations == Some(0) {
            return Err(ConfigError::InvalidParameter {
                parameter: "max_iterations",
                reason: "must be at least 1".to_string(),
            });
        }

        let mut names = HashSet::new();
        for chain in self.pre_reactions.iter().chain(self.reactions.iter()) {
            if !names.insert(chain.name.as_str()) {
                return Err(ConfigError::InvalidParameter {
                    parameter: "reactions",
                    reason: format!("duplicate chain name '{}'", chain.name),
                });
            }
            validate_modification(&chain.name, &chain.modification)?;
        }

        Ok(GenerationConfig {
            entities: self.entities,
            pre_reactions: self.pre_reactions,
            reactions: self.reactions,
            max_iterations: self.max_iterations,
        })
    }
}

fn validate_modification(
    chain: &str,
    modification: &ComplexEntityModification,
) -> Result<(), ConfigError> {
    match modification {
        ComplexEntityModification::Add { entity, site, .. }
        | ComplexEntityModification::Remove { entity, site } => {
            if site.concerns(entity) {
                Ok(())
            } else {
                Err(ConfigError::InvalidParameter {
                    parameter: "reactions",
                    reason: format!(
                        "chain '{}' moves entity '{}' at site '{}', which does not accept it",
                        chain,
                        entity,
                        site.name()
                    ),
                })
            }
        }
        ComplexEntityModification::Bind { .. } | ComplexEntityModification::Release { .. } => {
            Ok(())
        }
    }
}
