use crate::cli::GenerateArgs;
use crate::error::{CliError, Result};
use complexgen::core::conditions::CandidateCondition;
use complexgen::core::models::entity::ChemicalEntity;
use complexgen::core::models::site::BindingSite;
use complexgen::engine::config::{self as core_config, GenerationConfig, GenerationConfigBuilder};
use complexgen::engine::modification::ComplexEntityModification;
use complexgen::engine::reactor::ReactionChain;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
struct PartialBindingSite {
    id: Option<String>,
    entities: [String; 2],
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
enum PartialModificationKind {
    Add,
    Bind,
    Release,
    Remove,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case", tag = "type", deny_unknown_fields)]
enum PartialCondition {
    HasAny { entity: String },
    HasNone { entity: String },
    HasExactly { entity: String, count: usize },
    HasOccupiedSite { site: String },
    HasUnoccupiedSite { site: String },
    IsBoundOnlyAt { site: String },
    HasAtMostPartners { entity: String, limit: usize },
    Not { condition: Box<PartialCondition> },
    All { conditions: Vec<PartialCondition> },
    Any { conditions: Vec<PartialCondition> },
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
struct PartialReaction {
    name: String,
    #[serde(rename = "type")]
    kind: PartialModificationKind,
    site: String,
    entity: Option<String>,
    #[serde(default)]
    conditions: Vec<PartialCondition>,
    #[serde(rename = "partner-conditions", default)]
    partner_conditions: Vec<PartialCondition>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialGenerationSettings {
    #[serde(rename = "max-iterations")]
    max_iterations: Option<usize>,
}

/// A rule file as written on disk, before names are resolved to entities and sites.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialRuleFile {
    #[serde(default)]
    entities: Vec<ChemicalEntity>,
    #[serde(rename = "binding-sites", default)]
    binding_sites: Vec<PartialBindingSite>,
    #[serde(rename = "pre-reactions", default)]
    pre_reactions: Vec<PartialReaction>,
    #[serde(default)]
    reactions: Vec<PartialReaction>,
    generation: Option<PartialGenerationSettings>,
}

/// Name tables built from the rule file's entity and site declarations.
struct Symbols {
    entities: HashMap<String, ChemicalEntity>,
    sites: HashMap<String, BindingSite>,
}

impl Symbols {
    fn entity(&self, id: &str, context: &str) -> Result<ChemicalEntity> {
        self.entities.get(id).cloned().ok_or_else(|| {
            CliError::Config(format!("{} refers to unknown entity '{}'", context, id))
        })
    }

    fn site(&self, id: &str, context: &str) -> Result<BindingSite> {
        self.sites.get(id).cloned().ok_or_else(|| {
            CliError::Config(format!("{} refers to unknown binding site '{}'", context, id))
        })
    }

    fn condition(&self, partial: PartialCondition, context: &str) -> Result<CandidateCondition> {
        Ok(match partial {
            PartialCondition::HasAny { entity } => {
                CandidateCondition::HasAny(self.entity(&entity, context)?)
            }
            PartialCondition::HasNone { entity } => {
                CandidateCondition::HasNone(self.entity(&entity, context)?)
            }
            PartialCondition::HasExactly { entity, count } => CandidateCondition::HasExactly {
                entity: self.entity(&entity, context)?,
                count,
            },
            PartialCondition::HasOccupiedSite { site } => {
                CandidateCondition::HasOccupiedSite(self.site(&site, context)?)
            }
            PartialCondition::HasUnoccupiedSite { site } => {
                CandidateCondition::HasUnoccupiedSite(self.site(&site, context)?)
            }
            PartialCondition::IsBoundOnlyAt { site } => {
                CandidateCondition::IsBoundOnlyAt(self.site(&site, context)?)
            }
            PartialCondition::HasAtMostPartners { entity, limit } => {
                CandidateCondition::HasAtMostPartners {
                    entity: self.entity(&entity, context)?,
                    limit,
                }
            }
            PartialCondition::Not { condition } => {
                self.condition(*condition, context)?.negate()
            }
            PartialCondition::All { conditions } => {
                CandidateCondition::All(self.conditions(conditions, context)?)
            }
            PartialCondition::Any { conditions } => {
                CandidateCondition::Any(self.conditions(conditions, context)?)
            }
        })
    }

    fn conditions(
        &self,
        partials: Vec<PartialCondition>,
        context: &str,
    ) -> Result<Vec<CandidateCondition>> {
        partials
            .into_iter()
            .map(|partial| self.condition(partial, context))
            .collect()
    }

    fn chain(&self, partial: PartialReaction) -> Result<ReactionChain> {
        let context = format!("Reaction '{}'", partial.name);
        let site = self.site(&partial.site, &context)?;

        let modification = match (partial.kind, partial.entity.as_deref()) {
            (PartialModificationKind::Add, Some(entity)) => {
                ComplexEntityModification::add(self.entity(entity, &context)?, site)
            }
            (PartialModificationKind::Remove, Some(entity)) => {
                ComplexEntityModification::Remove {
                    entity: self.entity(entity, &context)?,
                    site,
                }
            }
            (PartialModificationKind::Bind, None) => ComplexEntityModification::Bind { site },
            (PartialModificationKind::Release, None) => {
                ComplexEntityModification::Release { site }
            }
            (PartialModificationKind::Add | PartialModificationKind::Remove, None) => {
                return Err(CliError::Config(format!(
                    "{} needs an 'entity' to move",
                    context
                )));
            }
            (PartialModificationKind::Bind | PartialModificationKind::Release, Some(_)) => {
                return Err(CliError::Config(format!(
                    "{} does not take an 'entity'",
                    context
                )));
            }
        };

        let mut chain = ReactionChain::new(partial.name, modification);
        chain.conditions = self.conditions(partial.conditions, &context)?;
        chain.partner_conditions = self.conditions(partial.partner_conditions, &context)?;
        Ok(chain)
    }
}

impl PartialRuleFile {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading rule file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Resolves the rule file alone, with no command-line overrides.
    pub fn into_config(self) -> Result<GenerationConfig> {
        let max_iterations = self.file_max_iterations();
        self.into_builder(true)?
            .max_iterations(Some(max_iterations))
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    pub fn merge_with_cli(self, args: &GenerateArgs) -> Result<GenerationConfig> {
        let max_iterations = if args.unbounded {
            None
        } else {
            Some(args.max_iterations.unwrap_or(self.file_max_iterations()))
        };
        debug!(?max_iterations, "Resolved iteration budget.");

        self.into_builder(!args.no_pre_reactions)?
            .max_iterations(max_iterations)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    fn file_max_iterations(&self) -> usize {
        self.generation
            .as_ref()
            .and_then(|g| g.max_iterations)
            .unwrap_or(core_config::DEFAULT_MAX_ITERATIONS)
    }

    fn into_builder(self, include_pre_reactions: bool) -> Result<GenerationConfigBuilder> {
        let symbols = Self::symbols(&self.entities, &self.binding_sites)?;

        let mut builder = GenerationConfigBuilder::new().entities(self.entities);
        if include_pre_reactions {
            for partial in self.pre_reactions {
                builder = builder.pre_reaction(symbols.chain(partial)?);
            }
        }
        for partial in self.reactions {
            builder = builder.reaction(symbols.chain(partial)?);
        }
        Ok(builder)
    }

    fn symbols(
        declared: &[ChemicalEntity],
        binding_sites: &[PartialBindingSite],
    ) -> Result<Symbols> {
        let mut entities = HashMap::new();
        for entity in declared {
            if entities
                .insert(entity.identifier().to_string(), entity.clone())
                .is_some()
            {
                return Err(CliError::Config(format!(
                    "Entity '{}' is declared more than once",
                    entity
                )));
            }
        }

        let mut sites = HashMap::new();
        for partial in binding_sites {
            let [first, second] = &partial.entities;
            let first = entities
                .entry(first.clone())
                .or_insert_with(|| ChemicalEntity::new(first.as_str()))
                .clone();
            let second = entities
                .entry(second.clone())
                .or_insert_with(|| ChemicalEntity::new(second.as_str()))
                .clone();

            let site = match &partial.id {
                Some(id) => BindingSite::named(id.as_str(), &first, &second),
                None => BindingSite::for_pair(&first, &second),
            };
            let id = site.name().to_string();
            if sites.insert(id.clone(), site).is_some() {
                return Err(CliError::Config(format!(
                    "Binding site '{}' is declared more than once",
                    id
                )));
            }
        }

        Ok(Symbols { entities, sites })
    }
}
