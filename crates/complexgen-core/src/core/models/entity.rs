use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A molecular species taking part in complex formation.
///
/// Entities are identified solely by their identifier; the optional physical
/// features are carried along for downstream consumers (e.g. a diffusion engine)
/// and take no part in equality, ordering, or hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChemicalEntity {
    /// The globally unique identifier (name or accession) of the entity.
    #[serde(rename = "id")]
    pub identifier: String,
    /// Molar mass in g/mol, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass: Option<f64>,
    /// Diffusivity in m^2/s, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diffusivity: Option<f64>,
}

impl ChemicalEntity {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            mass: None,
            diffusivity: None,
        }
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn with_diffusivity(mut self, diffusivity: f64) -> Self {
        self.diffusivity = Some(diffusivity);
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl PartialEq for ChemicalEntity {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }
}

impl Eq for ChemicalEntity {}

impl Hash for ChemicalEntity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
    }
}

impl PartialOrd for ChemicalEntity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ChemicalEntity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identifier.cmp(&other.identifier)
    }
}

impl fmt::Display for ChemicalEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn equality_ignores_physical_features() {
        let plain = ChemicalEntity::new("ATP");
        let featured = ChemicalEntity::new("ATP")
            .with_mass(507.18)
            .with_diffusivity(3.0e-10);
        assert_eq!(plain, featured);

        let mut set = HashSet::new();
        set.insert(plain);
        assert!(!set.insert(featured));
    }

    #[test]
    fn ordering_follows_identifier() {
        let a = ChemicalEntity::new("Actin");
        let b = ChemicalEntity::new("Myosin").with_mass(1.0);
        assert!(a < b);
        assert_eq!(a.cmp(&a.clone()), Ordering::Equal);
    }

    #[test]
    fn deserializes_from_toml_with_optional_features() {
        #[derive(Deserialize)]
        struct Doc {
            entities: Vec<ChemicalEntity>,
        }
        let doc: Doc = toml::from_str(
            r#"
            [[entities]]
            id = "Protein"
            mass = 50000.0

            [[entities]]
            id = "Ligand"
            "#,
        )
        .unwrap();
        assert_eq!(doc.entities.len(), 2);
        assert_eq!(doc.entities[0].mass, Some(50000.0));
        assert_eq!(doc.entities[1].identifier(), "Ligand");
        assert!(doc.entities[1].diffusivity.is_none());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<ChemicalEntity, _> = toml::from_str("id = \"X\"\ncharge = 1.0");
        assert!(result.is_err());
    }
}
