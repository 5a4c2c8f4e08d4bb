use super::entity::ChemicalEntity;
use std::fmt;

/// A named attachment point between two kinds of chemical entity.
///
/// The two slots are stored in normalized order, so a site created for `(a, b)`
/// is the same site as one created for `(b, a)`. A site whose slots hold the same
/// entity describes a homotypic contact (e.g. a dimerization interface).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingSite {
    name: String,
    first: ChemicalEntity,
    second: ChemicalEntity,
}

impl BindingSite {
    /// Creates the site between `a` and `b`, named after the two identifiers.
    pub fn for_pair(a: &ChemicalEntity, b: &ChemicalEntity) -> Self {
        let (first, second) = normalize(a, b);
        let name = format!("{}-{}", first.identifier(), second.identifier());
        Self {
            name,
            first,
            second,
        }
    }

    /// Creates an explicitly named site, used when two entities can meet at more
    /// than one distinct site.
    pub fn named(name: impl Into<String>, a: &ChemicalEntity, b: &ChemicalEntity) -> Self {
        let (first, second) = normalize(a, b);
        Self {
            name: name.into(),
            first,
            second,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slots(&self) -> (&ChemicalEntity, &ChemicalEntity) {
        (&self.first, &self.second)
    }

    pub fn is_homotypic(&self) -> bool {
        self.first == self.second
    }

    pub fn concerns(&self, entity: &ChemicalEntity) -> bool {
        self.first == *entity || self.second == *entity
    }

    /// Returns the entity expected on the other side of the site when `entity`
    /// occupies one slot, or `None` if `entity` fits neither slot.
    pub fn partner_of(&self, entity: &ChemicalEntity) -> Option<&ChemicalEntity> {
        if self.first == *entity {
            Some(&self.second)
        } else if self.second == *entity {
            Some(&self.first)
        } else {
            None
        }
    }
}

fn normalize(a: &ChemicalEntity, b: &ChemicalEntity) -> (ChemicalEntity, ChemicalEntity) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

impl fmt::Display for BindingSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}:{})", self.name, self.first, self.second)
    }
}
