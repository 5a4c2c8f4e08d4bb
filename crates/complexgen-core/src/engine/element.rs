use crate::core::models::complex::ComplexEntity;
use std::fmt;

/// One elementary reaction: the complexes consumed and the complexes produced by
/// a single application of a modification.
///
/// Substrates and products are multisets kept in canonical order, so two
/// applications that consume and produce the same species compare equal no matter
/// in which order the candidates were offered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReactionElement {
    substrates: Vec<ComplexEntity>,
    products: Vec<ComplexEntity>,
}

impl ReactionElement {
    pub fn new(mut substrates: Vec<ComplexEntity>, mut products: Vec<ComplexEntity>) -> Self {
        substrates.sort_unstable();
        products.sort_unstable();
        Self {
            substrates,
            products,
        }
    }

    pub fn substrates(&self) -> &[ComplexEntity] {
        &self.substrates
    }

    pub fn products(&self) -> &[ComplexEntity] {
        &self.products
    }

    /// Every complex taking part in the reaction, substrates first.
    pub fn participants(&self) -> impl Iterator<Item = &ComplexEntity> {
        self.substrates.iter().chain(self.products.iter())
    }
}

impl fmt::Display for ReactionElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |complexes: &[ComplexEntity]| {
            complexes
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" + ")
        };
        write!(
            f,
            "{} -> {}",
            side(self.substrates.as_slice()),
            side(self.products.as_slice())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::entity::ChemicalEntity;
    use crate::core::models::site::BindingSite;
    use std::collections::HashSet;

    #[test]
    fn substrate_order_does_not_matter() {
        let a = ChemicalEntity::new("A");
        let b = ChemicalEntity::new("B");
        let site = BindingSite::for_pair(&a, &b);
        let first = ComplexEntity::from_entity(a, [site.clone()]);
        let second = ComplexEntity::from_entity(b, [site.clone()]);
        let bound = first.bind(&second, &site).unwrap();

        let forward = ReactionElement::new(
            vec![first.clone(), second.clone()],
            vec![bound.clone()],
        );
        let swapped = ReactionElement::new(vec![second, first], vec![bound]);

        assert_eq!(forward, swapped);
        let set: HashSet<_> = [forward, swapped].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn display_joins_compositions() {
        let a = ChemicalEntity::new("A");
        let b = ChemicalEntity::new("B");
        let site = BindingSite::for_pair(&a, &b);
        let first = ComplexEntity::from_entity(a, [site.clone()]);
        let second = ComplexEntity::from_entity(b, [site.clone()]);
        let bound = first.bind(&second, &site).unwrap();

        let element = ReactionElement::new(vec![bound], vec![first, second]);
        let rendered = element.to_string();
        assert!(rendered.starts_with("A:B -> "));
        assert!(rendered.contains("A + B") || rendered.contains("B + A"));
        assert_eq!(element.participants().count(), 3);
    }
}
