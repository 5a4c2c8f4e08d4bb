use super::models::complex::ComplexEntity;
use super::models::entity::ChemicalEntity;
use super::models::site::BindingSite;

/// A predicate deciding whether a complex may take part in a rule.
///
/// Conditions are pure: they only inspect the complex they are given. The
/// `concerns_*` queries tell the engine which entities and sites a condition looks
/// at, which is used to relate newly discovered complexes to the rules they may
/// affect.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateCondition {
    /// The complex contains at least one part of the entity.
    HasAny(ChemicalEntity),
    /// The complex contains no part of the entity.
    HasNone(ChemicalEntity),
    /// The complex contains exactly `count` parts of the entity.
    HasExactly {
        entity: ChemicalEntity,
        count: usize,
    },
    /// Some edge of the complex occupies the site.
    HasOccupiedSite(BindingSite),
    /// Some part of the complex exposes the site without it being taken.
    HasUnoccupiedSite(BindingSite),
    /// The complex is bound somewhere, and only ever at the site.
    IsBoundOnlyAt(BindingSite),
    /// The complex holds no more than `limit` parts of the entity.
    HasAtMostPartners {
        entity: ChemicalEntity,
        limit: usize,
    },
    Not(Box<CandidateCondition>),
    All(Vec<CandidateCondition>),
    Any(Vec<CandidateCondition>),
}

impl CandidateCondition {
    pub fn test(&self, complex: &ComplexEntity) -> bool {
        match self {
            Self::HasAny(entity) => complex.contains_entity(entity),
            Self::HasNone(entity) => !complex.contains_entity(entity),
            Self::HasExactly { entity, count } => complex.count_parts(entity) == *count,
            Self::HasOccupiedSite(site) => complex.is_site_occupied(site),
            Self::HasUnoccupiedSite(site) => complex.has_unoccupied_site(site),
            Self::IsBoundOnlyAt(site) => {
                let occupied = complex.occupied_sites();
                !occupied.is_empty() && occupied.iter().all(|s| *s == site)
            }
            Self::HasAtMostPartners { entity, limit } => complex.count_parts(entity) <= *limit,
            Self::Not(inner) => !inner.test(complex),
            Self::All(conditions) => conditions.iter().all(|c| c.test(complex)),
            Self::Any(conditions) => conditions.iter().any(|c| c.test(complex)),
        }
    }

    pub fn concerns_entity(&self, entity: &ChemicalEntity) -> bool {
        match self {
            Self::HasAny(e) | Self::HasNone(e) => e == entity,
            Self::HasExactly { entity: e, .. } | Self::HasAtMostPartners { entity: e, .. } => {
                e == entity
            }
            Self::HasOccupiedSite(site)
            | Self::HasUnoccupiedSite(site)
            | Self::IsBoundOnlyAt(site) => site.concerns(entity),
            Self::Not(inner) => inner.concerns_entity(entity),
            Self::All(conditions) | Self::Any(conditions) => {
                conditions.iter().any(|c| c.concerns_entity(entity))
            }
        }
    }

    pub fn concerns_site(&self, site: &BindingSite) -> bool {
        match self {
            Self::HasAny(_)
            | Self::HasNone(_)
            | Self::HasExactly { .. }
            | Self::HasAtMostPartners { .. } => false,
            Self::HasOccupiedSite(s) | Self::HasUnoccupiedSite(s) | Self::IsBoundOnlyAt(s) => {
                s == site
            }
            Self::Not(inner) => inner.concerns_site(site),
            Self::All(conditions) | Self::Any(conditions) => {
                conditions.iter().any(|c| c.concerns_site(site))
            }
        }
    }

    /// Returns `true` if the condition looks at any entity or site present in `complex`.
    pub fn concerns(&self, complex: &ComplexEntity) -> bool {
        complex.entities().any(|entity| self.concerns_entity(entity))
            || complex.sites().into_iter().any(|site| self.concerns_site(site))
    }

    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        a: ChemicalEntity,
        b: ChemicalEntity,
        c: ChemicalEntity,
        ab: BindingSite,
        bc: BindingSite,
        a_free: ComplexEntity,
        ab_bound: ComplexEntity,
        abc_bound: ComplexEntity,
    }

    fn fixture() -> Fixture {
        let a = ChemicalEntity::new("A");
        let b = ChemicalEntity::new("B");
        let c = ChemicalEntity::new("C");
        let ab = BindingSite::for_pair(&a, &b);
        let bc = BindingSite::for_pair(&b, &c);

        let a_free = ComplexEntity::from_entity(a.clone(), [ab.clone()]);
        let b_free = ComplexEntity::from_entity(b.clone(), [ab.clone(), bc.clone()]);
        let c_free = ComplexEntity::from_entity(c.clone(), [bc.clone()]);
        let ab_bound = a_free.bind(&b_free, &ab).unwrap();
        let abc_bound = ab_bound.bind(&c_free, &bc).unwrap();

        Fixture {
            a,
            b,
            c,
            ab,
            bc,
            a_free,
            ab_bound,
            abc_bound,
        }
    }

    #[test]
    fn entity_presence_conditions() {
        let f = fixture();
        assert!(CandidateCondition::HasAny(f.b.clone()).test(&f.ab_bound));
        assert!(!CandidateCondition::HasAny(f.c.clone()).test(&f.ab_bound));
        assert!(CandidateCondition::HasNone(f.c.clone()).test(&f.ab_bound));
        assert!(!CandidateCondition::HasNone(f.a.clone()).test(&f.a_free));
    }

    #[test]
    fn counting_conditions() {
        let f = fixture();
        let exactly_one_a = CandidateCondition::HasExactly {
            entity: f.a.clone(),
            count: 1,
        };
        let no_b = CandidateCondition::HasExactly {
            entity: f.b.clone(),
            count: 0,
        };
        let at_most_zero_b = CandidateCondition::HasAtMostPartners {
            entity: f.b.clone(),
            limit: 0,
        };
        assert!(exactly_one_a.test(&f.abc_bound));
        assert!(no_b.test(&f.a_free));
        assert!(!no_b.test(&f.ab_bound));
        assert!(at_most_zero_b.test(&f.a_free));
        assert!(!at_most_zero_b.test(&f.ab_bound));
    }

    #[test]
    fn site_occupancy_conditions() {
        let f = fixture();
        assert!(CandidateCondition::HasOccupiedSite(f.ab.clone()).test(&f.ab_bound));
        assert!(!CandidateCondition::HasOccupiedSite(f.ab.clone()).test(&f.a_free));
        assert!(CandidateCondition::HasUnoccupiedSite(f.ab.clone()).test(&f.a_free));
        assert!(CandidateCondition::HasUnoccupiedSite(f.bc.clone()).test(&f.ab_bound));
        assert!(!CandidateCondition::HasUnoccupiedSite(f.bc.clone()).test(&f.abc_bound));
    }

    #[test]
    fn bound_only_at_requires_some_binding() {
        let f = fixture();
        let only_ab = CandidateCondition::IsBoundOnlyAt(f.ab.clone());
        assert!(!only_ab.test(&f.a_free));
        assert!(only_ab.test(&f.ab_bound));
        assert!(!only_ab.test(&f.abc_bound));
    }

    #[test]
    fn composition_follows_boolean_logic() {
        let f = fixture();
        let has_a = CandidateCondition::HasAny(f.a.clone());
        let has_c = CandidateCondition::HasAny(f.c.clone());

        let both = CandidateCondition::All(vec![has_a.clone(), has_c.clone()]);
        let either = CandidateCondition::Any(vec![has_a.clone(), has_c.clone()]);
        let not_c = has_c.clone().negate();

        assert!(!both.test(&f.ab_bound));
        assert!(both.test(&f.abc_bound));
        assert!(either.test(&f.a_free));
        assert!(not_c.test(&f.ab_bound));
        assert!(CandidateCondition::All(vec![]).test(&f.a_free));
        assert!(!CandidateCondition::Any(vec![]).test(&f.a_free));
    }

    #[test]
    fn concerns_reports_referenced_entities_and_sites() {
        let f = fixture();
        let condition = CandidateCondition::All(vec![
            CandidateCondition::HasNone(f.c.clone()),
            CandidateCondition::HasUnoccupiedSite(f.ab.clone()).negate(),
        ]);
        assert!(condition.concerns_entity(&f.c));
        assert!(condition.concerns_entity(&f.a));
        assert!(condition.concerns_site(&f.ab));
        assert!(!condition.concerns_site(&f.bc));
        assert!(condition.concerns(&f.a_free));

        let about_c = CandidateCondition::HasAny(f.c.clone());
        assert!(!about_c.concerns(&f.ab_bound));
        assert!(about_c.concerns(&f.abc_bound));
    }
}
