use super::entity::ChemicalEntity;
use super::ids::NodeId;
use super::signature::{Signature, canonical_signature};
use super::site::BindingSite;
use slotmap::{SecondaryMap, SlotMap};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single part of a complex: one chemical entity and the binding sites it exposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    entity: ChemicalEntity,
    sites: BTreeSet<BindingSite>,
}

impl Node {
    pub(crate) fn new(entity: ChemicalEntity, sites: BTreeSet<BindingSite>) -> Self {
        Self { entity, sites }
    }

    pub fn entity(&self) -> &ChemicalEntity {
        &self.entity
    }

    /// The sites assigned to this part when it was created, occupied or not.
    pub fn sites(&self) -> &BTreeSet<BindingSite> {
        &self.sites
    }

    pub fn has_site(&self, site: &BindingSite) -> bool {
        self.sites.contains(site)
    }
}

/// A connection between two parts, occupying one binding site on each of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    a: NodeId,
    b: NodeId,
    site: BindingSite,
}

impl Edge {
    pub(crate) fn new(a: NodeId, b: NodeId, site: BindingSite) -> Self {
        Self { a, b, site }
    }

    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.a, self.b)
    }

    pub fn site(&self) -> &BindingSite {
        &self.site
    }

    pub fn touches(&self, node: NodeId) -> bool {
        self.a == node || self.b == node
    }

    /// Returns the endpoint opposite to `node`, if `node` is an endpoint.
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        if self.a == node {
            Some(self.b)
        } else if self.b == node {
            Some(self.a)
        } else {
            None
        }
    }
}

/// An assembly of chemical entities joined at binding sites.
///
/// A complex is an immutable, connected graph whose nodes each wrap one
/// [`ChemicalEntity`] and whose edges each occupy one [`BindingSite`]. Because every
/// mutator either joins two disjoint complexes with a single edge or attaches a
/// single leaf, complexes are always trees.
///
/// Equality and hashing are structural: two complexes are equal exactly when their
/// labeled graphs are isomorphic, which is decided by comparing cached canonical
/// [`Signature`]s. All mutators are non-destructive and return new complexes; the
/// receiver is never altered.
#[derive(Debug, Clone)]
pub struct ComplexEntity {
    nodes: SlotMap<NodeId, Node>,
    edges: Vec<Edge>,
    signature: Signature,
}

impl ComplexEntity {
    fn assemble(nodes: SlotMap<NodeId, Node>, edges: Vec<Edge>) -> Self {
        let signature = canonical_signature(&nodes, &edges);
        Self {
            nodes,
            edges,
            signature,
        }
    }

    /// Builds a minimal complex holding one free entity that exposes `sites`.
    pub fn from_entity(
        entity: ChemicalEntity,
        sites: impl IntoIterator<Item = BindingSite>,
    ) -> Self {
        let mut nodes = SlotMap::with_key();
        nodes.insert(Node::new(entity, sites.into_iter().collect()));
        Self::assemble(nodes, Vec::new())
    }

    /// Builds a minimal complex holding one free entity without any binding sites.
    pub fn of(entity: ChemicalEntity) -> Self {
        Self::from_entity(entity, std::iter::empty())
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn entities(&self) -> impl Iterator<Item = &ChemicalEntity> {
        self.nodes.values().map(Node::entity)
    }

    /// Finds the first part holding `entity`.
    pub fn find(&self, entity: &ChemicalEntity) -> Option<(NodeId, &Node)> {
        self.nodes.iter().find(|(_, node)| node.entity == *entity)
    }

    pub fn count_parts(&self, entity: &ChemicalEntity) -> usize {
        self.entities().filter(|e| *e == entity).count()
    }

    pub fn contains_entity(&self, entity: &ChemicalEntity) -> bool {
        self.find(entity).is_some()
    }

    /// Returns the number of edges incident to `node`.
    pub fn degree(&self, node: NodeId) -> usize {
        self.edges.iter().filter(|edge| edge.touches(node)).count()
    }

    /// Iterates over the parts bound to `node`, together with the site joining them.
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, &BindingSite)> {
        self.edges
            .iter()
            .filter_map(move |edge| edge.other(node).map(|other| (other, &edge.site)))
    }

    /// Returns `true` if `site` on `node` is taken by an edge.
    pub fn is_occupied(&self, node: NodeId, site: &BindingSite) -> bool {
        self.edges
            .iter()
            .any(|edge| edge.site == *site && edge.touches(node))
    }

    /// Returns `true` if any edge of the complex occupies `site`.
    pub fn is_site_occupied(&self, site: &BindingSite) -> bool {
        self.edges.iter().any(|edge| edge.site == *site)
    }

    /// Returns `true` if any part exposes `site` without it being taken.
    pub fn has_unoccupied_site(&self, site: &BindingSite) -> bool {
        self.open_nodes(site).next().is_some()
    }

    /// The distinct sites currently occupied by edges.
    pub fn occupied_sites(&self) -> BTreeSet<&BindingSite> {
        self.edges.iter().map(|edge| &edge.site).collect()
    }

    /// The distinct sites exposed by any part, occupied or not.
    pub fn sites(&self) -> BTreeSet<&BindingSite> {
        self.nodes.values().flat_map(|node| node.sites.iter()).collect()
    }

    /// Iterates over the free sites of `node`.
    pub fn free_sites(&self, node: NodeId) -> impl Iterator<Item = &BindingSite> {
        self.nodes
            .get(node)
            .into_iter()
            .flat_map(|n| n.sites.iter())
            .filter(move |site| !self.is_occupied(node, site))
    }

    fn open_nodes<'a>(
        &'a self,
        site: &'a BindingSite,
    ) -> impl Iterator<Item = (NodeId, &'a Node)> + 'a {
        self.nodes
            .iter()
            .filter(move |(id, node)| node.has_site(site) && !self.is_occupied(*id, site))
    }

    fn bind_points<'a>(
        &'a self,
        other: &'a ComplexEntity,
        site: &'a BindingSite,
    ) -> impl Iterator<Item = (NodeId, NodeId)> + 'a {
        self.open_nodes(site).flat_map(move |(left, left_node)| {
            let partner = site.partner_of(&left_node.entity);
            other
                .open_nodes(site)
                .filter(move |(_, right_node)| partner == Some(&right_node.entity))
                .map(move |(right, _)| (left, right))
        })
    }

    fn join(
        &self,
        left: NodeId,
        other: &ComplexEntity,
        right: NodeId,
        site: &BindingSite,
    ) -> ComplexEntity {
        let mut nodes = self.nodes.clone();
        let mut edges = self.edges.clone();

        let mut remap: SecondaryMap<NodeId, NodeId> = SecondaryMap::new();
        for (id, node) in other.nodes.iter() {
            remap.insert(id, nodes.insert(node.clone()));
        }
        edges.extend(
            other
                .edges
                .iter()
                .map(|edge| Edge::new(remap[edge.a], remap[edge.b], edge.site.clone())),
        );
        edges.push(Edge::new(left, remap[right], site.clone()));

        Self::assemble(nodes, edges)
    }

    /// Joins `self` and `other` at `site`.
    ///
    /// Succeeds only if both complexes expose a free instance of `site` on parts
    /// that fill its two slots. Returns `None` when no such pair of parts exists,
    /// which callers treat as "no reaction".
    pub fn bind(&self, other: &ComplexEntity, site: &BindingSite) -> Option<ComplexEntity> {
        self.bind_points(other, site)
            .next()
            .map(|(left, right)| self.join(left, other, right, site))
    }

    /// Returns every structurally distinct complex obtainable by joining `self` and
    /// `other` at `site`.
    pub fn bind_all(&self, other: &ComplexEntity, site: &BindingSite) -> Vec<ComplexEntity> {
        distinct(
            self.bind_points(other, site)
                .map(|(left, right)| self.join(left, other, right, site)),
        )
    }

    /// Collects the parts reachable from `start` without crossing the edge at `skip`.
    fn component(&self, start: NodeId, skip: usize) -> HashSet<NodeId> {
        let mut seen = HashSet::from([start]);
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            for (i, edge) in self.edges.iter().enumerate() {
                if i == skip {
                    continue;
                }
                if let Some(next) = edge.other(current) {
                    if seen.insert(next) {
                        stack.push(next);
                    }
                }
            }
        }
        seen
    }

    /// Copies the parts in `members` and the edges among them into a new complex.
    fn subgraph(&self, members: &HashSet<NodeId>) -> ComplexEntity {
        let mut nodes = SlotMap::with_key();
        let mut remap: SecondaryMap<NodeId, NodeId> = SecondaryMap::new();
        for (id, node) in self.nodes.iter() {
            if members.contains(&id) {
                remap.insert(id, nodes.insert(node.clone()));
            }
        }
        let edges = self
            .edges
            .iter()
            .filter(|edge| members.contains(&edge.a) && members.contains(&edge.b))
            .map(|edge| Edge::new(remap[edge.a], remap[edge.b], edge.site.clone()))
            .collect();
        Self::assemble(nodes, edges)
    }

    fn split(&self, edge_index: usize) -> (ComplexEntity, ComplexEntity) {
        let edge = &self.edges[edge_index];
        let left = self.component(edge.a, edge_index);
        let right = self.component(edge.b, edge_index);
        (self.subgraph(&left), self.subgraph(&right))
    }

    /// Splits the complex at the first edge occupying `site`.
    ///
    /// Returns the two connected components, the first one containing the edge's
    /// first endpoint, or `None` if no edge occupies `site`.
    pub fn unbind(&self, site: &BindingSite) -> Option<(ComplexEntity, ComplexEntity)> {
        self.edges
            .iter()
            .position(|edge| edge.site == *site)
            .map(|index| self.split(index))
    }

    /// Returns every structurally distinct split of the complex at an edge
    /// occupying `site`.
    pub fn unbind_all(&self, site: &BindingSite) -> Vec<(ComplexEntity, ComplexEntity)> {
        let mut seen = HashSet::new();
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, edge)| edge.site == *site)
            .map(|(index, _)| self.split(index))
            .filter(|(left, right)| {
                let key = if left.signature <= right.signature {
                    (left.signature.clone(), right.signature.clone())
                } else {
                    (right.signature.clone(), left.signature.clone())
                };
                seen.insert(key)
            })
            .collect()
    }

    fn attach_points<'a>(
        &'a self,
        entity: &'a ChemicalEntity,
        site: &'a BindingSite,
    ) -> impl Iterator<Item = NodeId> + 'a {
        let partner = site.partner_of(entity);
        self.open_nodes(site)
            .filter(move |(_, node)| partner == Some(&node.entity))
            .map(|(id, _)| id)
    }

    fn attach(
        &self,
        anchor: NodeId,
        entity: &ChemicalEntity,
        site: &BindingSite,
        exposes: &BTreeSet<BindingSite>,
    ) -> Self {
        let mut nodes = self.nodes.clone();
        let mut edges = self.edges.clone();
        let sites = exposes.iter().cloned().chain([site.clone()]).collect();
        let leaf = nodes.insert(Node::new(entity.clone(), sites));
        edges.push(Edge::new(anchor, leaf, site.clone()));
        Self::assemble(nodes, edges)
    }

    /// Attaches a new part holding `entity` to a free instance of `site`.
    ///
    /// The new part exposes `site` only. Returns `None` if no part of the complex
    /// offers `site` for `entity`.
    pub fn add(&self, entity: &ChemicalEntity, site: &BindingSite) -> Option<ComplexEntity> {
        self.add_exposing(entity, site, &BTreeSet::new())
    }

    /// Like [`add`](Self::add), but the new part also exposes `exposes`.
    ///
    /// Passing the site set of a seeded `entity` makes the result equal to binding
    /// that seed at `site`.
    pub fn add_exposing(
        &self,
        entity: &ChemicalEntity,
        site: &BindingSite,
        exposes: &BTreeSet<BindingSite>,
    ) -> Option<ComplexEntity> {
        self.attach_points(entity, site)
            .next()
            .map(|anchor| self.attach(anchor, entity, site, exposes))
    }

    /// Returns every structurally distinct result of attaching `entity` at `site`.
    pub fn add_all(&self, entity: &ChemicalEntity, site: &BindingSite) -> Vec<ComplexEntity> {
        self.add_all_exposing(entity, site, &BTreeSet::new())
    }

    pub fn add_all_exposing(
        &self,
        entity: &ChemicalEntity,
        site: &BindingSite,
        exposes: &BTreeSet<BindingSite>,
    ) -> Vec<ComplexEntity> {
        distinct(
            self.attach_points(entity, site)
                .map(|anchor| self.attach(anchor, entity, site, exposes)),
        )
    }

    fn detach_points<'a>(
        &'a self,
        entity: &'a ChemicalEntity,
        site: &'a BindingSite,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.edges
            .iter()
            .filter(move |edge| edge.site == *site)
            .flat_map(|edge| [edge.a, edge.b])
            .filter(move |&id| self.nodes[id].entity == *entity && self.degree(id) == 1)
    }

    fn detach(&self, leaf: NodeId) -> ComplexEntity {
        let members: HashSet<NodeId> = self.nodes.keys().filter(|&id| id != leaf).collect();
        self.subgraph(&members)
    }

    /// Detaches a part holding `entity` that is bound to the rest of the complex
    /// through `site` only.
    ///
    /// Returns the remaining complex, or `None` if no such part exists.
    pub fn remove(&self, entity: &ChemicalEntity, site: &BindingSite) -> Option<ComplexEntity> {
        self.detach_points(entity, site)
            .next()
            .map(|leaf| self.detach(leaf))
    }

    /// Returns every structurally distinct result of detaching `entity` at `site`.
    pub fn remove_all(&self, entity: &ChemicalEntity, site: &BindingSite) -> Vec<ComplexEntity> {
        distinct(self.detach_points(entity, site).map(|leaf| self.detach(leaf)))
    }
}

fn distinct(complexes: impl Iterator<Item = ComplexEntity>) -> Vec<ComplexEntity> {
    let mut seen = HashSet::new();
    complexes
        .filter(|complex| seen.insert(complex.signature.clone()))
        .collect()
}

impl PartialEq for ComplexEntity {
    fn eq(&self, other: &Self) -> bool {
        self.signature == other.signature
    }
}

impl Eq for ComplexEntity {}

impl Hash for ComplexEntity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.signature.hash(state);
    }
}

impl PartialOrd for ComplexEntity {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ComplexEntity {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.signature.cmp(&other.signature)
    }
}

/// Renders the composition, e.g. `Protein:SmallMolecule`. Isomers share a
/// rendering; use [`ComplexEntity::signature`] to tell them apart.
impl fmt::Display for ComplexEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut identifiers: Vec<&str> = self.entities().map(|e| e.identifier()).collect();
        identifiers.sort_unstable();
        write!(f, "{}", identifiers.join(":"))
    }
}
