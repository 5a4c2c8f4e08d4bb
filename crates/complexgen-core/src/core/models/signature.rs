use super::complex::{Edge, Node};
use super::ids::NodeId;
use super::site::BindingSite;
use slotmap::{SecondaryMap, SlotMap};
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// A structure-invariant key identifying a complex up to isomorphism.
///
/// Two complexes with the same parts connected the same way at the same sites
/// produce the same signature regardless of construction order or node numbering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature(Arc<str>);

impl Signature {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes the canonical signature of a connected, acyclic complex graph.
///
/// Each node is rendered as its label followed by the sorted encodings of its
/// `(edge site, child)` pairs; the unrooted tree is keyed by the smallest of its
/// encodings rooted at a center. Every string is length-prefixed, which keeps the
/// encoding uniquely decodable.
pub(crate) fn canonical_signature(nodes: &SlotMap<NodeId, Node>, edges: &[Edge]) -> Signature {
    let keys: Vec<NodeId> = nodes.keys().collect();
    let mut index: SecondaryMap<NodeId, usize> = SecondaryMap::with_capacity(keys.len());
    for (i, &key) in keys.iter().enumerate() {
        index.insert(key, i);
    }

    let labels: Vec<String> = keys.iter().map(|&key| node_label(&nodes[key])).collect();

    let mut adjacency: Vec<Vec<(usize, String)>> = vec![Vec::new(); keys.len()];
    for edge in edges {
        let (a, b) = edge.endpoints();
        let (ia, ib) = (index[a], index[b]);
        let site = site_label(edge.site());
        adjacency[ia].push((ib, site.clone()));
        adjacency[ib].push((ia, site));
    }

    let encoded = tree_centers(&adjacency)
        .into_iter()
        .map(|root| encode_rooted(root, None, &labels, &adjacency))
        .min()
        .unwrap_or_default();

    Signature(Arc::from(encoded))
}

fn length_prefixed(s: &str) -> String {
    format!("{}:{}", s.len(), s)
}

/// Encodes a site by its name and both slots.
fn site_label(site: &BindingSite) -> String {
    let (first, second) = site.slots();
    format!(
        "{}{}{}",
        length_prefixed(site.name()),
        length_prefixed(first.identifier()),
        length_prefixed(second.identifier())
    )
}

fn node_label(node: &Node) -> String {
    let mut label = String::from("<");
    label.push_str(&length_prefixed(node.entity().identifier()));
    for site in node.sites() {
        label.push('|');
        label.push_str(&site_label(site));
    }
    label.push('>');
    label
}

fn encode_rooted(
    node: usize,
    parent: Option<usize>,
    labels: &[String],
    adjacency: &[Vec<(usize, String)>],
) -> String {
    let mut children: Vec<String> = adjacency[node]
        .iter()
        .filter(|(neighbor, _)| Some(*neighbor) != parent)
        .map(|(neighbor, site)| {
            format!(
                "[{}{}]",
                site,
                encode_rooted(*neighbor, Some(node), labels, adjacency)
            )
        })
        .collect();
    children.sort_unstable();

    let mut out = String::with_capacity(labels[node].len() + 2);
    out.push('(');
    out.push_str(&labels[node]);
    for child in children {
        out.push_str(&child);
    }
    out.push(')');
    out
}

/// Returns the one or two center vertices of a tree by repeatedly peeling leaves.
fn tree_centers(adjacency: &[Vec<(usize, String)>]) -> Vec<usize> {
    let n = adjacency.len();
    if n <= 2 {
        return (0..n).collect();
    }

    let mut degree: Vec<usize> = adjacency.iter().map(Vec::len).collect();
    let mut removed = vec![false; n];
    let mut layer: VecDeque<usize> = (0..n).filter(|&i| degree[i] <= 1).collect();
    let mut remaining = n;

    while remaining > 2 {
        let mut next = VecDeque::new();
        while let Some(leaf) = layer.pop_front() {
            removed[leaf] = true;
            remaining -= 1;
            for (neighbor, _) in &adjacency[leaf] {
                if removed[*neighbor] {
                    continue;
                }
                degree[*neighbor] -= 1;
                if degree[*neighbor] == 1 {
                    next.push_back(*neighbor);
                }
            }
        }
        layer = next;
    }

    (0..n).filter(|&i| !removed[i]).collect()
}
