use std::collections::{HashMap, HashSet};

use crate::annotations::AnnotationStore;

mod build;
mod cluster;
mod order;

pub use build::build_nodes_and_edges;
pub use cluster::{ClusterId, NodeGroup};
pub use order::{ROOT_ORDER_KEY, assign_order_keys};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeStyle {
    /// Warm palette.
    Code,
    /// Cool palette.
    Text,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub style: NodeStyle,
    pub order_key: String,
    pub connected: Option<HashSet<String>>,
    /// Position in collection order, used to resolve duplicate ids.
    pub registration: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

/// Ids reported by one click on the rendered graph.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClickEvent {
    pub nodes: Vec<String>,
}

impl ClickEvent {
    pub fn new<I, S>(nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            nodes: nodes.into_iter().map(Into::into).collect(),
        }
    }
}

/// The rendering-engine capabilities the session controllers drive.
pub trait GroupingEngine {
    fn nodes(&self) -> &[Node];

    fn contains_node(&self, id: &str) -> bool {
        self.nodes().iter().any(|node| node.id == id)
    }

    /// Collapses every ungrouped node for which `keep` returns false into one
    /// synthetic group. Returns `None` when nothing was collapsed.
    fn cluster(&mut self, keep: &dyn Fn(&Node) -> bool) -> Option<ClusterId>;

    fn cluster_ids(&self) -> Vec<ClusterId>;

    /// Expands a group back into its members. Returns false for unknown ids.
    fn open_cluster(&mut self, id: ClusterId) -> bool;

    fn highlight(&mut self, id: &str) -> bool;

    fn unselect_all(&mut self);
}

/// Node and edge tables for one session plus the grouping bookkeeping.
#[derive(Clone, Debug)]
pub struct GraphModel {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index_by_id: HashMap<String, usize>,
    membership: Vec<Option<ClusterId>>,
    groups: Vec<NodeGroup>,
    next_group: ClusterId,
    highlighted: Option<usize>,
}

impl GraphModel {
    pub fn new(store: &AnnotationStore) -> Self {
        let (mut nodes, edges) = build_nodes_and_edges(store);
        assign_order_keys(&mut nodes, &edges);
        Self::from_parts(nodes, edges)
    }

    pub(crate) fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        let index_by_id = index_nodes(&nodes);
        let membership = vec![None; nodes.len()];

        Self {
            nodes,
            edges,
            index_by_id,
            membership,
            groups: Vec::new(),
            next_group: 0,
            highlighted: None,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index_of(id).and_then(|index| self.nodes.get(index))
    }

    pub fn highlighted(&self) -> Option<&Node> {
        self.highlighted.and_then(|index| self.nodes.get(index))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Maps each id to the node its annotation lookup resolves to: a text node
/// beats a code node, otherwise the first-registered node wins.
pub(crate) fn index_nodes(nodes: &[Node]) -> HashMap<String, usize> {
    let mut index_by_id: HashMap<String, usize> = HashMap::with_capacity(nodes.len());
    for (index, node) in nodes.iter().enumerate() {
        index_by_id
            .entry(node.id.clone())
            .and_modify(|existing| {
                if resolves_before(node, &nodes[*existing]) {
                    *existing = index;
                }
            })
            .or_insert(index);
    }
    index_by_id
}

fn resolves_before(candidate: &Node, existing: &Node) -> bool {
    match (candidate.style, existing.style) {
        (NodeStyle::Text, NodeStyle::Code) => true,
        (NodeStyle::Code, NodeStyle::Text) => false,
        _ => candidate.registration < existing.registration,
    }
}
