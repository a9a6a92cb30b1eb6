use tracing::debug;

use super::{Edge, Node, index_nodes};

pub const ROOT_ORDER_KEY: &str = "0";

/// Derives each node's order key from the edge list, then stably sorts the
/// nodes by key.
///
/// Every edge `(parent, child)` in list order overwrites the child's key with
/// `parent.key + "." + child.id`, so a node with several parents keeps the key
/// of the last edge processed. Keys compare as plain strings: `"0.10"` sorts
/// before `"0.9"`. Both are accepted limitations; the key only seeds a stable
/// default ordering before layout.
pub fn assign_order_keys(nodes: &mut [Node], edges: &[Edge]) {
    for node in nodes.iter_mut() {
        node.order_key = ROOT_ORDER_KEY.to_owned();
    }

    let index_by_id = index_nodes(nodes);

    for edge in edges {
        let (Some(&parent), Some(&child)) = (index_by_id.get(&edge.from), index_by_id.get(&edge.to))
        else {
            debug!(from = %edge.from, to = %edge.to, "skipping edge with unknown endpoint");
            continue;
        };

        let key = format!("{}.{}", nodes[parent].order_key, nodes[child].id);
        nodes[child].order_key = key;
    }

    nodes.sort_by(|a, b| a.order_key.cmp(&b.order_key));
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::graph::NodeStyle;

    fn node(id: &str, registration: usize) -> Node {
        Node {
            id: id.to_owned(),
            label: id.to_owned(),
            style: NodeStyle::Text,
            order_key: String::new(),
            connected: None,
            registration,
        }
    }

    fn edge(from: &str, to: &str) -> Edge {
        Edge {
            from: from.to_owned(),
            to: to.to_owned(),
        }
    }

    fn keys(nodes: &[Node]) -> Vec<(&str, &str)> {
        nodes
            .iter()
            .map(|node| (node.id.as_str(), node.order_key.as_str()))
            .collect()
    }

    #[test]
    fn chain_yields_root_to_leaf_order() {
        let mut nodes = vec![node("C", 0), node("B", 1), node("A", 2)];
        let edges = vec![edge("A", "B"), edge("B", "C")];

        assign_order_keys(&mut nodes, &edges);

        assert_eq!(keys(&nodes), vec![("A", "0"), ("B", "0.B"), ("C", "0.B.C")]);
    }

    #[test]
    fn last_processed_parent_wins() {
        let mut nodes = vec![node("A", 0), node("B", 1), node("C", 2), node("R", 3)];
        let edges = vec![edge("R", "B"), edge("A", "C"), edge("B", "C")];

        assign_order_keys(&mut nodes, &edges);

        let c = nodes.iter().find(|node| node.id == "C").expect("C present");
        assert_eq!(c.order_key, "0.B.C");
    }

    #[test]
    fn parent_key_is_read_when_the_edge_is_processed() {
        let mut nodes = vec![node("A", 0), node("B", 1), node("C", 2)];
        let edges = vec![edge("B", "C"), edge("A", "B")];

        assign_order_keys(&mut nodes, &edges);

        assert_eq!(keys(&nodes), vec![("A", "0"), ("B", "0.B"), ("C", "0.C")]);
    }

    #[test]
    fn keys_sort_lexicographically_not_numerically() {
        let mut nodes = vec![node("r", 0), node("9", 1), node("10", 2)];
        let edges = vec![edge("r", "9"), edge("r", "10")];

        assign_order_keys(&mut nodes, &edges);

        let ids = nodes.iter().map(|node| node.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["r", "10", "9"]);
    }

    #[test]
    fn equal_keys_keep_input_order_and_dangling_edges_are_skipped() {
        let mut nodes = vec![node("x", 0), node("y", 1), node("z", 2)];
        let edges = vec![edge("x", "ghost"), edge("ghost", "y")];

        assign_order_keys(&mut nodes, &edges);

        assert_eq!(keys(&nodes), vec![("x", "0"), ("y", "0"), ("z", "0")]);
    }
}
