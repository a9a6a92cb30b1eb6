use std::collections::HashSet;

use crate::annotations::{Annotation, AnnotationStore};

use super::{Edge, Node, NodeStyle, ROOT_ORDER_KEY};

/// One node per annotation (code first, then text) and one edge per listed
/// reference, repeats included. Nothing is validated here.
pub fn build_nodes_and_edges(store: &AnnotationStore) -> (Vec<Node>, Vec<Edge>) {
    let nodes = store
        .iter()
        .enumerate()
        .map(|(registration, annotation)| make_node(annotation, registration))
        .collect::<Vec<_>>();

    let edges = store
        .text_annotations()
        .iter()
        .flat_map(|annotation| {
            annotation.references.iter().map(|reference| Edge {
                from: annotation.id.clone(),
                to: reference.clone(),
            })
        })
        .collect::<Vec<_>>();

    (nodes, edges)
}

fn make_node(annotation: Annotation<'_>, registration: usize) -> Node {
    let style = match annotation {
        Annotation::Code(_) => NodeStyle::Code,
        Annotation::Text(_) => NodeStyle::Text,
    };

    Node {
        id: annotation.id().to_owned(),
        label: format!("{}\n{}", annotation.id(), annotation.title()),
        style,
        order_key: ROOT_ORDER_KEY.to_owned(),
        connected: annotation
            .connected()
            .map(|ids| ids.iter().cloned().collect::<HashSet<_>>()),
        registration,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::annotations::fixtures::{code, store, text};

    #[test]
    fn one_node_per_annotation_in_collection_order() {
        let store = store(
            vec![code("parse", ""), code("emit", "")],
            vec![text("intro", "", &["parse"]), text("usage", "", &[])],
        );
        let (nodes, _) = build_nodes_and_edges(&store);

        assert_eq!(nodes.len(), store.len());
        let ids = nodes.iter().map(|node| node.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["parse", "emit", "intro", "usage"]);
        assert_eq!(nodes[0].style, NodeStyle::Code);
        assert_eq!(nodes[2].style, NodeStyle::Text);
        assert_eq!(nodes[2].label, "intro\nintro title");
        assert!(nodes.iter().all(|node| node.order_key == ROOT_ORDER_KEY));
    }

    #[test]
    fn repeated_references_produce_repeated_edges() {
        let store = store(
            vec![code("impl", "")],
            vec![text("doc", "", &["impl", "impl", "other"]), text("other", "", &[])],
        );
        let (_, edges) = build_nodes_and_edges(&store);

        let to_impl = edges
            .iter()
            .filter(|edge| edge.from == "doc" && edge.to == "impl")
            .count();
        assert_eq!(to_impl, 2);
        assert_eq!(edges.len(), 3);
    }

    #[test]
    fn dangling_targets_are_kept_as_edges() {
        let store = store(vec![], vec![text("doc", "", &["ghost"])]);
        let (nodes, edges) = build_nodes_and_edges(&store);

        assert_eq!(nodes.len(), 1);
        assert_eq!(
            edges,
            vec![Edge {
                from: "doc".to_owned(),
                to: "ghost".to_owned()
            }]
        );
    }

    #[test]
    fn connectivity_sets_are_carried_through() {
        let mut annotation = text("doc", "", &[]);
        annotation.connected = Some(vec!["doc".to_owned(), "impl".to_owned()]);
        let store = store(vec![code("impl", "")], vec![annotation]);
        let (nodes, _) = build_nodes_and_edges(&store);

        assert!(nodes[0].connected.is_none());
        let connected = nodes[1].connected.as_ref().expect("connectivity carried");
        assert!(connected.contains("impl"));
        assert_eq!(connected.len(), 2);
    }
}
