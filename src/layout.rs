use eframe::egui::{Vec2, vec2};

use crate::annotations::{AnnotationDocument, LayoutDirection, ShakeTowards};
use crate::graph::GraphModel;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutOptions {
    pub direction: LayoutDirection,
    pub shake: ShakeTowards,
    pub level_separation: f32,
    pub node_spacing: f32,
}

impl LayoutOptions {
    /// Vertical layouts stack levels tighter and spread nodes wider.
    pub fn new(direction: LayoutDirection, shake: ShakeTowards) -> Self {
        let (level_separation, node_spacing) = if direction.is_vertical() {
            (120.0, 200.0)
        } else {
            (200.0, 130.0)
        };

        Self {
            direction,
            shake,
            level_separation,
            node_spacing,
        }
    }

    pub fn for_document(
        document: &AnnotationDocument,
        direction: Option<LayoutDirection>,
        shake: Option<ShakeTowards>,
    ) -> Self {
        Self::new(
            direction.unwrap_or(document.dir),
            shake.unwrap_or(document.shake),
        )
    }
}

/// Hierarchy level per node. Edges point from parent to child; cycles are
/// cut off after one relaxation pass per node.
pub fn node_levels(graph: &GraphModel, shake: ShakeTowards) -> Vec<usize> {
    let n = graph.node_count();
    let edges = graph
        .edges()
        .iter()
        .filter_map(|edge| Some((graph.index_of(&edge.from)?, graph.index_of(&edge.to)?)))
        .filter(|(from, to)| from != to)
        .collect::<Vec<_>>();

    let mut depth = vec![0usize; n];
    let mut height = vec![0usize; n];
    for _ in 0..n {
        let mut changed = false;
        for &(from, to) in &edges {
            if depth[to] < depth[from] + 1 && depth[from] + 1 < n {
                depth[to] = depth[from] + 1;
                changed = true;
            }
            if height[from] < height[to] + 1 && height[to] + 1 < n {
                height[from] = height[to] + 1;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    match shake {
        ShakeTowards::Roots => depth,
        ShakeTowards::Leaves => {
            let max_height = height.iter().copied().max().unwrap_or(0);
            height.iter().map(|h| max_height - h).collect()
        }
    }
}

/// World positions per node index. Nodes share a level in graph order, which
/// is the order-key order.
pub fn hierarchical_layout(graph: &GraphModel, options: LayoutOptions) -> Vec<Vec2> {
    let levels = node_levels(graph, options.shake);
    let level_count = levels.iter().copied().max().map_or(0, |max| max + 1);

    let mut rows = vec![Vec::new(); level_count];
    for (index, &level) in levels.iter().enumerate() {
        rows[level].push(index);
    }

    let mut positions = vec![Vec2::ZERO; graph.node_count()];
    for (level, row) in rows.iter().enumerate() {
        let center = (row.len() as f32 - 1.0) * 0.5;
        for (slot, &index) in row.iter().enumerate() {
            let along = level as f32 * options.level_separation;
            let across = (slot as f32 - center) * options.node_spacing;
            positions[index] = match options.direction {
                LayoutDirection::UpDown => vec2(across, along),
                LayoutDirection::DownUp => vec2(across, -along),
                LayoutDirection::LeftRight => vec2(along, across),
                LayoutDirection::RightLeft => vec2(-along, across),
            };
        }
    }

    positions
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::annotations::fixtures::{code, store, text};

    fn graph() -> GraphModel {
        GraphModel::new(&store(
            vec![code("impl", "")],
            vec![
                text("root", "", &["mid", "impl"]),
                text("mid", "", &["impl"]),
            ],
        ))
    }

    fn level_of(graph: &GraphModel, levels: &[usize], id: &str) -> usize {
        levels[graph.index_of(id).expect("node indexed")]
    }

    #[test]
    fn spacing_follows_direction() {
        let vertical = LayoutOptions::new(LayoutDirection::DownUp, ShakeTowards::Roots);
        let horizontal = LayoutOptions::new(LayoutDirection::RightLeft, ShakeTowards::Roots);

        assert_eq!((vertical.level_separation, vertical.node_spacing), (120.0, 200.0));
        assert_eq!((horizontal.level_separation, horizontal.node_spacing), (200.0, 130.0));
    }

    #[test]
    fn overrides_take_precedence_over_document_controls() {
        let document = AnnotationDocument {
            dir: LayoutDirection::LeftRight,
            ..AnnotationDocument::default()
        };

        let from_document = LayoutOptions::for_document(&document, None, None);
        assert_eq!(from_document.direction, LayoutDirection::LeftRight);
        assert_eq!(from_document.shake, ShakeTowards::Roots);

        let overridden = LayoutOptions::for_document(
            &document,
            Some(LayoutDirection::UpDown),
            Some(ShakeTowards::Leaves),
        );
        assert_eq!(overridden.direction, LayoutDirection::UpDown);
        assert_eq!(overridden.shake, ShakeTowards::Leaves);
    }

    #[test]
    fn levels_use_longest_path_from_roots() {
        let graph = graph();
        let levels = node_levels(&graph, ShakeTowards::Roots);

        assert_eq!(level_of(&graph, &levels, "root"), 0);
        assert_eq!(level_of(&graph, &levels, "mid"), 1);
        assert_eq!(level_of(&graph, &levels, "impl"), 2);
    }

    #[test]
    fn leaves_anchor_the_last_level() {
        let graph = GraphModel::new(&store(
            vec![],
            vec![
                text("root", "", &["mid", "leaf"]),
                text("mid", "", &["deep"]),
                text("deep", "", &[]),
                text("leaf", "", &[]),
            ],
        ));

        let roots = node_levels(&graph, ShakeTowards::Roots);
        let leaves = node_levels(&graph, ShakeTowards::Leaves);

        assert_eq!(level_of(&graph, &roots, "leaf"), 1);
        assert_eq!(level_of(&graph, &leaves, "leaf"), 2);
        assert_eq!(level_of(&graph, &leaves, "deep"), 2);
    }

    #[test]
    fn cycles_terminate() {
        let graph = GraphModel::new(&store(
            vec![],
            vec![text("a", "", &["b"]), text("b", "", &["a"])],
        ));

        let levels = node_levels(&graph, ShakeTowards::Roots);
        assert!(levels.iter().all(|level| *level < graph.node_count()));
    }

    #[test]
    fn positions_follow_direction() {
        let graph = graph();
        let down = hierarchical_layout(
            &graph,
            LayoutOptions::new(LayoutDirection::UpDown, ShakeTowards::Roots),
        );
        let right = hierarchical_layout(
            &graph,
            LayoutOptions::new(LayoutDirection::LeftRight, ShakeTowards::Roots),
        );

        let impl_index = graph.index_of("impl").expect("impl indexed");
        assert_eq!(down[impl_index], vec2(0.0, 240.0));
        assert_eq!(right[impl_index], vec2(400.0, 0.0));
    }
}
