use std::collections::HashSet;

use eframe::egui::Vec2;

use super::super::{RenderGraph, RenderItem, RenderItemKind, ViewModel};

impl ViewModel {
    /// Rebuilds the drawable items: expanded annotations plus one synthetic
    /// item per group, with edges re-routed to the group.
    pub(in crate::app) fn rebuild_render_graph(&mut self) {
        let nodes = self.graph.nodes();
        let mut items = Vec::with_capacity(nodes.len());
        let mut item_of_node = vec![usize::MAX; nodes.len()];

        for (index, node) in nodes.iter().enumerate() {
            if !self.graph.is_expanded(index) {
                continue;
            }
            item_of_node[index] = items.len();
            items.push(RenderItem {
                kind: RenderItemKind::Annotation {
                    index,
                    style: node.style,
                },
                world_pos: self.positions.get(index).copied().unwrap_or(Vec2::ZERO),
                label: node.label.clone(),
            });
        }

        for group in self.graph.groups() {
            let item_index = items.len();
            let mut centroid = Vec2::ZERO;
            for &member in &group.members {
                item_of_node[member] = item_index;
                centroid += self.positions.get(member).copied().unwrap_or(Vec2::ZERO);
            }
            if !group.members.is_empty() {
                centroid /= group.members.len() as f32;
            }

            items.push(RenderItem {
                kind: RenderItemKind::Group(group.id),
                world_pos: centroid,
                label: group.label(),
            });
        }

        let mut seen = HashSet::new();
        let edges = self
            .graph
            .edges()
            .iter()
            .filter_map(|edge| {
                let from = item_of_node[self.graph.index_of(&edge.from)?];
                let to = item_of_node[self.graph.index_of(&edge.to)?];
                (from != to && seen.insert((from, to))).then_some((from, to))
            })
            .collect::<Vec<_>>();

        self.render_graph = Some(RenderGraph {
            items,
            edges,
            screen_rects: Vec::new(),
        });
        self.graph_dirty = false;
    }
}
