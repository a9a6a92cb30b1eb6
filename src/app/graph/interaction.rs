use eframe::egui::{self, Pos2, Rect, Ui};

use crate::graph::ClickEvent;

use super::super::render_utils::screen_to_world;
use super::super::{RenderGraph, RenderItemKind, ViewModel};

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.1, 4.0);
        self.pan = pointer - rect.center() - (world_before * self.zoom);
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged() {
            self.pan += response.drag_delta();
        }
    }

    /// Topmost item under the pointer. Groups are drawn last, so they win.
    pub(in crate::app) fn hovered_item(
        render_graph: &RenderGraph,
        pointer: Option<Pos2>,
    ) -> Option<usize> {
        let pointer = pointer?;
        render_graph
            .screen_rects
            .iter()
            .enumerate()
            .rev()
            .find(|(_, rect)| rect.contains(pointer))
            .map(|(index, _)| index)
    }

    /// The ids a click on `item` reports; groups and the background report none.
    pub(in crate::app) fn click_event(&self, item: Option<usize>) -> ClickEvent {
        let Some(render_graph) = &self.render_graph else {
            return ClickEvent::default();
        };

        match item.and_then(|index| render_graph.items.get(index)).map(|item| item.kind) {
            Some(RenderItemKind::Annotation { index, .. }) => self
                .graph
                .nodes()
                .get(index)
                .map(|node| ClickEvent::new([node.id.as_str()]))
                .unwrap_or_default(),
            Some(RenderItemKind::Group(_)) | None => ClickEvent::default(),
        }
    }

    pub(in crate::app) fn fit_view(&mut self) {
        self.pan = eframe::egui::Vec2::ZERO;
        self.zoom = 1.0;
        if let Some(first) = self.positions.first() {
            let (min, max) = self.positions.iter().fold((*first, *first), |(min, max), p| {
                (min.min(*p), max.max(*p))
            });
            self.pan = -((min + max) * 0.5);
        }
    }
}
