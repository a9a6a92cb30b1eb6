use eframe::egui::{self, Align2, Color32, FontId, Rect, Sense, Stroke, Ui, vec2};

use super::super::render_utils::{
    dim_color, draw_arrow, draw_background, node_palette, world_to_screen,
};
use super::super::{RenderItemKind, ViewModel};

const LABEL_FONT_SIZE: f32 = 13.0;
const BOX_PADDING: f32 = 8.0;
const MAX_LABEL_WIDTH: f32 = 180.0;

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        if self.graph_dirty || self.render_graph.is_none() {
            self.rebuild_render_graph();
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        let pan = self.pan;
        let zoom = self.zoom;
        let highlighted = self
            .graph
            .highlighted()
            .and_then(|node| self.graph.index_of(&node.id));
        let banner = self
            .session
            .isolated_on()
            .filter(|_| self.graph.is_clustered())
            .map(|id| {
                format!(
                    "Showing annotations connected to `{id}`. Uncluster to restore the full graph."
                )
            });

        let Some(render_graph) = self.render_graph.as_mut() else {
            return;
        };
        if render_graph.items.is_empty() {
            ui.label("The annotation document has no annotations.");
            return;
        }

        let font = FontId::proportional(LABEL_FONT_SIZE * zoom.clamp(0.5, 1.6));
        let galleys = render_graph
            .items
            .iter()
            .map(|item| {
                painter.layout(
                    item.label.clone(),
                    font.clone(),
                    Color32::BLACK,
                    MAX_LABEL_WIDTH * zoom.clamp(0.5, 1.6),
                )
            })
            .collect::<Vec<_>>();

        render_graph.screen_rects.clear();
        for (item, galley) in render_graph.items.iter().zip(&galleys) {
            let center = world_to_screen(rect, pan, zoom, item.world_pos);
            let size = galley.size() + vec2(BOX_PADDING, BOX_PADDING) * 2.0 * zoom.clamp(0.5, 1.6);
            render_graph
                .screen_rects
                .push(Rect::from_center_size(center, size));
        }

        let pointer = ui.input(|input| input.pointer.hover_pos());
        let hovered = Self::hovered_item(render_graph, pointer.filter(|pos| rect.contains(*pos)));
        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        let edge_stroke = Stroke::new(
            (1.4 * zoom.sqrt()).clamp(0.8, 3.0),
            Color32::from_rgb(120, 128, 140),
        );
        let head = (10.0 * zoom.sqrt()).clamp(5.0, 16.0);
        for &(from, to) in &render_graph.edges {
            let (Some(source), Some(target)) =
                (render_graph.screen_rects.get(from), render_graph.screen_rects.get(to))
            else {
                continue;
            };
            draw_arrow(&painter, source.center(), *target, edge_stroke, head);
        }

        for (index, (item, galley)) in render_graph.items.iter().zip(galleys).enumerate() {
            let screen_rect = render_graph.screen_rects[index];
            let palette = node_palette(item.kind.style());
            let is_hovered = hovered == Some(index);
            let is_selected = matches!(
                item.kind,
                RenderItemKind::Annotation { index: node, .. } if highlighted == Some(node)
            );

            let (fill, border) = if is_selected {
                (palette.highlight_background, palette.highlight_border)
            } else if is_hovered {
                (palette.hover_background, palette.hover_border)
            } else {
                (palette.background, palette.border)
            };

            let shadow = screen_rect.translate(vec2(2.0, 3.0));
            painter.rect_filled(shadow, 4.0, dim_color(Color32::from_gray(90), 0.35));
            painter.rect_filled(screen_rect, 4.0, fill);
            painter.rect_stroke(
                screen_rect,
                4.0,
                Stroke::new(if is_selected { 2.4 } else { 1.2 }, border),
                egui::StrokeKind::Inside,
            );
            painter.galley(
                screen_rect.center() - galley.size() * 0.5,
                galley,
                Color32::BLACK,
            );
        }

        if let Some(banner) = banner {
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                banner,
                FontId::proportional(13.0),
                Color32::from_gray(60),
            );
        }

        if response.clicked_by(egui::PointerButton::Primary) {
            let event = self.click_event(hovered);
            self.session.handle_click(&self.store, &mut self.graph, &event);
        }
    }
}
