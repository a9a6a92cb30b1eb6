use eframe::egui::{self, Color32, RichText, Ui};

use crate::content::{ContentPreset, INDENT_PLACEHOLDER, RenderedLine, Segment};
use crate::graph::ClickEvent;
use crate::session::Action;

use super::super::ViewModel;
use super::super::render_utils::{
    CODE_CONTENT_BACKGROUND, CODE_CONTENT_TEXT, TEXT_CONTENT_BACKGROUND, TEXT_CONTENT_TEXT,
};

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        let Some(content) = self.session.content().cloned() else {
            return;
        };

        ui.horizontal(|ui| {
            ui.heading(content.title.as_str());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button(Action::CloseContent.label()).clicked() {
                    let _ = self
                        .session
                        .dispatch(&self.store, &mut self.graph, Action::CloseContent);
                }
            });
        });
        ui.small(content.id.as_str());
        if let Some(caption) = &content.caption {
            ui.label(RichText::new(caption).monospace());
        }
        ui.add_space(6.0);

        let (background, foreground) = match content.preset {
            ContentPreset::Code => (CODE_CONTENT_BACKGROUND, CODE_CONTENT_TEXT),
            ContentPreset::Text => (TEXT_CONTENT_BACKGROUND, TEXT_CONTENT_TEXT),
        };

        let mut followed = None;
        egui::Frame::new()
            .fill(background)
            .inner_margin(egui::Margin::same(10))
            .corner_radius(4.0)
            .show(ui, |ui| {
                let scroll = if content.preset.wraps() {
                    egui::ScrollArea::vertical()
                } else {
                    egui::ScrollArea::both()
                };
                scroll
                    .id_salt("content_scroll")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for line in &content.lines {
                            if let Some(target) = draw_line(ui, line, content.preset, foreground) {
                                followed = Some(target);
                            }
                        }
                    });
            });

        if let Some(target) = followed {
            let event = ClickEvent::new([target.as_str()]);
            self.session.handle_click(&self.store, &mut self.graph, &event);
        }
    }
}

/// Draws one content line and returns the target of a clicked link.
fn draw_line(
    ui: &mut Ui,
    line: &RenderedLine,
    preset: ContentPreset,
    foreground: Color32,
) -> Option<String> {
    let styled = |text: &str| {
        let text = RichText::new(text).color(foreground);
        if preset.monospace() { text.monospace() } else { text }
    };

    let mut clicked = None;
    let mut draw = |ui: &mut Ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        if line.indent > 0 {
            let indent = INDENT_PLACEHOLDER.to_string().repeat(line.indent);
            ui.add(egui::Label::new(styled(&indent)).extend());
        }
        if line.segments.is_empty() && line.indent == 0 {
            ui.label(styled(" "));
        }
        for segment in &line.segments {
            match segment {
                Segment::Text(text) => {
                    let label = egui::Label::new(styled(text));
                    if preset.wraps() {
                        ui.add(label.wrap());
                    } else {
                        ui.add(label.extend());
                    }
                }
                Segment::Link { target, label } => {
                    let link = RichText::new(label).underline();
                    let link = if preset.monospace() { link.monospace() } else { link };
                    if ui.link(link).on_hover_text(target.as_str()).clicked() {
                        clicked = Some(target.clone());
                    }
                }
            }
        }
    };

    if preset.wraps() {
        ui.horizontal_wrapped(|ui| draw(ui));
    } else {
        ui.horizontal(|ui| draw(ui));
    }
    clicked
}
