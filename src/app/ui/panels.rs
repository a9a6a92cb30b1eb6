use eframe::egui::{self, Align, Context, Key, Layout, Vec2};

use crate::annotations::{AnnotationDocument, AnnotationStore};
use crate::graph::GraphModel;
use crate::layout::{LayoutOptions, hierarchical_layout};
use crate::session::{Action, SelectionController};

use super::super::{ViewModel, ViewerSettings};

impl ViewModel {
    pub(in crate::app) fn new(document: AnnotationDocument, settings: &ViewerSettings) -> Self {
        let layout = LayoutOptions::for_document(&document, settings.direction, settings.shake);
        let store = AnnotationStore::new(document);
        let graph = GraphModel::new(&store);
        let positions = hierarchical_layout(&graph, layout);

        let mut model = Self {
            store,
            graph,
            session: SelectionController::default(),
            layout,
            positions,
            pan: Vec2::ZERO,
            zoom: 1.0,
            search: String::new(),
            search_match_cache: None,
            graph_dirty: true,
            render_graph: None,
        };
        model.fit_view();
        model
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        if ctx.input(|input| input.key_pressed(Key::Escape)) {
            let _ = self
                .session
                .dispatch(&self.store, &mut self.graph, Action::CloseContent);
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("lect");
                    ui.separator();
                    ui.label(format!(
                        "annotations: {} ({} code, {} text)",
                        self.store.len(),
                        self.store.code_annotations().len(),
                        self.store.text_annotations().len()
                    ));
                    ui.label(format!("nodes: {}", self.graph.node_count()));
                    ui.label(format!("edges: {}", self.graph.edge_count()));
                    ui.label(format!(
                        "layout: {} / {}",
                        self.layout.direction,
                        self.layout.shake.label()
                    ));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload document"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if ui.button("Fit view").clicked() {
                        self.fit_view();
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if is_loading {
                            ui.spinner();
                        }
                        ui.label(format!("state: {}", self.session.state().label()));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        if self.session.content().is_some() {
            egui::SidePanel::right("details")
                .resizable(true)
                .default_width(460.0)
                .show(ctx, |ui| self.draw_details(ui));
        }

        egui::CentralPanel::default().show(ctx, |ui| self.draw_graph(ui));
    }
}
