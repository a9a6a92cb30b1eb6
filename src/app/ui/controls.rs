use std::collections::HashSet;

use eframe::egui::{self, Color32, RichText, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::graph::ClickEvent;
use crate::session::Action;

use super::super::{SearchMatchCache, ViewModel};

const MAX_SEARCH_RESULTS: usize = 40;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Annotations");
        ui.separator();
        ui.add_space(4.0);

        self.draw_notice(ui);
        self.draw_selection(ui);

        ui.separator();
        ui.label("Search (id or title)")
            .on_hover_text("Fuzzy-match annotations, then click one to select it.");
        ui.text_edit_singleline(&mut self.search);
        self.draw_search_results(ui);

        ui.separator();
        ui.collapsing("Layout", |ui| {
            ui.label(format!("Direction: {}", self.layout.direction));
            ui.label(format!("Shake towards: {}", self.layout.shake.label()));
            ui.label(format!("Level separation: {}", self.layout.level_separation));
            ui.label(format!("Node spacing: {}", self.layout.node_spacing));
        });
    }

    fn draw_notice(&mut self, ui: &mut Ui) {
        let Some(notice) = self.session.notice().map(str::to_owned) else {
            return;
        };

        let mut dismissed = false;
        egui::Frame::group(ui.style())
            .fill(Color32::from_rgb(255, 236, 236))
            .show(ui, |ui| {
                ui.label(RichText::new(notice).color(Color32::from_rgb(170, 20, 20)));
                dismissed = ui.small_button("Dismiss").clicked();
            });
        if dismissed {
            self.session.dismiss_notice();
        }
        ui.add_space(6.0);
    }

    fn draw_selection(&mut self, ui: &mut Ui) {
        let Some(selected) = self.session.selected().map(str::to_owned) else {
            ui.label("Click an annotation in the graph to select it.");
            return;
        };

        ui.label(RichText::new(&selected).strong());
        if let Some(annotation) = self.store.get(&selected) {
            ui.small(annotation.title());
        }
        if let Some(node) = self.graph.node(&selected) {
            ui.small(format!("order key: {}", node.order_key));
        }
        ui.add_space(6.0);

        let mut grouping_changed = false;
        ui.horizontal_wrapped(|ui| {
            for action in self.session.actions() {
                if action == Action::CloseContent {
                    continue;
                }
                if ui.button(action.label()).clicked()
                    && self
                        .session
                        .dispatch(&self.store, &mut self.graph, action)
                        .is_ok()
                {
                    grouping_changed |= matches!(action, Action::Isolate | Action::Restore);
                }
            }
        });
        if grouping_changed {
            self.graph_dirty = true;
        }
    }

    fn draw_search_results(&mut self, ui: &mut Ui) {
        let matches = self.search_matches();
        if self.search.trim().is_empty() {
            return;
        }
        if matches.is_empty() {
            ui.small("No annotation matches.");
            return;
        }

        egui::ScrollArea::vertical()
            .id_salt("search_results")
            .max_height(280.0)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for id in &matches {
                    let title = self
                        .store
                        .get(id)
                        .map(|annotation| annotation.title().to_owned())
                        .unwrap_or_default();
                    let selected = self.session.selected() == Some(id.as_str());
                    if ui
                        .selectable_label(selected, format!("{id}  {title}"))
                        .clicked()
                    {
                        let event = ClickEvent::new([id.as_str()]);
                        self.session.handle_click(&self.store, &mut self.graph, &event);
                    }
                }
            });
    }

    fn search_matches(&mut self) -> Vec<String> {
        let query = self.search.trim();
        if let Some(cache) = &self.search_match_cache {
            if cache.query == query {
                return cache.matches.clone();
            }
        }

        let matcher = SkimMatcherV2::default();
        let mut scored = if query.is_empty() {
            Vec::new()
        } else {
            self.store
                .iter()
                .filter_map(|annotation| {
                    let id_score = fuzzy_match_score(&matcher, annotation.id(), query);
                    let title_score = fuzzy_match_score(&matcher, annotation.title(), query);
                    id_score
                        .max(title_score)
                        .map(|score| (score, annotation.id().to_owned()))
                })
                .collect::<Vec<_>>()
        };
        scored.sort_by(|(a_score, a_id), (b_score, b_id)| {
            b_score.cmp(a_score).then_with(|| a_id.cmp(b_id))
        });
        let mut seen = HashSet::new();
        scored.retain(|(_, id)| seen.insert(id.clone()));
        scored.truncate(MAX_SEARCH_RESULTS);

        let matches = scored.into_iter().map(|(_, id)| id).collect::<Vec<_>>();
        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            matches: matches.clone(),
        });
        matches
    }
}
