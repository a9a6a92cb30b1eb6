use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{Context, Rect, Vec2};
use tracing::info;

use crate::annotations::{
    AnnotationDocument, AnnotationStore, LayoutDirection, ShakeTowards, read_document,
};
use crate::error::ViewerError;
use crate::graph::{ClusterId, GraphModel, NodeStyle};
use crate::layout::LayoutOptions;
use crate::session::SelectionController;

mod graph;
mod render_utils;
mod ui;

#[derive(Clone, Debug)]
pub struct ViewerSettings {
    pub document_path: PathBuf,
    pub direction: Option<LayoutDirection>,
    pub shake: Option<ShakeTowards>,
    pub strict: bool,
}

pub struct LectViewerApp {
    settings: ViewerSettings,
    model: Box<ViewModel>,
    reload_rx: Option<Receiver<Result<AnnotationDocument, String>>>,
}

struct ViewModel {
    store: AnnotationStore,
    graph: GraphModel,
    session: SelectionController,
    layout: LayoutOptions,
    positions: Vec<Vec2>,
    pan: Vec2,
    zoom: f32,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    graph_dirty: bool,
    render_graph: Option<RenderGraph>,
}

struct SearchMatchCache {
    query: String,
    matches: Vec<String>,
}

/// What the canvas draws after grouping is applied.
struct RenderGraph {
    items: Vec<RenderItem>,
    edges: Vec<(usize, usize)>,
    screen_rects: Vec<Rect>,
}

struct RenderItem {
    kind: RenderItemKind,
    world_pos: Vec2,
    label: String,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum RenderItemKind {
    Annotation { index: usize, style: NodeStyle },
    Group(ClusterId),
}

impl RenderItemKind {
    fn style(self) -> Option<NodeStyle> {
        match self {
            Self::Annotation { style, .. } => Some(style),
            Self::Group(_) => None,
        }
    }
}

impl LectViewerApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        document: AnnotationDocument,
        settings: ViewerSettings,
    ) -> Self {
        let model = Box::new(ViewModel::new(document, &settings));
        Self {
            settings,
            model,
            reload_rx: None,
        }
    }

    fn spawn_load(settings: &ViewerSettings) -> Receiver<Result<AnnotationDocument, String>> {
        let (tx, rx) = mpsc::channel();
        let path = settings.document_path.clone();
        let strict = settings.strict;

        thread::spawn(move || {
            let result = read_document(&path, strict).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }
}

impl eframe::App for LectViewerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut reload_requested = false;
        let is_reloading = self.reload_rx.is_some();
        self.model.show(ctx, &mut reload_requested, is_reloading);

        if reload_requested && self.reload_rx.is_none() {
            info!(path = %self.settings.document_path.display(), "reloading annotation document");
            self.reload_rx = Some(Self::spawn_load(&self.settings));
        }

        if let Some(rx) = self.reload_rx.take() {
            match rx.try_recv() {
                Ok(Ok(document)) => {
                    self.model = Box::new(ViewModel::new(document, &self.settings));
                }
                Ok(Err(error)) => {
                    self.model
                        .session
                        .report(&ViewerError::InvalidDocument(error));
                }
                Err(TryRecvError::Empty) => {
                    self.reload_rx = Some(rx);
                    ctx.request_repaint();
                }
                Err(TryRecvError::Disconnected) => {
                    self.model.session.report(&ViewerError::InvalidDocument(
                        "background load worker disconnected".to_owned(),
                    ));
                }
            }
        }
    }
}
