use tracing::{debug, warn};

use crate::annotations::{Annotation, AnnotationStore};
use crate::content::{RenderedContent, render_content};
use crate::error::ViewerError;
use crate::graph::{ClickEvent, GroupingEngine};

mod connectivity;

pub use connectivity::ConnectivityController;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    NodeSelected,
    ContentOpen,
    Isolated,
}

impl SessionState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::NodeSelected => "node selected",
            Self::ContentOpen => "content open",
            Self::Isolated => "isolated",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Isolate,
    Restore,
    DisplayContent,
    CloseContent,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Self::Isolate => "Cluster",
            Self::Restore => "Uncluster",
            Self::DisplayContent => "Display content",
            Self::CloseContent => "Close",
        }
    }
}

/// Session state for one viewer: selection, isolation and the open content.
///
/// Every operation runs to completion on the event thread. A failed operation
/// leaves the session as it was and records a notice for the user.
#[derive(Debug, Default)]
pub struct SelectionController {
    state: SessionState,
    selected: Option<String>,
    connectivity: ConnectivityController,
    content: Option<RenderedContent>,
    notice: Option<String>,
}

impl SelectionController {
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The node the graph is currently isolated on.
    pub fn isolated_on(&self) -> Option<&str> {
        self.connectivity.isolated_on()
    }

    pub fn content(&self) -> Option<&RenderedContent> {
        self.content.as_ref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub(crate) fn report(&mut self, error: &ViewerError) {
        warn!(%error, "interaction failed");
        self.notice = Some(error.to_string());
    }

    /// Only events carrying exactly one node change anything.
    pub fn handle_click<E>(&mut self, store: &AnnotationStore, engine: &mut E, event: &ClickEvent)
    where
        E: GroupingEngine + ?Sized,
    {
        let [id] = event.nodes.as_slice() else {
            debug!(count = event.nodes.len(), "ignoring ambiguous click");
            return;
        };

        if self.select(store, id).is_ok() {
            engine.unselect_all();
            engine.highlight(id);
        }
    }

    /// Resolves `id` (text annotations first) and makes it the selection.
    /// An open content panel follows the new selection.
    pub fn select(&mut self, store: &AnnotationStore, id: &str) -> Result<(), ViewerError> {
        let annotation = match resolve(store, id) {
            Ok(annotation) => annotation,
            Err(error) => {
                self.report(&error);
                return Err(error);
            }
        };

        if self.content.is_some() {
            self.content = Some(render_content(annotation));
        }
        self.selected = Some(id.to_owned());
        self.notice = None;
        if self.state == SessionState::Idle {
            self.state = SessionState::NodeSelected;
        }
        debug!(id, state = self.state.label(), "selected annotation");
        Ok(())
    }

    /// Actions the control surface offers right now. Isolate and restore are
    /// never offered together.
    pub fn actions(&self) -> Vec<Action> {
        if self.state == SessionState::Idle || self.selected.is_none() {
            return Vec::new();
        }

        let mut actions = Vec::with_capacity(3);
        if self.connectivity.is_isolated() {
            actions.push(Action::Restore);
        } else {
            actions.push(Action::Isolate);
        }
        actions.push(Action::DisplayContent);
        if self.content.is_some() {
            actions.push(Action::CloseContent);
        }
        actions
    }

    /// Runs an action the surface offered. Actions not currently offered are
    /// ignored; failures are recorded as the notice and returned.
    pub fn dispatch<E>(
        &mut self,
        store: &AnnotationStore,
        engine: &mut E,
        action: Action,
    ) -> Result<(), ViewerError>
    where
        E: GroupingEngine + ?Sized,
    {
        if !self.actions().contains(&action) {
            debug!(?action, state = self.state.label(), "ignoring unavailable action");
            return Ok(());
        }

        let result = self.apply(store, engine, action);
        match &result {
            Ok(()) => self.notice = None,
            Err(error) => self.report(error),
        }
        result
    }

    fn apply<E>(
        &mut self,
        store: &AnnotationStore,
        engine: &mut E,
        action: Action,
    ) -> Result<(), ViewerError>
    where
        E: GroupingEngine + ?Sized,
    {
        match action {
            Action::Isolate => {
                let id = self.selected.clone().ok_or(ViewerError::NothingSelected)?;
                self.connectivity.isolate(engine, &id)?;
                engine.highlight(&id);
                self.state = SessionState::Isolated;
            }
            Action::Restore => {
                self.connectivity.restore(engine);
                if self.state == SessionState::Isolated {
                    self.state = if self.content.is_some() {
                        SessionState::ContentOpen
                    } else {
                        SessionState::NodeSelected
                    };
                }
            }
            Action::DisplayContent => {
                let id = self.selected.as_deref().ok_or(ViewerError::NothingSelected)?;
                let annotation = resolve(store, id)?;
                self.content = Some(render_content(annotation));
                if self.state == SessionState::NodeSelected {
                    self.state = SessionState::ContentOpen;
                }
            }
            Action::CloseContent => {
                self.content = None;
                if self.state == SessionState::ContentOpen {
                    self.state = SessionState::Idle;
                }
            }
        }
        Ok(())
    }
}

fn resolve<'a>(store: &'a AnnotationStore, id: &str) -> Result<Annotation<'a>, ViewerError> {
    store.get(id).ok_or_else(|| ViewerError::DanglingReference { id: id.to_owned() })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::annotations::fixtures::{code, store, text};
    use crate::annotations::{TextAnnotation, parse_document};
    use crate::content::ContentPreset;
    use crate::graph::{GraphModel, NodeStyle};

    fn connected(mut annotation: TextAnnotation, ids: &[&str]) -> TextAnnotation {
        annotation.connected = Some(ids.iter().map(|id| (*id).to_owned()).collect());
        annotation
    }

    fn fixture() -> (AnnotationStore, GraphModel) {
        let store = store(
            vec![code("x", "int x = 0;")],
            vec![
                text("x", "Overview of $y", &["y"]),
                text("y", "Details", &[]),
            ],
        );
        let model = GraphModel::new(&store);
        (store, model)
    }

    fn connected_fixture() -> (AnnotationStore, GraphModel) {
        let store = store(
            vec![],
            vec![
                connected(text("a", "See $b", &["b"]), &["a", "b"]),
                connected(text("b", "leaf", &[]), &["a", "b"]),
                connected(text("c", "alone", &[]), &["c"]),
            ],
        );
        let model = GraphModel::new(&store);
        (store, model)
    }

    #[derive(Debug, PartialEq)]
    struct Snapshot {
        state: SessionState,
        selected: Option<String>,
        panel_open: bool,
        clustered: bool,
        groups: usize,
    }

    fn snapshot(session: &SelectionController, model: &GraphModel) -> Snapshot {
        Snapshot {
            state: session.state(),
            selected: session.selected().map(str::to_owned),
            panel_open: session.content().is_some(),
            clustered: session.isolated_on().is_some(),
            groups: model.groups().len(),
        }
    }

    #[test]
    fn single_click_selects_and_highlights() {
        let (store, mut model) = fixture();
        let mut session = SelectionController::default();

        session.handle_click(&store, &mut model, &ClickEvent::new(["y"]));

        assert_eq!(session.state(), SessionState::NodeSelected);
        assert_eq!(session.selected(), Some("y"));
        assert_eq!(model.highlighted().map(|node| node.id.as_str()), Some("y"));
        assert_eq!(session.actions(), vec![Action::Isolate, Action::DisplayContent]);
    }

    #[test]
    fn ambiguous_clicks_change_nothing() {
        let (store, mut model) = connected_fixture();
        let mut session = SelectionController::default();

        let empty = ClickEvent::default();
        let double = ClickEvent::new(["a", "b"]);

        for event in [&empty, &double] {
            let before = snapshot(&session, &model);
            session.handle_click(&store, &mut model, event);
            assert_eq!(snapshot(&session, &model), before);
        }

        session.handle_click(&store, &mut model, &ClickEvent::new(["a"]));
        session
            .dispatch(&store, &mut model, Action::DisplayContent)
            .expect("display");
        session
            .dispatch(&store, &mut model, Action::Isolate)
            .expect("isolate");

        for event in [&empty, &double] {
            let before = snapshot(&session, &model);
            session.handle_click(&store, &mut model, event);
            assert_eq!(snapshot(&session, &model), before);
        }
    }

    #[test]
    fn text_annotation_wins_on_id_collision() {
        let (store, mut model) = fixture();
        let mut session = SelectionController::default();

        for _ in 0..3 {
            session.select(&store, "y").expect("select y");
            session.select(&store, "x").expect("select x");
            session
                .dispatch(&store, &mut model, Action::DisplayContent)
                .expect("display");

            let content = session.content().expect("content open");
            assert_eq!(content.preset, ContentPreset::Text);
            assert_eq!(content.caption, None);
            assert_eq!(content.lines[0].to_plain(), "Overview of $y");
        }
    }

    #[test]
    fn highlight_and_content_resolve_the_same_annotation_on_collision() {
        let (store, mut model) = fixture();
        let mut session = SelectionController::default();

        session.handle_click(&store, &mut model, &ClickEvent::new(["x"]));
        session
            .dispatch(&store, &mut model, Action::DisplayContent)
            .expect("display");

        let highlighted = model.highlighted().map(|node| node.style);
        let shown = session.content().map(|content| content.preset);
        assert_eq!(highlighted, Some(NodeStyle::Text));
        assert_eq!(shown, Some(ContentPreset::Text));
    }

    #[test]
    fn display_and_close_follow_the_state_machine() {
        let (store, mut model) = fixture();
        let mut session = SelectionController::default();

        session.handle_click(&store, &mut model, &ClickEvent::new(["y"]));
        session
            .dispatch(&store, &mut model, Action::DisplayContent)
            .expect("display");
        assert_eq!(session.state(), SessionState::ContentOpen);
        assert_eq!(session.content().map(|content| content.id.as_str()), Some("y"));

        session.select(&store, "x").expect("follow link");
        assert_eq!(session.state(), SessionState::ContentOpen);
        assert_eq!(session.content().map(|content| content.id.as_str()), Some("x"));

        session
            .dispatch(&store, &mut model, Action::CloseContent)
            .expect("close");
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.content().is_none());
        assert_eq!(session.selected(), Some("x"));
        assert!(session.actions().is_empty());
    }

    #[test]
    fn isolate_and_restore_round_trip() {
        let (store, mut model) = connected_fixture();
        let mut session = SelectionController::default();

        session.handle_click(&store, &mut model, &ClickEvent::new(["a"]));
        session
            .dispatch(&store, &mut model, Action::Isolate)
            .expect("isolate");

        assert_eq!(session.state(), SessionState::Isolated);
        assert_eq!(session.actions(), vec![Action::Restore, Action::DisplayContent]);
        let c = model.index_of("c").expect("c indexed");
        assert!(!model.is_expanded(c));

        session
            .dispatch(&store, &mut model, Action::Restore)
            .expect("restore");
        assert_eq!(session.state(), SessionState::NodeSelected);
        assert!(model.groups().is_empty());
        assert_eq!(session.actions(), vec![Action::Isolate, Action::DisplayContent]);
    }

    #[test]
    fn restore_returns_to_open_content_when_the_panel_is_up() {
        let (store, mut model) = connected_fixture();
        let mut session = SelectionController::default();

        session.handle_click(&store, &mut model, &ClickEvent::new(["b"]));
        session
            .dispatch(&store, &mut model, Action::DisplayContent)
            .expect("display");
        session
            .dispatch(&store, &mut model, Action::Isolate)
            .expect("isolate");
        assert_eq!(session.state(), SessionState::Isolated);
        assert!(session.content().is_some());

        session
            .dispatch(&store, &mut model, Action::Restore)
            .expect("restore");
        assert_eq!(session.state(), SessionState::ContentOpen);
    }

    #[test]
    fn missing_connectivity_surfaces_a_notice_and_keeps_state() {
        let (store, mut model) = fixture();
        let mut session = SelectionController::default();
        session.handle_click(&store, &mut model, &ClickEvent::new(["y"]));
        let before = snapshot(&session, &model);

        let error = session
            .dispatch(&store, &mut model, Action::Isolate)
            .expect_err("isolation needs connectivity data");

        assert!(matches!(error, ViewerError::MissingConnectivityData { .. }));
        assert_eq!(snapshot(&session, &model), before);
        assert!(session.notice().is_some_and(|notice| notice.contains("connectivity")));

        session.dismiss_notice();
        assert!(session.notice().is_none());
    }

    #[test]
    fn dangling_links_surface_a_notice_and_keep_the_selection() {
        let document = parse_document(
            r#"{
                "code_annotations": [],
                "text_annotations": [
                    {"id": "a", "title": "A", "content": "see $ghost", "references": ["ghost"]}
                ]
            }"#,
        )
        .expect("document parses");
        let store = AnnotationStore::new(document);
        let mut model = GraphModel::new(&store);
        let mut session = SelectionController::default();

        session.handle_click(&store, &mut model, &ClickEvent::new(["a"]));
        session
            .dispatch(&store, &mut model, Action::DisplayContent)
            .expect("display");

        let link = session
            .content()
            .and_then(|content| content.lines[0].links().next().map(str::to_owned))
            .expect("link rendered");
        assert_eq!(
            session.select(&store, &link),
            Err(ViewerError::DanglingReference {
                id: "ghost".to_owned()
            })
        );
        assert_eq!(session.selected(), Some("a"));
        assert_eq!(session.state(), SessionState::ContentOpen);
        assert!(session.notice().is_some());
    }

    #[test]
    fn unavailable_actions_are_ignored() {
        let (store, mut model) = fixture();
        let mut session = SelectionController::default();

        assert_eq!(session.dispatch(&store, &mut model, Action::Isolate), Ok(()));
        assert_eq!(session.dispatch(&store, &mut model, Action::Restore), Ok(()));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(model.groups().is_empty());
    }
}
