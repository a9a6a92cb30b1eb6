use tracing::{debug, info};

use crate::error::ViewerError;
use crate::graph::{GroupingEngine, Node};

/// Isolates one node's neighborhood through the engine's grouping primitive.
#[derive(Clone, Debug, Default)]
pub struct ConnectivityController {
    isolated_on: Option<String>,
}

impl ConnectivityController {
    pub fn isolated_on(&self) -> Option<&str> {
        self.isolated_on.as_deref()
    }

    pub fn is_isolated(&self) -> bool {
        self.isolated_on.is_some()
    }

    /// Collapses every node whose connectivity set lacks `node_id`. Replaces
    /// any isolation already in place. Fails without touching the graph when
    /// the node is unknown or any node lacks connectivity data.
    pub fn isolate<E>(&mut self, engine: &mut E, node_id: &str) -> Result<(), ViewerError>
    where
        E: GroupingEngine + ?Sized,
    {
        if !engine.contains_node(node_id) {
            return Err(ViewerError::UnknownNode {
                id: node_id.to_owned(),
            });
        }

        if let Some(node) = engine.nodes().iter().find(|node| node.connected.is_none()) {
            return Err(ViewerError::MissingConnectivityData {
                id: node.id.clone(),
            });
        }

        self.restore(engine);

        let keep = |node: &Node| {
            node.connected
                .as_ref()
                .is_some_and(|connected| connected.contains(node_id))
        };
        let group = engine.cluster(&keep);

        info!(node = node_id, ?group, "isolated connected neighborhood");
        self.isolated_on = Some(node_id.to_owned());
        Ok(())
    }

    /// Expands every group. Does nothing when nothing is grouped.
    pub fn restore<E>(&mut self, engine: &mut E)
    where
        E: GroupingEngine + ?Sized,
    {
        let groups = engine.cluster_ids();
        if groups.is_empty() && self.isolated_on.is_none() {
            return;
        }

        for group in groups {
            engine.open_cluster(group);
        }
        debug!(previous = ?self.isolated_on, "restored full graph");
        self.isolated_on = None;
    }
}
