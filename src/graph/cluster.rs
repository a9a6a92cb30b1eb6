use super::{GraphModel, GroupingEngine, Node};

pub type ClusterId = usize;

/// A synthetic node standing in for its collapsed members.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeGroup {
    pub id: ClusterId,
    pub members: Vec<usize>,
}

impl NodeGroup {
    pub fn label(&self) -> String {
        match self.members.len() {
            1 => "1 hidden annotation".to_owned(),
            count => format!("{count} hidden annotations"),
        }
    }
}

impl GraphModel {
    pub fn groups(&self) -> &[NodeGroup] {
        &self.groups
    }

    pub fn group_of(&self, index: usize) -> Option<ClusterId> {
        self.membership.get(index).copied().flatten()
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.group_of(index).is_none()
    }

    pub fn is_clustered(&self) -> bool {
        !self.groups.is_empty()
    }
}

impl GroupingEngine for GraphModel {
    fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    fn contains_node(&self, id: &str) -> bool {
        self.index_by_id.contains_key(id)
    }

    fn cluster(&mut self, keep: &dyn Fn(&Node) -> bool) -> Option<ClusterId> {
        let members = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(index, node)| self.membership[*index].is_none() && !keep(node))
            .map(|(index, _)| index)
            .collect::<Vec<_>>();

        if members.is_empty() {
            return None;
        }

        let id = self.next_group;
        self.next_group += 1;

        for &index in &members {
            self.membership[index] = Some(id);
        }
        if self
            .highlighted
            .is_some_and(|index| self.membership[index].is_some())
        {
            self.highlighted = None;
        }

        self.groups.push(NodeGroup { id, members });
        Some(id)
    }

    fn cluster_ids(&self) -> Vec<ClusterId> {
        self.groups.iter().map(|group| group.id).collect()
    }

    fn open_cluster(&mut self, id: ClusterId) -> bool {
        let Some(position) = self.groups.iter().position(|group| group.id == id) else {
            return false;
        };

        let group = self.groups.remove(position);
        for index in group.members {
            self.membership[index] = None;
        }
        true
    }

    fn highlight(&mut self, id: &str) -> bool {
        match self.index_of(id) {
            Some(index) if self.is_expanded(index) => {
                self.highlighted = Some(index);
                true
            }
            _ => false,
        }
    }

    fn unselect_all(&mut self) {
        self.highlighted = None;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::annotations::fixtures::{store, text};

    fn model() -> GraphModel {
        GraphModel::new(&store(
            vec![],
            vec![
                text("a", "", &["b"]),
                text("b", "", &[]),
                text("c", "", &[]),
                text("d", "", &[]),
            ],
        ))
    }

    #[test]
    fn collapses_nodes_failing_the_predicate() {
        let mut model = model();
        let group = model
            .cluster(&|node: &Node| node.id == "a" || node.id == "b")
            .expect("group created");

        let c = model.index_of("c").expect("c indexed");
        let a = model.index_of("a").expect("a indexed");
        assert_eq!(model.group_of(c), Some(group));
        assert!(model.is_expanded(a));
        assert_eq!(model.groups()[0].members.len(), 2);
        assert_eq!(model.groups()[0].label(), "2 hidden annotations");
    }

    #[test]
    fn nothing_to_collapse_creates_no_group() {
        let mut model = model();

        assert_eq!(model.cluster(&|_: &Node| true), None);
        assert!(!model.is_clustered());
    }

    #[test]
    fn opening_restores_membership() {
        let mut model = model();
        let before = (0..model.node_count())
            .map(|index| model.group_of(index))
            .collect::<Vec<_>>();

        let group = model.cluster(&|node: &Node| node.id == "a").expect("group");
        assert!(model.open_cluster(group));
        assert!(!model.open_cluster(group));

        let after = (0..model.node_count())
            .map(|index| model.group_of(index))
            .collect::<Vec<_>>();
        assert_eq!(before, after);
    }

    #[test]
    fn collapsed_nodes_cannot_stay_highlighted() {
        let mut model = model();
        assert!(model.highlight("c"));

        model.cluster(&|node: &Node| node.id == "a");

        assert!(model.highlighted().is_none());
        assert!(!model.highlight("d"));
    }
}
