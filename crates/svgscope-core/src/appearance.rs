use crate::paint::{Paint, Stroke};
use crate::scene::{NodeId, NodeState, SceneTree};
use crate::view::ViewId;

/// Thin accessor over a node's fill, stroke, and visibility.
///
/// Fill and stroke resolve to the node's own primitive, or to the single
/// primitive its view wraps; on anything else gets return `None` and sets
/// do nothing.
pub struct Appearance<'a> {
    tree: &'a mut SceneTree,
    node: NodeId,
}

impl SceneTree {
    pub fn look(&mut self, node: NodeId) -> Appearance<'_> {
        Appearance { tree: self, node }
    }
}

impl Appearance<'_> {
    pub fn fill(&self) -> Option<Paint> {
        let pid = self.tree.target_primitive(self.node)?;
        self.tree.store.get(&pid)?.fill
    }

    pub fn set_fill(&mut self, fill: Paint) {
        if let Some(pid) = self.tree.target_primitive(self.node) {
            if let Some(prim) = self.tree.store.get_mut(&pid) {
                prim.fill = Some(fill);
            }
        }
    }

    pub fn stroke(&self) -> Option<Stroke> {
        let pid = self.tree.target_primitive(self.node)?;
        self.tree.store.get(&pid)?.stroke
    }

    pub fn set_stroke(&mut self, stroke: Stroke) {
        if let Some(pid) = self.tree.target_primitive(self.node) {
            if let Some(prim) = self.tree.store.get_mut(&pid) {
                prim.stroke = Some(stroke);
            }
        }
    }

    /// Promoted nodes report their view's own flag; flat nodes report their
    /// entry flag in the parent view. A flat node with no parent reports
    /// `false`.
    pub fn is_visible(&self) -> bool {
        match self.tree.nodes.get(&self.node).map(|n| n.state()) {
            Some(NodeState::Promoted(v)) => self
                .tree
                .views
                .get(&v)
                .map(|view| view.is_visible())
                .unwrap_or(false),
            Some(NodeState::Flat(p)) => match self.parent_view() {
                // Displaced entries default to visible, matching render.
                Some(pv) => self
                    .tree
                    .views
                    .get(&pv)
                    .and_then(|view| view.entry_visibility(&p))
                    .unwrap_or(true),
                None => false,
            },
            None => false,
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        match self.tree.nodes.get(&self.node).map(|n| n.state()) {
            Some(NodeState::Promoted(v)) => {
                if let Some(view) = self.tree.views.get_mut(&v) {
                    view.set_visible(visible);
                }
            }
            Some(NodeState::Flat(p)) => {
                if let Some(pv) = self.parent_view() {
                    if let Some(view) = self.tree.views.get_mut(&pv) {
                        view.set_entry_visibility(&p, visible);
                    }
                }
                // No parent: the root never holds a primitive; no-op.
            }
            None => {}
        }
    }

    pub fn toggle_visibility(&mut self) {
        let visible = self.is_visible();
        self.set_visible(!visible);
    }

    fn parent_view(&self) -> Option<ViewId> {
        let parent = self.tree.nodes.get(&self.node)?.parent()?;
        self.tree.view_of(parent)
    }
}
