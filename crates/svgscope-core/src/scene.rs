use std::collections::HashMap;

use uuid::Uuid;

use crate::binding::TransformBinding;
use crate::drawing::{DrawingChild, DrawingDocument, DrawingGroup, DrawingPrimitive, DrawingStore, PrimitiveId};
use crate::error::SceneError;
use crate::events::HandlerSet;
use crate::geometry::BBox;
use crate::index::IdentifierIndex;
use crate::view::{ComposedView, ViewId};

/// Unique scene node identifier.
pub type NodeId = Uuid;

/// The two mutually exclusive node states. A node is flat (its primitive
/// still lives in an ancestor view's list) or promoted (it owns a view);
/// promotion never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Flat(PrimitiveId),
    Promoted(ViewId),
}

/// The addressable wrapper around one imported drawing element.
#[derive(Debug)]
pub struct SceneNode {
    pub id: NodeId,
    identifier: Option<String>,
    /// Back-reference only; never an ownership edge.
    parent: Option<NodeId>,
    state: NodeState,
    children: Vec<NodeId>,
    /// Named direct children. Unnamed children are reachable only by
    /// searching the subtree.
    names: HashMap<String, NodeId>,
    pub(crate) binding: Option<TransformBinding>,
}

impl SceneNode {
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// The explorer tree: owns every node, view, and primitive top-down.
/// All addressing, promotion, and mutation go through this type.
#[derive(Debug)]
pub struct SceneTree {
    pub(crate) nodes: HashMap<NodeId, SceneNode>,
    pub(crate) views: HashMap<ViewId, ComposedView>,
    pub(crate) store: DrawingStore,
    pub(crate) index: IdentifierIndex,
    pub(crate) handlers: HashMap<NodeId, HandlerSet>,
    pub(crate) next_subscription: u64,
    root: NodeId,
    root_view: ViewId,
}

impl SceneTree {
    /// Build the tree from an imported document. Every drawing group becomes
    /// a promoted node with its own view; every primitive becomes a flat
    /// entry in its parent's view.
    pub fn build(document: DrawingDocument) -> Result<SceneTree, SceneError> {
        let DrawingDocument { store, root, index } = document;
        let mut tree = SceneTree {
            nodes: HashMap::new(),
            views: HashMap::new(),
            store,
            index,
            handlers: HashMap::new(),
            next_subscription: 0,
            root: Uuid::nil(),
            root_view: Uuid::nil(),
        };
        let root_id = tree.build_group(&root, None)?;
        tree.root = root_id;
        tree.root_view = match tree.nodes[&root_id].state {
            NodeState::Promoted(v) => v,
            NodeState::Flat(_) => return Err(SceneError::InvalidPromotionTarget),
        };
        log::debug!(
            "scene tree built: {} nodes, {} views, {} primitives",
            tree.nodes.len(),
            tree.views.len(),
            tree.store.len()
        );
        Ok(tree)
    }

    fn build_group(
        &mut self,
        group: &DrawingGroup,
        parent: Option<NodeId>,
    ) -> Result<NodeId, SceneError> {
        let view_id = Uuid::new_v4();
        self.views
            .insert(view_id, ComposedView::new().with_transform(group.transform));

        let node_id = Uuid::new_v4();
        self.nodes.insert(
            node_id,
            SceneNode {
                id: node_id,
                identifier: group.name.clone(),
                parent,
                state: NodeState::Promoted(view_id),
                children: Vec::new(),
                names: HashMap::new(),
                binding: None,
            },
        );

        // Flat entries paint before child views, so once any child view
        // exists a later primitive must be promoted on the spot to keep
        // document order.
        let mut saw_view_child = false;
        for child in &group.children {
            let child_id = match child {
                DrawingChild::Group(g) => {
                    let cid = self.build_group(g, Some(node_id))?;
                    if let NodeState::Promoted(cview) = self.nodes[&cid].state {
                        if let Some(pv) = self.views.get_mut(&view_id) {
                            pv.push_child(cview);
                        }
                    }
                    saw_view_child = true;
                    cid
                }
                DrawingChild::Primitive(pid) => {
                    let identifier = self.index.name_of(pid).map(str::to_string);
                    let cid = Uuid::new_v4();
                    self.nodes.insert(
                        cid,
                        SceneNode {
                            id: cid,
                            identifier,
                            parent: Some(node_id),
                            state: NodeState::Flat(*pid),
                            children: Vec::new(),
                            names: HashMap::new(),
                            binding: None,
                        },
                    );
                    if let Some(pv) = self.views.get_mut(&view_id) {
                        pv.push_primitive(*pid);
                    }
                    if saw_view_child {
                        self.promote(cid)?;
                    }
                    cid
                }
            };

            if let Some(name) = self.nodes[&child_id].identifier.clone() {
                let node = self
                    .nodes
                    .get_mut(&node_id)
                    .ok_or(SceneError::InvalidPromotionTarget)?;
                if node.names.insert(name.clone(), child_id).is_some() {
                    return Err(SceneError::DuplicateIdentifier(name));
                }
            }
            if let Some(node) = self.nodes.get_mut(&node_id) {
                node.children.push(child_id);
            }
        }
        Ok(node_id)
    }

    // ── Addressing ───────────────────────────────────────────────────

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_view(&self) -> ViewId {
        self.root_view
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Look up a descendant of the root by identifier.
    pub fn lookup(&self, name: &str) -> Result<NodeId, SceneError> {
        self.get(self.root, name)
    }

    /// Look up by identifier under `from`: the direct-child name map wins
    /// over any deeper match, then depth-first search in child-list order.
    pub fn get(&self, from: NodeId, name: &str) -> Result<NodeId, SceneError> {
        self.find(from, name)
            .ok_or_else(|| SceneError::NotFound(name.to_string()))
    }

    /// Like [`get`](Self::get) but absence is not an error.
    pub fn find(&self, from: NodeId, name: &str) -> Option<NodeId> {
        let node = self.nodes.get(&from)?;
        if let Some(&hit) = node.names.get(name) {
            return Some(hit);
        }
        for &child in &node.children {
            if let Some(hit) = self.find(child, name) {
                return Some(hit);
            }
        }
        None
    }

    // ── Promotion ────────────────────────────────────────────────────

    pub fn is_promoted(&self, node: NodeId) -> bool {
        matches!(
            self.nodes.get(&node).map(|n| n.state),
            Some(NodeState::Promoted(_))
        )
    }

    /// Upgrade a flat node into a view holder without altering the visible
    /// render order of the scene. Idempotent on promoted nodes.
    ///
    /// The node's primitive and every primitive painted above it in the
    /// parent's flat list are re-emitted, in order, as single-primitive
    /// child views; the first binds to this node, the rest stay anonymous
    /// and exist purely to preserve paint order.
    pub fn promote(&mut self, node: NodeId) -> Result<(), SceneError> {
        let n = self
            .nodes
            .get(&node)
            .ok_or(SceneError::InvalidPromotionTarget)?;
        let pid = match n.state {
            NodeState::Promoted(_) => return Ok(()),
            NodeState::Flat(p) => p,
        };
        let parent = n.parent.ok_or(SceneError::InvalidPromotionTarget)?;
        let parent_view = match self.nodes.get(&parent).map(|p| p.state) {
            Some(NodeState::Promoted(v)) => v,
            _ => return Err(SceneError::InvalidPromotionTarget),
        };

        let suffix = self
            .views
            .get_mut(&parent_view)
            .ok_or(SceneError::InvalidPromotionTarget)?
            .split_off_upward(&pid);

        if suffix.is_empty() {
            // The primitive already left the flat list: an earlier sibling
            // promotion displaced it into an anonymous child view. Adopt
            // that view instead of re-splitting.
            return self.adopt_displaced(node, parent_view, &pid);
        }

        let mut bound = None;
        for entry in suffix {
            let vid = Uuid::new_v4();
            let mut view = ComposedView::new();
            view.push_entry(entry);
            self.views.insert(vid, view);
            if let Some(pv) = self.views.get_mut(&parent_view) {
                pv.push_child(vid);
            }
            if bound.is_none() {
                bound = Some(vid);
            }
        }
        if let (Some(vid), Some(n)) = (bound, self.nodes.get_mut(&node)) {
            n.state = NodeState::Promoted(vid);
            log::debug!("promoted node {:?}", n.identifier);
        }
        Ok(())
    }

    /// Bind `node` to the anonymous single-primitive view a previous sibling
    /// promotion created for its primitive.
    fn adopt_displaced(
        &mut self,
        node: NodeId,
        parent_view: ViewId,
        pid: &PrimitiveId,
    ) -> Result<(), SceneError> {
        let bound_views: Vec<ViewId> = self
            .nodes
            .values()
            .filter_map(|n| match n.state {
                NodeState::Promoted(v) => Some(v),
                NodeState::Flat(_) => None,
            })
            .collect();
        let children = self
            .views
            .get(&parent_view)
            .ok_or(SceneError::InvalidPromotionTarget)?
            .child_views()
            .to_vec();
        for vid in children {
            let holds_target = self
                .views
                .get(&vid)
                .and_then(|v| v.single_primitive())
                .is_some_and(|p| p == *pid);
            if holds_target && !bound_views.contains(&vid) {
                if let Some(n) = self.nodes.get_mut(&node) {
                    n.state = NodeState::Promoted(vid);
                    log::debug!("promoted node {:?} by adopting a displaced view", n.identifier);
                }
                return Ok(());
            }
        }
        Err(SceneError::InvalidPromotionTarget)
    }

    // ── Primitive / view access ──────────────────────────────────────

    pub fn primitive(&self, id: &PrimitiveId) -> Option<&DrawingPrimitive> {
        self.store.get(id)
    }

    pub fn primitive_mut(&mut self, id: &PrimitiveId) -> Option<&mut DrawingPrimitive> {
        self.store.get_mut(id)
    }

    pub fn view(&self, id: ViewId) -> Option<&ComposedView> {
        self.views.get(&id)
    }

    pub(crate) fn view_of(&self, node: NodeId) -> Option<ViewId> {
        match self.nodes.get(&node)?.state {
            NodeState::Promoted(v) => Some(v),
            NodeState::Flat(_) => None,
        }
    }

    /// The primitive an appearance operation should touch: a flat node's own
    /// primitive, or the single primitive a promoted node's view wraps.
    pub(crate) fn target_primitive(&self, node: NodeId) -> Option<PrimitiveId> {
        match self.nodes.get(&node)?.state {
            NodeState::Flat(p) => Some(p),
            NodeState::Promoted(v) => self.views.get(&v)?.single_primitive(),
        }
    }

    // ── Bounds ───────────────────────────────────────────────────────

    /// Content bounds of a view in its own coordinate space, cached until
    /// the next structural mutation.
    pub fn view_bounds(&mut self, view: ViewId) -> Option<BBox> {
        if let Some(bb) = self.views.get(&view).and_then(|v| v.cached_bounds()) {
            return Some(bb);
        }
        let bb = self.compute_view_bounds(view)?;
        if let Some(v) = self.views.get_mut(&view) {
            v.store_bounds(bb);
        }
        Some(bb)
    }

    fn compute_view_bounds(&self, view: ViewId) -> Option<BBox> {
        let v = self.views.get(&view)?;
        let mut acc: Option<BBox> = None;
        for entry in v.entries() {
            if let Some(bb) = self.store.get(&entry.primitive).and_then(|p| p.bbox()) {
                acc = Some(acc.map_or(bb, |a| a.union(&bb)));
            }
        }
        for &child in v.child_views() {
            if let Some(bb) = self.compute_view_bounds(child) {
                let bb = match self.views.get(&child) {
                    Some(cv) => cv.transform().apply_bbox(&bb),
                    None => bb,
                };
                acc = Some(acc.map_or(bb, |a| a.union(&bb)));
            }
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;

    fn rect_prim(store: &mut DrawingStore, x: f64) -> PrimitiveId {
        store.insert(DrawingPrimitive::new(Geometry::Rect {
            x,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        }))
    }

    fn named(
        store: &mut DrawingStore,
        index: &mut IdentifierIndex,
        name: &str,
        x: f64,
    ) -> PrimitiveId {
        let id = rect_prim(store, x);
        index.insert(name, id).unwrap();
        id
    }

    /// Root group holding two named primitives, list order [star, dot].
    fn star_dot_doc() -> DrawingDocument {
        let mut store = DrawingStore::new();
        let mut index = IdentifierIndex::new();
        let star = named(&mut store, &mut index, "star", 0.0);
        let dot = named(&mut store, &mut index, "dot", 20.0);
        let mut root = DrawingGroup::new(None);
        root.push_primitive(star);
        root.push_primitive(dot);
        DrawingDocument::new(store, root, index)
    }

    #[test]
    fn test_build_states() {
        let tree = SceneTree::build(star_dot_doc()).unwrap();
        assert!(tree.is_promoted(tree.root()));
        let star = tree.lookup("star").unwrap();
        let dot = tree.lookup("dot").unwrap();
        assert!(!tree.is_promoted(star));
        assert!(!tree.is_promoted(dot));
        // Every node is in exactly one state.
        for node in tree.nodes.values() {
            match node.state() {
                NodeState::Flat(_) | NodeState::Promoted(_) => {}
            }
        }
        let root_view = tree.view(tree.root_view()).unwrap();
        assert_eq!(root_view.entries().len(), 2);
        assert!(root_view.child_views().is_empty());
    }

    #[test]
    fn test_lookup_miss() {
        let tree = SceneTree::build(star_dot_doc()).unwrap();
        assert!(tree.find(tree.root(), "comet").is_none());
        assert_eq!(
            tree.lookup("comet"),
            Err(SceneError::NotFound("comet".to_string()))
        );
    }

    #[test]
    fn test_lookup_direct_child_wins_over_grandchild() {
        let mut store = DrawingStore::new();
        let mut index = IdentifierIndex::new();
        // Grandchild "a" lives under an unnamed group; direct child "a" is a
        // group, so the shared identifier never collides in one parent map.
        let deep_a = named(&mut store, &mut index, "a", 0.0);
        let mut inner = DrawingGroup::new(None);
        inner.push_primitive(deep_a);
        let direct_a = DrawingGroup::new(Some("a".to_string()));
        let mut root = DrawingGroup::new(None);
        root.push_group(inner);
        root.push_group(direct_a);
        let tree = SceneTree::build(DrawingDocument::new(store, root, index)).unwrap();

        let hit = tree.lookup("a").unwrap();
        assert!(tree.is_promoted(hit), "direct child group must win");
        assert_eq!(tree.node(hit).unwrap().identifier(), Some("a"));
        // The grandchild is still reachable from its own parent.
        let inner_node = tree.node(tree.root()).unwrap().children()[0];
        let deep = tree.get(inner_node, "a").unwrap();
        assert!(!tree.is_promoted(deep));
    }

    #[test]
    fn test_duplicate_sibling_identifier_fails_build() {
        let mut store = DrawingStore::new();
        let mut index = IdentifierIndex::new();
        let p = named(&mut store, &mut index, "twin", 0.0);
        let mut root = DrawingGroup::new(None);
        root.push_primitive(p);
        root.push_group(DrawingGroup::new(Some("twin".to_string())));
        let err = SceneTree::build(DrawingDocument::new(store, root, index)).unwrap_err();
        assert_eq!(err, SceneError::DuplicateIdentifier("twin".to_string()));
    }

    #[test]
    fn test_promote_takes_upward_suffix() {
        let mut tree = SceneTree::build(star_dot_doc()).unwrap();
        let star = tree.lookup("star").unwrap();
        tree.promote(star).unwrap();

        assert!(tree.is_promoted(star));
        // Both entries left the flat list; dot rides in an anonymous view
        // painted after star's, preserving [star, dot] order.
        let root_view = tree.view(tree.root_view()).unwrap();
        assert!(root_view.entries().is_empty());
        assert_eq!(root_view.child_views().len(), 2);
        let star_view = tree.view_of(star).unwrap();
        assert_eq!(root_view.child_views()[0], star_view);

        let dot = tree.lookup("dot").unwrap();
        assert!(!tree.is_promoted(dot));
    }

    #[test]
    fn test_promote_middle_leaves_lower_entries() {
        let mut tree = SceneTree::build(star_dot_doc()).unwrap();
        let dot = tree.lookup("dot").unwrap();
        tree.promote(dot).unwrap();

        let root_view = tree.view(tree.root_view()).unwrap();
        // star stays flat (below), dot alone became a view.
        assert_eq!(root_view.entries().len(), 1);
        assert_eq!(root_view.child_views().len(), 1);
        let star = tree.lookup("star").unwrap();
        assert!(!tree.is_promoted(star));
    }

    #[test]
    fn test_promote_is_idempotent() {
        let mut tree = SceneTree::build(star_dot_doc()).unwrap();
        let star = tree.lookup("star").unwrap();
        tree.promote(star).unwrap();
        let views_before = tree.views.len();
        let children_before = tree.view(tree.root_view()).unwrap().child_views().len();
        tree.promote(star).unwrap();
        assert_eq!(tree.views.len(), views_before);
        assert_eq!(
            tree.view(tree.root_view()).unwrap().child_views().len(),
            children_before
        );
    }

    #[test]
    fn test_promote_root_is_noop() {
        let mut tree = SceneTree::build(star_dot_doc()).unwrap();
        // Root is promoted already: a no-op, never an error.
        assert_eq!(tree.promote(tree.root()), Ok(()));
    }

    #[test]
    fn test_displaced_sibling_adopts_its_view() {
        let mut tree = SceneTree::build(star_dot_doc()).unwrap();
        let star = tree.lookup("star").unwrap();
        let dot = tree.lookup("dot").unwrap();
        tree.promote(star).unwrap();
        // dot's primitive was displaced into an anonymous view; promoting it
        // binds that view instead of splitting again.
        tree.promote(dot).unwrap();
        assert!(tree.is_promoted(dot));
        let root_view = tree.view(tree.root_view()).unwrap();
        assert_eq!(root_view.child_views().len(), 2);
        assert_eq!(root_view.child_views()[1], tree.view_of(dot).unwrap());
    }

    #[test]
    fn test_primitive_after_group_is_promoted_at_build() {
        let mut store = DrawingStore::new();
        let mut index = IdentifierIndex::new();
        let below = named(&mut store, &mut index, "below", 0.0);
        let above = named(&mut store, &mut index, "above", 5.0);
        let mut root = DrawingGroup::new(None);
        root.push_primitive(below);
        root.push_group(DrawingGroup::new(Some("mid".to_string())));
        root.push_primitive(above);
        let tree = SceneTree::build(DrawingDocument::new(store, root, index)).unwrap();

        // "above" follows a group child, so it must not stay a flat entry
        // (flat entries paint before child views).
        let above_node = tree.lookup("above").unwrap();
        assert!(tree.is_promoted(above_node));
        let below_node = tree.lookup("below").unwrap();
        assert!(!tree.is_promoted(below_node));
        let root_view = tree.view(tree.root_view()).unwrap();
        assert_eq!(root_view.entries().len(), 1);
        assert_eq!(root_view.child_views().len(), 2);
    }

    #[test]
    fn test_view_bounds_cached_and_invalidated() {
        let mut tree = SceneTree::build(star_dot_doc()).unwrap();
        let rv = tree.root_view();
        let bb = tree.view_bounds(rv).unwrap();
        assert_eq!(bb.min.x, 0.0);
        assert_eq!(bb.max.x, 30.0);
        assert!(tree.view(rv).unwrap().cached_bounds().is_some());
        // Promotion mutates the entry list and must drop the cache.
        let star = tree.lookup("star").unwrap();
        tree.promote(star).unwrap();
        assert!(tree.view(rv).unwrap().cached_bounds().is_none());
        // Recomputed bounds still cover both primitives (now in child views).
        let bb = tree.view_bounds(rv).unwrap();
        assert_eq!(bb.max.x, 30.0);
    }
}
