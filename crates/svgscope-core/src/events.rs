use crate::error::SceneError;
use crate::scene::{NodeId, SceneTree};

/// Pointer button reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// A pointer event as delivered by the host. Coordinates live in whatever
/// space the host dispatches in; the scene does no hit-testing of its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub x: f64,
    pub y: f64,
    pub button: PointerButton,
}

/// Handle returned by a subscription; pass back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(pub(crate) u64);

type Handler = Box<dyn FnMut(&PointerEvent)>;

/// Per-node pointer handler lists, invoked in subscription order.
#[derive(Default)]
pub(crate) struct HandlerSet {
    pub(crate) down: Vec<(Subscription, Handler)>,
    pub(crate) up: Vec<(Subscription, Handler)>,
}

impl std::fmt::Debug for HandlerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerSet")
            .field("down", &self.down.len())
            .field("up", &self.up.len())
            .finish()
    }
}

/// Thin accessor over a node's pointer-event subscriptions. Obtaining it
/// promotes the node: events need an addressable visual target.
pub struct Events<'a> {
    tree: &'a mut SceneTree,
    node: NodeId,
}

impl SceneTree {
    pub fn events(&mut self, node: NodeId) -> Result<Events<'_>, SceneError> {
        self.promote(node)?;
        Ok(Events { tree: self, node })
    }

    /// Host-facing dispatch. Handlers run to completion on the calling
    /// thread before this returns.
    pub fn emit_pointer_down(&mut self, node: NodeId, event: &PointerEvent) {
        if let Some(set) = self.handlers.get_mut(&node) {
            for (_, handler) in set.down.iter_mut() {
                handler(event);
            }
        }
    }

    pub fn emit_pointer_up(&mut self, node: NodeId, event: &PointerEvent) {
        if let Some(set) = self.handlers.get_mut(&node) {
            for (_, handler) in set.up.iter_mut() {
                handler(event);
            }
        }
    }
}

impl Events<'_> {
    pub fn on_pointer_down(&mut self, handler: impl FnMut(&PointerEvent) + 'static) -> Subscription {
        let id = self.next_id();
        self.tree
            .handlers
            .entry(self.node)
            .or_default()
            .down
            .push((id, Box::new(handler)));
        id
    }

    pub fn on_pointer_up(&mut self, handler: impl FnMut(&PointerEvent) + 'static) -> Subscription {
        let id = self.next_id();
        self.tree
            .handlers
            .entry(self.node)
            .or_default()
            .up
            .push((id, Box::new(handler)));
        id
    }

    /// Remove a subscription from either list. Returns whether anything was
    /// removed.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let Some(set) = self.tree.handlers.get_mut(&self.node) else {
            return false;
        };
        let before = set.down.len() + set.up.len();
        set.down.retain(|(id, _)| *id != subscription);
        set.up.retain(|(id, _)| *id != subscription);
        before != set.down.len() + set.up.len()
    }

    fn next_id(&mut self) -> Subscription {
        let id = Subscription(self.tree.next_subscription);
        self.tree.next_subscription += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::drawing::{DrawingDocument, DrawingGroup, DrawingPrimitive, DrawingStore};
    use crate::geometry::Geometry;
    use crate::index::IdentifierIndex;

    fn one_prim_tree() -> SceneTree {
        let mut store = DrawingStore::new();
        let mut index = IdentifierIndex::new();
        let p = store.insert(DrawingPrimitive::new(Geometry::Rect {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
        }));
        index.insert("target", p).unwrap();
        let mut root = DrawingGroup::new(None);
        root.push_primitive(p);
        SceneTree::build(DrawingDocument::new(store, root, index)).unwrap()
    }

    fn click() -> PointerEvent {
        PointerEvent {
            x: 0.5,
            y: 0.5,
            button: PointerButton::Primary,
        }
    }

    #[test]
    fn test_subscribing_promotes() {
        let mut tree = one_prim_tree();
        let target = tree.lookup("target").unwrap();
        assert!(!tree.is_promoted(target));
        tree.events(target).unwrap();
        assert!(tree.is_promoted(target));
    }

    #[test]
    fn test_dispatch_runs_handlers_in_order() {
        let mut tree = one_prim_tree();
        let target = tree.lookup("target").unwrap();
        let hits = Rc::new(Cell::new(0));
        let h1 = Rc::clone(&hits);
        let h2 = Rc::clone(&hits);
        let mut events = tree.events(target).unwrap();
        events.on_pointer_down(move |_| h1.set(h1.get() + 1));
        events.on_pointer_down(move |_| h2.set(h2.get() * 10));
        tree.emit_pointer_down(target, &click());
        // 0 + 1, then * 10: order is subscription order.
        assert_eq!(hits.get(), 10);
        // Pointer-up list is independent.
        tree.emit_pointer_up(target, &click());
        assert_eq!(hits.get(), 10);
    }

    #[test]
    fn test_unsubscribe() {
        let mut tree = one_prim_tree();
        let target = tree.lookup("target").unwrap();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let mut events = tree.events(target).unwrap();
        let sub = events.on_pointer_up(move |_| h.set(h.get() + 1));
        assert!(tree.events(target).unwrap().unsubscribe(sub));
        assert!(!tree.events(target).unwrap().unsubscribe(sub));
        tree.emit_pointer_up(target, &click());
        assert_eq!(hits.get(), 0);
    }
}
