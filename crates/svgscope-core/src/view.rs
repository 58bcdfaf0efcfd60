use uuid::Uuid;

use crate::drawing::PrimitiveId;
use crate::geometry::BBox;
use crate::transform::Matrix;

/// Unique composed view identifier.
pub type ViewId = Uuid;

/// One slot in a view's flat primitive list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewEntry {
    pub primitive: PrimitiveId,
    pub visible: bool,
}

/// An ordered, mutable render layer: a flat list of primitives painted in
/// list order, then nested child views painted after the list, under one
/// active transform.
#[derive(Debug)]
pub struct ComposedView {
    entries: Vec<ViewEntry>,
    children: Vec<ViewId>,
    transform: Matrix,
    visible: bool,
    bounds_cache: Option<BBox>,
}

impl ComposedView {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            children: Vec::new(),
            transform: Matrix::IDENTITY,
            visible: true,
            bounds_cache: None,
        }
    }

    pub fn with_transform(mut self, transform: Matrix) -> Self {
        self.transform = transform;
        self
    }

    /// Entries in paint order (earlier paints first, visually below).
    pub fn entries(&self) -> &[ViewEntry] {
        &self.entries
    }

    pub fn child_views(&self) -> &[ViewId] {
        &self.children
    }

    pub fn transform(&self) -> &Matrix {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: Matrix) {
        self.transform = transform;
    }

    /// Whole-view show/hide flag; stands in for per-primitive visibility on
    /// group-level views that hold no primitive of their own.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn push_primitive(&mut self, primitive: PrimitiveId) {
        self.push_entry(ViewEntry {
            primitive,
            visible: true,
        });
    }

    pub fn push_entry(&mut self, entry: ViewEntry) {
        self.entries.push(entry);
        self.bounds_cache = None;
    }

    pub fn push_child(&mut self, child: ViewId) {
        self.children.push(child);
        self.bounds_cache = None;
    }

    /// Remove the first entry holding `primitive`. Silently does nothing if
    /// the primitive is not in this view.
    pub fn remove_primitive(&mut self, primitive: &PrimitiveId) {
        if let Some(i) = self.position_of(primitive) {
            self.entries.remove(i);
            self.bounds_cache = None;
        }
    }

    /// Remove and return `target` together with every entry painted above it
    /// in this list, preserving relative order. Returns an empty vec if the
    /// target is not here.
    pub fn split_off_upward(&mut self, target: &PrimitiveId) -> Vec<ViewEntry> {
        match self.position_of(target) {
            Some(i) => {
                self.bounds_cache = None;
                self.entries.split_off(i)
            }
            None => Vec::new(),
        }
    }

    pub fn contains_primitive(&self, primitive: &PrimitiveId) -> bool {
        self.position_of(primitive).is_some()
    }

    /// The wrapped primitive, but only when this view holds exactly one.
    pub fn single_primitive(&self) -> Option<PrimitiveId> {
        match self.entries.as_slice() {
            [only] => Some(only.primitive),
            _ => None,
        }
    }

    pub fn entry_visibility(&self, primitive: &PrimitiveId) -> Option<bool> {
        self.position_of(primitive).map(|i| self.entries[i].visible)
    }

    pub fn set_entry_visibility(&mut self, primitive: &PrimitiveId, visible: bool) {
        if let Some(i) = self.position_of(primitive) {
            self.entries[i].visible = visible;
        }
    }

    /// Flip one entry's flag; returns the new value, or `false` if the
    /// primitive is not in this view.
    pub fn toggle_entry_visibility(&mut self, primitive: &PrimitiveId) -> bool {
        match self.position_of(primitive) {
            Some(i) => {
                self.entries[i].visible = !self.entries[i].visible;
                self.entries[i].visible
            }
            None => false,
        }
    }

    pub(crate) fn cached_bounds(&self) -> Option<BBox> {
        self.bounds_cache
    }

    pub(crate) fn store_bounds(&mut self, bounds: BBox) {
        self.bounds_cache = Some(bounds);
    }

    pub(crate) fn invalidate_bounds(&mut self) {
        self.bounds_cache = None;
    }

    fn position_of(&self, primitive: &PrimitiveId) -> Option<usize> {
        self.entries.iter().position(|e| e.primitive == *primitive)
    }
}

impl Default for ComposedView {
    fn default() -> Self {
        Self::new()
    }
}
