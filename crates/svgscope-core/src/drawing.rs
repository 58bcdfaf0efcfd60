use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{BBox, Geometry};
use crate::index::IdentifierIndex;
use crate::paint::{Paint, Stroke};
use crate::transform::Matrix;

/// Unique drawing primitive identifier.
pub type PrimitiveId = Uuid;

/// An atomic renderable unit: geometry plus paint.
///
/// The geometry is fixed after import; fill and stroke stay mutable in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawingPrimitive {
    pub id: PrimitiveId,
    pub geometry: Geometry,
    pub fill: Option<Paint>,
    pub stroke: Option<Stroke>,
}

impl DrawingPrimitive {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: Uuid::new_v4(),
            geometry,
            fill: None,
            stroke: None,
        }
    }

    pub fn with_fill(mut self, fill: Paint) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn bbox(&self) -> Option<BBox> {
        self.geometry.bbox()
    }
}

/// A child slot in a drawing group: either a primitive reference or a
/// nested group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DrawingChild {
    Primitive(PrimitiveId),
    Group(DrawingGroup),
}

/// An ordered container of drawings with its own transform. Child order is
/// paint order. The structure never changes after import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawingGroup {
    pub name: Option<String>,
    pub transform: Matrix,
    pub children: Vec<DrawingChild>,
}

impl DrawingGroup {
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            transform: Matrix::IDENTITY,
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Matrix) -> Self {
        self.transform = transform;
        self
    }

    pub fn push_primitive(&mut self, id: PrimitiveId) {
        self.children.push(DrawingChild::Primitive(id));
    }

    pub fn push_group(&mut self, group: DrawingGroup) {
        self.children.push(DrawingChild::Group(group));
    }
}

/// Arena of all primitives in a document, indexed by ID.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DrawingStore {
    primitives: HashMap<PrimitiveId, DrawingPrimitive>,
}

impl DrawingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, primitive: DrawingPrimitive) -> PrimitiveId {
        let id = primitive.id;
        self.primitives.insert(id, primitive);
        id
    }

    pub fn get(&self, id: &PrimitiveId) -> Option<&DrawingPrimitive> {
        self.primitives.get(id)
    }

    pub fn get_mut(&mut self, id: &PrimitiveId) -> Option<&mut DrawingPrimitive> {
        self.primitives.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

/// Complete importer output: the primitive arena, the drawing tree, and the
/// identifier index.
#[derive(Debug)]
pub struct DrawingDocument {
    pub store: DrawingStore,
    pub root: DrawingGroup,
    pub index: IdentifierIndex,
}

impl DrawingDocument {
    pub fn new(store: DrawingStore, root: DrawingGroup, index: IdentifierIndex) -> Self {
        Self { store, root, index }
    }
}
