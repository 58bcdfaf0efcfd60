//! # SvgScope Core
//!
//! Addressable scene graph over an imported vector drawing: identifier
//! lookup, composed render views, paint-order-preserving promotion,
//! decomposed transform bindings, and appearance/event facades.
//!
//! This crate is the heart of the SvgScope explorer.

pub mod appearance;
pub mod binding;
pub mod drawing;
pub mod error;
pub mod events;
pub mod geometry;
pub mod index;
pub mod paint;
pub mod pivot;
pub mod scene;
pub mod transform;
pub mod view;

pub use appearance::Appearance;
pub use binding::TransformHandle;
pub use drawing::{
    DrawingChild, DrawingDocument, DrawingGroup, DrawingPrimitive, DrawingStore, PrimitiveId,
};
pub use error::SceneError;
pub use events::{Events, PointerButton, PointerEvent, Subscription};
pub use geometry::{BBox, Geometry, PathSegment, Point, Subpath};
pub use index::IdentifierIndex;
pub use paint::{Color, Paint, Stroke};
pub use scene::{NodeId, NodeState, SceneNode, SceneTree};
pub use transform::Matrix;
pub use view::{ComposedView, ViewEntry, ViewId};
