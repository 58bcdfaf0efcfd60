//! # SvgScope Render
//!
//! The render walker over composed views and the `DrawSurface` contract a
//! host rasterizer implements. Ships a serializable `DisplayList` surface
//! that flattens the transform stack into draw items, usable both as a
//! frontend-consumable frame description and as the assertion vehicle for
//! paint-order tests.

pub mod display_list;
pub mod surface;

pub use display_list::{DisplayItem, DisplayList};
pub use surface::{render, render_view, DrawSurface};
