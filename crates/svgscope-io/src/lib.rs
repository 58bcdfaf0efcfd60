//! # SvgScope IO
//!
//! Import of SVG markup into drawing documents. The reader speaks a
//! practical subset of SVG (groups, basic shapes, path data, transforms and
//! solid paint) and produces the primitive arena, drawing tree and
//! identifier index the scene layer builds from.

pub mod error;
pub mod pathdata;
pub mod svg;

pub use error::ImportError;
pub use svg::{read_svg_file, read_svg_str};
