use serde::Serialize;

use svgscope_core::{DrawingPrimitive, Matrix, PrimitiveId};

use crate::surface::DrawSurface;

/// One recorded draw: a primitive reference plus its fully flattened
/// transform.
#[derive(Debug, Clone, Serialize)]
pub struct DisplayItem {
    pub primitive: PrimitiveId,
    pub transform: Matrix,
}

/// A recording surface: flattens the walker's transform stack and collects
/// draw items in paint order. Serializable, so a frontend canvas can
/// consume a frame directly.
#[derive(Debug, Default, Serialize)]
pub struct DisplayList {
    #[serde(skip)]
    stack: Vec<Matrix>,
    items: Vec<DisplayItem>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded items in draw order (paint order).
    pub fn items(&self) -> &[DisplayItem] {
        &self.items
    }

    pub fn clear(&mut self) {
        self.stack.clear();
        self.items.clear();
    }

    fn current(&self) -> Matrix {
        self.stack.last().copied().unwrap_or(Matrix::IDENTITY)
    }
}

impl DrawSurface for DisplayList {
    fn push_transform(&mut self, transform: &Matrix) {
        // Inner transform applies first, then whatever is already stacked.
        let flattened = transform.then(self.current());
        self.stack.push(flattened);
    }

    fn pop_transform(&mut self) {
        self.stack.pop();
    }

    fn draw_primitive(&mut self, primitive: &DrawingPrimitive) {
        self.items.push(DisplayItem {
            primitive: primitive.id,
            transform: self.current(),
        });
    }
}
