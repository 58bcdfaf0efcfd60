use crate::error::SceneError;
use crate::geometry::Point;
use crate::pivot;
use crate::scene::{NodeId, SceneTree};
use crate::transform::Matrix;
use crate::view::ViewId;

/// Independent scale / rotation / translation / pivot components backing one
/// view's transform.
///
/// Constructed once per node by decomposing the view's existing matrix; from
/// then on it is the sole writer of that matrix. Mutating one component
/// never perturbs the stored values of the others.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformBinding {
    pub(crate) scale_x: f64,
    pub(crate) scale_y: f64,
    pub(crate) rotation_deg: f64,
    pub(crate) translate_x: f64,
    pub(crate) translate_y: f64,
    /// Center shared by the scale and rotation components.
    pub(crate) pivot: Point,
}

impl TransformBinding {
    pub(crate) const IDENTITY: TransformBinding = TransformBinding {
        scale_x: 1.0,
        scale_y: 1.0,
        rotation_deg: 0.0,
        translate_x: 0.0,
        translate_y: 0.0,
        pivot: Point::ZERO,
    };

    /// Decompose a matrix assuming no shear: column magnitudes give the
    /// scale, the rotated "up" vector gives the angle, the offset gives the
    /// translation. For matrices containing shear this is an approximation;
    /// the shear itself is discarded.
    pub(crate) fn from_matrix(m: &Matrix) -> Self {
        let up = m.apply_vector(Point::new(0.0, 1.0));
        Self {
            scale_x: (m.m11 * m.m11 + m.m21 * m.m21).sqrt(),
            scale_y: (m.m12 * m.m12 + m.m22 * m.m22).sqrt(),
            rotation_deg: (-up.x).atan2(up.y).to_degrees(),
            translate_x: m.dx,
            translate_y: m.dy,
            pivot: Point::ZERO,
        }
    }

    /// The strict composition scale → rotate → translate. Scale and
    /// rotation share the pivot center; translation is pivot-independent.
    pub(crate) fn compose(&self) -> Matrix {
        Matrix::scale_about(self.scale_x, self.scale_y, self.pivot)
            .then(Matrix::rotation_deg_about(self.rotation_deg, self.pivot))
            .then(Matrix::translation(self.translate_x, self.translate_y))
    }
}

/// Mutable access to one node's transform components. Obtained through
/// [`SceneTree::transform`], which promotes the node and constructs the
/// binding on first use.
pub struct TransformHandle<'a> {
    tree: &'a mut SceneTree,
    node: NodeId,
    view: ViewId,
}

impl SceneTree {
    /// Transform access for a node. Promotes a flat node first; the binding
    /// is created at most once, decomposing whatever transform the view
    /// carried (its import-time group transform, or identity).
    ///
    /// After this call the binding owns the view's transform; writing the
    /// view transform directly is undefined.
    pub fn transform(&mut self, node: NodeId) -> Result<TransformHandle<'_>, SceneError> {
        self.promote(node)?;
        let view = self
            .view_of(node)
            .ok_or(SceneError::InvalidPromotionTarget)?;

        let needs_binding = self
            .nodes
            .get(&node)
            .is_some_and(|n| n.binding.is_none());
        if needs_binding {
            let current = self
                .views
                .get(&view)
                .map(|v| *v.transform())
                .unwrap_or(Matrix::IDENTITY);
            let mut binding = TransformBinding::from_matrix(&current);
            binding.pivot = self
                .view_bounds(view)
                .map(|bb| bb.center())
                .unwrap_or(Point::ZERO);
            let composed = binding.compose();
            if let Some(v) = self.views.get_mut(&view) {
                v.set_transform(composed);
            }
            if let Some(n) = self.nodes.get_mut(&node) {
                n.binding = Some(binding);
            }
        }
        Ok(TransformHandle {
            tree: self,
            node,
            view,
        })
    }
}

impl TransformHandle<'_> {
    fn read(&self) -> TransformBinding {
        self.tree
            .nodes
            .get(&self.node)
            .and_then(|n| n.binding)
            .unwrap_or(TransformBinding::IDENTITY)
    }

    fn update(&mut self, f: impl FnOnce(&mut TransformBinding)) {
        let composed = match self
            .tree
            .nodes
            .get_mut(&self.node)
            .and_then(|n| n.binding.as_mut())
        {
            Some(b) => {
                f(b);
                b.compose()
            }
            None => return,
        };
        if let Some(v) = self.tree.views.get_mut(&self.view) {
            v.set_transform(composed);
        }
    }

    pub fn rotation_deg(&self) -> f64 {
        self.read().rotation_deg
    }

    pub fn set_rotation_deg(&mut self, degrees: f64) {
        self.update(|b| b.rotation_deg = degrees);
    }

    pub fn scale(&self) -> (f64, f64) {
        let b = self.read();
        (b.scale_x, b.scale_y)
    }

    pub fn set_scale(&mut self, sx: f64, sy: f64) {
        self.update(|b| {
            b.scale_x = sx;
            b.scale_y = sy;
        });
    }

    pub fn x(&self) -> f64 {
        self.read().translate_x
    }

    pub fn set_x(&mut self, x: f64) {
        self.update(|b| b.translate_x = x);
    }

    pub fn y(&self) -> f64 {
        self.read().translate_y
    }

    pub fn set_y(&mut self, y: f64) {
        self.update(|b| b.translate_y = y);
    }

    pub fn pivot(&self) -> Point {
        self.read().pivot
    }

    /// Write-through to the center shared by scale and rotation.
    pub fn set_pivot(&mut self, pivot: Point) {
        self.update(|b| b.pivot = pivot);
    }

    /// Place the pivot at the center of the view content's bounding box
    /// (the default placement).
    pub fn pivot_to_bounds_center(&mut self) {
        if let Some(center) = self.tree.view_bounds(self.view).map(|bb| bb.center()) {
            self.update(|b| b.pivot = center);
        }
    }

    /// Place the pivot at the vertex mean of the wrapped primitive's
    /// outline. Only defined when the view wraps exactly one primitive;
    /// returns `false` (and changes nothing) on group views, so callers can
    /// detect the no-op instead of guessing.
    pub fn pivot_to_mass_center(&mut self) -> bool {
        let Some(pid) = self
            .tree
            .views
            .get(&self.view)
            .and_then(|v| v.single_primitive())
        else {
            return false;
        };
        let Some(center) = self
            .tree
            .store
            .get(&pid)
            .and_then(|p| pivot::vertex_mean(&p.geometry))
        else {
            return false;
        };
        self.update(|b| b.pivot = center);
        true
    }

    /// The full composed matrix currently applied to the view.
    pub fn composed(&self) -> Matrix {
        self.read().compose()
    }
}
