use svgscope_core::{DrawingPrimitive, Matrix, SceneTree, ViewId};

/// The drawing contract a host rasterizer implements. The walker pushes a
/// view's transform, draws its primitives, recurses, and pops; the surface
/// composes transforms however it likes (2D affine composition is all that
/// is ever required).
pub trait DrawSurface {
    fn push_transform(&mut self, transform: &Matrix);
    fn pop_transform(&mut self);
    fn draw_primitive(&mut self, primitive: &DrawingPrimitive);
}

/// Draw one frame of the whole scene.
pub fn render(tree: &SceneTree, surface: &mut dyn DrawSurface) {
    render_view(tree, tree.root_view(), surface);
}

/// Draw one view subtree: visible flat entries in list order, then nested
/// child views in order. List order is paint order; child views always
/// paint after the flat list.
pub fn render_view(tree: &SceneTree, view: ViewId, surface: &mut dyn DrawSurface) {
    let Some(v) = tree.view(view) else {
        return;
    };
    if !v.is_visible() {
        log::trace!("skipping hidden view {view}");
        return;
    }
    surface.push_transform(v.transform());
    for entry in v.entries() {
        if !entry.visible {
            continue;
        }
        if let Some(primitive) = tree.primitive(&entry.primitive) {
            surface.draw_primitive(primitive);
        }
    }
    for &child in v.child_views() {
        render_view(tree, child, surface);
    }
    surface.pop_transform();
}
