use crate::geometry::{Geometry, Point};

/// Unweighted arithmetic mean of a shape's outline vertex samples.
///
/// Straight segments, polyline vertices, and curve control points all count
/// as single samples; curves are not subdivided, so the result is biased
/// toward vertex-dense regions and is not an area centroid. For roughly
/// regular shapes it lands close to the visual center of mass.
pub fn vertex_mean(geometry: &Geometry) -> Option<Point> {
    let samples = geometry.sample_vertices();
    if samples.is_empty() {
        return None;
    }
    let mut x = 0.0;
    let mut y = 0.0;
    for p in &samples {
        x += p.x;
        y += p.y;
    }
    let n = samples.len() as f64;
    Some(Point::new(x / n, y / n))
}
