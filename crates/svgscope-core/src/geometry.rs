use serde::{Deserialize, Serialize};

/// A 2D point in user-space coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min: Point,
    pub max: Point,
}

impl BBox {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: &[Point]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self {
            min: Point::new(min_x, min_y),
            max: Point::new(max_x, max_y),
        })
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    pub fn union(&self, other: &BBox) -> Self {
        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }
}

/// A single path segment. Curve control points are kept verbatim; curves are
/// never subdivided, so any vertex sampling over a path treats control points
/// as plain point samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathSegment {
    LineTo(Point),
    CubicTo { c1: Point, c2: Point, to: Point },
    QuadTo { c: Point, to: Point },
    Close,
}

/// One contiguous run of segments starting at a move-to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subpath {
    pub start: Point,
    pub segments: Vec<PathSegment>,
}

impl Subpath {
    pub fn new(start: Point) -> Self {
        Self {
            start,
            segments: Vec::new(),
        }
    }
}

/// The shape of a drawing primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
    },
    Path {
        subpaths: Vec<Subpath>,
    },
    Polygon {
        vertices: Vec<Point>,
        closed: bool,
    },
}

impl Geometry {
    /// Outline vertex samples of this shape.
    ///
    /// For paths this is every segment endpoint and control point; for an
    /// ellipse the four axis extrema. The samples bound the true outline
    /// (Bezier convex-hull property) but are not points *on* the curve.
    pub fn sample_vertices(&self) -> Vec<Point> {
        match self {
            Geometry::Rect {
                x,
                y,
                width,
                height,
            } => vec![
                Point::new(*x, *y),
                Point::new(x + width, *y),
                Point::new(x + width, y + height),
                Point::new(*x, y + height),
            ],
            Geometry::Ellipse { cx, cy, rx, ry } => vec![
                Point::new(cx - rx, *cy),
                Point::new(cx + rx, *cy),
                Point::new(*cx, cy - ry),
                Point::new(*cx, cy + ry),
            ],
            Geometry::Path { subpaths } => {
                let mut points = Vec::new();
                for sp in subpaths {
                    points.push(sp.start);
                    for seg in &sp.segments {
                        match seg {
                            PathSegment::LineTo(p) => points.push(*p),
                            PathSegment::CubicTo { c1, c2, to } => {
                                points.push(*c1);
                                points.push(*c2);
                                points.push(*to);
                            }
                            PathSegment::QuadTo { c, to } => {
                                points.push(*c);
                                points.push(*to);
                            }
                            PathSegment::Close => {}
                        }
                    }
                }
                points
            }
            Geometry::Polygon { vertices, .. } => vertices.clone(),
        }
    }

    /// Bounding box of the outline samples. For curved paths this is the
    /// control-polygon box, which contains the true extent.
    pub fn bbox(&self) -> Option<BBox> {
        match self {
            Geometry::Rect {
                x,
                y,
                width,
                height,
            } => Some(BBox::new(
                Point::new(*x, *y),
                Point::new(x + width, y + height),
            )),
            Geometry::Ellipse { cx, cy, rx, ry } => Some(BBox::new(
                Point::new(cx - rx, cy - ry),
                Point::new(cx + rx, cy + ry),
            )),
            _ => BBox::from_points(&self.sample_vertices()),
        }
    }
}
