//! Node outline intersection.
//!
//! # Responsibility
//! - Resolve the boundary point of a node on the ray toward another point.
//! - Resolve both connector endpoints of an edge.
//!
//! # Invariants
//! - Returned points lie on the node outline (rectangle edge, circle
//!   circumference or diamond edge) within floating-point tolerance.
//! - A zero-length direction returns the node center unchanged.
//! - Width and height must be finite and strictly positive.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type GeometryResult<T> = Result<T, GeometryError>;

/// Cartesian point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Outline used when intersecting a node with a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// Axis-aligned box.
    Rectangle,
    /// Circle with radius `min(width, height) / 2`.
    Circle,
    /// Square rotated 45 degrees, inscribed in the width/height box.
    Diamond,
}

/// Read-only node description handed in by the rendering shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeBounds {
    pub id: String,
    /// Center of the node in canvas coordinates.
    pub center: Point,
    pub width: f64,
    pub height: f64,
    pub shape: ShapeKind,
}

impl NodeBounds {
    pub fn new(
        id: impl Into<String>,
        center: Point,
        width: f64,
        height: f64,
        shape: ShapeKind,
    ) -> Self {
        Self {
            id: id.into(),
            center,
            width,
            height,
            shape,
        }
    }

    /// Builds bounds from a top-left corner, the way the canvas positions nodes.
    pub fn from_top_left(
        id: impl Into<String>,
        top_left: Point,
        width: f64,
        height: f64,
        shape: ShapeKind,
    ) -> Self {
        let center = Point::new(top_left.x + width / 2.0, top_left.y + height / 2.0);
        Self::new(id, center, width, height, shape)
    }

    /// Checks dimensions before any division happens.
    pub fn validate(&self) -> GeometryResult<()> {
        let dims_ok = self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0;
        let center_ok = self.center.x.is_finite() && self.center.y.is_finite();
        if dims_ok && center_ok {
            Ok(())
        } else {
            Err(GeometryError::InvalidGeometry {
                node_id: self.id.clone(),
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Connector endpoints on the source and target outlines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeEndpoints {
    pub source: Point,
    pub target: Point,
}

impl EdgeEndpoints {
    /// Direction of the connector in degrees, measured from +x toward +y.
    ///
    /// Marker glyphs are rotated by this angle. Degenerate edges yield 0.
    pub fn angle_degrees(&self) -> f64 {
        let dx = self.target.x - self.source.x;
        let dy = self.target.y - self.source.y;
        if dx == 0.0 && dy == 0.0 {
            return 0.0;
        }
        dy.atan2(dx).to_degrees()
    }

    /// Visible connector length between the two outlines.
    pub fn length(&self) -> f64 {
        self.source.distance_to(self.target)
    }
}

/// Geometry contract violation.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Node width/height is zero, negative or not finite.
    InvalidGeometry {
        node_id: String,
        width: f64,
        height: f64,
    },
}

impl Display for GeometryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidGeometry {
                node_id,
                width,
                height,
            } => write!(
                f,
                "invalid geometry for node `{node_id}`: width={width} height={height}"
            ),
        }
    }
}

impl Error for GeometryError {}

/// Returns the point where the ray from `node.center` toward `toward` leaves the node.
///
/// # Errors
/// - `InvalidGeometry` when the node has degenerate dimensions.
pub fn boundary_point(node: &NodeBounds, toward: Point) -> GeometryResult<Point> {
    node.validate()?;

    let dx = toward.x - node.center.x;
    let dy = toward.y - node.center.y;
    if dx == 0.0 && dy == 0.0 {
        return Ok(node.center);
    }

    let half_w = node.width / 2.0;
    let half_h = node.height / 2.0;
    let (ox, oy) = match node.shape {
        ShapeKind::Rectangle => intersect_rect(half_w, half_h, dx, dy),
        ShapeKind::Circle => intersect_circle(half_w.min(half_h), dx, dy),
        ShapeKind::Diamond => intersect_diamond(half_w, half_h, dx, dy),
    };

    Ok(Point::new(node.center.x + ox, node.center.y + oy))
}

/// Resolves both connector endpoints, each oriented toward the other node's center.
///
/// # Errors
/// - `InvalidGeometry` when either node has degenerate dimensions.
pub fn resolve_edge_endpoints(
    source: &NodeBounds,
    target: &NodeBounds,
) -> GeometryResult<EdgeEndpoints> {
    Ok(EdgeEndpoints {
        source: boundary_point(source, target.center)?,
        target: boundary_point(target, source.center)?,
    })
}

// Offsets are relative to the center; (dx, dy) is non-zero.
fn intersect_rect(half_w: f64, half_h: f64, dx: f64, dy: f64) -> (f64, f64) {
    if dy.abs() * half_w > dx.abs() * half_h {
        let h = if dy < 0.0 { -half_h } else { half_h };
        (h * dx / dy, h)
    } else {
        let w = if dx < 0.0 { -half_w } else { half_w };
        (w, w * dy / dx)
    }
}

fn intersect_circle(radius: f64, dx: f64, dy: f64) -> (f64, f64) {
    let dist = dx.hypot(dy);
    (dx / dist * radius, dy / dist * radius)
}

fn intersect_diamond(half_w: f64, half_h: f64, dx: f64, dy: f64) -> (f64, f64) {
    let scale = 1.0 / (dx.abs() / half_w + dy.abs() / half_h);
    (dx * scale, dy * scale)
}

#[cfg(test)]
mod tests {
    use super::{
        boundary_point, resolve_edge_endpoints, EdgeEndpoints, GeometryError, NodeBounds, Point,
        ShapeKind,
    };

    const EPS: f64 = 1e-9;

    fn rect(id: &str, x: f64, y: f64, w: f64, h: f64) -> NodeBounds {
        NodeBounds::new(id, Point::new(x, y), w, h, ShapeKind::Rectangle)
    }

    #[test]
    fn steep_direction_exits_through_top_or_bottom() {
        let node = rect("a", 0.0, 0.0, 100.0, 50.0);
        let below = boundary_point(&node, Point::new(10.0, 200.0)).unwrap();
        assert!((below.y - 25.0).abs() < EPS);
        assert!((below.x - 1.25).abs() < EPS);

        let above = boundary_point(&node, Point::new(0.0, -90.0)).unwrap();
        assert_eq!(above, Point::new(0.0, -25.0));
    }

    #[test]
    fn corner_direction_hits_corner_exactly() {
        let node = rect("a", 0.0, 0.0, 100.0, 50.0);
        let corner = boundary_point(&node, Point::new(200.0, 100.0)).unwrap();
        assert!((corner.x - 50.0).abs() < EPS);
        assert!((corner.y - 25.0).abs() < EPS);
    }

    #[test]
    fn diamond_point_lies_on_rhombus_edge() {
        let node = NodeBounds::new("d", Point::new(10.0, 10.0), 60.0, 60.0, ShapeKind::Diamond);
        let p = boundary_point(&node, Point::new(110.0, 60.0)).unwrap();
        let norm = (p.x - 10.0).abs() / 30.0 + (p.y - 10.0).abs() / 30.0;
        assert!((norm - 1.0).abs() < EPS);
    }

    #[test]
    fn circle_uses_smaller_half_dimension_as_radius() {
        let node = NodeBounds::new("c", Point::new(0.0, 0.0), 80.0, 40.0, ShapeKind::Circle);
        let p = boundary_point(&node, Point::new(0.0, 500.0)).unwrap();
        assert_eq!(p, Point::new(0.0, 20.0));
    }

    #[test]
    fn coincident_centers_return_centers() {
        let a = rect("a", 5.0, 5.0, 10.0, 10.0);
        let b = rect("b", 5.0, 5.0, 30.0, 30.0);
        let endpoints = resolve_edge_endpoints(&a, &b).unwrap();
        assert_eq!(endpoints.source, Point::new(5.0, 5.0));
        assert_eq!(endpoints.target, Point::new(5.0, 5.0));
        assert_eq!(endpoints.angle_degrees(), 0.0);
    }

    #[test]
    fn zero_area_node_is_rejected() {
        let flat = rect("flat", 0.0, 0.0, 100.0, 0.0);
        let other = rect("b", 100.0, 0.0, 10.0, 10.0);
        let err = resolve_edge_endpoints(&other, &flat).unwrap_err();
        assert_eq!(
            err,
            GeometryError::InvalidGeometry {
                node_id: "flat".to_string(),
                width: 100.0,
                height: 0.0,
            }
        );
    }

    #[test]
    fn nan_dimension_is_rejected() {
        let node = rect("n", 0.0, 0.0, f64::NAN, 10.0);
        assert!(boundary_point(&node, Point::new(1.0, 1.0)).is_err());
    }

    #[test]
    fn angle_follows_screen_axes() {
        let down = EdgeEndpoints {
            source: Point::new(0.0, 0.0),
            target: Point::new(0.0, 10.0),
        };
        assert!((down.angle_degrees() - 90.0).abs() < EPS);

        let left = EdgeEndpoints {
            source: Point::new(0.0, 0.0),
            target: Point::new(-10.0, 0.0),
        };
        assert!((left.angle_degrees() - 180.0).abs() < EPS);
    }

    #[test]
    fn from_top_left_shifts_to_center() {
        let node = NodeBounds::from_top_left(
            "t",
            Point::new(100.0, 150.0),
            120.0,
            80.0,
            ShapeKind::Rectangle,
        );
        assert_eq!(node.center, Point::new(160.0, 190.0));
    }
}
