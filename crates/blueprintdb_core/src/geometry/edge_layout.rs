//! Render data for a straight connector.
//!
//! # Responsibility
//! - Turn resolved endpoints into the SVG path and label anchors.
//! - Place start/end marker glyphs on the endpoints.
//!
//! # Invariants
//! - Label offsets depend only on the relative position of the endpoints.

use crate::geometry::boundary::{EdgeEndpoints, Point};
use crate::marker::MarkerKind;

const ENDPOINT_LABEL_OFFSET_X: f64 = 15.0;
const ENDPOINT_LABEL_OFFSET_BELOW: f64 = 50.0;
const ENDPOINT_LABEL_OFFSET_ABOVE: f64 = -10.0;

/// Where and how one marker glyph is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerPlacement {
    pub kind: MarkerKind,
    /// Point the glyph's reference point is pinned to.
    pub anchor: Point,
    /// Clockwise rotation in degrees (screen coordinates).
    pub rotation_degrees: f64,
}

/// Straight-edge render data.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLayout {
    pub endpoints: EdgeEndpoints,
    /// SVG path data, `M sx,sy L tx,ty`.
    pub path: String,
    /// Center of the main edge label.
    pub label_anchor: Point,
    /// Anchor for the cardinality label near the source.
    pub source_label_anchor: Point,
    /// Anchor for the cardinality label near the target.
    pub target_label_anchor: Point,
}

impl EdgeLayout {
    pub fn from_endpoints(endpoints: EdgeEndpoints) -> Self {
        let EdgeEndpoints { source, target } = endpoints;
        let path = format!("M {},{} L {},{}", source.x, source.y, target.x, target.y);
        let label_anchor = Point::new((source.x + target.x) / 2.0, (source.y + target.y) / 2.0);

        Self {
            endpoints,
            path,
            label_anchor,
            source_label_anchor: endpoint_label_anchor(source, target),
            target_label_anchor: endpoint_label_anchor(target, source),
        }
    }

    /// Marker placements for the non-empty markers of this edge.
    ///
    /// Both ends share the connector angle; start glyphs are drawn mirrored in
    /// the catalogue, so no extra flip is applied here.
    pub fn marker_placements(
        &self,
        start: Option<MarkerKind>,
        end: Option<MarkerKind>,
    ) -> Vec<MarkerPlacement> {
        let rotation_degrees = self.endpoints.angle_degrees();
        let mut placements = Vec::with_capacity(2);
        if let Some(kind) = start.filter(|kind| kind.has_glyph()) {
            placements.push(MarkerPlacement {
                kind,
                anchor: self.endpoints.source,
                rotation_degrees,
            });
        }
        if let Some(kind) = end.filter(|kind| kind.has_glyph()) {
            placements.push(MarkerPlacement {
                kind,
                anchor: self.endpoints.target,
                rotation_degrees,
            });
        }
        placements
    }
}

fn endpoint_label_anchor(at: Point, other: Point) -> Point {
    let dx = if other.x > at.x {
        ENDPOINT_LABEL_OFFSET_X
    } else {
        -ENDPOINT_LABEL_OFFSET_X
    };
    let dy = if other.y > at.y {
        ENDPOINT_LABEL_OFFSET_BELOW
    } else {
        ENDPOINT_LABEL_OFFSET_ABOVE
    };
    Point::new(at.x + dx, at.y + dy)
}

#[cfg(test)]
mod tests {
    use super::EdgeLayout;
    use crate::geometry::boundary::{EdgeEndpoints, Point};
    use crate::marker::MarkerKind;

    fn horizontal() -> EdgeLayout {
        EdgeLayout::from_endpoints(EdgeEndpoints {
            source: Point::new(50.0, 0.0),
            target: Point::new(250.0, 0.0),
        })
    }

    #[test]
    fn path_and_midpoint_follow_endpoints() {
        let layout = horizontal();
        assert_eq!(layout.path, "M 50,0 L 250,0");
        assert_eq!(layout.label_anchor, Point::new(150.0, 0.0));
    }

    #[test]
    fn endpoint_labels_are_pushed_toward_the_other_end() {
        let layout = horizontal();
        assert_eq!(layout.source_label_anchor, Point::new(65.0, -10.0));
        assert_eq!(layout.target_label_anchor, Point::new(235.0, -10.0));

        let vertical = EdgeLayout::from_endpoints(EdgeEndpoints {
            source: Point::new(0.0, 0.0),
            target: Point::new(0.0, 100.0),
        });
        assert_eq!(vertical.source_label_anchor, Point::new(-15.0, 50.0));
        assert_eq!(vertical.target_label_anchor, Point::new(-15.0, 90.0));
    }

    #[test]
    fn none_markers_are_not_placed() {
        let layout = horizontal();
        let placements =
            layout.marker_placements(Some(MarkerKind::None), Some(MarkerKind::ZeroManyEnd));
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].kind, MarkerKind::ZeroManyEnd);
        assert_eq!(placements[0].anchor, Point::new(250.0, 0.0));
        assert_eq!(placements[0].rotation_degrees, 0.0);
    }
}
