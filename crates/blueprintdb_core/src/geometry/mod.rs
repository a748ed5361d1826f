//! Edge geometry for diagram rendering.
//!
//! # Responsibility
//! - Compute where a straight connector meets each node outline.
//! - Derive per-edge render data (path, label anchors, marker placement).
//!
//! # Invariants
//! - All functions are pure closed-form arithmetic; no iteration or search.
//! - Degenerate node dimensions are reported, never divided by.
//!
//! # See also
//! - `crate::marker` for the glyph catalogue rotated by these results.

pub mod boundary;
pub mod edge_layout;
pub mod sizing;

pub use boundary::{
    boundary_point, resolve_edge_endpoints, EdgeEndpoints, GeometryError, GeometryResult,
    NodeBounds, Point, ShapeKind,
};
pub use edge_layout::{EdgeLayout, MarkerPlacement};
pub use sizing::{inheritance_diameter, label_size};
