//! Node and edge model for entity-relationship diagrams.
//!
//! # Responsibility
//! - Mirror the persisted JSON shape of nodes and edges.
//! - Map node kinds to intersection shapes and measured bounds.
//! - Apply the editor's mutations (add, connect, relabel, remove).
//!
//! # Invariants
//! - Unknown JSON fields are kept in `extra` and written back verbatim.
//! - `connect` never creates two edges with the same endpoints and handles.
//! - Removing a node removes every edge touching it.

use crate::geometry::{
    resolve_edge_endpoints, EdgeLayout, GeometryError, NodeBounds, Point, ShapeKind,
};
use crate::marker::{EdgeMarker, MarkerKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const NEW_NODE_LABEL: &str = "text";

/// Editor node category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Entity box with attribute rows.
    Entity,
    /// Relational table box with typed attribute rows.
    Relation,
    /// Diamond joining entities.
    Relationship,
    /// Small circle marking a specialization.
    Inheritance,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entity => "entity",
            Self::Relation => "relation",
            Self::Relationship => "relationship",
            Self::Inheritance => "inheritance",
        }
    }

    /// Outline used to terminate connectors on this kind of node.
    pub fn shape(self) -> ShapeKind {
        match self {
            Self::Entity | Self::Relation => ShapeKind::Rectangle,
            Self::Relationship => ShapeKind::Diamond,
            Self::Inheritance => ShapeKind::Circle,
        }
    }

    /// Whether nodes of this kind carry attribute rows.
    pub fn has_attributes(self) -> bool {
        matches!(self, Self::Entity | Self::Relation)
    }
}

/// Key role of an attribute row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeKind {
    PrimaryKey,
    ForeignKey,
    NonKey,
}

/// One attribute row of an entity or relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub label: String,
    #[serde(rename = "type")]
    pub kind: AttributeKind,
    #[serde(rename = "dataType", default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

impl Attribute {
    pub fn new(label: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            label: label.into(),
            kind,
            data_type: None,
        }
    }
}

/// Label and attribute payload of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<Attribute>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Rendered size reported by the shell after layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

/// Diagram node as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Top-left corner in canvas coordinates.
    pub position: Point,
    pub data: NodeData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measured: Option<Dimensions>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DiagramNode {
    /// Creates a node the way the editor does on a pane click.
    ///
    /// # Invariants
    /// - `id` is a fresh UUID v4.
    /// - Entity/relation nodes start with an empty attribute list.
    pub fn new(kind: NodeKind, position: Point) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            position,
            data: NodeData {
                label: NEW_NODE_LABEL.to_string(),
                attributes: kind.has_attributes().then(Vec::new),
                extra: Map::new(),
            },
            measured: None,
            extra: Map::new(),
        }
    }

    pub fn shape(&self) -> ShapeKind {
        self.kind.shape()
    }

    /// Intersection bounds, available once the shell has measured the node.
    pub fn bounds(&self) -> Option<NodeBounds> {
        self.measured.map(|size| {
            NodeBounds::from_top_left(
                self.id.clone(),
                self.position,
                size.width,
                size.height,
                self.shape(),
            )
        })
    }
}

/// Label payload of an edge.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeData {
    #[serde(default)]
    pub label: String,
    #[serde(rename = "sourceLabel", default, skip_serializing_if = "Option::is_none")]
    pub source_label: Option<String>,
    #[serde(rename = "targetLabel", default, skip_serializing_if = "Option::is_none")]
    pub target_label: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Diagram edge as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "sourceHandle", default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(rename = "targetHandle", default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    #[serde(rename = "markerStart", default, skip_serializing_if = "Option::is_none")]
    pub marker_start: Option<EdgeMarker>,
    #[serde(rename = "markerEnd", default, skip_serializing_if = "Option::is_none")]
    pub marker_end: Option<EdgeMarker>,
    #[serde(default)]
    pub data: EdgeData,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DiagramEdge {
    fn same_connection(&self, other: &DiagramEdge) -> bool {
        self.source == other.source
            && self.target == other.target
            && self.source_handle == other.source_handle
            && self.target_handle == other.target_handle
    }
}

/// Full diagram content: the `{nodes, edges}` pair.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Diagram {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
}

/// Editing error on an in-memory diagram.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagramError {
    UnknownNode(String),
    UnknownEdge(String),
    DuplicateEdge(String),
    /// Node exists but the shell has not reported its size yet.
    Unmeasured(String),
    Geometry(GeometryError),
}

impl Display for DiagramError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownNode(id) => write!(f, "node not found: {id}"),
            Self::UnknownEdge(id) => write!(f, "edge not found: {id}"),
            Self::DuplicateEdge(id) => write!(f, "edge already exists: {id}"),
            Self::Unmeasured(id) => write!(f, "node has not been measured: {id}"),
            Self::Geometry(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DiagramError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Geometry(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GeometryError> for DiagramError {
    fn from(value: GeometryError) -> Self {
        Self::Geometry(value)
    }
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&DiagramNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&DiagramEdge> {
        self.edges.iter().find(|edge| edge.id == id)
    }

    /// Adds a fresh node of `kind` at `position` and returns its id.
    pub fn add_node(&mut self, kind: NodeKind, position: Point) -> String {
        let node = DiagramNode::new(kind, position);
        let id = node.id.clone();
        self.nodes.push(node);
        id
    }

    /// Connects two nodes and returns the new edge id.
    ///
    /// Edge ids follow `xy-edge__<source><sourceHandle>-<target><targetHandle>`.
    ///
    /// # Errors
    /// - `UnknownNode` when either endpoint is missing.
    /// - `DuplicateEdge` when an identical connection already exists.
    pub fn connect(
        &mut self,
        source: &str,
        target: &str,
        source_handle: Option<&str>,
        target_handle: Option<&str>,
    ) -> Result<String, DiagramError> {
        for id in [source, target] {
            if self.node(id).is_none() {
                return Err(DiagramError::UnknownNode(id.to_string()));
            }
        }

        let id = format!(
            "xy-edge__{source}{}-{target}{}",
            source_handle.unwrap_or(""),
            target_handle.unwrap_or("")
        );
        let edge = DiagramEdge {
            id: id.clone(),
            source: source.to_string(),
            target: target.to_string(),
            source_handle: source_handle.map(str::to_string),
            target_handle: target_handle.map(str::to_string),
            marker_start: None,
            marker_end: None,
            data: EdgeData::default(),
            extra: Map::new(),
        };

        if self.edges.iter().any(|existing| existing.same_connection(&edge)) {
            return Err(DiagramError::DuplicateEdge(id));
        }
        self.edges.push(edge);
        Ok(id)
    }

    /// Replaces both end markers of an edge; `None` leaves that end unchanged.
    pub fn set_markers(
        &mut self,
        edge_id: &str,
        start: Option<MarkerKind>,
        end: Option<MarkerKind>,
    ) -> Result<(), DiagramError> {
        let edge = self.edge_mut(edge_id)?;
        if let Some(kind) = start {
            edge.marker_start = Some(EdgeMarker::new(kind));
        }
        if let Some(kind) = end {
            edge.marker_end = Some(EdgeMarker::new(kind));
        }
        Ok(())
    }

    /// Replaces the main and endpoint labels of an edge.
    pub fn set_edge_labels(
        &mut self,
        edge_id: &str,
        label: impl Into<String>,
        source_label: impl Into<String>,
        target_label: impl Into<String>,
    ) -> Result<(), DiagramError> {
        let edge = self.edge_mut(edge_id)?;
        edge.data.label = label.into();
        edge.data.source_label = Some(source_label.into());
        edge.data.target_label = Some(target_label.into());
        Ok(())
    }

    /// Removes a node and every edge touching it.
    pub fn remove_node(&mut self, id: &str) -> Result<DiagramNode, DiagramError> {
        let index = self
            .nodes
            .iter()
            .position(|node| node.id == id)
            .ok_or_else(|| DiagramError::UnknownNode(id.to_string()))?;
        let removed = self.nodes.remove(index);
        self.edges
            .retain(|edge| edge.source != removed.id && edge.target != removed.id);
        Ok(removed)
    }

    /// Computes render geometry for one edge from the measured node sizes.
    pub fn route_edge(&self, edge_id: &str) -> Result<EdgeLayout, DiagramError> {
        let edge = self
            .edge(edge_id)
            .ok_or_else(|| DiagramError::UnknownEdge(edge_id.to_string()))?;
        let source = self.measured_bounds(&edge.source)?;
        let target = self.measured_bounds(&edge.target)?;
        let endpoints = resolve_edge_endpoints(&source, &target)?;
        Ok(EdgeLayout::from_endpoints(endpoints))
    }

    fn measured_bounds(&self, node_id: &str) -> Result<NodeBounds, DiagramError> {
        let node = self
            .node(node_id)
            .ok_or_else(|| DiagramError::UnknownNode(node_id.to_string()))?;
        node.bounds()
            .ok_or_else(|| DiagramError::Unmeasured(node_id.to_string()))
    }

    fn edge_mut(&mut self, id: &str) -> Result<&mut DiagramEdge, DiagramError> {
        self.edges
            .iter_mut()
            .find(|edge| edge.id == id)
            .ok_or_else(|| DiagramError::UnknownEdge(id.to_string()))
    }
}
