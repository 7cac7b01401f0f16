//! FILENAME: matrix-model/src/node.rs
//! Matrix tree nodes as supplied by the host dataview.
//!
//! A node carries either a terminal collection of measure values or a
//! list of child nodes, never both. The host wire shape keeps both as
//! optional fields, so `MatrixNode::shape` classifies a node exactly
//! once into a first-class variant before any processing.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use thiserror::Error;

// ============================================================================
// CELL VALUES
// ============================================================================

/// A scalar value carried by a matrix node or measure cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// Display label for group headers. `Empty` has no label.
    pub fn label(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Number(n) => Some(format!("{}", n)),
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Boolean(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// One measure cell inside a leaf node's ordered value collection.
///
/// The collection is ordered by measure slot; `value_source_index` is the
/// host's explicit slot override (absent on the first slot and in some
/// calculation-group payloads). `format_string` is the row-local format
/// fallback the host nests under the cell's metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureValue {
    pub value: CellValue,

    #[serde(default)]
    pub value_source_index: Option<usize>,

    #[serde(default)]
    pub format_string: Option<String>,
}

impl MeasureValue {
    pub fn new(value: CellValue) -> Self {
        MeasureValue {
            value,
            value_source_index: None,
            format_string: None,
        }
    }

    pub fn with_source_index(mut self, index: usize) -> Self {
        self.value_source_index = Some(index);
        self
    }
}

// ============================================================================
// NODE ADDRESSING
// ============================================================================

/// Opaque host identity token attached to selectable nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeIdentity(pub u64);

/// Index path from an axis root to a node.
///
/// Each element is a child index; every prefix of the path addresses an
/// ancestor, so one path encodes the full lineage of the node it names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodePath(pub SmallVec<[u32; 4]>);

impl NodePath {
    /// The empty path, addressing the axis root itself.
    pub fn root() -> Self {
        NodePath(SmallVec::new())
    }

    /// Extends the path by one child index.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index as u32);
        NodePath(indices)
    }

    pub fn indices(&self) -> &[u32] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "root");
        }
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "{}", parts.join("/"))
    }
}

// ============================================================================
// SHAPE CLASSIFICATION
// ============================================================================

/// The legal content shapes of a node, classified once up front.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeShape<'a> {
    /// Terminal node: an ordered collection of measure cells.
    Leaf(&'a [MeasureValue]),
    /// Grouping node: a list of child nodes.
    Branch(&'a [MatrixNode]),
    /// Neither values nor children. Legal for roots and top-level label
    /// rows; malformed inside a subtree.
    Bare,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedNodeError {
    #[error("node at {0} carries both a value collection and children")]
    BothShapes(NodePath),

    #[error("node at {0} inside a subtree has neither values nor children")]
    BareInSubtree(NodePath),
}

// ============================================================================
// MATRIX NODE
// ============================================================================

/// One node of the host-supplied matrix tree (row or column side).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixNode {
    /// Group label. Absent on subtotal markers and synthesized totals.
    #[serde(default)]
    pub value: Option<CellValue>,

    /// Depth in the axis level hierarchy.
    #[serde(default)]
    pub level: usize,

    #[serde(default)]
    pub is_subtotal: bool,

    /// Present only on nodes the host considers expandable.
    #[serde(default)]
    pub is_collapsed: Option<bool>,

    #[serde(default)]
    pub identity: Option<NodeIdentity>,

    /// Present on roots whose axis groups by one or more fields.
    #[serde(default)]
    pub child_identity_fields: Option<Vec<String>>,

    /// Leaf shape: ordered measure cells, one per slot.
    #[serde(default)]
    pub values: Option<Vec<MeasureValue>>,

    /// Branch shape: child nodes.
    #[serde(default)]
    pub children: Option<Vec<MatrixNode>>,
}

impl MatrixNode {
    /// Creates a branch node with the given children.
    pub fn branch(value: Option<CellValue>, level: usize, children: Vec<MatrixNode>) -> Self {
        MatrixNode {
            value,
            level,
            children: Some(children),
            ..Default::default()
        }
    }

    /// Creates a leaf node with the given measure cells.
    pub fn leaf(value: Option<CellValue>, level: usize, values: Vec<MeasureValue>) -> Self {
        MatrixNode {
            value,
            level,
            values: Some(values),
            ..Default::default()
        }
    }

    /// Creates a subtotal leaf (no own label; carries aggregate values).
    pub fn subtotal(level: usize, values: Vec<MeasureValue>) -> Self {
        MatrixNode {
            level,
            is_subtotal: true,
            values: Some(values),
            ..Default::default()
        }
    }

    pub fn with_identity(mut self, identity: NodeIdentity) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.is_collapsed = Some(collapsed);
        self
    }

    /// Classifies the node's content shape. A node carrying both shapes
    /// is malformed; `path` names it in the error.
    pub fn shape(&self, path: &NodePath) -> Result<NodeShape<'_>, MalformedNodeError> {
        match (&self.values, &self.children) {
            (Some(_), Some(_)) => Err(MalformedNodeError::BothShapes(path.clone())),
            (Some(values), None) => Ok(NodeShape::Leaf(values)),
            (None, Some(children)) => Ok(NodeShape::Branch(children)),
            (None, None) => Ok(NodeShape::Bare),
        }
    }

    /// Whether the host marked this node as a candidate for an
    /// expand/collapse control.
    pub fn is_expandable(&self) -> bool {
        self.is_collapsed.is_some() || self.identity.is_some()
    }

    pub fn label(&self) -> Option<String> {
        self.value.as_ref().and_then(CellValue::label)
    }
}
