//! FILENAME: matrix-model/src/dataview.rs
//! The matrix dataview: row/column axes, level metadata, and measure
//! descriptors, as handed over by the host on every data refresh.

use serde::{Deserialize, Serialize};

use crate::node::{MatrixNode, NodePath};

fn default_true() -> bool {
    true
}

// ============================================================================
// SORT DIRECTION
// ============================================================================

/// Current or requested sort direction of a data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

// ============================================================================
// MEASURE / SOURCE METADATA
// ============================================================================

/// Metadata for a measure or grouping source column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureDescriptor {
    pub display_name: String,

    /// Declared format string, if any.
    #[serde(default)]
    pub format: Option<String>,

    /// Host query name, used when requesting a re-sort.
    #[serde(default)]
    pub query_name: Option<String>,

    /// Reference to the underlying source field, used to detect a measure
    /// column that duplicates the row grouping field.
    #[serde(default)]
    pub expr_ref: Option<String>,

    /// Whether the source plays the measure-value role.
    #[serde(default = "default_true")]
    pub is_value_role: bool,

    /// Level this source occupies in the row grouping, when it doubles as
    /// a grouping field.
    #[serde(default)]
    pub rows_role_level: Option<usize>,

    /// The source's current sort direction, if the host reports one.
    #[serde(default)]
    pub sort: Option<SortDirection>,
}

impl MeasureDescriptor {
    pub fn new(display_name: impl Into<String>) -> Self {
        MeasureDescriptor {
            display_name: display_name.into(),
            format: None,
            query_name: None,
            expr_ref: None,
            is_value_role: true,
            rows_role_level: None,
            sort: None,
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_query_name(mut self, query_name: impl Into<String>) -> Self {
        self.query_name = Some(query_name.into());
        self
    }
}

// ============================================================================
// AXES
// ============================================================================

/// One level of an axis's grouping hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisLevel {
    /// Whether nodes at this level may carry an expand/collapse control.
    #[serde(default)]
    pub can_be_expanded: bool,

    /// Source columns backing this level.
    #[serde(default)]
    pub sources: Vec<MeasureDescriptor>,
}

impl AxisLevel {
    pub fn new(source: MeasureDescriptor, can_be_expanded: bool) -> Self {
        AxisLevel {
            can_be_expanded,
            sources: vec![source],
        }
    }
}

/// The row or column side of the matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixAxis {
    #[serde(default)]
    pub levels: Vec<AxisLevel>,

    pub root: MatrixNode,
}

impl MatrixAxis {
    /// Whether this axis groups at all. The host marks grouping roots
    /// with their child identity fields.
    pub fn has_grouping(&self) -> bool {
        self.root.child_identity_fields.is_some()
    }

    /// Top-level children of the axis root.
    pub fn top_children(&self) -> &[MatrixNode] {
        self.root.children.as_deref().unwrap_or(&[])
    }

    /// Whether nodes at the given level can be expanded.
    pub fn level_expandable(&self, level: usize) -> bool {
        self.levels.get(level).map_or(false, |l| l.can_be_expanded)
    }
}

// ============================================================================
// DATAVIEW
// ============================================================================

/// The complete matrix dataview the host supplies on each refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatrixDataView {
    pub rows: MatrixAxis,
    pub columns: MatrixAxis,

    /// Measure metadata, ordered by slot.
    #[serde(default)]
    pub value_sources: Vec<MeasureDescriptor>,
}

impl MatrixDataView {
    /// Display name of the leftmost (category) column: the source backing
    /// the first row grouping level.
    pub fn category_field(&self) -> Option<&str> {
        self.rows
            .levels
            .first()
            .and_then(|level| level.sources.first())
            .map(|source| source.display_name.as_str())
    }

    /// Resolves a path to a row-side node, if it exists.
    pub fn node_at(&self, path: &NodePath) -> Option<&MatrixNode> {
        let mut node = &self.rows.root;
        for &index in path.indices() {
            node = node.children.as_ref()?.get(index as usize)?;
        }
        Some(node)
    }

    /// The lineage of row-side nodes addressed by a path, root to leaf,
    /// excluding subtotal markers. This is what selection and expansion
    /// identifiers are built from.
    pub fn row_lineage(&self, path: &NodePath) -> Vec<&MatrixNode> {
        let mut lineage = Vec::with_capacity(path.depth());
        let mut node = &self.rows.root;
        for &index in path.indices() {
            let children = match node.children.as_ref() {
                Some(c) => c,
                None => break,
            };
            node = match children.get(index as usize) {
                Some(n) => n,
                None => break,
            };
            if !node.is_subtotal {
                lineage.push(node);
            }
        }
        lineage
    }
}
