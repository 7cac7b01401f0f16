//! FILENAME: matrix-engine/src/view.rs
//! Renderable output for the grid collaborator.
//!
//! The view is a flat column list plus a flat row list; every row carries
//! the path of the tree node that produced it so selection and expansion
//! never have to match rendered text back to the tree.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use matrix_model::NodePath;

// ============================================================================
// COLUMN DEFINITIONS
// ============================================================================

/// The role a column plays in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnRole {
    /// The leftmost group-label column.
    Category,
    /// A measure or column-group data column.
    Data,
}

/// One column of the tabular view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Unique, stable field key. Row cells are keyed by this.
    pub field: String,

    /// Ordinal position in the schema.
    pub col_id: usize,

    pub role: ColumnRole,

    /// Hidden columns are still present and counted (the Total column
    /// under its visibility toggle).
    #[serde(default)]
    pub hidden: bool,

    /// For column-grouped matrices: index of the top-level column-axis
    /// child this column renders.
    #[serde(default)]
    pub source_child: Option<usize>,

    /// For measure-backed columns: index into `value_sources` of the
    /// measure this column renders. Schema position is not a substitute;
    /// the builder may skip measures, shifting positions.
    #[serde(default)]
    pub source_index: Option<usize>,
}

impl ColumnDefinition {
    pub fn new(field: impl Into<String>, col_id: usize, role: ColumnRole) -> Self {
        ColumnDefinition {
            field: field.into(),
            col_id,
            role,
            hidden: false,
            source_child: None,
            source_index: None,
        }
    }
}

// ============================================================================
// FLAT ROWS
// ============================================================================

/// One flattened row: formatted display strings keyed by column field,
/// plus the path of the originating tree node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatRow {
    pub cells: FxHashMap<String, String>,

    /// Path of the row-tree node this row was produced from. Prefixes of
    /// the path are the row's lineage for selection-id building.
    #[serde(default)]
    pub path: Option<NodePath>,
}

impl FlatRow {
    pub fn new() -> Self {
        FlatRow::default()
    }

    pub fn with_path(path: NodePath) -> Self {
        FlatRow {
            cells: FxHashMap::default(),
            path: Some(path),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.cells.get(field).map(String::as_str)
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.cells.insert(field.to_string(), value.into());
    }
}

// ============================================================================
// EXPANSION CANDIDATES
// ============================================================================

/// A row-tree node eligible for an expand/collapse control, in flattening
/// order. The renderer decides per rendered row whether to attach a
/// control and at what indentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpandCandidate {
    pub path: NodePath,

    /// Depth in the row level hierarchy, for indentation.
    pub level: usize,

    pub is_collapsed: bool,

    pub label: String,

    /// Whether the node's level actually allows expansion, resolved from
    /// the axis level metadata so the renderer needs no level lookups.
    pub level_expandable: bool,
}

// ============================================================================
// TABULAR VIEW
// ============================================================================

/// The complete transformation output for one data refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabularView {
    pub column_defs: Vec<ColumnDefinition>,

    /// Body rows, in final display order.
    pub row_data: Vec<FlatRow>,

    /// The synthesized Total row, when one was detected; pinned by the
    /// grid collaborator.
    pub pinned_total_row: Option<FlatRow>,

    pub expand_candidates: Vec<ExpandCandidate>,

    /// Field name of the category column, when the matrix groups rows.
    pub category_field: Option<String>,
}

impl TabularView {
    /// Looks a column up by field name.
    pub fn column(&self, field: &str) -> Option<&ColumnDefinition> {
        self.column_defs.iter().find(|c| c.field == field)
    }
}
