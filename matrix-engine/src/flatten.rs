//! FILENAME: matrix-engine/src/flatten.rs
//! Row tree flattening and expansion-order reconciliation.
//!
//! The flattener walks the row tree top to bottom and emits one flat row
//! per visible tree node. A branch's subtree flattens into one contiguous
//! block; the group's own summary row is the trailing subtotal child the
//! host appends, so under downward expansion each closed branch run is
//! rotated right by one to move the summary in front of its children.
//! Under upward expansion runs keep strict append order and the parent's
//! expand-control entry is instead reordered after its children's.
//!
//! One flattener services exactly one population call; all accumulators
//! start empty and are handed to the caller on completion.

use matrix_model::{
    FormattingSettings, MalformedNodeError, MatrixDataView, MatrixNode, MeasureValue, NodePath,
    NodeShape, SlotCounterReset,
};

use crate::error::MatrixError;
use crate::format::{MeasureFormatter, ValueRenderer};
use crate::view::{ColumnDefinition, ColumnRole, ExpandCandidate, FlatRow};

/// Flattens one matrix dataview's row tree against a built column schema.
pub struct RowFlattener<'a> {
    dataview: &'a MatrixDataView,
    settings: &'a FormattingSettings,
    formatter: MeasureFormatter<'a>,
    columns: &'a [ColumnDefinition],

    /// Fallback measure-slot counter for cells without an explicit slot
    /// index. Reset per row or carried across rows per the configured
    /// policy; only the ungrouped (measures-only) path consults it
    /// across rows.
    slot_cursor: usize,

    row_data: Vec<FlatRow>,
    candidates: Vec<ExpandCandidate>,
}

impl<'a> RowFlattener<'a> {
    pub fn new(
        dataview: &'a MatrixDataView,
        settings: &'a FormattingSettings,
        columns: &'a [ColumnDefinition],
        renderer: &'a dyn ValueRenderer,
    ) -> Self {
        RowFlattener {
            dataview,
            settings,
            formatter: MeasureFormatter::new(&dataview.value_sources, renderer),
            columns,
            slot_cursor: 0,
            row_data: Vec::new(),
            candidates: Vec::new(),
        }
    }

    /// Runs the walk and yields the flattened rows plus the expandable
    /// nodes encountered, both in final display order.
    pub fn flatten(mut self) -> Result<(Vec<FlatRow>, Vec<ExpandCandidate>), MatrixError> {
        let dataview = self.dataview;
        let grouped = dataview.rows.has_grouping() || dataview.columns.has_grouping();

        for (i, node) in dataview.rows.top_children().iter().enumerate() {
            let path = NodePath::root().child(i);
            match node.shape(&path)? {
                NodeShape::Leaf(values) => {
                    let row = if grouped {
                        self.register_candidate(node, &path);
                        let label = node.label();
                        self.leaf_row(&path, label.as_deref(), values)?
                    } else {
                        self.measures_only_row(&path, values)?
                    };
                    self.row_data.push(row);
                }
                NodeShape::Branch(children) => {
                    let label = node.label();
                    let mut block =
                        self.flatten_subtree(node, children, &path, label.as_deref())?;
                    self.row_data.append(&mut block);
                }
                NodeShape::Bare => {
                    // Label-only row, legal at the top level. The label
                    // lands in the schema's first column; without a
                    // category column that is the first data column.
                    if grouped {
                        let mut row = FlatRow::with_path(path.clone());
                        if let (Some(first), Some(label)) =
                            (self.columns.first(), node.label())
                        {
                            row.set(&first.field, label);
                        }
                        self.row_data.push(row);
                    }
                }
            }
        }

        Ok((self.row_data, self.candidates))
    }

    /// Flattens one branch node's subtree into a contiguous block,
    /// applying the configured expansion direction at the branch close.
    fn flatten_subtree(
        &mut self,
        node: &MatrixNode,
        children: &'a [MatrixNode],
        path: &NodePath,
        label: Option<&str>,
    ) -> Result<Vec<FlatRow>, MatrixError> {
        let registered = self.register_candidate(node, path);

        // Under expand-up the parent's control entry must order after its
        // children's: park it, let the children register, restore it.
        let parked = if self.settings.expansion.expand_up && registered {
            self.candidates.pop()
        } else {
            None
        };

        let mut run = self.flatten_branch(children, path, label)?;

        if let Some(parent) = parked {
            self.candidates.push(parent);
        }

        if !self.settings.expansion.expand_up && run.len() > 1 {
            // The trailing group-summary row leads under downward mode.
            run.rotate_right(1);
        }

        Ok(run)
    }

    fn flatten_branch(
        &mut self,
        children: &'a [MatrixNode],
        parent_path: &NodePath,
        parent_label: Option<&str>,
    ) -> Result<Vec<FlatRow>, MatrixError> {
        let mut run: Vec<FlatRow> = Vec::with_capacity(children.len());

        for (i, child) in children.iter().enumerate() {
            let path = parent_path.child(i);
            match child.shape(&path)? {
                NodeShape::Leaf(values) => {
                    self.register_candidate(child, &path);
                    let label = child.label().or_else(|| parent_label.map(str::to_string));
                    run.push(self.leaf_row(&path, label.as_deref(), values)?);
                }
                NodeShape::Branch(grandchildren) => {
                    let label = child.label().or_else(|| parent_label.map(str::to_string));
                    let mut nested =
                        self.flatten_subtree(child, grandchildren, &path, label.as_deref())?;
                    run.append(&mut nested);
                }
                NodeShape::Bare => {
                    return Err(MalformedNodeError::BareInSubtree(path).into());
                }
            }
        }

        Ok(run)
    }

    /// One flat row from a leaf node's measure cells, grouping present.
    /// The slot counter is row-local here; subtotal rows carry the parent
    /// group's label.
    fn leaf_row(
        &self,
        path: &NodePath,
        label: Option<&str>,
        values: &[MeasureValue],
    ) -> Result<FlatRow, MatrixError> {
        let mut row = FlatRow::with_path(path.clone());

        if let (Some(category), Some(label)) = (self.category_column(), label) {
            row.set(&category.field, label);
        }

        let mut data_columns = self.columns.iter().filter(|c| c.role == ColumnRole::Data);
        let mut cursor = 0usize;
        for value in values {
            // Cells beyond the schema have no column to land in.
            let Some(column) = data_columns.next() else { break };
            let slot = value.value_source_index.unwrap_or(cursor);
            cursor = slot + 1;
            let rendered = self.formatter.format_value(&value.value, slot, values)?;
            row.set(&column.field, rendered);
        }

        Ok(row)
    }

    /// One flat row in the ungrouped (measures-only) matrix. The slot
    /// cursor carries across rows under `PerPopulate`.
    fn measures_only_row(
        &mut self,
        path: &NodePath,
        values: &[MeasureValue],
    ) -> Result<FlatRow, MatrixError> {
        if self.settings.slot_counter == SlotCounterReset::PerRow {
            self.slot_cursor = 0;
        }

        let mut row = FlatRow::with_path(path.clone());
        for (i, value) in values.iter().enumerate() {
            let Some(column) = self.columns.get(i) else { break };
            let slot = value.value_source_index.unwrap_or(self.slot_cursor);
            self.slot_cursor = slot + 1;
            let rendered = self.formatter.format_value(&value.value, slot, values)?;
            row.set(&column.field, rendered);
        }

        Ok(row)
    }

    fn register_candidate(&mut self, node: &MatrixNode, path: &NodePath) -> bool {
        if !self.settings.expansion.enable_buttons || node.is_subtotal || !node.is_expandable() {
            return false;
        }
        self.candidates.push(ExpandCandidate {
            path: path.clone(),
            level: node.level,
            is_collapsed: node.is_collapsed.unwrap_or(false),
            label: node.label().unwrap_or_default(),
            level_expandable: self.dataview.rows.level_expandable(node.level),
        });
        true
    }

    fn category_column(&self) -> Option<&'a ColumnDefinition> {
        self.columns.iter().find(|c| c.role == ColumnRole::Category)
    }
}
