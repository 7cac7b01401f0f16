//! FILENAME: matrix-engine/src/engine.rs
//! Transformation orchestration and total-row finalization.
//!
//! `MatrixTransformer` ties the schema builder, the flattener, and the
//! finalizer together for one host data refresh. Every `populate` call
//! builds its state from scratch; nothing carries over between refreshes.

use matrix_model::{FormattingSettings, MatrixDataView};

use crate::error::MatrixError;
use crate::flatten::RowFlattener;
use crate::format::{BasicValueRenderer, ValueRenderer};
use crate::schema::build_column_schema;
use crate::view::{FlatRow, TabularView};

static DEFAULT_RENDERER: BasicValueRenderer = BasicValueRenderer;

/// One-shot transformer over a borrowed dataview and settings bundle.
pub struct MatrixTransformer<'a> {
    dataview: &'a MatrixDataView,
    settings: &'a FormattingSettings,
    renderer: &'a dyn ValueRenderer,
}

impl<'a> MatrixTransformer<'a> {
    pub fn new(dataview: &'a MatrixDataView, settings: &'a FormattingSettings) -> Self {
        MatrixTransformer {
            dataview,
            settings,
            renderer: &DEFAULT_RENDERER,
        }
    }

    /// Substitutes the host platform's value formatter.
    pub fn with_renderer(mut self, renderer: &'a dyn ValueRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Runs the full transformation for one refresh.
    pub fn populate(&self) -> Result<TabularView, MatrixError> {
        let column_defs = build_column_schema(self.dataview, self.settings);

        let flattener =
            RowFlattener::new(self.dataview, self.settings, &column_defs, self.renderer);
        let (mut row_data, expand_candidates) = flattener.flatten()?;

        let rows_grouped = self.dataview.rows.has_grouping();
        let has_grouping = rows_grouped || self.dataview.columns.has_grouping();
        let category_field = if rows_grouped {
            self.dataview.category_field().map(str::to_string)
        } else {
            None
        };

        let pinned_total_row =
            finalize_total_row(&mut row_data, category_field.as_deref(), has_grouping);

        Ok(TabularView {
            column_defs,
            row_data,
            pinned_total_row,
            expand_candidates,
            category_field,
        })
    }
}

/// Convenience entry point with the default renderer.
pub fn transform_matrix(
    dataview: &MatrixDataView,
    settings: &FormattingSettings,
) -> Result<TabularView, MatrixError> {
    MatrixTransformer::new(dataview, settings).populate()
}

// ============================================================================
// TOTAL-ROW FINALIZATION
// ============================================================================

/// Splits the synthesized grand-total row off the body, in place.
///
/// The host appends its grand total as a trailing row without a category
/// label. When at least one axis groups, that unlabeled trailer is
/// labeled "Total" and pinned; a trailing row that carries its own
/// category label is ordinary data and stays in the body. Without any
/// grouping there is no synthesized total. An empty row set recovers to
/// a single placeholder row. Idempotent: re-running on a finalized body
/// with the total re-appended reproduces the same split.
fn finalize_total_row(
    rows: &mut Vec<FlatRow>,
    category_field: Option<&str>,
    has_grouping: bool,
) -> Option<FlatRow> {
    if rows.is_empty() {
        rows.push(FlatRow::new());
        return None;
    }

    if has_grouping {
        if let (Some(field), Some(last)) = (category_field, rows.last_mut()) {
            if last.get(field).is_none() {
                last.set(field, "Total");
            }
        }
    }

    let total = rows.pop()?;

    let is_total = match category_field {
        Some(field) => total.get(field) == Some("Total"),
        // No category column (columns-only grouping): the host still
        // appends its grand total last.
        None => has_grouping,
    };

    if !is_total {
        rows.push(total);
        return None;
    }

    if rows.is_empty() {
        // Keep the grid non-empty when the total is the only row.
        rows.push(total.clone());
    }

    Some(total)
}
