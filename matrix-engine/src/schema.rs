//! FILENAME: matrix-engine/src/schema.rs
//! Column schema builder.
//!
//! Inspects which axes group and produces the ordered column list. Four
//! combinations: no grouping (one data column per measure), rows only
//! (category column + per-measure columns), and the two column-grouped
//! forms (one data column per top-level column child, with the host's
//! unlabeled grand-total child surfacing as a trailing "Total" column).

use matrix_model::{FormattingSettings, MatrixDataView};

use crate::view::{ColumnDefinition, ColumnRole};

/// Builds the column definitions for one refresh. When the column axis
/// groups, its per-child columns supersede the per-measure columns.
pub fn build_column_schema(
    dataview: &MatrixDataView,
    settings: &FormattingSettings,
) -> Vec<ColumnDefinition> {
    let rows_grouped = dataview.rows.has_grouping();
    let cols_grouped = dataview.columns.has_grouping();

    let mut defs: Vec<ColumnDefinition> = Vec::new();

    if rows_grouped {
        if let Some(field) = dataview.category_field() {
            defs.push(ColumnDefinition::new(field, defs.len(), ColumnRole::Category));
        }
    }

    if cols_grouped {
        for (i, child) in dataview.columns.top_children().iter().enumerate() {
            let field = child.label().unwrap_or_else(|| "Undefined".to_string());
            let mut def = ColumnDefinition::new(field, defs.len(), ColumnRole::Data);
            def.source_child = Some(i);
            defs.push(def);
        }

        // The host's synthesized grand-total child arrives unlabeled.
        if let Some(last) = defs.last_mut() {
            if last.source_child.is_some() && (last.field.is_empty() || last.field == "Undefined") {
                last.field = "Total".to_string();
                last.hidden = !settings.column.enable_total;
            }
        }
    } else {
        let row_identity_field = dataview
            .rows
            .root
            .child_identity_fields
            .as_ref()
            .and_then(|fields| fields.first());

        for (i, source) in dataview.value_sources.iter().enumerate() {
            if rows_grouped {
                // A measure backed by the row grouping field itself would
                // duplicate the category column.
                let duplicates_grouping = matches!(
                    (source.expr_ref.as_ref(), row_identity_field),
                    (Some(expr), Some(field)) if expr == field
                );
                if duplicates_grouping {
                    continue;
                }
                if !source.is_value_role && source.rows_role_level != Some(0) {
                    continue;
                }
            }
            let mut def =
                ColumnDefinition::new(source.display_name.clone(), defs.len(), ColumnRole::Data);
            def.source_index = Some(i);
            defs.push(def);
        }
    }

    defs
}
