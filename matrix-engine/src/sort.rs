//! FILENAME: matrix-engine/src/sort.rs
//! Per-column sort-request resolution.
//!
//! The host owns the actual re-sorting; this module only decides which
//! underlying data source a clicked column header sorts by and which
//! direction to request next.

use serde::{Deserialize, Serialize};

use matrix_model::{MatrixDataView, MeasureDescriptor, SortDirection};

use crate::view::{ColumnRole, TabularView};

/// A sort the host should apply: the source's query name plus the
/// requested direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortRequest {
    pub query_name: String,
    pub direction: SortDirection,
}

/// Resolves the sort request for a clicked column, by schema position.
///
/// The category column sorts by the first row grouping source (or the
/// first column grouping source when rows do not group). Measure-backed
/// data columns sort by their measure; column-grouped data columns,
/// including the trailing Total, all aggregate the first measure.
/// Returns `None` when the resolved source has no query name.
pub fn sort_request(
    dataview: &MatrixDataView,
    view: &TabularView,
    col_index: usize,
) -> Option<SortRequest> {
    let column = view.column_defs.get(col_index)?;

    let source: &MeasureDescriptor = match column.role {
        ColumnRole::Category => dataview
            .rows
            .levels
            .first()
            .and_then(|level| level.sources.first())
            .or_else(|| {
                dataview
                    .columns
                    .levels
                    .first()
                    .and_then(|level| level.sources.first())
            })?,
        ColumnRole::Data => {
            if column.source_child.is_some() {
                dataview.value_sources.first()?
            } else {
                // Resolved through the binding recorded at schema-build
                // time; schema position drifts when measures were skipped.
                dataview.value_sources.get(column.source_index?)?
            }
        }
    };

    // First click requests descending; subsequent clicks toggle.
    let direction = source
        .sort
        .map(SortDirection::toggle)
        .unwrap_or(SortDirection::Descending);

    Some(SortRequest {
        query_name: source.query_name.clone()?,
        direction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::build_column_schema;
    use crate::view::{ColumnDefinition, FlatRow};
    use matrix_model::{AxisLevel, FormattingSettings, MatrixAxis, MatrixNode};

    fn create_test_view(defs: Vec<ColumnDefinition>) -> TabularView {
        TabularView {
            column_defs: defs,
            row_data: Vec::<FlatRow>::new(),
            pinned_total_row: None,
            expand_candidates: Vec::new(),
            category_field: None,
        }
    }

    fn data_column(field: &str, col_id: usize, source_index: usize) -> ColumnDefinition {
        let mut def = ColumnDefinition::new(field, col_id, ColumnRole::Data);
        def.source_index = Some(source_index);
        def
    }

    fn create_test_dataview() -> MatrixDataView {
        let mut root = MatrixNode::branch(None, 0, vec![]);
        root.child_identity_fields = Some(vec!["Region".to_string()]);

        MatrixDataView {
            rows: MatrixAxis {
                levels: vec![AxisLevel::new(
                    MeasureDescriptor::new("Region").with_query_name("t.Region"),
                    true,
                )],
                root,
            },
            columns: MatrixAxis::default(),
            value_sources: vec![
                MeasureDescriptor::new("Revenue").with_query_name("Sum(t.Revenue)"),
                MeasureDescriptor::new("Units").with_query_name("Sum(t.Units)"),
            ],
        }
    }

    #[test]
    fn test_category_column_sorts_by_row_source() {
        let dataview = create_test_dataview();
        let view = create_test_view(vec![
            ColumnDefinition::new("Region", 0, ColumnRole::Category),
            data_column("Revenue", 1, 0),
        ]);

        let request = sort_request(&dataview, &view, 0).unwrap();
        assert_eq!(request.query_name, "t.Region");
        assert_eq!(request.direction, SortDirection::Descending);
    }

    #[test]
    fn test_data_columns_sort_by_their_measure() {
        let dataview = create_test_dataview();
        let view = create_test_view(vec![
            ColumnDefinition::new("Region", 0, ColumnRole::Category),
            data_column("Revenue", 1, 0),
            data_column("Units", 2, 1),
        ]);

        assert_eq!(sort_request(&dataview, &view, 1).unwrap().query_name, "Sum(t.Revenue)");
        assert_eq!(sort_request(&dataview, &view, 2).unwrap().query_name, "Sum(t.Units)");
    }

    #[test]
    fn test_skipped_measure_keeps_column_source_binding() {
        // A measure duplicating the grouping field never becomes a column;
        // the surviving column must still sort by its own source.
        let mut dataview = create_test_dataview();
        let mut duplicate = MeasureDescriptor::new("Region").with_query_name("t.RegionDup");
        duplicate.expr_ref = Some("Region".to_string());
        dataview.value_sources.insert(0, duplicate);

        let settings = FormattingSettings::default();
        let view = create_test_view(build_column_schema(&dataview, &settings));
        let fields: Vec<&str> = view.column_defs.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["Region", "Revenue", "Units"]);

        assert_eq!(sort_request(&dataview, &view, 1).unwrap().query_name, "Sum(t.Revenue)");
        assert_eq!(sort_request(&dataview, &view, 2).unwrap().query_name, "Sum(t.Units)");
    }

    #[test]
    fn test_total_column_sorts_by_first_measure() {
        let dataview = create_test_dataview();
        let mut total = ColumnDefinition::new("Total", 2, ColumnRole::Data);
        total.source_child = Some(1);
        let mut q1 = ColumnDefinition::new("Q1", 1, ColumnRole::Data);
        q1.source_child = Some(0);
        // Column-grouped data columns carry no measure binding.
        let view = create_test_view(vec![
            ColumnDefinition::new("Region", 0, ColumnRole::Category),
            q1,
            total,
        ]);

        let request = sort_request(&dataview, &view, 2).unwrap();
        assert_eq!(request.query_name, "Sum(t.Revenue)");
    }

    #[test]
    fn test_direction_toggles_from_current_sort() {
        let mut dataview = create_test_dataview();
        dataview.value_sources[0].sort = Some(SortDirection::Descending);
        let view = create_test_view(vec![data_column("Revenue", 0, 0)]);

        let request = sort_request(&dataview, &view, 0).unwrap();
        assert_eq!(request.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_source_without_query_name_yields_none() {
        let mut dataview = create_test_dataview();
        dataview.value_sources[0].query_name = None;
        let view = create_test_view(vec![data_column("Revenue", 0, 0)]);

        assert!(sort_request(&dataview, &view, 0).is_none());
        assert!(sort_request(&dataview, &view, 9).is_none(), "unknown column");
    }
}
