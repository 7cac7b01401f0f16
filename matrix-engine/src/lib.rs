//! FILENAME: matrix-engine/src/lib.rs
//! Matrix-to-tabular transformation core.
//!
//! This crate flattens the host's two-dimensional hierarchical matrix
//! dataview (nested row groups x nested column groups with per-leaf
//! measure values) into the flat column/row shape a grid widget renders,
//! including the pinned Total row and the expansion candidates the
//! rendering collaborator decorates.
//!
//! Layers:
//! - `view`: Renderable output (column definitions, flat rows, candidates)
//! - `schema`: Column schema builder
//! - `format`: Format-string resolution and the renderer seam
//! - `flatten`: Row tree flattening and expansion-order reconciliation
//! - `engine`: Orchestration and total-row finalization
//! - `sort`: Per-column sort-request resolution for the host

pub mod error;
pub mod view;
pub mod schema;
pub mod format;
pub mod flatten;
pub mod engine;
pub mod sort;

pub use error::MatrixError;
pub use view::*;
pub use schema::build_column_schema;
pub use format::{BasicValueRenderer, MeasureFormatter, ValueRenderer, BLANK_SENTINEL, DEFAULT_FORMAT};
pub use flatten::RowFlattener;
pub use engine::{transform_matrix, MatrixTransformer};
pub use sort::{sort_request, SortRequest};
