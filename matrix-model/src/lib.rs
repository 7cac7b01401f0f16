//! FILENAME: matrix-model/src/lib.rs
//! Shared data model for the matrix visual core.
//!
//! This crate holds the serializable types exchanged with the host
//! platform: the matrix dataview tree (nested row/column groups with
//! per-leaf measure values), node addressing, and the formatting
//! settings bundle. It contains no transformation logic; that lives in
//! `matrix-engine`.
//!
//! Layers:
//! - `node`: Tree nodes, cell values, shape classification
//! - `dataview`: Axes, levels, measure metadata, the dataview itself
//! - `settings`: The host-supplied formatting settings bundle

pub mod node;
pub mod dataview;
pub mod settings;

pub use node::*;
pub use dataview::*;
pub use settings::*;
