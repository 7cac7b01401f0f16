//! FILENAME: matrix-engine/src/error.rs

use matrix_model::MalformedNodeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("malformed node: {0}")]
    Malformed(#[from] MalformedNodeError),

    #[error("measure slot index {index} out of range for {count} measures")]
    MeasureIndexOutOfRange { index: usize, count: usize },
}
