use crate::Position;
use thiserror::Error;

/// Errors raised for malformed routing input. A missing route is not an error; it is reported as
/// an empty path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("position {position} is outside the {rows}x{columns} grid")]
    OutOfBounds {
        position: Position,
        rows: usize,
        columns: usize,
    },
}
