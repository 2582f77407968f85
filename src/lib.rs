//! # grid_router
//!
//! Routes connections between occupants of a 2-D grid. Implements
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) with orthogonal moves on top of a
//! binary min-heap that supports decrease-key ([MinHeap]). The goal of a search is identified by
//! the *occupant* of the destination cell rather than by its coordinates, so a route can be drawn
//! towards "the cell holding this item" (see [Termination] for the coordinate-based alternative).
//!
//! The [board] module turns a board of items into a double-resolution routing grid in which
//! routes can bend between items, and routes dependency connections across it.
//!
//! ```rust
//! use grid_router::{Endpoint, Grid, Position, Router};
//!
//! let mut grid: Grid<u32> = Grid::new(3, 3);
//! grid.set(Position::new(0, 0), Some(1)).unwrap();
//! grid.set(Position::new(1, 1), Some(2)).unwrap();
//! grid.set(Position::new(2, 2), Some(3)).unwrap();
//!
//! let start = Endpoint::at(&grid, Position::new(0, 0)).unwrap();
//! let end = Endpoint::at(&grid, Position::new(2, 2)).unwrap();
//! let path = Router::new(&grid)
//!     .blocking(|o: Option<&u32>| o.is_some_and(|&v| v != 3))
//!     .search(start, end)
//!     .unwrap();
//! assert_eq!(path.len(), 4);
//! assert_eq!(path.last(), Some(&Position::new(2, 2)));
//! ```
mod astar;
pub mod board;
mod error;
mod grid;
mod heap;
mod router;

pub use error::Error;
pub use grid::Grid;
pub use heap::MinHeap;
pub use router::{
    default_is_blocking, default_value_equals, manhattan, search, Endpoint, Router, Termination,
};

use core::fmt;

/// A cell address on a [Grid]: `row` indexes the outer dimension, `column` the inner one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(row: usize, column: usize) -> Position {
        Position { row, column }
    }

    pub fn manhattan_distance(&self, other: &Position) -> usize {
        self.row.abs_diff(other.row) + self.column.abs_diff(other.column)
    }

    /// The von Neumann neighbourhood in the order up, down, left, right. Neighbours that would
    /// underflow are left out; the upper bounds are checked by the grid.
    pub fn orthogonal_neighbours(&self) -> impl Iterator<Item = Position> {
        let Position { row, column } = *self;
        [
            row.checked_sub(1).map(|r| Position::new(r, column)),
            row.checked_add(1).map(|r| Position::new(r, column)),
            column.checked_sub(1).map(|c| Position::new(row, c)),
            column.checked_add(1).map(|c| Position::new(row, c)),
        ]
        .into_iter()
        .flatten()
    }

    /// Whether `other` is exactly one orthogonal step away.
    pub fn is_adjacent(&self, other: &Position) -> bool {
        self.manhattan_distance(other) == 1
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, column): (usize, usize)) -> Self {
        Position::new(row, column)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}
