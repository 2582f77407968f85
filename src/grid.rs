use crate::{Error, Position};
use core::fmt;
use itertools::Itertools;

/// A rectangular matrix of optional occupants indexed by [Position]. Empty cells ([None]) are
/// passable under the default blocking rule; what an occupant means is up to the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid<T> {
    cells: Vec<Option<T>>,
    rows: usize,
    columns: usize,
}

impl<T> Default for Grid<T> {
    fn default() -> Grid<T> {
        Grid {
            cells: Vec::new(),
            rows: 0,
            columns: 0,
        }
    }
}

impl<T> Grid<T> {
    /// Creates a grid of the given size with every cell empty. A grid without rows or without
    /// columns is 0×0.
    pub fn new(rows: usize, columns: usize) -> Grid<T> {
        Grid::from_fn(rows, columns, |_| None)
    }

    /// Creates a grid of the given size, filling each cell with `f(position)` in row-major order.
    pub fn from_fn<F>(rows: usize, columns: usize, mut f: F) -> Grid<T>
    where
        F: FnMut(Position) -> Option<T>,
    {
        let (rows, columns) = if rows == 0 || columns == 0 {
            (0, 0)
        } else {
            (rows, columns)
        };
        Grid {
            cells: (0..rows * columns)
                .map(|ix| f(Position::new(ix / columns, ix % columns)))
                .collect(),
            rows,
            columns,
        }
    }

    /// Builds a grid from nested rows, rejecting rows whose length differs from the first one.
    pub fn from_rows(rows: Vec<Vec<Option<T>>>) -> Result<Grid<T>, Error> {
        let columns = rows.first().map_or(0, Vec::len);
        let n_rows = rows.len();
        let mut cells = Vec::with_capacity(n_rows * columns);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != columns {
                return Err(Error::RaggedRow {
                    row,
                    expected: columns,
                    found: values.len(),
                });
            }
            cells.extend(values);
        }
        Ok(Grid {
            cells,
            rows: if columns == 0 { 0 } else { n_rows },
            columns,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.column < self.columns
    }

    pub fn check_bounds(&self, pos: Position) -> Result<(), Error> {
        if self.in_bounds(pos) {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                position: pos,
                rows: self.rows,
                columns: self.columns,
            })
        }
    }

    /// Row-major index of an in-bounds position.
    pub(crate) fn ix(&self, pos: Position) -> usize {
        debug_assert!(self.in_bounds(pos));
        pos.row * self.columns + pos.column
    }

    /// The occupant at `pos`, or [None] if the cell is empty or out of bounds.
    pub fn get(&self, pos: Position) -> Option<&T> {
        if self.in_bounds(pos) {
            self.cells[self.ix(pos)].as_ref()
        } else {
            None
        }
    }

    /// Replaces the occupant at `pos`, returning the previous one.
    pub fn set(&mut self, pos: Position, occupant: Option<T>) -> Result<Option<T>, Error> {
        self.check_bounds(pos)?;
        let ix = self.ix(pos);
        Ok(std::mem::replace(&mut self.cells[ix], occupant))
    }

    /// All cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Option<&T>)> + '_ {
        let columns = self.columns;
        self.cells
            .iter()
            .enumerate()
            .map(move |(ix, cell)| (Position::new(ix / columns, ix % columns), cell.as_ref()))
    }

    /// In-bounds orthogonal neighbours of `pos`.
    pub fn neighbours(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        pos.orthogonal_neighbours()
            .filter(move |p| self.in_bounds(*p))
    }
}

impl<T> fmt::Display for Grid<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks(self.columns.max(1)) {
            let line = row
                .iter()
                .map(|cell| if cell.is_some() { '#' } else { '.' })
                .join("");
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
