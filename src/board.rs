//! Routing connections between items on a board.
//!
//! A board of `N×M` cells is routed on a `(2N-1)×(2M-1)` grid: board cell `(r, c)` sits at
//! `(2r, 2c)` and every position with an odd coordinate is an always-empty lane between items.
//! Routes can therefore bend between two items and leave or enter an item from a chosen side.
use itertools::Itertools;

use crate::{Endpoint, Error, Grid, Position, Router};

/// Builds the double-resolution routing grid of a board.
pub fn expand_board<T: Clone>(board: &Grid<T>) -> Grid<T> {
    let rows = (2 * board.rows()).saturating_sub(1);
    let columns = (2 * board.columns()).saturating_sub(1);
    Grid::from_fn(rows, columns, |pos| {
        to_board(pos).and_then(|cell| board.get(cell)).cloned()
    })
}

/// Where a board cell lands on the routing grid.
pub fn to_routing(board_pos: Position) -> Position {
    Position::new(board_pos.row * 2, board_pos.column * 2)
}

/// The board cell at a routing position, if it is not a lane.
pub fn to_board(routing_pos: Position) -> Option<Position> {
    if routing_pos.row % 2 == 0 && routing_pos.column % 2 == 0 {
        Some(Position::new(routing_pos.row / 2, routing_pos.column / 2))
    } else {
        None
    }
}

/// Routes a connection between the items at `from` and `to` on a routing grid. Items block
/// unless they are `same_item` as the destination, which also decides when the destination is
/// reached. The result starts at `from`; it is empty if the items cannot be connected.
pub fn route_connection<T, F>(
    routing: &Grid<T>,
    from: Position,
    to: Position,
    same_item: F,
) -> Result<Vec<Position>, Error>
where
    F: Fn(&T, &T) -> bool,
{
    let start = Endpoint::at(routing, from)?;
    let end = Endpoint::at(routing, to)?;
    let destination = end.occupant;
    let mut path = Router::with_value_equals(routing, |a: &T, b: &T| same_item(a, b))
        .blocking(|occupant: Option<&T>| match (occupant, destination) {
            (Some(o), Some(d)) => !same_item(o, d),
            (Some(_), None) => true,
            (None, _) => false,
        })
        .search(start, end)?;
    if !path.is_empty() {
        path.insert(0, from);
    }
    Ok(path)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The direction of the step from `from` to `to`, by the dominant axis.
    pub fn between(from: Position, to: Position) -> Direction {
        if from.row.abs_diff(to.row) >= from.column.abs_diff(to.column) {
            if to.row < from.row {
                Direction::Up
            } else {
                Direction::Down
            }
        } else if to.column < from.column {
            Direction::Left
        } else {
            Direction::Right
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// Unit step as `(row, column)` deltas.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// One step of a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    pub from: Position,
    pub to: Position,
    pub direction: Direction,
}

/// Splits a route into its steps. Consecutive positions are expected to be adjacent.
pub fn segments(path: &[Position]) -> Vec<Segment> {
    path.iter()
        .tuple_windows()
        .map(|(&from, &to)| {
            debug_assert!(from.is_adjacent(&to), "{} and {} are not adjacent", from, to);
            Segment {
                from,
                to,
                direction: Direction::between(from, to),
            }
        })
        .collect()
}

/// Positions at which a route changes direction.
pub fn corners(path: &[Position]) -> Vec<Position> {
    segments(path)
        .iter()
        .tuple_windows()
        .filter(|(a, b)| a.direction != b.direction)
        .map(|(a, _)| a.to)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Item {
        id: u32,
    }

    fn board(cells: &[(usize, usize, u32)], size: usize) -> Grid<Item> {
        let mut board = Grid::new(size, size);
        for &(row, column, id) in cells {
            board
                .set(Position::new(row, column), Some(Item { id }))
                .unwrap();
        }
        board
    }

    fn same(a: &Item, b: &Item) -> bool {
        a.id == b.id
    }

    #[test]
    fn expansion_interleaves_lanes() {
        let routing = expand_board(&board(&[(0, 0, 1), (1, 2, 2)], 3));
        assert_eq!((routing.rows(), routing.columns()), (5, 5));
        assert_eq!(routing.get(Position::new(0, 0)), Some(&Item { id: 1 }));
        assert_eq!(routing.get(Position::new(2, 4)), Some(&Item { id: 2 }));
        assert_eq!(routing.iter().filter(|(_, o)| o.is_some()).count(), 2);
        assert_eq!(routing.to_string(), "#....\n.....\n....#\n.....\n.....\n");
    }

    #[test]
    fn empty_board_expands_to_empty_grid() {
        let routing = expand_board(&Grid::<Item>::new(0, 0));
        assert!(routing.is_empty());
        let routing = expand_board(&Grid::<Item>::new(0, 3));
        assert_eq!((routing.rows(), routing.columns()), (0, 0));
    }

    #[test]
    fn coordinate_mapping() {
        assert_eq!(to_routing(Position::new(3, 1)), Position::new(6, 2));
        assert_eq!(to_board(Position::new(6, 2)), Some(Position::new(3, 1)));
        assert_eq!(to_board(Position::new(5, 2)), None);
    }

    #[test]
    fn connection_runs_through_lanes() {
        // 1 2 .
        // . . .
        // . . 3
        // Item 2 sits between 1 and 3 on the top row, so the route uses the lane below it.
        let routing = expand_board(&board(&[(0, 0, 1), (0, 1, 2), (2, 2, 3)], 3));
        let from = to_routing(Position::new(0, 0));
        let to = to_routing(Position::new(2, 2));
        let path = route_connection(&routing, from, to, same).unwrap();
        assert_eq!(path.first(), Some(&from));
        assert_eq!(path.last(), Some(&to));
        assert_eq!(path.len(), 9);
        assert!(!path.contains(&to_routing(Position::new(0, 1))));
        assert_eq!(segments(&path).len(), 8);
    }

    #[test]
    fn enclosed_item_has_no_connection() {
        let items = [(0, 0, 1), (0, 1, 4), (1, 0, 5), (1, 1, 6), (2, 2, 3)];
        let routing = expand_board(&board(&items, 3));
        // Lanes still pass between items, so only a fully occupied ring blocks a route.
        let path =
            route_connection(&routing, Position::new(0, 0), Position::new(4, 4), same).unwrap();
        assert!(!path.is_empty());

        let mut walled: Grid<Item> = Grid::new(3, 3);
        for (row, column) in [(0, 1), (1, 0), (1, 1)] {
            walled.set(Position::new(row, column), Some(Item { id: 9 })).unwrap();
        }
        walled.set(Position::new(0, 0), Some(Item { id: 1 })).unwrap();
        walled.set(Position::new(2, 2), Some(Item { id: 3 })).unwrap();
        let path =
            route_connection(&walled, Position::new(0, 0), Position::new(2, 2), same).unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn dragged_copy_connects_to_its_original() {
        // During a drag the item is shown both at its old and its hovered cell.
        let mut routing = expand_board(&board(&[(0, 0, 7)], 3));
        routing.set(to_routing(Position::new(2, 1)), Some(Item { id: 7 })).unwrap();
        let from = to_routing(Position::new(0, 0));
        let to = to_routing(Position::new(2, 1));
        let path = route_connection(&routing, from, to, same).unwrap();
        assert_eq!(path.len(), 7);
        assert_eq!(path.last(), Some(&to));
    }

    #[test]
    fn out_of_bounds_connection_fails() {
        let routing = expand_board(&board(&[(0, 0, 1)], 2));
        let result = route_connection(&routing, Position::new(0, 0), Position::new(3, 3), same);
        assert!(result.is_err());
    }

    #[test]
    fn segment_directions_and_corners() {
        let path = [
            Position::new(2, 0),
            Position::new(1, 0),
            Position::new(1, 1),
            Position::new(1, 2),
            Position::new(2, 2),
        ];
        let directions: Vec<Direction> = segments(&path).iter().map(|s| s.direction).collect();
        assert_eq!(
            directions,
            vec![Direction::Up, Direction::Right, Direction::Right, Direction::Down]
        );
        assert_eq!(corners(&path), vec![Position::new(1, 0), Position::new(1, 2)]);
        assert!(segments(&path[..1]).is_empty());
        assert_eq!(Direction::Left.delta(), (0, -1));
        assert!(Direction::Down.is_vertical());
    }
}
