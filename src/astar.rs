//! The A* core behind [Router](crate::Router). Every call owns a fresh node arena keyed by
//! position; parents are stored as arena indices so the node graph never holds references into
//! itself and is dropped as a whole when the search returns.
use fxhash::FxBuildHasher;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use log::{debug, info, trace};
use num_traits::PrimInt;

use crate::heap::MinHeap;
use crate::router::{Endpoint, Termination};
use crate::{Grid, Position};

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Per-call bookkeeping for one visited position. Being present in the arena means visited.
#[derive(Clone, Debug)]
struct SearchNode<'g, T, C> {
    position: Position,
    occupant: Option<&'g T>,
    g: C,
    h: C,
    f: C,
    cost: C,
    closed: bool,
    parent: Option<usize>,
}

/// What the open set stores: the arena index of a node and its `f` at the time of insertion or
/// of the last decrease.
#[derive(Clone, Copy, Debug)]
struct OpenEntry<C> {
    index: usize,
    f: C,
}

/// Walks the parent indices back from the goal, leaving out the start node.
fn reverse_path<T, C>(
    nodes: &FxIndexMap<Position, SearchNode<'_, T, C>>,
    goal: usize,
) -> Vec<Position> {
    let mut path: Vec<Position> = std::iter::successors(Some(goal), |&ix| nodes[ix].parent)
        .take_while(|&ix| nodes[ix].parent.is_some())
        .map(|ix| nodes[ix].position)
        .collect();
    path.reverse();
    path
}

/// Bundles the caller's closures so the search loop can borrow them independently.
pub(crate) struct Predicates<FE, FB, FH, FC> {
    pub value_equals: FE,
    pub is_blocking: FB,
    pub heuristic: FH,
    pub step_cost: FC,
}

/// Runs A* from `start` until a node satisfying the termination rule is dequeued. Both endpoints
/// must be in bounds. Returns the path without the start position, or an empty path if the open
/// set runs dry.
pub(crate) fn astar<'g, T, C, FE, FB, FH, FC>(
    grid: &'g Grid<T>,
    start: &Endpoint<'g, T>,
    end: &Endpoint<'g, T>,
    termination: Termination,
    predicates: &mut Predicates<FE, FB, FH, FC>,
) -> Vec<Position>
where
    C: PrimInt,
    FE: FnMut(&T, &T) -> bool,
    FB: FnMut(Option<&T>) -> bool,
    FH: FnMut(Position, Position) -> C,
    FC: FnMut(Option<&T>) -> C,
{
    let Predicates {
        value_equals,
        is_blocking,
        heuristic,
        step_cost,
    } = predicates;
    // An empty end cell has no occupant to look for, so it is identified by its position.
    let mut occupant_matches = |position: Position, occupant: Option<&T>| {
        match (occupant, end.occupant) {
            (Some(a), Some(b)) => value_equals(a, b),
            (_, None) => position == end.position,
            (None, Some(_)) => false,
        }
    };

    // When both endpoints carry the same occupant the start node itself is the first match;
    // it has to be passed over or every such search would end with an empty path.
    let mut skip_first_match = termination == Termination::Occupant
        && occupant_matches(start.position, start.occupant);

    let mut nodes: FxIndexMap<Position, SearchNode<'g, T, C>> = FxIndexMap::default();
    let mut open = MinHeap::new(
        |e: &OpenEntry<C>| e.f,
        |a: &OpenEntry<C>, b: &OpenEntry<C>| a.index == b.index,
    );

    let h = heuristic(start.position, end.position);
    nodes.insert(
        start.position,
        SearchNode {
            position: start.position,
            occupant: start.occupant,
            g: C::zero(),
            h,
            f: h,
            cost: C::zero(),
            closed: false,
            parent: None,
        },
    );
    open.push(OpenEntry { index: 0, f: h });
    debug!(
        "Routing {} -> {} ({:?} goal)",
        start.position, end.position, termination
    );

    let mut expanded = 0usize;
    while !open.is_empty() {
        let OpenEntry { index, .. } = open.pop();
        let (position, occupant, g) = {
            let node = &nodes[index];
            (node.position, node.occupant, node.g)
        };

        let reached = match termination {
            Termination::Position => position == end.position,
            Termination::Occupant => occupant_matches(position, occupant),
        };
        if reached {
            if skip_first_match {
                trace!("Passing over the start match at {}", position);
                skip_first_match = false;
            } else {
                let path = reverse_path(&nodes, index);
                debug!(
                    "Routed {} -> {} in {} steps, {} nodes expanded",
                    start.position,
                    position,
                    path.len(),
                    expanded
                );
                return path;
            }
        }

        nodes[index].closed = true;
        expanded += 1;
        trace!("Expanding {} (g = {:?})", position, g.to_i64());

        for neighbour in grid.neighbours(position) {
            let neighbour_occupant = grid.get(neighbour);
            match nodes.entry(neighbour) {
                Occupied(mut e) => {
                    let n = e.index();
                    let node = e.get_mut();
                    if node.closed {
                        continue;
                    }
                    let tentative_g = g.saturating_add(node.cost);
                    if tentative_g < node.g {
                        node.g = tentative_g;
                        node.f = tentative_g.saturating_add(node.h);
                        node.parent = Some(index);
                        let repositioned = open.decrease_key(OpenEntry { index: n, f: node.f });
                        debug_assert!(repositioned, "open node {} missing from heap", neighbour);
                    }
                }
                Vacant(e) => {
                    if is_blocking(neighbour_occupant) {
                        continue;
                    }
                    let cost = step_cost(neighbour_occupant);
                    let tentative_g = g.saturating_add(cost);
                    let h = heuristic(neighbour, end.position);
                    let f = tentative_g.saturating_add(h);
                    let n = e.index();
                    e.insert(SearchNode {
                        position: neighbour,
                        occupant: neighbour_occupant,
                        g: tentative_g,
                        h,
                        f,
                        cost,
                        closed: false,
                        parent: Some(index),
                    });
                    open.push(OpenEntry { index: n, f });
                }
            }
        }
    }

    info!(
        "No route from {} towards {}, {} nodes expanded",
        start.position, end.position, expanded
    );
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::manhattan;

    fn unit_predicates() -> Predicates<
        impl FnMut(&char, &char) -> bool,
        impl FnMut(Option<&char>) -> bool,
        impl FnMut(Position, Position) -> u32,
        impl FnMut(Option<&char>) -> u32,
    > {
        Predicates {
            value_equals: |a: &char, b: &char| a == b,
            is_blocking: |o: Option<&char>| o.is_some_and(|&c| c == '#'),
            heuristic: manhattan::<u32>,
            step_cost: |_: Option<&char>| 1u32,
        }
    }

    #[test]
    fn start_is_left_out_of_the_path() {
        let mut grid: Grid<char> = Grid::new(1, 3);
        grid.set(Position::new(0, 0), Some('a')).unwrap();
        grid.set(Position::new(0, 2), Some('b')).unwrap();
        let start = Endpoint::at(&grid, Position::new(0, 0)).unwrap();
        let end = Endpoint::at(&grid, Position::new(0, 2)).unwrap();
        let path = astar(&grid, &start, &end, Termination::Occupant, &mut unit_predicates());
        assert_eq!(path, vec![Position::new(0, 1), Position::new(0, 2)]);
    }

    #[test]
    fn position_goal_on_start_is_empty() {
        let grid: Grid<char> = Grid::new(2, 2);
        let start = Endpoint::at(&grid, Position::new(1, 1)).unwrap();
        let path = astar(&grid, &start, &start, Termination::Position, &mut unit_predicates());
        assert!(path.is_empty());
    }

    #[test]
    fn empty_end_is_found_by_position() {
        // The empty cell (0, 1) is passed on the way, but only (0, 2) ends the search.
        let grid: Grid<char> = Grid::new(1, 3);
        let start = Endpoint::new(Position::new(0, 0), None);
        let end = Endpoint::new(Position::new(0, 2), None);
        let path = astar(&grid, &start, &end, Termination::Occupant, &mut unit_predicates());
        assert_eq!(path, vec![Position::new(0, 1), Position::new(0, 2)]);
    }

    #[test]
    fn cheaper_detour_is_preferred_over_costly_cells() {
        // ~ cells cost 10, so the route goes around the band instead of straight through.
        let rows = vec![
            vec![None, Some('~'), None],
            vec![None, Some('~'), None],
            vec![None, None, None],
        ];
        let grid = Grid::from_rows(rows).unwrap();
        let start = Endpoint::new(Position::new(0, 0), None);
        let end = Endpoint::new(Position::new(0, 2), None);
        let mut predicates = Predicates {
            value_equals: |a: &char, b: &char| a == b,
            is_blocking: |_: Option<&char>| false,
            heuristic: manhattan::<u32>,
            step_cost: |o: Option<&char>| if o == Some(&'~') { 10u32 } else { 1 },
        };
        let path = astar(&grid, &start, &end, Termination::Position, &mut predicates);
        assert_eq!(path.len(), 6);
        assert!(path.contains(&Position::new(2, 1)));
    }

    #[test]
    fn relaxation_lowers_g_of_open_nodes() {
        // S A #
        // ~ . G
        // The estimate for A is inflated so B is first opened from the costly ~ cell and later
        // lowered once A is expanded.
        let rows = vec![
            vec![None, None, Some('#')],
            vec![Some('~'), None, None],
        ];
        let grid = Grid::from_rows(rows).unwrap();
        let start = Endpoint::new(Position::new(0, 0), None);
        let end = Endpoint::new(Position::new(1, 2), None);
        let mut predicates = Predicates {
            value_equals: |a: &char, b: &char| a == b,
            is_blocking: |o: Option<&char>| o == Some(&'#'),
            heuristic: |p: Position, _: Position| match (p.row, p.column) {
                (0, 1) => 10u32,
                (1, 1) => 8,
                _ => 0,
            },
            step_cost: |o: Option<&char>| if o == Some(&'~') { 5u32 } else { 1 },
        };
        let path = astar(&grid, &start, &end, Termination::Position, &mut predicates);
        assert_eq!(
            path,
            vec![Position::new(0, 1), Position::new(1, 1), Position::new(1, 2)]
        );
    }
}
