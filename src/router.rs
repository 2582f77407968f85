use core::fmt;
use std::marker::PhantomData;

use log::warn;
use num_traits::{NumCast, PrimInt};

use crate::astar::{astar, Predicates};
use crate::{Error, Grid, Position};

/// One end of a route: where it is and which occupant identifies it.
pub struct Endpoint<'a, T> {
    pub position: Position,
    pub occupant: Option<&'a T>,
}

impl<'a, T> Endpoint<'a, T> {
    pub fn new(position: Position, occupant: Option<&'a T>) -> Endpoint<'a, T> {
        Endpoint { position, occupant }
    }

    /// An endpoint carrying whatever currently occupies `position` on the grid.
    pub fn at(grid: &'a Grid<T>, position: Position) -> Result<Endpoint<'a, T>, Error> {
        grid.check_bounds(position)?;
        Ok(Endpoint {
            position,
            occupant: grid.get(position),
        })
    }
}

impl<T> Clone for Endpoint<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Endpoint<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Endpoint<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("position", &self.position)
            .field("occupant", &self.occupant)
            .finish()
    }
}

/// When a search counts as finished.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Termination {
    /// On dequeuing a node whose occupant is value-equal to the end occupant. If the start
    /// occupant is already equal to it, the start node's own match is passed over. An empty end
    /// cell has nothing to match on and is found by its position instead; an empty cell never
    /// matches a present end occupant.
    #[default]
    Occupant,
    /// On dequeuing the end position.
    Position,
}

/// [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry), admissible for unit-cost
/// orthogonal moves. Saturates at the maximum of `C`.
pub fn manhattan<C: PrimInt>(a: Position, b: Position) -> C {
    <C as NumCast>::from(a.manhattan_distance(&b)).unwrap_or_else(C::max_value)
}

/// Any occupant blocks, empty cells are passable.
pub fn default_is_blocking<T>(occupant: Option<&T>) -> bool {
    occupant.is_some()
}

pub fn default_value_equals<T: PartialEq>(a: &T, b: &T) -> bool {
    a == b
}

fn unit_cost<T, C: PrimInt>(_: Option<&T>) -> C {
    C::one()
}

type EqualsFn<T> = fn(&T, &T) -> bool;
type BlockingFn<T> = fn(Option<&T>) -> bool;
type HeuristicFn<C> = fn(Position, Position) -> C;
type CostFn<T, C> = fn(Option<&T>) -> C;

/// Configures and runs searches over one grid.
///
/// Defaults: occupant-based [Termination], any occupant blocks, [manhattan] heuristic, every step
/// costs one, costs are [u32]. The grid is only read; a router can run any number of searches.
pub struct Router<
    'g,
    T,
    C = u32,
    FE = EqualsFn<T>,
    FB = BlockingFn<T>,
    FH = HeuristicFn<C>,
    FC = CostFn<T, C>,
> {
    grid: &'g Grid<T>,
    allow_diagonals: bool,
    termination: Termination,
    predicates: Predicates<FE, FB, FH, FC>,
    _cost: PhantomData<fn() -> C>,
}

impl<'g, T: PartialEq> Router<'g, T> {
    /// A router comparing occupants with [PartialEq].
    pub fn new(grid: &'g Grid<T>) -> Self {
        Router::with_value_equals(grid, default_value_equals::<T> as EqualsFn<T>)
    }
}

impl<'g, T, FE> Router<'g, T, u32, FE>
where
    FE: FnMut(&T, &T) -> bool,
{
    /// A router comparing occupants with `value_equals`, for occupants without a usable
    /// [PartialEq].
    pub fn with_value_equals(grid: &'g Grid<T>, value_equals: FE) -> Self {
        Router {
            grid,
            allow_diagonals: false,
            termination: Termination::default(),
            predicates: Predicates {
                value_equals,
                is_blocking: default_is_blocking::<T>,
                heuristic: manhattan::<u32>,
                step_cost: unit_cost::<T, u32>,
            },
            _cost: PhantomData,
        }
    }
}

impl<'g, T, C, FE, FB, FH, FC> Router<'g, T, C, FE, FB, FH, FC> {
    fn map_predicates<C2, FE2, FB2, FH2, FC2>(
        self,
        f: impl FnOnce(Predicates<FE, FB, FH, FC>) -> Predicates<FE2, FB2, FH2, FC2>,
    ) -> Router<'g, T, C2, FE2, FB2, FH2, FC2> {
        Router {
            grid: self.grid,
            allow_diagonals: self.allow_diagonals,
            termination: self.termination,
            predicates: f(self.predicates),
            _cost: PhantomData,
        }
    }
}

impl<'g, T, C, FE, FB, FH, FC> Router<'g, T, C, FE, FB, FH, FC>
where
    C: PrimInt,
    FE: FnMut(&T, &T) -> bool,
    FB: FnMut(Option<&T>) -> bool,
    FH: FnMut(Position, Position) -> C,
    FC: FnMut(Option<&T>) -> C,
{
    /// Recorded for callers that pass it through; moves are always orthogonal.
    pub fn allow_diagonals(mut self, allow_diagonals: bool) -> Self {
        self.allow_diagonals = allow_diagonals;
        self
    }

    pub fn terminate_on(mut self, termination: Termination) -> Self {
        self.termination = termination;
        self
    }

    pub fn value_equals<FE2>(self, value_equals: FE2) -> Router<'g, T, C, FE2, FB, FH, FC>
    where
        FE2: FnMut(&T, &T) -> bool,
    {
        self.map_predicates(
            |Predicates {
                 is_blocking,
                 heuristic,
                 step_cost,
                 ..
             }| Predicates {
                value_equals,
                is_blocking,
                heuristic,
                step_cost,
            },
        )
    }

    /// Decides which cells can be entered. The start cell is never tested.
    pub fn blocking<FB2>(self, is_blocking: FB2) -> Router<'g, T, C, FE, FB2, FH, FC>
    where
        FB2: FnMut(Option<&T>) -> bool,
    {
        self.map_predicates(
            |Predicates {
                 value_equals,
                 heuristic,
                 step_cost,
                 ..
             }| Predicates {
                value_equals,
                is_blocking,
                heuristic,
                step_cost,
            },
        )
    }

    /// Estimate of the remaining cost from a position to the end position. Must not
    /// overestimate, or paths are no longer guaranteed to be shortest.
    pub fn heuristic<FH2>(self, heuristic: FH2) -> Router<'g, T, C, FE, FB, FH2, FC>
    where
        FH2: FnMut(Position, Position) -> C,
    {
        self.map_predicates(
            |Predicates {
                 value_equals,
                 is_blocking,
                 step_cost,
                 ..
             }| Predicates {
                value_equals,
                is_blocking,
                heuristic,
                step_cost,
            },
        )
    }

    /// Cost of entering a cell with the given occupant.
    pub fn step_cost<FC2>(self, step_cost: FC2) -> Router<'g, T, C, FE, FB, FH, FC2>
    where
        FC2: FnMut(Option<&T>) -> C,
    {
        self.map_predicates(
            |Predicates {
                 value_equals,
                 is_blocking,
                 heuristic,
                 ..
             }| Predicates {
                value_equals,
                is_blocking,
                heuristic,
                step_cost,
            },
        )
    }

    /// Replaces heuristic and step cost together, which is how the cost type is changed.
    pub fn costs<C2, FH2, FC2>(
        self,
        heuristic: FH2,
        step_cost: FC2,
    ) -> Router<'g, T, C2, FE, FB, FH2, FC2>
    where
        C2: PrimInt,
        FH2: FnMut(Position, Position) -> C2,
        FC2: FnMut(Option<&T>) -> C2,
    {
        self.map_predicates(
            |Predicates {
                 value_equals,
                 is_blocking,
                 ..
             }| Predicates {
                value_equals,
                is_blocking,
                heuristic,
                step_cost,
            },
        )
    }

    /// Computes a shortest route from `start`. The returned positions run from the cell after
    /// `start` up to and including the cell that ended the search; an empty path means no route
    /// exists. Fails only if an endpoint lies outside the grid.
    pub fn search(
        &mut self,
        start: Endpoint<'_, T>,
        end: Endpoint<'_, T>,
    ) -> Result<Vec<Position>, Error> {
        self.grid.check_bounds(start.position)?;
        self.grid.check_bounds(end.position)?;
        if self.allow_diagonals {
            warn!("Diagonal moves are not supported, routing with orthogonal moves only");
        }
        Ok(astar(
            self.grid,
            &start,
            &end,
            self.termination,
            &mut self.predicates,
        ))
    }
}

/// Routes from `start` to the first dequeued cell whose occupant is `value_equals` to the end
/// occupant, passing over a match on the start cell itself. An empty end cell is reached by
/// position. Pass [default_is_blocking] and [manhattan] for the usual behaviour.
pub fn search<T, C, FE, FB, FH>(
    grid: &Grid<T>,
    start: Endpoint<'_, T>,
    end: Endpoint<'_, T>,
    allow_diagonals: bool,
    value_equals: FE,
    is_blocking: FB,
    heuristic: FH,
) -> Result<Vec<Position>, Error>
where
    C: PrimInt,
    FE: FnMut(&T, &T) -> bool,
    FB: FnMut(Option<&T>) -> bool,
    FH: FnMut(Position, Position) -> C,
{
    Router::with_value_equals(grid, value_equals)
        .blocking(is_blocking)
        .costs(heuristic, unit_cost::<T, C>)
        .allow_diagonals(allow_diagonals)
        .search(start, end)
}
