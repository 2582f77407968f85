use grid_router::board::{corners, expand_board, route_connection, segments, to_board, to_routing};
use grid_router::{Grid, Position};

// In this example three tasks are placed on a 4x4 board
//  ____
// |A B |
// |  C |
// |    |
// |   D|
//  ____
// and the dependency A -> D is routed through the lanes between the tasks.

#[derive(Clone, Debug)]
struct Task {
    id: u32,
    icon: char,
}

fn main() -> Result<(), grid_router::Error> {
    let mut board: Grid<Task> = Grid::new(4, 4);
    for (row, column, id, icon) in [(0, 0, 1, 'A'), (0, 2, 2, 'B'), (1, 2, 3, 'C'), (3, 3, 4, 'D')] {
        board.set(Position::new(row, column), Some(Task { id, icon }))?;
    }
    let routing = expand_board(&board);
    println!("{}", routing);

    let from = to_routing(Position::new(0, 0));
    let to = to_routing(Position::new(3, 3));
    let path = route_connection(&routing, from, to, |a: &Task, b: &Task| a.id == b.id)?;
    let icons = |p: Position| {
        to_board(p)
            .and_then(|cell| board.get(cell))
            .map_or(' ', |task| task.icon)
    };
    println!("Route ({} steps):", path.len().saturating_sub(1));
    for segment in segments(&path) {
        println!("{} -> {} {:?} {}", segment.from, segment.to, segment.direction, icons(segment.to));
    }
    println!("Corners: {:?}", corners(&path));
    Ok(())
}
