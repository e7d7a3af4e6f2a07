//! Ring-order cost relaxation shared by the overland and combat graphs
//!
//! Cells are expanded from a FIFO queue rather than a priority queue. With
//! equal-cost alternatives the path found first in breadth order is kept,
//! which gives straight lines instead of diagonal zig-zags. A cell is only
//! re-queued when its cost strictly improves, so the pass always terminates.

use std::collections::VecDeque;

use crate::core::error::Result;
use crate::core::types::DoubledMoves;
use crate::movement::grid::{MovementGrid, Reach};
use crate::spatial::{CoordinateSystem, Coords, Direction};

/// What stepping from one cell into a neighbour costs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The cell can never be entered (terrain, occupancy)
    Impassable,
    /// This particular crossing is blocked; other approaches may work
    Blocked,
    Enter {
        cost: DoubledMoves,
        /// Entering attacks whoever is there; the path ends here
        attack: bool,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelaxStats {
    pub expanded: usize,
    pub improved: usize,
}

/// Relax `grid` outwards from `origin`
///
/// `enter(from, direction, to)` prices each step. Cells are marked
/// reachable this turn when their cost fits within `budget`.
pub fn relax_ring_order<S, F>(
    grid: &mut MovementGrid,
    sys: &S,
    origin: Coords,
    budget: DoubledMoves,
    mut enter: F,
) -> Result<RelaxStats>
where
    S: CoordinateSystem + ?Sized,
    F: FnMut(Coords, Direction, Coords) -> Result<Step>,
{
    let mut stats = RelaxStats::default();
    let Some(start) = grid.cell_mut(origin) else {
        return Ok(stats);
    };
    start.reach = Reach::Cost(0);
    start.direction = None;
    start.reachable_this_turn = true;

    let mut queue = VecDeque::from([origin]);
    while let Some(current) = queue.pop_front() {
        stats.expanded += 1;
        let Some(distance_here) = grid.cost(current) else {
            continue;
        };

        for &direction in sys.directions() {
            let Some(next) = sys.step(current, direction) else {
                continue;
            };

            let (cost, attack) = match enter(current, direction, next)? {
                Step::Blocked => continue,
                Step::Impassable => {
                    if let Some(cell) = grid.cell_mut(next) {
                        if cell.reach == Reach::Unchecked {
                            cell.reach = Reach::Impassable;
                        }
                    }
                    continue;
                }
                Step::Enter { cost, attack } => (cost, attack),
            };

            let new_distance = distance_here + cost;
            let Some(cell) = grid.cell_mut(next) else {
                continue;
            };
            let improves = match cell.reach {
                Reach::Cost(existing) => new_distance < existing,
                Reach::Unchecked | Reach::Impassable => true,
            };
            if !improves {
                continue;
            }

            cell.reach = Reach::Cost(new_distance);
            cell.direction = Some(direction);
            cell.reachable_this_turn = new_distance <= budget;
            cell.results_in_attack = attack;
            stats.improved += 1;

            // Can't move through an enemy, only into it
            if !attack {
                queue.push_back(next);
            }
        }
    }

    Ok(stats)
}
