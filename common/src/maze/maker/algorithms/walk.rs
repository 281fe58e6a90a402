use log::trace;
use rand::Rng;

use super::super::GridGraph;
use crate::maze::cell::{Direction, Link, Position};

/// What expanding a cell produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Linked(Position),
    Finish,
    DeadEnd,
}

pub trait Walk {
    fn is_deadend(&self, position: Position) -> bool;
    fn choose_next_neighbor(&mut self, position: Position) -> Step;
    fn set_parent_of_children(&mut self, position: Position);
}

impl Walk for GridGraph {
    /// Every way out other than the parent leads to a cell some other cell
    /// already claimed. Directions this cell linked itself don't count.
    fn is_deadend(&self, position: Position) -> bool {
        let cell = self.cell(position);
        let parent = cell.tree_parent();

        self.accessible_directions(position)
            .into_iter()
            .filter(|&direction| Some(direction) != parent)
            .all(|direction| {
                !cell.has_link(direction)
                    && self
                        .neighbor(position, direction)
                        .is_some_and(|neighbor| self.is_visited(neighbor))
            })
    }

    fn choose_next_neighbor(&mut self, position: Position) -> Step {
        let cell = self.cell(position);

        if cell.is_end() {
            self.cell_mut(position).links.push(Link::Finish);
            trace!("{}: finish", position);
            return Step::Finish;
        }

        if !cell.is_start() && self.is_deadend(position) {
            self.cell_mut(position).links.push(Link::DeadEnd);
            trace!("{}: dead end", position);
            return Step::DeadEnd;
        }

        let parent = cell.tree_parent();
        let candidates: Vec<Direction> = self
            .accessible_directions(position)
            .into_iter()
            .filter(|&direction| Some(direction) != parent)
            .filter(|&direction| {
                self.neighbor(position, direction)
                    .is_some_and(|neighbor| !self.is_visited(neighbor))
            })
            .collect();

        if candidates.is_empty() {
            // Only reachable by a start cell with nowhere to go.
            self.cell_mut(position).links.push(Link::DeadEnd);
            return Step::DeadEnd;
        }

        let direction = pick_direction(self, position, &candidates);

        match self.claim_neighbor(position, direction) {
            Some(child) => {
                self.frontier.push(child);
                trace!("{}: {} to {}", position, direction, child);
                Step::Linked(child)
            }
            None => {
                self.cell_mut(position).links.push(Link::DeadEnd);
                Step::DeadEnd
            }
        }
    }

    fn set_parent_of_children(&mut self, position: Position) {
        let children: Vec<(Direction, Position)> = self
            .cell(position)
            .link_directions()
            .filter_map(|direction| {
                self.neighbor(position, direction)
                    .map(|child| (direction, child))
            })
            .collect();

        for (direction, child) in children {
            let cell = self.cell_mut(child);
            debug_assert!(
                cell.parent_direction.is_none_or(|parent| parent == direction.opposite()),
                "{} already has a different parent",
                child
            );
            cell.parent_direction = Some(direction.opposite());
        }
    }
}

fn pick_direction(grid: &mut GridGraph, position: Position, candidates: &[Direction]) -> Direction {
    if candidates.len() == 1 {
        return candidates[0];
    }

    // The start has no parent to carry on from.
    let Some(parent) = grid.cell(position).tree_parent() else {
        return candidates[grid.rng.random_range(0..candidates.len())];
    };

    let straight = parent.opposite();
    let turns: Vec<Direction> = candidates
        .iter()
        .copied()
        .filter(|&direction| direction != straight)
        .collect();

    if turns.len() == candidates.len() {
        return turns[grid.rng.random_range(0..turns.len())];
    }

    if grid.rng.random_bool(grid.tuning.straight_bias) {
        return straight;
    }

    match turns.as_slice() {
        &[turn] => turn,
        _ => pick_turn(grid, position, parent, &turns),
    }
}

/// Leans toward the turn whose side is closed on the parent, so corridors
/// run alongside walls and earlier corridors.
fn pick_turn(grid: &mut GridGraph, position: Position, parent: Direction, turns: &[Direction]) -> Direction {
    let closed: Vec<Direction> = match grid.neighbor(position, parent) {
        Some(parent_position) => turns
            .iter()
            .copied()
            .filter(|&turn| match grid.neighbor(parent_position, turn) {
                Some(neighbor) => grid.is_visited(neighbor),
                None => true,
            })
            .collect(),
        None => Vec::new(),
    };

    if let &[hug] = closed.as_slice() {
        let other = if turns[0] == hug { turns[1] } else { turns[0] };
        return if grid.rng.random_bool(grid.tuning.wall_hug_bias) {
            hug
        } else {
            other
        };
    }

    turns[grid.rng.random_range(0..turns.len())]
}
