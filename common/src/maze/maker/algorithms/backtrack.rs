use log::{debug, trace};

use super::super::{GenerationError, GridGraph, Pool};
use super::{
    bud::Bud,
    walk::{Step, Walk},
};
use crate::maze::cell::Position;

pub trait Backtrack {
    /// Walks corridors of at most `path_length` cells from the start,
    /// detouring to held branch points whenever a corridor runs out, until
    /// every cell has been visited and expanded.
    fn backtrack(&mut self, path_length: usize, bud_count: usize) -> Result<(), GenerationError>;
}

impl Backtrack for GridGraph {
    fn backtrack(&mut self, path_length: usize, bud_count: usize) -> Result<(), GenerationError> {
        let start = self.enter();
        self.frontier.push(start);

        let mut head = Some(start);
        let mut steps = 0;
        let mut corridors = 0;

        loop {
            let position = match head.take() {
                Some(position) if steps < path_length => {
                    // The head is always the newest frontier entry.
                    debug_assert_eq!(self.frontier.last(), Some(&position));
                    self.frontier.pop();
                    position
                }
                _ => {
                    steps = 0;
                    corridors += 1;
                    match next_held(self, bud_count)? {
                        Some(position) => position,
                        None => break,
                    }
                }
            };

            let step = self.choose_next_neighbor(position);
            self.set_parent_of_children(position);
            steps += 1;

            match step {
                Step::Linked(child) => head = Some(child),
                Step::Finish | Step::DeadEnd => {
                    trace!("corridor ended at {} after {} steps", position, steps);
                    if self.unvisited > 0 {
                        self.resume_from_visited(bud_count);
                    }
                }
            }
        }

        debug_assert_eq!(self.unvisited, 0);
        debug!("grew {} corridors", corridors);
        Ok(())
    }
}

/// Next cell to grow from once a corridor is over: a held bud if there is
/// one, otherwise any frontier cell, otherwise a freshly budded one. `None`
/// once every cell is visited and nothing is pending.
fn next_held(grid: &mut GridGraph, bud_count: usize) -> Result<Option<Position>, GenerationError> {
    if let Some(position) = grid.pick_out(Pool::OnHold) {
        return Ok(Some(position));
    }
    if let Some(position) = grid.pick_out(Pool::Frontier) {
        return Ok(Some(position));
    }
    if grid.unvisited == 0 {
        return Ok(None);
    }

    if grid.resume_from_visited(bud_count) == 0 {
        return Err(GenerationError::InternalInvariant {
            unvisited: grid.unvisited,
        });
    }

    Ok(grid.pick_out(Pool::OnHold))
}
