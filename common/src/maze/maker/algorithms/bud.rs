use std::mem;

use log::debug;
use rand::seq::SliceRandom;

use super::super::GridGraph;
use crate::maze::cell::Position;

pub trait Bud {
    /// Scans the visited cells in random order and buds up to
    /// `bud_count + 1` new branch points off them into the on-hold pool.
    /// Returns how many it found.
    fn resume_from_visited(&mut self, bud_count: usize) -> usize;
}

impl Bud for GridGraph {
    fn resume_from_visited(&mut self, bud_count: usize) -> usize {
        let wanted = bud_count + 1;
        let mut budded = 0;

        let mut candidates = mem::take(&mut self.visited);
        candidates.shuffle(&mut self.rng);

        let mut kept = Vec::with_capacity(candidates.len());
        let mut dropped = 0;

        for position in candidates {
            if budded == wanted {
                kept.push(position);
                continue;
            }

            // The end never buds, so it leaves the list with the explored cells.
            if self.cell(position).is_end() || self.is_fully_explored(position) {
                dropped += 1;
                continue;
            }
            kept.push(position);

            // Unexpanded cells still have their own turn coming.
            if !self.cell(position).is_expanded() {
                continue;
            }

            if let Some(child) = bud_from(self, position) {
                self.on_hold.push(child);
                budded += 1;
            }
        }

        // Buds were recorded as visited while the list was taken out.
        let buds = mem::replace(&mut self.visited, kept);
        self.visited.extend(buds);

        debug!(
            "resumed with {} of {} buds, dropped {} cells, {} unvisited",
            budded, wanted, dropped, self.unvisited
        );

        budded
    }
}

fn bud_from(grid: &mut GridGraph, position: Position) -> Option<Position> {
    let parent = grid.cell(position).tree_parent();
    let mut directions: Vec<_> = grid
        .accessible_directions(position)
        .into_iter()
        .filter(|&direction| Some(direction) != parent)
        .collect();
    directions.shuffle(&mut grid.rng);

    directions
        .into_iter()
        .find_map(|direction| grid.claim_neighbor(position, direction))
}
