use std::collections::HashSet;

use crate::error::Result;

pub struct DrawOptions {
    entrants: Vec<u64>,
    winner_target: usize,
}

impl DrawOptions {
    // Repeated identifiers are dropped, so every entrant has exactly one ticket.
    pub fn new(entrants: &[u64], winner_target: usize) -> Self {
        let mut seen = HashSet::new();
        let entrants = entrants
            .iter()
            .copied()
            .filter(|user_id| seen.insert(*user_id))
            .collect();

        DrawOptions {
            entrants,
            winner_target,
        }
    }

    // Returns the frozen list of entrants for the draw.
    pub fn entrants(&self) -> &[u64] {
        &self.entrants
    }

    // Returns the amount of winners that can actually be picked.
    pub fn winner_count(&self) -> usize {
        self.winner_target.min(self.entrants.len())
    }
}

pub trait WinnerStrategy: Send + Sync {
    // Picks winners from the entrants in according to the passed draw options.
    fn draw(&self, options: &DrawOptions) -> Result<Vec<u64>>;
}
