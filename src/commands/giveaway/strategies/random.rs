use rand::seq::index::sample;

use crate::commands::giveaway::strategies::base::{DrawOptions, WinnerStrategy};
use crate::error::{Error, Result};

pub const NO_VALID_PARTICIPANTS_MESSAGE: &str =
    "Could not find valid participants. Please check the giveaway data.";

// Every entrant has the same chance, nobody can win twice.
#[derive(Debug, Default)]
pub struct UniformRandomStrategy;

impl UniformRandomStrategy {
    pub fn new() -> Self {
        UniformRandomStrategy {}
    }
}

impl WinnerStrategy for UniformRandomStrategy {
    fn draw(&self, options: &DrawOptions) -> Result<Vec<u64>> {
        let entrants = options.entrants();
        if entrants.is_empty() {
            return Err(Error::NoValidParticipants(
                NO_VALID_PARTICIPANTS_MESSAGE.to_string(),
            ));
        }

        let mut rng = rand::rng();
        let winners = sample(&mut rng, entrants.len(), options.winner_count())
            .into_iter()
            .map(|index| entrants[index])
            .collect();
        Ok(winners)
    }
}
