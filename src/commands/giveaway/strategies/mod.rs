pub mod base;
pub mod random;

pub use crate::commands::giveaway::strategies::base::{DrawOptions, WinnerStrategy};
pub use crate::commands::giveaway::strategies::random::UniformRandomStrategy;
