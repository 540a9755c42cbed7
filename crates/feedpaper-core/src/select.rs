//! Picking one image out of the candidates.

use rand::Rng;
use rand::seq::IndexedRandom;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectError {
    #[error("no image candidates to choose from")]
    Empty,
}

/// Uniform choice over `candidates`.
pub fn choose<'a, R: Rng + ?Sized>(
    candidates: &'a [String],
    rng: &mut R,
) -> Result<&'a str, SelectError> {
    candidates
        .choose(rng)
        .map(String::as_str)
        .ok_or(SelectError::Empty)
}

pub fn choose_random(candidates: &[String]) -> Result<&str, SelectError> {
    choose(candidates, &mut rand::rng())
}
