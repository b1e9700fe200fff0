//! Sliding window of chunk columns around the observer.
#![forbid(unsafe_code)]

mod direction;
mod grid;

pub use direction::Direction;
pub use grid::{Grid, JobSink, ShiftOutcome};

#[cfg(test)]
mod tests;
