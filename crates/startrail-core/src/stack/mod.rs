pub mod accumulator;
pub mod max;

pub use accumulator::{Accumulator, Placeholder};
