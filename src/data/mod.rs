mod batch;
mod permutation;

pub use batch::{BatchBuffer, BatchRef};
pub use permutation::Permutation;
