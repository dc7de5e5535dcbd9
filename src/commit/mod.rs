//! Commit after the pen has rested.

mod scheduler;
mod state;

pub use scheduler::CommitScheduler;
pub use state::CommitState;
