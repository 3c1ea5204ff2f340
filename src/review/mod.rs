//! Review scheduling for Lexis.

pub mod scheduler;

pub use scheduler::Scheduler;
