pub mod execute;
pub mod search;
pub mod task_ops;

pub use execute::{Numbered, Outcome, execute};
