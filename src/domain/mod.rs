pub mod relative;
pub mod task;
