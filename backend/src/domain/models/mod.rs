pub mod contract;
pub mod reward;
pub mod task;
pub mod user;
