pub mod human;
pub mod signal;
