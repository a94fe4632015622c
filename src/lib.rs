pub mod config;
pub mod error;
pub mod hierarchy;
pub mod rules;
pub mod workflow;
