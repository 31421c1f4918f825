pub mod config;
pub mod error;
pub mod roster;
pub mod runner;
pub mod schedule;
pub mod stats;
pub mod store;
pub mod types;
