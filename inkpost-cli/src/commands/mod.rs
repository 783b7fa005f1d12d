//! Command implementations for the inkpost CLI

pub mod serve;

// Re-export dispatcher functions for flat access from main.rs
pub use serve::run_serve;
