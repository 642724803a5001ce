//! # sql-retention
//! Deletes dump files older than the retention window.
//!

mod sweeper;

pub use sweeper::{RetentionSweeper, SweepError, age_in_days};
