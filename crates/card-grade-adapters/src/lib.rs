//! Card Grade Adapters - External adapters for card-grade.
//!
//! This crate provides adapters for:
//! - Filesystem grading-event source
//! - Reading standalone JSON payload files

pub mod fs;

pub use fs::{read_json_file, FsGradingSource};
