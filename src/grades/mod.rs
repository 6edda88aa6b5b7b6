//! Grades and certification snapshots

pub mod commands;
pub mod types;
