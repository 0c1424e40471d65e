//! Attendance Penalty Engine
//!
//! This crate classifies clock-in and clock-out punches against scheduled
//! shifts, counts repeat violations within the day-21-to-day-20 penalty
//! period, and resolves each violation to an escalating severity level from
//! a configurable per-category table.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod history;
pub mod models;
