//! Core domain types and logic.

pub mod bar;
pub mod position;
pub mod execution;
pub mod event;
pub mod validation;
pub mod backtest;
pub mod metrics;
pub mod universe;
pub mod batch;
pub mod config_validation;
pub mod error;
