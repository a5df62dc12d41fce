//! Core domain types and logic.

pub mod asset;
pub mod bar;
pub mod config;
pub mod config_validation;
pub mod state;
pub mod moving_average;
pub mod signal;
pub mod strategy;
pub mod order;
pub mod portfolio;
pub mod execution;
pub mod backtest;
pub mod error;
