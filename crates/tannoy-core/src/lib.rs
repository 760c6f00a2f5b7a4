//! Core types, config, and errors for Tannoy.

pub mod config;
pub mod error;
pub mod types;
