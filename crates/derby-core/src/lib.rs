//! # derby-core
//!
//! Core types for the derby concurrent race simulation.
//!
//! A race is N autonomous competitor tasks advancing along a shared track,
//! coordinated only through a FIFO-fair bonus lock and per-competitor atomic
//! positions. This crate holds what every other crate needs: identifiers and
//! result records, the unified error type, and the run configuration.

mod config;
mod error;
mod types;

pub use config::RaceConfig;
pub use error::{DerbyError, Result};
pub use types::*;
