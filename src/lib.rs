//! Carbonico - estimate the carbon footprint of your digital habits.
//!
//! # Overview
//!
//! The core of the crate is [`estimator::FootprintEstimator`], a pure mapping
//! from an [`model::ActivityRecord`] (one day of digital activity) to grams of
//! CO₂, real-world equivalents and up to three improvement suggestions. The
//! remaining modules store results per username and serve them over HTTP.
//!
//! # Modules
//!
//! - [`model`]: Activity records, estimates, stored calculations and API types
//! - [`factors`]: Emission factors and conversion constants
//! - [`estimator`]: Footprint, equivalents and suggestion logic
//! - [`storage`]: SQLite storage layer
//! - [`leaderboard`]: Leaderboard, user history and recent users
//! - [`api`]: HTTP API handlers
//! - [`config`]: Environment configuration
//! - [`error`]: Error types

pub mod api;
pub mod config;
pub mod error;
pub mod estimator;
pub mod factors;
pub mod leaderboard;
pub mod model;
pub mod storage;
