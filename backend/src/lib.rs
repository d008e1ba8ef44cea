//! # NightSeek Core
//!
//! Scoring and prediction engine for a nightly sky-observation advisor.
//!
//! This crate turns externally computed ephemeris, weather and orbital data into
//! ranked, explainable observing recommendations. It computes no positions
//! itself: sun, moon and object geometry arrive as [`models::NightInfo`] and
//! [`models::ObjectVisibility`] records, and satellite look angles come from a
//! caller-supplied [`services::Propagator`].
//!
//! ## Features
//!
//! - **Satellite Passes**: fixed-step scan of look angles with an explicit pass state machine,
//!   magnitude estimation and a parallel multi-satellite batch with partial-failure reporting
//! - **Object Scoring**: fifteen bounded score components with a readable reason
//! - **Night Quality**: star rating, continuous quality score and tier labels
//! - **Display Helpers**: quick filters, secondary sort fields, tonight's picks and best nights
//! - **Weather Aggregation**: hourly samples reduced to per-night summaries and clear windows
//!
//! ## Architecture
//!
//! - [`models`]: input snapshots and display models
//! - [`services`]: one module per component
//! - [`config`]: TOML configuration with defaults
//! - [`api`]: re-exports and flattened report rows for the presentation layer
//! - [`error`]: error taxonomy
//!
//! ## Cargo features
//!
//! - `parallel` (default): run the satellite batch on the rayon thread pool
//! - `cli` (default): build the `nightseek-report` binary

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::AdvisorConfig;
pub use error::{AdvisorError, AdvisorResult};
