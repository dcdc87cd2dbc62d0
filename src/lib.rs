//! # Ranked Visualizer
//!
//! Extracts a player's ranked match history from their profile page and
//! computes statistics over it.
//!
//! ## Architecture
//!
//! - **models**: Match records, histories, ratings and aggregate view types
//! - **extract**: Table location and row normalization from page markup
//! - **calculate**: Aggregate views (rating trajectory, win rates, opponent distribution)
//! - **fetch**: Player page sources (HTTP, saved file)
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod models;

pub use models::*;
