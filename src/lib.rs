//! Content-based game recommendations.
//!
//! Games are matched on shared tags and genres, weighted by how rare those
//! attributes are across the catalog, and modulated by embedding distance.
//! When strict matches are scarce the search falls back to the query game's
//! cluster and then to the rest of the catalog.

pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
