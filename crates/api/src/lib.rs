//! Orchard API library.
//!
//! This crate provides the catalog backend as a library, allowing it to
//! be tested and reused. The `orchard-api` binary in `main.rs` is a thin
//! wrapper around these modules.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;
