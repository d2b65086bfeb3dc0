//! Core types for Orchard.
//!
//! Newtype wrappers for common domain concepts.

pub mod id;
pub mod price;

pub use id::ProductId;
pub use price::{Price, PriceError};
