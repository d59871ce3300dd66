//! HTTP resource layer over the invitation lifecycle.

mod types;

pub use types::*;

pub mod axum;
