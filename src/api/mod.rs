//! HTTP layer for the pet-behavior backend.

pub mod client;
pub mod types;

pub use client::{ApiClient, ApiError, Timeouts};
pub use types::{ChatReply, ServedVideo};
