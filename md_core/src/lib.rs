//! ABOUTME: Core errors, clock abstraction, and tracing utilities
//! ABOUTME: Foundation crate used by all other motion sensor components

pub mod error;
pub mod telemetry;
pub mod time;

pub use error::{Error, Result};
pub use time::{Clock, SystemClock};
