//! Core types and utilities for marker-based needle tracking.
//!
//! This crate is intentionally small. It does *not* know about the wire
//! protocol of the tracking server or about the needle search; both live in
//! their own crates and exchange data through the types defined here.

mod frame;
mod logger;
mod pose;

pub use frame::{Frame, Marker};
pub use pose::Pose;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
