//! Platform-independent core of the earthquake map viewer.
//!
//! The browser crate (`frontend`) wires these pieces to MapLibre, `gloo-net`
//! and `gloo-timers`; everything in here is plain Rust so it can be driven
//! from native tests.

pub mod config;
pub mod error;
pub mod feed;
pub mod markers;
pub mod model;
