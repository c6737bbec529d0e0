//! linkdeck: a paginated, filterable bookmark collection with categories,
//! tags, notes and per-bookmark styling.
//!
//! This library crate exposes all modules for use by the binaries and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod services;
pub mod rpc_handler;
pub mod types;
