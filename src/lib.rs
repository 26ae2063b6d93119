//! Clawdash - dashboard snapshot exporter for Clawdbot gateway sessions
//!
//! This library crate exposes internal modules for integration testing.

pub mod config;
pub mod data;
pub mod export;
pub mod integrations;
pub mod util;
