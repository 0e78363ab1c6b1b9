//! linc - browse Linear issues in the terminal and hand them off to a coding agent
//!
//! This library crate exposes internal modules for integration testing.

pub mod agent;
pub mod config;
pub mod data;
pub mod integrations;
pub mod tui;
pub mod util;
