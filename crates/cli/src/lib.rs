//! Filecoin Plus CLI Library
//!
//! Command-line client for Filecoin Plus allocator contracts: deploys
//! allocator contracts through a registry, lists allocators and their
//! allowances, and manages allowances and verified clients.

pub mod args;
pub mod commands;
pub mod config;
pub mod output;

pub use args::{CliArgs, Command, LogLevel};

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
