//! Core functionality module
//!
//! This module contains configuration management and the error types shared
//! by the rest of the tool.
//!
//! # Submodules
//!
//! - `config` - Configuration loading, saving, and management
//! - `error` - Error types and result aliases

pub mod config;
pub mod error;
