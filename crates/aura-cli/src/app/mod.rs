//! Application-level utilities for the Aura CLI.
//!
//! This module provides:
//! - Application context for unified CLI + config handling
//! - Path resolution for config and store files
//! - PIN and password entry with retry logic

mod context;
mod pin;
mod resolver;

pub use context::AppContext;
pub use pin::{read_new_pin, read_password, read_pin};
pub use resolver::resolve_config_path;
