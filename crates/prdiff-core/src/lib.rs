//! # prdiff-core
//!
//! Shared pieces used by every prdiff crate.
//!
//! ## Modules
//!
//! - `config`: Layered TOML configuration
//! - `logging`: tracing subscriber bootstrap
//! - `error`: Error type for configuration and logging setup

pub mod config;
pub mod error;
pub mod logging;

pub use config::{Config, DiffConfig};
pub use error::{ConfigError, ConfigResult};
