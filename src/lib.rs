#![allow(missing_docs)]

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod merge;
pub mod migrate;
pub mod path_error;
pub mod paths;

pub use config::{parse_config, parse_default_config, Config};
pub use error::{ConfigError, Result};
pub use paths::{Environment, ResolvedPaths};
