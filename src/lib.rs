pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::app::pipelines::{CipherPipeline, ClimatePipeline, TreePipeline};
pub use crate::config::{cli::LocalStorage, toml_config::KitConfig, CliConfig};
pub use crate::core::engine::ScriptEngine;
pub use crate::utils::error::{KitError, Result};
