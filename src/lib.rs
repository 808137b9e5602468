pub mod app;
pub mod commands;
pub mod config;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;

pub use config::{CliConfig, NimbusConfig};
pub use crate::core::context::CommandContext;
pub use crate::core::dispatcher::run_cli;
pub use data::DataCache;
pub use domain::ports::CommandGroup;
pub use utils::error::{NimbusError, Result};
pub use utils::output::Output;
