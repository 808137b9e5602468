use crate::core::context::CommandContext;
use crate::core::registry::CommandRegistration;
use crate::data::cache::read_cache_file;
use crate::domain::ports::CommandGroup;
use crate::utils::compare::diff_values;
use crate::utils::error::{NimbusError, Result};
use async_trait::async_trait;
use clap::{ArgMatches, Command, FromArgMatches, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
enum CacheCommand {
    /// Prints the path of the data cache file
    Path,
    /// Lists all keys stored in the data cache
    Keys,
    /// Prints the stored JSON value of KEY
    Get { key: String },
    /// Removes KEY from the data cache
    Remove { key: String },
    /// Deletes the whole data cache file. All commands lose their saved data!
    Clear {
        /// Confirms the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Compares the data cache with another data cache FILE
    Diff { file: PathBuf },
}

pub struct CacheGroup;

#[async_trait]
impl CommandGroup for CacheGroup {
    fn name(&self) -> &'static str {
        "cache"
    }

    fn command(&self) -> Command {
        let cmd = Command::new("cache")
            .about("Inspect and manage Nimbus's persisted data cache")
            .subcommand_required(true);
        CacheCommand::augment_subcommands(cmd)
    }

    async fn run(&self, ctx: &mut CommandContext, matches: &ArgMatches) -> Result<()> {
        match CacheCommand::from_arg_matches(matches)? {
            CacheCommand::Path => {
                let path = ctx.cache.data_path().display().to_string();
                ctx.output.line(path);
            }
            CacheCommand::Keys => {
                let keys = ctx.cache.keys()?;
                if keys.is_empty() {
                    ctx.output.line("Data cache is empty".yellow());
                }
                for key in keys {
                    ctx.output.line(key);
                }
            }
            CacheCommand::Get { key } => {
                let value = ctx
                    .cache
                    .get_value(&key)?
                    .ok_or_else(|| NimbusError::not_found("Cache key", &key))?;
                ctx.output.line(serde_json::to_string_pretty(&value)?);
            }
            CacheCommand::Remove { key } => {
                if ctx.cache.get_value(&key)?.is_none() {
                    return Err(NimbusError::not_found("Cache key", key));
                }
                ctx.cache.set_value(&key, None)?;
                tracing::info!("🗑️ Removed cache key '{}'", key);
                ctx.output.line(format!("Removed '{}'", key).green());
            }
            CacheCommand::Clear { yes } => {
                if !yes {
                    return Err(NimbusError::MissingConfigError {
                        field: "--yes".to_string(),
                    });
                }
                ctx.cache.delete()?;
                tracing::warn!("🗑️ Data cache deleted");
                ctx.output.line("Data cache cleared".green());
            }
            CacheCommand::Diff { file } => {
                if !file.is_file() {
                    return Err(NimbusError::not_found("Cache file", file.display().to_string()));
                }
                let other = serde_json::to_value(read_cache_file(&file)?)?;
                let current = serde_json::to_value(&*ctx.cache.load_data()?)?;
                let other_name = file.display().to_string();

                let differences = diff_values(&current, "current", &other, &other_name);
                if differences.is_empty() {
                    ctx.output.line("No differences".green());
                }
                for line in differences {
                    ctx.output.line(line);
                }
            }
        }
        Ok(())
    }
}

fn factory() -> Box<dyn CommandGroup> {
    Box::new(CacheGroup)
}

inventory::submit! {
    CommandRegistration::new(factory)
}
