use crate::app::backup::{BackupEdit, BackupManager, Source, BACKUP_ID_GENERATOR};
use crate::core::context::CommandContext;
use crate::core::registry::CommandRegistration;
use crate::data::idgen::IdManager;
use crate::domain::ports::CommandGroup;
use crate::utils::error::{NimbusError, Result};
use async_trait::async_trait;
use clap::{ArgMatches, Command, FromArgMatches, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
enum BackupCommand {
    /// Creates a new backup configuration
    Create {
        name: String,
        /// Directory where the backup is stored
        #[arg(long)]
        path: Option<PathBuf>,
        /// Path to back up (repeatable)
        #[arg(long = "source")]
        sources: Vec<PathBuf>,
        /// Blacklist pattern applied to the given sources (repeatable)
        #[arg(long)]
        ignore: Vec<String>,
    },
    /// Lists all backup configurations
    List,
    /// Loads a backup configuration from an exported FILE
    Load { file: PathBuf },
    /// Changes a backup configuration
    Edit {
        name: String,
        /// New backup location
        #[arg(long)]
        path: Option<PathBuf>,
        /// Source to add (repeatable)
        #[arg(long = "add-source")]
        add_sources: Vec<PathBuf>,
        /// Source to remove (repeatable)
        #[arg(long = "remove-source")]
        remove_sources: Vec<PathBuf>,
        /// Blacklist pattern applied to the sources added in this call (repeatable)
        #[arg(long)]
        ignore: Vec<String>,
    },
    /// Exports the configuration to its backup location, to load it on another computer
    Export { name: String },
    /// Deletes the backup location and its configuration
    Delete {
        name: String,
        /// Confirms the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Checks whether the backup location and sources exist
    Status { name: String },
    /// Backs up the sources to the backup location
    Run { name: String },
    /// Restores the sources from the backup location
    Restore { name: String },
}

pub struct BackupGroup;

impl BackupGroup {
    fn persist(ctx: &mut CommandContext, manager: &BackupManager, ids: &IdManager) -> Result<()> {
        ids.save(&mut ctx.cache)?;
        manager.save(&mut ctx.cache)
    }
}

#[async_trait]
impl CommandGroup for BackupGroup {
    fn name(&self) -> &'static str {
        "backup"
    }

    fn command(&self) -> Command {
        let cmd = Command::new("backup")
            .about("Manage backup configurations")
            .subcommand_required(true);
        BackupCommand::augment_subcommands(cmd)
    }

    async fn run(&self, ctx: &mut CommandContext, matches: &ArgMatches) -> Result<()> {
        let command = BackupCommand::from_arg_matches(matches)?;
        let mut ids = IdManager::load(&mut ctx.cache)?;
        let mut manager = BackupManager::load(&mut ctx.cache)?;

        match command {
            BackupCommand::Create {
                name,
                path,
                sources,
                ignore,
            } => {
                let sources = sources
                    .into_iter()
                    .map(|path| Source {
                        path,
                        blacklist: ignore.clone(),
                    })
                    .collect();
                let backup = manager.create(ids.get(BACKUP_ID_GENERATOR)?, &name, sources, path)?;
                tracing::info!("✅ Created {} (id {})", backup, backup.id);
                ctx.output.line(format!("Created {}", backup).green());
                Self::persist(ctx, &manager, &ids)?;
            }
            BackupCommand::List => {
                if manager.backups().is_empty() {
                    ctx.output.line("No backups configured".yellow());
                }
                for backup in manager.backups() {
                    let location = backup
                        .backup_path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "<no location>".to_string());
                    ctx.output.line(format!(
                        "{} #{} -> {} ({} sources)",
                        backup.name.bold(),
                        backup.id,
                        location,
                        backup.sources.len()
                    ));
                }
            }
            BackupCommand::Load { file } => {
                let backup = manager.load_export(ids.get(BACKUP_ID_GENERATOR)?, &file)?;
                ctx.output.line(format!("Loaded {}", backup).green());
                Self::persist(ctx, &manager, &ids)?;
            }
            BackupCommand::Edit {
                name,
                path,
                add_sources,
                remove_sources,
                ignore,
            } => {
                manager.require_mut(&name)?.apply_edit(BackupEdit {
                    path,
                    add_sources,
                    remove_sources,
                    ignore,
                })?;
                ctx.output.line(format!("Updated {}Backup", name).green());
                Self::persist(ctx, &manager, &ids)?;
            }
            BackupCommand::Export { name } => {
                let path = manager.require(&name)?.export()?;
                ctx.output.line(format!("Exported to {}", path.display()).green());
            }
            BackupCommand::Delete { name, yes } => {
                if !yes {
                    return Err(NimbusError::MissingConfigError {
                        field: "--yes".to_string(),
                    });
                }
                let backup = manager.delete(ids.get(BACKUP_ID_GENERATOR)?, &name)?;
                ctx.output.line(format!("Deleted {}", backup).green());
                Self::persist(ctx, &manager, &ids)?;
            }
            BackupCommand::Status { name } => {
                let status = manager.require(&name)?.status()?;
                ctx.output.line(format!("Location: {}", status.location.display()));
                for (source, exists) in &status.sources {
                    let mark = if *exists { "✔".green() } else { "✘".red() };
                    ctx.output.line(format!("  {} {}", mark, source.display()));
                }
                let missing = status.missing_sources();
                if missing > 0 {
                    ctx.output.line(format!("{} source(s) missing", missing).yellow());
                }
            }
            BackupCommand::Run { name } => manager.require(&name)?.run()?,
            BackupCommand::Restore { name } => manager.require(&name)?.restore()?,
        }
        Ok(())
    }
}

fn factory() -> Box<dyn CommandGroup> {
    Box::new(BackupGroup)
}

inventory::submit! {
    CommandRegistration::new(factory)
}
