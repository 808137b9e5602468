use crate::app::monitor::{ComputerSystem, Limits, LimitsType, MonitorData, SensorEntry};
use crate::core::context::CommandContext;
use crate::core::registry::CommandRegistration;
use crate::domain::ports::CommandGroup;
use crate::utils::compare::parse_bool_flag;
use crate::utils::error::{NimbusError, Result};
use crate::utils::validation::validate_range;
use async_trait::async_trait;
use chrono::Utc;
use clap::{Arg, ArgAction, ArgMatches, Command, FromArgMatches, Subcommand};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Subcommand)]
enum MonitorCommand {
    /// Prints a table of the sensors
    List {
        /// Include disabled sensors
        #[arg(long)]
        all: bool,
    },
    /// Keeps updating the sensors and printing the table, until Ctrl-C
    Watch {
        /// Seconds between updates (defaults to the saved update time)
        #[arg(long)]
        interval: Option<f64>,
        /// Stop after this many updates
        #[arg(long)]
        count: Option<usize>,
    },
    /// Prints details of a sensor
    Info { id: String },
    /// Formats TEMPLATE with sensor attributes, such as "{name}: {value:.2f}"
    Format { id: String, template: String },
    /// Enables (or disables) a sensor
    Enable {
        id: String,
        #[arg(value_parser = parse_bool_flag, action = ArgAction::Set, default_value = "true")]
        enabled: bool,
    },
    /// Changes how the limits of a sensor are computed
    Limits {
        id: String,
        #[arg(long = "type", value_enum)]
        limits_type: LimitsType,
        /// Custom minimum (FIXED limits)
        #[arg(long, requires = "max")]
        min: Option<f64>,
        /// Custom maximum (FIXED limits)
        #[arg(long, requires = "min")]
        max: Option<f64>,
    },
    /// Changes the monitor settings
    Configure {
        /// Seconds between sensor updates
        #[arg(long)]
        update_time: Option<f64>,
        #[arg(long, value_parser = parse_bool_flag)]
        show_progress: Option<bool>,
    },
    /// Writes all sensors to a CSV file
    Snapshot {
        #[arg(long, short)]
        output: PathBuf,
    },
}

#[derive(Debug, Serialize)]
struct SnapshotRow<'a> {
    timestamp: &'a str,
    hardware: &'a str,
    id: &'a str,
    name: &'a str,
    sensor_type: String,
    unit: &'static str,
    value: f64,
    minimum: Option<f64>,
    maximum: Option<f64>,
    enabled: bool,
}

pub struct MonitorGroup;

impl MonitorGroup {
    fn require_entry<'a>(system: &'a ComputerSystem, id: &str) -> Result<SensorEntry<'a>> {
        system.entry(id).ok_or_else(|| NimbusError::not_found("Sensor", id))
    }

    fn render_table(system: &ComputerSystem, all: bool) -> Vec<String> {
        let entries: Vec<_> = system
            .entries()
            .into_iter()
            .filter(|e| all || e.sensor.enabled())
            .collect();

        let rows: Vec<[String; 6]> = entries
            .iter()
            .map(|e| {
                let sensor = e.sensor;
                let unit = sensor.unit();
                let measured =
                    |value: Option<f64>| value.map(|v| unit.format_value(v)).unwrap_or_else(|| "-".to_string());
                [
                    e.hardware_full_name.clone(),
                    format!("{} [{}]", sensor.name(), sensor.id()),
                    sensor.sensor_type().to_string(),
                    format!("{}{}", sensor.formatted_value(), unit),
                    measured(sensor.minimum()),
                    measured(sensor.maximum()),
                ]
            })
            .collect();

        let header = ["Hardware", "Sensor", "Type", "Value", "Min", "Max"];
        let mut widths = header.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut lines = Vec::with_capacity(rows.len() + 1);
        let header_line = header
            .iter()
            .zip(widths)
            .map(|(title, width)| format!("{:<width$}", title))
            .collect::<Vec<_>>()
            .join(" | ");
        lines.push(header_line.bold().to_string());

        for (entry, row) in entries.iter().zip(&rows) {
            let cells: Vec<String> = row
                .iter()
                .zip(widths)
                .enumerate()
                .map(|(column, (cell, width))| {
                    let padded = format!("{:<width$}", cell);
                    match column {
                        3 => entry.sensor.state_color().paint(&padded).to_string(),
                        _ if !entry.sensor.enabled() => padded.dimmed().to_string(),
                        _ => padded,
                    }
                })
                .collect();
            lines.push(cells.join(" | "));
        }
        lines
    }

    fn print_table(ctx: &mut CommandContext, system: &ComputerSystem, all: bool) {
        for line in Self::render_table(system, all) {
            ctx.output.line(line);
        }
    }

    fn write_snapshot(system: &ComputerSystem, path: &Path) -> Result<usize> {
        let timestamp = Utc::now().to_rfc3339();
        let mut writer = csv::Writer::from_path(path)?;
        let entries = system.entries();
        for entry in &entries {
            let sensor = entry.sensor;
            writer.serialize(SnapshotRow {
                timestamp: &timestamp,
                hardware: &entry.hardware_full_name,
                id: sensor.id(),
                name: sensor.name(),
                sensor_type: sensor.sensor_type().to_string(),
                unit: sensor.unit().id(),
                value: sensor.value(),
                minimum: sensor.minimum(),
                maximum: sensor.maximum(),
                enabled: sensor.enabled(),
            })?;
        }
        writer.flush()?;
        Ok(entries.len())
    }

    async fn watch(
        ctx: &mut CommandContext,
        system: &mut ComputerSystem,
        data: &MonitorData,
        interval: Option<f64>,
        count: Option<usize>,
    ) -> Result<()> {
        let interval = interval.unwrap_or(data.update_time);
        validate_range("interval", interval, 0.05, 3600.0)?;
        system.update_time = interval;

        let mut ticker = tokio::time::interval(Duration::from_secs_f64(interval));
        let mut updates = 0usize;
        tracing::info!("👀 Watching sensors every {}s (Ctrl-C to stop)", interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if !system.timed_update(interval)? {
                        continue;
                    }
                    updates += 1;
                    if data.show_update_progress {
                        let progress = match count {
                            Some(total) => format!("Update {}/{}", updates, total),
                            None => format!("Update {}", updates),
                        };
                        ctx.output.line(progress.cyan());
                    }
                    Self::print_table(ctx, system, false);
                    if count.is_some_and(|total| updates >= total) {
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("🛑 Stopped watching sensors");
                    break;
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CommandGroup for MonitorGroup {
    fn name(&self) -> &'static str {
        "monitor"
    }

    fn command(&self) -> Command {
        let cmd = Command::new("monitor")
            .about("Hardware sensor monitor")
            .subcommand_required(true)
            .arg(
                Arg::new("test")
                    .long("test")
                    .global(true)
                    .action(ArgAction::SetTrue)
                    .help("Use dummy test sensors instead of the system's"),
            );
        MonitorCommand::augment_subcommands(cmd)
    }

    async fn run(&self, ctx: &mut CommandContext, matches: &ArgMatches) -> Result<()> {
        let dummy = matches.get_flag("test");
        let command = MonitorCommand::from_arg_matches(matches)?;
        let custom_limits = match &command {
            MonitorCommand::Limits {
                min: Some(min),
                max: Some(max),
                ..
            } => Some(Limits::checked(*min, *max)?),
            _ => None,
        };
        let mut data = MonitorData::load(&mut ctx.cache, &ctx.config.monitor)?;

        if let MonitorCommand::Configure {
            update_time,
            show_progress,
        } = command
        {
            if let Some(update_time) = update_time {
                validate_range("update_time", update_time, 0.05, 3600.0)?;
                data.update_time = update_time;
            }
            if let Some(show) = show_progress {
                data.show_update_progress = show;
            }
            data.save(&mut ctx.cache)?;
            ctx.output.line(format!(
                "update_time = {}s, show_update_progress = {}",
                data.update_time, data.show_update_progress
            ));
            return Ok(());
        }

        let mut system = ComputerSystem::new(data.update_time);
        system.open(dummy)?;
        data.apply_to(&mut system);
        system.update()?;

        let result = match command {
            MonitorCommand::List { all } => {
                Self::print_table(ctx, &system, all);
                Ok(())
            }
            MonitorCommand::Watch { interval, count } => {
                Self::watch(ctx, &mut system, &data, interval, count).await
            }
            MonitorCommand::Info { id } => Self::require_entry(&system, &id).map(|entry| {
                let info = entry.info();
                ctx.output.line(info);
            }),
            MonitorCommand::Format { id, template } => Self::require_entry(&system, &id).map(|entry| {
                let text = entry.sensor.format(&template);
                ctx.output.line(text);
            }),
            MonitorCommand::Enable { id, enabled } => match system.sensor_mut(&id) {
                Some(sensor) => {
                    sensor.set_enabled(enabled);
                    let state = if enabled { "enabled".green() } else { "disabled".yellow() };
                    ctx.output.line(format!("{} {}", sensor.name(), state));
                    Ok(())
                }
                None => Err(NimbusError::not_found("Sensor", id)),
            },
            MonitorCommand::Limits { id, limits_type, .. } => match system.sensor_mut(&id) {
                Some(sensor) => {
                    sensor.settings.limits_type = limits_type;
                    if custom_limits.is_some() {
                        sensor.settings.custom_limits = custom_limits;
                    }
                    let limits = sensor
                        .limits()
                        .map(|l| format!("{} .. {}", l.min, l.max))
                        .unwrap_or_else(|| "none".to_string());
                    ctx.output.line(format!("{} limits ({:?}): {}", sensor.name(), limits_type, limits));
                    Ok(())
                }
                None => Err(NimbusError::not_found("Sensor", id)),
            },
            MonitorCommand::Snapshot { output } => Self::write_snapshot(&system, &output).map(|rows| {
                tracing::info!("📁 Snapshot saved to: {}", output.display());
                ctx.output.line(format!("Wrote {} sensors to {}", rows, output.display()).green());
            }),
            MonitorCommand::Configure { .. } => Ok(()),
        };

        data.collect_from(&system);
        data.save(&mut ctx.cache)?;
        system.close();
        result
    }
}

fn factory() -> Box<dyn CommandGroup> {
    Box::new(MonitorGroup)
}

inventory::submit! {
    CommandRegistration::new(factory)
}
