use crate::app::factorio;
use crate::core::context::CommandContext;
use crate::core::registry::CommandRegistration;
use crate::domain::ports::CommandGroup;
use crate::utils::error::Result;
use async_trait::async_trait;
use clap::{ArgMatches, Command, FromArgMatches, Subcommand};
use colored::Colorize;

#[derive(Debug, Subcommand)]
enum FactorioCommand {
    /// Calculators for the Nulius overhaul mod
    #[command(subcommand)]
    Nulius(NuliusCommand),
    /// Calculators for the Ultracube overhaul mod
    #[command(subcommand)]
    Ultracube(UltracubeCommand),
}

#[derive(Debug, Subcommand)]
enum NuliusCommand {
    /// Energy of a NUMxNUM square of thermal solar panels, and the exchangers it feeds
    SolarEnergy {
        num: usize,
        /// Mark of the solar panels (1-3)
        #[arg(short = 's', long, default_value_t = 3)]
        solar_mark: usize,
        /// Mark of the heat exchangers (1-3)
        #[arg(short = 'e', long, default_value_t = 2)]
        exchanger_mark: usize,
    },
    /// Energy of a 2xNUM block of reactors
    NuclearEnergy {
        num: usize,
        /// Use stirling-engine-mk3 instead of exchanger-mk3
        #[arg(short = 's', long)]
        stirling: bool,
    },
}

#[derive(Debug, Subcommand)]
enum UltracubeCommand {
    /// Reactor setup for NUM reactors (in 2-wide rows)
    Nuclear { num: usize },
}

pub struct FactorioGroup;

#[async_trait]
impl CommandGroup for FactorioGroup {
    fn name(&self) -> &'static str {
        "factorio"
    }

    fn command(&self) -> Command {
        let cmd = Command::new("factorio")
            .about("Factorio mod calculators")
            .subcommand_required(true);
        FactorioCommand::augment_subcommands(cmd)
    }

    async fn run(&self, ctx: &mut CommandContext, matches: &ArgMatches) -> Result<()> {
        match FactorioCommand::from_arg_matches(matches)? {
            FactorioCommand::Nulius(NuliusCommand::SolarEnergy {
                num,
                solar_mark,
                exchanger_mark,
            }) => {
                let plan = factorio::nulius_solar_energy(num, solar_mark, exchanger_mark)?;
                ctx.output.line(
                    format!(
                        "{num}x{num} solar-panels-mk{} generate {:.2} MW with {:.1} exchangers-mk{}",
                        plan.solar_mark, plan.megawatts, plan.exchangers, plan.exchanger_mark
                    )
                    .green(),
                );
            }
            FactorioCommand::Nulius(NuliusCommand::NuclearEnergy { num, stirling }) => {
                let plan = factorio::nulius_nuclear_energy(num, stirling)?;
                ctx.output.line(
                    format!(
                        "2x{} reactors generate {:.2} MW with {:.1} {}",
                        plan.rows, plan.megawatts, plan.generators, plan.generator_name
                    )
                    .green(),
                );
            }
            FactorioCommand::Ultracube(UltracubeCommand::Nuclear { num }) => {
                let plan = factorio::ultracube_nuclear(num)?;
                ctx.output.line(format!("Reactors = {:.2} MW", plan.reactors_mw));
                ctx.output.line(format!("Exchangers = {:.2}", plan.exchangers));
                ctx.output.line(format!("Turbines = {:.2}", plan.turbines));
                ctx.output.line(format!("Offshore Pumps = {:.2}", plan.offshore_pumps));
                ctx.output.line(format!("Generates {:.2} MW", plan.generated_mw).green());
            }
        }
        Ok(())
    }
}

fn factory() -> Box<dyn CommandGroup> {
    Box::new(FactorioGroup)
}

inventory::submit! {
    CommandRegistration::new(factory)
}
