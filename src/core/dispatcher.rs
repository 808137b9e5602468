use crate::config::{CliConfig, NimbusConfig};
use crate::core::context::CommandContext;
use crate::core::registry::{find_group, registered_groups};
use crate::domain::ports::CommandGroup;
use crate::utils::error::{NimbusError, Result};
use crate::utils::logger;
use crate::utils::output::Output;
use crate::utils::paths;
use crate::utils::validation::Validate;
use clap::{ArgMatches, Command, CommandFactory, FromArgMatches};
use std::ffi::OsString;

/// 根指令加上每個已註冊群組的子指令
pub fn build_cli(groups: &[Box<dyn CommandGroup>]) -> Command {
    let root = CliConfig::command()
        .subcommand_required(true)
        .arg_required_else_help(true);
    groups
        .iter()
        .fold(root, |cli, group| cli.subcommand(group.command()))
}

pub fn parse_root(matches: &ArgMatches) -> Result<CliConfig> {
    Ok(CliConfig::from_arg_matches(matches)?)
}

/// 找到子指令對應的群組並執行
pub async fn dispatch(
    ctx: &mut CommandContext,
    groups: &[Box<dyn CommandGroup>],
    matches: &ArgMatches,
) -> Result<()> {
    let (name, sub_matches) = matches
        .subcommand()
        .ok_or_else(|| NimbusError::MissingConfigError {
            field: "command".to_string(),
        })?;
    let group = find_group(groups, name).ok_or_else(|| NimbusError::not_found("Command group", name))?;

    tracing::debug!("🚀 Running command group '{}'", name);
    group.run(ctx, sub_matches).await
}

/// 完整的 CLI 流程：解析參數、載入配置、執行指令，最後儲存快取
///
/// 指令失敗時仍會儲存快取，並回傳指令的錯誤。成功時回傳輸出 sink。
pub async fn run_cli<I, T>(args: I, output: Output) -> Result<Output>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let groups = registered_groups()?;
    let matches = build_cli(&groups).try_get_matches_from(args)?;
    let root = parse_root(&matches)?;

    let mut config = NimbusConfig::load(root.config.as_deref())?;
    if let Some(dir) = &root.data_dir {
        config.data.path = Some(paths::display(dir));
    }

    // 日誌等級可能來自配置檔，所以在載入後才初始化
    logger::init_cli_logger(root.verbose, config.log_level());
    match &config.source {
        Some(path) => tracing::debug!("📁 Loaded configuration from: {}", path.display()),
        None => tracing::debug!("No config file found, using defaults"),
    }
    if root.verbose {
        tracing::debug!("CLI config: {:?}", root);
    }

    // 驗證配置
    config.validate()?;

    let mut ctx = CommandContext::new(config, output)?;
    let result = dispatch(&mut ctx, &groups, &matches).await;
    if !ctx.shutdown() {
        tracing::warn!("🔶 Data cache could not be saved to {}", ctx.cache.data_path().display());
    }
    result.map(|()| ctx.output)
}
