use crate::app::monitor::hardware::Hardware;
use crate::core::context::CommandContext;
use crate::utils::error::Result;
use async_trait::async_trait;
use clap::{ArgMatches, Command};

/// 一組 CLI 子指令 (如 `cache`、`backup`)
///
/// 每個實作透過 `inventory::submit!` 自行註冊，dispatcher 只需查詢 registry。
#[async_trait]
pub trait CommandGroup: Send + Sync {
    /// 子指令群組名稱，需與 `command()` 的名稱一致
    fn name(&self) -> &'static str;

    fn command(&self) -> Command;

    /// `matches` 是此群組子指令的 ArgMatches
    async fn run(&self, ctx: &mut CommandContext, matches: &ArgMatches) -> Result<()>;
}

/// 硬體感測器的資料來源
pub trait SensorBackend: Send {
    fn name(&self) -> &str;

    fn hardware(&self) -> &[Hardware];

    fn hardware_mut(&mut self) -> &mut [Hardware];

    /// 重新讀取所有感測器的數值
    fn refresh(&mut self) -> Result<()>;

    fn close(&mut self) {}
}
