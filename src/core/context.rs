use crate::config::NimbusConfig;
use crate::data::cache::DataCache;
use crate::utils::error::Result;
use crate::utils::output::Output;

/// 所有指令群組共用的執行環境
pub struct CommandContext {
    pub config: NimbusConfig,
    pub cache: DataCache,
    pub output: Output,
}

impl CommandContext {
    /// 依配置的資料目錄建立 DataCache
    pub fn new(config: NimbusConfig, output: Output) -> Result<Self> {
        let cache = DataCache::new(config.data_path()?);
        Ok(Self::with_cache(config, cache, output))
    }

    pub fn with_cache(config: NimbusConfig, cache: DataCache, output: Output) -> Self {
        Self { config, cache, output }
    }

    /// 儲存快取；回傳是否成功
    pub fn shutdown(&mut self) -> bool {
        let saved = self.cache.shutdown();
        if saved {
            tracing::debug!("💾 Data cache saved to {}", self.cache.data_path().display());
        }
        saved
    }
}
