use super::sensor::SensorSettings;
use super::system::ComputerSystem;
use crate::config::toml_config::MonitorConfig;
use crate::data::cache::DataCache;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const MONITOR_CACHE_KEY: &str = "monitor_data";

/// 感測器監控的持久化設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorData {
    #[serde(default)]
    pub user_sensor_settings: BTreeMap<String, SensorSettings>,
    pub update_time: f64,
    #[serde(default = "default_show_progress")]
    pub show_update_progress: bool,
}

fn default_show_progress() -> bool {
    true
}

impl MonitorData {
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self {
            user_sensor_settings: BTreeMap::new(),
            update_time: config.update_time,
            show_update_progress: config.show_update_progress,
        }
    }

    /// 從 DataCache 載入，不存在時使用設定檔的預設值
    pub fn load(cache: &mut DataCache, config: &MonitorConfig) -> Result<Self> {
        Ok(cache
            .get_data(MONITOR_CACHE_KEY)?
            .unwrap_or_else(|| Self::from_config(config)))
    }

    pub fn save(&self, cache: &mut DataCache) -> Result<()> {
        cache.set_data(MONITOR_CACHE_KEY, self)
    }

    pub fn apply_to(&self, system: &mut ComputerSystem) {
        system.update_time = self.update_time;
        system.apply_user_settings(&self.user_sensor_settings);
    }

    /// 合併系統中感測器的目前設定；不在系統中的感測器設定保留不變
    ///
    /// `update_time` 只由 `configure` 修改，`watch --interval` 不會寫回。
    pub fn collect_from(&mut self, system: &ComputerSystem) {
        self.user_sensor_settings.extend(system.collect_user_settings());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::monitor::dummy::{DummyBackend, TESTER_SENSOR_ID};
    use crate::app::monitor::sensor::LimitsType;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_from_config() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = DataCache::new(temp_dir.path());
        let config = MonitorConfig {
            update_time: 2.5,
            show_update_progress: false,
        };
        let data = MonitorData::load(&mut cache, &config).unwrap();
        assert_eq!(data.update_time, 2.5);
        assert!(!data.show_update_progress);
        assert!(data.user_sensor_settings.is_empty());
    }

    #[test]
    fn test_settings_survive_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = DataCache::new(temp_dir.path());
        let mut data = MonitorData::load(&mut cache, &MonitorConfig::default()).unwrap();
        data.user_sensor_settings
            .insert("/gone/load/0".to_string(), SensorSettings::default());

        let mut system = ComputerSystem::new(1.0);
        system.open_with(Box::new(DummyBackend::with_seed(9)));
        system.sensor_mut(TESTER_SENSOR_ID).unwrap().settings.limits_type = LimitsType::MinMax;
        data.collect_from(&system);
        data.save(&mut cache).unwrap();

        let mut cache = DataCache::new(temp_dir.path());
        let loaded = MonitorData::load(&mut cache, &MonitorConfig::default()).unwrap();
        assert_eq!(loaded.user_sensor_settings.len(), 3);
        assert_eq!(
            loaded.user_sensor_settings[TESTER_SENSOR_ID].limits_type,
            LimitsType::MinMax
        );
    }

    #[test]
    fn test_collect_keeps_saved_update_time() {
        let mut data = MonitorData::from_config(&MonitorConfig::default());
        let saved = data.update_time;

        let mut system = ComputerSystem::new(saved);
        system.open_with(Box::new(DummyBackend::with_seed(3)));
        system.update_time = 0.05;
        data.collect_from(&system);

        assert_eq!(data.update_time, saved);
        assert!(data.user_sensor_settings.contains_key(TESTER_SENSOR_ID));
    }
}
