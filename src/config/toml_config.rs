use crate::utils::error::{NimbusError, Result};
use crate::utils::paths;
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

#[allow(clippy::expect_used)] // static regex
static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex should not panic"));

pub const DEFAULT_CONFIG_DIR: &str = ".nimbus";
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NimbusConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 實際載入的配置檔，使用預設值時為 None
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// 資料快取目錄，預設為使用者家目錄
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_update_time")]
    pub update_time: f64,
    #[serde(default = "default_true")]
    pub show_update_progress: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

fn default_update_time() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            update_time: default_update_time(),
            show_update_progress: true,
        }
    }
}

impl NimbusConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(NimbusError::IoError)?;
        let mut config = Self::from_toml_str(&content)?;
        config.source = Some(path.as_ref().to_path_buf());
        Ok(config)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| NimbusError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 載入 `explicit` 指定的檔案；未指定時嘗試 `~/.nimbus/config.toml`，不存在則使用預設值
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let default_path = match dirs::home_dir() {
            Some(home) => home.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILE),
            None => return Ok(Self::default()),
        };
        if default_path.is_file() {
            Self::from_file(default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// 替換環境變數 (例如 ${HOME})；未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        let result = ENV_VAR_PATTERN.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        result.to_string()
    }

    /// 取得資料快取目錄 (展開 `~`)
    pub fn data_path(&self) -> Result<PathBuf> {
        match &self.data.path {
            Some(raw) => paths::expand_tilde(raw),
            None => paths::home_dir(),
        }
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.level.as_deref()
    }
}

impl Validate for NimbusConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.data.path {
            validation::validate_path("data.path", path)?;
        }

        validation::validate_range("monitor.update_time", self.monitor.update_time, 0.05, 3600.0)?;

        if let Some(level) = &self.logging.level {
            let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
            if !valid_levels.contains(&level.to_lowercase().as_str()) {
                return Err(NimbusError::InvalidConfigValueError {
                    field: "logging.level".to_string(),
                    value: level.clone(),
                    reason: format!("Unsupported level. Valid levels: {}", valid_levels.join(", ")),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = NimbusConfig::from_toml_str("").unwrap();
        assert!(config.data.path.is_none());
        assert_eq!(config.monitor.update_time, 1.0);
        assert!(config.monitor.show_update_progress);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[data]
path = "/var/lib/nimbus"

[monitor]
update_time = 0.5
show_update_progress = false

[logging]
level = "debug"
"#;

        let config = NimbusConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.data_path().unwrap(), PathBuf::from("/var/lib/nimbus"));
        assert_eq!(config.monitor.update_time, 0.5);
        assert!(!config.monitor.show_update_progress);
        assert_eq!(config.log_level(), Some("debug"));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("NIMBUS_TEST_DATA_DIR", "/tmp/nimbus-data");

        let config = NimbusConfig::from_toml_str(
            r#"
[data]
path = "${NIMBUS_TEST_DATA_DIR}"
"#,
        )
        .unwrap();
        assert_eq!(config.data.path.as_deref(), Some("/tmp/nimbus-data"));

        std::env::remove_var("NIMBUS_TEST_DATA_DIR");
    }

    #[test]
    fn test_config_validation() {
        let config = NimbusConfig::from_toml_str("[monitor]\nupdate_time = 0.0\n").unwrap();
        assert!(config.validate().is_err());

        let config = NimbusConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[monitor]\nupdate_time = 2.0\n").unwrap();

        let config = NimbusConfig::load(Some(temp_file.path())).unwrap();
        assert_eq!(config.monitor.update_time, 2.0);
        assert_eq!(config.source.as_deref(), Some(temp_file.path()));

        let config = NimbusConfig::from_toml_str("").unwrap();
        assert!(config.source.is_none());
    }

    #[test]
    fn test_env_var_substitution_repeats() {
        std::env::set_var("NIMBUS_TEST_LEVEL", "warn");
        for _ in 0..2 {
            let config = NimbusConfig::from_toml_str("[logging]\nlevel = \"${NIMBUS_TEST_LEVEL}\"\n").unwrap();
            assert_eq!(config.log_level(), Some("warn"));
        }
        let config = NimbusConfig::from_toml_str("[data]\npath = \"${NIMBUS_UNSET_VAR_X}\"\n").unwrap();
        assert_eq!(config.data.path.as_deref(), Some("${NIMBUS_UNSET_VAR_X}"));
        std::env::remove_var("NIMBUS_TEST_LEVEL");
    }
}
