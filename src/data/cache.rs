use crate::utils::error::{NimbusError, Result};
use crate::utils::version::Version;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const CACHE_FILE_NAME: &str = "nimbus_datacache";
pub const CACHE_FORMAT_VERSION: Version = Version {
    major: 1,
    minor: 0,
    revision: 0,
};

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    version: String,
    #[serde(default)]
    entries: BTreeMap<String, Value>,
}

/// Nimbus 的全域持久化狀態，讓各指令群組存取 key/value 資料
pub struct DataCache {
    base_path: PathBuf,
    data_path: PathBuf,
    entries: Option<BTreeMap<String, Value>>,
}

impl DataCache {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        let data_path = base_path.join(CACHE_FILE_NAME);
        Self {
            base_path,
            data_path,
            entries: None,
        }
    }

    /// 更換存放資料的目錄；檔名固定為 `nimbus_datacache`
    pub fn set_cache_path(&mut self, path: impl Into<PathBuf>) {
        self.base_path = path.into();
        self.data_path = self.base_path.join(CACHE_FILE_NAME);
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// 讀取磁碟上的快取 (只在尚未載入時)
    pub fn load_data(&mut self) -> Result<&mut BTreeMap<String, Value>> {
        if self.entries.is_none() {
            let entries = if self.data_path.exists() {
                tracing::debug!("Loading data cache from {}", self.data_path.display());
                read_cache_file(&self.data_path)?
            } else {
                BTreeMap::new()
            };
            self.entries = Some(entries);
        }
        Ok(self.entries.get_or_insert_with(BTreeMap::new))
    }

    pub fn keys(&mut self) -> Result<Vec<String>> {
        Ok(self.load_data()?.keys().cloned().collect())
    }

    pub fn get_value(&mut self, key: &str) -> Result<Option<Value>> {
        Ok(self.load_data()?.get(key).cloned())
    }

    pub fn get_data<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>> {
        match self.get_value(key)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub fn get_or<T: DeserializeOwned>(&mut self, key: &str, default: T) -> Result<T> {
        Ok(self.get_data(key)?.unwrap_or(default))
    }

    /// 設定 key/value 並立即存檔
    pub fn set_data<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        self.set_data_deferred(key, value)?;
        self.save_data();
        Ok(())
    }

    /// 只更新記憶體中的資料，等到 `save_data()` / `shutdown()` 才寫入
    pub fn set_data_deferred<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.load_data()?.insert(key.to_string(), value);
        Ok(())
    }

    /// `None` 代表刪除該 key
    pub fn set_value(&mut self, key: &str, value: Option<Value>) -> Result<()> {
        let entries = self.load_data()?;
        match value {
            Some(value) => {
                entries.insert(key.to_string(), value);
            }
            None => {
                entries.remove(key);
            }
        }
        self.save_data();
        Ok(())
    }

    /// 將快取寫回磁碟
    pub fn save_data(&self) -> bool {
        match &self.entries {
            Some(entries) => safe_save(&self.data_path, entries),
            None => true,
        }
    }

    /// 刪除快取檔案，所有指令的設定與資料都會消失
    pub fn delete(&mut self) -> Result<()> {
        if self.data_path.is_file() {
            fs::remove_file(&self.data_path)?;
        }
        self.entries = None;
        Ok(())
    }

    pub fn shutdown(&self) -> bool {
        self.save_data()
    }
}

/// 讀取並驗證快取檔案格式版本
pub fn read_cache_file(path: &Path) -> Result<BTreeMap<String, Value>> {
    let content = fs::read_to_string(path)?;
    let file: CacheFile = serde_json::from_str(&content)?;
    let version = Version::from_string(&file.version)?;
    if version.major > CACHE_FORMAT_VERSION.major {
        return Err(NimbusError::IncompatibleData {
            message: format!(
                "cache file '{}' has format version {}, newer than supported {}",
                path.display(),
                version,
                CACHE_FORMAT_VERSION
            ),
        });
    }
    Ok(file.entries)
}

fn write_cache_file(path: &Path, entries: &BTreeMap<String, Value>) -> Result<()> {
    #[derive(Serialize)]
    struct CacheFileRef<'a> {
        version: String,
        entries: &'a BTreeMap<String, Value>,
    }

    let content = serde_json::to_string_pretty(&CacheFileRef {
        version: CACHE_FORMAT_VERSION.to_string(),
        entries,
    })?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// 安全存檔：先備份既有檔案，寫入失敗時還原，最後刪除備份
pub fn safe_save(file_path: &Path, entries: &BTreeMap<String, Value>) -> bool {
    safe_save_with(file_path, |path| write_cache_file(path, entries))
}

fn safe_save_with<F>(file_path: &Path, write: F) -> bool
where
    F: FnOnce(&Path) -> Result<()>,
{
    let mut backup_path = file_path.as_os_str().to_owned();
    backup_path.push("_BACKUP");
    let backup_path = PathBuf::from(backup_path);

    let has_backup = file_path.is_file() && fs::copy(file_path, &backup_path).is_ok();

    let success = match write(file_path) {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("❌ Error while trying to save data cache to '{}': {}", file_path.display(), e);
            false
        }
    };

    if has_backup {
        if !success && fs::copy(&backup_path, file_path).is_ok() {
            tracing::warn!("🔶 The file was restored to its state before trying to save.");
        }
        let _ = fs::remove_file(&backup_path);
    }
    success
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_cache() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = DataCache::new(temp_dir.path());
        assert!(cache.keys().unwrap().is_empty());
        assert_eq!(cache.get_or("missing", 7u32).unwrap(), 7);
    }

    #[test]
    fn test_set_value_none_removes_key() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = DataCache::new(temp_dir.path());
        cache.set_value("a", Some(json!(1))).unwrap();
        cache.set_value("a", None).unwrap();
        assert!(cache.get_value("a").unwrap().is_none());

        let mut reloaded = DataCache::new(temp_dir.path());
        assert!(reloaded.keys().unwrap().is_empty());
    }

    #[test]
    fn test_newer_major_version_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CACHE_FILE_NAME);
        fs::write(&path, r#"{"version": "2.0", "entries": {}}"#).unwrap();

        let mut cache = DataCache::new(temp_dir.path());
        assert!(matches!(cache.load_data(), Err(NimbusError::IncompatibleData { .. })));
    }

    #[test]
    fn test_safe_save_leaves_no_backup_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CACHE_FILE_NAME);
        let mut entries = BTreeMap::new();
        entries.insert("k".to_string(), json!("v1"));
        assert!(safe_save(&path, &entries));
        entries.insert("k".to_string(), json!("v2"));
        assert!(safe_save(&path, &entries));

        assert!(!temp_dir.path().join(format!("{}_BACKUP", CACHE_FILE_NAME)).exists());
        assert_eq!(read_cache_file(&path).unwrap().get("k"), Some(&json!("v2")));
    }

    #[test]
    fn test_save_into_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        // 目標路徑是目錄，寫入必定失敗
        let blocked = temp_dir.path().join("blocked");
        fs::create_dir(&blocked).unwrap();
        let entries = BTreeMap::new();
        assert!(!safe_save(&blocked, &entries));
        assert!(blocked.is_dir());
    }

    #[test]
    fn test_failed_save_restores_previous_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CACHE_FILE_NAME);
        let mut original = BTreeMap::new();
        original.insert("answer".to_string(), json!(42));
        assert!(safe_save(&path, &original));

        // 寫到一半失敗，檔案內容已被破壞
        let saved = safe_save_with(&path, |target| {
            fs::write(target, "{\"version\": ")?;
            Err(std::io::Error::other("disk full").into())
        });

        assert!(!saved);
        assert_eq!(read_cache_file(&path).unwrap(), original);
        let mut backup = path.as_os_str().to_owned();
        backup.push("_BACKUP");
        assert!(!PathBuf::from(backup).exists());
    }
}
