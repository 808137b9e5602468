use crate::data::cache::DataCache;
use crate::data::idgen::IdGenerator;
use crate::utils::error::{NimbusError, Result};
use crate::utils::paths;
use crate::utils::validation::{validate_non_empty_string, validate_path};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const BACKUPS_CACHE_KEY: &str = "backups";
pub const BACKUP_ID_GENERATOR: &str = "backups";
pub const EXPORT_FORMAT_VERSION: &str = "1.0";

/// 一個需要備份的檔案來源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub path: PathBuf,
    #[serde(default)]
    pub blacklist: Vec<String>,
}

impl Source {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            blacklist: Vec::new(),
        }
    }
}

/// 備份設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    pub name: String,
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub sources: Vec<Source>,
    pub backup_path: Option<PathBuf>,
}

/// `edit` 指令的變更內容
#[derive(Debug, Clone, Default)]
pub struct BackupEdit {
    pub path: Option<PathBuf>,
    pub add_sources: Vec<PathBuf>,
    pub remove_sources: Vec<PathBuf>,
    /// 套用到本次新增的來源
    pub ignore: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackupStatus {
    pub location: PathBuf,
    pub sources: Vec<(PathBuf, bool)>,
}

impl BackupStatus {
    pub fn missing_sources(&self) -> usize {
        self.sources.iter().filter(|(_, exists)| !exists).count()
    }
}

/// 匯出檔內容
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupExport {
    pub format_version: String,
    pub exported_at: DateTime<Utc>,
    pub backup: Backup,
}

impl Backup {
    pub fn new(name: impl Into<String>, sources: Vec<Source>, backup_path: Option<PathBuf>) -> Self {
        Self {
            name: name.into(),
            id: 0,
            sources,
            backup_path,
        }
    }

    /// 取得備份位置，目錄不存在時回傳 `LocationMissing`
    pub fn location(&self) -> Result<&Path> {
        match &self.backup_path {
            Some(path) if path.is_dir() => Ok(path),
            Some(path) => Err(NimbusError::LocationMissing {
                path: paths::display(path),
            }),
            None => Err(NimbusError::LocationMissing {
                path: format!("<{} has no location>", self),
            }),
        }
    }

    pub fn export_file_name(&self) -> String {
        format!("{}BackupObj", self.name)
    }

    /// 匯出到 `<location>/<name>BackupObj`，可在新電腦上用 `load` 還原設定
    pub fn export(&self) -> Result<PathBuf> {
        let export_path = self.location()?.join(self.export_file_name());
        let export = BackupExport {
            format_version: EXPORT_FORMAT_VERSION.to_string(),
            exported_at: Utc::now(),
            backup: self.clone(),
        };
        fs::write(&export_path, serde_json::to_string_pretty(&export)?)?;
        tracing::info!("💾 Exported {} to {}", self, export_path.display());
        Ok(export_path)
    }

    /// 檢查備份位置與每個來源是否存在
    pub fn status(&self) -> Result<BackupStatus> {
        let location = self.location()?.to_path_buf();
        let sources = self
            .sources
            .iter()
            .map(|source| (source.path.clone(), source.path.exists()))
            .collect();
        Ok(BackupStatus { location, sources })
    }

    pub fn run(&self) -> Result<()> {
        self.location()?;
        Err(NimbusError::unsupported(format!("backing up files of {}", self)))
    }

    pub fn restore(&self) -> Result<()> {
        self.location()?;
        Err(NimbusError::unsupported(format!("restoring files of {}", self)))
    }

    pub fn apply_edit(&mut self, edit: BackupEdit) -> Result<()> {
        if let Some(path) = edit.path {
            validate_path("backup.path", &paths::display(&path))?;
            self.backup_path = Some(path);
        }

        self.sources
            .retain(|source| !edit.remove_sources.contains(&source.path));

        for path in edit.add_sources {
            validate_path("backup.source", &paths::display(&path))?;
            if self.sources.iter().any(|s| s.path == path) {
                tracing::warn!("🔶 Source {} already in {}", path.display(), self);
                continue;
            }
            self.sources.push(Source {
                path,
                blacklist: edit.ignore.clone(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Backup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Backup", self.name)
    }
}

/// 管理所有備份設定，透過 DataCache 的 `backups` key 持久化
#[derive(Debug, Default)]
pub struct BackupManager {
    backups: Vec<Backup>,
}

impl BackupManager {
    pub fn load(cache: &mut DataCache) -> Result<Self> {
        let backups = cache.get_or(BACKUPS_CACHE_KEY, Vec::new())?;
        Ok(Self { backups })
    }

    pub fn save(&self, cache: &mut DataCache) -> Result<()> {
        cache.set_data(BACKUPS_CACHE_KEY, &self.backups)
    }

    pub fn backups(&self) -> &[Backup] {
        &self.backups
    }

    pub fn get(&self, name: &str) -> Option<&Backup> {
        self.backups.iter().find(|b| b.name == name)
    }

    pub fn require(&self, name: &str) -> Result<&Backup> {
        self.get(name).ok_or_else(|| NimbusError::not_found("Backup", name))
    }

    pub fn require_mut(&mut self, name: &str) -> Result<&mut Backup> {
        self.backups
            .iter_mut()
            .find(|b| b.name == name)
            .ok_or_else(|| NimbusError::not_found("Backup", name))
    }

    pub fn create(
        &mut self,
        ids: &mut IdGenerator,
        name: &str,
        sources: Vec<Source>,
        backup_path: Option<PathBuf>,
    ) -> Result<&Backup> {
        validate_non_empty_string("backup.name", name)?;
        let backup = Backup::new(name, sources, backup_path);
        self.insert(ids, backup)
    }

    /// 從匯出檔載入備份設定
    pub fn load_export(&mut self, ids: &mut IdGenerator, file_path: &Path) -> Result<&Backup> {
        if !file_path.is_file() {
            return Err(NimbusError::not_found("Backup file", paths::display(file_path)));
        }
        let content = fs::read_to_string(file_path)?;
        let export: BackupExport =
            serde_json::from_str(&content).map_err(|e| NimbusError::IncompatibleData {
                message: format!(
                    "'{}' is not a valid Backup export: {}",
                    file_path.display(),
                    e
                ),
            })?;
        self.insert(ids, export.backup)
    }

    fn insert(&mut self, ids: &mut IdGenerator, mut backup: Backup) -> Result<&Backup> {
        if self.get(&backup.name).is_some() {
            return Err(NimbusError::already_exists("Backup", &backup.name));
        }
        backup.id = ids.create(Some(&backup.name));
        tracing::debug!("Registered {} with id {}", backup, backup.id);
        self.backups.push(backup);
        Ok(&self.backups[self.backups.len() - 1])
    }

    pub fn remove(&mut self, ids: &mut IdGenerator, name: &str) -> Result<Backup> {
        let index = self
            .backups
            .iter()
            .position(|b| b.name == name)
            .ok_or_else(|| NimbusError::not_found("Backup", name))?;
        let backup = self.backups.remove(index);
        ids.recycle(backup.id);
        Ok(backup)
    }

    /// 刪除備份位置 (忽略錯誤) 並移除設定
    pub fn delete(&mut self, ids: &mut IdGenerator, name: &str) -> Result<Backup> {
        let location = self.require(name)?.location()?.to_path_buf();
        if let Err(e) = fs::remove_dir_all(&location) {
            tracing::warn!("🔶 Could not fully remove {}: {}", location.display(), e);
        }
        self.remove(ids, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_display_and_export_name() {
        let backup = Backup::new("home", vec![], None);
        assert_eq!(backup.to_string(), "homeBackup");
        assert_eq!(backup.export_file_name(), "homeBackupObj");
    }

    #[test]
    fn test_operations_require_location() {
        let backup = Backup::new("home", vec![], Some(PathBuf::from("/definitely/not/here")));
        assert!(matches!(backup.export(), Err(NimbusError::LocationMissing { .. })));
        assert!(matches!(backup.status(), Err(NimbusError::LocationMissing { .. })));
        assert!(matches!(Backup::new("x", vec![], None).run(), Err(NimbusError::LocationMissing { .. })));
    }

    #[test]
    fn test_run_and_restore_are_unsupported() {
        let dir = TempDir::new().unwrap();
        let backup = Backup::new("home", vec![], Some(dir.path().to_path_buf()));
        assert!(matches!(backup.run(), Err(NimbusError::Unsupported { .. })));
        assert!(matches!(backup.restore(), Err(NimbusError::Unsupported { .. })));
    }

    #[test]
    fn test_apply_edit() {
        let mut backup = Backup::new("home", vec![Source::new("/a"), Source::new("/b")], None);
        backup
            .apply_edit(BackupEdit {
                path: Some(PathBuf::from("/backups")),
                add_sources: vec![PathBuf::from("/c"), PathBuf::from("/a")],
                remove_sources: vec![PathBuf::from("/b")],
                ignore: vec!["*.tmp".to_string()],
            })
            .unwrap();

        assert_eq!(backup.backup_path, Some(PathBuf::from("/backups")));
        let paths: Vec<_> = backup.sources.iter().map(|s| s.path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("/a"), PathBuf::from("/c")]);
        assert!(backup.sources[0].blacklist.is_empty());
        assert_eq!(backup.sources[1].blacklist, vec!["*.tmp".to_string()]);
    }

    #[test]
    fn test_create_duplicate_and_remove_recycles_id() {
        let mut manager = BackupManager::default();
        let mut ids = IdGenerator::new();
        assert_eq!(manager.create(&mut ids, "a", vec![], None).unwrap().id, 1);
        assert_eq!(manager.create(&mut ids, "b", vec![], None).unwrap().id, 2);
        assert!(matches!(
            manager.create(&mut ids, "a", vec![], None),
            Err(NimbusError::AlreadyExists { .. })
        ));

        manager.remove(&mut ids, "a").unwrap();
        assert!(manager.get("a").is_none());
        assert_eq!(manager.create(&mut ids, "c", vec![], None).unwrap().id, 1);
        assert!(manager.remove(&mut ids, "zzz").is_err());
    }
}
