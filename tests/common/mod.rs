#![allow(dead_code)]

use nimbus::{run_cli, DataCache, Output};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 隔離的資料目錄與空白配置檔
pub struct Workspace {
    dir: TempDir,
    config_path: PathBuf,
}

impl Workspace {
    pub fn new() -> anyhow::Result<Self> {
        let dir = TempDir::new()?;
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "")?;
        Ok(Self { dir, config_path })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn cache(&self) -> DataCache {
        DataCache::new(self.dir.path())
    }

    /// 執行 `nimbus <args>` 並回傳輸出文字
    pub async fn run(&self, args: &[&str]) -> nimbus::Result<String> {
        let mut argv = vec![
            "nimbus".to_string(),
            "--config".to_string(),
            self.config_path.display().to_string(),
            "--data-dir".to_string(),
            self.dir.path().display().to_string(),
        ];
        argv.extend(args.iter().map(|arg| arg.to_string()));

        let output = run_cli(argv, Output::buffer()).await?;
        Ok(output.contents())
    }
}
