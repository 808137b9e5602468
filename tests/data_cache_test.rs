use nimbus::data::{DataCache, IdManager};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Settings {
    name: String,
    retries: u32,
}

#[test]
fn test_file_format_on_disk() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let mut cache = DataCache::new(temp_dir.path());
    cache.set_data(
        "settings",
        &Settings {
            name: "nimbus".to_string(),
            retries: 3,
        },
    )?;

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(temp_dir.path().join("nimbus_datacache"))?)?;
    assert_eq!(raw["version"], "1.0");
    assert_eq!(raw["entries"]["settings"]["retries"], 3);
    Ok(())
}

#[test]
fn test_deferred_data_saved_on_shutdown() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let mut cache = DataCache::new(temp_dir.path());
    let mut ids = IdManager::load(&mut cache)?;
    let id = ids.get("backups")?.create(Some("docs"));
    ids.save(&mut cache)?;
    assert!(!temp_dir.path().join("nimbus_datacache").exists());

    assert!(cache.shutdown());

    let mut cache = DataCache::new(temp_dir.path());
    let mut ids = IdManager::load(&mut cache)?;
    assert_eq!(ids.get("backups")?.id_for("docs"), Some(id));
    assert!(cache.keys()?.contains(&"IDManager_Generators".to_string()));
    Ok(())
}

#[test]
fn test_cache_path_can_move() -> anyhow::Result<()> {
    let first = TempDir::new()?;
    let second = TempDir::new()?;
    let mut cache = DataCache::new(first.path());
    cache.set_cache_path(second.path());
    cache.set_data("moved", &true)?;

    assert!(second.path().join("nimbus_datacache").is_file());
    assert!(!first.path().join("nimbus_datacache").exists());
    assert_eq!(cache.get_data::<bool>("moved")?, Some(true));
    Ok(())
}
