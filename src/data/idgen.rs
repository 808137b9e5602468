use crate::data::cache::DataCache;
use crate::utils::error::Result;
use crate::utils::validation::validate_non_empty_string;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

pub const ID_MANAGER_CACHE_KEY: &str = "IDManager_Generators";

/// 遞增的唯一整數 ID 產生器
///
/// 產生的值只會遞增 (或重用已回收的 ID)，因此在同一個產生器內永遠唯一。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdGenerator {
    associations: HashMap<String, u64>,
    last_id: u64,
    recycled: BTreeSet<u64>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 產生 ID，優先順序：
    /// 1. 已與 `name` 關聯的 ID
    /// 2. 等待重用的回收 ID (最小者)
    /// 3. 新的 ID
    ///
    /// 新產生的 ID 會與 `name` 建立關聯。
    pub fn create(&mut self, name: Option<&str>) -> u64 {
        if let Some(id) = name.and_then(|n| self.associations.get(n)) {
            return *id;
        }
        let new_id = match self.recycled.pop_first() {
            Some(id) => id,
            None => {
                self.last_id += 1;
                self.last_id
            }
        };
        if let Some(name) = name {
            self.associate(new_id, name);
        }
        new_id
    }

    /// 關聯 ID 與名稱；ID 必須是本產生器產生過的值
    pub fn associate(&mut self, id: u64, name: &str) {
        if id != 0 && !name.is_empty() && id <= self.last_id {
            self.associations.insert(name.to_string(), id);
        }
    }

    /// 回收 ID，同時移除其關聯；回收的 ID 會被 `create` 重用
    pub fn recycle(&mut self, id: u64) {
        if id != 0 && id <= self.last_id {
            self.recycled.insert(id);
            self.associations.retain(|_, assoc| *assoc != id);
        }
    }

    pub fn id_for(&self, name: &str) -> Option<u64> {
        self.associations.get(name).copied()
    }

    pub fn last_id(&self) -> u64 {
        self.last_id
    }
}

/// 管理具名的 IdGenerator，並透過 DataCache 持久化
#[derive(Debug, Default)]
pub struct IdManager {
    generators: HashMap<String, IdGenerator>,
}

impl IdManager {
    pub fn load(cache: &mut DataCache) -> Result<Self> {
        let generators = cache.get_or(ID_MANAGER_CACHE_KEY, HashMap::new())?;
        Ok(Self { generators })
    }

    /// 取得指定名稱的產生器，不存在時建立
    pub fn get(&mut self, name: &str) -> Result<&mut IdGenerator> {
        validate_non_empty_string("id_generator", name)?;
        Ok(self.generators.entry(name.to_string()).or_default())
    }

    pub fn save(&self, cache: &mut DataCache) -> Result<()> {
        cache.set_data_deferred(ID_MANAGER_CACHE_KEY, &self.generators)
    }
}
