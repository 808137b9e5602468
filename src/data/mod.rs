// 持久化資料層：DataCache 與建立在其上的 ID 產生器
pub mod cache;
pub mod idgen;

pub use cache::DataCache;
pub use idgen::{IdGenerator, IdManager};
