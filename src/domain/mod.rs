// 各層之間的介面 (ports)
pub mod ports;

pub use ports::{CommandGroup, SensorBackend};
