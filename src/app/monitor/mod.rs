// 硬體感測器監控
pub mod dummy;
pub mod hardware;
pub mod sensor;
pub mod settings;
pub mod system;
pub mod system_backend;

pub use hardware::{Hardware, SensorEntry};
pub use sensor::{Limits, LimitsType, Sensor, SensorSettings, SensorType, SensorUnit};
pub use settings::MonitorData;
pub use system::ComputerSystem;
