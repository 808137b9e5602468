use super::dummy::DummyBackend;
use super::hardware::{Hardware, SensorEntry};
use super::sensor::{Sensor, SensorSettings};
use super::system_backend::SystemBackend;
use crate::domain::ports::SensorBackend;
use crate::utils::error::Result;
use std::collections::BTreeMap;

/// 管理所有感測器來源，提供硬體與感測器的查詢與更新
pub struct ComputerSystem {
    backends: Vec<Box<dyn SensorBackend>>,
    elapsed_time: f64,
    /// 兩次 `timed_update` 更新之間的秒數
    pub update_time: f64,
}

impl ComputerSystem {
    pub fn new(update_time: f64) -> Self {
        Self {
            backends: Vec::new(),
            elapsed_time: 0.0,
            update_time,
        }
    }

    pub fn is_open(&self) -> bool {
        !self.backends.is_empty()
    }

    /// 開啟感測器來源；已開啟時不做任何事
    pub fn open(&mut self, dummy: bool) -> Result<()> {
        if self.is_open() {
            return Ok(());
        }
        if dummy {
            self.open_with(Box::new(DummyBackend::new()));
        } else {
            #[cfg(feature = "system-sensors")]
            self.open_with(Box::new(SystemBackend::open()?));
            #[cfg(not(feature = "system-sensors"))]
            SystemBackend::open()?;
        }
        Ok(())
    }

    pub fn open_with(&mut self, backend: Box<dyn SensorBackend>) {
        tracing::info!("🔌 Opened sensor backend: {}", backend.name());
        self.backends.push(backend);
    }

    pub fn close(&mut self) {
        for backend in &mut self.backends {
            backend.close();
        }
        self.backends.clear();
        self.elapsed_time = 0.0;
    }

    /// 更新所有啟用中的硬體，並擴展啟用感測器的 min/max 紀錄
    pub fn update(&mut self) -> Result<()> {
        for backend in &mut self.backends {
            if backend.hardware().iter().any(Hardware::enabled) {
                backend.refresh()?;
            }
            for hardware in backend.hardware_mut() {
                hardware.for_each_sensor_mut(&mut |sensor: &mut Sensor| {
                    if sensor.enabled() {
                        sensor.update_minmax_ever();
                    }
                });
            }
        }
        Ok(())
    }

    /// 累積 `delta_secs`，超過 `update_time` 時更新一次；回傳是否有更新
    pub fn timed_update(&mut self, delta_secs: f64) -> Result<bool> {
        self.elapsed_time += delta_secs;
        if self.elapsed_time >= self.update_time {
            self.elapsed_time = 0.0;
            self.update()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// 距離下次更新的進度 [0,1]
    pub fn update_progress(&self) -> f64 {
        if self.update_time <= 0.0 {
            return 1.0;
        }
        (self.elapsed_time / self.update_time).clamp(0.0, 1.0)
    }

    pub fn hardware(&self) -> impl Iterator<Item = &Hardware> {
        self.backends.iter().flat_map(|b| b.hardware().iter())
    }

    pub fn entries(&self) -> Vec<SensorEntry<'_>> {
        let mut out = Vec::new();
        for hardware in self.hardware() {
            hardware.collect_sensors(None, &mut out);
        }
        out
    }

    pub fn sensors(&self) -> Vec<&Sensor> {
        self.hardware().flat_map(|h| h.all_sensors()).collect()
    }

    pub fn entry(&self, id: &str) -> Option<SensorEntry<'_>> {
        self.entries().into_iter().find(|e| e.sensor.id() == id)
    }

    pub fn sensor(&self, id: &str) -> Option<&Sensor> {
        self.hardware().find_map(|h| h.find_sensor(id))
    }

    pub fn sensor_mut(&mut self, id: &str) -> Option<&mut Sensor> {
        self.backends
            .iter_mut()
            .flat_map(|b| b.hardware_mut().iter_mut())
            .find_map(|h| h.find_sensor_mut(id))
    }

    /// 套用已儲存的使用者設定 (依感測器 ID)
    pub fn apply_user_settings(&mut self, settings: &BTreeMap<String, SensorSettings>) {
        for backend in &mut self.backends {
            for hardware in backend.hardware_mut() {
                hardware.for_each_sensor_mut(&mut |sensor: &mut Sensor| {
                    if let Some(saved) = settings.get(sensor.id()) {
                        sensor.settings = saved.clone();
                    }
                });
            }
        }
    }

    pub fn collect_user_settings(&self) -> BTreeMap<String, SensorSettings> {
        self.sensors()
            .into_iter()
            .map(|s| (s.id().to_string(), s.settings.clone()))
            .collect()
    }
}

impl Drop for ComputerSystem {
    fn drop(&mut self) {
        self.close();
    }
}
