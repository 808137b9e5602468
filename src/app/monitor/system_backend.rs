#[cfg(feature = "system-sensors")]
use super::hardware::Hardware;
#[cfg(feature = "system-sensors")]
use super::sensor::{Limits, Sensor, SensorType};
#[cfg(feature = "system-sensors")]
use crate::domain::ports::SensorBackend;
#[cfg(not(feature = "system-sensors"))]
use crate::utils::error::NimbusError;
use crate::utils::error::Result;
#[cfg(feature = "system-sensors")]
use std::time::Instant;
#[cfg(feature = "system-sensors")]
use sysinfo::{Components, CpuRefreshKind, Disks, MemoryRefreshKind, Networks, RefreshKind, System};

#[cfg(feature = "system-sensors")]
const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// 單次讀取的感測器數值
#[cfg(feature = "system-sensors")]
struct Reading {
    hardware_id: String,
    hardware_type: &'static str,
    hardware_name: String,
    sensor_id: String,
    sensor_name: String,
    sensor_type: SensorType,
    value: f64,
    critical: Option<Limits>,
}

/// 透過 sysinfo 讀取本機 CPU、記憶體、磁碟、網路與溫度感測器
#[cfg(feature = "system-sensors")]
pub struct SystemBackend {
    system: System,
    disks: Disks,
    networks: Networks,
    components: Components,
    last_refresh: Instant,
    hardware: Vec<Hardware>,
}

#[cfg(feature = "system-sensors")]
impl SystemBackend {
    pub fn open() -> Result<Self> {
        let mut system = System::new_with_specifics(
            RefreshKind::nothing()
                .with_cpu(CpuRefreshKind::everything())
                .with_memory(MemoryRefreshKind::everything()),
        );
        // 初始刷新
        system.refresh_cpu_all();
        system.refresh_memory();

        let mut backend = Self {
            system,
            disks: Disks::new_with_refreshed_list(),
            networks: Networks::new_with_refreshed_list(),
            components: Components::new_with_refreshed_list(),
            last_refresh: Instant::now(),
            hardware: Vec::new(),
        };

        let readings = backend.read(1.0);
        backend.hardware = build_hardware(readings);
        tracing::debug!("🔌 sysinfo backend found {} hardware", backend.hardware.len());
        Ok(backend)
    }

    fn read(&self, elapsed_secs: f64) -> Vec<Reading> {
        let mut readings = Vec::new();

        let cpu_name = self
            .system
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .filter(|brand| !brand.is_empty())
            .unwrap_or_else(|| "CPU".to_string());
        let cpu = |sensor_id: String, sensor_name: String, sensor_type, value| Reading {
            hardware_id: "/cpu".to_string(),
            hardware_type: "Cpu",
            hardware_name: cpu_name.clone(),
            sensor_id,
            sensor_name,
            sensor_type,
            value,
            critical: None,
        };
        readings.push(cpu(
            "/cpu/load/total".to_string(),
            "CPU Total".to_string(),
            SensorType::Load,
            self.system.global_cpu_usage() as f64,
        ));
        for (index, core) in self.system.cpus().iter().enumerate() {
            readings.push(cpu(
                format!("/cpu/load/{}", index),
                format!("Core #{}", index + 1),
                SensorType::Load,
                core.cpu_usage() as f64,
            ));
            readings.push(cpu(
                format!("/cpu/clock/{}", index),
                format!("Core #{}", index + 1),
                SensorType::Clock,
                core.frequency() as f64,
            ));
        }

        let total = self.system.total_memory() as f64;
        let used = self.system.used_memory() as f64;
        let memory = |sensor_id: &str, sensor_name: &str, sensor_type, value| Reading {
            hardware_id: "/ram".to_string(),
            hardware_type: "Memory",
            hardware_name: "Generic Memory".to_string(),
            sensor_id: sensor_id.to_string(),
            sensor_name: sensor_name.to_string(),
            sensor_type,
            value,
            critical: None,
        };
        if total > 0.0 {
            readings.push(memory("/ram/load/0", "Memory", SensorType::Load, used / total * 100.0));
        }
        readings.push(memory("/ram/data/0", "Memory Used", SensorType::Data, used / GIB));
        readings.push(memory(
            "/ram/data/1",
            "Memory Available",
            SensorType::Data,
            self.system.available_memory() as f64 / GIB,
        ));

        for (index, disk) in self.disks.list().iter().enumerate() {
            let name = disk.name().to_string_lossy();
            let hardware_name = if name.is_empty() {
                disk.mount_point().display().to_string()
            } else {
                name.into_owned()
            };
            let total = disk.total_space() as f64;
            let available = disk.available_space() as f64;
            let storage = |kind: &str, sensor_name: &str, sensor_type, value| Reading {
                hardware_id: format!("/storage/{}", index),
                hardware_type: "Storage",
                hardware_name: hardware_name.clone(),
                sensor_id: format!("/storage/{}/{}/0", index, kind),
                sensor_name: sensor_name.to_string(),
                sensor_type,
                value,
                critical: None,
            };
            if total > 0.0 {
                readings.push(storage("load", "Used Space", SensorType::Load, (total - available) / total * 100.0));
            }
            readings.push(storage("data", "Free Space", SensorType::Data, available / GIB));
        }

        let mut interfaces: Vec<_> = self.networks.list().iter().collect();
        interfaces.sort_by(|a, b| a.0.cmp(b.0));
        for (interface, data) in interfaces {
            for (index, sensor_name, bytes) in [
                (0, "Upload Speed", data.transmitted()),
                (1, "Download Speed", data.received()),
            ] {
                readings.push(Reading {
                    hardware_id: format!("/network/{}", interface),
                    hardware_type: "Network",
                    hardware_name: interface.clone(),
                    sensor_id: format!("/network/{}/throughput/{}", interface, index),
                    sensor_name: sensor_name.to_string(),
                    sensor_type: SensorType::Throughput,
                    value: bytes as f64 / elapsed_secs,
                    critical: None,
                });
            }
        }

        for (index, component) in self.components.list().iter().enumerate() {
            let Some(temperature) = component.temperature() else {
                continue;
            };
            readings.push(Reading {
                hardware_id: "/lpc".to_string(),
                hardware_type: "Motherboard",
                hardware_name: "Sensors".to_string(),
                sensor_id: format!("/lpc/temperature/{}", index),
                sensor_name: component.label().to_string(),
                sensor_type: SensorType::Temperature,
                value: temperature as f64,
                critical: component.critical().map(|c| Limits::new(0.0, c as f64)),
            });
        }

        readings
    }
}

#[cfg(feature = "system-sensors")]
fn build_hardware(readings: Vec<Reading>) -> Vec<Hardware> {
    let mut hardware: Vec<Hardware> = Vec::new();
    for reading in readings {
        let mut sensor = Sensor::new(reading.sensor_id, reading.sensor_name, reading.sensor_type)
            .with_critical_limits(reading.critical);
        sensor.record(reading.value);

        match hardware.iter_mut().find(|h| h.id() == reading.hardware_id) {
            Some(existing) => existing.push_sensor(sensor),
            None => hardware.push(
                Hardware::new(reading.hardware_id, reading.hardware_type, reading.hardware_name).with_sensor(sensor),
            ),
        }
    }
    hardware
}

#[cfg(feature = "system-sensors")]
impl SensorBackend for SystemBackend {
    fn name(&self) -> &str {
        "sysinfo"
    }

    fn hardware(&self) -> &[Hardware] {
        &self.hardware
    }

    fn hardware_mut(&mut self) -> &mut [Hardware] {
        &mut self.hardware
    }

    fn refresh(&mut self) -> Result<()> {
        let elapsed = self.last_refresh.elapsed().as_secs_f64().max(1e-3);
        self.last_refresh = Instant::now();

        self.system.refresh_cpu_all();
        self.system.refresh_memory();
        self.disks.refresh(true);
        self.networks.refresh(true);
        self.components.refresh(true);

        for reading in self.read(elapsed) {
            let sensor = self
                .hardware
                .iter_mut()
                .find_map(|h| h.find_sensor_mut(&reading.sensor_id));
            match sensor {
                Some(sensor) => {
                    sensor.record(reading.value);
                    if reading.critical.is_some() {
                        sensor.set_critical_limits(reading.critical);
                    }
                }
                None => tracing::trace!("New sensor {} ignored until reopen", reading.sensor_id),
            }
        }
        Ok(())
    }
}

#[cfg(not(feature = "system-sensors"))]
pub struct SystemBackend;

#[cfg(not(feature = "system-sensors"))]
impl SystemBackend {
    pub fn open() -> Result<Self> {
        Err(NimbusError::SensorError {
            message: "built without the `system-sensors` feature, use --dummy".to_string(),
        })
    }
}
