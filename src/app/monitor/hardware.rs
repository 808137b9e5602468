use super::sensor::{Sensor, SensorType};

/// 硬體裝置，包含感測器與子裝置
#[derive(Debug, Clone, PartialEq)]
pub struct Hardware {
    id: String,
    hardware_type: String,
    name: String,
    sensors: Vec<Sensor>,
    children: Vec<Hardware>,
}

/// 表格與查詢使用的感測器視圖 (附帶所屬硬體資訊)
#[derive(Debug, Clone)]
pub struct SensorEntry<'a> {
    pub hardware_full_name: String,
    pub hardware: &'a Hardware,
    pub sensor: &'a Sensor,
}

impl SensorEntry<'_> {
    /// 感測器的詳細資訊 (多行)
    pub fn info(&self) -> String {
        let sensor = self.sensor;
        let unit = sensor.unit();
        let measured = |value: Option<f64>| value.map(|v| unit.format_value(v)).unwrap_or_else(|| "-".to_string());
        let limits = sensor
            .limits()
            .map(|l| format!("{} .. {}", l.min, l.max))
            .unwrap_or_else(|| "none".to_string());

        [
            format!("{} ({})", sensor.name(), sensor.id()),
            format!("Hardware: {} {}", self.hardware.hardware_type(), self.hardware_full_name),
            format!("Type: {} [{}]", sensor.sensor_type(), unit),
            format!("Value: {}{}", sensor.formatted_value(), unit),
            format!("Min/Max: {} / {}", measured(sensor.minimum()), measured(sensor.maximum())),
            format!("Limits ({:?}): {}", sensor.settings.limits_type, limits),
            format!("Enabled: {}", sensor.enabled()),
        ]
        .join("\n")
    }
}

impl Hardware {
    pub fn new(id: impl Into<String>, hardware_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hardware_type: hardware_type.into(),
            name: name.into(),
            sensors: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_sensor(mut self, sensor: Sensor) -> Self {
        self.sensors.push(sensor);
        self
    }

    pub fn with_child(mut self, child: Hardware) -> Self {
        self.children.push(child);
        self
    }

    pub fn push_sensor(&mut self, sensor: Sensor) {
        self.sensors.push(sensor);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn hardware_type(&self) -> &str {
        &self.hardware_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    pub fn children(&self) -> &[Hardware] {
        &self.children
    }

    /// 含父裝置名稱的完整名稱，如 `Motherboard/Nuvoton NCT6798D`
    pub fn full_name(&self, parent: Option<&str>) -> String {
        match parent {
            Some(parent) => format!("{}/{}", parent, self.name),
            None => self.name.clone(),
        }
    }

    /// 任一感測器 (遞迴) 啟用時即為啟用
    pub fn enabled(&self) -> bool {
        self.sensors.iter().any(Sensor::enabled) || self.children.iter().any(Hardware::enabled)
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.for_each_sensor_mut(&mut |sensor: &mut Sensor| sensor.set_enabled(enabled));
    }

    /// 遞迴走訪所有感測器
    pub fn all_sensors(&self) -> Vec<&Sensor> {
        let mut out: Vec<&Sensor> = self.sensors.iter().collect();
        for child in &self.children {
            out.extend(child.all_sensors());
        }
        out
    }

    pub fn sensors_by_type(&self, sensor_type: SensorType, recursive: bool) -> Vec<&Sensor> {
        let sensors = if recursive {
            self.all_sensors()
        } else {
            self.sensors.iter().collect()
        };
        sensors
            .into_iter()
            .filter(|s| s.sensor_type() == sensor_type)
            .collect()
    }

    pub fn for_each_sensor_mut(&mut self, f: &mut dyn FnMut(&mut Sensor)) {
        for sensor in &mut self.sensors {
            f(sensor);
        }
        for child in &mut self.children {
            child.for_each_sensor_mut(f);
        }
    }

    pub fn find_sensor(&self, id: &str) -> Option<&Sensor> {
        self.sensors
            .iter()
            .find(|s| s.id() == id)
            .or_else(|| self.children.iter().find_map(|c| c.find_sensor(id)))
    }

    pub fn find_sensor_mut(&mut self, id: &str) -> Option<&mut Sensor> {
        if let Some(index) = self.sensors.iter().position(|s| s.id() == id) {
            return Some(&mut self.sensors[index]);
        }
        self.children.iter_mut().find_map(|c| c.find_sensor_mut(id))
    }

    pub fn collect_sensors<'a>(&'a self, parent: Option<&str>, out: &mut Vec<SensorEntry<'a>>) {
        let full_name = self.full_name(parent);
        for sensor in &self.sensors {
            out.push(SensorEntry {
                hardware_full_name: full_name.clone(),
                hardware: self,
                sensor,
            });
        }
        for child in &self.children {
            child.collect_sensors(Some(&full_name), out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Hardware {
        Hardware::new("/lpc", "Motherboard", "Board")
            .with_sensor(Sensor::new("/lpc/load/0", "Load", SensorType::Load))
            .with_child(
                Hardware::new("/lpc/nct", "SuperIO", "Nuvoton")
                    .with_sensor(Sensor::new("/lpc/nct/temperature/0", "CPU", SensorType::Temperature))
                    .with_sensor(Sensor::new("/lpc/nct/fan/0", "Fan #1", SensorType::Fan)),
            )
    }

    #[test]
    fn test_recursive_sensors_and_lookup() {
        let mut hardware = board();
        assert_eq!(hardware.all_sensors().len(), 3);
        assert_eq!(hardware.sensors_by_type(SensorType::Fan, false).len(), 0);
        assert_eq!(hardware.sensors_by_type(SensorType::Fan, true).len(), 1);

        hardware.find_sensor_mut("/lpc/nct/fan/0").unwrap().record(1200.0);
        assert_eq!(hardware.find_sensor("/lpc/nct/fan/0").unwrap().value(), 1200.0);
        assert!(hardware.find_sensor("/nope").is_none());
    }

    #[test]
    fn test_enabled_is_recursive() {
        let mut hardware = board();
        hardware.set_enabled(false);
        assert!(!hardware.enabled());
        hardware.find_sensor_mut("/lpc/nct/temperature/0").unwrap().set_enabled(true);
        assert!(hardware.enabled());
    }

    #[test]
    fn test_collect_uses_full_names() {
        let hardware = board();
        let mut out = Vec::new();
        hardware.collect_sensors(None, &mut out);
        let names: Vec<_> = out.iter().map(|e| e.hardware_full_name.as_str()).collect();
        assert_eq!(names, vec!["Board", "Board/Nuvoton", "Board/Nuvoton"]);

        let info = out[1].info();
        assert!(info.starts_with("CPU (/lpc/nct/temperature/0)"));
        assert!(info.contains("Hardware: SuperIO Board/Nuvoton"));
        assert!(info.contains("Limits (Auto): 20 .. 90"));
    }
}
