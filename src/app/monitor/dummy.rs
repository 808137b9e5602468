use super::hardware::Hardware;
use super::sensor::{Sensor, SensorType};
use crate::domain::ports::SensorBackend;
use crate::utils::error::{NimbusError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DUMMY_HARDWARE_ID: &str = "/test";
pub const TESTER_SENSOR_ID: &str = "/test/load/tester/0";
pub const RANDOM_SENSOR_ID: &str = "/test/load/random/0";

/// 不需要真實硬體的測試用感測器來源
///
/// 提供一個 `/test` 硬體，包含兩個 Load 感測器：
/// - `Tester`：每次更新遞增 [1,2)，超過 100 時歸零
/// - `Random`：每次更新為 [0,100) 的隨機值
pub struct DummyBackend {
    rng: StdRng,
    hardware: Vec<Hardware>,
}

impl DummyBackend {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let hardware = Hardware::new(DUMMY_HARDWARE_ID, "Test", "Dummy")
            .with_sensor(Sensor::new(TESTER_SENSOR_ID, "Tester", SensorType::Load))
            .with_sensor(Sensor::new(RANDOM_SENSOR_ID, "Random", SensorType::Load));
        Self {
            rng,
            hardware: vec![hardware],
        }
    }
}

impl Default for DummyBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorBackend for DummyBackend {
    fn name(&self) -> &str {
        "dummy"
    }

    fn hardware(&self) -> &[Hardware] {
        &self.hardware
    }

    fn hardware_mut(&mut self) -> &mut [Hardware] {
        &mut self.hardware
    }

    fn refresh(&mut self) -> Result<()> {
        let increment = self.rng.gen_range(1.0..2.0);
        let random = self.rng.gen_range(0.0..100.0);
        let hardware = self.hardware.first_mut().ok_or_else(|| NimbusError::SensorError {
            message: "dummy hardware missing".to_string(),
        })?;

        if let Some(tester) = hardware.find_sensor_mut(TESTER_SENSOR_ID) {
            let mut value = tester.value() + increment;
            if value > 100.0 {
                value = 0.0;
            }
            tester.record(value);
        }
        if let Some(sensor) = hardware.find_sensor_mut(RANDOM_SENSOR_ID) {
            sensor.record(random);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tester_increments_and_wraps() {
        let mut backend = DummyBackend::with_seed(7);
        backend.refresh().unwrap();
        let first = backend.hardware()[0].find_sensor(TESTER_SENSOR_ID).unwrap().value();
        assert!((1.0..2.0).contains(&first));

        for _ in 0..120 {
            backend.refresh().unwrap();
            let tester = backend.hardware()[0].find_sensor(TESTER_SENSOR_ID).unwrap();
            assert!((0.0..=100.0).contains(&tester.value()));
        }
        let tester = backend.hardware()[0].find_sensor(TESTER_SENSOR_ID).unwrap();
        assert_eq!(tester.minimum(), Some(0.0));
    }

    #[test]
    fn test_random_within_range() {
        let mut backend = DummyBackend::with_seed(1);
        for _ in 0..20 {
            backend.refresh().unwrap();
            let random = backend.hardware()[0].find_sensor(RANDOM_SENSOR_ID).unwrap();
            assert!((0.0..100.0).contains(&random.value()));
        }
    }
}
