use crate::utils::color::{multiple_lerp_with_weights, Color};
use crate::utils::error::{NimbusError, Result};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

#[allow(clippy::expect_used)] // static regex
static TEMPLATE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]+)\}").expect("static regex should not panic"));

/// 感測器量測的資料種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorType {
    Voltage,
    Current,
    Clock,
    Load,
    Level,
    Control,
    Temperature,
    Fan,
    Flow,
    Power,
    Data,
    SmallData,
    Factor,
    Frequency,
    Throughput,
    TimeSpan,
    Energy,
}

impl SensorType {
    pub const ALL: [SensorType; 17] = [
        SensorType::Voltage,
        SensorType::Current,
        SensorType::Clock,
        SensorType::Load,
        SensorType::Level,
        SensorType::Control,
        SensorType::Temperature,
        SensorType::Fan,
        SensorType::Flow,
        SensorType::Power,
        SensorType::Data,
        SensorType::SmallData,
        SensorType::Factor,
        SensorType::Frequency,
        SensorType::Throughput,
        SensorType::TimeSpan,
        SensorType::Energy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SensorType::Voltage => "Voltage",
            SensorType::Current => "Current",
            SensorType::Clock => "Clock",
            SensorType::Load => "Load",
            SensorType::Level => "Level",
            SensorType::Control => "Control",
            SensorType::Temperature => "Temperature",
            SensorType::Fan => "Fan",
            SensorType::Flow => "Flow",
            SensorType::Power => "Power",
            SensorType::Data => "Data",
            SensorType::SmallData => "SmallData",
            SensorType::Factor => "Factor",
            SensorType::Frequency => "Frequency",
            SensorType::Throughput => "Throughput",
            SensorType::TimeSpan => "TimeSpan",
            SensorType::Energy => "Energy",
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorType {
    type Err = NimbusError;

    fn from_str(s: &str) -> Result<Self> {
        SensorType::ALL
            .iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| NimbusError::InvalidConfigValueError {
                field: "sensor_type".to_string(),
                value: s.to_string(),
                reason: "Unknown sensor type".to_string(),
            })
    }
}

/// (min, max) 範圍
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    pub min: f64,
    pub max: f64,
}

impl Limits {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// 使用者輸入的上下限：需要 min < max
    pub fn checked(min: f64, max: f64) -> Result<Self> {
        if min < max {
            Ok(Self::new(min, max))
        } else {
            Err(NimbusError::InvalidConfigValueError {
                field: "limits".to_string(),
                value: format!("{} .. {}", min, max),
                reason: "Minimum must be lower than maximum".to_string(),
            })
        }
    }

    pub fn is_zero(&self) -> bool {
        self.min == 0.0 && self.max == 0.0
    }

    pub fn diff(&self) -> f64 {
        self.max - self.min
    }

    /// 擴展範圍以包含 `other`
    pub fn union(&self, other: Limits) -> Limits {
        Limits::new(self.min.min(other.min), self.max.max(other.max))
    }
}

/// 感測器單位 (盡量使用 SI)，附帶預設上下限與數值精度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorUnit {
    Voltage,
    Current,
    Clock,
    Percent,
    Temperature,
    Fan,
    Flow,
    Power,
    Data,
    SmallData,
    Factor,
    Frequency,
    Throughput,
    TimeSpan,
    Energy,
    Unknown,
}

impl SensorUnit {
    pub fn from_type(sensor_type: SensorType) -> Self {
        match sensor_type {
            SensorType::Voltage => SensorUnit::Voltage,
            SensorType::Current => SensorUnit::Current,
            SensorType::Clock => SensorUnit::Clock,
            SensorType::Load | SensorType::Level | SensorType::Control => SensorUnit::Percent,
            SensorType::Temperature => SensorUnit::Temperature,
            SensorType::Fan => SensorUnit::Fan,
            SensorType::Flow => SensorUnit::Flow,
            SensorType::Power => SensorUnit::Power,
            SensorType::Data => SensorUnit::Data,
            SensorType::SmallData => SensorUnit::SmallData,
            SensorType::Factor => SensorUnit::Factor,
            SensorType::Frequency => SensorUnit::Frequency,
            SensorType::Throughput => SensorUnit::Throughput,
            SensorType::TimeSpan => SensorUnit::TimeSpan,
            SensorType::Energy => SensorUnit::Energy,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            SensorUnit::Voltage => "V",
            SensorUnit::Current => "A",
            SensorUnit::Clock => "MHz",
            SensorUnit::Percent => "%",
            SensorUnit::Temperature => "°C",
            SensorUnit::Fan => "RPM",
            SensorUnit::Flow => "L/h",
            SensorUnit::Power => "W",
            SensorUnit::Data => "GB",
            SensorUnit::SmallData => "MB",
            SensorUnit::Factor => ".",
            SensorUnit::Frequency => "Hz",
            SensorUnit::Throughput => "B/s",
            SensorUnit::TimeSpan => "s",
            SensorUnit::Energy => "mWh",
            SensorUnit::Unknown => "<WAT>",
        }
    }

    pub fn default_limits(&self) -> Limits {
        match self {
            SensorUnit::Voltage => Limits::new(1.0, 1.5),
            SensorUnit::Current => Limits::new(5.0, 90.0),
            SensorUnit::Clock => Limits::new(1000.0, 6000.0),
            SensorUnit::Percent => Limits::new(0.0, 100.0),
            SensorUnit::Temperature => Limits::new(20.0, 90.0),
            SensorUnit::Fan => Limits::new(0.0, 10000.0),
            SensorUnit::Power => Limits::new(10.0, 200.0),
            SensorUnit::Data | SensorUnit::SmallData => Limits::new(0.0, f64::INFINITY),
            SensorUnit::Factor | SensorUnit::TimeSpan => Limits::new(f64::NEG_INFINITY, f64::INFINITY),
            SensorUnit::Frequency => Limits::new(0.0, 4000.0),
            SensorUnit::Throughput => Limits::new(0.0, 1e9),
            SensorUnit::Flow | SensorUnit::Energy | SensorUnit::Unknown => Limits::new(0.0, 0.0),
        }
    }

    /// 小數位數；`None` 表示不限定格式
    pub fn precision(&self) -> Option<usize> {
        match self {
            SensorUnit::Voltage | SensorUnit::Current | SensorUnit::Factor => Some(3),
            SensorUnit::Fan | SensorUnit::Energy => Some(0),
            SensorUnit::TimeSpan | SensorUnit::Unknown => None,
            _ => Some(1),
        }
    }

    pub fn format_value(&self, value: f64) -> String {
        match self.precision() {
            Some(precision) => format!("{:.*}", precision, value),
            None => format!("{}", value),
        }
    }

    /// 依數值百分比插值的顏色目標
    fn color_targets(&self) -> Option<Vec<(Color, f32)>> {
        match self {
            SensorUnit::Percent | SensorUnit::Fan => Some(vec![
                (Color::MAGENTA, 0.0),
                (Color::GREEN, 0.0001),
                (Color::YELLOW, 0.75),
                (Color::RED, 1.0),
            ]),
            SensorUnit::Temperature => Some(vec![
                (Color::RED, 0.0),
                (Color::GREEN, 0.001),
                (Color::YELLOW, 0.75),
                (Color::RED, 1.0),
            ]),
            SensorUnit::Power | SensorUnit::Voltage | SensorUnit::Current => Some(vec![
                (Color::GREEN, 0.0),
                (Color::YELLOW, 0.75),
                (Color::RED, 1.0),
            ]),
            SensorUnit::Throughput | SensorUnit::Clock => Some(vec![
                (Color::WHITE, 0.0),
                (Color::WHITE, 0.5),
                (Color::YELLOW, 0.75),
                (Color::RED, 1.0),
            ]),
            _ => None,
        }
    }
}

impl fmt::Display for SensorUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// 感測器上下限的取得方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LimitsType {
    /// Device critical limits, when the device reports them
    Critical,
    /// Device limits, when the device reports them
    Limits,
    /// Measured min/max of this run
    MinMax,
    /// Measured min/max across every saved run
    MinMaxEver,
    /// User limits, defaulting to the unit's limits
    Fixed,
    /// First available of CRITICAL > LIMITS > FIXED
    #[default]
    Auto,
}

/// 使用者對單一感測器的設定，會被持久化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub limits_type: LimitsType,
    #[serde(default)]
    pub custom_limits: Option<Limits>,
    #[serde(default)]
    pub minmax_ever: Option<Limits>,
}

fn default_enabled() -> bool {
    true
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            limits_type: LimitsType::Auto,
            custom_limits: None,
            minmax_ever: None,
        }
    }
}

/// `Sensor::attribute` 的回傳值
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Number(f64),
    Text(String),
    Flag(bool),
    Missing,
}

impl AttributeValue {
    fn from_option(value: Option<f64>) -> Self {
        value.map(AttributeValue::Number).unwrap_or(AttributeValue::Missing)
    }

    /// 支援 `.N` / `.Nf` 格式 (數值精度)
    pub fn render(&self, spec: Option<&str>) -> String {
        match self {
            AttributeValue::Number(n) => match spec.and_then(parse_precision) {
                Some(precision) => format!("{:.*}", precision, n),
                None => format!("{}", n),
            },
            AttributeValue::Text(text) => text.clone(),
            AttributeValue::Flag(flag) => flag.to_string(),
            AttributeValue::Missing => "None".to_string(),
        }
    }
}

fn parse_precision(spec: &str) -> Option<usize> {
    spec.strip_prefix('.')?.trim_end_matches('f').parse().ok()
}

/// 單一硬體感測器
#[derive(Debug, Clone, PartialEq)]
pub struct Sensor {
    id: String,
    name: String,
    sensor_type: SensorType,
    unit: SensorUnit,
    value: f64,
    minimum: Option<f64>,
    maximum: Option<f64>,
    critical_limits: Option<Limits>,
    basic_limits: Option<Limits>,
    pub settings: SensorSettings,
}

impl Sensor {
    pub fn new(id: impl Into<String>, name: impl Into<String>, sensor_type: SensorType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sensor_type,
            unit: SensorUnit::from_type(sensor_type),
            value: 0.0,
            minimum: None,
            maximum: None,
            critical_limits: None,
            basic_limits: None,
            settings: SensorSettings::default(),
        }
    }

    pub fn with_critical_limits(mut self, limits: Option<Limits>) -> Self {
        self.critical_limits = limits;
        self
    }

    pub fn with_basic_limits(mut self, limits: Option<Limits>) -> Self {
        self.basic_limits = limits;
        self
    }

    /// 記錄新的量測值並更新量測 min/max
    pub fn record(&mut self, value: f64) {
        self.value = value;
        self.minimum = Some(self.minimum.map_or(value, |m| m.min(value)));
        self.maximum = Some(self.maximum.map_or(value, |m| m.max(value)));
    }

    pub fn set_critical_limits(&mut self, limits: Option<Limits>) {
        self.critical_limits = limits;
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sensor_type(&self) -> SensorType {
        self.sensor_type
    }

    pub fn unit(&self) -> SensorUnit {
        self.unit
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn minimum(&self) -> Option<f64> {
        self.minimum
    }

    pub fn maximum(&self) -> Option<f64> {
        self.maximum
    }

    pub fn enabled(&self) -> bool {
        self.settings.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.settings.enabled = enabled;
    }

    /// 這次執行期間量測到的 (min, max)
    pub fn value_range(&self) -> Option<Limits> {
        Some(Limits::new(self.minimum?, self.maximum?))
    }

    /// 依 `limits_type` 取得感測器的理論上下限
    pub fn limits(&self) -> Option<Limits> {
        match self.settings.limits_type {
            LimitsType::Critical => self.critical_limits,
            LimitsType::Limits => self.basic_limits,
            LimitsType::MinMax => self.value_range(),
            LimitsType::MinMaxEver => self.settings.minmax_ever,
            LimitsType::Fixed => Some(self.fixed_limits()),
            LimitsType::Auto => self
                .critical_limits
                .or(self.basic_limits)
                .or_else(|| Some(self.fixed_limits())),
        }
    }

    fn fixed_limits(&self) -> Limits {
        match self.settings.custom_limits {
            Some(limits) if !limits.is_zero() => limits,
            _ => self.unit.default_limits(),
        }
    }

    pub fn limits_diff(&self) -> f64 {
        self.limits().map(|l| l.diff()).unwrap_or(0.0)
    }

    /// `value` 在上下限之間的百分比，限制在 [0,1]
    pub fn percent_of(&self, value: f64) -> f64 {
        let Some(limits) = self.limits() else {
            return 0.0;
        };
        let range = limits.diff();
        if range == 0.0 {
            return 0.0;
        }
        let factor = (value - limits.min) / range;
        if factor.is_nan() {
            return 0.0;
        }
        factor.clamp(0.0, 1.0)
    }

    pub fn percent_value(&self) -> f64 {
        self.percent_of(self.value)
    }

    /// 依單位與數值百分比計算的狀態顏色；不支援的單位為白色
    pub fn color_for(&self, value: f64) -> Color {
        self.unit
            .color_targets()
            .and_then(|targets| multiple_lerp_with_weights(&targets, self.percent_of(value) as f32))
            .unwrap_or(Color::WHITE)
    }

    pub fn state_color(&self) -> Color {
        self.color_for(self.value)
    }

    pub fn formatted_value(&self) -> String {
        self.unit.format_value(self.value)
    }

    /// 擴展跨執行的 min/max 紀錄
    pub fn update_minmax_ever(&mut self) {
        if let Some(range) = self.value_range() {
            self.settings.minmax_ever = Some(match self.settings.minmax_ever {
                Some(prev) => prev.union(range),
                None => range,
            });
        }
    }

    /// 依名稱取得屬性 (支援 `min`、`max`、`identifier`、`fvalue` 別名)
    pub fn attribute(&self, key: &str) -> AttributeValue {
        let key = key.trim().to_lowercase();
        let key = match key.as_str() {
            "min" => "minimum",
            "max" => "maximum",
            "identifier" => "id",
            "fvalue" => "formatted_value",
            other => other,
        };
        match key {
            "id" => AttributeValue::Text(self.id.clone()),
            "name" => AttributeValue::Text(self.name.clone()),
            "type" => AttributeValue::Text(self.sensor_type.to_string()),
            "unit" => AttributeValue::Text(self.unit.to_string()),
            "value" => AttributeValue::Number(self.value),
            "formatted_value" => AttributeValue::Text(self.formatted_value()),
            "minimum" => AttributeValue::from_option(self.minimum),
            "maximum" => AttributeValue::from_option(self.maximum),
            "min_limit" => AttributeValue::from_option(self.limits().map(|l| l.min)),
            "max_limit" => AttributeValue::from_option(self.limits().map(|l| l.max)),
            "limits_diff" => AttributeValue::Number(self.limits_diff()),
            "percent_value" => AttributeValue::Number(self.percent_value()),
            "enabled" => AttributeValue::Flag(self.enabled()),
            "limits_type" => AttributeValue::Text(format!("{:?}", self.settings.limits_type)),
            _ => AttributeValue::Missing,
        }
    }

    /// 將 `{key}` / `{key:.2f}` 標籤替換為感測器屬性
    pub fn format(&self, template: &str) -> String {
        TEMPLATE_TAG.replace_all(template, |caps: &Captures| {
            let mut parts = caps[1].splitn(2, ':');
            let key = parts.next().unwrap_or_default();
            self.attribute(key).render(parts.next())
        })
        .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_sensor(value: f64) -> Sensor {
        let mut sensor = Sensor::new("/cpu/load/0", "Core #0", SensorType::Load);
        sensor.record(value);
        sensor
    }

    #[test]
    fn test_unit_from_type() {
        assert_eq!(SensorUnit::from_type(SensorType::Control), SensorUnit::Percent);
        assert_eq!(SensorUnit::from_type(SensorType::SmallData).id(), "MB");
        assert_eq!("temperature".parse::<SensorType>().unwrap(), SensorType::Temperature);
        assert!("bogus".parse::<SensorType>().is_err());
    }

    #[test]
    fn test_record_tracks_min_max() {
        let mut sensor = load_sensor(40.0);
        sensor.record(10.0);
        sensor.record(25.0);
        assert_eq!(sensor.value(), 25.0);
        assert_eq!(sensor.value_range(), Some(Limits::new(10.0, 40.0)));
    }

    #[test]
    fn test_limits_by_type() {
        let mut sensor = load_sensor(50.0).with_critical_limits(Some(Limits::new(0.0, 80.0)));
        assert_eq!(sensor.limits(), Some(Limits::new(0.0, 80.0)));

        sensor.settings.limits_type = LimitsType::Limits;
        assert_eq!(sensor.limits(), None);
        assert_eq!(sensor.limits_diff(), 0.0);

        sensor.settings.limits_type = LimitsType::Fixed;
        assert_eq!(sensor.limits(), Some(Limits::new(0.0, 100.0)));
        sensor.settings.custom_limits = Some(Limits::new(0.0, 0.0));
        assert_eq!(sensor.limits(), Some(Limits::new(0.0, 100.0)));
        sensor.settings.custom_limits = Some(Limits::new(20.0, 60.0));
        assert_eq!(sensor.limits(), Some(Limits::new(20.0, 60.0)));

        sensor.settings.limits_type = LimitsType::MinMaxEver;
        assert_eq!(sensor.limits(), None);
        sensor.update_minmax_ever();
        assert_eq!(sensor.limits(), Some(Limits::new(50.0, 50.0)));
    }

    #[test]
    fn test_percent_is_clamped() {
        let sensor = load_sensor(50.0);
        assert!((sensor.percent_value() - 0.5).abs() < 1e-9);
        assert_eq!(sensor.percent_of(150.0), 1.0);
        assert_eq!(sensor.percent_of(-5.0), 0.0);

        let factor = Sensor::new("/x/factor/0", "Factor", SensorType::Factor);
        assert_eq!(factor.percent_of(3.0), 0.0);
    }

    #[test]
    fn test_state_color() {
        assert_eq!(load_sensor(0.0).state_color(), Color::MAGENTA);
        assert_eq!(load_sensor(100.0).state_color(), Color::RED);
        assert_eq!(load_sensor(75.0).state_color(), Color::YELLOW);
        let data = Sensor::new("/ram/data/0", "Memory Used", SensorType::Data);
        assert_eq!(data.state_color(), Color::WHITE);
    }

    #[test]
    fn test_checked_limits() {
        assert_eq!(Limits::checked(10.0, 20.0).unwrap(), Limits::new(10.0, 20.0));
        assert!(Limits::checked(20.0, 10.0).is_err());
        assert!(Limits::checked(5.0, 5.0).is_err());
        assert!(Limits::checked(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_format_template() {
        let mut sensor = load_sensor(12.3456);
        sensor.record(20.0);
        assert_eq!(sensor.format("{name}: {value:.2f}"), "Core #0: 20.00");
        assert_eq!(sensor.format("{min:.1} / {MAX}"), "12.3 / 20");
        assert_eq!(sensor.format("{fvalue}{unit}"), "20.0%");
        assert_eq!(sensor.format("{nope}"), "None");
    }
}
