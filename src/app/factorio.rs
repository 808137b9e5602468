use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_number, validate_range};

/// 各等級 thermal solar panel 的基礎功率 (kW)
const SOLAR_BASE_POWER_KW: [f64; 3] = [150.0, 300.0, 600.0];
/// 各等級 heat exchanger 的轉換率 (MW)
const EXCHANGER_RATE_MW: [f64; 3] = [1.8, 8.5, 20.0];

const NULIUS_NEIGHBOUR_BONUS: f64 = 0.1;
const NULIUS_REACTOR_MW: f64 = 50.0;
const NULIUS_REACTOR_BONUS: f64 = 0.5;
const STIRLING_ENGINE_MK3_MW: f64 = 8.0;
const EXCHANGER_MK3_MW: f64 = 20.0;

const ULTRACUBE_REACTOR_MW: f64 = 80.0;
const ULTRACUBE_REACTOR_BONUS: f64 = 0.25;

#[derive(Debug, Clone, PartialEq)]
pub struct SolarEnergy {
    pub size: usize,
    pub solar_mark: usize,
    pub exchanger_mark: usize,
    pub megawatts: f64,
    pub exchangers: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NuclearEnergy {
    pub rows: usize,
    pub megawatts: f64,
    pub generators: f64,
    pub generator_name: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UltracubeNuclear {
    pub reactors_mw: f64,
    pub exchangers: f64,
    pub turbines: f64,
    pub offshore_pumps: f64,
    pub generated_mw: f64,
}

/// NUM×NUM 方陣 thermal solar panels 的總功率 (MW)
///
/// 四個角落各有 2 個鄰居，邊緣有 3 個，內部有 4 個；每個鄰居提供 10% 加成。
pub fn nulius_solar_megawatts(size: usize, solar_mark: usize) -> Result<f64> {
    validate_positive_number("num", size, 2)?;
    validate_range("solar_mark", solar_mark, 1, SOLAR_BASE_POWER_KW.len())?;

    let base = SOLAR_BASE_POWER_KW[solar_mark - 1];
    let bonus = NULIUS_NEIGHBOUR_BONUS;
    let corner = base * (1.0 + 2.0 * bonus);
    let edge = base * (1.0 + 3.0 * bonus);
    let inner = base * (1.0 + 4.0 * bonus);

    // 以 f64 計算，避免大 NUM 溢位
    let side = (size - 2) as f64;
    let kilowatts = 4.0 * corner + 4.0 * side * edge + side * side * inner;
    Ok(kilowatts / 1000.0)
}

pub fn nulius_solar_energy(size: usize, solar_mark: usize, exchanger_mark: usize) -> Result<SolarEnergy> {
    validate_range("exchanger_mark", exchanger_mark, 1, EXCHANGER_RATE_MW.len())?;
    let megawatts = nulius_solar_megawatts(size, solar_mark)?;
    Ok(SolarEnergy {
        size,
        solar_mark,
        exchanger_mark,
        megawatts,
        exchangers: megawatts / EXCHANGER_RATE_MW[exchanger_mark - 1],
    })
}

/// 2×NUM 排列的反應爐總功率 (MW)
pub fn nulius_nuclear_energy(rows: usize, stirling: bool) -> Result<NuclearEnergy> {
    validate_positive_number("num", rows, 1)?;

    let total = 2.0 * rows as f64;
    let bonus = NULIUS_REACTOR_BONUS;
    let megawatts = if total < 4.0 {
        total * NULIUS_REACTOR_MW * (1.0 + bonus)
    } else {
        4.0 * NULIUS_REACTOR_MW * (1.0 + 2.0 * bonus)
            + (total - 4.0) * NULIUS_REACTOR_MW * (1.0 + 3.0 * bonus)
    };

    let (rate, generator_name) = if stirling {
        (STIRLING_ENGINE_MK3_MW, "stirling-engine-mk3")
    } else {
        (EXCHANGER_MK3_MW, "exchanger-mk3")
    };

    Ok(NuclearEnergy {
        rows,
        megawatts,
        generators: megawatts / rate,
        generator_name,
    })
}

/// 超過 4 座時，每次移出一對內側反應爐 (3 個鄰居)，剩下的 n ≤ 4 座各有 2 個鄰居
pub fn ultracube_reactors_megawatts(count: usize) -> Result<f64> {
    validate_positive_number("num", count, 1)?;

    let e = ULTRACUBE_REACTOR_MW;
    let b = ULTRACUBE_REACTOR_BONUS;
    let pairs = if count > 4 { (count - 3) / 2 } else { 0 };
    let rest = count - 2 * pairs;
    Ok(pairs as f64 * 2.0 * (e * (1.0 + 3.0 * b)) + rest as f64 * (e * (1.0 + 2.0 * b)))
}

pub fn ultracube_nuclear(count: usize) -> Result<UltracubeNuclear> {
    let reactors_mw = ultracube_reactors_megawatts(count)?;
    let exchangers = reactors_mw / 10.0;
    let turbines = exchangers * 103.0 / 60.0;
    Ok(UltracubeNuclear {
        reactors_mw,
        exchangers,
        turbines,
        offshore_pumps: exchangers * 103.0 / 1200.0,
        generated_mw: turbines * 6.0,
    })
}
