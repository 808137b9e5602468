// 各指令群組背後的領域邏輯
pub mod backup;
pub mod factorio;
pub mod monitor;
