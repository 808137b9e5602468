// 每個指令群組透過 inventory 自行註冊；這裡只負責讓它們被編譯並連結進來。
// 新增群組時在此加上模組即可，dispatcher 不需要修改。
pub mod backup;
pub mod cache;
pub mod factorio;
pub mod monitor;
