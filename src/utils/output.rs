use std::fmt::Display;
use std::io::Write;

/// 使用者輸出 (結果、表格)；診斷訊息走 tracing
pub enum Output {
    Stdout,
    Buffer(Vec<u8>),
}

impl Output {
    pub fn stdout() -> Self {
        Output::Stdout
    }

    /// 寫入記憶體，並關閉 ANSI 顏色
    pub fn buffer() -> Self {
        colored::control::set_override(false);
        Output::Buffer(Vec::new())
    }

    pub fn line(&mut self, text: impl Display) {
        match self {
            Output::Stdout => println!("{}", text),
            Output::Buffer(buf) => {
                let _ = writeln!(buf, "{}", text);
            }
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Output::Stdout)
    }

    pub fn contents(&self) -> String {
        match self {
            Output::Stdout => String::new(),
            Output::Buffer(buf) => String::from_utf8_lossy(buf).into_owned(),
        }
    }
}
