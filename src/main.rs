use nimbus::utils::error::{ErrorSeverity, NimbusError};
use nimbus::{run_cli, Output};

#[tokio::main]
async fn main() {
    match run_cli(std::env::args_os(), Output::stdout()).await {
        Ok(_) => {}
        // --help / --version 與參數錯誤交給 clap 處理輸出與退出碼
        Err(NimbusError::CliError(e)) => e.exit(),
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,      // 警告，但成功
                ErrorSeverity::Medium => 2,   // 找不到或已存在
                ErrorSeverity::High => 1,     // 輸入或配置錯誤
                ErrorSeverity::Critical => 3, // 系統錯誤
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}
