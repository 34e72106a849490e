pub mod format;
pub mod telegram;

pub use format::{
    format_bias_alert, format_error_notice, format_help, format_run_started, format_run_summary,
    format_settings, format_status,
};
pub use telegram::TelegramNotifier;
