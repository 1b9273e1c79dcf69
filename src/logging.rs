use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const FILE_LOG_PREFIX: &str = "practice-backend";
const MAX_LOG_FILES: usize = 30;

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            enable_file_logs: false,
            log_dir: "./logs".to_string(),
        }
    }
}

/// Console logging always; a daily-rotated JSON file alongside it when
/// `enable_file_logs` is on.
pub fn init_tracing(config: &LogConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let stdout_layer = fmt::layer().with_target(true).with_thread_ids(false);
    let registry = Registry::default().with(env_filter).with(stdout_layer);

    if config.enable_file_logs {
        let file_layer = fmt::layer()
            .with_writer(rolling_appender(&config.log_dir))
            .with_ansi(false)
            .json();
        finish_init(registry.with(file_layer).try_init());
    } else {
        finish_init(registry.try_init());
    }
}

fn rolling_appender(log_dir: &str) -> RollingFileAppender {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(FILE_LOG_PREFIX)
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(log_dir)
        .expect("Failed to create rolling file appender")
}

// try_init 在全局 subscriber 已设置时返回错误，属于正常情况（如测试环境）；
// 但在生产首次启动时失败则说明配置有误，应立即终止。
fn finish_init<E: std::fmt::Display>(result: Result<(), E>) {
    if let Err(e) = result {
        if !e.to_string().contains("already been set") {
            panic!("Failed to initialize tracing: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let cfg = LogConfig::default();
        init_tracing(&cfg);
        init_tracing(&cfg);
    }

    #[test]
    fn repeated_registration_is_swallowed() {
        init_tracing(&LogConfig::default());
        finish_init::<String>(Err(
            "a global default trace dispatcher has already been set".into()
        ));
    }
}
