use std::process::ExitCode;
use std::sync::Arc;

use studentdesk_core::{targets, AppConfig, HttpRecordStore};
use studentdesk_ui::logging::{init_logging, LogStore};
use studentdesk_ui::{run, Flags};

fn main() -> ExitCode {
    let config_path = AppConfig::default_path();
    let (config, config_error) = match AppConfig::load(&config_path) {
        Ok(config) => (config, None),
        Err(error) => (AppConfig::default(), Some(error)),
    };

    let log_store = LogStore::new(2000);
    let logging = init_logging(log_store.clone(), config.log_level);
    tracing::info!(target: targets::UI, "Student Desk starting");

    let mut startup_notice = None;
    if let Some(error) = config_error {
        tracing::error!(target: targets::CONFIG, "{}", error.technical_detail());
        startup_notice = Some(error.user_summary());
    }

    let store = match HttpRecordStore::new(config.store_config()) {
        Ok(store) => store,
        Err(error) => {
            tracing::error!(target: targets::STORE, "{}", error.technical_detail());
            return ExitCode::FAILURE;
        }
    };

    let flags = Flags {
        config,
        store: Arc::new(store),
        log_store,
        reload_handle: logging.reload,
        log_level: logging.level,
        startup_notice,
    };

    match run(flags) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(target: targets::UI, "UI terminated: {}", error);
            ExitCode::FAILURE
        }
    }
}
