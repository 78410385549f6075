pub mod models;
pub mod services;
pub mod api;
pub mod transport_axum;

use services::config_store::{AppConfig, ConfigError, ConfigStore};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;

static PROCESS_START: OnceLock<Instant> = OnceLock::new();
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const LOG_FILE_PREFIX: &str = "originscan_";
const LOGS_TO_KEEP: usize = 30;

fn startup_elapsed_ms() -> u128 {
    PROCESS_START
        .get()
        .map(|t| t.elapsed().as_millis())
        .unwrap_or(0)
}

fn env_flag(name: &str) -> bool {
    matches!(
        std::env::var(name).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE")
    )
}

/// Initialize logging with one timestamped log file per process
pub fn init_logging() {
    let disable_file_log = env_flag("ORIGINSCAN_DISABLE_FILE_LOG");
    let disable_cleanup = env_flag("ORIGINSCAN_DISABLE_LOG_CLEANUP");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if disable_file_log {
        init_console_only_logging(env_filter);
        info!("File logging disabled via ORIGINSCAN_DISABLE_FILE_LOG");
        return;
    }

    let logs_dir = match std::env::var("ORIGINSCAN_LOG_DIR") {
        Ok(p) if !p.trim().is_empty() => PathBuf::from(p),
        _ => get_logs_dir(),
    };

    if let Err(e) = fs::create_dir_all(&logs_dir) {
        eprintln!("Failed to create logs directory: {}", e);
        init_console_only_logging(env_filter);
        info!("Falling back to console-only logging (log dir not writable)");
        return;
    }

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_filename = format!("{}{}.log", LOG_FILE_PREFIX, timestamp);

    let file_appender = rolling::never(&logs_dir, &log_filename);
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(file_guard);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(cfg!(debug_assertions))
        .with_target(true);

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();
    if installed.is_err() {
        return;
    }

    info!("=== OriginScan Started ===");
    info!("Log file: {}/{}", logs_dir.display(), log_filename);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if !disable_cleanup {
        std::thread::spawn(move || {
            cleanup_old_logs(&logs_dir, LOGS_TO_KEEP);
        });
    }
}

/// Platform data dir, or `./logs` when none is known
fn get_logs_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("originscan").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

fn cleanup_old_logs(logs_dir: &Path, keep: usize) {
    let mut entries: Vec<_> = match fs::read_dir(logs_dir) {
        Ok(rd) => rd.filter_map(|e| e.ok()).collect(),
        Err(_) => return,
    };

    entries.retain(|e| {
        let name = e.file_name().to_string_lossy().to_string();
        name.starts_with(LOG_FILE_PREFIX) && name.ends_with(".log")
    });

    if entries.len() <= keep {
        return;
    }

    entries.sort_by_key(|e| {
        e.metadata()
            .and_then(|m| m.modified())
            .unwrap_or(std::time::SystemTime::UNIX_EPOCH)
    });

    let remove_count = entries.len().saturating_sub(keep);
    for entry in entries.into_iter().take(remove_count) {
        let _ = fs::remove_file(entry.path());
    }
}

/// Console-only subscriber; a no-op when one is already installed
pub fn init_console_only_logging(env_filter: EnvFilter) {
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(cfg!(debug_assertions))
        .with_target(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init();
}

/// Config file (when present) plus environment overrides
pub fn load_config() -> AppConfig {
    let Some(dir) = ConfigStore::default_config_dir() else {
        warn!("config.no_config_dir_using_defaults");
        return AppConfig::default().with_env_overrides();
    };

    let store = ConfigStore::new(dir);
    match store.load() {
        Ok(config) => {
            info!(path = %store.config_file().display(), "config.loaded");
            config.with_env_overrides()
        }
        Err(e) => {
            warn!(path = %store.config_file().display(), error = %e, "config.load_failed_using_defaults");
            AppConfig::default().with_env_overrides()
        }
    }
}

/// Persist the effective config (file values plus env overrides) into `dir`.
/// An existing file is backed up first.
pub fn write_config_in(dir: PathBuf) -> Result<PathBuf, ConfigError> {
    let store = ConfigStore::new(dir);
    let config = store.load()?.with_env_overrides();
    store.save(&config)?;
    Ok(store.config_file().to_path_buf())
}

pub fn write_config() -> anyhow::Result<PathBuf> {
    let dir = ConfigStore::default_config_dir()
        .ok_or_else(|| anyhow::anyhow!("no config directory available; set ORIGINSCAN_CONFIG_DIR"))?;
    Ok(write_config_in(dir)?)
}

pub fn run() -> anyhow::Result<()> {
    PROCESS_START.get_or_init(Instant::now);

    let logging_t0 = Instant::now();
    init_logging();
    info!(startup_ms = startup_elapsed_ms(), logging_ms = logging_t0.elapsed().as_millis(), "logging.initialized");

    let config = load_config();
    info!(
        bind_addr = %config.server.bind_addr,
        worker_threads = config.server.worker_threads,
        max_content_bytes = config.upload.max_content_bytes,
        "server.starting"
    );

    transport_axum::serve_http_with_axum(config).map_err(anyhow::Error::msg)?;

    info!("=== OriginScan Exited ===");
    Ok(())
}
