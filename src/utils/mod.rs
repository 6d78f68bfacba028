pub mod build_info;

use dirs::home_dir;
use std::{env, fs, io, path::Path, path::PathBuf, sync::Once};

const DEFAULT_DIR_NAME: &str = ".parish_receipts";
const CONFIG_FILE: &str = "config.json";
const RECEIPTS_DIR: &str = "receipts";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let from_env = env::var(EnvFilter::DEFAULT_ENV).ok();
        let filter = log_filter(from_env.as_deref());

        fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    });
}

/// `RUST_LOG` wins outright when set; otherwise warnings plus this crate at info.
fn log_filter(directives: Option<&str>) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::{filter::LevelFilter, EnvFilter};

    let builder = EnvFilter::builder().with_default_directive(LevelFilter::WARN.into());
    if let Some(directives) = directives {
        return builder.parse_lossy(directives);
    }
    builder
        .parse_lossy("")
        .add_directive(
            "parish_receipts=info"
                .parse()
                .unwrap_or_else(|_| LevelFilter::INFO.into()),
        )
}

/// Returns the application data directory, defaulting to `~/.parish_receipts`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("PARISH_RECEIPTS_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

/// Where rendered receipts land when no output directory is configured.
pub fn receipts_dir_in(base: &Path) -> PathBuf {
    base.join(RECEIPTS_DIR)
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
