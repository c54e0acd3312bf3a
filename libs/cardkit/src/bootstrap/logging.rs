use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use super::app_config::LoggingConfig;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber: console output plus an optional
/// daily-rotated file. `RUST_LOG` takes precedence over `logging.level`.
///
/// Keep the returned guard alive for the lifetime of the process, dropping it
/// flushes the file writer.
///
/// # Errors
/// Returns an error if the filter directive is invalid, the log directory
/// cannot be created, or a global subscriber is already installed.
pub fn init_logging(cfg: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = build_filter(&cfg.level)?;
    let json = cfg.format == "json";

    let console = fmt::layer().with_target(true);
    let mut layers: Vec<BoxedLayer> = vec![if json {
        console.json().boxed()
    } else {
        console.boxed()
    }];

    let guard = match cfg.file.as_deref() {
        Some(file) => {
            let (layer, guard) = file_layer(Path::new(file), json)?;
            layers.push(layer);
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .context("global tracing subscriber already installed")?;

    Ok(guard)
}

fn build_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).with_context(|| format!("invalid logging.level '{level}'"))
}

fn file_layer(path: &Path, json: bool) -> Result<(BoxedLayer, WorkerGuard)> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .with_context(|| format!("logging.file '{}' has no file name", path.display()))?;

    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory '{}'", dir.display()))?;

    let appender = tracing_appender::rolling::daily(dir, name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = fmt::layer().with_ansi(false).with_writer(writer);
    let layer = if json { layer.json().boxed() } else { layer.boxed() };
    Ok((layer, guard))
}
