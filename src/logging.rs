use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const MAX_FILTER_LEN: usize = 4096;

/// Installs a file-backed tracing subscriber when `RUST_LOG` asks for one.
///
/// The terminal belongs to the UI, so log lines never go to stdout/stderr.
/// Returns the log file path when logging was enabled.
pub fn init(log_file: Option<&Path>) -> Result<Option<PathBuf>> {
    let Some(filter) = filter_from(std::env::var("RUST_LOG").ok().as_deref()) else {
        return Ok(None);
    };

    let path = match log_file {
        Some(path) => path.to_path_buf(),
        None => default_log_path()?,
    };
    let file = open_log_file(&path)?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(filter)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(Some(path))
}

/// Blank, oversized or unparsable filters leave logging off.
fn filter_from(raw: Option<&str>) -> Option<EnvFilter> {
    let raw = raw?.trim();
    if raw.is_empty() || raw.len() > MAX_FILTER_LEN {
        return None;
    }
    EnvFilter::try_new(raw).ok()
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log dir {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

fn default_log_path() -> Result<PathBuf> {
    let base = dirs::data_dir().context("failed to resolve data dir")?;
    Ok(base.join("jotter").join("jotter.log"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn filter_requires_a_usable_value() {
        assert!(filter_from(None).is_none());
        assert!(filter_from(Some("   ")).is_none());
        assert!(filter_from(Some(&"a".repeat(MAX_FILTER_LEN + 1))).is_none());
        assert!(filter_from(Some("jotter=debug")).is_some());
    }

    #[test]
    fn log_file_is_created_with_parents_and_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("jotter.log");

        let mut first = open_log_file(&path).unwrap();
        writeln!(first, "one").unwrap();
        drop(first);

        let mut second = open_log_file(&path).unwrap();
        writeln!(second, "two").unwrap();
        drop(second);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }
}
