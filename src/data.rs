//! Timing configuration loading for EcoLlajta.
//!
//! Stage timings can be read from a CSV table (see `data/timings.csv`) or a
//! JSON object with one key per stage.

use csv::ReaderBuilder;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::warn;

use crate::error::ConfigError;
use crate::models::{StageKind, TimingConfig};

/// CSV row structure for stage timings.
#[derive(Debug, Deserialize)]
struct TimingRow {
    /// Stage key (e.g. "grinding" or "triturado")
    stage: String,
    /// Minutes per unit; minutes per cycle for drying. Kept as text so that
    /// unparsable values fall back to the default instead of failing.
    minutes: String,
}

/// Reads timing overrides from CSV data.
///
/// # CSV Format
///
/// Expected columns: `stage, minutes`
///
/// Rows with an unknown stage are skipped. Rows whose value is not a
/// non-negative number leave that stage at its default.
pub fn read_timings_csv<R: Read>(reader: R) -> Result<TimingConfig, ConfigError> {
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut config = TimingConfig::default();
    for result in rdr.deserialize() {
        let row: TimingRow = result?;
        let Some(stage) = StageKind::from_key(&row.stage) else {
            warn!(stage = %row.stage, "ignoring unknown stage in timing file");
            continue;
        };
        match row.minutes.parse::<f64>() {
            Ok(minutes) => config.set(stage, minutes),
            Err(_) => warn!(stage = stage.name(), value = %row.minutes, "unparsable timing, using default"),
        }
    }
    Ok(config)
}

/// Loads timing overrides from a CSV file.
pub fn load_timings_csv(path: &Path) -> Result<TimingConfig, ConfigError> {
    let file = File::open(path)?;
    read_timings_csv(file)
}

/// Loads timing overrides from a JSON file.
pub fn load_timings_json(path: &Path) -> Result<TimingConfig, ConfigError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(file)?)
}

/// Loads timing overrides, choosing the format from the file extension.
///
/// # Example
///
/// ```no_run
/// use ecollajta::data::load_timing_config;
/// use std::path::Path;
///
/// let config = load_timing_config(Path::new("data/timings.csv")).unwrap();
/// let timings = config.resolve();
/// ```
pub fn load_timing_config(path: &Path) -> Result<TimingConfig, ConfigError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => load_timings_csv(path),
        "json" => load_timings_json(path),
        other => Err(ConfigError::UnsupportedFormat(other.to_string())),
    }
}
