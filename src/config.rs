// src/config.rs

use std::{env, fs, path::Path, str::FromStr};

use serde::Deserialize;
use tracing::{info, warn};

use crate::chart::ChartSize;
use crate::error::{ReportError, Result};

pub const CONFIG_PATH_VAR: &str = "BENCHREPORT_CONFIG";
pub const CHART_WIDTH_VAR: &str = "BENCHREPORT_CHART_WIDTH";
pub const CHART_HEIGHT_VAR: &str = "BENCHREPORT_CHART_HEIGHT";
pub const PARALLEL_VAR: &str = "BENCHREPORT_PARALLEL";

/// Knobs for report generation. None of them change which data is reported.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub chart_width: u32,
    pub chart_height: u32,
    /// Render charts on the rayon pool.
    pub parallel: bool,
    /// Document `<title>`.
    pub title: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            chart_width: 1024,
            chart_height: 768,
            parallel: true,
            title: "Benchmark Report".to_string(),
        }
    }
}

impl ReportConfig {
    /// Read a JSON config file; absent keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
        let cfg: ReportConfig = serde_json::from_str(&text)
            .map_err(|e| ReportError::Config(format!("parsing {:?}: {}", path, e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults, then the file named by `BENCHREPORT_CONFIG`, then per-key env overrides.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = match lookup(CONFIG_PATH_VAR) {
            Some(path) => {
                info!(%path, "loading report config");
                Self::from_file(path)?
            }
            None => Self::default(),
        };

        override_from(&lookup, CHART_WIDTH_VAR, &mut cfg.chart_width);
        override_from(&lookup, CHART_HEIGHT_VAR, &mut cfg.chart_height);
        override_from(&lookup, PARALLEL_VAR, &mut cfg.parallel);

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chart_width == 0 || self.chart_height == 0 {
            return Err(ReportError::Config(format!(
                "chart size must be non-zero, got {}x{}",
                self.chart_width, self.chart_height
            )));
        }
        Ok(())
    }

    pub fn chart_size(&self) -> ChartSize {
        ChartSize {
            width: self.chart_width,
            height: self.chart_height,
        }
    }
}

/// Replace `slot` with the parsed value of `key`; unparseable values are ignored.
fn override_from<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut T) {
    if let Some(raw) = lookup(key) {
        match raw.trim().parse::<T>() {
            Ok(v) => *slot = v,
            Err(_) => warn!(key, value = %raw, "ignoring unparseable config override"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() -> Result<()> {
        let cfg = ReportConfig::from_lookup(lookup(&[]))?;
        assert_eq!(cfg, ReportConfig::default());
        assert_eq!(cfg.chart_size(), ChartSize { width: 1024, height: 768 });
        Ok(())
    }

    #[test]
    fn env_overrides_apply_and_bad_values_are_ignored() -> Result<()> {
        let cfg = ReportConfig::from_lookup(lookup(&[
            (CHART_WIDTH_VAR, "800"),
            (CHART_HEIGHT_VAR, "tall"),
            (PARALLEL_VAR, "false"),
        ]))?;
        assert_eq!(cfg.chart_width, 800);
        assert_eq!(cfg.chart_height, 768);
        assert!(!cfg.parallel);
        Ok(())
    }

    #[test]
    fn zero_size_is_rejected() {
        let err = ReportConfig::from_lookup(lookup(&[(CHART_WIDTH_VAR, "0")])).unwrap_err();
        assert!(matches!(err, ReportError::Config(_)), "got {err:?}");
    }

    #[test]
    fn file_is_merged_under_env() -> anyhow::Result<()> {
        let mut tmp = NamedTempFile::new()?;
        write!(tmp, r#"{{"chart_width": 640, "title": "Nightly"}}"#)?;
        let path = tmp.path().to_string_lossy().to_string();

        let cfg = ReportConfig::from_lookup(lookup(&[
            (CONFIG_PATH_VAR, path.as_str()),
            (CHART_WIDTH_VAR, "320"),
        ]))?;
        assert_eq!(cfg.chart_width, 320);
        assert_eq!(cfg.chart_height, 768);
        assert_eq!(cfg.title, "Nightly");
        Ok(())
    }

    #[test]
    fn unknown_keys_in_file_are_an_error() -> anyhow::Result<()> {
        let mut tmp = NamedTempFile::new()?;
        write!(tmp, r#"{{"colour": "red"}}"#)?;
        let err = ReportConfig::from_file(tmp.path()).unwrap_err();
        assert!(matches!(err, ReportError::Config(_)), "got {err:?}");
        Ok(())
    }
}
