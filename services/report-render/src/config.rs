//! Resolve the renderer configuration from a file plus command-line overrides.

use anyhow::{Context, Result};
use report_common::{ChartBackendPreference, RenderConfig};
use std::path::PathBuf;

/// Settings that may override the configuration file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub asset_dir: Option<PathBuf>,
    pub chart_backend: Option<ChartBackendPreference>,
}

/// Load the config file if one was given, then apply overrides.
pub fn resolve(overrides: &Overrides) -> Result<RenderConfig> {
    let mut config = match &overrides.config_file {
        Some(path) => RenderConfig::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => RenderConfig::default(),
    };

    if let Some(dir) = &overrides.asset_dir {
        config.asset_dir = dir.clone();
    }
    if let Some(backend) = overrides.chart_backend {
        config.chart_backend = backend;
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let config = resolve(&Overrides::default()).unwrap();
        assert_eq!(config, RenderConfig::default());
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "asset_dir: /from/file\nchart_backend: svg").unwrap();

        let config = resolve(&Overrides {
            config_file: Some(file.path().to_path_buf()),
            asset_dir: None,
            chart_backend: Some(ChartBackendPreference::Raster),
        })
        .unwrap();

        assert_eq!(config.asset_dir, PathBuf::from("/from/file"));
        assert_eq!(config.chart_backend, ChartBackendPreference::Raster);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = resolve(&Overrides {
            config_file: Some(PathBuf::from("/nonexistent/report.yaml")),
            ..Overrides::default()
        });
        assert!(result.is_err());
    }
}
