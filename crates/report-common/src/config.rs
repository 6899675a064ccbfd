//! Renderer configuration loaded from YAML or JSON.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{ReportError, ReportResult};

/// Which chart backend the renderer should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartBackendPreference {
    /// Self-test the SVG backend once and fall back to raster if it cannot render
    #[default]
    Auto,
    /// Always use the SVG backend
    Svg,
    /// Always use the raster fallback backend
    Raster,
}

impl FromStr for ChartBackendPreference {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "svg" => Ok(Self::Svg),
            "raster" => Ok(Self::Raster),
            other => Err(ReportError::Config(format!(
                "unknown chart backend '{}', expected auto, svg or raster",
                other
            ))),
        }
    }
}

/// Configuration for the report renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Directory holding `background.png` and `icons/*.png`
    pub asset_dir: PathBuf,
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// TrueType fonts tried in order; the built-in bitmap font is used if none load
    pub font_candidates: Vec<PathBuf>,
    pub chart_backend: ChartBackendPreference,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets"),
            canvas_width: 1600,
            canvas_height: 1200,
            font_candidates: default_font_candidates(),
            chart_backend: ChartBackendPreference::Auto,
        }
    }
}

fn default_font_candidates() -> Vec<PathBuf> {
    [
        "assets/fonts/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
        "/Library/Fonts/Arial Bold.ttf",
        "C:\\Windows\\Fonts\\arialbd.ttf",
    ]
    .iter()
    .map(PathBuf::from)
    .collect()
}

impl RenderConfig {
    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> ReportResult<Self> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml(yaml_str: &str) -> ReportResult<Self> {
        let config: Self = serde_yaml::from_str(yaml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a `.json`, `.yaml` or `.yml` file.
    pub fn from_file(path: impl AsRef<Path>) -> ReportResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ReportError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Err(ReportError::Config(format!(
                "unsupported config format: {}",
                path.display()
            ))),
        }
    }

    /// Canvas must be non-empty and keep a 4:3 aspect ratio.
    pub fn validate(&self) -> ReportResult<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(ReportError::Config("canvas size must be non-zero".into()));
        }
        if self.canvas_width as u64 * 3 != self.canvas_height as u64 * 4 {
            return Err(ReportError::Config(format!(
                "canvas {}x{} is not 4:3",
                self.canvas_width, self.canvas_height
            )));
        }
        Ok(())
    }

    /// Path of the optional background image.
    pub fn background_path(&self) -> PathBuf {
        self.asset_dir.join("background.png")
    }

    /// Path of the optional icon for a panel.
    pub fn icon_path(&self, icon_name: &str) -> PathBuf {
        self.asset_dir.join("icons").join(format!("{}.png", icon_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_valid() {
        let config = RenderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!((config.canvas_width, config.canvas_height), (1600, 1200));
    }

    #[test]
    fn test_yaml_partial_overrides() {
        let config = RenderConfig::from_yaml(
            "asset_dir: /srv/report\ncanvas_width: 800\ncanvas_height: 600\nchart_backend: raster\n",
        )
        .unwrap();
        assert_eq!(config.asset_dir, PathBuf::from("/srv/report"));
        assert_eq!(config.chart_backend, ChartBackendPreference::Raster);
        assert!(!config.font_candidates.is_empty());
        assert_eq!(
            config.icon_path("wind"),
            PathBuf::from("/srv/report/icons/wind.png")
        );
    }

    #[test]
    fn test_rejects_non_4_3_canvas() {
        let err = RenderConfig::from_json(r#"{"canvas_width": 1000, "canvas_height": 1000}"#)
            .unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
    }

    #[test]
    fn test_from_file_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"chart_backend": "svg"}}"#).unwrap();
        let config = RenderConfig::from_file(file.path()).unwrap();
        assert_eq!(config.chart_backend, ChartBackendPreference::Svg);

        let txt = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        assert!(RenderConfig::from_file(txt.path()).is_err());
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("RASTER".parse::<ChartBackendPreference>().unwrap(), ChartBackendPreference::Raster);
        assert!("gpu".parse::<ChartBackendPreference>().is_err());
    }
}
