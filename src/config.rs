use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::data::model::Stat;

/// Environment variable naming an optional JSON layout file.
pub const CONFIG_ENV: &str = "CREATURE_VIZ_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid colour '{value}' for {field}")]
    BadColor { field: &'static str, value: String },
    #[error("zoom extent [{0}, {1}] must be positive and ordered")]
    BadZoomExtent(f32, f32),
    #[error("parallel plot needs at least one axis")]
    NoAxes,
    #[error("{0} plot has no drawable area")]
    EmptyPlot(&'static str),
}

// ---------------------------------------------------------------------------
// Layout pieces
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self { top, right, bottom, left }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScatterConfig {
    pub margin: Margins,
    /// Outer size including margins.
    pub outer_width: f32,
    pub outer_height: f32,
    pub left: f32,
    pub top: f32,
    pub x_stat: Stat,
    pub y_stat: Stat,
    pub point_radius: f32,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            margin: Margins::new(10.0, 30.0, 50.0, 60.0),
            outer_width: 400.0,
            outer_height: 350.0,
            left: 50.0,
            top: 50.0,
            x_stat: Stat::Attack,
            y_stat: Stat::Defense,
            point_radius: 4.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistogramConfig {
    pub margin: Margins,
    pub outer_width: f32,
    pub outer_height: f32,
    pub left: f32,
    pub top: f32,
    pub stat: Stat,
    /// Target number of bins; the actual count follows round tick values.
    pub bins: usize,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            margin: Margins::new(10.0, 30.0, 50.0, 60.0),
            outer_width: 600.0,
            outer_height: 400.0,
            left: 500.0,
            top: 50.0,
            stat: Stat::Total,
            bins: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    pub margin: Margins,
    /// The width always spans the drawing surface.
    pub outer_height: f32,
    pub top: f32,
    pub axes: Vec<Stat>,
    pub line_width: f32,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            margin: Margins::new(50.0, 30.0, 10.0, 60.0),
            outer_height: 400.0,
            top: 500.0,
            axes: Stat::ALL.to_vec(),
            line_width: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub point: String,
    pub highlight: String,
    pub bar: String,
    pub line: String,
    pub line_alpha: f32,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            point: "#69b3a2".to_string(),
            highlight: "#e15759".to_string(),
            bar: "#4682b4".to_string(),
            line: "#6464c8".to_string(),
            line_alpha: 0.3,
        }
    }
}

// ---------------------------------------------------------------------------
// ViewConfig
// ---------------------------------------------------------------------------

/// Immutable layout and styling for the whole drawing surface.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub scatter: ScatterConfig,
    pub histogram: HistogramConfig,
    pub parallel: ParallelConfig,
    pub colors: ColorConfig,
    /// Allowed `[min, max]` zoom factor for the parallel plot.
    pub zoom_extent: [f32; 2],
    /// The surface never shrinks below this size; larger windows widen the
    /// parallel plot.
    pub min_surface: [f32; 2],
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            scatter: ScatterConfig::default(),
            histogram: HistogramConfig::default(),
            parallel: ParallelConfig::default(),
            colors: ColorConfig::default(),
            zoom_extent: [0.5, 5.0],
            min_surface: [1100.0, 900.0],
        }
    }
}

impl ViewConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let contents = std::fs::read_to_string(path_ref)
            .with_context(|| format!("reading view config {}", path_ref.display()))?;
        let config: ViewConfig = serde_json::from_str(&contents)
            .with_context(|| format!("parsing view config {}", path_ref.display()))?;
        config
            .validate()
            .with_context(|| format!("validating view config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Read the file named by [`CONFIG_ENV`], or fall back to defaults.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                log::info!("Using view config from {}", Path::new(&path).display());
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let [lo, hi] = self.zoom_extent;
        if !(lo > 0.0 && lo <= hi && hi.is_finite()) {
            return Err(ConfigError::BadZoomExtent(lo, hi));
        }
        if self.parallel.axes.is_empty() {
            return Err(ConfigError::NoAxes);
        }
        let s = &self.scatter;
        if s.outer_width <= s.margin.left + s.margin.right
            || s.outer_height <= s.margin.top + s.margin.bottom
        {
            return Err(ConfigError::EmptyPlot("scatter"));
        }
        let h = &self.histogram;
        if h.outer_width <= h.margin.left + h.margin.right
            || h.outer_height <= h.margin.top + h.margin.bottom
        {
            return Err(ConfigError::EmptyPlot("histogram"));
        }
        crate::color::ColorScheme::from_config(&self.colors)?;
        Ok(())
    }
}
