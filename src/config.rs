//! Pipeline configuration.
//!
//! Every tolerance and draw size used by the pipelines lives in one
//! immutable [`PipelineConfig`] value that callers pass explicitly into each
//! component. The defaults are the values the pipelines are tuned for; a
//! TOML file can override any subset of them.

use std::path::Path;

use serde::Deserialize;

use crate::error::{RedactorError, RedactorResult};

/// How fragments are clustered into lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ClusterPolicy {
    /// Join the first line (in creation order) whose anchor is within tolerance.
    #[default]
    FirstFit,
    /// Join the line whose anchor is closest, among those within tolerance.
    NearestFit,
}

/// Geometry tolerances for line assembly and box mapping.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Maximum vertical distance between a fragment and a line anchor.
    pub line_y_tolerance: f64,
    /// Horizontal gap above which a space is synthesized between fragments.
    pub word_gap_tolerance: f64,
    /// Margin added around the union of matched fragments.
    pub box_padding: f64,
    pub cluster_policy: ClusterPolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_y_tolerance: 2.0,
            word_gap_tolerance: 2.0,
            box_padding: 1.5,
            cluster_policy: ClusterPolicy::FirstFit,
        }
    }
}

/// Cover-and-redraw settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub draw_size: f64,
    /// Offset of the replacement text from the box origin, on both axes.
    pub text_inset: f64,
    /// RGB fill of the cover rectangle, components in `0.0..=1.0`.
    pub cover_color: [f64; 3],
    pub text_color: [f64; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            draw_size: 10.0,
            text_inset: 0.5,
            cover_color: [1.0, 1.0, 1.0],
            text_color: [0.0, 0.0, 0.0],
        }
    }
}

/// Page geometry and type sizes for rebuilt documents, in points.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReflowConfig {
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
    pub font_size: f64,
    pub line_height: f64,
    pub title_size: f64,
    pub subtitle_size: f64,
    /// Longest second line that is still treated as a subtitle.
    pub subtitle_max_chars: usize,
}

impl Default for ReflowConfig {
    fn default() -> Self {
        // A4 portrait
        Self {
            page_width: 595.28,
            page_height: 841.89,
            margin: 56.0,
            font_size: 11.0,
            line_height: 15.0,
            title_size: 20.0,
            subtitle_size: 14.0,
            subtitle_max_chars: 80,
        }
    }
}

/// Whole-text preprocessing switches.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub decode_vanity: bool,
    pub collapse_spelled_digits: bool,
    pub split_letter_digit: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            decode_vanity: true,
            collapse_spelled_digits: false,
            split_letter_digit: true,
        }
    }
}

/// Complete configuration passed to every pipeline.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub reflow: ReflowConfig,
    pub matching: MatchingConfig,
}

impl PipelineConfig {
    /// Parses a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> RedactorResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a TOML configuration file.
    pub fn load(path: &Path) -> RedactorResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| RedactorError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&text)
    }

    /// Rejects values the pipelines cannot work with.
    pub fn validate(&self) -> RedactorResult<()> {
        let layout = &self.layout;
        if layout.line_y_tolerance < 0.0 || layout.word_gap_tolerance < 0.0 {
            return Err(RedactorError::Config(
                "layout tolerances must not be negative".to_string(),
            ));
        }
        if self.render.draw_size <= 0.0 {
            return Err(RedactorError::Config(
                "render.draw_size must be positive".to_string(),
            ));
        }

        let reflow = &self.reflow;
        if reflow.font_size <= 0.0 || reflow.line_height <= 0.0 {
            return Err(RedactorError::Config(
                "reflow.font_size and reflow.line_height must be positive".to_string(),
            ));
        }
        if reflow.page_width <= 2.0 * reflow.margin || reflow.page_height <= 2.0 * reflow.margin {
            return Err(RedactorError::Config(format!(
                "reflow margin {} leaves no room on a {}x{} page",
                reflow.margin, reflow.page_width, reflow.page_height
            )));
        }
        Ok(())
    }
}
