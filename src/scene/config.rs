use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::{Point, Rect, Rgba8};
use crate::foundation::error::{TableauError, TableauResult};

/// Visible area of the scene, centered on the origin.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub width: f64,
    pub height: f64,
    /// Distance kept from the frame edge when pinning to a corner or border.
    pub edge_buff: f64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            width: 8.0 * 16.0 / 9.0,
            height: 8.0,
            edge_buff: 0.5,
        }
    }
}

impl FrameConfig {
    pub fn rect(&self) -> Rect {
        Rect::from_center_size(Point::ORIGIN, (self.width, self.height))
    }
}

/// Presentation parameters for explanation callouts.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExplanationStyle {
    /// Text block width in em.
    pub width_em: f64,
    pub font_family: String,
    pub font_size: f64,
    pub background: Rgba8,
    pub text_color: Rgba8,
    /// Padding between text and box edge.
    pub buff: f64,
    pub corner_radius: f64,
    /// Arrow tip length as a fraction of the connector length.
    pub tip_ratio: f64,
}

impl Default for ExplanationStyle {
    fn default() -> Self {
        Self {
            width_em: 20.0,
            font_family: "sans-serif".to_owned(),
            font_size: 16.0,
            background: Rgba8::opaque(0x2f, 0x2f, 0x2f),
            text_color: Rgba8::WHITE,
            buff: 0.2,
            corner_radius: 0.2,
            tip_ratio: 0.05,
        }
    }
}

/// Scene driver configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Pacing delay played after every event pass.
    pub event_pause_secs: f64,
    pub frame: FrameConfig,
    pub explanation: ExplanationStyle,
    /// Log the entity tree when a run aborts.
    pub dump_tree_on_failure: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            event_pause_secs: 2.0,
            frame: FrameConfig::default(),
            explanation: ExplanationStyle::default(),
            dump_tree_on_failure: true,
        }
    }
}

impl SceneConfig {
    pub fn validate(&self) -> TableauResult<()> {
        fn non_negative(name: &str, v: f64) -> TableauResult<()> {
            if !v.is_finite() || v < 0.0 {
                return Err(TableauError::config(format!(
                    "{name} must be finite and >= 0 (got {v})"
                )));
            }
            Ok(())
        }
        fn positive(name: &str, v: f64) -> TableauResult<()> {
            if !v.is_finite() || v <= 0.0 {
                return Err(TableauError::config(format!(
                    "{name} must be finite and > 0 (got {v})"
                )));
            }
            Ok(())
        }

        non_negative("event_pause_secs", self.event_pause_secs)?;
        positive("frame.width", self.frame.width)?;
        positive("frame.height", self.frame.height)?;
        non_negative("frame.edge_buff", self.frame.edge_buff)?;
        if 2.0 * self.frame.edge_buff >= self.frame.width.min(self.frame.height) {
            return Err(TableauError::config(
                "frame.edge_buff leaves no room inside the frame",
            ));
        }
        let style = &self.explanation;
        positive("explanation.width_em", style.width_em)?;
        positive("explanation.font_size", style.font_size)?;
        non_negative("explanation.buff", style.buff)?;
        non_negative("explanation.corner_radius", style.corner_radius)?;
        non_negative("explanation.tip_ratio", style.tip_ratio)?;
        Ok(())
    }

    /// Load and validate a JSON config file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> TableauResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
