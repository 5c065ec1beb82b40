//! Explanation callouts: transient annotations anchored to another entity's visual.

use crate::animation::step::AnimationStep;
use crate::foundation::core::{Direction, Point, Rect};
use crate::foundation::error::TableauResult;
use crate::geometry::shape::{GLYPH_ADVANCE, Geometry, Shape, Style, wrap_words};
use crate::geometry::visual::{Visual, VisualRef};
use crate::scene::config::{ExplanationStyle, FrameConfig};

/// Pause before the callout fades in.
pub const INTRO_PAUSE_SECS: f64 = 0.25;
/// Time the callout stays fully visible.
pub const HOLD_SECS: f64 = 1.0;

/// A callout box pinned to the upper-right corner of the frame with an arrow to its target.
///
/// The target is held weakly and sampled on every [`Explanation::render`], so the connector
/// always points at where the target is now.
#[derive(Clone, Debug)]
pub struct Explanation {
    target: VisualRef,
    text: String,
    style: ExplanationStyle,
    frame: Rect,
    edge_buff: f64,
}

impl Explanation {
    pub fn new(
        target: VisualRef,
        text: impl Into<String>,
        style: ExplanationStyle,
        frame: &FrameConfig,
    ) -> Self {
        Self {
            target,
            text: text.into(),
            style,
            frame: frame.rect(),
            edge_buff: frame.edge_buff,
        }
    }

    pub fn render(&self) -> TableauResult<Geometry> {
        let style = &self.style;
        let chars_per_line = (style.width_em / GLYPH_ADVANCE).floor() as usize;
        let text = Geometry::single(
            Shape::Text {
                center: Point::ORIGIN,
                lines: wrap_words(&self.text, chars_per_line),
                font_size: style.font_size,
                font_family: Some(style.font_family.clone()),
            },
            Style {
                stroke: None,
                fill: Some(style.text_color),
                stroke_width: 0.0,
            },
        );
        let backdrop = Geometry::surrounding_box(
            &text,
            style.buff,
            style.corner_radius,
            Style::filled(style.background),
        )?;
        let callout = backdrop
            .with(text)
            .to_corner(Direction::UR, self.frame, self.edge_buff)?;

        let from = callout.boundary_point(Direction::DOWN)?;
        let to = self.target.upgrade()?.boundary_point(Direction::UR)?;
        let tip_length = (to - from).hypot() * style.tip_ratio;
        let arrow = Geometry::arrow(from, to, tip_length, style.background);

        Ok(callout.with(arrow))
    }

    /// Build a fresh visual and return the fixed pause, fade-in, hold, fade-out sequence.
    pub fn animate(&self) -> TableauResult<Vec<AnimationStep>> {
        let visual = Visual::new(self.render()?);
        Ok(vec![
            AnimationStep::wait(INTRO_PAUSE_SECS),
            AnimationStep::fade_in(visual.clone()),
            AnimationStep::wait(HOLD_SECS),
            AnimationStep::fade_out(visual),
        ])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/entity/explanation.rs"]
mod tests;
