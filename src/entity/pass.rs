use crate::animation::playback::Playback;
use crate::animation::step::AnimationStep;
use crate::foundation::error::TableauResult;
use crate::scene::config::{ExplanationStyle, FrameConfig};

/// What happened while one event travelled through the tree.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PassReport {
    /// 0-based position of the event in the stream.
    pub event_index: usize,
    /// Entity paths (`parent/child`) in the order their `handle` ran.
    pub visit_order: Vec<String>,
    /// Entity paths whose `handle` reported a change.
    pub changed: Vec<String>,
    /// Explanation callouts played.
    pub explanations: usize,
    /// Animation steps played, excluding the pacing delay.
    pub steps: usize,
}

impl PassReport {
    pub fn visited(&self) -> usize {
        self.visit_order.len()
    }
}

/// Context threaded through one traversal: the playback facility plus drain-time settings.
pub(crate) struct PassCx<'a> {
    playback: &'a mut dyn Playback,
    pub(crate) frame: &'a FrameConfig,
    pub(crate) style: &'a ExplanationStyle,
    pub(crate) report: PassReport,
}

impl<'a> PassCx<'a> {
    pub(crate) fn new(
        event_index: usize,
        playback: &'a mut dyn Playback,
        frame: &'a FrameConfig,
        style: &'a ExplanationStyle,
    ) -> Self {
        Self {
            playback,
            frame,
            style,
            report: PassReport {
                event_index,
                ..PassReport::default()
            },
        }
    }

    pub(crate) fn play(&mut self, owner: &str, step: &AnimationStep) -> TableauResult<()> {
        tracing::trace!(entity = owner, step = %step, "playing animation");
        self.playback.play(step)?;
        self.report.steps += 1;
        Ok(())
    }

    pub(crate) fn finish(self) -> PassReport {
        self.report
    }
}
