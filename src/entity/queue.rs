use std::collections::VecDeque;

use crate::animation::step::AnimationStep;
use crate::entity::explanation::Explanation;
use crate::foundation::error::TableauResult;
use crate::geometry::visual::VisualRef;
use crate::scene::config::{ExplanationStyle, FrameConfig};

/// Deferred animation request, turned into steps only when drained.
#[derive(Clone, Debug)]
pub enum PendingAnimation {
    /// Explanation callout; `style: None` uses the scene's default style.
    Explain {
        target: VisualRef,
        text: String,
        style: Option<ExplanationStyle>,
    },
    Pause {
        seconds: f64,
    },
}

impl PendingAnimation {
    pub fn is_explanation(&self) -> bool {
        matches!(self, Self::Explain { .. })
    }

    /// Materialize the steps, sampling targets now.
    pub(crate) fn into_steps(
        self,
        frame: &FrameConfig,
        default_style: &ExplanationStyle,
    ) -> TableauResult<Vec<AnimationStep>> {
        match self {
            Self::Explain {
                target,
                text,
                style,
            } => {
                let style = style.unwrap_or_else(|| default_style.clone());
                Explanation::new(target, text, style, frame).animate()
            }
            Self::Pause { seconds } => Ok(vec![AnimationStep::wait(seconds)]),
        }
    }
}

/// FIFO of [`PendingAnimation`]s owned by one entity.
#[derive(Debug, Default)]
pub struct AnimationQueue {
    pending: VecDeque<PendingAnimation>,
}

impl AnimationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pending: PendingAnimation) {
        self.pending.push_back(pending);
    }

    pub fn pop(&mut self) -> Option<PendingAnimation> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/entity/queue.rs"]
mod tests;
