use std::fmt;

use crate::animation::ease::Ease;
use crate::geometry::visual::Visual;

/// Run time of a fade when none is given.
pub const DEFAULT_RUN_TIME: f64 = 1.0;

/// One unit of playback. `Playback::play` blocks until the step has completed.
#[derive(Clone, Debug)]
pub enum AnimationStep {
    Wait {
        seconds: f64,
    },
    FadeIn {
        visual: Visual,
        run_time: f64,
        ease: Ease,
    },
    FadeOut {
        visual: Visual,
        run_time: f64,
        ease: Ease,
    },
}

/// Serializable discriminant of an [`AnimationStep`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StepKind {
    Wait,
    FadeIn,
    FadeOut,
}

impl AnimationStep {
    pub fn wait(seconds: f64) -> Self {
        Self::Wait { seconds }
    }

    pub fn fade_in(visual: Visual) -> Self {
        Self::FadeIn {
            visual,
            run_time: DEFAULT_RUN_TIME,
            ease: Ease::default(),
        }
    }

    pub fn fade_out(visual: Visual) -> Self {
        Self::FadeOut {
            visual,
            run_time: DEFAULT_RUN_TIME,
            ease: Ease::default(),
        }
    }

    pub fn kind(&self) -> StepKind {
        match self {
            Self::Wait { .. } => StepKind::Wait,
            Self::FadeIn { .. } => StepKind::FadeIn,
            Self::FadeOut { .. } => StepKind::FadeOut,
        }
    }

    /// Wall-clock length of the step in seconds; negative values count as zero.
    pub fn duration(&self) -> f64 {
        let secs = match self {
            Self::Wait { seconds } => *seconds,
            Self::FadeIn { run_time, .. } | Self::FadeOut { run_time, .. } => *run_time,
        };
        secs.max(0.0)
    }

    pub fn visual(&self) -> Option<&Visual> {
        match self {
            Self::Wait { .. } => None,
            Self::FadeIn { visual, .. } | Self::FadeOut { visual, .. } => Some(visual),
        }
    }

    /// Opacity of the step's visual at normalized progress `t`; `None` for waits.
    pub fn opacity_at(&self, t: f64) -> Option<f64> {
        match self {
            Self::Wait { .. } => None,
            Self::FadeIn { ease, .. } => Some(ease.apply(t)),
            Self::FadeOut { ease, .. } => Some(1.0 - ease.apply(t)),
        }
    }
}

impl fmt::Display for AnimationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wait { seconds } => write!(f, "Wait({seconds}s)"),
            Self::FadeIn {
                visual, run_time, ..
            } => write!(f, "FadeIn({}, {run_time}s)", visual.id()),
            Self::FadeOut {
                visual, run_time, ..
            } => write!(f, "FadeOut({}, {run_time}s)", visual.id()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/step.rs"]
mod tests;
