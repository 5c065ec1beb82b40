use std::time::Duration;

use crate::animation::step::{AnimationStep, StepKind};
use crate::foundation::error::{TableauError, TableauResult};
use crate::geometry::shape::Geometry;
use crate::geometry::visual::VisualId;
use crate::scene::snapshot::Snapshot;

/// Playback facility contract.
///
/// Ordering contract: `play` is called in the exact order steps are drained by the scene, and
/// returns only once the step has completed. `present` is called once after every event pass.
pub trait Playback {
    /// Play one step to completion.
    fn play(&mut self, step: &AnimationStep) -> TableauResult<()>;

    /// Observe the whole tree after an event pass.
    fn present(&mut self, _snapshot: &Snapshot) -> TableauResult<()> {
        Ok(())
    }
}

impl<P: Playback + ?Sized> Playback for Box<P> {
    fn play(&mut self, step: &AnimationStep) -> TableauResult<()> {
        (**self).play(step)
    }

    fn present(&mut self, snapshot: &Snapshot) -> TableauResult<()> {
        (**self).present(snapshot)
    }
}

/// One step as seen by [`RecordingPlayback`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PlayedStep {
    pub kind: StepKind,
    /// Number of snapshots presented before this step (the event pass it belongs to).
    pub pass: usize,
    /// Virtual clock at step start, in seconds.
    pub started_at: f64,
    pub duration: f64,
    pub visual: Option<VisualId>,
    /// Geometry of the visual at play time.
    pub geometry: Option<Geometry>,
}

/// In-memory playback for tests and offline inspection; advances a virtual clock.
#[derive(Debug, Default, serde::Serialize)]
pub struct RecordingPlayback {
    steps: Vec<PlayedStep>,
    snapshots: Vec<Snapshot>,
    clock: f64,
}

impl RecordingPlayback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &[PlayedStep] {
        &self.steps
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Total virtual time played, in seconds.
    pub fn elapsed(&self) -> f64 {
        self.clock
    }

    /// Steps that belong to event pass `pass` (0-based).
    pub fn steps_in_pass(&self, pass: usize) -> impl Iterator<Item = &PlayedStep> {
        self.steps.iter().filter(move |s| s.pass == pass)
    }

    pub fn to_json(&self) -> TableauResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Playback for RecordingPlayback {
    fn play(&mut self, step: &AnimationStep) -> TableauResult<()> {
        let duration = step.duration();
        self.steps.push(PlayedStep {
            kind: step.kind(),
            pass: self.snapshots.len(),
            started_at: self.clock,
            duration,
            visual: step.visual().map(|v| v.id()),
            geometry: step.visual().map(|v| v.geometry()),
        });
        self.clock += duration;
        Ok(())
    }

    /// Snapshots must arrive in pass order; steps are tagged by the number already presented.
    fn present(&mut self, snapshot: &Snapshot) -> TableauResult<()> {
        let expected = self.snapshots.len();
        if snapshot.pass != expected {
            return Err(TableauError::playback(format!(
                "snapshot for pass {} presented while pass {expected} was expected",
                snapshot.pass
            )));
        }
        self.snapshots.push(snapshot.clone());
        Ok(())
    }
}

/// Playback that reports every step as a trace line.
///
/// With `realtime` set, each step blocks for its duration, sampled at `fps` ticks per second.
#[derive(Debug, Clone)]
pub struct TracingPlayback {
    realtime: bool,
    fps: u32,
    played: u64,
}

impl TracingPlayback {
    pub fn new(realtime: bool, fps: u32) -> Self {
        Self {
            realtime,
            fps: fps.max(1),
            played: 0,
        }
    }

    /// Number of steps played so far.
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl Default for TracingPlayback {
    fn default() -> Self {
        Self::new(false, 30)
    }
}

impl Playback for TracingPlayback {
    fn play(&mut self, step: &AnimationStep) -> TableauResult<()> {
        tracing::info!(step = %step, index = self.played, "playing animation");
        self.played += 1;
        if !self.realtime {
            return Ok(());
        }

        let ticks = (step.duration() * f64::from(self.fps)).round() as u64;
        let tick = Duration::from_secs_f64(1.0 / f64::from(self.fps));
        for i in 0..ticks {
            if let Some(opacity) = step.opacity_at((i + 1) as f64 / ticks as f64) {
                tracing::trace!(tick = i, opacity, "fade");
            }
            std::thread::sleep(tick);
        }
        Ok(())
    }

    fn present(&mut self, snapshot: &Snapshot) -> TableauResult<()> {
        tracing::debug!(
            pass = snapshot.pass,
            visuals = snapshot.entries.len(),
            "presented"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/playback.rs"]
mod tests;
