use std::fmt;

use crate::animation::playback::Playback;
use crate::animation::step::AnimationStep;
use crate::entity::node::{Entity, EntityMap, TreeDump};
use crate::entity::pass::{PassCx, PassReport};
use crate::foundation::error::{TableauError, TableauResult};
use crate::scene::config::SceneConfig;
use crate::scene::snapshot::Snapshot;

/// Owner label used for warnings about duplicate root entities.
const ROOT_OWNER: &str = "scene";

/// Consumer-defined part of a scene: the initial tree and the event stream.
pub trait Script {
    /// Event type broadcast to the tree.
    type Event: fmt::Debug;

    /// Populate the root entities. Called exactly once, before the first event.
    fn init(&mut self, roots: &mut EntityMap<Self::Event>) -> TableauResult<()>;

    /// The event stream, pulled one event at a time after `init`.
    fn events(&mut self) -> impl Iterator<Item = Self::Event>;
}

/// Summary of a completed run.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RunReport {
    pub passes: Vec<PassReport>,
}

impl RunReport {
    pub fn events(&self) -> usize {
        self.passes.len()
    }

    pub fn total_explanations(&self) -> usize {
        self.passes.iter().map(|p| p.explanations).sum()
    }
}

/// Builds a [`Scene`], wiring the single playback facility.
pub struct SceneBuilder<S, P> {
    script: S,
    playback: Option<P>,
    config: SceneConfig,
}

impl<S: Script, P: Playback> SceneBuilder<S, P> {
    pub fn new(script: S) -> Self {
        Self {
            script,
            playback: None,
            config: SceneConfig::default(),
        }
    }

    pub fn config(mut self, config: SceneConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach the playback facility. A scene has exactly one; attaching twice is an error.
    pub fn attach_playback(mut self, playback: P) -> TableauResult<Self> {
        if self.playback.is_some() {
            return Err(TableauError::scene(
                "a playback facility is already attached to this scene",
            ));
        }
        self.playback = Some(playback);
        Ok(self)
    }

    pub fn build(self) -> TableauResult<Scene<S, P>> {
        self.config.validate()?;
        let playback = self
            .playback
            .ok_or_else(|| TableauError::scene("scene has no playback facility attached"))?;
        Ok(Scene {
            script: self.script,
            playback,
            config: self.config,
            roots: EntityMap::new(ROOT_OWNER),
            ran: false,
        })
    }
}

/// Scene driver: owns the roots and the playback facility and runs one pass per event.
pub struct Scene<S: Script, P> {
    script: S,
    playback: P,
    config: SceneConfig,
    roots: EntityMap<S::Event>,
    ran: bool,
}

impl<S: Script, P: Playback> Scene<S, P> {
    /// Run `init`, then every event in order. A scene runs at most once.
    ///
    /// Any error aborts the run; it is logged with the tree state before being returned.
    pub fn run(&mut self) -> TableauResult<RunReport> {
        if self.ran {
            return Err(TableauError::scene("scene has already run"));
        }
        self.ran = true;

        self.run_inner().inspect_err(|err| {
            tracing::error!(class = err.class(), error = %err, "scene run aborted");
            if self.config.dump_tree_on_failure {
                tracing::error!("scene tree at failure:\n{}", self.describe_tree());
            }
        })
    }

    #[tracing::instrument(name = "scene_run", skip_all)]
    fn run_inner(&mut self) -> TableauResult<RunReport> {
        let Self {
            script,
            playback,
            config,
            roots,
            ..
        } = self;

        script.init(roots)?;
        tracing::info!(
            roots = ?roots.names().collect::<Vec<_>>(),
            "scene initialized"
        );

        let mut report = RunReport::default();
        for (index, event) in script.events().enumerate() {
            tracing::info!(index, event = ?event, "dispatching event");

            let mut pass = PassCx::new(index, &mut *playback, &config.frame, &config.explanation);
            for root in roots.values_mut() {
                root.dispatch(&event, "", &mut pass)?;
            }
            let pass_report = pass.finish();
            tracing::debug!(
                visited = pass_report.visited(),
                changed = pass_report.changed.len(),
                explanations = pass_report.explanations,
                "event pass complete"
            );

            playback.play(&AnimationStep::wait(config.event_pause_secs))?;
            playback.present(&Snapshot::capture(index, roots))?;
            report.passes.push(pass_report);
        }

        tracing::info!(events = report.events(), "scene finished");
        Ok(report)
    }

    pub fn roots(&self) -> &EntityMap<S::Event> {
        &self.roots
    }

    pub fn root(&self, name: &str) -> Option<&Entity<S::Event>> {
        self.roots.get(name)
    }

    pub fn script(&self) -> &S {
        &self.script
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn playback(&self) -> &P {
        &self.playback
    }

    pub fn into_playback(self) -> P {
        self.playback
    }

    /// Indented dump of the tree: name, visual id, revision, queued animations, bounds.
    pub fn describe_tree(&self) -> String {
        TreeDump(&self.roots).to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/driver.rs"]
mod tests;
