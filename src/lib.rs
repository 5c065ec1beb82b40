//! tableau drives an animated visualization from a stream of domain events.
//!
//! A [`Scene`] owns a tree of [`Entity`] nodes and the single [`Playback`] facility. For each
//! event pulled from the [`Script`], the tree is walked depth-first, children before parents:
//!
//! 1. **Handle**: the entity's [`Behavior`] reacts to the event and may queue explanations
//! 2. **Update**: its persistent [`Visual`] is re-rendered in place
//! 3. **Animate**: queued animations are drained in FIFO order and played to completion
//!
//! After every entity has been visited, a pacing delay is played and a [`Snapshot`] of the tree
//! is presented to the playback facility. Everything is single-threaded and sequential.
#![forbid(unsafe_code)]

mod animation;
mod entity;
mod foundation;
mod render;
mod scene;

/// Geometry model and visual handles.
pub mod geometry;

pub use animation::ease::Ease;
pub use animation::playback::{PlayedStep, Playback, RecordingPlayback, TracingPlayback};
pub use animation::step::{AnimationStep, DEFAULT_RUN_TIME, StepKind};
pub use entity::explanation::{Explanation, HOLD_SECS, INTRO_PAUSE_SECS};
pub use entity::node::{Behavior, Entity, EntityCx, EntityMap, Placement};
pub use entity::pass::PassReport;
pub use entity::queue::{AnimationQueue, PendingAnimation};
pub use foundation::core::{Direction, Point, Rect, Rgba8, Vec2};
pub use foundation::error::{TableauError, TableauResult};
pub use geometry::shape::{Geometry, Primitive, Shape, Style};
pub use geometry::visual::{Visual, VisualId, VisualRef};
pub use render::svg::{SvgOpts, snapshot_to_svg};
pub use scene::config::{ExplanationStyle, FrameConfig, SceneConfig};
pub use scene::driver::{RunReport, Scene, SceneBuilder, Script};
pub use scene::snapshot::{Snapshot, SnapshotEntry};
