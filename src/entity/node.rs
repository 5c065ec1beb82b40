use std::fmt;

use indexmap::IndexMap;

use crate::entity::pass::PassCx;
use crate::entity::queue::{AnimationQueue, PendingAnimation};
use crate::foundation::error::TableauResult;
use crate::geometry::shape::Geometry;
use crate::geometry::visual::Visual;
use crate::scene::config::ExplanationStyle;
use crate::scene::snapshot::SnapshotEntry;

/// How a fresh render is reconciled with the existing visual.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Placement {
    /// Re-center the new geometry on the visual's current center.
    #[default]
    KeepPosition,
    /// Use rendered coordinates as-is (connectors between other visuals).
    Absolute,
}

/// Per-entity behavior: logical state plus how it reacts and how it looks.
pub trait Behavior<E> {
    /// React to `event`. Returns whether state changed or an animation was queued.
    ///
    /// Children have already been handled and updated for this event; do not recurse.
    fn handle(&mut self, event: &E, cx: &mut EntityCx<'_, E>) -> TableauResult<bool>;

    /// Geometry for this entity alone, without children. Must be free of side effects.
    fn render(&self) -> TableauResult<Geometry>;

    fn placement(&self) -> Placement {
        Placement::KeepPosition
    }
}

/// What a [`Behavior`] may touch while handling an event.
pub struct EntityCx<'a, E> {
    name: &'a str,
    visual: &'a Visual,
    queue: &'a mut AnimationQueue,
    children: &'a mut EntityMap<E>,
}

impl<E> EntityCx<'_, E> {
    pub fn name(&self) -> &str {
        self.name
    }

    /// The entity's own persistent visual.
    pub fn visual(&self) -> &Visual {
        self.visual
    }

    /// Queue an explanation anchored to this entity.
    pub fn explain(&mut self, text: impl Into<String>) {
        let target = self.visual.clone();
        self.explain_on(&target, text);
    }

    /// Queue an explanation anchored to `target`, sampled when the queue drains.
    pub fn explain_on(&mut self, target: &Visual, text: impl Into<String>) {
        self.queue.push(PendingAnimation::Explain {
            target: target.downgrade(),
            text: text.into(),
            style: None,
        });
    }

    pub fn explain_styled(
        &mut self,
        target: &Visual,
        text: impl Into<String>,
        style: ExplanationStyle,
    ) {
        self.queue.push(PendingAnimation::Explain {
            target: target.downgrade(),
            text: text.into(),
            style: Some(style),
        });
    }

    /// Queue a wait, ordered with the other queued animations.
    pub fn pause(&mut self, seconds: f64) {
        self.queue.push(PendingAnimation::Pause { seconds });
    }

    /// Register a child. It is first visited on the next event.
    pub fn add_child(&mut self, child: Entity<E>) -> bool {
        self.children.insert(child)
    }

    pub fn has_child(&self, name: &str) -> bool {
        self.children.contains(name)
    }

    pub fn child(&self, name: &str) -> Option<&Entity<E>> {
        self.children.get(name)
    }
}

/// A node of the scene tree.
pub struct Entity<E> {
    name: String,
    // Assigned once here; later changes go through `Visual`'s in-place mutators.
    visual: Visual,
    children: EntityMap<E>,
    queue: AnimationQueue,
    behavior: Box<dyn Behavior<E>>,
}

impl<E> Entity<E> {
    pub fn new(
        name: impl Into<String>,
        behavior: impl Behavior<E> + 'static,
    ) -> TableauResult<Self> {
        let name = name.into();
        let visual = Visual::new(behavior.render()?);
        Ok(Self {
            children: EntityMap::new(name.clone()),
            name,
            visual,
            queue: AnimationQueue::new(),
            behavior: Box::new(behavior),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visual(&self) -> &Visual {
        &self.visual
    }

    pub fn children(&self) -> &EntityMap<E> {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&Entity<E>> {
        self.children.get(name)
    }

    /// Register `child` under its name. A duplicate name is logged and ignored.
    pub fn add_child(&mut self, child: Entity<E>) -> bool {
        self.children.insert(child)
    }

    pub fn with_child(mut self, child: Entity<E>) -> Self {
        self.add_child(child);
        self
    }

    /// Queue an explanation anchored to this entity, played on the next update.
    pub fn explain(&mut self, text: impl Into<String>) {
        self.queue.push(PendingAnimation::Explain {
            target: self.visual.downgrade(),
            text: text.into(),
            style: None,
        });
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Children first, then this entity's own handle and update.
    pub(crate) fn dispatch(
        &mut self,
        event: &E,
        parent: &str,
        pass: &mut PassCx<'_>,
    ) -> TableauResult<()> {
        let path = if parent.is_empty() {
            self.name.clone()
        } else {
            format!("{parent}/{}", self.name)
        };

        for child in self.children.values_mut() {
            child.dispatch(event, &path, pass)?;
        }

        tracing::debug!(entity = %path, "handling event");
        let mut cx = EntityCx {
            name: &self.name,
            visual: &self.visual,
            queue: &mut self.queue,
            children: &mut self.children,
        };
        let changed = self.behavior.handle(event, &mut cx)?;

        pass.report.visit_order.push(path.clone());
        if changed {
            pass.report.changed.push(path.clone());
        }
        self.update_scene(&path, pass)
    }

    /// Re-render into the persistent visual, then drain the queue in FIFO order.
    fn update_scene(&mut self, path: &str, pass: &mut PassCx<'_>) -> TableauResult<()> {
        let geometry = self.behavior.render()?;
        match self.behavior.placement() {
            Placement::KeepPosition => self.visual.morph_into(geometry),
            Placement::Absolute => self.visual.replace(geometry),
        }

        while let Some(pending) = self.queue.pop() {
            if pending.is_explanation() {
                pass.report.explanations += 1;
            }
            for step in pending.into_steps(pass.frame, pass.style)? {
                pass.play(path, &step)?;
            }
        }
        Ok(())
    }

    pub(crate) fn collect_snapshot(&self, parent: &str, out: &mut Vec<SnapshotEntry>) {
        let path = if parent.is_empty() {
            self.name.clone()
        } else {
            format!("{parent}/{}", self.name)
        };
        out.push(SnapshotEntry {
            path: path.clone(),
            visual: self.visual.id(),
            geometry: self.visual.geometry(),
        });
        for child in self.children.values() {
            child.collect_snapshot(&path, out);
        }
    }

    fn describe(&self, depth: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:indent$}{} {} rev={} queued={} bounds=",
            "",
            self.name,
            self.visual.id(),
            self.visual.revision(),
            self.queue.len(),
            indent = depth * 2
        )?;
        match self.visual.bounds() {
            Ok(b) => writeln!(f, "[{:.2}, {:.2}] .. [{:.2}, {:.2}]", b.x0, b.y0, b.x1, b.y1)?,
            Err(_) => writeln!(f, "<empty>")?,
        }
        for child in self.children.values() {
            child.describe(depth + 1, f)?;
        }
        Ok(())
    }
}

impl<E> fmt::Debug for Entity<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("name", &self.name)
            .field("visual", &self.visual)
            .field("children", &self.children.names().collect::<Vec<_>>())
            .field("queued", &self.queue.len())
            .finish()
    }
}

/// Insertion-ordered, name-keyed entities. The first registration of a name wins.
pub struct EntityMap<E> {
    owner: String,
    entries: IndexMap<String, Entity<E>>,
}

impl<E> EntityMap<E> {
    /// `owner` labels warnings (parent entity name, or the scene).
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            entries: IndexMap::new(),
        }
    }

    /// Insert `entity`; returns `false` and logs a warning if the name is taken.
    pub fn insert(&mut self, entity: Entity<E>) -> bool {
        if self.entries.contains_key(entity.name()) {
            tracing::warn!(
                owner = %self.owner,
                entity = %entity.name(),
                "entity is already registered; keeping the first one"
            );
            return false;
        }
        self.entries.insert(entity.name().to_owned(), entity);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Entity<E>> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Entity<E>> {
        self.entries.values()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Entity<E>> {
        self.entries.values_mut()
    }
}

/// One indented line per entity, roots in insertion order.
pub(crate) struct TreeDump<'a, E>(pub(crate) &'a EntityMap<E>);

impl<E> fmt::Display for TreeDump<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for root in self.0.values() {
            root.describe(0, f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/entity/node.rs"]
mod tests;
