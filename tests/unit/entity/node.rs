use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use tracing_subscriber::layer::{Context, SubscriberExt as _};

use super::*;
use crate::animation::playback::RecordingPlayback;
use crate::animation::step::StepKind;
use crate::entity::pass::PassReport;
use crate::foundation::core::{Direction, Point, Rgba8, Vec2};
use crate::foundation::error::TableauError;
use crate::geometry::shape::Shape;
use crate::scene::config::FrameConfig;

type Log = Rc<RefCell<Vec<String>>>;

/// Records `handle`/`render` calls into a shared log.
struct Tracker {
    name: &'static str,
    log: Log,
    renders: Rc<RefCell<usize>>,
    explain: Vec<&'static str>,
}

impl Tracker {
    fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: log.clone(),
            renders: Rc::new(RefCell::new(0)),
            explain: Vec::new(),
        }
    }
}

impl Behavior<u32> for Tracker {
    fn handle(&mut self, event: &u32, cx: &mut EntityCx<'_, u32>) -> TableauResult<bool> {
        self.log.borrow_mut().push(format!("handle {} {event}", self.name));
        for text in &self.explain {
            cx.explain(*text);
        }
        Ok(!self.explain.is_empty())
    }

    fn render(&self) -> TableauResult<Geometry> {
        *self.renders.borrow_mut() += 1;
        self.log.borrow_mut().push(format!("render {}", self.name));
        Ok(Geometry::text(self.name, 48.0))
    }
}

fn run_pass(root: &mut Entity<u32>, event: u32, playback: &mut RecordingPlayback) -> PassReport {
    let frame = FrameConfig::default();
    let style = ExplanationStyle::default();
    let mut pass = PassCx::new(event as usize, playback, &frame, &style);
    root.dispatch(&event, "", &mut pass).unwrap();
    pass.finish()
}

#[test]
fn visual_is_rendered_once_at_construction_then_mutated_in_place() {
    let log = Log::default();
    let tracker = Tracker::new("solo", &log);
    let renders = tracker.renders.clone();
    let mut e = Entity::new("solo", tracker).unwrap();
    let id = e.visual().id();
    let alias = e.visual().clone();
    assert_eq!(*renders.borrow(), 1);
    assert_eq!(e.visual().revision(), 0);

    let mut playback = RecordingPlayback::new();
    for ev in 0..3 {
        run_pass(&mut e, ev, &mut playback);
    }
    assert_eq!(*renders.borrow(), 4);
    assert_eq!(e.visual().id(), id);
    assert!(alias.ptr_eq(e.visual()));
    assert_eq!(alias.revision(), 3);
}

#[test]
fn children_complete_before_parent_handles() {
    let log = Log::default();
    let leaf = Entity::new("leaf", Tracker::new("leaf", &log)).unwrap();
    let mid = Entity::new("mid", Tracker::new("mid", &log))
        .unwrap()
        .with_child(leaf);
    let sibling = Entity::new("sibling", Tracker::new("sibling", &log)).unwrap();
    let mut root = Entity::new("root", Tracker::new("root", &log))
        .unwrap()
        .with_child(mid)
        .with_child(sibling);
    log.borrow_mut().clear();

    let report = run_pass(&mut root, 7, &mut RecordingPlayback::new());
    assert_eq!(
        report.visit_order,
        vec!["root/mid/leaf", "root/mid", "root/sibling", "root"]
    );
    assert_eq!(
        *log.borrow(),
        vec![
            "handle leaf 7",
            "render leaf",
            "handle mid 7",
            "render mid",
            "handle sibling 7",
            "render sibling",
            "handle root 7",
            "render root",
        ]
    );
}

#[test]
fn explanations_drain_fifo_within_one_update() {
    let log = Log::default();
    let mut tracker = Tracker::new("talker", &log);
    tracker.explain = vec!["first", "second"];
    let mut e = Entity::new("talker", tracker).unwrap();

    let mut playback = RecordingPlayback::new();
    let report = run_pass(&mut e, 0, &mut playback);
    assert_eq!(report.explanations, 2);
    assert_eq!(report.steps, 8);
    assert_eq!(report.changed, vec!["talker"]);
    assert_eq!(e.queued(), 0);

    let fades: Vec<_> = playback
        .steps()
        .iter()
        .filter(|s| s.kind != StepKind::Wait)
        .map(|s| (s.kind, s.visual.unwrap()))
        .collect();
    assert_eq!(fades.len(), 4);
    let (a, b) = (fades[0].1, fades[2].1);
    assert_ne!(a, b);
    assert_eq!(
        fades,
        vec![
            (StepKind::FadeIn, a),
            (StepKind::FadeOut, a),
            (StepKind::FadeIn, b),
            (StepKind::FadeOut, b),
        ]
    );
    assert!(playback.steps().windows(2).all(|w| w[0].started_at <= w[1].started_at));
}

#[test]
fn queued_explanations_do_not_carry_over() {
    let log = Log::default();
    let mut e = Entity::new("quiet", Tracker::new("quiet", &log)).unwrap();
    e.explain("queued outside a pass");
    assert_eq!(e.queued(), 1);

    let mut playback = RecordingPlayback::new();
    assert_eq!(run_pass(&mut e, 0, &mut playback).explanations, 1);
    assert_eq!(run_pass(&mut e, 1, &mut playback).explanations, 0);
}

#[derive(Clone, Default)]
struct WarnCounter(Arc<Mutex<usize>>);

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarnCounter {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == tracing::Level::WARN {
            *self.0.lock().unwrap() += 1;
        }
    }
}

#[test]
fn duplicate_child_keeps_first_and_warns_once() {
    let log = Log::default();
    let first = Entity::new("x", Tracker::new("first", &log)).unwrap();
    let first_id = first.visual().id();
    let second = Entity::new("x", Tracker::new("second", &log)).unwrap();
    let mut parent = Entity::new("parent", Tracker::new("parent", &log)).unwrap();

    let warnings = WarnCounter::default();
    let subscriber = tracing_subscriber::registry().with(warnings.clone());
    tracing::subscriber::with_default(subscriber, || {
        assert!(parent.add_child(first));
        assert!(!parent.add_child(second));
    });

    assert_eq!(*warnings.0.lock().unwrap(), 1);
    assert_eq!(parent.children().len(), 1);
    assert_eq!(parent.child("x").unwrap().visual().id(), first_id);
}

/// Moves itself during `handle`; the update must keep the moved position.
struct Mover;

impl Behavior<u32> for Mover {
    fn handle(&mut self, _: &u32, cx: &mut EntityCx<'_, u32>) -> TableauResult<bool> {
        cx.visual().shift(Vec2::new(1.0, 0.0));
        Ok(true)
    }

    fn render(&self) -> TableauResult<Geometry> {
        Ok(Geometry::text("mover", 48.0))
    }
}

/// Spans two points regardless of where it was before.
struct Span;

impl Behavior<u32> for Span {
    fn handle(&mut self, _: &u32, _: &mut EntityCx<'_, u32>) -> TableauResult<bool> {
        Ok(false)
    }

    fn render(&self) -> TableauResult<Geometry> {
        Ok(Geometry::line(Point::new(-1.0, 0.0), Point::new(1.0, 0.0)))
    }

    fn placement(&self) -> Placement {
        Placement::Absolute
    }
}

#[test]
fn update_anchors_on_current_position_unless_absolute() {
    let mut mover = Entity::new("mover", Mover).unwrap();
    let mut playback = RecordingPlayback::new();
    run_pass(&mut mover, 0, &mut playback);
    run_pass(&mut mover, 1, &mut playback);
    assert!((mover.visual().center().unwrap() - Point::new(2.0, 0.0)).hypot() < 1e-9);

    let mut span = Entity::new("span", Span).unwrap();
    span.visual().shift(Vec2::new(0.0, 3.0));
    run_pass(&mut span, 0, &mut playback);
    assert!((span.visual().center().unwrap() - Point::ORIGIN).hypot() < 1e-9);
}

struct Adopter;

impl Behavior<u32> for Adopter {
    fn handle(&mut self, _: &u32, cx: &mut EntityCx<'_, u32>) -> TableauResult<bool> {
        if cx.has_child("kid") {
            return Ok(false);
        }
        let kid = Entity::new("kid", Mover)?;
        Ok(cx.add_child(kid))
    }

    fn render(&self) -> TableauResult<Geometry> {
        Ok(Geometry::text("adopter", 48.0))
    }
}

#[test]
fn children_added_during_handle_are_visited_from_next_event() {
    let mut e = Entity::new("adopter", Adopter).unwrap();
    let mut playback = RecordingPlayback::new();
    let first = run_pass(&mut e, 0, &mut playback);
    assert_eq!(first.visit_order, vec!["adopter"]);
    assert_eq!(first.changed, vec!["adopter"]);

    let second = run_pass(&mut e, 1, &mut playback);
    assert_eq!(second.visit_order, vec!["adopter/kid", "adopter"]);
    assert_eq!(second.changed, vec!["adopter/kid"]);
}

struct Broken;

impl Behavior<u32> for Broken {
    fn handle(&mut self, _: &u32, _: &mut EntityCx<'_, u32>) -> TableauResult<bool> {
        Err(TableauError::scene("broken entity"))
    }

    fn render(&self) -> TableauResult<Geometry> {
        Ok(Geometry::text("broken", 48.0))
    }
}

#[test]
fn errors_stop_the_traversal() {
    let log = Log::default();
    let mut root = Entity::new("root", Tracker::new("root", &log))
        .unwrap()
        .with_child(Entity::new("broken", Broken).unwrap());
    log.borrow_mut().clear();

    let frame = FrameConfig::default();
    let style = ExplanationStyle::default();
    let mut playback = RecordingPlayback::new();
    let mut pass = PassCx::new(0, &mut playback, &frame, &style);
    assert!(root.dispatch(&0, "", &mut pass).is_err());
    assert!(log.borrow().is_empty());
}

#[test]
fn describe_lists_every_node_indented() {
    let log = Log::default();
    let root = Entity::new("root", Tracker::new("root", &log))
        .unwrap()
        .with_child(Entity::new("leaf", Tracker::new("leaf", &log)).unwrap());
    let mut roots = EntityMap::new("scene");
    roots.insert(root);
    roots.insert(Entity::new("second", Tracker::new("second", &log)).unwrap());
    let out = TreeDump(&roots).to_string();
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("root v"));
    assert!(lines[1].starts_with("  leaf v"));
    assert!(lines[2].starts_with("second v"));
    assert!(lines.iter().all(|l| l.contains("bounds=[")));
}

/// Explains another entity's visual with its own callout style.
struct Annotator {
    target: Visual,
}

impl Behavior<u32> for Annotator {
    fn handle(&mut self, _: &u32, cx: &mut EntityCx<'_, u32>) -> TableauResult<bool> {
        let style = ExplanationStyle {
            background: Rgba8::opaque(0x10, 0x40, 0x80),
            font_size: 24.0,
            ..ExplanationStyle::default()
        };
        cx.explain_styled(&self.target, "styled note", style);
        cx.explain_on(&self.target, "default note");
        Ok(true)
    }

    fn render(&self) -> TableauResult<Geometry> {
        Ok(Geometry::text("annotator", 48.0))
    }
}

#[test]
fn styled_explanations_override_the_scene_style_per_callout() {
    let target = Visual::new(Geometry::text("subject", 48.0));
    let mut e = Entity::new(
        "annotator",
        Annotator {
            target: target.clone(),
        },
    )
    .unwrap();
    let mut playback = RecordingPlayback::new();
    let report = run_pass(&mut e, 0, &mut playback);
    assert_eq!(report.explanations, 2);

    let shown: Vec<_> = playback
        .steps()
        .iter()
        .filter(|s| s.kind == StepKind::FadeIn)
        .map(|s| s.geometry.clone().unwrap())
        .collect();
    assert_eq!(shown.len(), 2);

    let backdrop_and_size = |g: &Geometry| {
        let fill = g.primitives[0].style.fill;
        let size = g.primitives.iter().find_map(|p| match &p.shape {
            Shape::Text { font_size, .. } => Some(*font_size),
            _ => None,
        });
        (fill, size)
    };
    let default = ExplanationStyle::default();
    assert_eq!(
        backdrop_and_size(&shown[0]),
        (Some(Rgba8::opaque(0x10, 0x40, 0x80)), Some(24.0))
    );
    assert_eq!(
        backdrop_and_size(&shown[1]),
        (Some(default.background), Some(default.font_size))
    );

    let target_ur = target.boundary_point(Direction::UR).unwrap();
    for g in &shown {
        let arrow_to = g.primitives.iter().find_map(|p| match p.shape {
            Shape::Arrow { to, .. } => Some(to),
            _ => None,
        });
        assert_eq!(arrow_to, Some(target_ur));
    }
}
