use super::*;
use crate::geometry::shape::Geometry;

#[test]
fn fades_default_to_one_second_smooth() {
    let v = Visual::new(Geometry::text("x", 48.0));
    let step = AnimationStep::fade_in(v.clone());
    assert_eq!(step.kind(), StepKind::FadeIn);
    assert_eq!(step.duration(), DEFAULT_RUN_TIME);
    assert!(step.visual().unwrap().ptr_eq(&v));
    assert_eq!(step.opacity_at(0.0), Some(0.0));
    assert_eq!(step.opacity_at(1.0), Some(1.0));

    let out = AnimationStep::fade_out(v);
    assert_eq!(out.opacity_at(0.0), Some(1.0));
    assert_eq!(out.opacity_at(1.0), Some(0.0));
}

#[test]
fn waits_have_no_visual_and_clamp_duration() {
    let step = AnimationStep::wait(-1.0);
    assert_eq!(step.kind(), StepKind::Wait);
    assert_eq!(step.duration(), 0.0);
    assert!(step.visual().is_none());
    assert!(step.opacity_at(0.5).is_none());
    assert_eq!(AnimationStep::wait(2.0).to_string(), "Wait(2s)");
}
