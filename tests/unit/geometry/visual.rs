use super::*;

fn near(a: Point, b: Point) -> bool {
    (a - b).hypot() < 1e-9
}

#[test]
fn ids_are_unique_and_clones_alias() {
    let a = Visual::new(Geometry::text("a", 48.0));
    let b = Visual::new(Geometry::text("b", 48.0));
    assert_ne!(a.id(), b.id());

    let alias = a.clone();
    alias.shift(Vec2::new(1.0, 0.0));
    assert!(alias.ptr_eq(&a));
    assert_eq!(a.revision(), 1);
    assert!(near(a.center().unwrap(), Point::new(1.0, 0.0)));
}

#[test]
fn morph_keeps_prior_center_and_identity() {
    let v = Visual::new(Geometry::text("short", 48.0));
    v.move_to(Point::new(2.0, -2.0)).unwrap();
    let id = v.id();

    v.morph_into(Geometry::text("a much longer label", 48.0));
    assert_eq!(v.id(), id);
    assert_eq!(v.revision(), 2);
    assert!(near(v.center().unwrap(), Point::new(2.0, -2.0)));
}

#[test]
fn morph_from_empty_takes_new_geometry_verbatim() {
    let v = Visual::new(Geometry::empty());
    let g = Geometry::line(Point::new(1.0, 1.0), Point::new(3.0, 1.0));
    v.morph_into(g.clone());
    assert_eq!(v.geometry(), g);
}

#[test]
fn align_to_matches_requested_edge() {
    let chair = Visual::new(Geometry::text("chair", 48.0));
    chair.shift(Vec2::new(-2.0, -2.0));
    let person = Visual::new(Geometry::text("person", 48.0));

    person.align_to(&chair, Direction::UP).unwrap();
    assert!(near(
        person.boundary_point(Direction::UP).unwrap(),
        chair.boundary_point(Direction::UP).unwrap()
    ));
}

#[test]
fn weak_reference_does_not_keep_visual_alive() {
    let v = Visual::new(Geometry::text("gone", 48.0));
    let r = v.downgrade();
    assert_eq!(r.upgrade().unwrap().id(), v.id());
    drop(v);
    assert!(matches!(r.upgrade(), Err(TableauError::Scene(_))));
}
