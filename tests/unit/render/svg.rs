use super::*;
use crate::foundation::core::Rect;
use crate::geometry::shape::Geometry;
use crate::geometry::visual::VisualId;
use crate::scene::snapshot::SnapshotEntry;

fn entry(path: &str, id: u64, geometry: Geometry) -> SnapshotEntry {
    SnapshotEntry {
        path: path.to_owned(),
        visual: VisualId(id),
        geometry,
    }
}

#[test]
fn every_entry_becomes_a_group() {
    let snap = Snapshot {
        pass: 0,
        entries: vec![
            entry("chair <1>", 1, Geometry::text("chair & co", 48.0)),
            entry(
                "lamp/ray",
                2,
                Geometry::line(Point::new(0.0, 3.0), Point::new(0.0, -1.0)),
            ),
        ],
    };
    let svg = snapshot_to_svg(&snap, &FrameConfig::default(), &SvgOpts::default());
    assert!(svg.starts_with("<svg "));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert_eq!(svg.matches("<g ").count(), 2);
    assert!(svg.contains(r#"data-path="chair &lt;1&gt;""#));
    assert!(svg.contains("chair &amp; co"));
    assert!(svg.contains(r#"id="v2""#));
}

#[test]
fn coordinates_flip_to_svg_space() {
    let frame = FrameConfig {
        width: 10.0,
        height: 8.0,
        edge_buff: 0.5,
    };
    let opts = SvgOpts {
        px_per_unit: 10.0,
        ..SvgOpts::default()
    };
    let snap = Snapshot {
        pass: 0,
        entries: vec![entry(
            "box",
            3,
            Geometry::single(
                Shape::Box {
                    rect: Rect::new(-5.0, 3.0, -4.0, 4.0),
                    corner_radius: 0.0,
                },
                Style::default(),
            ),
        )],
    };
    let svg = snapshot_to_svg(&snap, &frame, &opts);
    assert!(svg.contains(r#"width="100" height="80""#));
    assert!(svg.contains(r#"<rect x="0.00" y="0.00" width="10.00" height="10.00""#));
}

#[test]
fn arrows_get_a_tip() {
    let snap = Snapshot {
        pass: 0,
        entries: vec![entry(
            "note",
            4,
            Geometry::arrow(Point::new(0.0, 0.0), Point::new(2.0, 0.0), 0.2, Rgba8::WHITE),
        )],
    };
    let svg = snapshot_to_svg(&snap, &FrameConfig::default(), &SvgOpts::default());
    assert_eq!(svg.matches("<polygon").count(), 1);
}
