use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::foundation::core::{Direction, Point, Rect, Vec2};
use crate::foundation::error::{TableauError, TableauResult};
use crate::geometry::shape::Geometry;

thread_local! {
    static NEXT_VISUAL_ID: Cell<u64> = const { Cell::new(1) };
}

/// Identity of a [`Visual`], assigned at creation and never reused within a thread.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct VisualId(pub u64);

impl fmt::Display for VisualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[derive(Debug)]
struct VisualCell {
    id: VisualId,
    geometry: Geometry,
    revision: u64,
}

/// Shared, in-place mutable handle to on-screen geometry.
///
/// Clones alias the same handle. Every mutation bumps [`Visual::revision`]; the
/// [`Visual::id`] never changes, so holders of a clone keep observing the live geometry.
#[derive(Clone)]
pub struct Visual(Rc<RefCell<VisualCell>>);

impl Visual {
    pub fn new(geometry: Geometry) -> Self {
        let id = NEXT_VISUAL_ID.with(|next| {
            let id = next.get();
            next.set(id + 1);
            VisualId(id)
        });
        Self(Rc::new(RefCell::new(VisualCell {
            id,
            geometry,
            revision: 0,
        })))
    }

    pub fn id(&self) -> VisualId {
        self.0.borrow().id
    }

    /// Number of in-place mutations since creation.
    pub fn revision(&self) -> u64 {
        self.0.borrow().revision
    }

    /// Snapshot of the current geometry.
    pub fn geometry(&self) -> Geometry {
        self.0.borrow().geometry.clone()
    }

    pub fn bounds(&self) -> TableauResult<Rect> {
        self.0.borrow().geometry.bounds()
    }

    pub fn center(&self) -> TableauResult<Point> {
        self.0.borrow().geometry.center()
    }

    pub fn boundary_point(&self, dir: Direction) -> TableauResult<Point> {
        self.0.borrow().geometry.boundary_point(dir)
    }

    /// Replace the geometry in place, anchored at the current center.
    ///
    /// If either side is empty the new geometry is taken as-is.
    pub fn morph_into(&self, geometry: Geometry) {
        let mut cell = self.0.borrow_mut();
        let geometry = match cell.geometry.center() {
            Ok(anchor) => geometry.move_to(anchor),
            Err(_) => geometry,
        };
        cell.geometry = geometry;
        cell.revision += 1;
    }

    /// Replace the geometry in place, keeping its rendered coordinates.
    pub fn replace(&self, geometry: Geometry) {
        let mut cell = self.0.borrow_mut();
        cell.geometry = geometry;
        cell.revision += 1;
    }

    pub fn shift(&self, by: Vec2) {
        let mut cell = self.0.borrow_mut();
        cell.geometry.shift_in_place(by);
        cell.revision += 1;
    }

    pub fn move_to(&self, point: Point) -> TableauResult<()> {
        let center = self.center()?;
        self.shift(point - center);
        Ok(())
    }

    /// Move so this visual's `edge` boundary point coincides with the same boundary point of
    /// `other`. With [`Direction::ORIGIN`] the centers are aligned.
    pub fn align_to(&self, other: &Visual, edge: Direction) -> TableauResult<()> {
        let target = other.boundary_point(edge)?;
        let current = self.boundary_point(edge)?;
        self.shift(target - current);
        Ok(())
    }

    /// Non-owning reference to this handle.
    pub fn downgrade(&self) -> VisualRef {
        VisualRef(Rc::downgrade(&self.0))
    }

    pub fn ptr_eq(&self, other: &Visual) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Visual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell = self.0.borrow();
        f.debug_struct("Visual")
            .field("id", &cell.id)
            .field("revision", &cell.revision)
            .field("primitives", &cell.geometry.primitives.len())
            .finish()
    }
}

/// Weak counterpart of [`Visual`]; does not keep the target alive.
#[derive(Clone)]
pub struct VisualRef(Weak<RefCell<VisualCell>>);

impl VisualRef {
    pub fn upgrade(&self) -> TableauResult<Visual> {
        self.0
            .upgrade()
            .map(Visual)
            .ok_or_else(|| TableauError::scene("visual reference outlived its entity"))
    }
}

impl fmt::Debug for VisualRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.upgrade() {
            Some(cell) => write!(f, "VisualRef({})", cell.borrow().id),
            None => f.write_str("VisualRef(<dropped>)"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/visual.rs"]
mod tests;
