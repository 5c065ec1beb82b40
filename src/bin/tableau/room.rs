//! Demo scene: a person moving between two chairs while a lamp shines on them.

use tableau::{
    Behavior, Direction, Entity, EntityCx, EntityMap, FrameConfig, Geometry, Placement, Script,
    TableauError, TableauResult, Vec2, Visual, VisualRef,
};

pub const CHAIR_1: &str = "chair 1";
pub const CHAIR_2: &str = "chair 2";
pub const LAMP: &str = "lamp";
pub const PERSON: &str = "person";
pub const RAY: &str = "ray";

const LABEL_FONT_SIZE: f64 = 48.0;
/// Height the person floats above the top edge of a chair.
const SEAT_OFFSET: f64 = 0.5;

/// "This chair is now the active one."
#[derive(Clone)]
pub struct RoomEvent {
    pub active_chair: String,
    chair: VisualRef,
}

impl std::fmt::Debug for RoomEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomEvent")
            .field("active_chair", &self.active_chair)
            .finish()
    }
}

/// A labelled object with no behavior of its own.
pub struct Object {
    label: String,
}

impl Object {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Behavior<RoomEvent> for Object {
    fn handle(&mut self, _: &RoomEvent, _: &mut EntityCx<'_, RoomEvent>) -> TableauResult<bool> {
        Ok(false)
    }

    fn render(&self) -> TableauResult<Geometry> {
        Ok(Geometry::text(&self.label, LABEL_FONT_SIZE))
    }
}

/// Sits on whichever chair the event names.
pub struct Person {
    seated_on: Option<String>,
}

impl Behavior<RoomEvent> for Person {
    fn handle(
        &mut self,
        event: &RoomEvent,
        cx: &mut EntityCx<'_, RoomEvent>,
    ) -> TableauResult<bool> {
        let chair = event.chair.upgrade()?;
        cx.visual().align_to(&chair, Direction::UP)?;
        cx.visual().shift(Direction::UP.times(SEAT_OFFSET));
        let moved = self.seated_on.as_deref() != Some(event.active_chair.as_str());
        self.seated_on = Some(event.active_chair.clone());
        Ok(moved)
    }

    fn render(&self) -> TableauResult<Geometry> {
        Ok(Geometry::text(PERSON, LABEL_FONT_SIZE))
    }
}

/// Line from the bottom of the lamp to the top of what it lights.
pub struct Ray {
    start: VisualRef,
    end: VisualRef,
}

impl Behavior<RoomEvent> for Ray {
    fn handle(&mut self, _: &RoomEvent, _: &mut EntityCx<'_, RoomEvent>) -> TableauResult<bool> {
        Ok(false)
    }

    fn render(&self) -> TableauResult<Geometry> {
        Ok(Geometry::line(
            self.start.upgrade()?.boundary_point(Direction::DOWN)?,
            self.end.upgrade()?.boundary_point(Direction::UP)?,
        ))
    }

    fn placement(&self) -> Placement {
        Placement::Absolute
    }
}

/// Shines on its target every event and explains why.
pub struct Lamp {
    target: VisualRef,
    target_name: String,
}

impl Behavior<RoomEvent> for Lamp {
    fn handle(&mut self, _: &RoomEvent, cx: &mut EntityCx<'_, RoomEvent>) -> TableauResult<bool> {
        let target = self.target.upgrade()?;
        if !cx.has_child(RAY) {
            let ray = Ray {
                start: cx.visual().downgrade(),
                end: self.target.clone(),
            };
            cx.add_child(Entity::new(RAY, ray)?);
        }
        cx.explain_on(
            &target,
            format!(
                "The lamp is shining on {}, because the direction of the lamp intersects \
                 with its location. This is roughly how lamps work.",
                self.target_name
            ),
        );
        Ok(true)
    }

    fn render(&self) -> TableauResult<Geometry> {
        Ok(Geometry::text(LAMP, LABEL_FONT_SIZE))
    }
}

/// Two chairs, a person and a lamp; events alternate the active chair.
pub struct RoomScript {
    event_count: usize,
    frame: FrameConfig,
    chairs: Vec<(String, VisualRef)>,
}

impl RoomScript {
    pub fn new(event_count: usize, frame: FrameConfig) -> Self {
        Self {
            event_count,
            frame,
            chairs: Vec::new(),
        }
    }

    /// Name of the chair that is active for event `index`.
    pub fn active_chair(index: usize) -> &'static str {
        if index % 2 == 1 { CHAIR_1 } else { CHAIR_2 }
    }
}

impl Script for RoomScript {
    type Event = RoomEvent;

    fn init(&mut self, roots: &mut EntityMap<RoomEvent>) -> TableauResult<()> {
        let chair1 = Entity::new(CHAIR_1, Object::new(CHAIR_1))?;
        let chair2 = Entity::new(CHAIR_2, Object::new(CHAIR_2))?;
        let person = Entity::new(PERSON, Person { seated_on: None })?;
        let lamp = Entity::new(
            LAMP,
            Lamp {
                target: person.visual().downgrade(),
                target_name: PERSON.to_owned(),
            },
        )?;

        chair1.visual().shift(Direction::DL.times(2.0));
        chair2.visual().shift(Direction::DR.times(2.0));
        pin_to_top(lamp.visual(), &self.frame)?;

        self.chairs = vec![
            (CHAIR_1.to_owned(), chair1.visual().downgrade()),
            (CHAIR_2.to_owned(), chair2.visual().downgrade()),
        ];

        // The person moves before the lamp handles the same event, so the lamp's
        // explanation and ray see the person's new seat.
        for entity in [chair1, chair2, person, lamp] {
            roots.insert(entity);
        }
        Ok(())
    }

    fn events(&mut self) -> impl Iterator<Item = RoomEvent> {
        let chairs = self.chairs.clone();
        (0..self.event_count).filter_map(move |i| {
            let name = Self::active_chair(i);
            chairs
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, chair)| RoomEvent {
                    active_chair: name.to_owned(),
                    chair: chair.clone(),
                })
        })
    }
}

fn pin_to_top(visual: &Visual, frame: &FrameConfig) -> TableauResult<()> {
    let bounds = visual.bounds()?;
    let top = frame.height / 2.0 - frame.edge_buff;
    if bounds.height() > 2.0 * top {
        return Err(TableauError::geometry("visual is taller than the frame"));
    }
    visual.shift(Vec2::new(0.0, top - bounds.y1));
    Ok(())
}

#[cfg(test)]
#[path = "../../../tests/unit/room.rs"]
mod tests;
