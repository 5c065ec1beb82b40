use crate::foundation::core::{Direction, Point, Rect, Rgba8, Vec2};
use crate::foundation::error::{TableauError, TableauResult};

/// Scene units per font point; a 48pt line is half a unit tall.
pub const UNITS_PER_POINT: f64 = 1.0 / 96.0;
/// Average glyph advance as a fraction of the line height.
pub const GLYPH_ADVANCE: f64 = 0.55;
/// Line pitch as a multiple of the line height.
pub const LINE_SPACING: f64 = 1.2;

/// Stroke/fill styling for one primitive.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Style {
    pub stroke: Option<Rgba8>,
    pub fill: Option<Rgba8>,
    pub stroke_width: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke: Some(Rgba8::WHITE),
            fill: None,
            stroke_width: 0.04,
        }
    }
}

impl Style {
    pub fn filled(color: Rgba8) -> Self {
        Self {
            stroke: Some(color),
            fill: Some(color),
            ..Self::default()
        }
    }

    pub fn stroked(color: Rgba8) -> Self {
        Self {
            stroke: Some(color),
            ..Self::default()
        }
    }
}

/// Drawable shape in scene coordinates (x right, y up).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Shape {
    /// Block of pre-wrapped lines centered on `center`.
    Text {
        center: Point,
        lines: Vec<String>,
        font_size: f64,
        font_family: Option<String>,
    },
    Line {
        from: Point,
        to: Point,
    },
    Arrow {
        from: Point,
        to: Point,
        tip_length: f64,
    },
    Box {
        rect: Rect,
        corner_radius: f64,
    },
}

impl Shape {
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Text {
                center,
                lines,
                font_size,
                ..
            } => {
                let (w, h) = text_extent(lines, *font_size);
                Rect::from_center_size(*center, (w, h))
            }
            Self::Line { from, to } | Self::Arrow { from, to, .. } => {
                Rect::from_points(*from, *to)
            }
            Self::Box { rect, .. } => *rect,
        }
    }

    pub fn translate(&mut self, by: Vec2) {
        match self {
            Self::Text { center, .. } => *center += by,
            Self::Line { from, to } | Self::Arrow { from, to, .. } => {
                *from += by;
                *to += by;
            }
            Self::Box { rect, .. } => *rect = *rect + by,
        }
    }
}

/// Width and height of a text block in scene units.
pub fn text_extent(lines: &[String], font_size: f64) -> (f64, f64) {
    let line_height = font_size * UNITS_PER_POINT;
    let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let w = widest as f64 * line_height * GLYPH_ADVANCE;
    let h = if lines.is_empty() {
        0.0
    } else {
        line_height * (1.0 + (lines.len() - 1) as f64 * LINE_SPACING)
    };
    (w, h)
}

/// Greedy word wrap to at most `max_chars` per line. Words longer than a line are kept whole.
pub fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Primitive {
    pub shape: Shape,
    pub style: Style,
}

/// Geometry produced by a render call: an ordered group of styled primitives.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Geometry {
    pub primitives: Vec<Primitive>,
}

impl Geometry {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(shape: Shape, style: Style) -> Self {
        Self {
            primitives: vec![Primitive { shape, style }],
        }
    }

    /// Single-line text centered at the origin.
    pub fn text(content: impl Into<String>, font_size: f64) -> Self {
        Self::single(
            Shape::Text {
                center: Point::ORIGIN,
                lines: vec![content.into()],
                font_size,
                font_family: None,
            },
            Style {
                stroke: None,
                fill: Some(Rgba8::WHITE),
                stroke_width: 0.0,
            },
        )
    }

    pub fn line(from: Point, to: Point) -> Self {
        Self::single(Shape::Line { from, to }, Style::default())
    }

    pub fn arrow(from: Point, to: Point, tip_length: f64, color: Rgba8) -> Self {
        Self::single(
            Shape::Arrow {
                from,
                to,
                tip_length,
            },
            Style::stroked(color),
        )
    }

    /// Rounded box around `inner` with `buff` padding on every side.
    pub fn surrounding_box(
        inner: &Geometry,
        buff: f64,
        corner_radius: f64,
        style: Style,
    ) -> TableauResult<Self> {
        let rect = inner.bounds()?.inflate(buff, buff);
        Ok(Self::single(
            Shape::Box {
                rect,
                corner_radius,
            },
            style,
        ))
    }

    /// Append `other` on top of `self` (later primitives draw last).
    pub fn with(mut self, other: Geometry) -> Self {
        self.primitives.extend(other.primitives);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn bounds(&self) -> TableauResult<Rect> {
        self.primitives
            .iter()
            .map(|p| p.shape.bounds())
            .reduce(|a, b| a.union(b))
            .ok_or_else(|| TableauError::geometry("empty geometry has no bounds"))
    }

    pub fn center(&self) -> TableauResult<Point> {
        Ok(self.bounds()?.center())
    }

    pub fn boundary_point(&self, dir: Direction) -> TableauResult<Point> {
        Ok(dir.critical_point(self.bounds()?))
    }

    pub fn shift(mut self, by: Vec2) -> Self {
        self.shift_in_place(by);
        self
    }

    pub(crate) fn shift_in_place(&mut self, by: Vec2) {
        for p in &mut self.primitives {
            p.shape.translate(by);
        }
    }

    /// Move so the bounds center lands on `point`. Empty geometry is returned unchanged.
    pub fn move_to(self, point: Point) -> Self {
        match self.center() {
            Ok(c) => self.shift(point - c),
            Err(_) => self,
        }
    }

    /// Push into the `corner` of `frame`, keeping `buff` distance from its edges.
    pub fn to_corner(self, corner: Direction, frame: Rect, buff: f64) -> TableauResult<Self> {
        let bounds = self.bounds()?;
        let target = corner.critical_point(frame.inflate(-buff, -buff));
        let current = corner.critical_point(bounds);
        Ok(self.shift(target - current))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/shape.rs"]
mod tests;
