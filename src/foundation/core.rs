use crate::foundation::error::{TableauError, TableauResult};

pub use kurbo::{Point, Rect, Vec2};

/// Compass direction in scene space (x right, y up), components in `{-1, 0, 1}`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Direction(pub Vec2);

impl Direction {
    pub const ORIGIN: Self = Self(Vec2::new(0.0, 0.0));
    pub const UP: Self = Self(Vec2::new(0.0, 1.0));
    pub const DOWN: Self = Self(Vec2::new(0.0, -1.0));
    pub const LEFT: Self = Self(Vec2::new(-1.0, 0.0));
    pub const RIGHT: Self = Self(Vec2::new(1.0, 0.0));
    pub const UL: Self = Self(Vec2::new(-1.0, 1.0));
    pub const UR: Self = Self(Vec2::new(1.0, 1.0));
    pub const DL: Self = Self(Vec2::new(-1.0, -1.0));
    pub const DR: Self = Self(Vec2::new(1.0, -1.0));

    /// Offset of `scale` units in this direction.
    pub fn times(self, scale: f64) -> Vec2 {
        self.0 * scale
    }

    /// Point of `rect` that lies furthest in this direction (corner, edge midpoint or center).
    pub fn critical_point(self, rect: Rect) -> Point {
        let c = rect.center();
        Point::new(
            c.x + self.0.x.signum_or_zero() * rect.width() / 2.0,
            c.y + self.0.y.signum_or_zero() * rect.height() / 2.0,
        )
    }
}

trait SignumOrZero {
    fn signum_or_zero(self) -> f64;
}

impl SignumOrZero for f64 {
    fn signum_or_zero(self) -> f64 {
        if self == 0.0 { 0.0 } else { self.signum() }
    }
}

/// Straight (non-premultiplied) RGBA8 color, serialized as `#RRGGBB` or `#RRGGBBAA`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    pub const BLACK: Self = Self::opaque(0, 0, 0);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(s: &str) -> TableauResult<Self> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| TableauError::config(format!("color '{s}' must start with '#'")))?;
        if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
            return Err(TableauError::config(format!(
                "color '{s}' must be #RRGGBB or #RRGGBBAA"
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| TableauError::config(format!("color '{s}' has invalid hex digits")))
        };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if hex.len() == 8 { channel(6)? } else { 255 },
        })
    }

    /// `#rrggbb`, alpha dropped.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn alpha_f64(self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

impl TryFrom<String> for Rgba8 {
    type Error = TableauError;

    fn try_from(value: String) -> TableauResult<Self> {
        Self::from_hex(&value)
    }
}

impl From<Rgba8> for String {
    fn from(c: Rgba8) -> Self {
        if c.a == 255 {
            c.to_hex()
        } else {
            format!("{}{:02x}", c.to_hex(), c.a)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
