use std::fmt;

use crate::foundation::core::{Point, Rgba8, Vec2};
use crate::geometry::shape::{LINE_SPACING, Primitive, Shape, Style, UNITS_PER_POINT};
use crate::scene::config::FrameConfig;
use crate::scene::snapshot::Snapshot;

/// Options for [`snapshot_to_svg`].
#[derive(Clone, Debug)]
pub struct SvgOpts {
    /// Output pixels per scene unit.
    pub px_per_unit: f64,
    pub background: Rgba8,
}

impl Default for SvgOpts {
    fn default() -> Self {
        Self {
            px_per_unit: 60.0,
            background: Rgba8::BLACK,
        }
    }
}

/// Render every visual of `snapshot` into a standalone SVG document.
///
/// Scene space is y-up with the origin at the frame center; SVG space is y-down with the origin
/// at the top-left corner.
pub fn snapshot_to_svg(snapshot: &Snapshot, frame: &FrameConfig, opts: &SvgOpts) -> String {
    SvgDocument {
        snapshot,
        frame,
        opts,
    }
    .to_string()
}

struct SvgDocument<'a> {
    snapshot: &'a Snapshot,
    frame: &'a FrameConfig,
    opts: &'a SvgOpts,
}

impl SvgDocument<'_> {
    fn px_size(&self) -> (f64, f64) {
        let s = self.opts.px_per_unit;
        (self.frame.width * s, self.frame.height * s)
    }

    fn map(&self, p: Point) -> (f64, f64) {
        let s = self.opts.px_per_unit;
        let (w, h) = self.px_size();
        (p.x * s + w / 2.0, h / 2.0 - p.y * s)
    }

    fn write_primitive(&self, f: &mut fmt::Formatter<'_>, prim: &Primitive) -> fmt::Result {
        let s = self.opts.px_per_unit;
        let paint = paint_attrs(&prim.style, s);
        match &prim.shape {
            Shape::Text {
                center,
                lines,
                font_size,
                font_family,
            } => {
                let line_h = font_size * UNITS_PER_POINT;
                let spacing = lines.len().saturating_sub(1) as f64 * LINE_SPACING;
                let block_h = line_h * (1.0 + spacing);
                let family = escape(font_family.as_deref().unwrap_or("sans-serif"));
                for (i, line) in lines.iter().enumerate() {
                    // Block top to the baseline of line i.
                    let from_top = line_h * (0.8 + i as f64 * LINE_SPACING);
                    let baseline = center.y + block_h / 2.0 - from_top;
                    let (x, y) = self.map(Point::new(center.x, baseline));
                    writeln!(
                        f,
                        r#"    <text x="{x:.2}" y="{y:.2}" font-size="{:.2}" font-family="{family}" text-anchor="middle" {paint}>{}</text>"#,
                        line_h * s,
                        escape(line)
                    )?;
                }
            }
            Shape::Line { from, to } => {
                let ((x1, y1), (x2, y2)) = (self.map(*from), self.map(*to));
                writeln!(
                    f,
                    r#"    <line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" {paint}/>"#
                )?;
            }
            Shape::Arrow {
                from,
                to,
                tip_length,
            } => {
                let ((x1, y1), (x2, y2)) = (self.map(*from), self.map(*to));
                writeln!(
                    f,
                    r#"    <line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" {paint}/>"#
                )?;
                let dir = *to - *from;
                let len = dir.hypot();
                if len > 0.0 && *tip_length > 0.0 {
                    let back = dir * (tip_length / len);
                    let side = Vec2::new(-back.y, back.x) * 0.5;
                    let (ax, ay) = self.map(*to - back + side);
                    let (bx, by) = self.map(*to - back - side);
                    let fill = prim.style.stroke.unwrap_or(Rgba8::WHITE).to_hex();
                    writeln!(
                        f,
                        r#"    <polygon points="{x2:.2},{y2:.2} {ax:.2},{ay:.2} {bx:.2},{by:.2}" fill="{fill}"/>"#
                    )?;
                }
            }
            Shape::Box {
                rect,
                corner_radius,
            } => {
                let (x, y) = self.map(Point::new(rect.x0, rect.y1));
                writeln!(
                    f,
                    r#"    <rect x="{x:.2}" y="{y:.2}" width="{:.2}" height="{:.2}" rx="{:.2}" {paint}/>"#,
                    rect.width() * s,
                    rect.height() * s,
                    corner_radius * s
                )?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for SvgDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (w, h) = self.px_size();
        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.2} {h:.2}">"#
        )?;
        writeln!(
            f,
            r#"  <rect width="100%" height="100%" fill="{}"/>"#,
            self.opts.background.to_hex()
        )?;

        for entry in &self.snapshot.entries {
            writeln!(
                f,
                r#"  <g id="{}" data-path="{}">"#,
                entry.visual,
                escape(&entry.path)
            )?;
            for prim in &entry.geometry.primitives {
                self.write_primitive(f, prim)?;
            }
            f.write_str("  </g>\n")?;
        }
        f.write_str("</svg>\n")
    }
}

fn paint_attrs(style: &Style, s: f64) -> String {
    let fill = match style.fill {
        Some(c) => format!(r#"fill="{}" fill-opacity="{:.3}""#, c.to_hex(), c.alpha_f64()),
        None => r#"fill="none""#.to_owned(),
    };
    match style.stroke {
        Some(c) => format!(
            r#"{fill} stroke="{}" stroke-opacity="{:.3}" stroke-width="{:.2}""#,
            c.to_hex(),
            c.alpha_f64(),
            style.stroke_width * s
        ),
        None => fill,
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
