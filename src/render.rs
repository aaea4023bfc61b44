//! Simulation renderer - resolves a schematic into viewport draw commands
//!
//! The renderer is stateless: every call takes the model's [`Geometry`]
//! and the externally supplied animation time, resolves the animated
//! elements for that instant and maps the logical 800 × 500 canvas onto
//! the host viewport (uniform scale, letterboxed). Draw order is the
//! geometry's element order.

use serde::Serialize;

use crate::apparatus::Evaluation;
use crate::geometry::{Animated, Element, Geometry, Point, Primitive, Size, Stroke, TextStyle};
use crate::quantity::Fields;

/// A primitive in viewport coordinates, ready for the host's 2D surface.
pub type DrawCommand = Primitive;

/// Uniform scale + offset from logical canvas to viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    scale: f64,
    offset: Point,
}

impl Viewport {
    /// Fit the logical canvas into a viewport of `size`, centered.
    #[must_use]
    pub fn fit(size: Size) -> Self {
        let canvas = Size::CANVAS;
        let scale = (size.width / canvas.width).min(size.height / canvas.height);
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        Self {
            scale,
            offset: Point::new(
                (size.width - canvas.width * scale) / 2.0,
                (size.height - canvas.height * scale) / 2.0,
            ),
        }
    }

    /// Identity mapping (viewport equals the logical canvas).
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            scale: 1.0,
            offset: Point::new(0.0, 0.0),
        }
    }

    /// Scale factor applied to lengths.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Map a logical point to viewport coordinates.
    #[must_use]
    pub fn map(&self, p: Point) -> Point {
        Point::new(
            p.x.mul_add(self.scale, self.offset.x),
            p.y.mul_add(self.scale, self.offset.y),
        )
    }

    fn stroke(&self, s: Stroke) -> Stroke {
        Stroke {
            color: s.color,
            width: s.width * self.scale,
            dash: s.dash.map(|[d, g]| [d * self.scale, g * self.scale]),
        }
    }

    fn text_style(&self, s: TextStyle) -> TextStyle {
        TextStyle {
            size: s.size * self.scale,
            ..s
        }
    }

    /// Map a primitive into viewport space.
    #[must_use]
    pub fn apply(&self, primitive: &Primitive) -> DrawCommand {
        let k = self.scale;
        match primitive {
            Primitive::Line { from, to, stroke } => Primitive::Line {
                from: self.map(*from),
                to: self.map(*to),
                stroke: self.stroke(*stroke),
            },
            Primitive::Polyline { points, stroke } => Primitive::Polyline {
                points: points.iter().map(|p| self.map(*p)).collect(),
                stroke: self.stroke(*stroke),
            },
            Primitive::Rect {
                origin,
                size,
                fill,
                stroke,
                radius,
            } => Primitive::Rect {
                origin: self.map(*origin),
                size: Size::new(size.width * k, size.height * k),
                fill: *fill,
                stroke: stroke.map(|s| self.stroke(s)),
                radius: radius * k,
            },
            Primitive::Circle {
                center,
                radius,
                fill,
                stroke,
                glow,
            } => Primitive::Circle {
                center: self.map(*center),
                radius: radius * k,
                fill: *fill,
                stroke: stroke.map(|s| self.stroke(s)),
                glow: glow.map(|(c, blur)| (c, blur * k)),
            },
            Primitive::Ellipse {
                center,
                rx,
                ry,
                stroke,
            } => Primitive::Ellipse {
                center: self.map(*center),
                rx: rx * k,
                ry: ry * k,
                stroke: self.stroke(*stroke),
            },
            Primitive::Triangle { points, fill } => Primitive::Triangle {
                points: points.map(|p| self.map(p)),
                fill: *fill,
            },
            Primitive::Text {
                position,
                content,
                style,
            } => Primitive::Text {
                position: self.map(*position),
                content: content.clone(),
                style: self.text_style(*style),
            },
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::identity()
    }
}

/// One rendered frame: draw commands plus the quantities to display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Animation time the frame was resolved at (s).
    pub time: f64,
    /// Commands in draw order.
    pub commands: Vec<DrawCommand>,
    /// Derived quantities from the model, passed through untouched.
    pub derived: Fields,
}

/// Stateless schematic renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Renderer {
    viewport: Viewport,
}

impl Renderer {
    /// Renderer targeting a viewport of the given size.
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport: Viewport::fit(viewport),
        }
    }

    /// The active coordinate mapping.
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Resolve a schematic at animation time `t` (seconds).
    #[must_use]
    pub fn render(&self, geometry: &Geometry, t: f64) -> Vec<DrawCommand> {
        let mut commands = Vec::with_capacity(geometry.len());
        for element in geometry.elements() {
            match element {
                Element::Static(p) => commands.push(self.viewport.apply(p)),
                Element::Animated(a) => {
                    for p in resolve(a, t) {
                        commands.push(self.viewport.apply(&p));
                    }
                }
            }
        }
        commands
    }

    /// Render an evaluation into a frame carrying its derived quantities.
    #[must_use]
    pub fn frame(&self, evaluation: &Evaluation, t: f64) -> Frame {
        Frame {
            time: t,
            commands: self.render(&evaluation.geometry, t),
            derived: evaluation.derived.clone(),
        }
    }
}

/// Concrete primitives for an animated element at time `t`, in logical space.
fn resolve(animated: &Animated, t: f64) -> Vec<Primitive> {
    match animated {
        Animated::Needle {
            pivot,
            length,
            stroke,
        } => {
            let angle = Animated::needle_angle(t);
            let tip = Point::new(
                length.mul_add(angle.cos(), pivot.x),
                length.mul_add(angle.sin(), pivot.y),
            );
            vec![Primitive::Line {
                from: *pivot,
                to: tip,
                stroke: *stroke,
            }]
        }
        Animated::Oscillator {
            parts,
            amplitude,
            period,
        } => {
            debug_assert!(*period > 0.0, "oscillator period must be positive");
            let dx = Animated::phase(t, *period) * amplitude;
            parts.iter().map(|p| translate(p, dx, 0.0)).collect()
        }
        Animated::Arrow {
            tail,
            scale,
            period,
            stroke,
        } => {
            debug_assert!(*period > 0.0, "arrow period must be positive");
            let len = Animated::phase(t, *period) * scale;
            let tip = Point::new(tail.x + len, tail.y);
            let mut out = vec![Primitive::Line {
                from: *tail,
                to: tip,
                stroke: *stroke,
            }];
            if len.abs() > 5.0 {
                let back = tip.x - len.signum() * 10.0;
                out.push(Primitive::Triangle {
                    points: [
                        tip,
                        Point::new(back, tip.y - 6.0),
                        Point::new(back, tip.y + 6.0),
                    ],
                    fill: stroke.color,
                });
            }
            out
        }
    }
}

fn translate(primitive: &Primitive, dx: f64, dy: f64) -> Primitive {
    let shift = |p: Point| Point::new(p.x + dx, p.y + dy);
    let mut moved = primitive.clone();
    match &mut moved {
        Primitive::Line { from, to, .. } => {
            *from = shift(*from);
            *to = shift(*to);
        }
        Primitive::Polyline { points, .. } => {
            for p in points.iter_mut() {
                *p = shift(*p);
            }
        }
        Primitive::Rect { origin, .. } => *origin = shift(*origin),
        Primitive::Circle { center, .. } | Primitive::Ellipse { center, .. } => {
            *center = shift(*center);
        }
        Primitive::Triangle { points, .. } => *points = points.map(shift),
        Primitive::Text { position, .. } => *position = shift(*position),
    }
    moved
}
