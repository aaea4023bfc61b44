//! Schematic geometry - abstract draw primitives produced by apparatus models
//!
//! Models lay out their schematic on a fixed logical canvas of
//! [`Size::CANVAS`] (800 × 500). The [renderer](crate::render) maps that
//! canvas onto the host viewport and resolves the time-varying
//! [`Animated`] elements; it never sees a physics formula.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// 2D point in logical canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate (left = 0).
    pub x: f64,
    /// Vertical coordinate (top = 0).
    pub y: f64,
}

impl Point {
    /// Construct a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// Logical canvas every apparatus model lays out on.
    pub const CANVAS: Self = Self::new(800.0, 500.0);

    /// Construct a size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Opacity in `[0, 1]`.
    pub a: f32,
}

impl Color {
    /// Opaque colour from a `0xRRGGBB` literal.
    #[must_use]
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
            a: 1.0,
        }
    }

    /// Same colour with a different opacity.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// `#rrggbb` form (opacity dropped).
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Amber (potentiometer wire, coils).
    pub const AMBER: Self = Self::hex(0xf5_9e_0b);
    /// Emerald (first cell, known resistance).
    pub const EMERALD: Self = Self::hex(0x10_b9_81);
    /// Blue (second cell, voltmeter).
    pub const BLUE: Self = Self::hex(0x3b_82_f6);
    /// Purple (rheostat, galvanometer body).
    pub const PURPLE: Self = Self::hex(0x79_28_ca);
    /// Violet (bridge galvanometer).
    pub const VIOLET: Self = Self::hex(0x8b_5c_f6);
    /// Cyan (highlights, headings).
    pub const CYAN: Self = Self::hex(0x00_d4_ff);
    /// Red (needle, north pole, failure verdicts).
    pub const RED: Self = Self::hex(0xef_44_44);
    /// Light slate (labels, bridge wire).
    pub const SLATE: Self = Self::hex(0x94_a3_b8);
    /// Dim slate (scale numbers).
    pub const SLATE_DIM: Self = Self::hex(0x64_74_8b);
    /// Near-white body text.
    pub const TEXT: Self = Self::hex(0xe2_e8_f0);
    /// Pure white.
    pub const WHITE: Self = Self::hex(0xff_ff_ff);
    /// Results panel background.
    pub const PANEL: Self = Self::hex(0x0f_17_2a).with_alpha(0.9);
}

/// Line style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Line colour.
    pub color: Color,
    /// Line width in canvas units.
    pub width: f64,
    /// `[dash, gap]` pattern; `None` draws a solid line.
    pub dash: Option<[f64; 2]>,
}

impl Stroke {
    /// Solid stroke.
    #[must_use]
    pub const fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    /// Dashed stroke.
    #[must_use]
    pub const fn dashed(color: Color, width: f64, dash: f64, gap: f64) -> Self {
        Self {
            color,
            width,
            dash: Some([dash, gap]),
        }
    }
}

/// Centered text style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in canvas units.
    pub size: f64,
    /// Bold weight.
    pub bold: bool,
    /// Fill colour.
    pub color: Color,
}

impl TextStyle {
    /// Regular weight.
    #[must_use]
    pub const fn regular(size: f64, color: Color) -> Self {
        Self {
            size,
            bold: false,
            color,
        }
    }

    /// Bold weight.
    #[must_use]
    pub const fn bold(size: f64, color: Color) -> Self {
        Self {
            size,
            bold: true,
            color,
        }
    }
}

/// Static draw primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    /// Straight segment.
    Line {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
        /// Line style.
        stroke: Stroke,
    },
    /// Open polyline through consecutive points.
    Polyline {
        /// Vertices in drawing order.
        points: Vec<Point>,
        /// Line style.
        stroke: Stroke,
    },
    /// Axis-aligned rectangle, optionally rounded and/or outlined.
    Rect {
        /// Top-left corner.
        origin: Point,
        /// Width/height.
        size: Size,
        /// Fill colour, if filled.
        fill: Option<Color>,
        /// Outline, if stroked.
        stroke: Option<Stroke>,
        /// Corner radius (0 for square corners).
        radius: f64,
    },
    /// Circle, optionally filled, outlined and glowing.
    Circle {
        /// Centre.
        center: Point,
        /// Radius.
        radius: f64,
        /// Fill colour, if filled.
        fill: Option<Color>,
        /// Outline, if stroked.
        stroke: Option<Stroke>,
        /// Shadow blur radius in the glow colour.
        glow: Option<(Color, f64)>,
    },
    /// Outlined ellipse.
    Ellipse {
        /// Centre.
        center: Point,
        /// Horizontal radius.
        rx: f64,
        /// Vertical radius.
        ry: f64,
        /// Outline.
        stroke: Stroke,
    },
    /// Filled triangle (arrow heads).
    Triangle {
        /// Three vertices.
        points: [Point; 3],
        /// Fill colour.
        fill: Color,
    },
    /// Text centered horizontally on `position` (baseline at `position.y`).
    Text {
        /// Anchor.
        position: Point,
        /// Content.
        content: String,
        /// Font and colour.
        style: TextStyle,
    },
}

/// Time-varying schematic element, resolved by the renderer per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Animated {
    /// Meter needle swinging at `angle = -π/2 + sin(1.5·t)·0.4`.
    Needle {
        /// Pivot point.
        pivot: Point,
        /// Needle length.
        length: f64,
        /// Needle style.
        stroke: Stroke,
    },
    /// Group of primitives translated horizontally by `sin(2πt/period)·amplitude`.
    Oscillator {
        /// Primitives at rest position.
        parts: Vec<Primitive>,
        /// Peak horizontal displacement.
        amplitude: f64,
        /// Oscillation period in seconds.
        period: f64,
    },
    /// Horizontal arrow of signed length `sin(2πt/period)·scale`, with a
    /// head once it is longer than 5 units.
    Arrow {
        /// Tail position.
        tail: Point,
        /// Peak length.
        scale: f64,
        /// Oscillation period in seconds.
        period: f64,
        /// Shaft style; the head is filled in the same colour.
        stroke: Stroke,
    },
}

impl Animated {
    /// Needle angle in radians at animation time `t`.
    #[must_use]
    pub fn needle_angle(t: f64) -> f64 {
        -PI / 2.0 + (t * 1.5).sin() * 0.4
    }

    /// Phase factor `sin(2πt/period)` shared by the periodic elements.
    #[must_use]
    pub fn phase(t: f64, period: f64) -> f64 {
        (t * 2.0 * PI / period).sin()
    }
}

/// One entry in a schematic, in draw order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Element {
    /// Time-invariant primitive.
    Static(Primitive),
    /// Time-varying element.
    Animated(Animated),
}

/// Ordered schematic description. Later elements draw over earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    elements: Vec<Element>,
}

impl Geometry {
    /// Empty schematic.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// Elements in draw order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether nothing is drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Whether any element depends on the animation clock.
    #[must_use]
    pub fn is_animated(&self) -> bool {
        self.elements
            .iter()
            .any(|e| matches!(e, Element::Animated(_)))
    }

    /// Append a primitive.
    pub fn push(&mut self, primitive: Primitive) {
        self.elements.push(Element::Static(primitive));
    }

    /// Append an animated element.
    pub fn push_animated(&mut self, animated: Animated) {
        self.elements.push(Element::Animated(animated));
    }

    /// Segment from `from` to `to`.
    pub fn line(&mut self, from: Point, to: Point, stroke: Stroke) {
        self.push(Primitive::Line { from, to, stroke });
    }

    /// Filled rectangle.
    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: Color) {
        self.push(Primitive::Rect {
            origin: Point::new(x, y),
            size: Size::new(w, h),
            fill: Some(fill),
            stroke: None,
            radius: 0.0,
        });
    }

    /// Rounded panel with optional outline.
    pub fn panel(&mut self, x: f64, y: f64, w: f64, h: f64, fill: Color, outline: Option<Stroke>) {
        self.push(Primitive::Rect {
            origin: Point::new(x, y),
            size: Size::new(w, h),
            fill: Some(fill),
            stroke: outline,
            radius: 8.0,
        });
    }

    /// Filled disc.
    pub fn dot(&mut self, center: Point, radius: f64, fill: Color) {
        self.push(Primitive::Circle {
            center,
            radius,
            fill: Some(fill),
            stroke: None,
            glow: None,
        });
    }

    /// Centered text.
    pub fn text(&mut self, x: f64, y: f64, content: impl Into<String>, style: TextStyle) {
        self.push(Primitive::Text {
            position: Point::new(x, y),
            content: content.into(),
            style,
        });
    }

    /// Ruler ticks with labels along a horizontal segment.
    ///
    /// Draws `divisions + 1` ticks from `x1` to `x2` at height `y`, labelled
    /// by `label(i)`.
    pub fn scale(
        &mut self,
        x1: f64,
        x2: f64,
        y: f64,
        divisions: u32,
        tick: f64,
        label: impl Fn(u32) -> String,
    ) {
        let span = x2 - x1;
        for i in 0..=divisions {
            let x = x1 + f64::from(i) / f64::from(divisions) * span;
            self.line(
                Point::new(x, y - tick),
                Point::new(x, y + tick),
                Stroke::solid(Color::SLATE.with_alpha(0.4), 1.0),
            );
            self.text(
                x,
                y + tick + 12.0,
                label(i),
                TextStyle::regular(10.0, Color::SLATE_DIM),
            );
        }
    }
}
