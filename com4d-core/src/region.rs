//! Mask regions over detector space.
//!
//! Regions are drawn by the user on a detector frame. Their geometry is
//! stored in normalized `(y, x)` coordinates (0..1 along each axis) so the
//! same graphic yields a mask for any frame size.
#![allow(
    clippy::cast_precision_loss,
    clippy::similar_names,
    clippy::many_single_char_names
)]

use std::ops::Range;

use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::util::{clamp_to_axis, f64_to_index, usize_to_f64};

/// Anything that can produce a boolean detector mask.
pub trait MaskRegion: Send + Sync + std::fmt::Debug {
    /// Returns a mask of `shape` (det y, det x); `true` marks pixels inside
    /// the region.
    fn mask(&self, shape: (usize, usize)) -> Array2<bool>;

    /// Serializes the region for reproducibility records.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    fn to_record(&self) -> Result<Value>;
}

/// Normalized `((top, left), (height, width))` bounds.
pub type Bounds = ((f64, f64), (f64, f64));

/// Pass mode of a ring graphic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RingMode {
    /// Pixels between the inner and outer radius.
    #[default]
    BandPass,
    /// Pixels inside the outer radius.
    LowPass,
    /// Pixels outside the inner radius.
    HighPass,
}

/// Geometry of a graphic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GraphicShape {
    Rectangle {
        bounds: Bounds,
    },
    Ellipse {
        bounds: Bounds,
    },
    /// Ring centered on the frame; radii are fractions of the frame height.
    Ring {
        radius_inner: f64,
        radius_outer: f64,
        mode: RingMode,
    },
    Point {
        position: (f64, f64),
    },
    /// Closed polygon through normalized `(y, x)` vertices.
    Polygon {
        vertices: Vec<(f64, f64)>,
    },
}

/// A labelled graphic drawn on a display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graphic {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub shape: GraphicShape,
}

impl Graphic {
    #[must_use]
    pub fn new(shape: GraphicShape) -> Self {
        Self { label: None, shape }
    }

    #[must_use]
    pub fn rectangle(bounds: Bounds) -> Self {
        Self::new(GraphicShape::Rectangle { bounds })
    }

    #[must_use]
    pub fn ellipse(bounds: Bounds) -> Self {
        Self::new(GraphicShape::Ellipse { bounds })
    }

    #[must_use]
    pub fn ring(radius_inner: f64, radius_outer: f64, mode: RingMode) -> Self {
        Self::new(GraphicShape::Ring {
            radius_inner,
            radius_outer,
            mode,
        })
    }

    #[must_use]
    pub fn point(y: f64, x: f64) -> Self {
        Self::new(GraphicShape::Point { position: (y, x) })
    }

    #[must_use]
    pub fn polygon(vertices: Vec<(f64, f64)>) -> Self {
        Self::new(GraphicShape::Polygon { vertices })
    }

    /// Set label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Position of a point graphic.
    #[must_use]
    pub fn position(&self) -> Option<(f64, f64)> {
        match self.shape {
            GraphicShape::Point { position } => Some(position),
            _ => None,
        }
    }
}

impl MaskRegion for Graphic {
    fn mask(&self, shape: (usize, usize)) -> Array2<bool> {
        match &self.shape {
            GraphicShape::Rectangle { bounds } => rectangle_mask(*bounds, shape),
            GraphicShape::Ellipse { bounds } => ellipse_mask(*bounds, shape),
            GraphicShape::Ring {
                radius_inner,
                radius_outer,
                mode,
            } => ring_mask(*radius_inner, *radius_outer, *mode, shape),
            GraphicShape::Point { position } => point_mask(*position, shape),
            GraphicShape::Polygon { vertices } => polygon_mask(vertices, shape),
        }
    }

    fn to_record(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Signed pixel edges `(start, end)` of a normalized span along an axis.
///
/// Edges may lie outside the frame.
fn pixel_span(start: f64, extent: f64, len: usize) -> (f64, f64) {
    let scale = usize_to_f64(len);
    let start = (start * scale).floor();
    (start, start + (extent * scale).floor())
}

/// Pixels of a span that fall inside an axis of `len` pixels.
fn clipped_range((start, end): (f64, f64), len: usize) -> Range<usize> {
    clamp_to_axis(start, len)..clamp_to_axis(end, len)
}

fn rectangle_mask(bounds: Bounds, shape: (usize, usize)) -> Array2<bool> {
    let ((top, left), (h, w)) = bounds;
    let mut mask = Array2::from_elem(shape, false);
    let rows = clipped_range(pixel_span(top, h, shape.0), shape.0);
    let cols = clipped_range(pixel_span(left, w, shape.1), shape.1);
    if !rows.is_empty() && !cols.is_empty() {
        mask.slice_mut(s![rows, cols]).fill(true);
    }
    mask
}

fn ellipse_mask(bounds: Bounds, shape: (usize, usize)) -> Array2<bool> {
    let ((top, left), (h, w)) = bounds;
    let (top, bottom) = pixel_span(top, h, shape.0);
    let (left, right) = pixel_span(left, w, shape.1);
    let a = (bottom - top) / 2.0;
    let b = (right - left) / 2.0;
    // Also rejects NaN extents.
    if !(a > 0.0 && b > 0.0 && a.is_finite() && b.is_finite()) {
        return Array2::from_elem(shape, false);
    }
    let cy = top + a;
    let cx = left + b;
    Array2::from_shape_fn(shape, |(row, col)| {
        let dy = usize_to_f64(row) - cy;
        let dx = usize_to_f64(col) - cx;
        dx * dx / (b * b) + dy * dy / (a * a) <= 1.0
    })
}

fn ring_mask(
    radius_inner: f64,
    radius_outer: f64,
    mode: RingMode,
    shape: (usize, usize),
) -> Array2<bool> {
    let scale = usize_to_f64(shape.0);
    let inner = radius_inner.min(radius_outer) * scale;
    let outer = radius_inner.max(radius_outer) * scale;
    let cy = usize_to_f64(shape.0) / 2.0;
    let cx = usize_to_f64(shape.1) / 2.0;
    Array2::from_shape_fn(shape, |(row, col)| {
        let dy = usize_to_f64(row) - cy;
        let dx = usize_to_f64(col) - cx;
        let distance = (dy * dy + dx * dx).sqrt();
        match mode {
            RingMode::BandPass => distance >= inner && distance <= outer,
            RingMode::LowPass => distance <= outer,
            RingMode::HighPass => distance >= inner,
        }
    })
}

fn point_mask((y, x): (f64, f64), shape: (usize, usize)) -> Array2<bool> {
    let mut mask = Array2::from_elem(shape, false);
    let row = f64_to_index(y * usize_to_f64(shape.0)).filter(|&row| row < shape.0);
    let col = f64_to_index(x * usize_to_f64(shape.1)).filter(|&col| col < shape.1);
    if let (Some(row), Some(col)) = (row, col) {
        mask[[row, col]] = true;
    }
    mask
}

fn polygon_mask(vertices: &[(f64, f64)], shape: (usize, usize)) -> Array2<bool> {
    let height = usize_to_f64(shape.0);
    let width = usize_to_f64(shape.1);
    Array2::from_shape_fn(shape, |(row, col)| {
        let center = (
            (usize_to_f64(row) + 0.5) / height,
            (usize_to_f64(col) + 0.5) / width,
        );
        point_in_polygon(center, vertices)
    })
}

/// Even-odd test of a `(y, x)` point against a closed polygon.
fn point_in_polygon((py, px): (f64, f64), vertices: &[(f64, f64)]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (yi, xi) = vertices[i];
        let (yj, xj) = vertices[j];
        let crosses = ((yi > py) != (yj > py))
            && (px < (xj - xi) * (py - yi) / (yj - yi + f64::EPSILON) + xi);
        if crosses {
            inside = !inside;
        }
        j = i;
    }
    inside
}
