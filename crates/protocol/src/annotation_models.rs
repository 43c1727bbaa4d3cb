//! Image annotation models.
//!
//! Geometry lives in canvas pixel space: the origin is the top-left corner of
//! the annotation canvas and coordinates grow right and down. Nothing here is
//! clamped to the canvas, so a box may sit partly outside it.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A pointer position in canvas pixel space.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, TS)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle with a non-negative extent.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, TS)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle spanning two drag corners.
    ///
    /// The corners may be given in any order; the result always has its
    /// origin at the top-left and a positive width and height.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    /// Whether `p` lies inside the rectangle (edges inclusive).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// Return a copy moved by `(dx, dy)`.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// A labeled bounding box drawn on one image.
///
/// The identifier and label are fixed when the box is created; only the
/// position changes afterwards (when the box is dragged).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct AnnotationBox {
    #[ts(type = "string")]
    pub id: Uuid,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: String,

    /// Display color as a `#RRGGBB` hex string.
    pub color: String,
}

impl AnnotationBox {
    pub fn new(rect: Rect, label: String, color: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            label,
            color,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Move the box so its top-left corner sits at `origin`.
    pub fn move_to(&mut self, origin: Point) {
        self.x = origin.x;
        self.y = origin.y;
    }
}

/// Payload emitted when an image annotation task is submitted.
///
/// `boxes_per_image[i]` holds the boxes drawn on the i-th image, in the order
/// they were added.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnnotationResult {
    pub boxes_per_image: Vec<Vec<AnnotationBox>>,
}
