//! Points and rectangles in the discovery coordinate space.
//!
//! All element frames handed to the engines are expected to be in one
//! consistent coordinate space; conversions to and from screen spaces are a
//! presentation concern and live with the host.

use serde::{Deserialize, Serialize};

/// A point in the discovery coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in the discovery coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// A rectangle with no area never intersects anything.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// True iff the two rectangles share a region of positive area.
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.max_x()
            && other.x < self.max_x()
            && self.y < other.max_y()
            && other.y < self.max_y()
    }

    /// The shared region of the two rectangles, or [`Rect::ZERO`] when they
    /// do not intersect.
    pub fn intersection(&self, other: &Rect) -> Rect {
        if !self.intersects(other) {
            return Rect::ZERO;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        Rect {
            x,
            y,
            width: self.max_x().min(other.max_x()) - x,
            height: self.max_y().min(other.max_y()) - y,
        }
    }

    /// Geometric center of the rectangle.
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// A corner point pulled inward by `inset` on each axis.
    ///
    /// An inset that does not fit within a side collapses to zero on that
    /// axis, so the returned point always lies within the rectangle.
    pub fn corner(&self, top: bool, right: bool, inset: f64) -> Point {
        let x_inset = if inset < self.width { inset } else { 0.0 };
        let y_inset = if inset < self.height { inset } else { 0.0 };

        let x = if right {
            self.max_x() - x_inset
        } else {
            self.x + x_inset
        };
        let y = if top {
            self.max_y() - y_inset
        } else {
            self.y + y_inset
        };

        Point { x, y }
    }
}
