// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Zoneplan-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Zoneplan and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Canvas geometry.
//!
//! Everything here is plain data and pure functions: points and rectangles in canvas units, the
//! device-to-canvas transform, and the overlap rule used by rubber-band selection.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset from `self` to `other`.
    pub fn delta_to(self, other: Point) -> Offset {
        Offset {
            dx: other.x - self.x,
            dy: other.y - self.y,
        }
    }

    pub fn translate(self, offset: Offset) -> Point {
        Point::new(self.x + offset.dx, self.y + offset.dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

impl Offset {
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// True when either axis moved further than `threshold`.
    pub fn exceeds(self, threshold: f64) -> bool {
        self.dx.abs() > threshold || self.dy.abs() > threshold
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle with its origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Rectangle spanned by two drag corners, normalized so width and height are never
    /// negative regardless of drag direction.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::new(
            a.x.min(b.x),
            a.y.min(b.y),
            (a.x - b.x).abs(),
            (a.y - b.y).abs(),
        )
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Any-overlap test; touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.right() > other.x
            && self.x < other.right()
            && self.bottom() > other.y
            && self.y < other.bottom()
    }

    /// Inclusive on every edge.
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Maps device positions (terminal cells, window pixels) onto the canvas.
///
/// `origin` is the device position of the canvas' top-left corner, and one device unit covers
/// `scale_x` by `scale_y` canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub origin: Point,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            origin: Point::ORIGIN,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl Viewport {
    pub fn new(origin: Point, scale_x: f64, scale_y: f64) -> Self {
        Self {
            origin,
            scale_x,
            scale_y,
        }
    }

    pub fn to_canvas(&self, device: Point) -> Point {
        Point::new(
            (device.x - self.origin.x) * self.scale_x,
            (device.y - self.origin.y) * self.scale_y,
        )
    }

    pub fn to_device(&self, canvas: Point) -> Point {
        Point::new(
            canvas.x / self.scale_x + self.origin.x,
            canvas.y / self.scale_y + self.origin.y,
        )
    }

    pub fn rect_to_device(&self, canvas: Rect) -> Rect {
        let origin = self.to_device(canvas.origin());
        Rect::new(
            origin.x,
            origin.y,
            canvas.width / self.scale_x,
            canvas.height / self.scale_y,
        )
    }
}
