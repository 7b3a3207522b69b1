use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }
}

/// Pixel dimensions of the drawing surface.
///
/// Tracked by the host's resize observation; changing it never alters the
/// time-domain state, only the pixel mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Chart margins around the plot area. The left margin carries the lane
/// labels, the bottom margin the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 40.0,
            right: 20.0,
            bottom: 40.0,
            left: 140.0,
        }
    }
}

impl Margins {
    /// Horizontal extent of the plot area, never below 20 px so a collapsed
    /// container cannot produce a degenerate scale.
    pub fn inner_width(&self, viewport: &Viewport) -> f64 {
        (viewport.width - self.left - self.right).max(20.0)
    }

    pub fn inner_height(&self, viewport: &Viewport) -> f64 {
        (viewport.height - self.top - self.bottom).max(0.0)
    }
}
