//! Screen geometry and the two resize axes

use serde::{Deserialize, Serialize};

/// A point in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset along one axis
    pub fn shifted(self, axis: Axis, delta: f32) -> Self {
        match axis {
            Axis::Column => Self::new(self.x + delta, self.y),
            Axis::Row => Self::new(self.x, self.y + delta),
        }
    }
}

/// A rectangle in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// Resize direction: columns change widths, rows change heights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Column,
    Row,
}

impl Axis {
    /// Pointer coordinate the axis tracks
    pub fn coordinate(self, point: Point) -> f32 {
        match self {
            Axis::Column => point.x,
            Axis::Row => point.y,
        }
    }

    /// Rectangle extent along the axis
    pub fn extent(self, rect: &Rect) -> f32 {
        match self {
            Axis::Column => rect.width,
            Axis::Row => rect.height,
        }
    }

    /// Class for the marker decorations on this axis
    pub fn handle_class(self) -> &'static str {
        match self {
            Axis::Column => "column-resize-handle",
            Axis::Row => "row-resize-handle",
        }
    }

    /// Class added to the editor root while an edge on this axis is active
    pub fn cursor_class(self) -> &'static str {
        match self {
            Axis::Column => "column-resize-cursor",
            Axis::Row => "row-resize-cursor",
        }
    }
}
