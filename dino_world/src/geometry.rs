//! Axis-aligned integer rectangles.

/// Rectangle with its top-left corner at `(x, y)`; `y` grows downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn left(&self)   -> i32 { self.x }
    pub fn top(&self)    -> i32 { self.y }
    pub fn right(&self)  -> i32 { self.x + self.w }
    pub fn bottom(&self) -> i32 { self.y + self.h }

    /// True when the interiors overlap.
    ///
    /// Touching edges do not count, and an empty rectangle never
    /// intersects anything.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.w <= 0 || self.h <= 0 || other.w <= 0 || other.h <= 0 {
            return false;
        }
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}
