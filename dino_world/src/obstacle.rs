//! Obstacles: ground-level blocks that slide left at a constant speed.

use crate::geometry::Rect;
use crate::tuning::Tuning;

/// A block sitting on the ground line.
///
/// Only `x` changes after construction, and it strictly decreases.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Obstacle {
    rect:        Rect,
    speed:       i32,
    offscreen_x: i32,
}

impl Obstacle {
    /// A fresh obstacle entering at the playfield's right edge.
    pub fn spawn(tuning: &Tuning) -> Self {
        Self::at(tuning.width, tuning)
    }

    /// An obstacle at an arbitrary horizontal position.
    pub fn at(x: i32, tuning: &Tuning) -> Self {
        Obstacle {
            rect: Rect::new(
                x,
                tuning.ground_y - tuning.obstacle_height,
                tuning.obstacle_width,
                tuning.obstacle_height,
            ),
            speed:       tuning.obstacle_speed,
            offscreen_x: tuning.offscreen_x,
        }
    }

    /// Slide left by one tick's worth of speed.
    pub fn update(&mut self) {
        self.rect.x -= self.speed;
    }

    /// Past the left edge by enough margin that it can never be seen again.
    pub fn is_offscreen(&self) -> bool {
        self.rect.x < self.offscreen_x
    }

    pub fn x(&self)      -> i32  { self.rect.x }
    pub fn bounds(&self) -> Rect { self.rect }
}
