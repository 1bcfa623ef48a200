//! Game state and the one-tick update that drives it.
//!
//! `World` owns the character, the live obstacles, the score and the spawn
//! timer.  The driver feeds it one [`Input`] per tick and draws the
//! [`Snapshot`] it hands back; nothing else mutates the state.

use tracing::debug;

use crate::character::{Character, Command};
use crate::geometry::Rect;
use crate::obstacle::Obstacle;
use crate::tuning::Tuning;

/// Pixels between the character's feet and the drawn ground line.
const GROUND_LINE_OFFSET: i32 = 5;

// ════════════════════════════════════════════════════════════════════════════
// Phase / input
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    /// The window asked to close.
    Quit,
    /// An obstacle hit the character.
    Collision,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    /// Terminal; further ticks are ignored.
    Ended(EndReason),
}

/// Everything the world needs from outside for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Input {
    Quit,
    Command(Command),
}

/// How the glyph should be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pose {
    Running,
    Ducking,
}

// ════════════════════════════════════════════════════════════════════════════
// Snapshot — what the renderer sees
// ════════════════════════════════════════════════════════════════════════════

/// Drawable copy of one tick's state.  Owns its data so the renderer can
/// keep it without borrowing the world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub width:         i32,
    pub height:        i32,
    pub ground_line_y: i32,
    /// Top-left corner of the character glyph.
    pub glyph:         (i32, i32),
    pub pose:          Pose,
    /// Obstacle bounds in spawn order.
    pub obstacles:     Vec<Rect>,
    pub score:         u64,
    pub phase:         Phase,
}

// ════════════════════════════════════════════════════════════════════════════
// World
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct World {
    tuning:      Tuning,
    character:   Character,
    obstacles:   Vec<Obstacle>,
    score:       u64,
    spawn_timer: u32,
    phase:       Phase,
}

impl World {
    pub fn new(tuning: Tuning) -> Self {
        World {
            tuning,
            character:   Character::new(tuning),
            obstacles:   Vec::new(),
            score:       0,
            spawn_timer: 0,
            phase:       Phase::Running,
        }
    }

    // ── per-tick update ──────────────────────────────────────────────────

    /// Advance the game by one tick and return the phase afterwards.
    pub fn tick(&mut self, input: Input) -> Phase {
        if self.phase != Phase::Running {
            return self.phase;
        }

        self.score += 1;
        self.spawn_timer += 1;

        let command = match input {
            Input::Quit => {
                self.phase = Phase::Ended(EndReason::Quit);
                return self.phase;
            }
            Input::Command(c) => c,
        };

        self.character.update(command);

        if self.spawn_timer > self.tuning.spawn_interval {
            self.spawn_obstacle();
            self.spawn_timer = 0;
        }

        // Every obstacle moves even after one of them has hit.
        let hitbox = self.character.bounds();
        let mut hit = false;
        for obstacle in &mut self.obstacles {
            obstacle.update();
            if obstacle.bounds().intersects(&hitbox) {
                debug!(score = self.score, obstacle = ?obstacle.bounds(), character = ?hitbox, "collision");
                hit = true;
            }
        }
        if hit {
            self.phase = Phase::Ended(EndReason::Collision);
        }

        self.obstacles.retain(|o| !o.is_offscreen());

        self.phase
    }

    // ── obstacle injection ───────────────────────────────────────────────

    /// Append an obstacle at the right edge, as the spawn timer would.
    pub fn spawn_obstacle(&mut self) {
        debug!(score = self.score, live = self.obstacles.len(), "spawning obstacle");
        self.obstacles.push(Obstacle::spawn(&self.tuning));
    }

    /// Append a prepared obstacle.
    pub fn push_obstacle(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    // ── rendering ────────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width:         self.tuning.width,
            height:        self.tuning.height,
            ground_line_y: self.tuning.ground_y + GROUND_LINE_OFFSET,
            glyph:         self.character.glyph_anchor(),
            pose:          if self.character.is_ducking() { Pose::Ducking } else { Pose::Running },
            obstacles:     self.obstacles.iter().map(Obstacle::bounds).collect(),
            score:         self.score,
            phase:         self.phase,
        }
    }

    // ── accessors ────────────────────────────────────────────────────────

    pub fn character(&self)   -> &Character  { &self.character }
    pub fn obstacles(&self)   -> &[Obstacle] { &self.obstacles }
    pub fn score(&self)       -> u64         { self.score }
    pub fn spawn_timer(&self) -> u32         { self.spawn_timer }
    pub fn phase(&self)       -> Phase       { self.phase }
    pub fn is_running(&self)  -> bool        { self.phase == Phase::Running }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
