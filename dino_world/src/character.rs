//! The player character: vertical physics driven by one command per tick.

use crate::geometry::Rect;
use crate::tuning::Tuning;

// ════════════════════════════════════════════════════════════════════════════
// Command
// ════════════════════════════════════════════════════════════════════════════

/// What the player asks for on a given tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Command {
    #[default]
    Run,
    Jump,
    Duck,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Run  => "run",
            Command::Jump => "jump",
            Command::Duck => "duck",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Character
// ════════════════════════════════════════════════════════════════════════════

/// Feet position, vertical velocity and pose of the runner.
///
/// `y` never exceeds `ground_y`; landing zeroes the velocity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Character {
    y:        i32,
    velocity: i32,
    ducking:  bool,
    tuning:   Tuning,
}

impl Character {
    /// A character standing still on the ground.
    pub fn new(tuning: Tuning) -> Self {
        Character {
            y:        tuning.ground_y,
            velocity: 0,
            ducking:  false,
            tuning,
        }
    }

    /// Advance one tick under `command`.
    pub fn update(&mut self, command: Command) {
        // Take-off only from the ground; no double jump, no buffering.
        if command == Command::Jump && self.is_grounded() {
            self.velocity = self.tuning.jump_velocity;
        }

        self.ducking = command == Command::Duck;

        self.y += self.velocity;
        self.velocity += self.tuning.gravity;

        if self.y > self.tuning.ground_y {
            self.y = self.tuning.ground_y;
            self.velocity = 0;
        }
    }

    /// Collision box; its bottom edge sits on the feet at `y`.
    ///
    /// Ducking shrinks the box even in mid-air.
    pub fn bounds(&self) -> Rect {
        let h = if self.ducking {
            self.tuning.ducking_height
        } else {
            self.tuning.standing_height
        };
        Rect::new(self.tuning.character_x, self.y - h, self.tuning.character_width, h)
    }

    /// Top-left corner for drawing the glyph at full standing height.
    pub fn glyph_anchor(&self) -> (i32, i32) {
        (self.tuning.character_x, self.y - self.tuning.standing_height)
    }

    pub fn y(&self)           -> i32  { self.y }
    pub fn velocity(&self)    -> i32  { self.velocity }
    pub fn is_ducking(&self)  -> bool { self.ducking }
    pub fn is_grounded(&self) -> bool { self.y == self.tuning.ground_y }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> Character {
        Character::new(Tuning::default())
    }

    fn trajectory(commands: &[Command]) -> Vec<(i32, i32)> {
        let mut c = runner();
        commands.iter().map(|&cmd| {
            c.update(cmd);
            (c.y(), c.velocity())
        }).collect()
    }

    #[test]
    fn starts_grounded_and_still() {
        let c = runner();
        assert!(c.is_grounded());
        assert_eq!(c.velocity(), 0);
        assert!(!c.is_ducking());
    }

    #[test]
    fn never_below_ground() {
        // Deterministic pseudo-random command mix
        let mut c = runner();
        let mut seed: u32 = 0x9E37_79B9;
        for _ in 0..5_000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let cmd = match seed % 3 {
                0 => Command::Run,
                1 => Command::Jump,
                _ => Command::Duck,
            };
            c.update(cmd);
            assert!(c.y() <= Tuning::default().ground_y);
        }
    }

    #[test]
    fn jump_rises_then_lands() {
        let t = Tuning::default();
        let mut c = runner();
        c.update(Command::Jump);
        let mut prev = c.y();
        assert!(prev < t.ground_y);

        // Rising half: -18, -17, ... until velocity turns non-negative
        for _ in 0..17 {
            c.update(Command::Run);
            assert!(c.y() < prev, "still rising");
            prev = c.y();
        }

        let mut ticks = 18;
        while !c.is_grounded() {
            c.update(Command::Run);
            ticks += 1;
            assert!(ticks < 100, "jump never landed");
        }
        assert_eq!(ticks, t.airtime_ticks() + 1);
    }

    #[test]
    fn landing_zeroes_velocity() {
        let mut c = runner();
        c.update(Command::Jump);
        // Tick 37 touches the ground moving down; tick 38 is clamped.
        for _ in 0..37 { c.update(Command::Run); }
        assert!(c.is_grounded());
        assert_eq!(c.velocity(), 0);

        for _ in 0..10 {
            c.update(Command::Run);
            assert!(c.is_grounded());
        }
    }

    #[test]
    fn jump_arc_is_deterministic() {
        let mut script = vec![Command::Jump];
        script.extend(std::iter::repeat(Command::Run).take(50));
        assert_eq!(trajectory(&script), trajectory(&script));
    }

    #[test]
    fn no_double_jump() {
        let mut double = vec![Command::Jump, Command::Jump];
        double.extend(std::iter::repeat(Command::Run).take(40));
        let mut single = vec![Command::Jump, Command::Run];
        single.extend(std::iter::repeat(Command::Run).take(40));
        assert_eq!(trajectory(&double), trajectory(&single));
    }

    #[test]
    fn airborne_jump_keeps_velocity() {
        let mut c = runner();
        c.update(Command::Jump);
        c.update(Command::Run);
        let v = c.velocity();
        let mut retry = c.clone();
        c.update(Command::Run);
        retry.update(Command::Jump);
        assert_eq!(c.velocity(), retry.velocity());
        assert_eq!(v + Tuning::default().gravity, c.velocity());
    }

    #[test]
    fn duck_shrinks_hitbox_at_any_height() {
        let t = Tuning::default();
        let mut c = runner();
        c.update(Command::Duck);
        assert_eq!(c.bounds().h, t.ducking_height);
        assert_eq!(c.bounds().bottom(), t.ground_y);

        c.update(Command::Jump);
        c.update(Command::Duck);
        assert!(!c.is_grounded());
        assert_eq!(c.bounds().h, t.ducking_height);
        assert_eq!(c.bounds().bottom(), c.y());

        c.update(Command::Run);
        assert_eq!(c.bounds().h, t.standing_height);
    }

    #[test]
    fn duck_does_not_change_motion() {
        let mut a = vec![Command::Jump];
        a.extend(std::iter::repeat(Command::Duck).take(40));
        let mut b = vec![Command::Jump];
        b.extend(std::iter::repeat(Command::Run).take(40));
        assert_eq!(trajectory(&a), trajectory(&b));
    }

    #[test]
    fn jump_from_duck_takes_off() {
        let mut c = runner();
        c.update(Command::Duck);
        c.update(Command::Jump);
        assert!(!c.is_ducking());
        assert!(c.y() < Tuning::default().ground_y);
    }

    #[test]
    fn standing_bounds() {
        let c = runner();
        assert_eq!(c.bounds(), Rect::new(80, 180, 40, 50));
        assert_eq!(c.glyph_anchor(), (80, 180));
    }
}
