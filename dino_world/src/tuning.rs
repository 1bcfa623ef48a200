//! Fixed tunables for the playfield, physics and spawning.

use std::time::Duration;

// ════════════════════════════════════════════════════════════════════════════
// Tuning
// ════════════════════════════════════════════════════════════════════════════

/// Every constant the game model reads.
///
/// The game always runs with [`Tuning::default`]; other values exist so
/// tests can pin down a single behaviour (e.g. switch spawning off).
/// Coordinates are screen pixels with `y` growing downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tuning {
    // ── playfield ────────────────────────────────────────────────────────
    pub width:     i32,
    pub height:    i32,
    /// Resting `y` of the character's feet.
    pub ground_y:  i32,
    pub tick_rate: u32,

    // ── physics ──────────────────────────────────────────────────────────
    /// Velocity applied on take-off; negative is upward.
    pub jump_velocity: i32,
    pub gravity:       i32,

    // ── character hitbox ─────────────────────────────────────────────────
    pub character_x:      i32,
    pub character_width:  i32,
    pub standing_height:  i32,
    pub ducking_height:   i32,

    // ── obstacles ────────────────────────────────────────────────────────
    /// A new obstacle appears once the spawn timer exceeds this many ticks.
    pub spawn_interval:  u32,
    pub obstacle_speed:  i32,
    pub obstacle_width:  i32,
    pub obstacle_height: i32,
    /// Obstacles whose `x` drops below this are discarded.
    pub offscreen_x:     i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            width:     900,
            height:    300,
            ground_y:  230,
            tick_rate: 60,

            jump_velocity: -18,
            gravity:       1,

            character_x:     80,
            character_width: 40,
            standing_height: 50,
            ducking_height:  30,

            spawn_interval:  90,
            obstacle_speed:  8,
            obstacle_width:  30,
            obstacle_height: 40,
            offscreen_x:     -50,
        }
    }
}

impl Tuning {
    /// Wall-clock length of one tick.
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate.max(1)
    }

    /// Number of ticks a jump from the ground spends in the air.
    ///
    /// Solves `jump_velocity·k + gravity·k(k−1)/2 >= 0` for the smallest
    /// `k > 0`; the character is back on the ground after tick `k`.
    pub fn airtime_ticks(&self) -> u32 {
        if self.jump_velocity >= 0 || self.gravity <= 0 {
            return 0;
        }
        let mut k: i64 = 1;
        loop {
            let dy = self.jump_velocity as i64 * k + self.gravity as i64 * k * (k - 1) / 2;
            if dy >= 0 {
                return (k - 1) as u32;
            }
            k += 1;
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tick_is_sixtieth_of_a_second() {
        let t = Tuning::default();
        assert_eq!(t.tick_duration(), Duration::from_nanos(16_666_666));
    }

    #[test]
    fn default_airtime() {
        // -18k + k(k-1)/2 first reaches 0 at k = 37
        assert_eq!(Tuning::default().airtime_ticks(), 36);
    }

    #[test]
    fn no_airtime_without_upward_velocity() {
        let t = Tuning { jump_velocity: 0, ..Tuning::default() };
        assert_eq!(t.airtime_ticks(), 0);
    }

    #[test]
    fn obstacle_spawns_inside_playfield_height() {
        let t = Tuning::default();
        assert!(t.ground_y - t.obstacle_height >= 0);
        assert!(t.ground_y < t.height);
    }
}
