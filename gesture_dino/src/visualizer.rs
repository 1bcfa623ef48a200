//! Software-rendered playfield using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ SCORE: 412                                                   │
//! │                                                              │
//! │        ██                                                    │
//! │       ████                              ▓▓▓        ▓▓▓       │
//! │ ──────█████─────────────────────────────▓▓▓────────▓▓▓────── │
//! │ key legend (simulation mode)                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::sync::mpsc::Sender;

use minifb::{Key, Window, WindowOptions};
use tracing::warn;

use dino_world::{Pose, Snapshot, Tuning};

use crate::app::Screen;
use crate::error::StartupError;
use crate::gesture::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Look
// ════════════════════════════════════════════════════════════════════════════

const TITLE:          &str  = "Gesture Dino";
const BG_COLOR:       u32   = 0xFFF5F5F5;
const INK:            u32   = 0xFF000000;
const OBSTACLE_COLOR: u32   = 0xFF009600;
const LEGEND_COLOR:   u32   = 0xFF888888;
const GROUND_THICK:   usize = 2;
const SCORE_POS:      (i32, i32) = (10, 10);
const TEXT_SCALE:     i32   = 2;

/// One art cell in pixels; 5×5 cells fill the standing hitbox.
const CELL_W: i32 = 8;
const CELL_H: i32 = 10;

const DINO_ART: [&str; 5] = [
    "  ## ",
    " ####",
    " # ##",
    "#####",
    "  # #",
];

const DINO_DUCK_ART: [&str; 3] = [
    "  ###",
    "#####",
    " # # ",
];

const SIM_LEGEND: &str = "HOLD 0-4 = FINGERS  UP/SPACE = JUMP  DOWN = DUCK  ESC = QUIT";

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf:    Vec<u32>,
    width:  usize,
    height: usize,
    /// Present in simulation mode: keyboard hand poses go here.
    sim_tx: Option<Sender<SimInput>>,
    /// Last pose sent, so only changes cross the channel.
    shown:  Option<usize>,
}

impl Visualizer {
    pub fn new(tuning: &Tuning, sim_tx: Option<Sender<SimInput>>) -> Result<Self, StartupError> {
        let width  = tuning.width.max(1) as usize;
        let height = tuning.height.max(1) as usize;

        let mut window = Window::new(
            TITLE,
            width, height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| StartupError::Window(e.to_string()))?;

        // Pacing is done by the game loop's FramePacer.
        window.limit_update_rate(None);

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; width * height],
            width,
            height,
            sim_tx,
            shown: None,
        })
    }

    /// The hand the keyboard is holding up, if any.
    fn held_hand(&self) -> Option<usize> {
        hand_for(&self.window.get_keys())
    }

    fn forward_sim_input(&mut self) {
        let Some(tx) = &self.sim_tx else { return };
        let held = self.held_hand();
        if held == self.shown {
            return;
        }
        let msg = match held {
            Some(n) => SimInput::Show(n),
            None    => SimInput::Hide,
        };
        if tx.send(msg).is_ok() {
            self.shown = held;
        }
    }

    // ── Scene ─────────────────────────────────────────────────────────────

    fn draw(&mut self, snap: &Snapshot) {
        self.buf.fill(BG_COLOR);

        // ── Ground ───────────────────────────────────────────────────────
        self.fill_rect(0, snap.ground_line_y, self.width as i32, GROUND_THICK as i32, INK);

        // ── Character ────────────────────────────────────────────────────
        let (gx, gy) = snap.glyph;
        match snap.pose {
            Pose::Running => self.draw_art(&DINO_ART, gx, gy),
            Pose::Ducking => {
                // Bottom-aligned with the standing art
                let drop = (DINO_ART.len() - DINO_DUCK_ART.len()) as i32 * CELL_H;
                self.draw_art(&DINO_DUCK_ART, gx, gy + drop);
            }
        }

        // ── Obstacles ────────────────────────────────────────────────────
        for r in &snap.obstacles {
            self.fill_rect(r.x, r.y, r.w, r.h, OBSTACLE_COLOR);
        }

        // ── Score ────────────────────────────────────────────────────────
        let score = format!("SCORE: {}", snap.score);
        self.draw_text(&score, SCORE_POS.0, SCORE_POS.1, TEXT_SCALE, INK);

        // ── Key legend ───────────────────────────────────────────────────
        if self.sim_tx.is_some() {
            let y = self.height as i32 - 5 * TEXT_SCALE - 6;
            self.draw_text(SIM_LEGEND, 10, y, 1, LEGEND_COLOR);
        }
    }

    fn draw_art(&mut self, art: &[&str], x: i32, y: i32) {
        for (row, line) in art.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                if ch == '#' {
                    self.fill_rect(
                        x + col as i32 * CELL_W,
                        y + row as i32 * CELL_H,
                        CELL_W, CELL_H, INK,
                    );
                }
            }
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    /// Fill a rectangle, clipped to the window; negative origins are fine.
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: u32) {
        let x0 = x.max(0) as usize;
        let y0 = y.max(0) as usize;
        let x1 = (x + w).clamp(0, self.width as i32) as usize;
        let y1 = (y + h).clamp(0, self.height as i32) as usize;
        for row in y0..y1 {
            let start = row * self.width;
            self.buf[start + x0.min(x1)..start + x1].fill(color);
        }
    }

    /// 3×5 bitmap text, each font pixel drawn `scale`×`scale`.
    fn draw_text(&mut self, text: &str, x: i32, y: i32, scale: i32, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            for (row, bits) in glyph(ch).iter().enumerate() {
                for col in 0..3 {
                    if bits & (0b100 >> col) != 0 {
                        self.fill_rect(
                            cx + col * scale,
                            y + row as i32 * scale,
                            scale, scale, color,
                        );
                    }
                }
            }
            cx += 4 * scale;
            if cx >= self.width as i32 { break; }
        }
    }
}

impl Screen for Visualizer {
    fn quit_requested(&mut self) -> bool {
        if !self.window.is_open() || self.window.is_key_down(Key::Escape) {
            return true;
        }
        self.forward_sim_input();
        false
    }

    fn present(&mut self, snapshot: &Snapshot) {
        self.draw(snapshot);
        if let Err(e) = self.window.update_with_buffer(&self.buf, self.width, self.height) {
            warn!(error = %e, "frame not presented");
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// 3×5 bitmap font — digits, capitals and the few symbols the HUD uses
// ────────────────────────────────────────────────────────────────────────────

fn glyph(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b011, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b110],
        '6' => [0b011, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b110],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b110, 0b100, 0b110, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        _   => [0b000; 5],
    }
}

/// Finger count shown by the held keys.
///
/// Up/Space (open hand) beats Down (fist), which beats the digit keys; of
/// several digits the highest wins.
fn hand_for(keys: &[Key]) -> Option<usize> {
    let held = |k: Key| keys.contains(&k);

    if held(Key::Up) || held(Key::Space) { return Some(4); }
    if held(Key::Down)                   { return Some(0); }
    [Key::Key4, Key::Key3, Key::Key2, Key::Key1, Key::Key0]
        .iter()
        .position(|&k| held(k))
        .map(|i| 4 - i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_priority() {
        assert_eq!(hand_for(&[]), None);
        assert_eq!(hand_for(&[Key::Left, Key::Escape]), None);
        assert_eq!(hand_for(&[Key::Up]), Some(4));
        assert_eq!(hand_for(&[Key::Space]), Some(4));
        assert_eq!(hand_for(&[Key::Down]), Some(0));
        assert_eq!(hand_for(&[Key::Down, Key::Up]), Some(4));
        assert_eq!(hand_for(&[Key::Key3, Key::Down]), Some(0));
        assert_eq!(hand_for(&[Key::Key1, Key::Key3, Key::Key2]), Some(3));
        assert_eq!(hand_for(&[Key::Key0]), Some(0));
    }

    #[test]
    fn hud_text_has_glyphs() {
        for ch in "SCORE: 0123456789".chars().chain(SIM_LEGEND.chars()) {
            if ch != ' ' {
                assert_ne!(glyph(ch), [0; 5], "missing glyph for {:?}", ch);
            }
        }
    }

    #[test]
    fn art_fills_standing_hitbox() {
        let t = Tuning::default();
        assert_eq!(DINO_ART.len() as i32 * CELL_H, t.standing_height);
        assert_eq!(DINO_DUCK_ART.len() as i32 * CELL_H, t.ducking_height);
        assert!(DINO_ART.iter().all(|r| r.len() as i32 * CELL_W == t.character_width));
    }
}
