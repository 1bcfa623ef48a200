//! # gesture_dino
//!
//! A side-scrolling reflex game steered by hand gestures: show an open hand
//! to jump over the green blocks, close it to duck.  The game ends on the
//! first collision.
//!
//! ## Gesture → Command mapping
//!
//! Fingers are counted on the first tracked hand (index, middle, ring,
//! pinky; the thumb is ignored).
//!
//! | Raised fingers | Command |
//! |---|---|
//! | 4 | Jump |
//! | 2–3 | Run |
//! | 0–1 | Duck |
//! | no hand | Run |
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: the keyboard holds up a synthetic hand.
//! * `leap` — **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key (hold) | Hand shown |
//! |---|---|
//! | `0`–`4` | that many raised fingers |
//! | `Up` / `Space` | open hand (jump) |
//! | `Down` | fist (duck) |
//! | `Escape` | quit |

pub mod error;
pub mod gesture;
pub mod visualizer;
pub mod app;
