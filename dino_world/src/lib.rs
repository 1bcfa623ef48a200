//! # dino_world
//!
//! The frame-stepped model behind Gesture Dino: a character that runs,
//! jumps and ducks on a flat ground line while obstacles scroll in from
//! the right.  Everything here is integer arithmetic evaluated once per
//! tick; no clocks, windows or cameras are involved.
//!
//! ## Quick start
//!
//! ```rust
//! use dino_world::{Command, Input, Phase, Tuning, World};
//!
//! let mut world = World::new(Tuning::default());
//! world.tick(Input::Command(Command::Jump));
//! for _ in 0..40 {
//!     world.tick(Input::Command(Command::Run));
//! }
//! assert_eq!(world.phase(), Phase::Running);
//! assert_eq!(world.score(), 41);
//! ```
//!
//! ## Per-tick order
//!
//! | Step | Effect |
//! |---|---|
//! | 1 | score += 1, spawn timer += 1 |
//! | 2 | quit input ends the run (nothing else happens) |
//! | 3 | character physics for the tick's command |
//! | 4 | spawn an obstacle once the timer passes the interval |
//! | 5 | advance every obstacle, testing each against the character |
//! | 6 | drop obstacles that left the playfield |

pub mod tuning;
pub mod geometry;
pub mod character;
pub mod obstacle;
pub mod world;

pub use tuning::Tuning;
pub use geometry::Rect;
pub use character::{Character, Command};
pub use obstacle::Obstacle;
pub use world::{EndReason, Input, Phase, Pose, Snapshot, World};
