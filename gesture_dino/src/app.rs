//! The fixed-rate game loop.
//!
//! `play` is the whole game: poll the window, read a gesture, tick the
//! world, draw it, sleep until the next tick.  `run` wires it to the real
//! window and the tracker selected at compile time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use dino_world::{EndReason, Input, Phase, Snapshot, Tuning, World};

use crate::error::StartupError;
use crate::gesture::{GestureClassifier, HandTracker};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// Collaborator seams
// ════════════════════════════════════════════════════════════════════════════

/// The window: quit requests in, frames out.
pub trait Screen {
    /// Drain pending window events; true if the player asked to leave.
    fn quit_requested(&mut self) -> bool;

    /// Draw one frame.  Failures are the screen's business.
    fn present(&mut self, snapshot: &Snapshot);
}

/// Blocks until the next tick boundary.
pub trait Pacer {
    fn wait(&mut self);
}

// ════════════════════════════════════════════════════════════════════════════
// Interruptible — process signals as quit requests
// ════════════════════════════════════════════════════════════════════════════

/// Wraps a screen so a raised `interrupt` flag also counts as a quit.
///
/// The flag is checked before the window, so a signal ends the game on
/// the next tick through the ordinary quit path.
pub struct Interruptible<S: Screen> {
    inner:     S,
    interrupt: Arc<AtomicBool>,
}

impl<S: Screen> Interruptible<S> {
    pub fn new(inner: S, interrupt: Arc<AtomicBool>) -> Self {
        Interruptible { inner, interrupt }
    }
}

impl<S: Screen> Screen for Interruptible<S> {
    fn quit_requested(&mut self) -> bool {
        self.interrupt.load(Ordering::SeqCst) || self.inner.quit_requested()
    }

    fn present(&mut self, snapshot: &Snapshot) {
        self.inner.present(snapshot);
    }
}

/// Route Ctrl+C and termination signals into a flag the loop polls.
pub fn install_interrupt_flag() -> Result<Arc<AtomicBool>, StartupError> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = flag.clone();
    ctrlc::set_handler(move || {
        warn!("interrupt received; quitting");
        handler_flag.store(true, Ordering::SeqCst);
    })
    .map_err(|e| StartupError::Signal(e.to_string()))?;
    Ok(flag)
}

// ════════════════════════════════════════════════════════════════════════════
// FramePacer
// ════════════════════════════════════════════════════════════════════════════

/// Sleeps to fixed deadlines `period` apart.
///
/// A tick that overruns its deadline does not make the following ticks
/// hurry; the schedule restarts from the late wake-up.
pub struct FramePacer {
    period: Duration,
    next:   Instant,
}

impl FramePacer {
    pub fn new(period: Duration) -> Self {
        FramePacer { period, next: Instant::now() + period }
    }
}

impl Pacer for FramePacer {
    fn wait(&mut self) {
        let now = Instant::now();
        if now < self.next {
            thread::sleep(self.next - now);
            self.next += self.period;
        } else {
            self.next = now + self.period;
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// play() — one game from first tick to the end
// ════════════════════════════════════════════════════════════════════════════

/// How a game finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub score:  u64,
    pub reason: EndReason,
}

/// Drive `world` until it ends, then release the tracker.
///
/// A quit tick draws nothing; a collision tick is drawn before returning.
pub fn play<S, T, P>(
    world:    &mut World,
    screen:   &mut S,
    gestures: &mut GestureClassifier<T>,
    pacer:    &mut P,
) -> Outcome
where
    S: Screen,
    T: HandTracker,
    P: Pacer,
{
    let reason = loop {
        let input = if screen.quit_requested() {
            Input::Quit
        } else {
            Input::Command(gestures.command())
        };

        match world.tick(input) {
            Phase::Running => {
                screen.present(&world.snapshot());
                pacer.wait();
            }
            Phase::Ended(EndReason::Quit) => break EndReason::Quit,
            Phase::Ended(EndReason::Collision) => {
                screen.present(&world.snapshot());
                break EndReason::Collision;
            }
        }
    };

    gestures.release();

    let outcome = Outcome { score: world.score(), reason };
    info!(score = outcome.score, reason = ?outcome.reason, "game over");
    outcome
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the application entry
// ════════════════════════════════════════════════════════════════════════════

/// Open the window and tracker, then play one game.
///
/// This is the entry point called from `main.rs`.  It uses the keyboard
/// simulation by default and a LeapMotion controller with `--features leap`.
pub fn run(tuning: Tuning) -> Result<Outcome, StartupError> {
    let interrupt = install_interrupt_flag()?;
    let (screen, mut gestures) = open_devices(&tuning)?;
    let mut screen = Interruptible::new(screen, interrupt);
    let mut pacer = FramePacer::new(tuning.tick_duration());
    let mut world = World::new(tuning);

    info!(width = tuning.width, height = tuning.height, fps = tuning.tick_rate, "game started");
    Ok(play(&mut world, &mut screen, &mut gestures, &mut pacer))
}

#[cfg(not(feature = "leap"))]
fn open_devices(
    tuning: &Tuning,
) -> Result<(Visualizer, GestureClassifier<crate::gesture::SimHandTracker>), StartupError> {
    use crate::gesture::SimHandTracker;
    use std::sync::mpsc;

    let (sim_tx, sim_rx) = mpsc::channel();
    let screen = Visualizer::new(tuning, Some(sim_tx))?;
    info!("hand source: keyboard simulation");
    Ok((screen, GestureClassifier::new(SimHandTracker::new(sim_rx))))
}

#[cfg(feature = "leap")]
fn open_devices(
    tuning: &Tuning,
) -> Result<(Visualizer, GestureClassifier<crate::gesture::LeapHandTracker>), StartupError> {
    use crate::gesture::LeapHandTracker;

    let screen = Visualizer::new(tuning, None)?;
    let tracker = LeapHandTracker::open()?;
    info!("hand source: LeapMotion");
    Ok((screen, GestureClassifier::new(tracker)))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
