//! Gesture recognition — from LeapMotion hardware or keyboard simulation.
//!
//! Every backend produces [`HandLandmarks`] in the same 21-point layout
//! (wrist, then four joints per digit from thumb to pinky).  The
//! [`GestureClassifier`] turns those into one [`Command`] per tick, so the
//! game loop never knows which backend is attached.

use std::sync::mpsc::{Receiver, TryRecvError};

use dino_world::Command;
use tracing::{info, trace};

// ════════════════════════════════════════════════════════════════════════════
// Landmarks
// ════════════════════════════════════════════════════════════════════════════

pub const LANDMARK_COUNT: usize = 21;

/// Fingertip indices for index, middle, ring and pinky.
pub const FINGERTIPS: [usize; 4] = [8, 12, 16, 20];

/// A tip counts as raised when it is above the joint this many indices
/// before it (the PIP joint).
const REFERENCE_JOINT_OFFSET: usize = 2;

/// One tracked point, normalised to the frame: `x` left→right and `y`
/// top→bottom in `0.0..=1.0`, `z` toward the sensor.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }
}

/// The 21 landmarks of one hand.
#[derive(Clone, Debug, PartialEq)]
pub struct HandLandmarks {
    points: [Landmark; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        HandLandmarks { points }
    }

    pub fn point(&self, index: usize) -> Landmark {
        self.points[index]
    }

    /// Flip left/right so the hand moves like a reflection of the player.
    pub fn mirrored(&self) -> Self {
        let mut points = self.points;
        for p in &mut points {
            p.x = 1.0 - p.x;
        }
        HandLandmarks { points }
    }

    /// How many of the four non-thumb fingers are raised.
    pub fn raised_fingers(&self) -> usize {
        FINGERTIPS.iter()
            .filter(|&&tip| self.points[tip].y < self.points[tip - REFERENCE_JOINT_OFFSET].y)
            .count()
    }

    /// An upright synthetic hand with the first `raised` fingers extended
    /// (index first) and the rest curled.
    pub fn with_raised(raised: usize) -> Self {
        const PALM_Y:  f32 = 0.70;
        const MCP_Y:   f32 = 0.55;
        const SPACING: f32 = 0.06;

        let mut points = [Landmark::default(); LANDMARK_COUNT];
        points[0] = Landmark::new(0.5, 0.85, 0.0);

        // Thumb, angled off to the side
        for j in 0..4 {
            let t = j as f32;
            points[1 + j] = Landmark::new(0.38 - 0.04 * t, PALM_Y - 0.04 * t, 0.0);
        }

        for f in 0..4 {
            let base = 5 + 4 * f;
            let x = 0.41 + SPACING * f as f32;
            let up = f < raised;
            // MCP, PIP, DIP, TIP
            let ys = if up {
                [MCP_Y, MCP_Y - 0.10, MCP_Y - 0.16, MCP_Y - 0.21]
            } else {
                [MCP_Y, MCP_Y - 0.06, MCP_Y - 0.02, MCP_Y + 0.03]
            };
            for (j, y) in ys.into_iter().enumerate() {
                points[base + j] = Landmark::new(x, y, 0.0);
            }
        }
        HandLandmarks { points }
    }
}

/// Map a hand pose to a command: open hand jumps, fist ducks.
pub fn classify(hand: &HandLandmarks) -> Command {
    match hand.raised_fingers() {
        n if n >= 4 => Command::Jump,
        n if n <= 1 => Command::Duck,
        _           => Command::Run,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandTracker trait — unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// A source of hand poses, polled once per tick.
pub trait HandTracker {
    /// The current hand, or `None` if there is no frame or no hand in it.
    /// Must return promptly.
    fn poll(&mut self) -> Option<HandLandmarks>;

    /// Give the device back.  Called exactly once by [`GestureClassifier`].
    fn release(&mut self);
}

// ════════════════════════════════════════════════════════════════════════════
// GestureClassifier
// ════════════════════════════════════════════════════════════════════════════

/// Owns a tracker for the lifetime of a game and hands out commands.
///
/// The tracker is released exactly once: on [`GestureClassifier::release`]
/// or, failing that, when the classifier is dropped.
pub struct GestureClassifier<T: HandTracker> {
    tracker:  T,
    released: bool,
}

impl<T: HandTracker> GestureClassifier<T> {
    pub fn new(tracker: T) -> Self {
        GestureClassifier { tracker, released: false }
    }

    /// Command for this tick; `Run` when nothing usable was seen.
    pub fn command(&mut self) -> Command {
        if self.released {
            return Command::Run;
        }
        match self.tracker.poll() {
            Some(hand) => classify(&hand),
            None => {
                trace!("no hand this tick; running");
                Command::Run
            }
        }
    }

    pub fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.tracker.release();
        }
    }

    pub fn is_released(&self) -> bool { self.released }

    pub fn tracker(&self) -> &T { &self.tracker }
}

impl<T: HandTracker> Drop for GestureClassifier<T> {
    fn drop(&mut self) {
        self.release();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandTracker — keyboard simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimInput {
    /// A hand with this many raised fingers is being held up.
    Show(usize),
    /// The hand was taken out of view.
    Hide,
}

/// Tracker driven by [`SimInput`] events from the visualizer's window.
///
/// The window only reports changes; the tracker remembers the last one and
/// synthesises landmarks for it on every poll.
pub struct SimHandTracker {
    rx:      Option<Receiver<SimInput>>,
    showing: Option<usize>,
}

impl SimHandTracker {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimHandTracker { rx: Some(rx), showing: None }
    }

    fn drain(&mut self) {
        let Some(rx) = &self.rx else { return };
        let mut window_gone = false;
        loop {
            match rx.try_recv() {
                Ok(SimInput::Show(n)) => self.showing = Some(n.min(FINGERTIPS.len())),
                Ok(SimInput::Hide)    => self.showing = None,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    window_gone = true;
                    break;
                }
            }
        }
        if window_gone {
            self.showing = None;
            self.rx = None;
        }
    }
}

impl HandTracker for SimHandTracker {
    fn poll(&mut self) -> Option<HandLandmarks> {
        self.drain();
        self.showing.map(|n| HandLandmarks::with_raised(n).mirrored())
    }

    fn release(&mut self) {
        self.rx = None;
        self.showing = None;
        info!("simulated hand released");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapHandTracker — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Hands reported with less confidence than this are ignored.
pub const MIN_HAND_CONFIDENCE: f32 = 0.6;

/// Most queued tracker messages consumed in one tick.
pub const MAX_MESSAGES_PER_POLL: usize = 64;

pub fn is_confident(confidence: f32) -> bool {
    confidence >= MIN_HAND_CONFIDENCE
}

/// One message pulled off a tracker's queue.
#[derive(Clone, Debug, PartialEq)]
pub enum Polled {
    /// A tracking frame, with its first confident hand if it had one.
    Frame(Option<HandLandmarks>),
    /// Device, policy or other housekeeping traffic.
    Other,
}

/// Empty a message queue and keep what the newest tracking frame saw.
///
/// `next` returns `None` once the queue is empty.  Non-tracking messages
/// never override a frame; with no frame at all the result is `None`.
pub fn drain_newest<F>(mut next: F, limit: usize) -> Option<HandLandmarks>
where
    F: FnMut() -> Option<Polled>,
{
    let mut newest = None;
    for _ in 0..limit {
        match next() {
            Some(Polled::Frame(hand)) => newest = hand,
            Some(Polled::Other)       => {}
            None                      => break,
        }
    }
    newest
}

/// Tracker backed by a LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
/// Each poll drains the LeapC queue without waiting, so commands always
/// come from the newest tracking frame.
#[cfg(feature = "leap")]
pub struct LeapHandTracker {
    connection: Option<leaprs::Connection>,
}

/// Millimetres of Leap space mapped onto one frame width/height.
#[cfg(feature = "leap")]
const LEAP_SPAN_MM: f32 = 400.0;

#[cfg(feature = "leap")]
impl LeapHandTracker {
    pub fn open() -> Result<Self, crate::error::StartupError> {
        use crate::error::StartupError;
        use leaprs::*;

        let mut connection = Connection::create(ConnectionConfig::default())
            .map_err(|e| StartupError::Tracker(format!("{:?}", e)))?;
        connection.open()
            .map_err(|e| StartupError::Tracker(format!("{:?}", e)))?;

        info!("LeapMotion connection open");
        Ok(LeapHandTracker { connection: Some(connection) })
    }
}

#[cfg(feature = "leap")]
impl HandTracker for LeapHandTracker {
    fn poll(&mut self) -> Option<HandLandmarks> {
        use leaprs::*;

        let connection = self.connection.as_mut()?;
        let next = || -> Option<Polled> {
            // Timeout 0: an empty queue comes back as an error at once
            let msg = connection.poll(0).ok()?;
            let polled = match msg.event() {
                Event::Tracking(frame) => Polled::Frame(
                    frame.hands().into_iter()
                        .find(|h| is_confident(h.confidence))
                        .map(|h| leap_landmarks(&h).mirrored()),
                ),
                _ => Polled::Other,
            };
            Some(polled)
        };
        drain_newest(next, MAX_MESSAGES_PER_POLL)
    }

    fn release(&mut self) {
        if self.connection.take().is_some() {
            info!("LeapMotion connection released");
        }
    }
}

/// Lay a Leap hand out in the 21-landmark order.
///
/// Leap reports millimetres with `y` pointing up; landmarks want `y`
/// pointing down, so height is inverted around the top of the span.
#[cfg(feature = "leap")]
fn leap_landmarks(hand: &leaprs::Hand) -> HandLandmarks {
    let to_frame = |x: f32, y: f32, z: f32| Landmark::new(
        0.5 + x / LEAP_SPAN_MM,
        1.0 - y / LEAP_SPAN_MM,
        z / LEAP_SPAN_MM,
    );

    let mut points = [Landmark::default(); LANDMARK_COUNT];
    let palm = hand.palm().position();
    points[0] = to_frame(palm.x, palm.y, palm.z);

    for (d, digit) in hand.digits().into_iter().take(5).enumerate() {
        let base = 1 + 4 * d;
        let joints = [
            digit.proximal().prev_joint(),
            digit.intermediate().prev_joint(),
            digit.distal().prev_joint(),
            digit.distal().next_joint(),
        ];
        for (j, p) in joints.iter().enumerate() {
            points[base + j] = to_frame(p.x, p.y, p.z);
        }
    }
    HandLandmarks::new(points)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn synthetic_hands_count_correctly() {
        for n in 0..=4 {
            assert_eq!(HandLandmarks::with_raised(n).raised_fingers(), n);
        }
    }

    #[test]
    fn classify_thresholds() {
        let expect = [
            (0, Command::Duck),
            (1, Command::Duck),
            (2, Command::Run),
            (3, Command::Run),
            (4, Command::Jump),
        ];
        for (n, cmd) in expect {
            assert_eq!(classify(&HandLandmarks::with_raised(n)), cmd, "{} fingers", n);
        }
    }

    #[test]
    fn tip_level_with_joint_is_not_raised() {
        let mut hand = HandLandmarks::with_raised(4);
        hand.points[8].y = hand.points[6].y;
        assert_eq!(hand.raised_fingers(), 3);
    }

    #[test]
    fn thumb_is_ignored() {
        let mut hand = HandLandmarks::with_raised(0);
        hand.points[4].y = 0.0;
        assert_eq!(hand.raised_fingers(), 0);
    }

    #[test]
    fn mirroring_keeps_the_count() {
        let hand = HandLandmarks::with_raised(3);
        let m = hand.mirrored();
        assert_eq!(m.raised_fingers(), 3);
        assert!((m.point(8).x - (1.0 - hand.point(8).x)).abs() < 1e-6);
    }

    // ── classifier over a scripted tracker ───────────────────────────────

    struct Scripted {
        frames:   Vec<Option<HandLandmarks>>,
        releases: usize,
    }

    impl HandTracker for Scripted {
        fn poll(&mut self) -> Option<HandLandmarks> {
            if self.frames.is_empty() { None } else { self.frames.remove(0) }
        }
        fn release(&mut self) { self.releases += 1; }
    }

    #[test]
    fn missing_hand_falls_back_to_run() {
        let mut g = GestureClassifier::new(Scripted {
            frames: vec![None, Some(HandLandmarks::with_raised(0)), None],
            releases: 0,
        });
        assert_eq!(g.command(), Command::Run);
        assert_eq!(g.command(), Command::Duck);
        assert_eq!(g.command(), Command::Run);
        assert_eq!(g.command(), Command::Run);
    }

    #[test]
    fn release_is_idempotent() {
        let mut g = GestureClassifier::new(Scripted { frames: vec![], releases: 0 });
        g.release();
        g.release();
        assert!(g.is_released());
        assert_eq!(g.tracker().releases, 1);
    }

    #[test]
    fn released_classifier_stops_polling() {
        let mut g = GestureClassifier::new(Scripted {
            frames: vec![Some(HandLandmarks::with_raised(4))],
            releases: 0,
        });
        g.release();
        assert_eq!(g.command(), Command::Run);
        assert_eq!(g.tracker().frames.len(), 1);
    }

    // ── queue draining and confidence ────────────────────────────────────

    #[test]
    fn newest_frame_wins() {
        let mut queue = vec![
            Polled::Frame(Some(HandLandmarks::with_raised(0))),
            Polled::Other,
            Polled::Frame(Some(HandLandmarks::with_raised(4))),
            Polled::Other,
        ].into_iter();
        let hand = drain_newest(|| queue.next(), MAX_MESSAGES_PER_POLL);
        assert_eq!(hand.map(|h| classify(&h)), Some(Command::Jump));
        assert!(queue.next().is_none());
    }

    #[test]
    fn newest_frame_without_hand_means_no_hand() {
        let mut queue = vec![
            Polled::Frame(Some(HandLandmarks::with_raised(4))),
            Polled::Frame(None),
        ].into_iter();
        assert!(drain_newest(|| queue.next(), MAX_MESSAGES_PER_POLL).is_none());
    }

    #[test]
    fn housekeeping_only_means_no_hand() {
        let mut queue = vec![Polled::Other, Polled::Other].into_iter();
        assert!(drain_newest(|| queue.next(), MAX_MESSAGES_PER_POLL).is_none());
    }

    #[test]
    fn drain_stops_at_limit() {
        let mut pulled = 0;
        let hand = drain_newest(|| {
            pulled += 1;
            Some(Polled::Frame(Some(HandLandmarks::with_raised(2))))
        }, 5);
        assert_eq!(pulled, 5);
        assert_eq!(hand.map(|h| h.raised_fingers()), Some(2));
    }

    #[test]
    fn confidence_threshold() {
        assert!(!is_confident(0.0));
        assert!(!is_confident(0.59));
        assert!(is_confident(MIN_HAND_CONFIDENCE));
        assert!(is_confident(1.0));
    }

    // ── simulation backend ───────────────────────────────────────────────

    #[test]
    fn sim_tracker_follows_latest_input() {
        let (tx, rx) = mpsc::channel();
        let mut g = GestureClassifier::new(SimHandTracker::new(rx));
        assert_eq!(g.command(), Command::Run);

        tx.send(SimInput::Show(4)).unwrap();
        assert_eq!(g.command(), Command::Jump);
        // Held: no new event, same pose
        assert_eq!(g.command(), Command::Jump);

        tx.send(SimInput::Show(2)).unwrap();
        tx.send(SimInput::Show(0)).unwrap();
        assert_eq!(g.command(), Command::Duck);

        tx.send(SimInput::Hide).unwrap();
        assert_eq!(g.command(), Command::Run);
    }

    #[test]
    fn sim_tracker_clamps_finger_count() {
        let (tx, rx) = mpsc::channel();
        let mut t = SimHandTracker::new(rx);
        tx.send(SimInput::Show(9)).unwrap();
        assert_eq!(t.poll().map(|h| h.raised_fingers()), Some(4));
    }

    #[test]
    fn sim_tracker_survives_closed_window() {
        let (tx, rx) = mpsc::channel();
        let mut t = SimHandTracker::new(rx);
        tx.send(SimInput::Show(4)).unwrap();
        drop(tx);
        assert!(t.poll().is_none());
        assert!(t.poll().is_none());
    }
}
