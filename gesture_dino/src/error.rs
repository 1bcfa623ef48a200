//! Startup failures.  Anything after startup degrades instead of failing.

use thiserror::Error;

/// A collaborator the game cannot run without was unavailable.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("cannot open the game window: {0}")]
    Window(String),

    #[error("cannot open the hand tracker: {0}")]
    Tracker(String),

    #[error("cannot install the interrupt handler: {0}")]
    Signal(String),
}
