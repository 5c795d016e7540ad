//=========================================================================
// Simulation Clock
//=========================================================================
//
// Pause-aware time scaling for the simulation tick.
//
// The clock multiplier is 0 or 1 and is derived from an owned pause
// token: at most one owner (menu, dialogue, story sequence) may hold
// the token at a time. Conflicting owners check-and-defer rather than
// overwrite each other's pause state.
//
// Presentation sequences advance on the raw delta and bypass this
// clock entirely.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== PauseOwner ==========================================================

/// Identifies the current holder of the pause token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PauseOwner {
    /// Title screen, pause menu, or death screen.
    Menu,

    /// An external dialogue playback.
    Dialogue,

    /// A timed story presentation sequence.
    Story,
}

//=== SimClock ============================================================

/// Simulation clock with a single-owner pause token.
///
/// Holding the token freezes the simulation multiplier to zero.
/// Acquisition is check-and-defer: a second owner cannot steal the
/// token, and release only succeeds for the current holder. This keeps
/// every pause path balanced even when stages overlap.
pub struct SimClock {
    holder: Option<PauseOwner>,
}

impl SimClock {
    /// Creates a running clock with no pause holder.
    pub fn new() -> Self {
        Self { holder: None }
    }

    //--- Token Operations -------------------------------------------------

    /// Attempts to acquire the pause token for `owner`.
    ///
    /// Succeeds when the token is free or already held by the same
    /// owner. Returns false when another owner holds it; the caller
    /// must defer rather than overwrite.
    pub fn acquire(&mut self, owner: PauseOwner) -> bool {
        match self.holder {
            None => {
                self.holder = Some(owner);
                debug!("pause token acquired by {:?}", owner);
                true
            }
            Some(current) if current == owner => true,
            Some(current) => {
                debug!("pause token held by {:?}, {:?} deferred", current, owner);
                false
            }
        }
    }

    /// Releases the pause token if `owner` is the current holder.
    ///
    /// Releasing a token held by someone else (or by nobody) is a
    /// no-op returning false, so unconditional release on every exit
    /// path is safe.
    pub fn release(&mut self, owner: PauseOwner) -> bool {
        if self.holder == Some(owner) {
            self.holder = None;
            debug!("pause token released by {:?}", owner);
            true
        } else {
            false
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Returns the current simulation multiplier (0 while paused, else 1).
    pub fn multiplier(&self) -> f32 {
        if self.holder.is_some() {
            0.0
        } else {
            1.0
        }
    }

    /// Scales a raw frame delta by the current multiplier.
    pub fn scale(&self, dt: f32) -> f32 {
        dt * self.multiplier()
    }

    /// Returns true while any owner holds the pause token.
    pub fn is_paused(&self) -> bool {
        self.holder.is_some()
    }

    /// Returns the current pause holder, if any.
    pub fn holder(&self) -> Option<PauseOwner> {
        self.holder
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
