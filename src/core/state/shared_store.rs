//=========================================================================
// Shared State Store
//=========================================================================
//
// In-memory scalars that survive scene reloads within the shared
// persistence scopes: player health, the light fuel timer, and the
// one-shot candle flag.
//
// The store itself performs no scope checks; writers guard on the
// active PersistenceScope before mirroring values in. Nothing here is
// ever written to disk.
//
//=========================================================================

//=== SharedStateStore ====================================================

/// Process-wide session scalars.
///
/// Accessors never fail and perform no validation; clamping is the
/// caller's responsibility. Single logical thread of access, so no
/// locking is required.
pub struct SharedStateStore {
    health: i32,
    fuel_timer: f32,
    candle_obtained: bool,
}

impl SharedStateStore {
    /// Creates a store with session defaults.
    ///
    /// Health starts at zero, which readers treat as "no stored value"
    /// and replace with their own maximum on first scene entry.
    pub fn new() -> Self {
        Self {
            health: 0,
            fuel_timer: 0.0,
            candle_obtained: false,
        }
    }

    //--- Health -----------------------------------------------------------

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn set_health(&mut self, health: i32) {
        self.health = health;
    }

    //--- Fuel Timer -------------------------------------------------------

    pub fn fuel_timer(&self) -> f32 {
        self.fuel_timer
    }

    pub fn set_fuel_timer(&mut self, timer: f32) {
        self.fuel_timer = timer;
    }

    //--- Candle Flag ------------------------------------------------------

    pub fn candle_obtained(&self) -> bool {
        self.candle_obtained
    }

    /// Marks the candle as obtained. The flag is one-way; there is no
    /// setter that clears it.
    pub fn mark_candle_obtained(&mut self) {
        self.candle_obtained = true;
    }
}

impl Default for SharedStateStore {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
