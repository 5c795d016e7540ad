//=========================================================================
// Fuel Gauge
//=========================================================================
//
// Consumable timer for the player's light.
//
// State machine: Off -> On (toggle, candle-gated in tutorial scenes),
// On -> Off (toggle or depletion), On -> Depleted (timer reaches the
// duration), Depleted -> Off (restore only).
//
// The timer counts consumed fuel, so zero is a full wick. While lit,
// glow radius and intensity interpolate linearly from their start to
// end bounds as fuel burns. In a shared persistence scope the timer is
// mirrored into the shared store after every mutation so it survives
// scene reloads.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::state::{PersistenceScope, SharedStateStore};

//=== Configuration =======================================================

/// Tuning for the gauge and its glow interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelConfig {
    /// Seconds of burn time on a full wick.
    pub duration: f32,

    /// Glow radius on a full wick.
    pub start_radius: f32,

    /// Glow radius at depletion.
    pub end_radius: f32,

    /// Glow intensity on a full wick.
    pub start_intensity: f32,

    /// Glow intensity at depletion.
    pub end_intensity: f32,
}

impl Default for FuelConfig {
    fn default() -> Self {
        Self {
            duration: 60.0,
            start_radius: 6.6,
            end_radius: 1.5,
            start_intensity: 1.0,
            end_intensity: 0.5,
        }
    }
}

//=== Glow ================================================================

/// Interpolated presentation parameters for the host's light renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub radius: f32,
    pub intensity: f32,
}

//=== Toggle Outcome ======================================================

/// Result of a toggle request, for the session glue to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The light turned on. `first_ignition` is set the very first time
    /// in the session, which drives the tutorial completion.
    Ignited { first_ignition: bool },

    /// The light turned off.
    Extinguished,

    /// The wick is spent; restore first.
    BlockedDepleted,

    /// The candle has not been obtained yet in a gated scene.
    BlockedNoCandle,
}

//=== FuelGauge ===========================================================

/// The light fuel gauge.
///
/// `timer` measures consumed seconds in `[0, duration]`; the gauge is
/// depleted at `duration` and full at zero. A depleted gauge cannot be
/// lit until restored, and a full drain leaves the gauge depleted
/// rather than lit with an empty wick.
pub struct FuelGauge {
    timer: f32,
    config: FuelConfig,
    lit: bool,
    depleted: bool,
    glow: Glow,
    has_ignited: bool,
}

/// Below this much consumed fuel the gauge counts as full.
const FULL_EPSILON: f32 = 0.001;

impl FuelGauge {
    //--- Construction -----------------------------------------------------

    /// Creates an unlit gauge with a full wick.
    ///
    /// A non-positive duration is clamped up to a minimal burn time
    /// instead of being surfaced as an error.
    pub fn new(mut config: FuelConfig) -> Self {
        if config.duration <= 0.0 {
            debug!("fuel duration {} clamped to minimum", config.duration);
            config.duration = FULL_EPSILON;
        }
        let glow = Glow {
            radius: config.start_radius,
            intensity: config.start_intensity,
        };
        Self {
            timer: 0.0,
            config,
            lit: false,
            depleted: false,
            glow,
            has_ignited: false,
        }
    }

    /// Re-enters a scene: the light goes out, and the timer is restored
    /// from the shared store in a shared scope or reset otherwise.
    pub fn sync_from_shared(&mut self, scope: PersistenceScope, shared: &SharedStateStore) {
        self.timer = if scope.is_shared() {
            shared.fuel_timer().clamp(0.0, self.config.duration)
        } else {
            0.0
        };
        self.lit = false;
        self.depleted = self.timer >= self.config.duration;
        self.update_glow();
    }

    //--- Operations -------------------------------------------------------

    /// Requests a toggle.
    ///
    /// Turning on is refused while depleted, and in candle-gated scenes
    /// until the candle flag is set. Turning off always succeeds.
    pub fn toggle(&mut self, candle_gated: bool, candle_obtained: bool) -> ToggleOutcome {
        if self.lit {
            self.lit = false;
            debug!("light extinguished with {:.1}s consumed", self.timer);
            return ToggleOutcome::Extinguished;
        }

        if self.depleted {
            return ToggleOutcome::BlockedDepleted;
        }
        if candle_gated && !candle_obtained {
            return ToggleOutcome::BlockedNoCandle;
        }

        self.lit = true;
        let first_ignition = !self.has_ignited;
        self.has_ignited = true;
        debug!("light ignited, {:.1}s consumed so far", self.timer);
        ToggleOutcome::Ignited { first_ignition }
    }

    /// Advances consumption by a simulation-scaled delta.
    ///
    /// No-op unless lit. Returns true on the tick that depletes the
    /// wick, which also forces the light off.
    pub fn tick(
        &mut self,
        dt: f32,
        scope: PersistenceScope,
        shared: &mut SharedStateStore,
    ) -> bool {
        if !self.lit || self.depleted || dt <= 0.0 {
            return false;
        }

        self.timer = (self.timer + dt).clamp(0.0, self.config.duration);
        self.update_glow();
        self.mirror(scope, shared);

        if self.ratio() >= 1.0 {
            self.lit = false;
            self.depleted = true;
            debug!("light depleted");
            return true;
        }
        false
    }

    /// Restores (or drains) fuel by a fraction of the full duration.
    ///
    /// Sign convention: a positive fraction restores fuel, a negative
    /// fraction drains it. Clears the depleted state, except that a
    /// drain all the way to empty re-depletes the gauge.
    pub fn restore(
        &mut self,
        fraction: f32,
        scope: PersistenceScope,
        shared: &mut SharedStateStore,
    ) {
        self.depleted = false;

        let adjustment = -fraction * self.config.duration;
        self.timer = (self.timer + adjustment).clamp(0.0, self.config.duration);
        self.update_glow();
        self.mirror(scope, shared);

        if self.ratio() >= 1.0 {
            self.lit = false;
            self.depleted = true;
        }
        debug!(
            "fuel adjusted by {:+.0}%, {:.1}s consumed",
            fraction * 100.0,
            self.timer
        );
    }

    //--- Queries ----------------------------------------------------------

    /// Returns true when the wick is (almost exactly) full.
    pub fn is_full(&self) -> bool {
        self.timer <= FULL_EPSILON
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn is_depleted(&self) -> bool {
        self.depleted
    }

    /// Remaining fuel as a fraction in `[0, 1]`, for the gauge UI.
    pub fn remaining_ratio(&self) -> f32 {
        1.0 - self.ratio()
    }

    /// Full burn time in seconds.
    pub fn duration(&self) -> f32 {
        self.config.duration
    }

    /// Current glow parameters for the light renderer.
    pub fn glow(&self) -> Glow {
        self.glow
    }

    //--- Internals --------------------------------------------------------

    fn ratio(&self) -> f32 {
        (self.timer / self.config.duration).clamp(0.0, 1.0)
    }

    fn update_glow(&mut self) {
        let t = self.ratio();
        self.glow = Glow {
            radius: lerp(self.config.start_radius, self.config.end_radius, t),
            intensity: lerp(self.config.start_intensity, self.config.end_intensity, t),
        };
    }

    fn mirror(&self, scope: PersistenceScope, shared: &mut SharedStateStore) {
        if scope.is_shared() {
            shared.set_fuel_timer(self.timer);
        }
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn gauge() -> FuelGauge {
        FuelGauge::new(FuelConfig::default())
    }

    fn light(gauge: &mut FuelGauge) {
        assert!(matches!(
            gauge.toggle(false, false),
            ToggleOutcome::Ignited { .. }
        ));
    }

    #[test]
    fn new_gauge_is_full_and_unlit() {
        let gauge = gauge();
        assert!(gauge.is_full());
        assert!(!gauge.is_lit());
        assert!(!gauge.is_depleted());
        assert_eq!(gauge.remaining_ratio(), 1.0);
    }

    #[test]
    fn burning_the_whole_wick_depletes() {
        let mut gauge = gauge();
        let mut shared = SharedStateStore::new();
        light(&mut gauge);

        let depleted = gauge.tick(60.0, PersistenceScope::Transient, &mut shared);

        assert!(depleted);
        assert!(!gauge.is_lit());
        assert!(gauge.is_depleted());
        assert_eq!(gauge.remaining_ratio(), 0.0);
    }

    #[test]
    fn full_restore_round_trips_depletion() {
        let mut gauge = gauge();
        let mut shared = SharedStateStore::new();
        light(&mut gauge);
        gauge.tick(60.0, PersistenceScope::Transient, &mut shared);

        gauge.restore(1.0, PersistenceScope::Transient, &mut shared);

        assert!(gauge.is_full());
        assert!(!gauge.is_depleted());
    }

    #[test]
    fn partial_restore_from_empty() {
        let mut gauge = gauge();
        let mut shared = SharedStateStore::new();
        light(&mut gauge);
        gauge.tick(60.0, PersistenceScope::Transient, &mut shared);

        // A quarter of a 60 second wick is 15 seconds back.
        gauge.restore(0.25, PersistenceScope::Transient, &mut shared);

        assert!((gauge.remaining_ratio() - 0.25).abs() < 1e-6);
        assert!(!gauge.is_depleted());
    }

    #[test]
    fn toggle_is_refused_while_depleted() {
        let mut gauge = gauge();
        let mut shared = SharedStateStore::new();
        light(&mut gauge);
        gauge.tick(60.0, PersistenceScope::Transient, &mut shared);

        assert_eq!(gauge.toggle(false, false), ToggleOutcome::BlockedDepleted);
        assert!(!gauge.is_lit());
        assert!(gauge.is_depleted());
    }

    #[test]
    fn toggle_is_refused_without_the_candle_in_gated_scenes() {
        let mut gauge = gauge();
        assert_eq!(gauge.toggle(true, false), ToggleOutcome::BlockedNoCandle);
        assert!(matches!(
            gauge.toggle(true, true),
            ToggleOutcome::Ignited { .. }
        ));
    }

    #[test]
    fn first_ignition_is_reported_once() {
        let mut gauge = gauge();
        assert_eq!(
            gauge.toggle(false, false),
            ToggleOutcome::Ignited { first_ignition: true }
        );
        assert_eq!(gauge.toggle(false, false), ToggleOutcome::Extinguished);
        assert_eq!(
            gauge.toggle(false, false),
            ToggleOutcome::Ignited { first_ignition: false }
        );
    }

    #[test]
    fn ticking_while_unlit_consumes_nothing() {
        let mut gauge = gauge();
        let mut shared = SharedStateStore::new();

        gauge.tick(10.0, PersistenceScope::Transient, &mut shared);
        assert!(gauge.is_full());
    }

    #[test]
    fn shared_scope_mirrors_the_timer() {
        let mut gauge = gauge();
        let mut shared = SharedStateStore::new();
        light(&mut gauge);

        gauge.tick(5.0, PersistenceScope::SharedA, &mut shared);
        assert_eq!(shared.fuel_timer(), 5.0);

        // Simulated scope re-entry picks the value back up.
        let mut reloaded = FuelGauge::new(FuelConfig::default());
        reloaded.sync_from_shared(PersistenceScope::SharedB, &shared);
        assert!((reloaded.remaining_ratio() - (55.0 / 60.0)).abs() < 1e-6);
    }

    #[test]
    fn transient_scope_does_not_persist() {
        let mut gauge = gauge();
        let mut shared = SharedStateStore::new();
        light(&mut gauge);

        gauge.tick(5.0, PersistenceScope::Transient, &mut shared);
        assert_eq!(shared.fuel_timer(), 0.0);

        let mut reloaded = FuelGauge::new(FuelConfig::default());
        reloaded.sync_from_shared(PersistenceScope::Transient, &shared);
        assert!(reloaded.is_full());
    }

    #[test]
    fn glow_interpolates_toward_the_end_bounds() {
        let mut gauge = gauge();
        let mut shared = SharedStateStore::new();
        light(&mut gauge);

        gauge.tick(30.0, PersistenceScope::Transient, &mut shared);

        let glow = gauge.glow();
        assert!((glow.radius - (6.6 + 1.5) / 2.0).abs() < 1e-4);
        assert!((glow.intensity - 0.75).abs() < 1e-4);
    }

    #[test]
    fn full_drain_leaves_the_gauge_depleted() {
        let mut gauge = gauge();
        let mut shared = SharedStateStore::new();
        light(&mut gauge);

        gauge.restore(-1.0, PersistenceScope::Transient, &mut shared);

        assert!(gauge.is_depleted());
        assert!(!gauge.is_lit());
    }
}
