//=========================================================================
// Player Health
//=========================================================================
//
// Clamped hit points with shared-scope persistence.
//
// Damage and healing both clamp into [0, max]. In a shared persistence
// scope the current value is mirrored into the shared store after
// every change, and scene entry reads it back (a stored value of zero
// or below means "no stored value" and falls back to max). Reaching
// zero is terminal for the scene; further damage is ignored.
//
// Hit feedback (sprite flashing, death UI) is the host's concern.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info};

//=== Internal Dependencies ===============================================

use crate::core::state::{PersistenceScope, SharedStateStore};

//=== Outcome =============================================================

/// Result of a health mutation, for the caller to surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthOutcome {
    /// Health changed and the player lives.
    Changed { current: i32 },

    /// Health reached zero on this change.
    Died,

    /// A positive heal was refused because health is already full.
    AlreadyFull,

    /// The player is already dead; the change was dropped.
    Ignored,
}

//=== HealthSystem ========================================================

/// The player's hit points.
pub struct HealthSystem {
    current: i32,
    max: i32,
}

impl HealthSystem {
    /// Creates a full health pool. A non-positive maximum is clamped
    /// up to one.
    pub fn new(max: i32) -> Self {
        let max = max.max(1);
        Self { current: max, max }
    }

    /// Re-enters a scene: in a shared scope the stored value is picked
    /// up (falling back to max when nothing useful is stored),
    /// otherwise health resets to max.
    pub fn sync_from_shared(&mut self, scope: PersistenceScope, shared: &SharedStateStore) {
        self.current = if scope.is_shared() && shared.health() > 0 {
            shared.health().min(self.max)
        } else {
            self.max
        };
    }

    //--- Operations -------------------------------------------------------

    /// Applies damage, clamping at zero.
    pub fn damage(
        &mut self,
        amount: i32,
        scope: PersistenceScope,
        shared: &mut SharedStateStore,
    ) -> HealthOutcome {
        if self.current <= 0 {
            return HealthOutcome::Ignored;
        }

        self.current = (self.current - amount).max(0);
        self.mirror(scope, shared);
        debug!("player damaged, {} of {} remaining", self.current, self.max);

        if self.current == 0 {
            info!("player died");
            HealthOutcome::Died
        } else {
            HealthOutcome::Changed {
                current: self.current,
            }
        }
    }

    /// Applies healing, clamping at max.
    ///
    /// A positive heal on a full pool is refused so the caller can keep
    /// the consumable. Negative amounts drain and can kill (the lucky
    /// box uses this path).
    pub fn heal(
        &mut self,
        amount: i32,
        scope: PersistenceScope,
        shared: &mut SharedStateStore,
    ) -> HealthOutcome {
        if amount > 0 && self.current >= self.max {
            return HealthOutcome::AlreadyFull;
        }

        self.current = (self.current + amount).clamp(0, self.max);
        self.mirror(scope, shared);
        debug!("player healed, {} of {} remaining", self.current, self.max);

        if self.current == 0 {
            info!("player died");
            HealthOutcome::Died
        } else {
            HealthOutcome::Changed {
                current: self.current,
            }
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }

    //--- Internals --------------------------------------------------------

    fn mirror(&self, scope: PersistenceScope, shared: &mut SharedStateStore) {
        if scope.is_shared() {
            shared.set_health(self.current);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_full() {
        let health = HealthSystem::new(3);
        assert_eq!(health.current(), 3);
        assert!(health.is_full());
        assert!(!health.is_dead());
    }

    #[test]
    fn damage_clamps_at_zero_and_reports_death() {
        let mut health = HealthSystem::new(3);
        let mut shared = SharedStateStore::new();

        let outcome = health.damage(5, PersistenceScope::Transient, &mut shared);
        assert_eq!(outcome, HealthOutcome::Died);
        assert_eq!(health.current(), 0);

        // Dead players take no further damage.
        let outcome = health.damage(1, PersistenceScope::Transient, &mut shared);
        assert_eq!(outcome, HealthOutcome::Ignored);
    }

    #[test]
    fn heal_refused_when_full() {
        let mut health = HealthSystem::new(3);
        let mut shared = SharedStateStore::new();

        let outcome = health.heal(1, PersistenceScope::Transient, &mut shared);
        assert_eq!(outcome, HealthOutcome::AlreadyFull);
    }

    #[test]
    fn heal_clamps_at_max() {
        let mut health = HealthSystem::new(3);
        let mut shared = SharedStateStore::new();
        health.damage(1, PersistenceScope::Transient, &mut shared);

        let outcome = health.heal(5, PersistenceScope::Transient, &mut shared);
        assert_eq!(outcome, HealthOutcome::Changed { current: 3 });
    }

    #[test]
    fn negative_heal_can_kill() {
        let mut health = HealthSystem::new(1);
        let mut shared = SharedStateStore::new();

        let outcome = health.heal(-1, PersistenceScope::Transient, &mut shared);
        assert_eq!(outcome, HealthOutcome::Died);
    }

    #[test]
    fn shared_scope_mirrors_and_restores() {
        let mut health = HealthSystem::new(3);
        let mut shared = SharedStateStore::new();

        health.damage(1, PersistenceScope::SharedA, &mut shared);
        assert_eq!(shared.health(), 2);

        // Simulated scope re-entry.
        let mut reloaded = HealthSystem::new(3);
        reloaded.sync_from_shared(PersistenceScope::SharedB, &shared);
        assert_eq!(reloaded.current(), 2);
    }

    #[test]
    fn transient_scope_resets_to_max() {
        let mut shared = SharedStateStore::new();
        shared.set_health(1);

        let mut health = HealthSystem::new(3);
        health.sync_from_shared(PersistenceScope::Transient, &shared);
        assert_eq!(health.current(), 3);
    }

    #[test]
    fn empty_store_falls_back_to_max() {
        let shared = SharedStateStore::new();
        let mut health = HealthSystem::new(3);
        health.sync_from_shared(PersistenceScope::SharedA, &shared);
        assert_eq!(health.current(), 3);
    }
}
