//=========================================================================
// Actors
//=========================================================================
//
// Thin collectible and trigger actors.
//
// Architecture:
//   ActorRegistry
//     ├─ actors: HashMap<ActorId, Box<dyn Actor>>
//     └─ removals via queued ActorCommands at tick boundaries
//
// Actors contain no independent logic worth owning: they translate
// host-detected interactions into calls on the core services handed
// to them through ActorEnv. Collision and input detection stay on the
// host side; the core only sees enter/exit/interact intents addressed
// by ActorId.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::clock::PauseOwner;
use crate::core::fuel::FuelGauge;
use crate::core::globals::GlobalContext;
use crate::core::health::{HealthOutcome, HealthSystem};
use crate::core::host_bridge::{CoreEvent, MessageTint, PresentationSurface};
use crate::core::quest::{QuestCommand, QuestKey, QuestTracker};
use crate::core::sequence::SequenceCoordinator;
use crate::core::state::SceneKey;

//=== Module Declarations =================================================

mod fuel_cache;
mod lucky_box;
mod pickup;
mod potion;
mod trap;

//=== Public API ==========================================================

pub use fuel_cache::FuelCache;
pub use lucky_box::LuckyBox;
pub use pickup::QuestPickup;
pub use potion::HealthPotion;
pub use trap::SpikeTrap;

//=== ActorId =============================================================

/// Handle addressing a registered actor.
///
/// The host keeps the id returned at spawn time and uses it in its
/// trigger and interaction events; scene-wide lookups do not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorId(pub(crate) u32);

//=== ActorCommand ========================================================

/// Deferred registry mutation, processed at tick boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorCommand {
    /// Removes an actor from the registry (the collected item
    /// disappears from the world).
    Remove(ActorId),
}

//=== ActorEnv ============================================================

/// Core services handed to an actor hook for the duration of one call.
pub struct ActorEnv<'a, S: SceneKey, Q: QuestKey> {
    pub id: ActorId,
    pub context: &'a mut GlobalContext<S, Q>,
    pub quests: &'a QuestTracker<Q>,
    pub fuel: &'a mut FuelGauge,
    pub health: &'a mut HealthSystem,
    pub sequences: &'a mut SequenceCoordinator<S, Q>,
    pub presenter: Option<&'a mut dyn PresentationSurface>,
}

impl<'a, S: SceneKey, Q: QuestKey> ActorEnv<'a, S, Q> {
    //--- Presentation -----------------------------------------------------

    /// Shows the interaction notification, or logs when no surface is
    /// configured.
    pub fn notify(&mut self, message: &str, urgent: bool) {
        match self.presenter.as_deref_mut() {
            Some(surface) => surface.show_notification(message, urgent),
            None => warn!("no presentation surface, dropping notification: {}", message),
        }
    }

    pub fn hide_notification(&mut self) {
        if let Some(surface) = self.presenter.as_deref_mut() {
            surface.hide_notification();
        }
    }

    /// Spawns a floating message, or logs when no surface is
    /// configured.
    pub fn floating(&mut self, position: (f32, f32), text: &str, tint: MessageTint) {
        match self.presenter.as_deref_mut() {
            Some(surface) => surface.show_floating_message(position, text, tint),
            None => warn!("no presentation surface, dropping message: {}", text),
        }
    }

    //--- Quest Shortcuts --------------------------------------------------

    pub fn add_progress(&mut self, quest: Q, amount: u32) {
        self.context
            .quest_commands
            .push(QuestCommand::AddProgress(quest, amount));
    }

    pub fn complete_quest(&mut self, quest: Q) {
        self.context.quest_commands.push(QuestCommand::Complete(quest));
    }

    /// Queues this actor's removal at the end of the tick.
    pub fn remove_self(&mut self) {
        self.context.actor_commands.push(ActorCommand::Remove(self.id));
    }

    //--- Resource Shortcuts -----------------------------------------------

    /// Adjusts fuel by a fraction of the full duration (positive
    /// restores).
    pub fn restore_fuel(&mut self, fraction: f32) {
        let scope = self.context.policy.scope;
        self.fuel.restore(fraction, scope, &mut self.context.shared);
    }

    pub fn damage_player(&mut self, amount: i32) -> HealthOutcome {
        let scope = self.context.policy.scope;
        let outcome = self.health.damage(amount, scope, &mut self.context.shared);
        self.publish_health(outcome);
        outcome
    }

    pub fn heal_player(&mut self, amount: i32) -> HealthOutcome {
        let scope = self.context.policy.scope;
        let outcome = self.health.heal(amount, scope, &mut self.context.shared);
        self.publish_health(outcome);
        outcome
    }

    fn publish_health(&mut self, outcome: HealthOutcome) {
        match outcome {
            HealthOutcome::Changed { current } => {
                self.context.events.push(CoreEvent::HealthChanged {
                    current,
                    max: self.health.max(),
                });
            }
            HealthOutcome::Died => {
                self.context.events.push(CoreEvent::HealthChanged {
                    current: 0,
                    max: self.health.max(),
                });
                self.context.events.push(CoreEvent::PlayerDied);
                // The death screen is modal. If another owner already
                // holds the token the clock is frozen regardless.
                self.context.clock.acquire(PauseOwner::Menu);
            }
            HealthOutcome::AlreadyFull | HealthOutcome::Ignored => {}
        }
    }
}

//=== Actor Trait =========================================================

/// Defines actor behavior through lifecycle hooks.
///
/// All hooks have default empty implementations; an actor overrides
/// the ones its behavior needs.
pub trait Actor<S: SceneKey, Q: QuestKey>: Send {
    /// Called once when the actor is spawned. Returning false drops it
    /// immediately (e.g. a one-shot pickup already collected on a
    /// previous visit).
    fn on_spawn(&mut self, _env: &mut ActorEnv<S, Q>) -> bool {
        true
    }

    /// Called when the player enters the actor's trigger range.
    fn on_player_enter(&mut self, _env: &mut ActorEnv<S, Q>) {}

    /// Called when the player leaves the actor's trigger range.
    fn on_player_exit(&mut self, _env: &mut ActorEnv<S, Q>) {}

    /// Called when the player interacts with the actor while in range.
    fn on_interact(&mut self, _env: &mut ActorEnv<S, Q>) {}
}

//=== ActorRegistry =======================================================

/// Owns the live actors and hands them out for dispatch.
///
/// Dispatch takes the actor out of the map for the duration of the
/// hook so the hook can freely borrow the rest of the core, then puts
/// it back. Removals queue as commands and apply at the tick boundary.
pub struct ActorRegistry<S: SceneKey, Q: QuestKey> {
    actors: HashMap<ActorId, Box<dyn Actor<S, Q>>>,
    next_id: u32,
}

impl<S: SceneKey, Q: QuestKey> ActorRegistry<S, Q> {
    pub fn new() -> Self {
        Self {
            actors: HashMap::new(),
            next_id: 0,
        }
    }

    /// Reserves a fresh id for a spawning actor.
    pub fn reserve(&mut self) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Stores an actor under a reserved id.
    pub fn insert(&mut self, id: ActorId, actor: Box<dyn Actor<S, Q>>) {
        if self.actors.insert(id, actor).is_some() {
            warn!("Actor {:?} was already registered and has been replaced", id);
        }
    }

    /// Takes an actor out for dispatch.
    pub fn take(&mut self, id: ActorId) -> Option<Box<dyn Actor<S, Q>>> {
        self.actors.remove(&id)
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Applies a batch of queued registry commands.
    pub fn apply(&mut self, commands: Vec<ActorCommand>) {
        for command in commands {
            match command {
                ActorCommand::Remove(id) => {
                    if self.actors.remove(&id).is_some() {
                        debug!("actor {:?} removed", id);
                    }
                }
            }
        }
    }
}

impl<S: SceneKey, Q: QuestKey> Default for ActorRegistry<S, Q> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Test Support
//=========================================================================


//=========================================================================
// Unit Tests
//=========================================================================
