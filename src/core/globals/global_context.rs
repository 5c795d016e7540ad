//=========================================================================
// Global Context
//=========================================================================
//
// Shared data container for systems and actors.
//
// Contains state data that systems read/write:
// - shared: session scalars surviving scene reloads
// - clock: pause-aware simulation clock
// - scenes/policy: the scene directory and the active scene's policy
// - quest_commands / actor_commands: queues drained at tick boundaries
// - events: outbound notifications for the host
//
//=========================================================================

//=== External Dependencies ===============================================

use log::info;

//=== Internal Dependencies ===============================================

use crate::core::actors::ActorCommand;
use crate::core::clock::SimClock;
use crate::core::command_queue::CommandQueue;
use crate::core::host_bridge::CoreEvent;
use crate::core::quest::{QuestCommand, QuestKey};
use crate::core::state::{PersistenceScope, SceneDirectory, SceneKey, ScenePolicy, SharedStateStore};

//=== GlobalContext =======================================================

/// Shared context data accessible to systems and actors during updates.
///
/// Systems receive `&mut GlobalContext` during their lifecycle methods.
/// This separates system-accessible data from the session's own
/// plumbing (channel, registry).
pub struct GlobalContext<S: SceneKey, Q: QuestKey> {
    /// Session scalars mirrored across scene reloads in shared scopes.
    pub shared: SharedStateStore,

    /// Pause-aware simulation clock.
    pub clock: SimClock,

    /// Per-scene policy table.
    pub scenes: SceneDirectory<S>,

    /// Scene the host last reported as loaded.
    pub active_scene: Option<S>,

    /// Policy of the active scene (transient default before the first
    /// scene load).
    pub policy: ScenePolicy,

    /// Simulation-scaled elapsed seconds, for cooldown bookkeeping.
    pub sim_time: f32,

    /// Quest mutations queued for the tracker.
    pub quest_commands: CommandQueue<QuestCommand<Q>>,

    /// Registry mutations queued for the end of the tick.
    pub actor_commands: CommandQueue<ActorCommand>,

    /// Outbound notifications for the host to drain.
    pub events: CommandQueue<CoreEvent<Q>>,
}

impl<S: SceneKey, Q: QuestKey> GlobalContext<S, Q> {
    /// Creates a fresh context around a scene directory.
    pub fn new(scenes: SceneDirectory<S>) -> Self {
        Self {
            shared: SharedStateStore::new(),
            clock: SimClock::new(),
            scenes,
            active_scene: None,
            policy: ScenePolicy::transient(),
            sim_time: 0.0,
            quest_commands: CommandQueue::new(),
            actor_commands: CommandQueue::new(),
            events: CommandQueue::new(),
        }
    }

    /// Switches the active scene and caches its policy.
    pub fn enter_scene(&mut self, scene: S) {
        self.policy = self.scenes.policy(scene);
        self.active_scene = Some(scene);
        info!(
            "scene {:?} entered (scope {:?}, quest offset {})",
            scene, self.policy.scope, self.policy.quest_offset
        );
    }

    //--- Policy Shortcuts -------------------------------------------------

    pub fn scope(&self) -> PersistenceScope {
        self.policy.scope
    }

    pub fn quest_offset(&self) -> u32 {
        self.policy.quest_offset
    }

    pub fn candle_gated(&self) -> bool {
        self.policy.candle_gated
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
