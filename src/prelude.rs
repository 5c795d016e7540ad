//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use emberwick::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Session facade
pub use crate::session::{Session, SessionBuilder};

// Scene scoping
pub use crate::core::state::{PersistenceScope, SceneDirectory, SceneKey, ScenePolicy};

// Quest system
pub use crate::core::quest::{
    QuestCommand, QuestDisplayMode, QuestError, QuestKey, QuestRecord,
};

// Fuel gauge and health
pub use crate::core::fuel::{FuelConfig, Glow, ToggleOutcome};
pub use crate::core::health::HealthOutcome;

// Sequencing
pub use crate::core::sequence::{CompletionFn, FadeTiming, SequenceConfig};

// Simulation clock
pub use crate::core::clock::PauseOwner;

// Host contract
pub use crate::core::host_bridge::{
    CoreEvent, DialogueCue, DialogueExecutor, HostEvent, MessageTint, PresentationSurface,
    SequenceError,
};

// Actors
pub use crate::core::actors::{
    Actor, ActorEnv, ActorId, FuelCache, HealthPotion, LuckyBox, QuestPickup, SpikeTrap,
};
