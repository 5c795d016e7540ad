//=========================================================================
// Host Bridge
//=========================================================================
//
// Bridges the embedding host (renderer, input, scene loader, dialogue
// engine) with the session core.
//
// This module defines the contract between host implementations and
// core logic, so a host can be swapped without changing core code:
// the host pushes HostEvents over a bounded channel, the core drains
// them at tick boundaries and answers with CoreEvents plus query
// methods on the session.
//
// Components:
// - `interface`: event types, collaborator traits, error definitions
// - `event_collector`: core-side event draining and shutdown detection
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
mod interface;

//=== Public API ==========================================================

pub use interface::{
    CoreEvent, DialogueCue, DialogueExecutor, HostEvent, MessageTint, PresentationSurface,
    SequenceError,
};

pub(crate) use event_collector::{EventCollector, TickControl};
