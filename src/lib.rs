//=========================================================================
// Emberwick — Library Root
//
// This crate defines the public API surface of Emberwick, the session
// coordination core for a candle-lit adventure game.
//
// Responsibilities:
// - Expose the session facade (`Session`, `SessionBuilder`)
// - Provide the core systems (quests, fuel gauge, health, sequences)
//   for engine-level extensibility
// - Define the host contract: event channel in, notifications and
//   read queries out, collaborator traits for dialogue and UI
//
// The crate is an embedded logic layer: rendering, collision, input
// polling, and scene loading belong to the host. Typical usage:
// ```no_run
// use emberwick::prelude::*;
//
// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
// enum Level { Garden }
// impl SceneKey for Level {}
//
// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
// enum Objective { FindCandle }
// impl QuestKey for Objective {}
//
// let mut session = SessionBuilder::<Level, Objective>::new().build();
// let events = session.host_sender();
// loop {
//     // host: poll input, detect triggers, then...
//     session.tick(1.0 / 60.0);
//     // host: render session.light_glow(), session.quest_board(), ...
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains all internal session systems and logic (state,
// quests, fuel, sequencing, actors). It is exposed publicly for
// engine-level extensibility, but normal application code will mostly
// use the top-level `Session` facade.
//
pub mod core;

//--- Internal Modules ----------------------------------------------------
//
// `session` defines the main session entry point and tick pipeline.
//
mod session;

//--- Public Exports ------------------------------------------------------
//
// Re-exports the session facade as the main entry point for
// applications, so users can simply `use emberwick::Session;` without
// knowing the internal module structure.
//
pub use session::{Session, SessionBuilder};

pub mod prelude;
