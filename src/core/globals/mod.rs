//=========================================================================
// Global Session State
//=========================================================================
//
// Separates systems (logic components) from context (shared data).
//
// Architecture:
//   GlobalSystems: QuestTracker + FuelGauge + HealthSystem +
//                  SequenceCoordinator (owned by the session)
//   GlobalContext: SharedStateStore + SimClock + scene policy +
//                  command/event queues (passed to systems and actors)
//
//=========================================================================

//=== Module Declarations =================================================

mod global_context;
mod global_systems;

//=== Public API ==========================================================

pub use global_context::GlobalContext;
pub use global_systems::GlobalSystems;
