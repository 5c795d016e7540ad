//=========================================================================
// Session State
//=========================================================================
//
// Session-persistent scalars and scene scoping.
//
// Architecture:
//   SharedStateStore: process-wide scalars surviving scene reloads
//   SceneDirectory:   scene key -> ScenePolicy (scope, offset, gating)
//
// Only writes performed while the active scene maps to a shared
// persistence scope reach the store; everything else is transient.
//
//=========================================================================

//=== Module Declarations =================================================

mod scene;
mod shared_store;

//=== Public API ==========================================================

pub use scene::{PersistenceScope, SceneDirectory, SceneKey, ScenePolicy};
pub use shared_store::SharedStateStore;
