//=========================================================================
// Scene Scoping
//=========================================================================
//
// Scene identity and the per-scene policy table.
//
// Scene loading itself is external; the core only consumes a scene
// identifier carried by the host's scene-transition signal. The
// identifier selects, through the directory, which persistence scope
// is active, the quest numbering offset, and whether the light toggle
// is candle-gated. No other branching on scene identity belongs in
// the core.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use log::warn;

//=== Scene Key Trait =====================================================

/// Marker trait for scene identifiers.
///
/// Typically implemented by a game-specific enum; replaces string
/// comparisons on scene names.
///
/// ```rust
/// # use emberwick::core::state::SceneKey;
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Level { Garden, Cellar }
/// impl SceneKey for Level {}
/// ```
pub trait SceneKey: Clone + Copy + Eq + Hash + Debug + Send + 'static {}

//=== Persistence Scope ===================================================

/// Which shared-state scope a scene belongs to.
///
/// The two shared scopes mirror their session scalars into the
/// [`super::SharedStateStore`]; transient scenes never touch it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersistenceScope {
    /// No mirroring; state resets on every scene load.
    Transient,

    /// First designated shared scope.
    SharedA,

    /// Second designated shared scope.
    SharedB,
}

impl PersistenceScope {
    /// Returns true for the two designated shared scopes.
    pub fn is_shared(&self) -> bool {
        !matches!(self, PersistenceScope::Transient)
    }
}

//=== Scene Policy ========================================================

/// Per-scene behavior selected by the scene-transition signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenePolicy {
    /// Persistence scope active while this scene runs.
    pub scope: PersistenceScope,

    /// Numbering offset applied to the quest display in this scene.
    pub quest_offset: u32,

    /// Whether the light toggle requires the candle to be obtained.
    pub candle_gated: bool,
}

impl ScenePolicy {
    /// Policy for scenes the directory does not know: transient, zero
    /// offset, ungated.
    pub fn transient() -> Self {
        Self {
            scope: PersistenceScope::Transient,
            quest_offset: 0,
            candle_gated: false,
        }
    }

    pub fn shared_a() -> Self {
        Self {
            scope: PersistenceScope::SharedA,
            quest_offset: 0,
            candle_gated: false,
        }
    }

    pub fn shared_b() -> Self {
        Self {
            scope: PersistenceScope::SharedB,
            quest_offset: 0,
            candle_gated: false,
        }
    }

    /// Sets the quest numbering offset for this scene.
    pub fn with_quest_offset(mut self, offset: u32) -> Self {
        self.quest_offset = offset;
        self
    }

    /// Gates the light toggle on the candle flag in this scene.
    pub fn candle_gated(mut self) -> Self {
        self.candle_gated = true;
        self
    }
}

impl Default for ScenePolicy {
    fn default() -> Self {
        Self::transient()
    }
}

//=== Scene Directory =====================================================

/// Mapping table from scene key to [`ScenePolicy`].
///
/// Unknown scenes resolve to the transient default, so the table only
/// needs entries for the scenes that actually persist or renumber.
pub struct SceneDirectory<S: SceneKey> {
    policies: HashMap<S, ScenePolicy>,
}

impl<S: SceneKey> SceneDirectory<S> {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self {
            policies: HashMap::new(),
        }
    }

    /// Registers a policy for a scene.
    pub fn insert(&mut self, scene: S, policy: ScenePolicy) {
        if self.policies.insert(scene, policy).is_some() {
            warn!("Scene {:?} was already registered and has been replaced", scene);
        }
    }

    /// Resolves the policy for a scene, falling back to the transient
    /// default for unknown keys.
    pub fn policy(&self, scene: S) -> ScenePolicy {
        self.policies
            .get(&scene)
            .copied()
            .unwrap_or_else(ScenePolicy::transient)
    }

    /// Returns the number of registered scenes.
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Returns true if no scenes are registered.
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

impl<S: SceneKey> Default for SceneDirectory<S> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
