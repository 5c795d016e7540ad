//=========================================================================
// Quest System
//=========================================================================
//
// Objective tracking and display projection.
//
// Architecture:
//   QuestTracker
//     ├─ records: Vec<QuestRecord<Q>>   (fixed registry, loaded once)
//     └─ index:   HashMap<Q, usize>
//   board: pure projection of the registry into display lines
//
// Flow:
//   actors push QuestCommand → tracker drains at tick boundary
//   tracker emits CoreEvents (completion, refresh, aggregate done)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;

use thiserror::Error;

//=== Module Declarations =================================================

pub mod board;
mod tracker;

//=== Public API ==========================================================

pub use tracker::QuestTracker;

//=== Quest Key Trait =====================================================

/// Marker trait for quest identifiers.
///
/// Typically implemented by a game-specific enum.
///
/// ```rust
/// # use emberwick::core::quest::QuestKey;
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Objective { FindCandle, LightCandle, GatherSupplies }
/// impl QuestKey for Objective {}
/// ```
pub trait QuestKey: Clone + Copy + Eq + Hash + Debug + Send + 'static {}

//=== Quest Record ========================================================

/// One objective in the fixed registry.
///
/// Owned exclusively by the tracker after registration. `current` never
/// exceeds `target`, `target` is at least one, and `completed` only
/// moves from false to true.
#[derive(Debug, Clone)]
pub struct QuestRecord<Q: QuestKey> {
    pub id: Q,
    pub display_name: String,

    /// Objective that must complete before this one unlocks, if any.
    pub prerequisite: Option<Q>,

    /// Required count. One for single-completion objectives; greater
    /// than one makes this a progress quest.
    pub target: u32,

    /// Accumulated count, clamped to `target`.
    pub current: u32,

    pub completed: bool,

    /// Excluded from the aggregate "all objectives complete" flag
    /// (tutorial steps and the like).
    pub exempt_from_aggregate: bool,
}

impl<Q: QuestKey> QuestRecord<Q> {
    /// Creates a single-completion record.
    pub fn new(id: Q, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            prerequisite: None,
            target: 1,
            current: 0,
            completed: false,
            exempt_from_aggregate: false,
        }
    }

    /// Turns this record into a progress quest requiring `target` steps.
    pub fn with_target(mut self, target: u32) -> Self {
        self.target = target;
        self
    }

    /// Requires another objective to complete before this one unlocks.
    pub fn with_prerequisite(mut self, prerequisite: Q) -> Self {
        self.prerequisite = Some(prerequisite);
        self
    }

    /// Excludes this record from the aggregate completion flag.
    pub fn exempt(mut self) -> Self {
        self.exempt_from_aggregate = true;
        self
    }

    /// Returns true for objectives with an accumulated count.
    pub fn is_progress(&self) -> bool {
        self.target > 1
    }
}

//=== Quest Command =======================================================

/// Deferred quest mutation, processed at tick boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestCommand<Q: QuestKey> {
    /// Adds progress toward a progress quest's target.
    AddProgress(Q, u32),

    /// Marks an objective complete.
    Complete(Q),
}

//=== Display Mode ========================================================

/// How the quest board projects the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuestDisplayMode {
    /// Every record at once, completed ones marked.
    #[default]
    AllAtOnce,

    /// Only the earliest incomplete record, or a terminal marker.
    Sequential,
}

//=== Errors ==============================================================

/// Quest operation failures. Never fatal; callers log and continue.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QuestError<Q: QuestKey> {
    /// The referenced id is absent from the registry.
    #[error("unknown quest id: {0:?}")]
    UnknownQuest(Q),
}
