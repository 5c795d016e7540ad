//=========================================================================
// Quest Tracker
//=========================================================================
//
// Owns the fixed objective registry and its completion state machine.
//
// Progress accumulates toward a per-record target; reaching the target
// delegates to completion. Completion is idempotent and recomputes the
// aggregate flag over all non-exempt records. Unknown ids are logged
// and ignored, never fatal.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, error, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::command_queue::CommandQueue;
use crate::core::host_bridge::CoreEvent;

use super::board;
use super::{QuestCommand, QuestDisplayMode, QuestError, QuestKey, QuestRecord};

//=== QuestTracker ========================================================

/// Objective registry with progress counters and completion events.
///
/// Records are loaded once from a fixed registry and never destroyed
/// during a session. Mutations arrive as [`QuestCommand`]s drained at
/// tick boundaries; every successful mutation emits a refresh event so
/// the host can redraw its quest board.
pub struct QuestTracker<Q: QuestKey> {
    records: Vec<QuestRecord<Q>>,
    index: HashMap<Q, usize>,
    required_count: usize,
    objectives_complete: bool,
    display_mode: QuestDisplayMode,
}

impl<Q: QuestKey> QuestTracker<Q> {
    //--- Construction -----------------------------------------------------

    /// Creates an empty tracker. Call [`QuestTracker::register`] once
    /// with the session's registry before use.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
            required_count: 0,
            objectives_complete: false,
            display_mode: QuestDisplayMode::default(),
        }
    }

    /// One-time load of the fixed quest registry.
    ///
    /// Targets below one are clamped up and pre-set counters are
    /// clamped to their target. Registering twice replaces the
    /// registry, which is almost certainly a bug and is logged.
    pub fn register(&mut self, records: Vec<QuestRecord<Q>>) {
        if !self.records.is_empty() {
            warn!("quest registry was already loaded and has been replaced");
            self.index.clear();
            self.objectives_complete = false;
        }

        self.records = records;
        self.required_count = 0;

        for (i, record) in self.records.iter_mut().enumerate() {
            if record.target < 1 {
                warn!("quest {:?} has target {}, clamping to 1", record.id, record.target);
                record.target = 1;
            }
            record.current = record.current.min(record.target);

            if self.index.insert(record.id, i).is_some() {
                warn!("duplicate quest id {:?} in registry, later entry wins", record.id);
            }
            if !record.exempt_from_aggregate {
                self.required_count += 1;
            }
        }

        info!(
            "quest registry loaded: {} records, {} required for the main objective",
            self.records.len(),
            self.required_count
        );
    }

    /// Selects the board projection mode.
    pub fn set_display_mode(&mut self, mode: QuestDisplayMode) {
        self.display_mode = mode;
    }

    //--- Mutation ---------------------------------------------------------

    /// Adds progress toward an objective's target.
    ///
    /// Clamps at the target and delegates to [`QuestTracker::complete`]
    /// when it is reached. Emits a refresh event on every successful
    /// call.
    pub fn add_progress(
        &mut self,
        id: Q,
        amount: u32,
        events: &mut CommandQueue<CoreEvent<Q>>,
    ) -> Result<(), QuestError<Q>> {
        let &i = self.index.get(&id).ok_or(QuestError::UnknownQuest(id))?;

        let record = &mut self.records[i];
        record.current = record.current.saturating_add(amount).min(record.target);
        debug!(
            "quest {:?} progress {}/{}",
            id, record.current, record.target
        );

        if record.current == record.target && !record.completed {
            self.complete(id, events)?;
        } else {
            events.push(CoreEvent::ObjectivesChanged);
        }
        Ok(())
    }

    /// Marks an objective complete.
    ///
    /// Idempotent: completing an already-completed objective is a
    /// silent no-op. First completion emits a completion event plus a
    /// refresh, and recomputes the aggregate flag.
    pub fn complete(
        &mut self,
        id: Q,
        events: &mut CommandQueue<CoreEvent<Q>>,
    ) -> Result<(), QuestError<Q>> {
        let &i = self.index.get(&id).ok_or(QuestError::UnknownQuest(id))?;

        let record = &mut self.records[i];
        if record.completed {
            return Ok(());
        }

        record.completed = true;
        record.current = record.target;
        info!("quest {:?} completed", id);

        events.push(CoreEvent::QuestCompleted(id));
        events.push(CoreEvent::ObjectivesChanged);

        let all_done = self
            .records
            .iter()
            .filter(|r| !r.exempt_from_aggregate)
            .all(|r| r.completed);
        if all_done && !self.objectives_complete {
            self.objectives_complete = true;
            info!("all main objectives complete");
            events.push(CoreEvent::AllObjectivesComplete);
        }
        Ok(())
    }

    /// Drains a batch of queued commands, logging failures and moving on.
    pub fn apply(
        &mut self,
        commands: Vec<QuestCommand<Q>>,
        events: &mut CommandQueue<CoreEvent<Q>>,
    ) {
        for command in commands {
            let result = match command {
                QuestCommand::AddProgress(id, amount) => self.add_progress(id, amount, events),
                QuestCommand::Complete(id) => self.complete(id, events),
            };
            if let Err(e) = result {
                error!("quest command dropped: {}", e);
            }
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Returns whether an objective is complete. Unknown ids read as
    /// false ("not yet blocking") rather than failing.
    pub fn is_done(&self, id: Q) -> bool {
        self.index
            .get(&id)
            .map(|&i| self.records[i].completed)
            .unwrap_or(false)
    }

    /// Returns whether an objective's prerequisite is satisfied.
    /// Objectives without a prerequisite, and unknown ids, are
    /// unlocked.
    pub fn is_unlocked(&self, id: Q) -> bool {
        match self.index.get(&id) {
            Some(&i) => match self.records[i].prerequisite {
                Some(prerequisite) => self.is_done(prerequisite),
                None => true,
            },
            None => true,
        }
    }

    /// True once every non-exempt objective has completed.
    pub fn objectives_complete(&self) -> bool {
        self.objectives_complete
    }

    /// The loaded registry, in display order.
    pub fn records(&self) -> &[QuestRecord<Q>] {
        &self.records
    }

    /// Projects the registry into display lines using the configured
    /// mode and the caller-supplied numbering offset.
    pub fn board_lines(&self, offset: u32) -> Vec<String> {
        board::render(&self.records, self.display_mode, offset)
    }
}

impl<Q: QuestKey> Default for QuestTracker<Q> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
