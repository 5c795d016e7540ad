//=========================================================================
// Sequence Coordinator
//=========================================================================
//
// Chains an optional timed story overlay and an optional dialogue into
// exactly one completion callback.
//
// A sequence is an explicit state machine advanced by tick, not a
// coroutine: suspension points are the story phase boundaries and the
// dialogue's active flag, and the caller resumes through the stored
// callback, never by polling. The story stage holds the pause token
// for its whole duration and advances on the raw (unscaled) delta, so
// it keeps playing while the simulation is frozen. The token is
// released unconditionally when the story ends, before the dialogue
// stage starts.
//
// There is no cancellation: a started sequence runs to completion.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::clock::PauseOwner;
use crate::core::globals::GlobalContext;
use crate::core::host_bridge::{DialogueCue, DialogueExecutor, SequenceError};
use crate::core::quest::QuestKey;
use crate::core::state::SceneKey;

use super::{FadeTiming, SequenceConfig};

//=== Completion Callback =================================================

/// Terminal action of a sequence. Invoked exactly once with the
/// global context, typically to queue quest progress and the owning
/// actor's removal.
pub type CompletionFn<S, Q> = Box<dyn FnOnce(&mut GlobalContext<S, Q>) + Send>;

//=== Story Phases ========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoryPhase {
    FadeIn,
    Hold,
    FadeOut,
}

enum Stage {
    Story {
        timing: FadeTiming,
        elapsed: f32,
        phase: StoryPhase,
        alpha: f32,
    },
    Dialogue,
}

struct ActiveSequence<S: SceneKey, Q: QuestKey> {
    stage: Stage,
    dialogue: Option<DialogueCue>,
    on_complete: Option<CompletionFn<S, Q>>,
}

//=== SequenceCoordinator =================================================

/// Runs at most one presentation/dialogue chain at a time.
pub struct SequenceCoordinator<S: SceneKey, Q: QuestKey> {
    executor: Option<Box<dyn DialogueExecutor>>,
    active: Option<ActiveSequence<S, Q>>,
}

impl<S: SceneKey, Q: QuestKey> SequenceCoordinator<S, Q> {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self {
            executor: None,
            active: None,
        }
    }

    /// Installs the dialogue collaborator. Without one, dialogue
    /// stages are skipped with a warning.
    pub fn set_executor(&mut self, executor: Box<dyn DialogueExecutor>) {
        self.executor = Some(executor);
    }

    //--- Starting a Sequence ----------------------------------------------

    /// Starts a chained execution.
    ///
    /// Stages absent from the config are skipped; with nothing to run
    /// the callback fires immediately, inside this call. A story stage
    /// acquires the pause token; if another owner holds it the whole
    /// sequence is refused so the caller can retry later.
    pub fn begin(
        &mut self,
        ctx: &mut GlobalContext<S, Q>,
        config: SequenceConfig,
        on_complete: CompletionFn<S, Q>,
    ) -> Result<(), SequenceError> {
        if self.active.is_some() {
            return Err(SequenceError::Busy);
        }

        match config.story {
            Some(timing) => {
                if !ctx.clock.acquire(PauseOwner::Story) {
                    let holder = ctx.clock.holder().unwrap_or(PauseOwner::Story);
                    return Err(SequenceError::PauseContended(holder));
                }
                debug!("story sequence started ({:.1}s total)", timing.total());
                self.active = Some(ActiveSequence {
                    stage: Stage::Story {
                        timing: timing.sanitized(),
                        elapsed: 0.0,
                        phase: StoryPhase::FadeIn,
                        alpha: 0.0,
                    },
                    dialogue: config.dialogue,
                    on_complete: Some(on_complete),
                });
                Ok(())
            }
            None => {
                self.enter_dialogue_stage(ctx, config.dialogue, Some(on_complete));
                Ok(())
            }
        }
    }

    /// Runs just a story overlay, then completes.
    pub fn play_story(
        &mut self,
        ctx: &mut GlobalContext<S, Q>,
        timing: FadeTiming,
        on_complete: CompletionFn<S, Q>,
    ) -> Result<(), SequenceError> {
        self.begin(ctx, SequenceConfig::new().with_story(timing), on_complete)
    }

    /// Runs just a dialogue, then completes. An absent cue completes
    /// immediately.
    pub fn play_dialogue(
        &mut self,
        ctx: &mut GlobalContext<S, Q>,
        cue: Option<DialogueCue>,
        on_complete: CompletionFn<S, Q>,
    ) -> Result<(), SequenceError> {
        let config = SequenceConfig {
            story: None,
            dialogue: cue,
        };
        self.begin(ctx, config, on_complete)
    }

    //--- Advancing --------------------------------------------------------

    /// Advances the active sequence by a raw frame delta.
    ///
    /// Must be called with the unscaled delta: story overlays play
    /// while the simulation clock is frozen.
    pub fn tick(&mut self, dt: f32, ctx: &mut GlobalContext<S, Q>) {
        let mut story_done = false;

        if let Some(seq) = self.active.as_mut() {
            if let Stage::Story {
                timing,
                elapsed,
                phase,
                alpha,
            } = &mut seq.stage
            {
                *elapsed += dt.max(0.0);
                match phase_at(timing, *elapsed) {
                    Some(next) => {
                        if *phase != next {
                            debug!("story phase {:?} -> {:?}", *phase, next);
                            *phase = next;
                        }
                        *alpha = alpha_at(timing, *elapsed);
                    }
                    None => story_done = true,
                }
            }
        }

        if story_done {
            // The overlay is gone whatever happens next.
            ctx.clock.release(PauseOwner::Story);
            debug!("story sequence finished");
            if let Some(seq) = self.active.take() {
                self.enter_dialogue_stage(ctx, seq.dialogue, seq.on_complete);
            }
            return;
        }

        let in_dialogue = matches!(
            self.active.as_ref().map(|seq| &seq.stage),
            Some(Stage::Dialogue)
        );
        if in_dialogue && !self.dialogue_active() {
            if let Some(seq) = self.active.take() {
                debug!("dialogue finished");
                if let Some(callback) = seq.on_complete {
                    callback(ctx);
                }
            }
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Overlay opacity while a story stage runs, for the host renderer.
    pub fn story_alpha(&self) -> Option<f32> {
        match self.active.as_ref().map(|seq| &seq.stage) {
            Some(Stage::Story { alpha, .. }) => Some(*alpha),
            _ => None,
        }
    }

    /// Returns true while the dialogue collaborator is playing.
    pub fn dialogue_active(&self) -> bool {
        self.executor
            .as_ref()
            .map(|executor| executor.is_active())
            .unwrap_or(false)
    }

    /// Pause-menu input is blocked while a sequence or dialogue runs.
    pub fn blocks_menu(&self) -> bool {
        self.active.is_some() || self.dialogue_active()
    }

    /// Returns true while a sequence is running.
    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    //--- Internals --------------------------------------------------------

    /// Enters the dialogue stage, or terminates the chain when there
    /// is nothing left to run.
    fn enter_dialogue_stage(
        &mut self,
        ctx: &mut GlobalContext<S, Q>,
        dialogue: Option<DialogueCue>,
        on_complete: Option<CompletionFn<S, Q>>,
    ) {
        if let Some(cue) = dialogue {
            match self.executor.as_mut() {
                Some(executor) => {
                    executor.start_dialogue(&cue);
                    debug!("dialogue {:?} started", cue.0);
                    self.active = Some(ActiveSequence {
                        stage: Stage::Dialogue,
                        dialogue: None,
                        on_complete,
                    });
                    return;
                }
                None => {
                    warn!("no dialogue executor configured, skipping {:?}", cue.0);
                }
            }
        }

        self.active = None;
        if let Some(callback) = on_complete {
            callback(ctx);
        }
    }
}

impl<S: SceneKey, Q: QuestKey> Default for SequenceCoordinator<S, Q> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Phase Math ==========================================================

/// Phase the story is in after `t` seconds; None once it is over.
fn phase_at(timing: &FadeTiming, t: f32) -> Option<StoryPhase> {
    if t < timing.fade_in {
        Some(StoryPhase::FadeIn)
    } else if t < timing.fade_in + timing.show {
        Some(StoryPhase::Hold)
    } else if t < timing.total() {
        Some(StoryPhase::FadeOut)
    } else {
        None
    }
}

/// Overlay opacity after `t` seconds.
fn alpha_at(timing: &FadeTiming, t: f32) -> f32 {
    if t < timing.fade_in {
        t / timing.fade_in
    } else if t < timing.fade_in + timing.show {
        1.0
    } else if t < timing.total() {
        1.0 - (t - timing.fade_in - timing.show) / timing.fade_out
    } else {
        0.0
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::SceneDirectory;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestScene {
        Garden,
    }

    impl SceneKey for TestScene {}

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestQuest {
        FindCandle,
    }

    impl QuestKey for TestQuest {}

    type Coordinator = SequenceCoordinator<TestScene, TestQuest>;
    type Ctx = GlobalContext<TestScene, TestQuest>;

    //--- Test Helpers -----------------------------------------------------

    fn ctx() -> Ctx {
        GlobalContext::new(SceneDirectory::new())
    }

    /// Dialogue stub whose active flag the test flips by hand.
    struct ScriptedDialogue {
        active: Arc<AtomicBool>,
        started: Arc<AtomicUsize>,
    }

    impl DialogueExecutor for ScriptedDialogue {
        fn start_dialogue(&mut self, _cue: &DialogueCue) {
            self.started.fetch_add(1, Ordering::SeqCst);
            self.active.store(true, Ordering::SeqCst);
        }

        fn is_active(&self) -> bool {
            self.active.load(Ordering::SeqCst)
        }
    }

    fn scripted(coordinator: &mut Coordinator) -> (Arc<AtomicBool>, Arc<AtomicUsize>) {
        let active = Arc::new(AtomicBool::new(false));
        let started = Arc::new(AtomicUsize::new(0));
        coordinator.set_executor(Box::new(ScriptedDialogue {
            active: active.clone(),
            started: started.clone(),
        }));
        (active, started)
    }

    fn counter() -> (Arc<AtomicUsize>, CompletionFn<TestScene, TestQuest>) {
        let count = Arc::new(AtomicUsize::new(0));
        let captured = count.clone();
        let callback: CompletionFn<TestScene, TestQuest> = Box::new(move |_ctx| {
            captured.fetch_add(1, Ordering::SeqCst);
        });
        (count, callback)
    }

    fn timing() -> FadeTiming {
        FadeTiming::new(1.0, 1.5, 1.0)
    }

    //--- Exactly-Once Completion ------------------------------------------

    #[test]
    fn completes_once_with_no_stages() {
        let mut coordinator = Coordinator::new();
        let mut ctx = ctx();
        let (count, callback) = counter();

        coordinator
            .begin(&mut ctx, SequenceConfig::new(), callback)
            .unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        for _ in 0..5 {
            coordinator.tick(0.1, &mut ctx);
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn completes_once_with_story_only() {
        let mut coordinator = Coordinator::new();
        let mut ctx = ctx();
        let (count, callback) = counter();

        coordinator
            .begin(
                &mut ctx,
                SequenceConfig::new().with_story(timing()),
                callback,
            )
            .unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 0);

        // 3.5 seconds of story plus slack.
        for _ in 0..40 {
            coordinator.tick(0.1, &mut ctx);
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!coordinator.is_busy());
    }

    #[test]
    fn completes_once_with_dialogue_only() {
        let mut coordinator = Coordinator::new();
        let mut ctx = ctx();
        let (active, started) = scripted(&mut coordinator);
        let (count, callback) = counter();

        coordinator
            .begin(
                &mut ctx,
                SequenceConfig::new().with_dialogue(DialogueCue::new("intro")),
                callback,
            )
            .unwrap();

        assert_eq!(started.load(Ordering::SeqCst), 1);
        for _ in 0..3 {
            coordinator.tick(0.1, &mut ctx);
        }
        assert_eq!(count.load(Ordering::SeqCst), 0);

        active.store(false, Ordering::SeqCst);
        coordinator.tick(0.1, &mut ctx);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        coordinator.tick(0.1, &mut ctx);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn completes_once_with_story_then_dialogue() {
        let mut coordinator = Coordinator::new();
        let mut ctx = ctx();
        let (active, started) = scripted(&mut coordinator);
        let (count, callback) = counter();

        coordinator
            .begin(
                &mut ctx,
                SequenceConfig::new()
                    .with_story(timing())
                    .with_dialogue(DialogueCue::new("found-it")),
                callback,
            )
            .unwrap();

        // Story runs first; the dialogue must not start yet.
        coordinator.tick(1.0, &mut ctx);
        assert_eq!(started.load(Ordering::SeqCst), 0);

        for _ in 0..30 {
            coordinator.tick(0.1, &mut ctx);
        }
        assert_eq!(started.load(Ordering::SeqCst), 1);
        assert_eq!(count.load(Ordering::SeqCst), 0);

        active.store(false, Ordering::SeqCst);
        coordinator.tick(0.1, &mut ctx);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    //--- Missing Collaborator ---------------------------------------------

    #[test]
    fn missing_executor_skips_the_dialogue_stage() {
        let mut coordinator = Coordinator::new();
        let mut ctx = ctx();
        let (count, callback) = counter();

        coordinator
            .begin(
                &mut ctx,
                SequenceConfig::new().with_dialogue(DialogueCue::new("orphan")),
                callback,
            )
            .unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    //--- Pause Token ------------------------------------------------------

    #[test]
    fn story_holds_the_pause_token_and_releases_before_dialogue() {
        let mut coordinator = Coordinator::new();
        let mut ctx = ctx();
        let (_active, _started) = scripted(&mut coordinator);
        let (_count, callback) = counter();

        coordinator
            .begin(
                &mut ctx,
                SequenceConfig::new()
                    .with_story(timing())
                    .with_dialogue(DialogueCue::new("after")),
                callback,
            )
            .unwrap();
        assert_eq!(ctx.clock.holder(), Some(PauseOwner::Story));

        for _ in 0..40 {
            coordinator.tick(0.1, &mut ctx);
        }
        // Dialogue stage is running and the token is free again.
        assert!(coordinator.is_busy());
        assert_eq!(ctx.clock.holder(), None);
    }

    #[test]
    fn contended_pause_refuses_the_story() {
        let mut coordinator = Coordinator::new();
        let mut ctx = ctx();
        ctx.clock.acquire(PauseOwner::Menu);
        let (count, callback) = counter();

        let result = coordinator.begin(
            &mut ctx,
            SequenceConfig::new().with_story(timing()),
            callback,
        );

        assert_eq!(result, Err(SequenceError::PauseContended(PauseOwner::Menu)));
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(!coordinator.is_busy());
    }

    #[test]
    fn begin_while_busy_is_refused() {
        let mut coordinator = Coordinator::new();
        let mut ctx = ctx();
        let (_count, first) = counter();
        let (second_count, second) = counter();

        coordinator
            .begin(&mut ctx, SequenceConfig::new().with_story(timing()), first)
            .unwrap();

        let result = coordinator.begin(&mut ctx, SequenceConfig::new(), second);
        assert_eq!(result, Err(SequenceError::Busy));
        assert_eq!(second_count.load(Ordering::SeqCst), 0);
    }

    //--- Phase Ordering ---------------------------------------------------

    #[test]
    fn alpha_follows_the_three_phases_in_order() {
        let mut coordinator = Coordinator::new();
        let mut ctx = ctx();
        let (_count, callback) = counter();

        coordinator
            .begin(
                &mut ctx,
                SequenceConfig::new().with_story(timing()),
                callback,
            )
            .unwrap();

        coordinator.tick(0.5, &mut ctx);
        let fading_in = coordinator.story_alpha().unwrap();
        assert!((fading_in - 0.5).abs() < 1e-4);

        coordinator.tick(1.0, &mut ctx);
        assert_eq!(coordinator.story_alpha(), Some(1.0));

        coordinator.tick(1.5, &mut ctx);
        let fading_out = coordinator.story_alpha().unwrap();
        assert!(fading_out < 1.0 && fading_out > 0.0);

        coordinator.tick(1.0, &mut ctx);
        assert_eq!(coordinator.story_alpha(), None);
    }

    #[test]
    fn menu_is_blocked_while_story_runs() {
        let mut coordinator = Coordinator::new();
        let mut ctx = ctx();
        let (_count, callback) = counter();

        assert!(!coordinator.blocks_menu());
        coordinator
            .begin(
                &mut ctx,
                SequenceConfig::new().with_story(timing()),
                callback,
            )
            .unwrap();
        assert!(coordinator.blocks_menu());
    }
}
