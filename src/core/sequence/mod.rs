//=========================================================================
// Sequence System
//=========================================================================
//
// Timed story presentation and dialogue chaining.
//
// Architecture:
//   SequenceCoordinator
//     ├─ executor: Option<Box<dyn DialogueExecutor>>
//     └─ active:   Option<ActiveSequence>   (at most one at a time)
//
// Flow:
//   begin() → fade-in → hold → fade-out → dialogue → on_complete
//
// Any stage may be absent; the terminal callback fires exactly once
// regardless of which stages run.
//
//=========================================================================

//=== Module Declarations =================================================

mod coordinator;

//=== Public API ==========================================================

pub use coordinator::{CompletionFn, SequenceCoordinator};

//=== Internal Dependencies ===============================================

use crate::core::host_bridge::DialogueCue;

//=== Fade Timing =========================================================

/// Durations for the three story phases, in seconds of unscaled time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeTiming {
    pub fade_in: f32,
    pub show: f32,
    pub fade_out: f32,
}

impl FadeTiming {
    pub fn new(fade_in: f32, show: f32, fade_out: f32) -> Self {
        Self {
            fade_in,
            show,
            fade_out,
        }
    }

    /// Total story duration.
    pub fn total(&self) -> f32 {
        self.fade_in + self.show + self.fade_out
    }

    /// Negative phase durations are clamped to zero.
    pub(crate) fn sanitized(self) -> Self {
        Self {
            fade_in: self.fade_in.max(0.0),
            show: self.show.max(0.0),
            fade_out: self.fade_out.max(0.0),
        }
    }
}

impl Default for FadeTiming {
    fn default() -> Self {
        Self {
            fade_in: 1.0,
            show: 1.5,
            fade_out: 1.0,
        }
    }
}

//=== Sequence Config =====================================================

/// One chained execution: an optional story overlay followed by an
/// optional dialogue.
#[derive(Debug, Clone, Default)]
pub struct SequenceConfig {
    pub story: Option<FadeTiming>,
    pub dialogue: Option<DialogueCue>,
}

impl SequenceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_story(mut self, timing: FadeTiming) -> Self {
        self.story = Some(timing);
        self
    }

    pub fn with_dialogue(mut self, cue: DialogueCue) -> Self {
        self.dialogue = Some(cue);
        self
    }
}
