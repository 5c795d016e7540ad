//=========================================================================
// Host Bridge Interface
//=========================================================================
//
// Host-to-core interface types (events, collaborator traits, errors).
//
// Defines the contract for communication between the embedding host
// and the session core. Everything here is presentation-free: the
// core never draws, it only describes.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::actors::ActorId;
use crate::core::clock::PauseOwner;
use crate::core::quest::QuestKey;
use crate::core::state::SceneKey;

//=== HostEvent ===========================================================

/// Events sent from the host to the core over the session channel.
///
/// Interaction detection (collision, key presses) happens host-side;
/// the core only sees the resulting intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent<S: SceneKey> {
    /// A scene finished loading. Selects the active persistence scope
    /// and quest numbering offset.
    SceneLoaded(S),

    /// The title screen start button was pressed.
    StartGame,

    /// The pause-menu key was pressed.
    TogglePauseMenu,

    /// The light toggle key was pressed.
    ToggleLight,

    /// The player walked into an actor's trigger range.
    PlayerEntered(ActorId),

    /// The player left an actor's trigger range.
    PlayerExited(ActorId),

    /// The player interacted with an actor in range.
    Interact(ActorId),

    /// The host is shutting the session down.
    Shutdown,
}

//=== CoreEvent ===========================================================

/// Notifications queued by the core for the host to drain each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreEvent<Q: QuestKey> {
    /// The quest board changed; redraw it.
    ObjectivesChanged,

    /// An objective completed.
    QuestCompleted(Q),

    /// Every non-exempt objective is complete.
    AllObjectivesComplete,

    /// The light burned out.
    LightDepleted,

    /// Player health changed.
    HealthChanged { current: i32, max: i32 },

    /// Player health reached zero.
    PlayerDied,

    /// The pause menu opened or closed.
    PauseMenuToggled { open: bool },
}

//=== Dialogue Collaborator ===============================================

/// Opaque reference to a dialogue script the host can resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueCue(pub String);

impl DialogueCue {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

/// External dialogue playback engine.
///
/// The core starts a dialogue and then watches the active flag; the
/// sequence coordinator fires its completion callback exactly once,
/// on the first tick the executor reports inactive.
pub trait DialogueExecutor: Send {
    /// Begins playing the referenced dialogue.
    fn start_dialogue(&mut self, cue: &DialogueCue);

    /// Returns true while a dialogue is playing.
    fn is_active(&self) -> bool;
}

//=== Presentation Collaborator ===========================================

/// RGBA tint for floating messages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MessageTint {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl MessageTint {
    pub const WHITE: MessageTint = MessageTint::rgb(1.0, 1.0, 1.0);
    pub const GREEN: MessageTint = MessageTint::rgb(0.0, 1.0, 0.0);
    pub const RED: MessageTint = MessageTint::rgb(1.0, 0.0, 0.0);
    pub const YELLOW: MessageTint = MessageTint::rgb(1.0, 1.0, 0.0);
    pub const CYAN: MessageTint = MessageTint::rgb(0.0, 1.0, 1.0);
    pub const MAGENTA: MessageTint = MessageTint::rgb(1.0, 0.0, 1.0);
    pub const AMBER: MessageTint = MessageTint::rgb(0.8, 0.5, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// Host-side notification and floating-text surface.
///
/// Absence of the surface is logged and the message is skipped; it is
/// never an error the core propagates.
pub trait PresentationSurface: Send {
    /// Shows the persistent interaction notification.
    fn show_notification(&mut self, message: &str, urgent: bool);

    /// Hides the persistent interaction notification.
    fn hide_notification(&mut self);

    /// Spawns a transient floating message at a world position.
    fn show_floating_message(&mut self, position: (f32, f32), text: &str, tint: MessageTint);
}

//=== Errors ==============================================================

/// Sequence startup failures. Fail-soft: callers log and either retry
/// later or continue the chain without the step.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SequenceError {
    /// A sequence is already running; the caller must not restart
    /// while busy.
    #[error("a sequence is already running")]
    Busy,

    /// The pause token is held by another owner; the story stage must
    /// defer rather than overwrite the pause.
    #[error("pause token is held by {0:?}")]
    PauseContended(PauseOwner),
}
