//=========================================================================
// Quest Pickup
//=========================================================================
//
// Key-item pickup: prerequisite-gated, optionally granting the candle,
// optionally chaining a story overlay and a dialogue before the quest
// completes and the item disappears.
//
//=========================================================================

use log::warn;

use crate::core::actors::{Actor, ActorCommand, ActorEnv};
use crate::core::host_bridge::DialogueCue;
use crate::core::quest::{QuestCommand, QuestKey};
use crate::core::sequence::{FadeTiming, SequenceConfig};
use crate::core::state::SceneKey;

/// Pickup that completes its objective when collected.
pub struct QuestPickup<Q: QuestKey> {
    quest: Q,
    grants_candle: bool,
    story: Option<FadeTiming>,
    dialogue: Option<DialogueCue>,
    interact_message: String,
    locked_message: String,
    use_notification: bool,
    consumed: bool,
}

impl<Q: QuestKey> QuestPickup<Q> {
    pub fn new(quest: Q) -> Self {
        Self {
            quest,
            grants_candle: false,
            story: None,
            dialogue: None,
            interact_message: "Press E to take".to_string(),
            locked_message: "Locked: finish the earlier objective".to_string(),
            use_notification: true,
            consumed: false,
        }
    }

    /// Collecting this item sets the session-wide candle flag.
    pub fn grants_candle(mut self) -> Self {
        self.grants_candle = true;
        self
    }

    pub fn with_story(mut self, timing: FadeTiming) -> Self {
        self.story = Some(timing);
        self
    }

    pub fn with_dialogue(mut self, cue: DialogueCue) -> Self {
        self.dialogue = Some(cue);
        self
    }

    pub fn with_messages(
        mut self,
        interact: impl Into<String>,
        locked: impl Into<String>,
    ) -> Self {
        self.interact_message = interact.into();
        self.locked_message = locked.into();
        self
    }

    pub fn silent(mut self) -> Self {
        self.use_notification = false;
        self
    }
}

impl<S: SceneKey, Q: QuestKey> Actor<S, Q> for QuestPickup<Q> {
    fn on_spawn(&mut self, env: &mut ActorEnv<S, Q>) -> bool {
        // The candle is a one-shot: once obtained it never respawns.
        !(self.grants_candle && env.context.shared.candle_obtained())
    }

    fn on_player_enter(&mut self, env: &mut ActorEnv<S, Q>) {
        if !self.use_notification || self.consumed {
            return;
        }
        if env.quests.is_unlocked(self.quest) {
            env.notify(&self.interact_message, false);
        } else {
            env.notify(&self.locked_message, false);
        }
    }

    fn on_player_exit(&mut self, env: &mut ActorEnv<S, Q>) {
        if self.use_notification {
            env.hide_notification();
        }
    }

    fn on_interact(&mut self, env: &mut ActorEnv<S, Q>) {
        if self.consumed || !env.quests.is_unlocked(self.quest) {
            return;
        }
        if env.sequences.dialogue_active() {
            return;
        }

        self.consumed = true;
        if self.use_notification {
            env.hide_notification();
        }
        if self.grants_candle {
            env.context.shared.mark_candle_obtained();
        }

        let quest = self.quest;
        let id = env.id;
        let config = SequenceConfig {
            story: self.story,
            dialogue: self.dialogue.clone(),
        };

        let result = env.sequences.begin(
            env.context,
            config,
            Box::new(move |ctx| {
                ctx.quest_commands.push(QuestCommand::Complete(quest));
                ctx.actor_commands.push(ActorCommand::Remove(id));
            }),
        );

        if let Err(e) = result {
            warn!("pickup sequence refused, keeping the item: {}", e);
            self.consumed = false;
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
