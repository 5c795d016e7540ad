//=========================================================================
// Health Potion
//=========================================================================
//
// Heals the player on interaction, refusing when health is already
// full. The optional item dialogue is fire-and-forget: collection does
// not wait for it.
//
//=========================================================================

use log::warn;

use crate::core::actors::{Actor, ActorEnv};
use crate::core::health::HealthOutcome;
use crate::core::host_bridge::{DialogueCue, MessageTint};
use crate::core::quest::QuestKey;
use crate::core::state::SceneKey;

pub struct HealthPotion<Q: QuestKey> {
    progress_quest: Q,
    heal_amount: i32,
    dialogue: Option<DialogueCue>,
    full_message: String,
    position: (f32, f32),
    use_notification: bool,
    consumed: bool,
}

impl<Q: QuestKey> HealthPotion<Q> {
    pub fn new(progress_quest: Q, position: (f32, f32)) -> Self {
        Self {
            progress_quest,
            heal_amount: 1,
            dialogue: None,
            full_message: "Health is already full!".to_string(),
            position,
            use_notification: true,
            consumed: false,
        }
    }

    pub fn with_heal_amount(mut self, amount: i32) -> Self {
        self.heal_amount = amount;
        self
    }

    pub fn with_dialogue(mut self, cue: DialogueCue) -> Self {
        self.dialogue = Some(cue);
        self
    }

    pub fn silent(mut self) -> Self {
        self.use_notification = false;
        self
    }
}

impl<S: SceneKey, Q: QuestKey> Actor<S, Q> for HealthPotion<Q> {
    fn on_player_enter(&mut self, env: &mut ActorEnv<S, Q>) {
        if self.use_notification && !self.consumed {
            env.notify("Press E to drink", false);
        }
    }

    fn on_player_exit(&mut self, env: &mut ActorEnv<S, Q>) {
        if self.use_notification {
            env.hide_notification();
        }
    }

    fn on_interact(&mut self, env: &mut ActorEnv<S, Q>) {
        if self.consumed {
            return;
        }

        let outcome = env.heal_player(self.heal_amount);
        if outcome == HealthOutcome::AlreadyFull {
            env.floating(self.position, &self.full_message, MessageTint::WHITE);
            return;
        }

        env.floating(
            self.position,
            &format!("+{} HP", self.heal_amount),
            MessageTint::GREEN,
        );

        self.consumed = true;
        if self.use_notification {
            env.hide_notification();
        }

        // Fire-and-forget: the potion is collected whether or not the
        // dialogue plays.
        if self.dialogue.is_some() {
            let cue = self.dialogue.clone();
            if let Err(e) = env
                .sequences
                .play_dialogue(env.context, cue, Box::new(|_ctx| {}))
            {
                warn!("potion dialogue refused: {}", e);
            }
        }

        env.add_progress(self.progress_quest, 1);
        env.remove_self();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
