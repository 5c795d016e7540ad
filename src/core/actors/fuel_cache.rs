//=========================================================================
// Fuel Cache
//=========================================================================
//
// Oil cache restoring a fixed number of seconds to the light gauge.
// Refuses when the gauge is already full so the cache is not wasted.
// Later levels chain a story overlay and a dialogue before the cache
// counts toward the collection objective.
//
//=========================================================================

use log::warn;

use crate::core::actors::{Actor, ActorCommand, ActorEnv};
use crate::core::host_bridge::{DialogueCue, MessageTint};
use crate::core::quest::{QuestCommand, QuestKey};
use crate::core::sequence::{FadeTiming, SequenceConfig};
use crate::core::state::SceneKey;

pub struct FuelCache<Q: QuestKey> {
    progress_quest: Q,
    restore_seconds: f32,
    story: Option<FadeTiming>,
    dialogue: Option<DialogueCue>,
    full_message: String,
    position: (f32, f32),
    use_notification: bool,
    consumed: bool,
}

impl<Q: QuestKey> FuelCache<Q> {
    pub fn new(progress_quest: Q, position: (f32, f32)) -> Self {
        Self {
            progress_quest,
            restore_seconds: 15.0,
            story: None,
            dialogue: None,
            full_message: "The lantern is already full!".to_string(),
            position,
            use_notification: true,
            consumed: false,
        }
    }

    pub fn with_restore_seconds(mut self, seconds: f32) -> Self {
        self.restore_seconds = seconds;
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

    pub fn silent(mut self) -> Self {
        self.use_notification = false;
        self
    }
}

impl<S: SceneKey, Q: QuestKey> Actor<S, Q> for FuelCache<Q> {
    fn on_player_enter(&mut self, env: &mut ActorEnv<S, Q>) {
        if self.use_notification && !self.consumed {
            env.notify("Press E to take", false);
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

        if env.fuel.is_full() {
            env.floating(self.position, &self.full_message, MessageTint::WHITE);
            return;
        }

        let fraction = self.restore_seconds / env.fuel.duration();
        env.restore_fuel(fraction);
        env.floating(
            self.position,
            &format!("+{:.0}s of lamplight", self.restore_seconds),
            MessageTint::YELLOW,
        );

        self.consumed = true;
        if self.use_notification {
            env.hide_notification();
        }

        let quest = self.progress_quest;
        let id = env.id;

        if self.story.is_some() || self.dialogue.is_some() {
            let config = SequenceConfig {
                story: self.story,
                dialogue: self.dialogue.clone(),
            };
            let result = env.sequences.begin(
                env.context,
                config,
                Box::new(move |ctx| {
                    ctx.quest_commands.push(QuestCommand::AddProgress(quest, 1));
                    ctx.actor_commands.push(ActorCommand::Remove(id));
                }),
            );
            if let Err(e) = result {
                // The fuel is already spent; collect without the chain.
                warn!("fuel cache sequence refused, collecting directly: {}", e);
                env.add_progress(quest, 1);
                env.remove_self();
            }
        } else {
            env.add_progress(quest, 1);
            env.remove_self();
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
