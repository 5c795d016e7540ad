//=========================================================================
// Spike Trap
//=========================================================================
//
// Damages the player on entry with a cooldown so standing on the
// spikes does not shred the whole pool in one frame. Leaving the trap
// for the first time can complete a tutorial objective and start its
// dialogue.
//
//=========================================================================

use log::{debug, warn};

use crate::core::actors::{Actor, ActorEnv};
use crate::core::host_bridge::DialogueCue;
use crate::core::quest::QuestKey;
use crate::core::state::SceneKey;

pub struct SpikeTrap<Q: QuestKey> {
    damage: i32,
    cooldown: f32,
    tutorial_quest: Option<Q>,
    dialogue: Option<DialogueCue>,
    last_hit: f32,
    tutorial_done: bool,
}

impl<Q: QuestKey> SpikeTrap<Q> {
    pub fn new() -> Self {
        Self {
            damage: 1,
            cooldown: 1.0,
            tutorial_quest: None,
            dialogue: None,
            last_hit: f32::NEG_INFINITY,
            tutorial_done: false,
        }
    }

    pub fn with_damage(mut self, damage: i32) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_cooldown(mut self, cooldown: f32) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Completes this objective (and plays the dialogue, if any) the
    /// first time the player escapes the trap.
    pub fn with_tutorial(mut self, quest: Q, dialogue: Option<DialogueCue>) -> Self {
        self.tutorial_quest = Some(quest);
        self.dialogue = dialogue;
        self
    }
}

impl<Q: QuestKey> Default for SpikeTrap<Q> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SceneKey, Q: QuestKey> Actor<S, Q> for SpikeTrap<Q> {
    fn on_player_enter(&mut self, env: &mut ActorEnv<S, Q>) {
        let now = env.context.sim_time;
        if now - self.last_hit < self.cooldown {
            return;
        }

        self.last_hit = now;
        env.damage_player(self.damage);
        debug!("spike trap hit for {}", self.damage);
    }

    fn on_player_exit(&mut self, env: &mut ActorEnv<S, Q>) {
        if self.tutorial_done {
            return;
        }
        let Some(quest) = self.tutorial_quest else {
            return;
        };

        self.tutorial_done = true;
        env.complete_quest(quest);

        if self.dialogue.is_some() {
            let cue = self.dialogue.clone();
            if let Err(e) = env
                .sequences
                .play_dialogue(env.context, cue, Box::new(|_ctx| {}))
            {
                warn!("trap tutorial dialogue refused: {}", e);
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
