//=========================================================================
// Lucky Box
//=========================================================================
//
// Chest applying one random effect from a fixed table: a heal, a hit,
// or a fuel swing in either direction. Darker levels can restrict the
// pool to fuel drains. The effect message floats up tinted by how
// good the news is.
//
//=========================================================================

use log::{debug, warn};
use rand::Rng;

use crate::core::actors::{Actor, ActorEnv};
use crate::core::host_bridge::{DialogueCue, MessageTint};
use crate::core::quest::QuestKey;
use crate::core::state::SceneKey;

//=== Effect Table ========================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum BoxEffect {
    Health(i32),
    /// Fuel fraction; positive restores, negative drains.
    Fuel(f32),
}

struct TableEntry {
    effect: BoxEffect,
    message: &'static str,
    tint: MessageTint,
}

const EFFECT_TABLE: &[TableEntry] = &[
    TableEntry {
        effect: BoxEffect::Health(1),
        message: "+1 HP",
        tint: MessageTint::GREEN,
    },
    TableEntry {
        effect: BoxEffect::Health(-1),
        message: "-1 HP",
        tint: MessageTint::RED,
    },
    TableEntry {
        effect: BoxEffect::Fuel(-0.15),
        message: "The flame dims",
        tint: MessageTint::AMBER,
    },
    TableEntry {
        effect: BoxEffect::Fuel(-0.50),
        message: "The flame gutters!",
        tint: MessageTint::RED,
    },
    TableEntry {
        effect: BoxEffect::Fuel(-1.00),
        message: "The flame is snuffed out!",
        tint: MessageTint::MAGENTA,
    },
    TableEntry {
        effect: BoxEffect::Fuel(0.15),
        message: "The flame brightens",
        tint: MessageTint::YELLOW,
    },
    TableEntry {
        effect: BoxEffect::Fuel(0.30),
        message: "The flame surges!",
        tint: MessageTint::YELLOW,
    },
    TableEntry {
        effect: BoxEffect::Fuel(1.00),
        message: "The flame roars back to life!",
        tint: MessageTint::CYAN,
    },
];

//=== LuckyBox ============================================================

pub struct LuckyBox<Q: QuestKey> {
    progress_quest: Q,
    dialogue: Option<DialogueCue>,
    drain_only: bool,
    position: (f32, f32),
    use_notification: bool,
    consumed: bool,
}

impl<Q: QuestKey> LuckyBox<Q> {
    pub fn new(progress_quest: Q, position: (f32, f32)) -> Self {
        Self {
            progress_quest,
            dialogue: None,
            drain_only: false,
            position,
            use_notification: true,
            consumed: false,
        }
    }

    /// Restricts the pool to fuel drains (for levels where the box is
    /// a hazard rather than a gamble).
    pub fn drain_only(mut self) -> Self {
        self.drain_only = true;
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

    fn pool(&self) -> Vec<&'static TableEntry> {
        if self.drain_only {
            EFFECT_TABLE
                .iter()
                .filter(|entry| matches!(entry.effect, BoxEffect::Fuel(fraction) if fraction < 0.0))
                .collect()
        } else {
            EFFECT_TABLE.iter().collect()
        }
    }
}

impl<S: SceneKey, Q: QuestKey> Actor<S, Q> for LuckyBox<Q> {
    fn on_player_enter(&mut self, env: &mut ActorEnv<S, Q>) {
        if self.use_notification && !self.consumed {
            env.notify("Press E to open", false);
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
        self.consumed = true;
        if self.use_notification {
            env.hide_notification();
        }

        let pool = self.pool();
        let mut rng = rand::rng();
        let entry = pool[rng.random_range(0..pool.len())];
        debug!("lucky box rolled: {}", entry.message);

        match entry.effect {
            BoxEffect::Health(amount) => {
                env.heal_player(amount);
            }
            BoxEffect::Fuel(fraction) => {
                env.restore_fuel(fraction);
            }
        }

        env.floating(self.position, entry.message, entry.tint);
        env.add_progress(self.progress_quest, 1);

        if self.dialogue.is_some() {
            let cue = self.dialogue.clone();
            if let Err(e) = env
                .sequences
                .play_dialogue(env.context, cue, Box::new(|_ctx| {}))
            {
                warn!("lucky box dialogue refused: {}", e);
            }
        }

        env.remove_self();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
