//=========================================================================
// Emberwick Session
//
// Main entry point and coordinator for the session core.
//
// Architecture:
// ```text
//     SessionBuilder  ──build()──>  Session  ──tick(dt)──>  [advance]
//         │                          │
//         ├─ with_scene()            ├─ drains host events
//         ├─ with_quests()           ├─ updates systems
//         └─ with_fuel()...          └─ applies actor removals
// ```
//
// The host owns the frame loop and calls `tick` once per fixed step;
// the session never spawns threads of its own.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use crate::core::actors::{Actor, ActorEnv, ActorId, ActorRegistry};
use crate::core::clock::PauseOwner;
use crate::core::fuel::{FuelConfig, Glow, ToggleOutcome};
use crate::core::globals::{GlobalContext, GlobalSystems};
use crate::core::host_bridge::{
    CoreEvent, DialogueCue, DialogueExecutor, EventCollector, HostEvent, PresentationSurface,
    TickControl,
};
use crate::core::quest::{QuestCommand, QuestDisplayMode, QuestKey, QuestRecord};
use crate::core::state::{SceneDirectory, SceneKey, ScenePolicy};

//=== SessionBuilder ======================================================

/// Builder for configuring and constructing a [`Session`].
///
/// # Examples
///
/// ```
/// use emberwick::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Level { Garden, Cellar }
/// impl SceneKey for Level {}
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Objective { FindCandle, GatherSupplies }
/// impl QuestKey for Objective {}
///
/// let mut session = SessionBuilder::<Level, Objective>::new()
///     .with_scene(Level::Garden, ScenePolicy::shared_a().candle_gated())
///     .with_scene(Level::Cellar, ScenePolicy::shared_b().with_quest_offset(4))
///     .with_quests(vec![
///         QuestRecord::new(Objective::FindCandle, "Find the candle").exempt(),
///         QuestRecord::new(Objective::GatherSupplies, "Gather supplies").with_target(3),
///     ])
///     .build();
///
/// let events = session.host_sender();
/// events.send(HostEvent::SceneLoaded(Level::Garden)).unwrap();
/// events.send(HostEvent::StartGame).unwrap();
/// session.tick(1.0 / 60.0);
/// ```
pub struct SessionBuilder<S: SceneKey, Q: QuestKey> {
    scenes: SceneDirectory<S>,
    quests: Vec<QuestRecord<Q>>,
    display_mode: QuestDisplayMode,
    fuel: FuelConfig,
    max_health: i32,
    channel_capacity: usize,
    title_screen: bool,
    ignition_tutorial: Option<(Q, Option<DialogueCue>)>,
    executor: Option<Box<dyn DialogueExecutor>>,
    presenter: Option<Box<dyn PresentationSurface>>,
}

impl<S: SceneKey, Q: QuestKey> SessionBuilder<S, Q> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            scenes: SceneDirectory::new(),
            quests: Vec::new(),
            display_mode: QuestDisplayMode::default(),
            fuel: FuelConfig::default(),
            max_health: 3,
            channel_capacity: 128,
            title_screen: true,
            ignition_tutorial: None,
            executor: None,
            presenter: None,
        }
    }

    /// Registers a scene policy (persistence scope, quest numbering
    /// offset, candle gating).
    pub fn with_scene(mut self, scene: S, policy: ScenePolicy) -> Self {
        self.scenes.insert(scene, policy);
        self
    }

    /// Supplies the fixed quest registry.
    pub fn with_quests(mut self, quests: Vec<QuestRecord<Q>>) -> Self {
        self.quests = quests;
        self
    }

    /// Selects how the quest board projects the registry.
    ///
    /// Default: [`QuestDisplayMode::AllAtOnce`].
    pub fn with_display_mode(mut self, mode: QuestDisplayMode) -> Self {
        self.display_mode = mode;
        self
    }

    /// Tunes the fuel gauge.
    ///
    /// # Panics
    ///
    /// Panics if the configured duration is not positive.
    pub fn with_fuel(mut self, fuel: FuelConfig) -> Self {
        assert!(fuel.duration > 0.0, "Fuel duration must be positive, got {}", fuel.duration);
        self.fuel = fuel;
        self
    }

    /// Sets the player's maximum health.
    ///
    /// Default: 3
    ///
    /// # Panics
    ///
    /// Panics if `max_health` is not positive.
    pub fn with_max_health(mut self, max_health: i32) -> Self {
        assert!(max_health > 0, "Max health must be positive, got {}", max_health);
        self.max_health = max_health;
        self
    }

    /// Sets the channel capacity for host → core communication.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Starts the session without the title screen pause (useful for
    /// tests and level-skipping debug hosts).
    pub fn without_title_screen(mut self) -> Self {
        self.title_screen = false;
        self
    }

    /// Completes `quest` (and plays `dialogue`, if any) the first time
    /// the light ignites in a candle-gated scene.
    pub fn with_ignition_tutorial(mut self, quest: Q, dialogue: Option<DialogueCue>) -> Self {
        self.ignition_tutorial = Some((quest, dialogue));
        self
    }

    /// Installs the dialogue collaborator.
    pub fn with_dialogue_executor(mut self, executor: Box<dyn DialogueExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Installs the notification/floating-text collaborator.
    pub fn with_presentation(mut self, presenter: Box<dyn PresentationSurface>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    /// Builds the session instance.
    ///
    /// Consumes the builder and produces a configured [`Session`] ready
    /// for ticking. The title screen (when enabled) holds the pause
    /// token until the host sends [`HostEvent::StartGame`].
    pub fn build(self) -> Session<S, Q> {
        info!(
            "Building session ({} scenes, {} quests, channel: {})",
            self.scenes.len(),
            self.quests.len(),
            self.channel_capacity
        );

        let (sender, receiver): (Sender<HostEvent<S>>, Receiver<HostEvent<S>>) =
            bounded(self.channel_capacity);

        let mut context = GlobalContext::new(self.scenes);
        let mut systems = GlobalSystems::new(self.fuel, self.max_health);
        systems.quests.register(self.quests);
        systems.quests.set_display_mode(self.display_mode);
        if let Some(executor) = self.executor {
            systems.sequences.set_executor(executor);
        }

        if self.title_screen {
            context.clock.acquire(PauseOwner::Menu);
            info!("title screen active, simulation frozen");
        }

        Session {
            context,
            systems,
            actors: ActorRegistry::new(),
            collector: EventCollector::new(receiver),
            sender,
            presenter: self.presenter,
            ignition_tutorial: self.ignition_tutorial,
            running: true,
        }
    }
}

impl<S: SceneKey, Q: QuestKey> Default for SessionBuilder<S, Q> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Session =============================================================

/// Emberwick session runtime.
///
/// Owns every core system plus the actor registry, drains the host
/// event channel once per tick, and exposes read queries for the host
/// renderer (quest board, glow, story overlay alpha).
///
/// Create via [`SessionBuilder`] with `SessionBuilder::new().build()`.
pub struct Session<S: SceneKey, Q: QuestKey> {
    context: GlobalContext<S, Q>,
    systems: GlobalSystems<S, Q>,
    actors: ActorRegistry<S, Q>,
    collector: EventCollector<S>,
    sender: Sender<HostEvent<S>>,
    presenter: Option<Box<dyn PresentationSurface>>,
    ignition_tutorial: Option<(Q, Option<DialogueCue>)>,
    running: bool,
}

impl<S: SceneKey, Q: QuestKey> Session<S, Q> {
    //--- Host Plumbing ----------------------------------------------------

    /// Returns a sender for the host side of the event channel.
    /// Cloneable; dropping every sender shuts the session down.
    pub fn host_sender(&self) -> Sender<HostEvent<S>> {
        self.sender.clone()
    }

    /// Returns false once the session has shut down.
    pub fn is_running(&self) -> bool {
        self.running
    }

    //--- Actors -----------------------------------------------------------

    /// Spawns an actor, returning its handle for the host's trigger and
    /// interaction events.
    ///
    /// Returns None when the actor declines to spawn (a one-shot item
    /// already collected on a previous visit).
    pub fn spawn_actor(&mut self, mut actor: Box<dyn Actor<S, Q>>) -> Option<ActorId> {
        let id = self.actors.reserve();
        let keep = {
            let mut env = ActorEnv {
                id,
                context: &mut self.context,
                quests: &self.systems.quests,
                fuel: &mut self.systems.fuel,
                health: &mut self.systems.health,
                sequences: &mut self.systems.sequences,
                presenter: self.presenter.as_mut().map(|p| p.as_mut() as &mut dyn PresentationSurface),
            };
            actor.on_spawn(&mut env)
        };

        if keep {
            self.actors.insert(id, actor);
            Some(id)
        } else {
            debug!("actor {:?} declined to spawn", id);
            None
        }
    }

    //--- Tick -------------------------------------------------------------

    /// Advances the session by one fixed step.
    ///
    /// # Lifecycle
    ///
    /// 1. Drains host events (scene loads, toggles, interactions)
    /// 2. Updates systems: sequences on the raw delta, fuel on the
    ///    pause-scaled delta, then queued quest commands
    /// 3. Applies queued actor removals at the tick boundary
    pub fn tick(&mut self, dt: f32) {
        if !self.running {
            return;
        }

        //--- 1. Drain host events ----------------------------------------
        if self.collector.collect() == TickControl::Exit {
            info!("host disconnected, session shutting down");
            self.running = false;
            return;
        }
        for event in self.collector.take_pending() {
            self.dispatch(event);
        }

        //--- 2. Advance systems ------------------------------------------
        self.systems.update(&mut self.context, dt);

        //--- 3. Apply actor removals -------------------------------------
        let commands = self.context.actor_commands.take();
        if !commands.is_empty() {
            self.actors.apply(commands);
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Quest board text for the active scene, one objective per line.
    pub fn quest_board(&self) -> String {
        self.systems
            .quests
            .board_lines(self.context.quest_offset())
            .join("\n")
    }

    /// True once every non-exempt objective has completed.
    pub fn objectives_complete(&self) -> bool {
        self.systems.quests.objectives_complete()
    }

    /// Drains queued notifications for the host.
    pub fn drain_events(&mut self) -> Vec<CoreEvent<Q>> {
        self.context.events.take()
    }

    /// Current light glow parameters for the renderer.
    pub fn light_glow(&self) -> Glow {
        self.systems.fuel.glow()
    }

    /// Remaining fuel as a fraction in `[0, 1]`, for the gauge UI.
    pub fn light_remaining(&self) -> f32 {
        self.systems.fuel.remaining_ratio()
    }

    pub fn is_light_lit(&self) -> bool {
        self.systems.fuel.is_lit()
    }

    /// Story overlay opacity while a sequence's story stage runs.
    pub fn story_alpha(&self) -> Option<f32> {
        self.systems.sequences.story_alpha()
    }

    pub fn is_paused(&self) -> bool {
        self.context.clock.is_paused()
    }

    /// Current and maximum player health.
    pub fn health(&self) -> (i32, i32) {
        (self.systems.health.current(), self.systems.health.max())
    }

    //--- Event Dispatch ---------------------------------------------------

    fn dispatch(&mut self, event: HostEvent<S>) {
        match event {
            HostEvent::SceneLoaded(scene) => {
                self.context.enter_scene(scene);
                self.systems.on_scene_loaded(&mut self.context);
            }
            HostEvent::StartGame => {
                // Resumes play unless a story or dialogue owns the
                // pause; release is a no-op for non-holders.
                self.context.clock.release(PauseOwner::Menu);
                info!("session started");
            }
            HostEvent::TogglePauseMenu => self.toggle_pause_menu(),
            HostEvent::ToggleLight => self.toggle_light(),
            HostEvent::PlayerEntered(id) => {
                self.with_actor(id, |actor, env| actor.on_player_enter(env));
            }
            HostEvent::PlayerExited(id) => {
                self.with_actor(id, |actor, env| actor.on_player_exit(env));
            }
            HostEvent::Interact(id) => {
                self.with_actor(id, |actor, env| actor.on_interact(env));
            }
            HostEvent::Shutdown => {
                self.running = false;
            }
        }
    }

    fn toggle_pause_menu(&mut self) {
        if self.systems.sequences.blocks_menu() {
            debug!("pause menu blocked while a sequence or dialogue runs");
            return;
        }

        if self.context.clock.holder() == Some(PauseOwner::Menu) {
            self.context.clock.release(PauseOwner::Menu);
            self.context
                .events
                .push(CoreEvent::PauseMenuToggled { open: false });
        } else if self.context.clock.acquire(PauseOwner::Menu) {
            self.context
                .events
                .push(CoreEvent::PauseMenuToggled { open: true });
        }
    }

    fn toggle_light(&mut self) {
        let gated = self.context.candle_gated();
        let candle = self.context.shared.candle_obtained();

        match self.systems.fuel.toggle(gated, candle) {
            ToggleOutcome::Ignited { first_ignition } => {
                if first_ignition && gated {
                    self.run_ignition_tutorial();
                }
            }
            ToggleOutcome::Extinguished => {}
            ToggleOutcome::BlockedDepleted => {
                debug!("light toggle refused: the wick is spent");
            }
            ToggleOutcome::BlockedNoCandle => {
                info!("light toggle refused: pick up the candle first");
            }
        }
    }

    fn run_ignition_tutorial(&mut self) {
        let Some((quest, dialogue)) = self.ignition_tutorial.clone() else {
            return;
        };

        self.context.quest_commands.push(QuestCommand::Complete(quest));
        if dialogue.is_some() {
            let result =
                self.systems
                    .sequences
                    .play_dialogue(&mut self.context, dialogue, Box::new(|_ctx| {}));
            if let Err(e) = result {
                warn!("ignition tutorial dialogue refused: {}", e);
            }
        }
    }

    fn with_actor<F>(&mut self, id: ActorId, f: F)
    where
        F: FnOnce(&mut dyn Actor<S, Q>, &mut ActorEnv<'_, S, Q>),
    {
        let Some(mut actor) = self.actors.take(id) else {
            warn!("event for unknown actor {:?}", id);
            return;
        };

        let mut env = ActorEnv {
            id,
            context: &mut self.context,
            quests: &self.systems.quests,
            fuel: &mut self.systems.fuel,
            health: &mut self.systems.health,
            sequences: &mut self.systems.sequences,
            presenter: self.presenter.as_mut().map(|p| p.as_mut() as &mut dyn PresentationSurface),
        };
        f(actor.as_mut(), &mut env);

        self.actors.insert(id, actor);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actors::{QuestPickup, SpikeTrap};
    use crate::core::quest::QuestDisplayMode;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestScene {
        Garden,
        Cellar,
        Attic,
    }

    impl SceneKey for TestScene {}

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestQuest {
        FindCandle,
        LightCandle,
        GatherSupplies,
    }

    impl QuestKey for TestQuest {}

    const DT: f32 = 1.0 / 60.0;

    fn builder() -> SessionBuilder<TestScene, TestQuest> {
        SessionBuilder::new()
            .with_scene(TestScene::Garden, ScenePolicy::shared_a().candle_gated())
            .with_scene(TestScene::Cellar, ScenePolicy::shared_b().with_quest_offset(4))
            .with_quests(vec![
                QuestRecord::new(TestQuest::FindCandle, "Find the candle").exempt(),
                QuestRecord::new(TestQuest::LightCandle, "Light the candle")
                    .with_prerequisite(TestQuest::FindCandle)
                    .exempt(),
                QuestRecord::new(TestQuest::GatherSupplies, "Gather supplies").with_target(3),
            ])
    }

    //--- Builder ----------------------------------------------------------

    #[test]
    fn builder_defaults() {
        let builder = SessionBuilder::<TestScene, TestQuest>::new();
        assert_eq!(builder.channel_capacity, 128);
        assert_eq!(builder.max_health, 3);
        assert!(builder.title_screen);
    }

    #[test]
    #[should_panic(expected = "Fuel duration must be positive")]
    fn builder_rejects_zero_fuel_duration() {
        let mut fuel = FuelConfig::default();
        fuel.duration = 0.0;
        let _ = SessionBuilder::<TestScene, TestQuest>::new().with_fuel(fuel);
    }

    #[test]
    #[should_panic(expected = "Max health must be positive")]
    fn builder_rejects_zero_max_health() {
        let _ = SessionBuilder::<TestScene, TestQuest>::new().with_max_health(0);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_rejects_zero_channel_capacity() {
        let _ = SessionBuilder::<TestScene, TestQuest>::new().with_channel_capacity(0);
    }

    //--- Title Gate -------------------------------------------------------

    #[test]
    fn title_screen_freezes_until_start() {
        let mut session = builder().build();
        assert!(session.is_paused());

        session.host_sender().send(HostEvent::StartGame).unwrap();
        session.tick(DT);
        assert!(!session.is_paused());
    }

    #[test]
    fn without_title_screen_starts_running() {
        let session = builder().without_title_screen().build();
        assert!(!session.is_paused());
    }

    //--- Scene Loading ----------------------------------------------------

    #[test]
    fn scene_load_applies_quest_offset_to_the_board() {
        let mut session = builder()
            .with_display_mode(QuestDisplayMode::Sequential)
            .without_title_screen()
            .build();

        session
            .host_sender()
            .send(HostEvent::SceneLoaded(TestScene::Cellar))
            .unwrap();
        session.tick(DT);

        assert_eq!(session.quest_board(), "5. Find the candle");
    }

    //--- Light Toggle -----------------------------------------------------

    #[test]
    fn light_burns_only_while_running_and_lit() {
        let mut session = builder().without_title_screen().build();
        let events = session.host_sender();

        events.send(HostEvent::SceneLoaded(TestScene::Attic)).unwrap();
        events.send(HostEvent::ToggleLight).unwrap();
        session.tick(1.0);

        assert!(session.is_light_lit());
        assert!(session.light_remaining() < 1.0);
    }

    #[test]
    fn candle_gate_blocks_the_toggle_until_pickup() {
        let mut session = builder().without_title_screen().build();
        let events = session.host_sender();

        events.send(HostEvent::SceneLoaded(TestScene::Garden)).unwrap();
        events.send(HostEvent::ToggleLight).unwrap();
        session.tick(DT);
        assert!(!session.is_light_lit());

        let id = session
            .spawn_actor(Box::new(
                QuestPickup::new(TestQuest::FindCandle).grants_candle().silent(),
            ))
            .unwrap();
        events.send(HostEvent::Interact(id)).unwrap();
        events.send(HostEvent::ToggleLight).unwrap();
        session.tick(DT);

        assert!(session.is_light_lit());
    }

    #[test]
    fn first_ignition_completes_the_tutorial_quest() {
        let mut session = builder()
            .with_ignition_tutorial(TestQuest::LightCandle, None)
            .without_title_screen()
            .build();
        let events = session.host_sender();

        events.send(HostEvent::SceneLoaded(TestScene::Garden)).unwrap();
        session.context.shared.mark_candle_obtained();
        events.send(HostEvent::ToggleLight).unwrap();
        session.tick(DT);

        assert!(session.systems.quests.is_done(TestQuest::LightCandle));
    }

    //--- Actors -----------------------------------------------------------

    #[test]
    fn pickup_interaction_completes_and_removes_the_actor() {
        let mut session = builder().without_title_screen().build();
        let id = session
            .spawn_actor(Box::new(QuestPickup::new(TestQuest::FindCandle).silent()))
            .unwrap();

        session.host_sender().send(HostEvent::Interact(id)).unwrap();
        session.tick(DT);

        assert!(session.systems.quests.is_done(TestQuest::FindCandle));
        assert!(session.actors.is_empty());
    }

    #[test]
    fn trap_kills_and_freezes_the_session() {
        let mut session = builder()
            .with_max_health(1)
            .without_title_screen()
            .build();
        let id = session.spawn_actor(Box::new(SpikeTrap::new())).unwrap();

        session
            .host_sender()
            .send(HostEvent::PlayerEntered(id))
            .unwrap();
        session.tick(DT);

        assert_eq!(session.health(), (0, 1));
        assert!(session.is_paused());
        assert!(session
            .drain_events()
            .iter()
            .any(|e| matches!(e, CoreEvent::PlayerDied)));
    }

    //--- Pause Menu -------------------------------------------------------

    #[test]
    fn pause_menu_toggles_and_reports() {
        let mut session = builder().without_title_screen().build();
        let events = session.host_sender();

        events.send(HostEvent::TogglePauseMenu).unwrap();
        session.tick(DT);
        assert!(session.is_paused());

        events.send(HostEvent::TogglePauseMenu).unwrap();
        session.tick(DT);
        assert!(!session.is_paused());

        let toggles: Vec<bool> = session
            .drain_events()
            .iter()
            .filter_map(|e| match e {
                CoreEvent::PauseMenuToggled { open } => Some(*open),
                _ => None,
            })
            .collect();
        assert_eq!(toggles, vec![true, false]);
    }

    //--- Shutdown ---------------------------------------------------------

    #[test]
    fn shutdown_event_stops_the_session() {
        let mut session = builder().without_title_screen().build();
        session.host_sender().send(HostEvent::Shutdown).unwrap();

        session.tick(DT);
        assert!(!session.is_running());
    }

    #[test]
    fn fuel_persists_across_a_shared_scope_reload() {
        let mut session = builder().without_title_screen().build();
        let events = session.host_sender();

        events.send(HostEvent::SceneLoaded(TestScene::Garden)).unwrap();
        session.tick(DT);
        session.context.shared.mark_candle_obtained();

        events.send(HostEvent::ToggleLight).unwrap();
        session.tick(6.0);

        let remaining = session.light_remaining();
        assert!(remaining < 1.0);

        // Crossing into the second shared scene keeps the gauge level.
        events.send(HostEvent::SceneLoaded(TestScene::Cellar)).unwrap();
        session.tick(DT);
        assert!((session.light_remaining() - remaining).abs() < 0.01);

        // A transient scene resets it.
        events.send(HostEvent::SceneLoaded(TestScene::Attic)).unwrap();
        session.tick(DT);
        assert_eq!(session.light_remaining(), 1.0);
    }
}
