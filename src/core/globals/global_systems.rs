//=========================================================================
// Global Systems
//=========================================================================
//
// Container for the session's logic systems.
//
// Holds the systems that own gameplay state and coordinate behavior.
// Systems operate on GlobalContext data during the session tick.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::GlobalContext;
use crate::core::fuel::{FuelConfig, FuelGauge};
use crate::core::health::HealthSystem;
use crate::core::host_bridge::CoreEvent;
use crate::core::quest::{QuestKey, QuestTracker};
use crate::core::sequence::SequenceCoordinator;
use crate::core::state::SceneKey;

//=== GlobalSystems =======================================================

/// Container for the session's logic systems.
///
/// # Available Systems
///
/// - `quests`: objective registry, progress, and completion
/// - `fuel`: the light fuel gauge
/// - `health`: player hit points
/// - `sequences`: story/dialogue chaining
pub struct GlobalSystems<S: SceneKey, Q: QuestKey> {
    pub quests: QuestTracker<Q>,
    pub fuel: FuelGauge,
    pub health: HealthSystem,
    pub sequences: SequenceCoordinator<S, Q>,
}

impl<S: SceneKey, Q: QuestKey> GlobalSystems<S, Q> {
    /// Creates the systems container.
    ///
    /// This is typically called internally by the session builder.
    pub(crate) fn new(fuel: FuelConfig, max_health: i32) -> Self {
        Self {
            quests: QuestTracker::new(),
            fuel: FuelGauge::new(fuel),
            health: HealthSystem::new(max_health),
            sequences: SequenceCoordinator::new(),
        }
    }

    //--- Update Loop ------------------------------------------------------

    /// Advances all systems for one tick.
    ///
    /// # Processing Pipeline
    ///
    /// 1. **Sequences**: advance on the raw delta; story overlays keep
    ///    playing while the simulation clock is frozen
    /// 2. **Simulation**: scale the delta by the pause multiplier and
    ///    advance fuel consumption
    /// 3. **Quest Commands**: drain queued mutations into the tracker
    ///
    /// Actor removals are applied by the session after this returns,
    /// at the tick boundary.
    pub(crate) fn update(&mut self, context: &mut GlobalContext<S, Q>, dt: f32) {
        // 1. Sequences run on the raw clock.
        self.sequences.tick(dt, context);

        // 2. Simulation-scaled systems.
        let sim_dt = context.clock.scale(dt);
        context.sim_time += sim_dt;
        if self.fuel.tick(sim_dt, context.policy.scope, &mut context.shared) {
            context.events.push(CoreEvent::LightDepleted);
        }

        // 3. Queued quest mutations.
        let commands = context.quest_commands.take();
        if !commands.is_empty() {
            self.quests.apply(commands, &mut context.events);
        }
    }

    /// Reacts to a scene load: pulls session scalars back out of the
    /// shared store (or resets them outside shared scopes) and asks
    /// the host to redraw the quest board with the new offset.
    pub(crate) fn on_scene_loaded(&mut self, context: &mut GlobalContext<S, Q>) {
        self.fuel.sync_from_shared(context.policy.scope, &context.shared);
        self.health
            .sync_from_shared(context.policy.scope, &context.shared);
        context.events.push(CoreEvent::ObjectivesChanged);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::{SceneDirectory, ScenePolicy};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestScene {
        Garden,
        Attic,
    }

    impl SceneKey for TestScene {}

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestQuest {
        FindCandle,
    }

    impl QuestKey for TestQuest {}

    fn fixture() -> (
        GlobalSystems<TestScene, TestQuest>,
        GlobalContext<TestScene, TestQuest>,
    ) {
        let mut scenes = SceneDirectory::new();
        scenes.insert(TestScene::Garden, ScenePolicy::shared_a());
        (
            GlobalSystems::new(FuelConfig::default(), 3),
            GlobalContext::new(scenes),
        )
    }

    #[test]
    fn paused_clock_stops_fuel_and_sim_time() {
        let (mut systems, mut ctx) = fixture();
        systems.fuel.toggle(false, false);

        ctx.clock.acquire(crate::core::clock::PauseOwner::Menu);
        systems.update(&mut ctx, 1.0);

        assert!(systems.fuel.is_full());
        assert_eq!(ctx.sim_time, 0.0);
    }

    #[test]
    fn running_clock_burns_fuel() {
        let (mut systems, mut ctx) = fixture();
        systems.fuel.toggle(false, false);

        systems.update(&mut ctx, 1.0);

        assert!(!systems.fuel.is_full());
        assert_eq!(ctx.sim_time, 1.0);
    }

    #[test]
    fn depletion_emits_an_event() {
        let (mut systems, mut ctx) = fixture();
        systems.fuel.toggle(false, false);

        systems.update(&mut ctx, 60.0);

        assert!(ctx
            .events
            .iter()
            .any(|e| matches!(e, CoreEvent::LightDepleted)));
    }

    #[test]
    fn scene_load_restores_scoped_state() {
        let (mut systems, mut ctx) = fixture();
        ctx.shared.set_fuel_timer(20.0);
        ctx.shared.set_health(2);

        ctx.enter_scene(TestScene::Garden);
        systems.on_scene_loaded(&mut ctx);

        assert!((systems.fuel.remaining_ratio() - (40.0 / 60.0)).abs() < 1e-6);
        assert_eq!(systems.health.current(), 2);

        // An unscoped scene resets instead.
        ctx.enter_scene(TestScene::Attic);
        systems.on_scene_loaded(&mut ctx);
        assert!(systems.fuel.is_full());
        assert_eq!(systems.health.current(), 3);
    }
}
