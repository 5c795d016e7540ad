//=========================================================================
// Event Collector
//=========================================================================
//
// Host event collector with bounded polling and shutdown detection.
//
// Architecture:
//   Receiver<HostEvent> → collect() → pending → TickControl
//
// Bounded polling prevents a chatty host from starving the tick. The
// collector never blocks: the host drives the tick cadence, so an
// empty channel simply yields an empty batch.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::HostEvent;
use crate::core::state::SceneKey;

//=== TickControl =========================================================

/// Update loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

/// Collects host events with bounded per-tick draining.
pub(crate) struct EventCollector<S: SceneKey> {
    receiver: Receiver<HostEvent<S>>,
    pending: Vec<HostEvent<S>>,
}

impl<S: SceneKey> EventCollector<S> {
    pub(crate) fn new(receiver: Receiver<HostEvent<S>>) -> Self {
        Self {
            receiver,
            pending: Vec::with_capacity(8),
        }
    }

    /// Drains pending host events (bounded to prevent starvation).
    ///
    /// Returns Exit when the host requests shutdown or drops its side
    /// of the channel.
    pub(crate) fn collect(&mut self) -> TickControl {
        const MAX_EVENTS_PER_TICK: usize = 100;

        self.pending.clear();
        let mut drained = 0;

        while drained < MAX_EVENTS_PER_TICK {
            match self.receiver.try_recv() {
                Ok(HostEvent::Shutdown) => return TickControl::Exit,
                Ok(event) => {
                    self.pending.push(event);
                    drained += 1;
                }
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= MAX_EVENTS_PER_TICK {
            warn!("Host event backlog: drained {} events this tick", drained);
        }

        TickControl::Continue
    }

    /// Takes ownership of the collected events, leaving an empty vec.
    ///
    /// Efficient transfer without allocation. The internal buffer is
    /// replaced with an empty Vec (cleared next tick anyway).
    pub(crate) fn take_pending(&mut self) -> Vec<HostEvent<S>> {
        std::mem::take(&mut self.pending)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestScene {
        Garden,
        Cellar,
    }

    impl SceneKey for TestScene {}

    #[test]
    fn collect_handles_empty_channel() {
        let (_tx, rx) = unbounded::<HostEvent<TestScene>>();
        let mut collector = EventCollector::new(rx);

        let result = collector.collect();

        assert_eq!(result, TickControl::Continue);
        assert!(collector.take_pending().is_empty());
    }

    #[test]
    fn collect_preserves_event_order() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(HostEvent::SceneLoaded(TestScene::Garden)).unwrap();
        tx.send(HostEvent::ToggleLight).unwrap();

        assert_eq!(collector.collect(), TickControl::Continue);
        assert_eq!(
            collector.take_pending(),
            vec![
                HostEvent::SceneLoaded(TestScene::Garden),
                HostEvent::ToggleLight,
            ]
        );
    }

    #[test]
    fn collect_returns_exit_on_shutdown_event() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::<TestScene>::new(rx);

        tx.send(HostEvent::Shutdown).unwrap();

        assert_eq!(collector.collect(), TickControl::Exit);
    }

    #[test]
    fn collect_returns_exit_on_disconnect() {
        let (tx, rx) = unbounded::<HostEvent<TestScene>>();
        let mut collector = EventCollector::new(rx);

        drop(tx);

        assert_eq!(collector.collect(), TickControl::Exit);
    }

    #[test]
    fn collect_clears_previous_batch() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(HostEvent::SceneLoaded(TestScene::Cellar)).unwrap();
        collector.collect();
        assert_eq!(collector.take_pending().len(), 1);

        collector.collect();
        assert!(collector.take_pending().is_empty());
    }
}
