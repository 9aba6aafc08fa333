//! Query debounce control
//!
//! Every keystroke aborts the pending timer task and spawns a new one. Each
//! scheduled timer carries a sequence number; only the latest one is current, so a
//! firing (or a lookup started by one) that was overtaken is recognisably stale.
//! Lookups already dispatched can also be retired without touching a timer that
//! is still waiting to fire.

use super::WidgetEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct QueryDebouncer {
    delay: Duration,
    /// Sequence number of the most recently scheduled query
    generation: u64,
    /// Sequence number of the latest lookup handed to the resolver
    dispatched: u64,
    /// Results at or below this sequence are ignored
    result_floor: u64,
    pending: Option<JoinHandle<()>>,
    events: mpsc::UnboundedSender<WidgetEvent>,
}

impl QueryDebouncer {
    pub fn new(delay: Duration, events: mpsc::UnboundedSender<WidgetEvent>) -> Self {
        Self {
            delay,
            generation: 0,
            dispatched: 0,
            result_floor: 0,
            pending: None,
            events,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending timer with one that fires `query` after the delay.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, query: String) -> u64 {
        self.cancel_pending();
        self.generation += 1;

        let seq = self.generation;
        let delay = self.delay;
        let events = self.events.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(WidgetEvent::QueryReady { seq, query });
        }));

        seq
    }

    pub fn is_current(&self, seq: u64) -> bool {
        seq == self.generation
    }

    /// Record that the lookup for `seq` has started
    pub fn mark_dispatched(&mut self, seq: u64) {
        self.dispatched = self.dispatched.max(seq);
    }

    /// Ignore results of every lookup started so far. A timer that has not
    /// fired yet keeps its sequence and still delivers.
    pub fn retire_dispatched(&mut self) {
        self.result_floor = self.dispatched;
    }

    /// Whether results for `seq` may still be applied
    pub fn accepts_result(&self, seq: u64) -> bool {
        self.is_current(seq) && seq > self.result_floor
    }

    pub fn latest(&self) -> u64 {
        self.generation
    }

    pub fn has_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for QueryDebouncer {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
