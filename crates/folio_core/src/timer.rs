//! Virtual timers
//!
//! `setTimeout` for the headless page. Time only moves when the owner calls
//! [`TimerQueue::advance_to`], which makes every delayed behaviour (simulated
//! network latency, notification lifetimes, staggered entrances)
//! reproducible in tests.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle returned by [`TimerQueue::schedule`]
    pub struct TimerId;
}

struct PendingTimer<T> {
    deadline_ms: u64,
    /// Scheduling order, breaks deadline ties
    seq: u64,
    task: T,
}

/// Queue of delayed tasks driven by a virtual millisecond clock
pub struct TimerQueue<T> {
    timers: SlotMap<TimerId, PendingTimer<T>>,
    now_ms: u64,
    next_seq: u64,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            now_ms: 0,
            next_seq: 0,
        }
    }

    /// Current virtual time in milliseconds
    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Run `task` once `delay_ms` have elapsed
    pub fn schedule(&mut self, delay_ms: u64, task: T) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(PendingTimer {
            deadline_ms: self.now_ms.saturating_add(delay_ms),
            seq,
            task,
        })
    }

    /// Cancel a pending timer, returning its task if it had not fired yet
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        self.timers.remove(id).map(|timer| timer.task)
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Deadline of the earliest pending timer
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.values().map(|t| t.deadline_ms).min()
    }

    /// Move the clock to `now_ms` (never backwards) and pop every task whose
    /// deadline has passed, ordered by deadline then scheduling order.
    pub fn advance_to(&mut self, now_ms: u64) -> Vec<(TimerId, T)> {
        self.now_ms = self.now_ms.max(now_ms);

        let mut due: Vec<(u64, u64, TimerId)> = self
            .timers
            .iter()
            .filter(|(_, t)| t.deadline_ms <= self.now_ms)
            .map(|(id, t)| (t.deadline_ms, t.seq, id))
            .collect();
        due.sort_unstable_by_key(|(deadline, seq, _)| (*deadline, *seq));

        due.into_iter()
            .filter_map(|(_, _, id)| self.timers.remove(id).map(|t| (id, t.task)))
            .collect()
    }

    /// Drop all pending timers
    pub fn clear(&mut self) {
        self.timers.clear();
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tasks_fire_in_deadline_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(300, "c");
        timers.schedule(100, "a");
        timers.schedule(100, "b");

        assert!(timers.advance_to(99).is_empty());
        let fired: Vec<_> = timers.advance_to(100).into_iter().map(|(_, t)| t).collect();
        assert_eq!(fired, vec!["a", "b"]);
        assert_eq!(timers.next_deadline(), Some(300));

        let fired: Vec<_> = timers.advance_to(5000).into_iter().map(|(_, t)| t).collect();
        assert_eq!(fired, vec!["c"]);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_cancel_and_relative_delays() {
        let mut timers = TimerQueue::new();
        timers.advance_to(1000);
        let id = timers.schedule(200, 1);
        assert!(timers.is_pending(id));
        assert_eq!(timers.next_deadline(), Some(1200));
        assert_eq!(timers.cancel(id), Some(1));
        assert_eq!(timers.cancel(id), None);
        assert!(timers.advance_to(2000).is_empty());
    }

    #[test]
    fn test_clock_never_moves_backwards() {
        let mut timers: TimerQueue<()> = TimerQueue::new();
        timers.advance_to(500);
        timers.advance_to(100);
        assert_eq!(timers.now(), 500);
    }
}
