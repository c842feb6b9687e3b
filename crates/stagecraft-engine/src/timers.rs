//! Cooperative timers driven by frame time.
//!
//! Nothing fires on its own: the frame loop calls `advance(dt)` and gets
//! back the timers that came due, in due-time order. Every timer is
//! tracked until it fires (one-shot) or is cancelled.

use std::collections::BTreeMap;

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy)]
struct Timer {
    due: f64,
    /// `Some(period)` for repeating timers.
    period: Option<f64>,
}

/// All pending timers plus the clock they run against.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: f64,
    next_id: u64,
    timers: BTreeMap<TimerId, Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds elapsed on this queue's clock.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Fire once after `delay` seconds.
    pub fn schedule_once(&mut self, delay: f64) -> TimerId {
        self.insert(delay.max(0.0), None)
    }

    /// Fire every `period` seconds, first after one period.
    pub fn schedule_repeating(&mut self, period: f64) -> TimerId {
        let period = period.max(f64::EPSILON);
        self.insert(period, Some(period))
    }

    fn insert(&mut self, delay: f64, period: Option<f64>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.insert(
            id,
            Timer {
                due: self.now + delay,
                period,
            },
        );
        id
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    /// Move the clock forward and collect due timers. A repeating timer
    /// that is due several times within `dt` is reported once per period.
    pub fn advance(&mut self, dt: f64) -> Vec<TimerId> {
        self.now += dt.max(0.0);
        let mut fired: Vec<(f64, TimerId)> = Vec::new();

        let due_ids: Vec<TimerId> = self
            .timers
            .iter()
            .filter(|(_, t)| t.due <= self.now)
            .map(|(&id, _)| id)
            .collect();

        for id in due_ids {
            let Some(timer) = self.timers.get_mut(&id) else {
                continue;
            };
            match timer.period {
                Some(period) => {
                    while timer.due <= self.now {
                        fired.push((timer.due, id));
                        timer.due += period;
                    }
                }
                None => {
                    fired.push((timer.due, id));
                    self.timers.remove(&id);
                }
            }
        }

        fired.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        fired.into_iter().map(|(_, id)| id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_once_fires_once() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule_once(0.5);
        assert!(timers.advance(0.4).is_empty());
        assert_eq!(timers.advance(0.2), vec![id]);
        assert!(timers.advance(1.0).is_empty());
        assert_eq!(timers.active_count(), 0);
    }

    #[test]
    fn test_repeating_catches_up() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule_repeating(1.0);
        assert_eq!(timers.advance(3.5), vec![id, id, id]);
        assert!(timers.is_active(id));
    }

    #[test]
    fn test_cancel() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule_repeating(0.1);
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert!(timers.advance(1.0).is_empty());
    }

    #[test]
    fn test_fired_in_due_order() {
        let mut timers = TimerQueue::new();
        let late = timers.schedule_once(0.9);
        let early = timers.schedule_once(0.2);
        assert_eq!(timers.advance(1.0), vec![early, late]);
    }
}
