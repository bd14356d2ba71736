//! Timer implementations.
//!
//! - [`TokioScheduler`] - real timers; expirations are sent back to the UI task
//! - [`ManualScheduler`] - a virtual clock for deterministic tests

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::host::{Scheduler, Task, TimerHandle};

// =============================================================================
// Tokio
// =============================================================================

/// A timer expiry on its way back to the UI task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired {
    pub handle: TimerHandle,
    pub task: Task,
}

#[derive(Debug)]
struct Timer {
    join: JoinHandle<()>,
    repeating: bool,
}

/// Scheduler backed by tokio timers.
///
/// Every timer is a spawned task that sends a [`Fired`] into `tasks` when it
/// expires. A delivery can already be queued when its timer is cancelled, so
/// the receiver must [`claim`](Self::claim) each one before running it. Must
/// be used from within a tokio runtime.
#[derive(Debug)]
pub struct TokioScheduler {
    tasks: mpsc::UnboundedSender<Fired>,
    timers: HashMap<TimerHandle, Timer>,
    next_id: u64,
}

impl TokioScheduler {
    #[must_use]
    pub fn new(tasks: mpsc::UnboundedSender<Fired>) -> Self {
        Self {
            tasks,
            timers: HashMap::new(),
            next_id: 0,
        }
    }

    /// Number of timers that are neither cancelled nor claimed.
    #[must_use]
    pub fn active(&self) -> usize {
        self.timers.len()
    }

    /// Accept a delivery for `handle`.
    ///
    /// Returns `false` for a timer that was cancelled after it fired; its
    /// task must be dropped. A one-shot timer can be claimed once.
    pub fn claim(&mut self, handle: TimerHandle) -> bool {
        match self.timers.get(&handle) {
            Some(timer) if timer.repeating => true,
            Some(_) => {
                self.timers.remove(&handle);
                true
            }
            None => false,
        }
    }

    fn next_handle(&mut self) -> TimerHandle {
        self.next_id += 1;
        TimerHandle::new(self.next_id)
    }
}

impl Scheduler for TokioScheduler {
    fn once(&mut self, delay: Duration, task: Task) -> TimerHandle {
        let handle = self.next_handle();
        let tasks = self.tasks.clone();
        let join = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The UI task is gone when the receiver is closed; nothing to deliver to.
            let _ = tasks.send(Fired { handle, task });
        });
        self.timers.insert(
            handle,
            Timer {
                join,
                repeating: false,
            },
        );
        handle
    }

    fn every(&mut self, interval: Duration, task: Task) -> TimerHandle {
        let handle = self.next_handle();
        let tasks = self.tasks.clone();
        let join = tokio::spawn(async move {
            let mut ticks = tokio::time::interval_at(Instant::now() + interval, interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                let fired = Fired {
                    handle,
                    task: task.clone(),
                };
                if tasks.send(fired).is_err() {
                    break;
                }
            }
        });
        self.timers.insert(
            handle,
            Timer {
                join,
                repeating: true,
            },
        );
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(timer) = self.timers.remove(&handle) {
            timer.join.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for timer in self.timers.values() {
            timer.join.abort();
        }
    }
}

// =============================================================================
// Manual
// =============================================================================

#[derive(Debug, Clone)]
struct Pending {
    handle: TimerHandle,
    due: Duration,
    interval: Option<Duration>,
    task: Task,
}

/// Scheduler driven by an explicit virtual clock.
///
/// Nothing fires on its own: [`ManualScheduler::next_due`] pops the earliest
/// timer due at or before a deadline and moves the clock to it.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    pending: Vec<Pending>,
    next_id: u64,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Number of scheduled timers.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Whether `task` is scheduled on any timer.
    #[must_use]
    pub fn is_scheduled(&self, task: &Task) -> bool {
        self.pending.iter().any(|pending| pending.task == *task)
    }

    /// Fire the earliest timer due at or before `deadline`.
    ///
    /// Ties fire in scheduling order. Interval timers are re-armed. Returns
    /// `None` and moves the clock to `deadline` once nothing else is due.
    pub fn next_due(&mut self, deadline: Duration) -> Option<Task> {
        let position = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, pending)| pending.due <= deadline)
            .min_by_key(|(_, pending)| (pending.due, pending.handle))
            .map(|(position, _)| position);

        let Some(position) = position else {
            self.now = self.now.max(deadline);
            return None;
        };

        let pending = self.pending.remove(position);
        self.now = pending.due;
        if let Some(interval) = pending.interval {
            self.pending.push(Pending {
                due: pending.due + interval,
                ..pending.clone()
            });
        }
        Some(pending.task)
    }

    fn schedule(&mut self, delay: Duration, interval: Option<Duration>, task: Task) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle::new(self.next_id);
        self.pending.push(Pending {
            handle,
            due: self.now + delay,
            interval,
            task,
        });
        handle
    }
}

impl Scheduler for ManualScheduler {
    fn once(&mut self, delay: Duration, task: Task) -> TimerHandle {
        self.schedule(delay, None, task)
    }

    fn every(&mut self, interval: Duration, task: Task) -> TimerHandle {
        self.schedule(interval, Some(interval), task)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|pending| pending.handle != handle);
    }
}
