//! Cancellable scheduling.
//!
//! The core never runs callbacks itself. It asks a [`Scheduler`] for a frame
//! or a timeout and receives a [`TaskHandle`]; when the host fires that task it
//! hands the handle back to the controller. Handles that were cancelled or
//! that the controller no longer knows about are ignored.

use crate::config::ThrottleMode;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

impl TaskHandle {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

pub trait Scheduler {
    /// Fire once at the next animation frame.
    fn request_frame(&mut self) -> TaskHandle;
    /// Fire once after `delay`.
    fn request_timeout(&mut self, delay: Duration) -> TaskHandle;
    fn cancel(&mut self, handle: TaskHandle);
}

/// At most one outstanding task; scheduling again cancels the previous one.
#[derive(Debug, Default)]
pub struct TaskSlot(Option<TaskHandle>);

impl TaskSlot {
    pub fn is_pending(&self) -> bool {
        self.0.is_some()
    }

    pub fn replace(&mut self, handle: TaskHandle, scheduler: &mut dyn Scheduler) {
        if let Some(old) = self.0.replace(handle) {
            scheduler.cancel(old);
        }
    }

    /// Consume the slot if `handle` is the task it holds.
    pub fn take_if(&mut self, handle: TaskHandle) -> bool {
        if self.0 == Some(handle) {
            self.0 = None;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(h) = self.0.take() {
            scheduler.cancel(h);
        }
    }
}

/// Coalesces bursts of input: only the most recent value survives until the
/// window closes, and at most one delivery happens per window.
#[derive(Debug)]
pub struct Throttle<T> {
    mode: ThrottleMode,
    pending: Option<T>,
    slot: TaskSlot,
}

impl<T> Throttle<T> {
    pub fn new(mode: ThrottleMode) -> Self {
        Self {
            mode,
            pending: None,
            slot: TaskSlot::default(),
        }
    }

    pub fn mode(&self) -> ThrottleMode {
        self.mode
    }

    /// Takes effect from the next window.
    pub fn set_mode(&mut self, mode: ThrottleMode) {
        self.mode = mode;
    }

    pub fn push(&mut self, value: T, scheduler: &mut dyn Scheduler) {
        self.pending = Some(value);
        if !self.slot.is_pending() {
            let handle = match self.mode {
                ThrottleMode::AnimationFrame => scheduler.request_frame(),
                ThrottleMode::Interval(d) => scheduler.request_timeout(d),
            };
            self.slot.replace(handle, scheduler);
        }
    }

    /// Returns the value to deliver if `handle` closes this throttle's window.
    pub fn fire(&mut self, handle: TaskHandle) -> Option<T> {
        if self.slot.take_if(handle) {
            self.pending.take()
        } else {
            None
        }
    }

    pub fn cancel(&mut self, scheduler: &mut dyn Scheduler) {
        self.slot.cancel(scheduler);
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_pending()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Due {
    Frame,
    At(Duration),
}

/// Deterministic scheduler driven by explicit frame and clock advances.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    now: Duration,
    tasks: Vec<(TaskHandle, Due)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|(h, _)| *h == handle)
    }

    /// Fire every frame task requested so far, in request order.
    pub fn take_frame(&mut self) -> Vec<TaskHandle> {
        let mut fired = Vec::new();
        self.tasks.retain(|(h, due)| {
            if *due == Due::Frame {
                fired.push(*h);
                false
            } else {
                true
            }
        });
        fired
    }

    /// Move the clock forward and fire the timeouts that became due,
    /// earliest first.
    pub fn advance(&mut self, by: Duration) -> Vec<TaskHandle> {
        self.now += by;
        let now = self.now;
        let mut due: Vec<(TaskHandle, Duration)> = Vec::new();
        self.tasks.retain(|(h, d)| match d {
            Due::At(t) if *t <= now => {
                due.push((*h, *t));
                false
            }
            _ => true,
        });
        due.sort_by_key(|(h, t)| (*t, h.raw()));
        due.into_iter().map(|(h, _)| h).collect()
    }

    fn push(&mut self, due: Due) -> TaskHandle {
        self.next_id += 1;
        let handle = TaskHandle(self.next_id);
        self.tasks.push((handle, due));
        handle
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&mut self) -> TaskHandle {
        self.push(Due::Frame)
    }

    fn request_timeout(&mut self, delay: Duration) -> TaskHandle {
        let at = self.now + delay;
        self.push(Due::At(at))
    }

    fn cancel(&mut self, handle: TaskHandle) {
        self.tasks.retain(|(h, _)| *h != handle);
    }
}
