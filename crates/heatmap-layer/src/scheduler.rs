//! Deferred work: next-frame callbacks and one-shot timers.
//!
//! The layer never runs deferred work itself. It asks a [`FrameScheduler`]
//! for a handle, and the host hands the handle back through
//! `HeatmapLayer::on_frame` / `HeatmapLayer::on_timer` once it fires.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Identifies one requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Identifies one started timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// Host primitive for scheduling deferred work.
///
/// Cancelling a handle that is unknown or has already fired is a no-op.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;

    fn cancel_frame(&mut self, handle: FrameHandle);

    fn start_timer(&mut self, duration: Duration) -> TimerHandle;

    fn cancel_timer(&mut self, handle: TimerHandle);
}

#[derive(Debug, Default)]
struct QueueState {
    next_id: u64,
    frames: Vec<FrameHandle>,
    timers: Vec<(TimerHandle, Duration)>,
}

impl QueueState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Single-threaded scheduler that queues requests until drained.
///
/// Clones share the same queue, so a host can hand one clone to the layer
/// and keep another to pump frames.
#[derive(Debug, Clone, Default)]
pub struct QueueScheduler {
    state: Rc<RefCell<QueueState>>,
}

impl QueueScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every pending frame in request order.
    pub fn take_frames(&self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.state.borrow_mut().frames)
    }

    /// Remove and return every pending timer in start order.
    pub fn take_timers(&self) -> Vec<TimerHandle> {
        let timers = std::mem::take(&mut self.state.borrow_mut().timers);
        timers.into_iter().map(|(handle, _)| handle).collect()
    }

    pub fn pending_frames(&self) -> usize {
        self.state.borrow().frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Duration a pending timer was started with.
    pub fn timer_duration(&self, handle: TimerHandle) -> Option<Duration> {
        self.state
            .borrow()
            .timers
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, d)| *d)
    }
}

impl FrameScheduler for QueueScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let mut state = self.state.borrow_mut();
        let handle = FrameHandle(state.next_id());
        state.frames.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.state.borrow_mut().frames.retain(|h| *h != handle);
    }

    fn start_timer(&mut self, duration: Duration) -> TimerHandle {
        let mut state = self.state.borrow_mut();
        let handle = TimerHandle(state.next_id());
        state.timers.push((handle, duration));
        handle
    }

    fn cancel_timer(&mut self, handle: TimerHandle) {
        self.state.borrow_mut().timers.retain(|(h, _)| *h != handle);
    }
}
