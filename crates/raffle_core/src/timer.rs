//! Repeating tick scheduling for the draw animation.
//!
//! A scheduler starts a repeating timer and hands back a [`TimerHandle`]. Ticks are
//! delivered to whoever owns the engine (a UI event queue, a CLI loop) and fed back
//! through `DrawEngine::on_tick`; the engine itself never runs on the timer task.

use std::{
    collections::VecDeque,
    fmt,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use tokio::{
    runtime::Handle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

/// Identifies one started draw. Ticks carry the id of the draw that scheduled them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrawId(pub u64);

impl fmt::Display for DrawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "draw-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawTick {
    pub draw_id: DrawId,
}

/// Owned cancellation token for a running timer. Cancels on drop.
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TimerHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("active", &self.is_active())
            .finish()
    }
}

pub trait TickScheduler: Send {
    /// Starts a timer firing every `interval`, first tick one interval from now.
    fn schedule_repeating(&self, draw_id: DrawId, interval: Duration) -> TimerHandle;
}

/// Receives ticks from a running timer. Returning `false` means the receiving side
/// is gone and the timer task should stop.
pub type TickSink = Arc<dyn Fn(DrawTick) -> bool + Send + Sync>;

pub struct TokioTickScheduler {
    runtime: Handle,
    sink: TickSink,
}

impl TokioTickScheduler {
    pub fn new(runtime: Handle, sink: TickSink) -> Self {
        Self { runtime, sink }
    }

    /// Scheduler bound to the runtime of the calling task.
    pub fn current(sink: TickSink) -> Self {
        Self::new(Handle::current(), sink)
    }
}

impl TickScheduler for TokioTickScheduler {
    fn schedule_repeating(&self, draw_id: DrawId, interval: Duration) -> TimerHandle {
        let sink = Arc::clone(&self.sink);
        let task = self.runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !sink(DrawTick { draw_id }) {
                    debug!(%draw_id, "tick receiver dropped; stopping timer task");
                    break;
                }
            }
        });

        TimerHandle::new(move || {
            debug!(%draw_id, "cancelling draw timer");
            task.abort();
        })
    }
}

#[derive(Default)]
struct ManualTimers {
    scheduled: Vec<(DrawId, Duration)>,
    active: Option<DrawId>,
}

/// Scheduler without a clock. The caller asks for ticks explicitly with
/// [`ManualTickScheduler::next_tick`]; used for instant draws and tests.
#[derive(Clone, Default)]
pub struct ManualTickScheduler {
    timers: Arc<Mutex<ManualTimers>>,
    cancellations: Arc<AtomicUsize>,
}

impl ManualTickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tick for the currently running timer, if any.
    pub fn next_tick(&self) -> Option<DrawTick> {
        self.lock().active.map(|draw_id| DrawTick { draw_id })
    }

    pub fn active_draw(&self) -> Option<DrawId> {
        self.lock().active
    }

    pub fn scheduled(&self) -> Vec<(DrawId, Duration)> {
        self.lock().scheduled.clone()
    }

    pub fn cancellations(&self) -> usize {
        self.cancellations.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualTimers> {
        self.timers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TickScheduler for ManualTickScheduler {
    fn schedule_repeating(&self, draw_id: DrawId, interval: Duration) -> TimerHandle {
        {
            let mut timers = self.lock();
            timers.scheduled.push((draw_id, interval));
            timers.active = Some(draw_id);
        }

        let timers = Arc::clone(&self.timers);
        let cancellations = Arc::clone(&self.cancellations);
        TimerHandle::new(move || {
            let mut timers = timers
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if timers.active == Some(draw_id) {
                timers.active = None;
            }
            cancellations.fetch_add(1, Ordering::SeqCst);
        })
    }
}

/// Ticks pushed into a plain queue; handy sink for single-threaded loops.
#[derive(Clone, Default)]
pub struct TickQueue {
    inner: Arc<Mutex<VecDeque<DrawTick>>>,
}

impl TickQueue {
    pub fn sink(&self) -> TickSink {
        let inner = Arc::clone(&self.inner);
        Arc::new(move |tick| {
            inner
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push_back(tick);
            true
        })
    }

    pub fn pop(&self) -> Option<DrawTick> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
