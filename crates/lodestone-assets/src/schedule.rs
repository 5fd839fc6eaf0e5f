//! Frame-deferred task scheduling.
//!
//! The asset system models "asynchronous" load/unload as cooperative
//! latency: a lifecycle request flips the unit's state immediately and
//! queues the actual transition to run a few logical frames later, when the
//! host drains the scheduler with [`FrameScheduler::tick`]. No worker
//! threads are involved; everything runs on whichever thread ticks.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

type Task = Box<dyn FnOnce() + Send + 'static>;

struct DelayedTask {
    due_frame: u64,
    seq: u64,
    task: Task,
}

#[derive(Default)]
struct SchedulerInner {
    queue: Mutex<Vec<DelayedTask>>,
    frame: AtomicU64,
    next_seq: AtomicU64,
}

/// A queue of callbacks executed after a number of logical frame ticks.
///
/// Handles are cheap to clone and share one queue. Tasks submitted with the
/// same delay run in submission order; tasks with differing delays run in
/// non-decreasing delay order as frames elapse.
#[derive(Clone, Default)]
pub struct FrameScheduler {
    inner: Arc<SchedulerInner>,
}

impl FrameScheduler {
    /// Create a new scheduler at frame zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` to run once `delay_frames` ticks have elapsed.
    ///
    /// A delay of zero runs on the next tick, never inside the current one.
    pub fn add_delayed_task(&self, delay_frames: u64, task: impl FnOnce() + Send + 'static) {
        let due_frame = self.inner.frame.load(Ordering::Relaxed) + delay_frames;
        let seq = self.inner.next_seq.fetch_add(1, Ordering::Relaxed);
        self.inner.queue.lock().push(DelayedTask {
            due_frame,
            seq,
            task: Box::new(task),
        });
    }

    /// Advance one logical frame and run every task that has come due.
    ///
    /// Tasks run outside the queue lock, so they may safely queue further
    /// tasks; those land on a later frame.
    pub fn tick(&self) {
        let frame = self.inner.frame.fetch_add(1, Ordering::Relaxed) + 1;

        let mut due = {
            let mut queue = self.inner.queue.lock();
            let mut due = Vec::new();
            let mut i = 0;
            while i < queue.len() {
                if queue[i].due_frame <= frame {
                    due.push(queue.swap_remove(i));
                } else {
                    i += 1;
                }
            }
            due
        };

        due.sort_by_key(|t| (t.due_frame, t.seq));
        for entry in due {
            (entry.task)();
        }
    }

    /// The current logical frame number.
    pub fn frame(&self) -> u64 {
        self.inner.frame.load(Ordering::Relaxed)
    }

    /// Number of tasks waiting to come due.
    pub fn pending_count(&self) -> usize {
        self.inner.queue.lock().len()
    }

    /// Check if any tasks are waiting.
    pub fn has_pending(&self) -> bool {
        self.pending_count() > 0
    }
}
