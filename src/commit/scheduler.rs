use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};

use super::CommitState;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = false;

use crate::log_debug;

/// Deadline used when the configured timeout overflows the clock.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

type ExpireFn = dyn Fn() + Send + Sync;

/// Restartable one-shot timer.
///
/// Every stroke up re-arms it, every stroke down disarms it; when it runs out
/// the `on_expire` callback fires once.
#[derive(Clone)]
pub struct CommitScheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    runtime: Handle,
    timeout_ms: AtomicU64,
    slot: Mutex<Slot>,
    on_expire: Box<ExpireFn>,
}

#[derive(Default)]
struct Slot {
    state: CommitState,
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl SchedulerInner {
    fn slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CommitScheduler {
    pub fn new<F>(runtime: Handle, timeout: Duration, on_expire: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(SchedulerInner {
                runtime,
                timeout_ms: AtomicU64::new(whole_millis(timeout)),
                slot: Mutex::new(Slot::default()),
                on_expire: Box::new(on_expire),
            }),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.inner.timeout_ms.load(Ordering::SeqCst))
    }

    /// Applies from the next [`CommitScheduler::schedule`].
    pub fn set_timeout(&self, timeout: Duration) {
        self.inner
            .timeout_ms
            .store(whole_millis(timeout), Ordering::SeqCst);
    }

    pub fn state(&self) -> CommitState {
        self.inner.slot().state
    }

    /// Disarm any pending timer and arm a fresh one.
    pub fn schedule(&self) {
        let now = Instant::now();
        let deadline = now
            .checked_add(self.timeout())
            .unwrap_or(now + FAR_FUTURE);
        let mut slot = self.inner.slot();
        if let Some(task) = slot.task.take() {
            task.abort();
        }
        slot.generation += 1;
        slot.state = CommitState::Pending { deadline };

        let generation = slot.generation;
        let inner = Arc::clone(&self.inner);
        slot.task = Some(self.inner.runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;

            let fire = {
                let mut slot = inner.slot();
                let current = slot.generation == generation;
                if current {
                    slot.state = CommitState::Idle;
                    slot.task = None;
                }
                current
            };
            if fire {
                log_debug!("commit timer expired");
                (inner.on_expire)();
            }
        }));
    }

    /// Disarm the timer. A no-op when nothing is pending.
    pub fn cancel(&self) {
        let mut slot = self.inner.slot();
        slot.generation += 1;
        slot.state = CommitState::Idle;
        if let Some(task) = slot.task.take() {
            task.abort();
        }
    }
}

fn whole_millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}
