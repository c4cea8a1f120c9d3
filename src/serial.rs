//! Serialization of the final sink write between concurrent callers.
//!
//! Formatting never needs a lock because it only touches call-local stack
//! buffers. Only the sink write is guarded, and only once the scheduler that
//! can interleave callers is running.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use parking_lot::{Mutex, MutexGuard};

/// Reports whether the scheduler that runs concurrent log callers is active.
///
/// Before the scheduler starts there is exactly one caller, so the lock is
/// skipped. Closures `Fn() -> bool` implement this trait.
pub trait SchedulerState: Send + Sync {
    fn is_running(&self) -> bool;
}

impl<F> SchedulerState for F
where
    F: Fn() -> bool + Send + Sync,
{
    #[inline]
    fn is_running(&self) -> bool {
        self()
    }
}

/// Scheduler probe for hosted targets, where OS threads may run at any time.
#[derive(Debug, Clone, Copy, Default)]
pub struct Preemptive;

impl SchedulerState for Preemptive {
    #[inline]
    fn is_running(&self) -> bool {
        true
    }
}

/// A scheduler flag flipped by the application once it starts its tasks.
#[derive(Debug, Default)]
pub struct SchedulerFlag(AtomicBool);

impl SchedulerFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn start(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn stop(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SchedulerState for SchedulerFlag {
    #[inline]
    fn is_running(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// A lazily created lock around sink writes.
///
/// The mutex is created on the first call to [`init`](SerialLock::init),
/// which the log writer makes on every write; applications may call it
/// earlier, before starting concurrent callers.
pub struct SerialLock {
    lock: OnceLock<Mutex<()>>,
    scheduler: Box<dyn SchedulerState>,
}

/// Held across one sink write. `None` inside means the write went through
/// unguarded.
pub struct WriteGuard<'a> {
    guard: Option<MutexGuard<'a, ()>>,
}

impl<'a> WriteGuard<'a> {
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.guard.is_some()
    }
}

impl SerialLock {
    pub fn new(scheduler: impl SchedulerState + 'static) -> Self {
        Self {
            lock: OnceLock::new(),
            scheduler: Box::new(scheduler),
        }
    }

    /// Creates the mutex if it does not exist yet. Idempotent.
    #[inline]
    pub fn init(&self) {
        self.lock.get_or_init(|| Mutex::new(()));
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.lock.get().is_some()
    }

    /// Acquires the lock for one write, waiting as long as it takes.
    ///
    /// Returns an unlocked guard if the scheduler is not running or the lock
    /// was never created. The caller writes in either case, so a message is
    /// never dropped for lack of the lock.
    pub fn acquire(&self) -> WriteGuard<'_> {
        let guard = if self.scheduler.is_running() {
            self.lock.get().map(|lock| lock.lock())
        } else {
            None
        };
        WriteGuard { guard }
    }
}
