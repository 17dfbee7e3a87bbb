//! One-shot deferred-callback timer service
//!
//! Owns every scheduled callback and fires each one once its deadline
//! passes. Callbacks are registered through a [`TimerHandle`], a weak
//! reference that safely no-ops once the service is gone.
//!
//! # Background Thread Mode
//!
//! The service can run on its own driver thread via `start_background()`,
//! firing due entries at a fixed polling cadence:
//!
//! ```
//! use typewriter::TimerService;
//! use std::time::Duration;
//!
//! let mut timers = TimerService::new();
//! timers.start_background();
//! timers.handle().schedule(Duration::from_millis(5), || println!("fired"));
//! ```
//!
//! # Manual Mode
//!
//! Hosts that own their own loop (and tests that need determinism) skip the
//! thread and drain entries explicitly with [`TimerService::fire_next`] or
//! [`TimerService::fire_due`].

use slotmap::{new_key_type, SlotMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

new_key_type! {
    /// Handle to a scheduled callback
    pub struct TimerId;
}

type TimerCallback = Box<dyn FnOnce() + Send>;

struct TimerEntry {
    deadline: Instant,
    callback: TimerCallback,
}

/// Internal state of the timer service
struct TimerInner {
    entries: SlotMap<TimerId, TimerEntry>,
}

impl TimerInner {
    /// Remove and return the entry with the earliest deadline, if any.
    fn take_earliest(&mut self) -> Option<TimerEntry> {
        let id = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.deadline)
            .map(|(id, _)| id)?;
        self.entries.remove(id)
    }
}

/// The timer service that fires scheduled one-shot callbacks
///
/// This is typically held by the host for the lifetime of the animation and
/// shared with animators via [`TimerHandle`]. Each entry fires exactly once;
/// cancelled entries never fire.
pub struct TimerService {
    inner: Arc<Mutex<TimerInner>>,
    /// Stop signal for the background thread
    stop_flag: Arc<AtomicBool>,
    /// Background thread handle (if running)
    thread_handle: Option<JoinHandle<()>>,
}

impl TimerService {
    /// Polling cadence of the background driver thread.
    const POLL_INTERVAL: Duration = Duration::from_millis(2);

    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(TimerInner {
                entries: SlotMap::with_key(),
            })),
            stop_flag: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
        }
    }

    /// Get a handle to this service for passing to animators
    pub fn handle(&self) -> TimerHandle {
        TimerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Start the driver on a background thread
    ///
    /// Due entries fire in deadline order at the polling cadence. Callbacks
    /// run on the driver thread with the service lock released, so a
    /// callback may schedule its successor on this same service.
    pub fn start_background(&mut self) {
        if self.thread_handle.is_some() {
            return; // Already running
        }

        let inner = Arc::clone(&self.inner);
        let stop_flag = Arc::clone(&self.stop_flag);

        tracing::debug!("TimerService: starting background driver");
        self.thread_handle = Some(thread::spawn(move || {
            while !stop_flag.load(Ordering::Relaxed) {
                Self::fire_due_on(&inner);
                thread::sleep(Self::POLL_INTERVAL);
            }
        }));
    }

    /// Stop the background thread
    pub fn stop_background(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
        self.stop_flag.store(false, Ordering::Relaxed);
    }

    /// Check if the background thread is running
    pub fn is_background_running(&self) -> bool {
        self.thread_handle.is_some()
    }

    /// Fire every entry whose deadline has passed, in deadline order
    ///
    /// Returns the number of callbacks that ran. Manual-mode counterpart of
    /// the background thread's polling step.
    pub fn fire_due(&self) -> usize {
        Self::fire_due_on(&self.inner)
    }

    /// Fire the entry with the earliest deadline, ignoring the wall clock
    ///
    /// Returns false when nothing is scheduled. This is the synchronous
    /// drain used by tests and hosts that drive time themselves.
    pub fn fire_next(&self) -> bool {
        let taken = self.inner.lock().unwrap().take_earliest();
        match taken {
            Some(entry) => {
                (entry.callback)();
                true
            }
            None => false,
        }
    }

    /// Number of entries currently scheduled
    pub fn pending_count(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }

    fn fire_due_on(inner: &Arc<Mutex<TimerInner>>) -> usize {
        // `now` is captured once per pass so callbacks that immediately
        // reschedule cannot keep this loop spinning.
        let now = Instant::now();
        let mut fired = 0;
        loop {
            let taken = {
                let mut guard = inner.lock().unwrap();
                let due_id = guard
                    .entries
                    .iter()
                    .filter(|(_, entry)| entry.deadline <= now)
                    .min_by_key(|(_, entry)| entry.deadline)
                    .map(|(id, _)| id);
                due_id.and_then(|id| guard.entries.remove(id))
            };
            match taken {
                Some(entry) => {
                    (entry.callback)();
                    fired += 1;
                }
                None => break,
            }
        }
        fired
    }
}

impl Default for TimerService {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TimerService {
    fn drop(&mut self) {
        // Stop background thread when the service is dropped
        self.stop_background();
    }
}

/// A weak handle to the timer service
///
/// This is passed to animators that need to schedule callbacks. It won't
/// prevent the service from being dropped; scheduling against a dead
/// service returns `None` and cancelling is a no-op.
#[derive(Clone)]
pub struct TimerHandle {
    inner: Weak<Mutex<TimerInner>>,
}

impl TimerHandle {
    /// Schedule `callback` to run once after `delay`
    ///
    /// Returns `None` if the service has been dropped.
    pub fn schedule<F>(&self, delay: Duration, callback: F) -> Option<TimerId>
    where
        F: FnOnce() + Send + 'static,
    {
        self.inner.upgrade().map(|inner| {
            inner.lock().unwrap().entries.insert(TimerEntry {
                deadline: Instant::now() + delay,
                callback: Box::new(callback),
            })
        })
    }

    /// Cancel a scheduled entry
    ///
    /// Returns true if the entry was still pending. A cancelled entry never
    /// fires.
    pub fn cancel(&self, id: TimerId) -> bool {
        match self.inner.upgrade() {
            Some(inner) => inner.lock().unwrap().entries.remove(id).is_some(),
            None => false,
        }
    }

    /// Check whether an entry is still pending
    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.lock().unwrap().entries.contains_key(id))
            .unwrap_or(false)
    }

    /// Check if the service is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn fire_next_runs_earliest_first() {
        let timers = TimerService::new();
        let handle = timers.handle();
        let order = Arc::new(Mutex::new(Vec::new()));

        let o = Arc::clone(&order);
        handle.schedule(Duration::from_millis(50), move || o.lock().unwrap().push("late"));
        let o = Arc::clone(&order);
        handle.schedule(Duration::from_millis(10), move || o.lock().unwrap().push("early"));

        assert_eq!(timers.pending_count(), 2);
        assert!(timers.fire_next());
        assert!(timers.fire_next());
        assert!(!timers.fire_next());
        assert_eq!(*order.lock().unwrap(), vec!["early", "late"]);
    }

    #[test]
    fn cancelled_entry_never_fires() {
        let timers = TimerService::new();
        let handle = timers.handle();
        let count = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&count);
        let id = handle
            .schedule(Duration::from_millis(1), move || {
                c.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        assert!(handle.is_scheduled(id));
        assert!(handle.cancel(id));
        assert!(!handle.is_scheduled(id));
        // Cancelling twice reports the entry as already gone.
        assert!(!handle.cancel(id));

        assert!(!timers.fire_next());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn callback_can_reschedule_on_same_service() {
        let timers = TimerService::new();
        let handle = timers.handle();
        let count = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&count);
        let h = handle.clone();
        handle.schedule(Duration::ZERO, move || {
            c.fetch_add(1, Ordering::SeqCst);
            let c2 = Arc::clone(&c);
            h.schedule(Duration::ZERO, move || {
                c2.fetch_add(1, Ordering::SeqCst);
            });
        });

        assert!(timers.fire_next());
        assert_eq!(timers.pending_count(), 1);
        assert!(timers.fire_next());
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn fire_due_skips_future_entries() {
        let timers = TimerService::new();
        let handle = timers.handle();
        let count = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&count);
        handle.schedule(Duration::ZERO, move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        let c = Arc::clone(&count);
        handle.schedule(Duration::from_secs(3600), move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(timers.fire_due(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(timers.pending_count(), 1);
    }

    #[test]
    fn handle_weak_reference() {
        let handle = {
            let timers = TimerService::new();
            timers.handle()
        };

        // Service is dropped, handle should not be alive
        assert!(!handle.is_alive());
        assert!(handle.schedule(Duration::ZERO, || {}).is_none());
    }

    #[test]
    fn background_thread_fires_entries() {
        let mut timers = TimerService::new();
        timers.start_background();
        assert!(timers.is_background_running());

        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        timers.handle().schedule(Duration::from_millis(5), move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        // Generous deadline so the test stays robust on slow machines.
        let deadline = Instant::now() + Duration::from_secs(2);
        while count.load(Ordering::SeqCst) == 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }

        timers.stop_background();
        assert!(!timers.is_background_running());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
