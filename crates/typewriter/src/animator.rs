//! The typewriter animator - a two-phase tick-driven state machine
//!
//! Each tick either appends or removes one character on the sink, then
//! schedules its successor on the timer service. Exactly one callback is
//! outstanding per animator at any time; `start`, `pause`, and `stop`
//! replace or cancel it.

use crate::error::{Result, TypewriterError};
use crate::options::TypewriterOptions;
use crate::sink::TextSink;
use crate::timer::{TimerHandle, TimerId};
use rand::Rng;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Which direction the animation is moving through the current phrase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Appending characters until the phrase is fully typed.
    Typing,
    /// Removing characters until the sink is empty again.
    Deleting,
}

/// Internal state of an animator
///
/// Mutated only by the tick and by the explicit lifecycle calls. A scheduled
/// callback only runs its tick if its captured epoch still matches; every
/// cancel bumps the epoch, which invalidates callbacks that fired before the
/// cancel but have not run yet.
struct AnimatorInner {
    timer: TimerHandle,
    sink: Box<dyn TextSink>,
    sources: Vec<String>,
    options: TypewriterOptions,
    source_index: usize,
    char_index: usize,
    phase: Phase,
    pending: Option<TimerId>,
    epoch: u64,
}

/// Animates typing and deleting a cyclic list of phrases into a text sink.
///
/// # Example
///
/// ```
/// use typewriter::{SharedSink, TimerService, Typewriter};
///
/// let timers = TimerService::new();
/// let sink = SharedSink::new();
/// let view = sink.view();
///
/// let tw = Typewriter::builder()
///     .timer(timers.handle())
///     .sink(sink)
///     .source("Hello")
///     .build()
///     .unwrap();
///
/// tw.start();
/// timers.fire_next(); // first tick types 'H'
/// assert_eq!(view.text(), "H");
/// ```
pub struct Typewriter {
    inner: Arc<Mutex<AnimatorInner>>,
}

impl Typewriter {
    /// Start building an animator.
    pub fn builder() -> TypewriterBuilder {
        TypewriterBuilder::new()
    }

    /// Construct an animator directly.
    ///
    /// Fails when `sources` is empty or the timer service behind `timer` has
    /// already shut down.
    pub fn new<S>(
        timer: TimerHandle,
        sink: S,
        sources: Vec<String>,
        options: TypewriterOptions,
    ) -> Result<Self>
    where
        S: TextSink + 'static,
    {
        Self::builder()
            .timer(timer)
            .sink(sink)
            .sources(sources)
            .options(options)
            .build()
    }

    /// Start (or restart) the animation after the configured start delay.
    ///
    /// Idempotent: only the pending callback is replaced; the current
    /// position and phase are untouched, so this also resumes after
    /// [`pause`](Self::pause).
    pub fn start(&self) {
        let mut guard = self.inner.lock().unwrap();
        let delay = guard.options.start_delay();
        Self::cancel_pending(&mut guard);
        Self::schedule_tick(&mut guard, &self.inner, delay);
        tracing::debug!(delay_ms = delay.as_millis() as u64, "typewriter started");
    }

    /// Start (or restart) the animation after an explicit delay.
    pub fn start_after(&self, delay: Duration) {
        let mut guard = self.inner.lock().unwrap();
        Self::cancel_pending(&mut guard);
        Self::schedule_tick(&mut guard, &self.inner, delay);
        tracing::debug!(delay_ms = delay.as_millis() as u64, "typewriter started");
    }

    /// Pause the animation, keeping the current position and phase.
    ///
    /// The pending callback is cancelled before this returns; no tick fires
    /// afterwards until `start` is called again.
    pub fn pause(&self) {
        let mut guard = self.inner.lock().unwrap();
        Self::cancel_pending(&mut guard);
        tracing::debug!(
            source = guard.source_index,
            character = guard.char_index,
            "typewriter paused"
        );
    }

    /// Stop the animation and reset it to its initial state.
    ///
    /// Clears the sink and rewinds to the first phrase, first character,
    /// typing phase. Does not restart; call [`start`](Self::start) to run
    /// again from the beginning.
    pub fn stop(&self) {
        let mut guard = self.inner.lock().unwrap();
        Self::cancel_pending(&mut guard);
        guard.sink.clear();
        guard.source_index = 0;
        guard.char_index = 0;
        guard.phase = Phase::Typing;
        tracing::debug!("typewriter stopped");
    }

    /// Whether a tick is currently scheduled.
    pub fn is_running(&self) -> bool {
        self.inner.lock().unwrap().pending.is_some()
    }

    /// The current phase.
    pub fn phase(&self) -> Phase {
        self.inner.lock().unwrap().phase
    }

    /// Index of the phrase currently being typed or deleted.
    pub fn source_index(&self) -> usize {
        self.inner.lock().unwrap().source_index
    }

    /// Number of phrases in the cycle.
    pub fn source_count(&self) -> usize {
        self.inner.lock().unwrap().sources.len()
    }

    /// Number of characters of the current phrase that are on the sink.
    pub fn char_index(&self) -> usize {
        self.inner.lock().unwrap().char_index
    }

    /// The sink's currently visible text.
    pub fn text(&self) -> String {
        self.inner.lock().unwrap().sink.text()
    }

    /// One step of the state machine. Runs on whatever thread drives the
    /// timer service; `inner` is the animator that scheduled it.
    fn tick(inner: &Arc<Mutex<AnimatorInner>>, epoch: u64) {
        let mut guard = inner.lock().unwrap();
        // A stale callback (fired before a cancel, run after it) must not
        // touch the state. Checked under the same lock hold as the tick
        // body, so a concurrent cancel cannot slip in between.
        if guard.epoch != epoch {
            return;
        }
        // This tick was the pending callback.
        guard.pending = None;

        let current = guard.sources[guard.source_index].clone();
        let delay = match guard.phase {
            Phase::Typing => match current.chars().nth(guard.char_index) {
                Some(c) => {
                    guard.sink.append_char(c);
                    guard.char_index += 1;
                    draw_delay(guard.options.type_delay_min, guard.options.type_delay_max)
                }
                None => {
                    guard.phase = Phase::Deleting;
                    tracing::debug!(source = guard.source_index, "phrase typed");
                    guard.options.type_end()
                }
            },
            Phase::Deleting => {
                if guard.char_index > 0 {
                    guard.sink.delete_last();
                    guard.char_index -= 1;
                    draw_delay(
                        guard.options.delete_delay_min,
                        guard.options.delete_delay_max,
                    )
                } else {
                    guard.phase = Phase::Typing;
                    guard.source_index = (guard.source_index + 1) % guard.sources.len();
                    tracing::debug!(source = guard.source_index, "advancing to next phrase");
                    guard.options.delete_end()
                }
            }
        };

        Self::schedule_tick(&mut guard, inner, delay);
    }

    /// Schedule the next tick, recording it as the single pending callback.
    fn schedule_tick(
        guard: &mut MutexGuard<'_, AnimatorInner>,
        inner: &Arc<Mutex<AnimatorInner>>,
        delay: Duration,
    ) {
        let weak = Arc::downgrade(inner);
        let epoch = guard.epoch;
        guard.pending = guard.timer.schedule(delay, move || {
            if let Some(inner) = weak.upgrade() {
                Self::tick(&inner, epoch);
            }
        });
    }

    /// Cancel the pending callback and invalidate any fired-but-unrun one.
    fn cancel_pending(guard: &mut MutexGuard<'_, AnimatorInner>) {
        if let Some(id) = guard.pending.take() {
            guard.timer.cancel(id);
        }
        guard.epoch += 1;
    }
}

impl Drop for Typewriter {
    fn drop(&mut self) {
        // Cancel the pending callback when the animator is dropped
        let mut guard = self.inner.lock().unwrap();
        Self::cancel_pending(&mut guard);
    }
}

/// Builder for [`Typewriter`].
///
/// Collects the timer handle, the output sink, the source phrases, and
/// optional timing overrides, then validates the lot in
/// [`build`](Self::build).
pub struct TypewriterBuilder {
    timer: Option<TimerHandle>,
    sink: Option<Box<dyn TextSink>>,
    sources: Vec<String>,
    options: TypewriterOptions,
}

impl TypewriterBuilder {
    fn new() -> Self {
        Self {
            timer: None,
            sink: None,
            sources: Vec::new(),
            options: TypewriterOptions::default(),
        }
    }

    /// The timer service to schedule ticks on.
    pub fn timer(mut self, timer: TimerHandle) -> Self {
        self.timer = Some(timer);
        self
    }

    /// The sink that receives the rendered text.
    pub fn sink<S>(mut self, sink: S) -> Self
    where
        S: TextSink + 'static,
    {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Append one source phrase.
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.sources.push(source.into());
        self
    }

    /// Append several source phrases.
    pub fn sources<I>(mut self, sources: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.sources.extend(sources.into_iter().map(Into::into));
        self
    }

    /// Timing overrides (defaults apply otherwise).
    pub fn options(mut self, options: TypewriterOptions) -> Self {
        self.options = options;
        self
    }

    /// Validate and construct the animator.
    ///
    /// # Errors
    ///
    /// - [`TypewriterError::EmptySources`] when no phrase was supplied
    /// - [`TypewriterError::MissingSink`] when no sink was attached
    /// - [`TypewriterError::TimerUnavailable`] when no timer was attached or
    ///   its service has shut down
    pub fn build(self) -> Result<Typewriter> {
        if self.sources.is_empty() {
            return Err(TypewriterError::EmptySources);
        }
        let sink = self.sink.ok_or(TypewriterError::MissingSink)?;
        let timer = match self.timer {
            Some(timer) if timer.is_alive() => timer,
            _ => return Err(TypewriterError::TimerUnavailable),
        };

        Ok(Typewriter {
            inner: Arc::new(Mutex::new(AnimatorInner {
                timer,
                sink,
                sources: self.sources,
                options: self.options,
                source_index: 0,
                char_index: 0,
                phase: Phase::Typing,
                pending: None,
                epoch: 0,
            })),
        })
    }
}

/// Uniform integer delay in `[min_ms, max_ms]`, both inclusive.
///
/// Reversed bounds are normalized instead of rejected; a bad range must not
/// panic on the driver thread.
fn draw_delay(min_ms: u64, max_ms: u64) -> Duration {
    let (lo, hi) = if min_ms <= max_ms {
        (min_ms, max_ms)
    } else {
        (max_ms, min_ms)
    };
    Duration::from_millis(rand::rng().random_range(lo..=hi))
}
