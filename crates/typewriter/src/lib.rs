//! Typewriter Text Animation
//!
//! Simulates a human typing and deleting phrases in a loop: the animator
//! cycles through an ordered list of source strings and renders the
//! partially typed result into a text sink, one character per tick.
//!
//! # Features
//!
//! - **Two-Phase State Machine**: explicit `Typing`/`Deleting` phases with a
//!   single transition function
//! - **Humanized Timing**: per-character delays drawn uniformly from a
//!   configurable range; fixed pauses at phrase boundaries
//! - **Timer Service**: one-shot deferred callbacks with a background driver
//!   thread or a synchronous manual drain for tests and host-owned loops
//! - **Pluggable Sinks**: drive any surface that can append, delete, and
//!   clear plain text
//! - **Lifecycle Control**: `start` / `pause` / `stop` with exactly one
//!   outstanding callback per animator
//!
//! # Example
//!
//! ```
//! use typewriter::{SharedSink, TimerService, Typewriter, TypewriterOptions};
//! use std::time::Duration;
//!
//! let timers = TimerService::new();
//! let sink = SharedSink::new();
//! let view = sink.view();
//!
//! let tw = Typewriter::builder()
//!     .timer(timers.handle())
//!     .sink(sink)
//!     .source("Hello, world!")
//!     .source("Goodbye!")
//!     .options(TypewriterOptions::default())
//!     .build()
//!     .unwrap();
//!
//! // A real host calls `timers.start_background()` and lets the driver
//! // thread fire ticks; here we drain them deterministically instead.
//! tw.start_after(Duration::ZERO);
//! timers.fire_next();
//! assert_eq!(view.text(), "H");
//! timers.fire_next();
//! assert_eq!(view.text(), "He");
//! ```

pub mod animator;
pub mod error;
pub mod options;
pub mod sink;
pub mod timer;

pub use animator::{Phase, Typewriter, TypewriterBuilder};
pub use error::{Result, TypewriterError};
pub use options::TypewriterOptions;
pub use sink::{SharedSink, SinkView, TextSink};
pub use timer::{TimerHandle, TimerId, TimerService};
