//! Text sinks - the destination for rendered characters
//!
//! The animator drives a sink one character at a time: append while typing,
//! delete-last while deleting, clear on `stop()`. Hosts supply whatever sink
//! matches their surface (a terminal line, a label widget, a plain buffer).

use std::sync::{Arc, Mutex};

/// Destination for the animated text.
///
/// Implementations must treat `delete_last` on empty text as a no-op; the
/// animator never issues one, but hosts may share a sink with other writers.
pub trait TextSink: Send {
    /// Append one character to the visible text.
    fn append_char(&mut self, c: char);

    /// Remove the last character of the visible text.
    fn delete_last(&mut self);

    /// Clear the visible text entirely.
    fn clear(&mut self);

    /// The currently visible text.
    fn text(&self) -> String;
}

/// A plain owned buffer is a valid sink.
impl TextSink for String {
    fn append_char(&mut self, c: char) {
        self.push(c);
    }

    fn delete_last(&mut self) {
        self.pop();
    }

    fn clear(&mut self) {
        self.clear();
    }

    fn text(&self) -> String {
        self.clone()
    }
}

/// A sink whose contents can be observed from outside the animator.
///
/// The animator takes ownership of its sink, so a host that wants to read
/// the text back (tests, status displays) hands over a `SharedSink` and keeps
/// a [`SharedSink::view`] for itself.
///
/// # Example
///
/// ```
/// use typewriter::{SharedSink, TextSink};
///
/// let mut sink = SharedSink::new();
/// let view = sink.view();
///
/// sink.append_char('h');
/// sink.append_char('i');
/// assert_eq!(view.text(), "hi");
/// ```
#[derive(Clone, Default)]
pub struct SharedSink {
    buffer: Arc<Mutex<String>>,
}

impl SharedSink {
    /// Create an empty shared sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// A read view onto the same buffer.
    pub fn view(&self) -> SinkView {
        SinkView {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

impl TextSink for SharedSink {
    fn append_char(&mut self, c: char) {
        self.buffer.lock().unwrap().push(c);
    }

    fn delete_last(&mut self) {
        self.buffer.lock().unwrap().pop();
    }

    fn clear(&mut self) {
        self.buffer.lock().unwrap().clear();
    }

    fn text(&self) -> String {
        self.buffer.lock().unwrap().clone()
    }
}

/// Read-only view onto a [`SharedSink`] buffer.
#[derive(Clone)]
pub struct SinkView {
    buffer: Arc<Mutex<String>>,
}

impl SinkView {
    /// The currently visible text.
    pub fn text(&self) -> String {
        self.buffer.lock().unwrap().clone()
    }

    /// Number of characters currently visible.
    pub fn char_count(&self) -> usize {
        self.buffer.lock().unwrap().chars().count()
    }
}
