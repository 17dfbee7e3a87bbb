//! Terminal sink
//!
//! Repaints a single stdout line on every mutation: carriage return to
//! column 0, write the buffer, erase the rest of the line.

use std::io::{self, Write};
use typewriter::TextSink;

/// A [`TextSink`] that renders onto the current terminal line.
pub struct TermSink {
    buffer: String,
}

impl TermSink {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    fn repaint(&self) {
        let mut out = io::stdout().lock();
        // ESC[K erases from the cursor to the end of the line.
        let _ = write!(out, "\r{}\x1b[K", self.buffer);
        let _ = out.flush();
    }
}

impl Default for TermSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSink for TermSink {
    fn append_char(&mut self, c: char) {
        self.buffer.push(c);
        self.repaint();
    }

    fn delete_last(&mut self) {
        self.buffer.pop();
        self.repaint();
    }

    fn clear(&mut self) {
        self.buffer.clear();
        self.repaint();
    }

    fn text(&self) -> String {
        self.buffer.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_visible_text() {
        let mut sink = TermSink::new();
        sink.append_char('o');
        sink.append_char('k');
        assert_eq!(sink.text(), "ok");

        sink.delete_last();
        assert_eq!(sink.text(), "o");

        sink.clear();
        assert_eq!(sink.text(), "");
    }
}
