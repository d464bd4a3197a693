//! Playback cursor over a recorded trace.
//!
//! The cursor holds only an index and the frame count; frames stay owned by
//! the `SearchResult`. `next`/`prev` clamp at the ends, `goto` is checked.

use pathtrace_search::TraceError;

/// Position within a frame sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackCursor {
    index: usize,
    frame_count: usize,
}

impl PlaybackCursor {
    /// A cursor at frame 0 of a `frame_count`-frame trace.
    #[must_use]
    pub fn new(frame_count: usize) -> Self {
        Self {
            index: 0,
            frame_count,
        }
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Whether the cursor sits on the last frame (or the trace is empty).
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.index + 1 >= self.frame_count
    }

    /// Advance one frame, stopping at the last. Returns the new index.
    pub fn next(&mut self) -> usize {
        if !self.at_end() {
            self.index += 1;
        }
        self.index
    }

    /// Step back one frame, stopping at 0. Returns the new index.
    pub fn prev(&mut self) -> usize {
        self.index = self.index.saturating_sub(1);
        self.index
    }

    /// Jump to `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TraceError::OutOfRange`] unless `index < frame_count()`;
    /// the cursor does not move.
    pub fn goto(&mut self, index: usize) -> Result<usize, TraceError> {
        if index >= self.frame_count {
            return Err(TraceError::OutOfRange {
                index,
                len: self.frame_count,
            });
        }
        self.index = index;
        Ok(index)
    }

    /// Jump to the last frame.
    pub fn goto_end(&mut self) -> usize {
        self.index = self.frame_count.saturating_sub(1);
        self.index
    }
}
