//! Buffered document access for lexers.

use document_core::DocumentAccess;

const BUFFER_SIZE: usize = 4000;

/// A windowed reader and buffered style writer over a document.
///
/// Reads fill a fixed window around the requested position so byte-at-a-time
/// scanning does not pay a virtual call per byte; style runs accumulate and
/// are flushed in batches through `set_styles`.
pub struct LexAccessor<'a> {
    doc: &'a mut dyn DocumentAccess,
    buf: [u8; BUFFER_SIZE],
    start_pos: usize,
    end_pos: usize,
    len_doc: usize,
    /// First position of the segment being coloured.
    start_seg: usize,
    style_buf: [u8; BUFFER_SIZE],
    valid_len: usize,
}

impl<'a> LexAccessor<'a> {
    pub fn new(doc: &'a mut dyn DocumentAccess) -> Self {
        let len_doc = doc.len();
        Self {
            doc,
            buf: [0; BUFFER_SIZE],
            start_pos: 1,
            end_pos: 0,
            len_doc,
            start_seg: 0,
            style_buf: [0; BUFFER_SIZE],
            valid_len: 0,
        }
    }

    fn fill(&mut self, position: usize) {
        self.start_pos = position.saturating_sub(BUFFER_SIZE / 2);
        self.end_pos = (self.start_pos + BUFFER_SIZE).min(self.len_doc);
        if self.end_pos > self.start_pos {
            let window_len = self.end_pos - self.start_pos;
            self.doc
                .get_char_range(&mut self.buf[..window_len], self.start_pos);
        }
    }

    /// Byte at `position`, 0 past the end.
    pub fn char_at(&mut self, position: usize) -> u8 {
        if position < self.start_pos || position >= self.end_pos {
            self.fill(position);
            if position < self.start_pos || position >= self.end_pos {
                return 0;
            }
        }
        self.buf[position - self.start_pos]
    }

    /// Byte at `position`, or `default` when out of range.
    pub fn safe_get_char_at(&mut self, position: usize, default: u8) -> u8 {
        if position >= self.len_doc {
            return default;
        }
        self.char_at(position)
    }

    pub fn style_at(&self, position: usize) -> u8 {
        self.doc.style_at(position)
    }

    pub fn length(&self) -> usize {
        self.len_doc
    }

    pub fn lines_total(&self) -> usize {
        self.doc.lines_total()
    }

    pub fn line_from_position(&self, position: usize) -> usize {
        self.doc.line_from_position(position)
    }

    pub fn line_start(&self, line: usize) -> usize {
        self.doc.line_start(line)
    }

    pub fn line_end(&self, line: usize) -> usize {
        self.doc.line_end(line)
    }

    pub fn level_at(&self, line: usize) -> i32 {
        self.doc.get_level(line)
    }

    pub fn set_level(&mut self, line: usize, level: i32) -> i32 {
        self.doc.set_level(line, level)
    }

    pub fn line_state(&self, line: usize) -> i32 {
        self.doc.get_line_state(line)
    }

    pub fn set_line_state(&mut self, line: usize, state: i32) -> i32 {
        self.doc.set_line_state(line, state)
    }

    /// Whether the document matches `s` at `position`.
    pub fn matches(&mut self, position: usize, s: &[u8]) -> bool {
        for (i, &ch) in s.iter().enumerate() {
            if self.safe_get_char_at(position + i, 0) != ch {
                return false;
            }
        }
        !s.is_empty()
    }

    /// Restart styling at `start`.
    pub fn start_at(&mut self, start: usize) {
        self.doc.start_styling(start);
        self.start_seg = start;
    }

    /// Open a new segment at `pos`.
    pub fn start_segment(&mut self, pos: usize) {
        self.start_seg = pos;
    }

    pub fn start_of_segment(&self) -> usize {
        self.start_seg
    }

    /// Style the segment `[start_of_segment(), pos]` with `style` and start
    /// the next segment after it.
    pub fn colour_to(&mut self, pos: usize, style: u8) {
        if pos < self.start_seg {
            return;
        }
        let run = pos - self.start_seg + 1;
        if self.valid_len + run >= BUFFER_SIZE {
            self.flush();
        }
        if run >= BUFFER_SIZE {
            // Too long for the buffer so send the run directly.
            self.doc.set_style_for(run, style);
        } else {
            for slot in &mut self.style_buf[self.valid_len..self.valid_len + run] {
                *slot = style;
            }
            self.valid_len += run;
        }
        self.start_seg = pos + 1;
    }

    /// Push any buffered styles through to the document.
    pub fn flush(&mut self) {
        if self.valid_len > 0 {
            self.doc.set_styles(&self.style_buf[..self.valid_len]);
            self.valid_len = 0;
        }
    }
}

impl Drop for LexAccessor<'_> {
    fn drop(&mut self) {
        self.flush();
    }
}
