//! The cell buffer: document bytes and their style bytes.
//!
//! Two parallel gap buffers hold the text (`substance`) and one style byte
//! per text byte. The buffer owns the line index and the undo history;
//! every mutation flows through `insert_string`/`delete_chars`, which keep
//! the line starts exact (including CRLF pairs straddling the edit
//! boundaries and, when enabled, the Unicode separators) and record the
//! change for undo. Style changes are not recorded: styles are derived
//! state that lexing can always rebuild.

use crate::line_ending::LineEndTypes;
use crate::line_index::LineVector;
use crate::per_line::PerLineData;
use crate::split_vector::SplitVector;
use crate::undo_history::{ActionKind, UndoAction, UndoHistory};
use crate::utf8::{
    UTF8_SEPARATOR_LENGTH, utf8_is_ascii, utf8_is_nel, utf8_is_separator, utf8_is_trail_byte,
};

/// Header of an undo/redo step, copyable so callers can hold it across the
/// mutation that performs the step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoStep {
    pub kind: ActionKind,
    pub position: usize,
    pub length: usize,
    pub may_coalesce: bool,
}

impl UndoStep {
    fn from_action(action: &UndoAction) -> Self {
        Self {
            kind: action.kind,
            position: action.position,
            length: action.len_data(),
            may_coalesce: action.may_coalesce,
        }
    }
}

/// Text plus styles, with the line index and undo history kept in step.
pub struct CellBuffer {
    substance: SplitVector<u8>,
    style: SplitVector<u8>,
    read_only: bool,
    /// Active optional line-end set (Unicode separators on/off).
    utf8_line_ends: LineEndTypes,
    collecting_undo: bool,
    uh: UndoHistory,
    lv: LineVector,
}

impl CellBuffer {
    pub fn new() -> Self {
        Self {
            substance: SplitVector::new(),
            style: SplitVector::new(),
            read_only: false,
            utf8_line_ends: LineEndTypes::DEFAULT,
            collecting_undo: true,
            uh: UndoHistory::new(),
            lv: LineVector::new(),
        }
    }

    /// Byte at `position`, 0 outside the buffer.
    pub fn char_at(&self, position: usize) -> u8 {
        self.substance.value_at(position)
    }

    pub fn style_at(&self, position: usize) -> u8 {
        self.style.value_at(position)
    }

    /// Copy `buffer.len()` text bytes starting at `position`.
    pub fn get_char_range(&self, buffer: &mut [u8], position: usize) {
        self.substance.get_range(buffer, position);
    }

    pub fn get_style_range(&self, buffer: &mut [u8], position: usize) {
        self.style.get_range(buffer, position);
    }

    /// The text bytes in `[position, position + length)` as an owned vector.
    pub fn char_range_vec(&self, position: usize, length: usize) -> Vec<u8> {
        let mut out = vec![0u8; length];
        self.get_char_range(&mut out, position);
        out
    }

    /// The whole text as one contiguous slice (moves the gap to the end).
    pub fn buffer(&mut self) -> &[u8] {
        self.substance.buffer()
    }

    /// A contiguous slice of `range_length` bytes at `position`.
    pub fn range_slice(&mut self, position: usize, range_length: usize) -> &[u8] {
        self.substance.range_slice(position, range_length)
    }

    pub fn gap_position(&self) -> usize {
        self.substance.gap_position()
    }

    pub fn len(&self) -> usize {
        self.substance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.substance.is_empty()
    }

    /// Pre-reserve storage for a document about to be loaded.
    pub fn allocate(&mut self, new_size: usize) {
        self.substance.reserve(new_size);
        self.style.reserve(new_size);
    }

    pub fn line_end_types(&self) -> LineEndTypes {
        self.utf8_line_ends
    }

    /// Change the active optional terminator set, re-deriving the line
    /// index when it differs.
    pub fn set_line_end_types(&mut self, utf8_line_ends: LineEndTypes) {
        if self.utf8_line_ends != utf8_line_ends {
            self.utf8_line_ends = utf8_line_ends;
            self.reset_line_ends();
        }
    }

    pub fn per_line(&self) -> &PerLineData {
        self.lv.per_line()
    }

    pub fn per_line_mut(&mut self) -> &mut PerLineData {
        self.lv.per_line_mut()
    }

    pub fn lines(&self) -> usize {
        self.lv.lines()
    }

    pub fn line_start(&self, line: usize) -> usize {
        if line >= self.lines() {
            self.len()
        } else {
            self.lv.line_start(line)
        }
    }

    pub fn line_from_position(&self, pos: usize) -> usize {
        self.lv.line_from_position(pos)
    }

    fn insert_line(&mut self, line: usize, position: usize, line_start: bool) {
        self.lv.insert_line(line, position, line_start);
    }

    fn remove_line(&mut self, line: usize) {
        self.lv.remove_line(line);
    }

    /// Insert `s` at `position`, recording undo. Returns whether this
    /// started a new undo sequence, or `None` when the buffer is read-only.
    pub fn insert_string(&mut self, position: usize, s: &[u8]) -> Option<bool> {
        if self.read_only {
            return None;
        }
        let start_sequence = if self.collecting_undo {
            // Save into the undo stack, but only the characters, not the
            // formatting.
            self.uh.append_action(ActionKind::Insert, position, s, true)
        } else {
            false
        };
        self.basic_insert_string(position, s);
        Some(start_sequence)
    }

    /// Delete `delete_length` bytes at `position`, recording undo. Returns
    /// the start-of-sequence flag and the removed bytes, or `None` when the
    /// buffer is read-only.
    pub fn delete_chars(&mut self, position: usize, delete_length: usize) -> Option<(bool, Vec<u8>)> {
        if self.read_only {
            return None;
        }
        let text = self.char_range_vec(position, delete_length);
        let start_sequence = if self.collecting_undo {
            self.uh.append_action(ActionKind::Remove, position, &text, true)
        } else {
            false
        };
        self.basic_delete_chars(position, delete_length);
        Some((start_sequence, text))
    }

    /// Set one style byte. Returns whether it changed. No undo is recorded
    /// and setting styles outside the buffer is safe and has no effect.
    pub fn set_style_at(&mut self, position: usize, style_value: u8) -> bool {
        if position >= self.style.len() {
            return false;
        }
        let cur = self.style.value_at(position);
        if cur != style_value {
            self.style.set_value_at(position, style_value);
            true
        } else {
            false
        }
    }

    /// Set a run of style bytes. Returns whether any byte changed.
    pub fn set_style_for(&mut self, position: usize, length: usize, style_value: u8) -> bool {
        let mut changed = false;
        for pos in position..position + length {
            if self.set_style_at(pos, style_value) {
                changed = true;
            }
        }
        changed
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, set: bool) {
        self.read_only = set;
    }

    pub fn set_save_point(&mut self) {
        self.uh.set_save_point();
    }

    pub fn is_save_point(&self) -> bool {
        self.uh.is_save_point()
    }

    pub fn tentative_start(&mut self) {
        self.uh.tentative_start();
    }

    pub fn tentative_commit(&mut self) {
        self.uh.tentative_commit();
    }

    pub fn tentative_active(&self) -> bool {
        self.uh.tentative_active()
    }

    pub fn tentative_steps(&mut self) -> Option<usize> {
        self.uh.tentative_steps()
    }

    /// Turn undo collection on or off. Turning it off deletes the history.
    pub fn set_undo_collection(&mut self, collect_undo: bool) -> bool {
        self.collecting_undo = collect_undo;
        self.uh.delete_undo_history();
        self.collecting_undo
    }

    pub fn is_collecting_undo(&self) -> bool {
        self.collecting_undo
    }

    pub fn begin_undo_action(&mut self) {
        self.uh.begin_undo_action();
    }

    pub fn end_undo_action(&mut self) {
        self.uh.end_undo_action();
    }

    /// Record a container action carrying `token`.
    pub fn add_undo_action(&mut self, token: usize, may_coalesce: bool) {
        if self.collecting_undo {
            self.uh
                .append_action(ActionKind::Container, token, &[], may_coalesce);
        }
    }

    pub fn delete_undo_history(&mut self) {
        self.uh.delete_undo_history();
    }

    pub fn can_undo(&self) -> bool {
        self.uh.can_undo()
    }

    pub fn start_undo(&mut self) -> usize {
        self.uh.start_undo()
    }

    /// Header of the next undo step.
    pub fn undo_step(&self) -> UndoStep {
        UndoStep::from_action(self.uh.undo_step())
    }

    /// Payload bytes of the next undo step.
    pub fn undo_step_data(&self) -> Option<&[u8]> {
        self.uh.undo_step().data.as_deref()
    }

    /// Invert the next undo step against the buffer (insert becomes delete
    /// and vice versa) and move past it.
    pub fn perform_undo_step(&mut self) {
        let step = self.undo_step();
        match step.kind {
            ActionKind::Insert => {
                self.basic_delete_chars(step.position, step.length);
            }
            ActionKind::Remove => {
                let data = self
                    .uh
                    .undo_step()
                    .data
                    .clone()
                    .unwrap_or_default();
                self.basic_insert_string(step.position, &data);
            }
            ActionKind::Start | ActionKind::Container => {}
        }
        self.uh.completed_undo_step();
    }

    pub fn can_redo(&self) -> bool {
        self.uh.can_redo()
    }

    pub fn start_redo(&mut self) -> usize {
        self.uh.start_redo()
    }

    pub fn redo_step(&self) -> UndoStep {
        UndoStep::from_action(self.uh.redo_step())
    }

    pub fn redo_step_data(&self) -> Option<&[u8]> {
        self.uh.redo_step().data.as_deref()
    }

    /// Replay the next redo step and move past it.
    pub fn perform_redo_step(&mut self) {
        let step = self.redo_step();
        match step.kind {
            ActionKind::Insert => {
                let data = self
                    .uh
                    .redo_step()
                    .data
                    .clone()
                    .unwrap_or_default();
                self.basic_insert_string(step.position, &data);
            }
            ActionKind::Remove => {
                self.basic_delete_chars(step.position, step.length);
            }
            ActionKind::Start | ActionKind::Container => {}
        }
        self.uh.completed_redo_step();
    }

    /// Whether a 3-byte Unicode separator straddles `position`.
    fn utf8_line_end_overlaps(&self, position: usize) -> bool {
        let byte_at = |pos: isize| -> u8 {
            if pos < 0 {
                0
            } else {
                self.substance.value_at(pos as usize)
            }
        };
        let p = position as isize;
        let bytes = [byte_at(p - 2), byte_at(p - 1), byte_at(p), byte_at(p + 1)];
        utf8_is_separator(&bytes[..3]) || utf8_is_separator(&bytes[1..]) || utf8_is_nel(&bytes[1..3])
    }

    /// Rebuild the whole line index from the text. Too much work to
    /// preserve the old one when the recognised terminator set changes.
    fn reset_line_ends(&mut self) {
        self.lv.init();
        let length = self.len();
        let mut line_insert = 1;
        let at_line_start = true;
        self.lv.insert_text(line_insert - 1, length as isize);
        let unicode_ends = !self.utf8_line_ends.is_default();
        let mut ch_before_prev = 0u8;
        let mut ch_prev = 0u8;
        for i in 0..length {
            let ch = self.substance.value_at(i);
            if ch == b'\r' {
                self.insert_line(line_insert, i + 1, at_line_start);
                line_insert += 1;
            } else if ch == b'\n' {
                if ch_prev == b'\r' {
                    // Patch up what was end of line.
                    self.lv.set_line_start(line_insert - 1, i + 1);
                } else {
                    self.insert_line(line_insert, i + 1, at_line_start);
                    line_insert += 1;
                }
            } else if unicode_ends {
                let back3 = [ch_before_prev, ch_prev, ch];
                if utf8_is_separator(&back3) || utf8_is_nel(&back3[1..]) {
                    self.insert_line(line_insert, i + 1, at_line_start);
                    line_insert += 1;
                }
            }
            ch_before_prev = ch_prev;
            ch_prev = ch;
        }
    }

    /// Insert without undo: the bottleneck through which all text arrives.
    fn basic_insert_string(&mut self, position: usize, s: &[u8]) {
        if s.is_empty() {
            return;
        }
        debug_assert!(position <= self.substance.len());
        let insert_length = s.len();
        self.substance.insert_slice(position, s);
        self.style.insert_value(position, insert_length, 0);

        let mut line_insert = self.lv.line_from_position(position) + 1;
        let at_line_start = self.lv.line_start(line_insert - 1) == position;
        // Point all the lines after the insertion point further along in
        // the buffer.
        self.lv.insert_text(line_insert - 1, insert_length as isize);
        let mut ch_before_prev = if position >= 2 {
            self.substance.value_at(position - 2)
        } else {
            0
        };
        let mut ch_prev = if position >= 1 {
            self.substance.value_at(position - 1)
        } else {
            0
        };
        let ch_after = self.substance.value_at(position + insert_length);
        if ch_prev == b'\r' && ch_after == b'\n' {
            // Splitting up a crlf pair at position.
            self.insert_line(line_insert, position, false);
            line_insert += 1;
        }
        let unicode_ends = !self.utf8_line_ends.is_default();
        for (i, &ch) in s.iter().enumerate() {
            if ch == b'\r' {
                self.insert_line(line_insert, position + i + 1, at_line_start);
                line_insert += 1;
            } else if ch == b'\n' {
                if ch_prev == b'\r' {
                    // Patch up what was end of line.
                    self.lv.set_line_start(line_insert - 1, position + i + 1);
                } else {
                    self.insert_line(line_insert, position + i + 1, at_line_start);
                    line_insert += 1;
                }
            } else if unicode_ends {
                let back3 = [ch_before_prev, ch_prev, ch];
                if utf8_is_separator(&back3) || utf8_is_nel(&back3[1..]) {
                    self.insert_line(line_insert, position + i + 1, at_line_start);
                    line_insert += 1;
                }
            }
            ch_before_prev = ch_prev;
            ch_prev = ch;
        }
        // Joining two lines where the insertion ends in cr and the
        // following substance starts with lf.
        if ch_after == b'\n' {
            if ch_prev == b'\r' {
                // End of line already in buffer so drop the newly created
                // one.
                self.remove_line(line_insert - 1);
            }
        } else if unicode_ends && !utf8_is_ascii(ch_after) {
            // May have the end of a UTF-8 separator in the buffer and its
            // start in the insertion.
            for j in 0..UTF8_SEPARATOR_LENGTH - 1 {
                let ch_at = self.substance.value_at(position + insert_length + j);
                let back3 = [ch_before_prev, ch_prev, ch_at];
                if utf8_is_separator(&back3) {
                    self.insert_line(line_insert, position + insert_length + j + 1, at_line_start);
                    line_insert += 1;
                }
                if j == 0 && utf8_is_nel(&back3[1..]) {
                    self.insert_line(line_insert, position + insert_length + j + 1, at_line_start);
                    line_insert += 1;
                }
                ch_before_prev = ch_prev;
                ch_prev = ch_at;
            }
        }
    }

    /// Delete without undo.
    fn basic_delete_chars(&mut self, position: usize, delete_length: usize) {
        if delete_length == 0 {
            return;
        }
        debug_assert!(position + delete_length <= self.substance.len());
        if position == 0 && delete_length == self.substance.len() {
            // If the whole buffer is being deleted, it is faster to
            // reinitialise the lines data than to delete each line.
            self.lv.init();
        } else {
            // Have to fix up line positions before doing the deletion as
            // the buffer text is examined to work out which lines go.
            let mut line_remove = self.lv.line_from_position(position) + 1;
            self.lv
                .insert_text(line_remove - 1, -(delete_length as isize));
            let ch_prev = if position >= 1 {
                self.substance.value_at(position - 1)
            } else {
                0
            };
            let ch_before = ch_prev;
            let mut ch_next = self.substance.value_at(position);
            let mut ignore_nl = false;
            if ch_prev == b'\r' && ch_next == b'\n' {
                // The cr keeps terminating its line, so pin the following
                // line start back to the split point.
                self.lv.set_line_start(line_remove, position);
                line_remove += 1;
                ignore_nl = true; // First \n is not a real line removal.
            }
            let unicode_ends = !self.utf8_line_ends.is_default();
            if unicode_ends && utf8_is_trail_byte(ch_next) && self.utf8_line_end_overlaps(position)
            {
                self.remove_line(line_remove);
            }
            for i in 0..delete_length {
                ch_next = self.substance.value_at(position + i + 1);
                let ch = self.substance.value_at(position + i);
                if ch == b'\r' {
                    if ch_next != b'\n' {
                        self.remove_line(line_remove);
                    }
                } else if ch == b'\n' {
                    if ignore_nl {
                        ignore_nl = false; // Further \n are real removals.
                    } else {
                        self.remove_line(line_remove);
                    }
                } else if unicode_ends && !utf8_is_ascii(ch) {
                    let next3 = [ch, ch_next, self.substance.value_at(position + i + 2)];
                    if utf8_is_separator(&next3) || utf8_is_nel(&next3) {
                        self.remove_line(line_remove);
                    }
                }
            }
            // May have to fix up the end if the deletion leaves a cr next
            // to an lf that belonged to another pair.
            let ch_after = self.substance.value_at(position + delete_length);
            if ch_before == b'\r' && ch_after == b'\n' {
                // line_remove - 1 because the cr ended the line before the
                // start of the deletion.
                self.remove_line(line_remove - 1);
                self.lv.set_line_start(line_remove - 1, position + 1);
            }
        }
        self.substance.delete_range(position, delete_length);
        self.style.delete_range(position, delete_length);
    }
}

impl Default for CellBuffer {
    fn default() -> Self {
        Self::new()
    }
}
