//! Line index: byte position of the start of every line.
//!
//! Partition `i` of the underlying [`Partitioning`] is line `i`, so both
//! `line_start` and `line_from_position` are O(log lines) with O(1)
//! repeated edits near one point. The index also owns the per-line data
//! managers and forwards every line insertion and removal to them, which is
//! the only path by which per-line data learns about structure changes.

use crate::partitioning::Partitioning;
use crate::per_line::{PerLine, PerLineData};

/// Line → start-position table plus the per-line observers.
pub struct LineVector {
    starts: Partitioning,
    per_line: PerLineData,
}

impl LineVector {
    pub fn new() -> Self {
        Self {
            starts: Partitioning::new(256),
            per_line: PerLineData::new(),
        }
    }

    /// Discard all lines, returning to a single empty line.
    pub fn init(&mut self) {
        self.starts.delete_all();
        self.per_line.init();
    }

    pub fn per_line(&self) -> &PerLineData {
        &self.per_line
    }

    pub fn per_line_mut(&mut self) -> &mut PerLineData {
        &mut self.per_line
    }

    /// Shift the starts of all lines after `line` by `delta`.
    pub fn insert_text(&mut self, line: usize, delta: isize) {
        self.starts.insert_text(line, delta);
    }

    /// Record a new line whose text begins at `position`. `at_line_start`
    /// is true when the insertion that created it happened at the start of
    /// a line, in which case per-line data stays with the text pushed down
    /// rather than the new line.
    pub fn insert_line(&mut self, line: usize, position: usize, at_line_start: bool) {
        self.starts.insert_partition(line, position);
        let observed = if line > 0 && at_line_start { line - 1 } else { line };
        self.per_line.insert_line(observed);
    }

    /// Move the start of `line` to `position` (CRLF pairing fix-ups).
    pub fn set_line_start(&mut self, line: usize, position: usize) {
        self.starts.set_partition_start_position(line, position);
    }

    pub fn remove_line(&mut self, line: usize) {
        self.starts.remove_partition(line);
        self.per_line.remove_line(line);
    }

    pub fn lines(&self) -> usize {
        self.starts.partitions()
    }

    pub fn line_from_position(&self, pos: usize) -> usize {
        self.starts.partition_from_position(pos)
    }

    pub fn line_start(&self, line: usize) -> usize {
        self.starts.position_from_partition(line)
    }
}

impl Default for LineVector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        let lv = LineVector::new();
        assert_eq!(lv.lines(), 1);
        assert_eq!(lv.line_start(0), 0);
        assert_eq!(lv.line_from_position(0), 0);
    }

    #[test]
    fn test_insert_lines() {
        let mut lv = LineVector::new();
        // "ab\ncd\n" : line starts 0, 3, 6.
        lv.insert_text(0, 6);
        lv.insert_line(1, 3, false);
        lv.insert_line(2, 6, false);
        assert_eq!(lv.lines(), 3);
        assert_eq!(lv.line_start(0), 0);
        assert_eq!(lv.line_start(1), 3);
        assert_eq!(lv.line_start(2), 6);
        assert_eq!(lv.line_from_position(2), 0);
        assert_eq!(lv.line_from_position(3), 1);
        assert_eq!(lv.line_from_position(6), 2);
    }

    #[test]
    fn test_remove_line() {
        let mut lv = LineVector::new();
        lv.insert_text(0, 6);
        lv.insert_line(1, 3, false);
        lv.remove_line(1);
        assert_eq!(lv.lines(), 1);
        assert_eq!(lv.line_from_position(5), 0);
    }

    #[test]
    fn test_per_line_observers_follow() {
        let mut lv = LineVector::new();
        lv.insert_text(0, 6);
        lv.insert_line(1, 3, false);
        lv.per_line_mut().markers.add_mark(1, 0, 2).unwrap();
        lv.insert_line(1, 1, false);
        assert_eq!(lv.per_line().markers.mark_value(2), 1);
        lv.remove_line(1);
        assert_eq!(lv.per_line().markers.mark_value(1), 1);
    }
}
