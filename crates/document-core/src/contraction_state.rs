//! Mapping between document lines and display lines.
//!
//! Folding hides lines and wrapping gives one document line several display
//! lines; [`ContractionState`] answers both directions of the mapping. As
//! long as nothing is hidden and every height is 1 it stays in a one-to-one
//! mode with no auxiliary storage; the first non-default call migrates to
//! the full representation.

use crate::partitioning::Partitioning;
use crate::run_styles::RunStyles;

struct FoldData {
    visible: RunStyles<i32>,
    expanded: RunStyles<i32>,
    heights: RunStyles<i32>,
    /// Position of partition i = display lines before document line i.
    display_lines: Partitioning,
}

/// Document-line ↔ display-line mapping.
pub struct ContractionState {
    lines_in_document: usize,
    data: Option<Box<FoldData>>,
}

impl ContractionState {
    pub fn new() -> Self {
        Self {
            lines_in_document: 1,
            data: None,
        }
    }

    fn one_to_one(&self) -> bool {
        self.data.is_none()
    }

    fn ensure_data(&mut self) {
        if self.one_to_one() {
            self.data = Some(Box::new(FoldData {
                visible: RunStyles::new(),
                expanded: RunStyles::new(),
                heights: RunStyles::new(),
                display_lines: Partitioning::new(4),
            }));
            let lines = self.lines_in_document;
            self.insert_lines(0, lines);
        }
    }

    /// Drop all fold data, keeping the line count.
    pub fn clear(&mut self) {
        self.data = None;
        self.lines_in_document = 1;
    }

    pub fn lines_in_doc(&self) -> usize {
        match &self.data {
            None => self.lines_in_document,
            Some(data) => data.display_lines.partitions() - 1,
        }
    }

    pub fn lines_displayed(&self) -> usize {
        match &self.data {
            None => self.lines_in_document,
            Some(data) => data.display_lines.position_from_partition(self.lines_in_doc()),
        }
    }

    /// Display line of the first display row of `line_doc`.
    pub fn display_from_doc(&self, line_doc: usize) -> usize {
        match &self.data {
            None => line_doc.min(self.lines_in_document),
            Some(data) => {
                let line_doc = line_doc.min(data.display_lines.partitions());
                data.display_lines.position_from_partition(line_doc)
            }
        }
    }

    /// Display line of the last display row of `line_doc`.
    pub fn display_last_from_doc(&self, line_doc: usize) -> usize {
        self.display_from_doc(line_doc) + self.get_height(line_doc) - 1
    }

    /// Document line shown at `line_display`.
    pub fn doc_from_display(&self, line_display: usize) -> usize {
        match &self.data {
            None => line_display,
            Some(data) => {
                if line_display > self.lines_displayed() {
                    return data.display_lines.partition_from_position(self.lines_displayed());
                }
                let line_doc = data.display_lines.partition_from_position(line_display);
                debug_assert!(self.get_visible(line_doc));
                line_doc
            }
        }
    }

    pub fn insert_line(&mut self, line_doc: usize) {
        match &mut self.data {
            None => self.lines_in_document += 1,
            Some(data) => {
                data.visible.insert_space(line_doc, 1);
                data.visible.set_value_at(line_doc, 1);
                data.expanded.insert_space(line_doc, 1);
                data.expanded.set_value_at(line_doc, 1);
                data.heights.insert_space(line_doc, 1);
                data.heights.set_value_at(line_doc, 1);
                let line_display = data.display_lines.position_from_partition(
                    line_doc.min(data.display_lines.partitions()),
                );
                data.display_lines.insert_partition(line_doc, line_display);
                data.display_lines.insert_text(line_doc, 1);
            }
        }
    }

    pub fn insert_lines(&mut self, line_doc: usize, line_count: usize) {
        for l in 0..line_count {
            self.insert_line(line_doc + l);
        }
        self.check();
    }

    pub fn delete_line(&mut self, line_doc: usize) {
        match &mut self.data {
            None => self.lines_in_document -= 1,
            Some(data) => {
                let visible = data.visible.value_at(line_doc) == 1;
                if visible {
                    let height = data.heights.value_at(line_doc);
                    data.display_lines.insert_text(line_doc, -(height as isize));
                }
                data.display_lines.remove_partition(line_doc);
                data.visible.delete_range(line_doc, 1);
                data.expanded.delete_range(line_doc, 1);
                data.heights.delete_range(line_doc, 1);
            }
        }
    }

    pub fn delete_lines(&mut self, line_doc: usize, line_count: usize) {
        for _ in 0..line_count {
            self.delete_line(line_doc);
        }
        self.check();
    }

    pub fn get_visible(&self, line_doc: usize) -> bool {
        match &self.data {
            None => true,
            Some(data) => {
                if line_doc >= data.visible.len() {
                    true
                } else {
                    data.visible.value_at(line_doc) == 1
                }
            }
        }
    }

    /// Show or hide an inclusive range of document lines. Returns whether
    /// the display mapping changed.
    pub fn set_visible(&mut self, line_doc_start: usize, line_doc_end: usize, is_visible: bool) -> bool {
        if self.one_to_one() && is_visible {
            return false;
        }
        self.ensure_data();
        if line_doc_start > line_doc_end || line_doc_end >= self.lines_in_doc() {
            return false;
        }
        let mut delta = 0isize;
        self.check();
        for line in line_doc_start..=line_doc_end {
            if self.get_visible(line) != is_visible {
                let data = self.data.as_mut().unwrap();
                let height = data.heights.value_at(line) as isize;
                let difference = if is_visible { height } else { -height };
                data.visible.set_value_at(line, if is_visible { 1 } else { 0 });
                data.display_lines.insert_text(line, difference);
                delta += difference;
            }
        }
        self.check();
        delta != 0
    }

    /// Whether any line is hidden.
    pub fn hidden_lines(&self) -> bool {
        match &self.data {
            None => false,
            Some(data) => !data.visible.all_same_as(1),
        }
    }

    pub fn get_expanded(&self, line_doc: usize) -> bool {
        match &self.data {
            None => true,
            Some(data) => data.expanded.value_at(line_doc) == 1,
        }
    }

    /// Returns whether the expansion state changed.
    pub fn set_expanded(&mut self, line_doc: usize, is_expanded: bool) -> bool {
        if self.one_to_one() && is_expanded {
            return false;
        }
        self.ensure_data();
        let data = self.data.as_mut().unwrap();
        if is_expanded != (data.expanded.value_at(line_doc) == 1) {
            data.expanded.set_value_at(line_doc, if is_expanded { 1 } else { 0 });
            self.check();
            true
        } else {
            self.check();
            false
        }
    }

    /// First contracted line at or after `line_doc_start`, if any.
    pub fn contracted_next(&self, line_doc_start: usize) -> Option<usize> {
        match &self.data {
            None => None,
            Some(data) => {
                if data.expanded.value_at(line_doc_start) == 0 {
                    Some(line_doc_start)
                } else {
                    let line_doc_next_change = data.expanded.end_run(line_doc_start);
                    if line_doc_next_change < self.lines_in_doc() {
                        Some(line_doc_next_change)
                    } else {
                        None
                    }
                }
            }
        }
    }

    pub fn get_height(&self, line_doc: usize) -> usize {
        match &self.data {
            None => 1,
            Some(data) => data.heights.value_at(line_doc) as usize,
        }
    }

    /// Set the number of display lines needed for `line_doc`. Returns
    /// whether this was a change.
    pub fn set_height(&mut self, line_doc: usize, height: usize) -> bool {
        if self.one_to_one() && height == 1 {
            return false;
        }
        if line_doc >= self.lines_in_doc() {
            return false;
        }
        self.ensure_data();
        if self.get_height(line_doc) != height {
            if self.get_visible(line_doc) {
                let old = self.get_height(line_doc) as isize;
                let data = self.data.as_mut().unwrap();
                data.display_lines.insert_text(line_doc, height as isize - old);
            }
            let data = self.data.as_mut().unwrap();
            data.heights.set_value_at(line_doc, height as i32);
            self.check();
            true
        } else {
            self.check();
            false
        }
    }

    /// Make every line visible again, returning to the one-to-one mode.
    pub fn show_all(&mut self) {
        let lines = self.lines_in_doc();
        self.clear();
        self.lines_in_document = lines;
    }

    #[cfg(debug_assertions)]
    fn check(&self) {
        for vline in 0..self.lines_displayed() {
            let line_doc = self.doc_from_display(vline);
            assert!(self.get_visible(line_doc));
        }
        for line_doc in 0..self.lines_in_doc() {
            let display_this = self.display_from_doc(line_doc);
            let display_next = self.display_from_doc(line_doc + 1);
            let height = display_next - display_this;
            if self.get_visible(line_doc) {
                assert_eq!(self.get_height(line_doc), height);
            } else {
                assert_eq!(height, 0);
            }
        }
    }

    #[cfg(not(debug_assertions))]
    fn check(&self) {}
}

impl Default for ContractionState {
    fn default() -> Self {
        Self::new()
    }
}
