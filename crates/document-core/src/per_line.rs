//! Per-line ancillary data: markers, fold levels, line state and
//! annotations.
//!
//! Each manager keeps one slot per line and is told about every line
//! insertion and removal through the [`PerLine`] callbacks, which the line
//! index invokes on every line-structure change. The managers allocate
//! lazily: a document that never uses markers pays nothing for them.

use crate::fold_level;
use crate::sparse_vector::SparseVector;
use crate::split_vector::SplitVector;

/// Observer of line insertions and removals.
pub trait PerLine {
    /// Forget everything.
    fn init(&mut self);
    /// A line was inserted at `line`.
    fn insert_line(&mut self, line: usize);
    /// The line at `line` was removed.
    fn remove_line(&mut self, line: usize);
}

/// One marker placed on a line: the container-visible handle and the marker
/// number it displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerHandleNumber {
    pub handle: i32,
    pub number: i32,
}

/// The markers present on one line.
#[derive(Debug, Clone, Default)]
pub struct MarkerHandleSet {
    mh_list: Vec<MarkerHandleNumber>,
}

impl MarkerHandleSet {
    pub fn len(&self) -> usize {
        self.mh_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mh_list.is_empty()
    }

    /// Bit set of the marker numbers present.
    pub fn mark_value(&self) -> u32 {
        let mut marks = 0u32;
        for mhn in &self.mh_list {
            if (0..32).contains(&mhn.number) {
                marks |= 1 << mhn.number;
            }
        }
        marks
    }

    pub fn contains(&self, handle: i32) -> bool {
        self.mh_list.iter().any(|mhn| mhn.handle == handle)
    }

    pub fn insert_handle(&mut self, handle: i32, marker_num: i32) {
        self.mh_list.push(MarkerHandleNumber {
            handle,
            number: marker_num,
        });
    }

    pub fn remove_handle(&mut self, handle: i32) {
        self.mh_list.retain(|mhn| mhn.handle != handle);
    }

    /// Remove markers with `marker_num` (all of them, or just the first).
    /// Returns whether anything was removed.
    pub fn remove_number(&mut self, marker_num: i32, all: bool) -> bool {
        let mut performed = false;
        let mut i = 0;
        while i < self.mh_list.len() {
            if self.mh_list[i].number == marker_num {
                self.mh_list.remove(i);
                performed = true;
                if !all {
                    break;
                }
            } else {
                i += 1;
            }
        }
        performed
    }

    pub fn combine_with(&mut self, other: &mut MarkerHandleSet) {
        self.mh_list.append(&mut other.mh_list);
    }
}

/// Markers per line. Handles are allocated sequentially and never reused.
#[derive(Default)]
pub struct LineMarkers {
    markers: Vec<Option<MarkerHandleSet>>,
    handle_current: i32,
}

impl LineMarkers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_value(&self, line: usize) -> u32 {
        match self.markers.get(line) {
            Some(Some(set)) => set.mark_value(),
            _ => 0,
        }
    }

    /// First line at or after `line_start` carrying a marker in `mask`.
    pub fn marker_next(&self, line_start: usize, mask: u32) -> Option<usize> {
        (line_start..self.markers.len()).find(|&line| self.mark_value(line) & mask != 0)
    }

    /// Place marker `marker_num` on `line`, returning the new handle.
    pub fn add_mark(&mut self, line: usize, marker_num: i32, lines: usize) -> Option<i32> {
        self.handle_current += 1;
        if self.markers.is_empty() {
            // No existing markers so allocate one element per line.
            self.markers.resize(lines, None);
        }
        if line >= self.markers.len() {
            return None;
        }
        self.markers[line]
            .get_or_insert_with(MarkerHandleSet::default)
            .insert_handle(self.handle_current, marker_num);
        Some(self.handle_current)
    }

    /// Merge the markers of `line + 1` down onto `line` (lines joined).
    pub fn merge_markers(&mut self, line: usize) {
        if line + 1 < self.markers.len() {
            if let Some(mut from) = self.markers[line + 1].take() {
                self.markers[line]
                    .get_or_insert_with(MarkerHandleSet::default)
                    .combine_with(&mut from);
            }
        }
    }

    /// Remove marker `marker_num` from `line`; -1 removes every marker on
    /// the line. Returns whether anything changed.
    pub fn delete_mark(&mut self, line: usize, marker_num: i32, all: bool) -> bool {
        let mut some_changes = false;
        if line < self.markers.len() {
            if let Some(mut set) = self.markers[line].take() {
                if marker_num == -1 {
                    some_changes = true;
                } else {
                    some_changes = set.remove_number(marker_num, all);
                    if !set.is_empty() {
                        self.markers[line] = Some(set);
                    }
                }
            }
        }
        some_changes
    }

    pub fn delete_mark_from_handle(&mut self, marker_handle: i32) {
        for slot in &mut self.markers {
            if let Some(mut set) = slot.take() {
                if set.contains(marker_handle) {
                    set.remove_handle(marker_handle);
                    if !set.is_empty() {
                        *slot = Some(set);
                    }
                    return;
                }
                *slot = Some(set);
            }
        }
    }

    pub fn line_from_handle(&self, marker_handle: i32) -> Option<usize> {
        self.markers
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|set| set.contains(marker_handle)))
    }
}

impl PerLine for LineMarkers {
    fn init(&mut self) {
        self.markers.clear();
        self.markers.shrink_to_fit();
    }

    fn insert_line(&mut self, line: usize) {
        if !self.markers.is_empty() && line <= self.markers.len() {
            self.markers.insert(line, None);
        }
    }

    fn remove_line(&mut self, line: usize) {
        // Retain the markers from the deleted line by merging them into the
        // previous line.
        if !self.markers.is_empty() && line < self.markers.len() {
            if line > 0 {
                self.merge_markers(line - 1);
            }
            self.markers.remove(line);
        }
    }
}

/// Fold level per line.
#[derive(Default)]
pub struct LineLevels {
    levels: SplitVector<i32>,
}

impl LineLevels {
    pub fn new() -> Self {
        Self::default()
    }

    fn expand_levels(&mut self, size_new: usize) {
        let len = self.levels.len();
        if size_new > len {
            self.levels
                .insert_value(len, size_new - len, fold_level::BASE);
        }
    }

    pub fn clear_levels(&mut self) {
        self.levels.delete_all();
    }

    /// Set the level of `line`, returning the previous level.
    pub fn set_level(&mut self, line: usize, level: i32, lines: usize) -> i32 {
        let mut prev = 0;
        if line < lines {
            if self.levels.is_empty() {
                self.expand_levels(lines + 1);
            }
            prev = self.levels.value_at(line);
            if prev != level {
                self.levels.set_value_at(line, level);
            }
        }
        prev
    }

    pub fn get_level(&self, line: usize) -> i32 {
        if line < self.levels.len() {
            self.levels.value_at(line)
        } else {
            fold_level::BASE
        }
    }
}

impl PerLine for LineLevels {
    fn init(&mut self) {
        self.levels.delete_all();
    }

    fn insert_line(&mut self, line: usize) {
        if !self.levels.is_empty() {
            let level = if line < self.levels.len() {
                self.levels.value_at(line)
            } else {
                fold_level::BASE
            };
            self.levels.insert_value(line, 1, level);
        }
    }

    fn remove_line(&mut self, line: usize) {
        if !self.levels.is_empty() && line < self.levels.len() {
            // Move up the following lines but merge the header flag into the
            // line before so a fold does not transiently vanish.
            let first_header = self.levels.value_at(line) & fold_level::HEADER_FLAG;
            self.levels.delete(line);
            let len = self.levels.len();
            if len > 0 {
                if line == len {
                    // Last line loses the header flag.
                    let v = self.levels.value_at(line - 1);
                    self.levels
                        .set_value_at(line - 1, v & !fold_level::HEADER_FLAG);
                } else if line > 0 {
                    let v = self.levels.value_at(line - 1);
                    self.levels.set_value_at(line - 1, v | first_header);
                }
            }
        }
    }
}

/// Scalar state per line, set by lexers to remember where they were.
#[derive(Default)]
pub struct LineState {
    line_states: SplitVector<i32>,
}

impl LineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_line_state(&mut self, line: usize, state: i32) -> i32 {
        self.line_states.ensure_length(line + 1);
        let state_old = self.line_states.value_at(line);
        self.line_states.set_value_at(line, state);
        state_old
    }

    pub fn get_line_state(&self, line: usize) -> i32 {
        self.line_states.value_at(line)
    }

    /// One past the last line that ever had a state set.
    pub fn max_line_state(&self) -> usize {
        self.line_states.len()
    }
}

impl PerLine for LineState {
    fn init(&mut self) {
        self.line_states.delete_all();
    }

    fn insert_line(&mut self, line: usize) {
        if !self.line_states.is_empty() {
            self.line_states.ensure_length(line);
            let val = if line < self.line_states.len() {
                self.line_states.value_at(line)
            } else {
                0
            };
            self.line_states.insert(line, val);
        }
    }

    fn remove_line(&mut self, line: usize) {
        if line < self.line_states.len() {
            self.line_states.delete(line);
        }
    }
}

/// Styling of an annotation's text: one style byte for the whole text or
/// one byte per text byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationStyle {
    One(u8),
    Many(Vec<u8>),
}

/// The text block attached to one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationText {
    pub style: AnnotationStyle,
    pub text: String,
}

impl AnnotationText {
    fn lines(&self) -> usize {
        self.text.bytes().filter(|&b| b == b'\n').count() + 1
    }
}

/// Annotation text per line, stored sparsely. Used for both margin text and
/// annotations proper.
#[derive(Default)]
pub struct LineAnnotation {
    annotations: SparseVector<Option<Box<AnnotationText>>>,
}

impl LineAnnotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn multiple_styles(&self, line: usize) -> bool {
        matches!(
            self.annotations.value_at(line).as_deref(),
            Some(AnnotationText {
                style: AnnotationStyle::Many(_),
                ..
            })
        )
    }

    /// The single style of the annotation, or 0 when absent or styled
    /// per byte.
    pub fn style(&self, line: usize) -> u8 {
        match self.annotations.value_at(line).as_deref() {
            Some(AnnotationText {
                style: AnnotationStyle::One(style),
                ..
            }) => *style,
            _ => 0,
        }
    }

    pub fn text(&self, line: usize) -> Option<String> {
        self.annotations
            .value_at(line)
            .map(|boxed| boxed.text.clone())
    }

    /// The per-byte styles, when styled that way.
    pub fn styles(&self, line: usize) -> Option<Vec<u8>> {
        match self.annotations.value_at(line).as_deref() {
            Some(AnnotationText {
                style: AnnotationStyle::Many(styles),
                ..
            }) => Some(styles.clone()),
            _ => None,
        }
    }

    /// Attach `text` to `line`; `None` removes the annotation.
    pub fn set_text(&mut self, line: usize, text: Option<&str>) {
        match text {
            Some(text) => {
                self.annotations.ensure_length(line + 1);
                self.annotations.set_value_at(
                    line,
                    Some(Box::new(AnnotationText {
                        style: AnnotationStyle::One(0),
                        text: text.to_string(),
                    })),
                );
            }
            None => {
                if line < self.annotations.len() {
                    self.annotations.set_value_at(line, None);
                }
            }
        }
    }

    pub fn set_style(&mut self, line: usize, style: u8) {
        if let Some(mut boxed) = self.annotations.value_at(line) {
            boxed.style = AnnotationStyle::One(style);
            self.annotations.set_value_at(line, Some(boxed));
        }
    }

    /// Styles applied byte-for-byte over the existing text; requires the
    /// text to be set first.
    pub fn set_styles(&mut self, line: usize, styles: &[u8]) {
        if let Some(mut boxed) = self.annotations.value_at(line) {
            let mut bytes = styles.to_vec();
            bytes.resize(boxed.text.len(), 0);
            boxed.style = AnnotationStyle::Many(bytes);
            self.annotations.set_value_at(line, Some(boxed));
        }
    }

    pub fn length(&self, line: usize) -> usize {
        self.annotations
            .value_at(line)
            .map_or(0, |boxed| boxed.text.len())
    }

    /// How many display lines the annotation occupies (0 when absent).
    pub fn lines(&self, line: usize) -> usize {
        self.annotations.value_at(line).map_or(0, |boxed| boxed.lines())
    }

    pub fn any_set(&self) -> bool {
        (0..self.annotations.elements())
            .any(|e| self.annotations.value_at(self.annotations.position_of_element(e)).is_some())
    }

    pub fn clear_all(&mut self) {
        self.annotations.delete_all();
    }
}

impl PerLine for LineAnnotation {
    fn init(&mut self) {
        self.annotations.delete_all();
    }

    fn insert_line(&mut self, line: usize) {
        if !self.annotations.is_empty() {
            self.annotations.ensure_length(line);
            self.annotations.insert_space(line, 1);
        }
    }

    fn remove_line(&mut self, line: usize) {
        if !self.annotations.is_empty() && line > 0 && line <= self.annotations.len() {
            self.annotations.delete_position(line - 1);
        }
    }
}

/// The full per-line data set owned by the cell buffer, fanning the
/// callbacks out to every manager.
#[derive(Default)]
pub struct PerLineData {
    pub markers: LineMarkers,
    pub levels: LineLevels,
    pub state: LineState,
    pub margin: LineAnnotation,
    pub annotation: LineAnnotation,
}

impl PerLineData {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PerLine for PerLineData {
    fn init(&mut self) {
        self.markers.init();
        self.levels.init();
        self.state.init();
        self.margin.init();
        self.annotation.init();
    }

    fn insert_line(&mut self, line: usize) {
        self.markers.insert_line(line);
        self.levels.insert_line(line);
        self.state.insert_line(line);
        self.margin.insert_line(line);
        self.annotation.insert_line(line);
    }

    fn remove_line(&mut self, line: usize) {
        self.markers.remove_line(line);
        self.levels.remove_line(line);
        self.state.remove_line(line);
        self.margin.remove_line(line);
        self.annotation.remove_line(line);
    }
}
