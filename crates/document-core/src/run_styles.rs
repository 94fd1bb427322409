//! Run-length-coded map from position ranges to values.
//!
//! A [`RunStyles`] pairs a [`Partitioning`] with one value per run. Adjacent
//! runs never share a value and interior runs are never empty; `fill_range`
//! and the edit operations maintain this by splitting boundaries, dropping
//! covered runs and merging neighbours that become equal. Used for
//! indicators (decorations) and the fold/visibility maps.

use crate::partitioning::Partitioning;
use crate::split_vector::SplitVector;

/// Outcome of [`RunStyles::fill_range`]: whether anything changed, and the
/// range actually modified after trimming away parts that already carried
/// the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillResult {
    pub changed: bool,
    pub position: usize,
    pub fill_length: usize,
}

/// Run-length map over `[0, len())`.
pub struct RunStyles<T> {
    starts: Partitioning,
    styles: SplitVector<T>,
}

impl<T: Copy + Default + PartialEq> RunStyles<T> {
    pub fn new() -> Self {
        let mut styles = SplitVector::new();
        styles.insert_value(0, 2, T::default());
        Self {
            starts: Partitioning::new(8),
            styles,
        }
    }

    /// The first run at `position`: skips back over any zero-length runs
    /// that share the boundary.
    fn run_from_position(&self, position: usize) -> usize {
        let mut run = self.starts.partition_from_position(position);
        while run > 0 && position == self.starts.position_from_partition(run - 1) {
            run -= 1;
        }
        run
    }

    /// If there is no run boundary at `position`, insert one continuing the
    /// current value.
    fn split_run(&mut self, position: usize) -> usize {
        let mut run = self.run_from_position(position);
        let pos_run = self.starts.position_from_partition(run);
        if pos_run < position {
            let run_style = self.value_at(position);
            run += 1;
            self.starts.insert_partition(run, position);
            self.styles.insert_value(run, 1, run_style);
        }
        run
    }

    fn remove_run(&mut self, run: usize) {
        self.starts.remove_partition(run);
        self.styles.delete_range(run, 1);
    }

    fn remove_run_if_empty(&mut self, run: usize) {
        if run < self.starts.partitions() && self.starts.partitions() > 1 {
            if self.starts.position_from_partition(run) == self.starts.position_from_partition(run + 1)
            {
                self.remove_run(run);
            }
        }
    }

    fn remove_run_if_same_as_previous(&mut self, run: usize) {
        if run > 0 && run < self.starts.partitions() {
            if self.styles.value_at(run - 1) == self.styles.value_at(run) {
                self.remove_run(run);
            }
        }
    }

    /// Total length covered.
    pub fn len(&self) -> usize {
        self.starts.position_from_partition(self.starts.partitions())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value of the run containing `position`.
    pub fn value_at(&self, position: usize) -> T {
        self.styles.value_at(self.starts.partition_from_position(position))
    }

    /// Next position at or after `position` where the value changes, or
    /// `end + 1` when there is none before `end`.
    pub fn find_next_change(&self, position: usize, end: usize) -> usize {
        let run = self.starts.partition_from_position(position);
        if run < self.starts.partitions() {
            let run_change = self.starts.position_from_partition(run);
            if run_change > position {
                return run_change;
            }
            let next_change = self.starts.position_from_partition(run + 1);
            if next_change > position {
                next_change
            } else if position < end {
                end
            } else {
                end + 1
            }
        } else {
            end + 1
        }
    }

    /// Start of the run containing `position`.
    pub fn start_run(&self, position: usize) -> usize {
        self.starts
            .position_from_partition(self.starts.partition_from_position(position))
    }

    /// End of the run containing `position`.
    pub fn end_run(&self, position: usize) -> usize {
        self.starts
            .position_from_partition(self.starts.partition_from_position(position) + 1)
    }

    /// Fill `[position, position + fill_length)` with `value`, trimming away
    /// any prefix/suffix that already carries it so callers can skip
    /// redundant change handling.
    pub fn fill_range(&mut self, position: usize, value: T, fill_length: usize) -> FillResult {
        let unchanged = FillResult {
            changed: false,
            position,
            fill_length,
        };
        if fill_length == 0 {
            return unchanged;
        }
        let mut position = position;
        let mut fill_length = fill_length;
        let mut end = position + fill_length;
        if end > self.len() {
            return unchanged;
        }
        let mut run_end = self.run_from_position(end);
        if self.styles.value_at(run_end) == value {
            // End already has value so trim range.
            end = self.starts.position_from_partition(run_end);
            if position >= end {
                // Whole range is already same as value so no action.
                return unchanged;
            }
            fill_length = end - position;
        } else {
            run_end = self.split_run(end);
        }
        let mut run_start = self.run_from_position(position);
        if self.styles.value_at(run_start) == value {
            // Start is in expected value so trim range.
            run_start += 1;
            position = self.starts.position_from_partition(run_start);
            fill_length = end - position;
        } else if self.starts.position_from_partition(run_start) < position {
            run_start = self.split_run(position);
            run_end += 1;
        }
        if run_start < run_end {
            self.styles.set_value_at(run_start, value);
            // Remove each old run over the range.
            for _ in run_start + 1..run_end {
                self.remove_run(run_start + 1);
            }
            run_end = self.run_from_position(end);
            self.remove_run_if_same_as_previous(run_end);
            self.remove_run_if_same_as_previous(run_start);
            run_end = self.run_from_position(end);
            self.remove_run_if_empty(run_end);
            FillResult {
                changed: true,
                position,
                fill_length,
            }
        } else {
            FillResult {
                changed: false,
                position,
                fill_length,
            }
        }
    }

    /// Set the value at a single position.
    pub fn set_value_at(&mut self, position: usize, value: T) {
        self.fill_range(position, value, 1);
    }

    /// Open up space at `position`. Space inserted inside a run takes the
    /// run's value; space inserted exactly on a boundary takes the default
    /// value, so valued runs do not grow when edits touch their edges.
    pub fn insert_space(&mut self, position: usize, insert_length: usize) {
        let run_start = self.run_from_position(position);
        if self.starts.position_from_partition(run_start) == position {
            let run_style = self.value_at(position);
            // Inserting at start of run so make previous longer.
            if run_start == 0 {
                // Inserting at start of document so ensure a default run.
                if run_style != T::default() {
                    self.styles.set_value_at(0, T::default());
                    self.starts.insert_partition(1, 0);
                    self.styles.insert_value(1, 1, run_style);
                    self.starts.insert_text(0, insert_length as isize);
                } else {
                    self.starts.insert_text(run_start, insert_length as isize);
                }
            } else if run_style != T::default() {
                self.starts.insert_text(run_start - 1, insert_length as isize);
            } else {
                // Insert at end of run so do not extend style.
                self.starts.insert_text(run_start, insert_length as isize);
            }
        } else {
            self.starts.insert_text(run_start, insert_length as isize);
        }
    }

    /// Remove `[position, position + delete_length)`.
    pub fn delete_range(&mut self, position: usize, delete_length: usize) {
        let end = position + delete_length;
        let run_start = self.run_from_position(position);
        let run_end = self.run_from_position(end);
        if run_start == run_end {
            // Deleting from inside one run.
            self.starts.insert_text(run_start, -(delete_length as isize));
            self.remove_run_if_empty(run_start);
        } else {
            let run_start = self.split_run(position);
            let run_end = self.split_run(end);
            self.starts.insert_text(run_start, -(delete_length as isize));
            for _ in run_start..run_end {
                self.remove_run(run_start);
            }
            self.remove_run_if_empty(run_start);
            self.remove_run_if_same_as_previous(run_start);
        }
    }

    /// Reset to a single default run of length 0.
    pub fn delete_all(&mut self) {
        self.starts = Partitioning::new(8);
        self.styles = SplitVector::new();
        self.styles.insert_value(0, 2, T::default());
    }

    /// Number of runs.
    pub fn runs(&self) -> usize {
        self.starts.partitions()
    }

    /// Whether every run has the same value.
    pub fn all_same(&self) -> bool {
        for run in 1..self.starts.partitions() {
            if self.styles.value_at(run) != self.styles.value_at(run - 1) {
                return false;
            }
        }
        true
    }

    /// Whether every run has the value `value`.
    pub fn all_same_as(&self, value: T) -> bool {
        self.all_same() && self.styles.value_at(0) == value
    }

    /// First position at or after `start` with value `value`.
    pub fn find(&self, value: T, start: usize) -> Option<usize> {
        if start < self.len() {
            let mut run = if start > 0 {
                self.run_from_position(start)
            } else {
                0
            };
            if self.styles.value_at(run) == value {
                return Some(start);
            }
            run += 1;
            while run < self.starts.partitions() {
                if self.styles.value_at(run) == value {
                    return Some(self.starts.position_from_partition(run));
                }
                run += 1;
            }
        }
        None
    }

    #[cfg(not(debug_assertions))]
    pub fn check(&self) {}
}

/// Validate the structural invariants. Debug builds only; a failure
/// indicates corruption rather than a caller error.
#[cfg(debug_assertions)]
impl<T: Copy + Default + PartialEq + std::fmt::Debug> RunStyles<T> {
    pub fn check(&self) {
        assert!(self.starts.partitions() >= 1, "must always have 1 or more runs");
        assert_eq!(
            self.starts.partitions(),
            self.styles.len() - 1,
            "starts and styles different lengths"
        );
        let mut start = 0;
        while start < self.len() {
            let end = self.end_run(start);
            assert!(start < end, "zero length run");
            start = end;
        }
        assert_eq!(
            self.styles.value_at(self.styles.len() - 1),
            T::default(),
            "unused sentinel style changed"
        );
        for j in 1..self.styles.len() - 1 {
            assert_ne!(
                self.styles.value_at(j),
                self.styles.value_at(j - 1),
                "value of a run same as previous"
            );
        }
    }
}

impl<T: Copy + Default + PartialEq> Default for RunStyles<T> {
    fn default() -> Self {
        Self::new()
    }
}
