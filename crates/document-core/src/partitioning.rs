//! Partition table: an ordered sequence of starts dividing a length into
//! runs.
//!
//! Used for the line index (partition i = line i) and for the run-length
//! style maps. Lookup in either direction is O(log n). Text insertion shifts
//! every later start by a delta; to keep that O(1) for the common case of
//! repeated edits around one point, the shift is cached as a pending step
//! (`step_partition`, `step_length`) and only materialised when a lookup or
//! structural change crosses it.

use crate::split_vector::SplitVector;

/// Ordered starts `starts[0..=n]` with `starts[0] == 0` and `starts[n]` the
/// total length. Partition `i` spans `[starts[i], starts[i+1])`.
pub struct Partitioning {
    body: SplitVector<usize>,
    /// Partitions above this index have `step_length` still to be added.
    step_partition: usize,
    step_length: isize,
}

impl Partitioning {
    /// Create a table with a single empty partition.
    pub fn new(grow_size: usize) -> Self {
        let mut body = SplitVector::with_grow_size(grow_size);
        body.insert(0, 0); // this value stays 0 for ever
        body.insert(1, 0); // end of the first partition
        Self {
            body,
            step_partition: 0,
            step_length: 0,
        }
    }

    fn apply_step(&mut self, partition_up_to: usize) {
        if self.step_length != 0 {
            self.body
                .range_add_delta(self.step_partition + 1, partition_up_to + 1, self.step_length);
        }
        self.step_partition = partition_up_to;
        if self.step_partition >= self.body.len() - 1 {
            self.step_partition = self.partitions();
            self.step_length = 0;
        }
    }

    fn back_step(&mut self, partition_down_to: usize) {
        if self.step_length != 0 {
            self.body.range_add_delta(
                partition_down_to + 1,
                self.step_partition + 1,
                -self.step_length,
            );
        }
        self.step_partition = partition_down_to;
    }

    /// Number of partitions.
    pub fn partitions(&self) -> usize {
        self.body.len() - 1
    }

    /// Split partition `partition` at `pos`, which must lie within it.
    pub fn insert_partition(&mut self, partition: usize, pos: usize) {
        if self.step_partition < partition {
            self.apply_step(partition);
        }
        self.body.insert(partition, pos);
        self.step_partition += 1;
    }

    /// Move the start of `partition` to `pos`.
    pub fn set_partition_start_position(&mut self, partition: usize, pos: usize) {
        self.apply_step(partition + 1);
        if partition > self.body.len() {
            return;
        }
        self.body.set_value_at(partition, pos);
    }

    /// Shift every start after `partition_insert` by `delta`. Negative
    /// deltas model deletion; the caller keeps lengths non-negative.
    pub fn insert_text(&mut self, partition_insert: usize, delta: isize) {
        if delta == 0 {
            return;
        }
        if self.step_length != 0 {
            if partition_insert >= self.step_partition {
                // Fill in up to the new insertion point.
                self.apply_step(partition_insert);
                self.step_length += delta;
            } else if partition_insert >= self.step_partition.saturating_sub(self.body.len() / 10) {
                // Close to the step so move the step back.
                self.back_step(partition_insert);
                self.step_length += delta;
            } else {
                self.apply_step(self.body.len() - 1);
                self.step_partition = partition_insert;
                self.step_length = delta;
            }
        } else {
            self.step_partition = partition_insert;
            self.step_length = delta;
        }
    }

    /// Start position of `partition`. Out-of-range arguments return 0.
    pub fn position_from_partition(&self, partition: usize) -> usize {
        if partition >= self.body.len() {
            return 0;
        }
        let pos = self.body.value_at(partition);
        if partition > self.step_partition {
            pos.wrapping_add_signed(self.step_length)
        } else {
            pos
        }
    }

    /// Partition containing `pos`. A position exactly on a boundary belongs
    /// to the partition starting there. Returns a value in
    /// `[0, partitions() - 1]` even for arguments outside the interval.
    pub fn partition_from_position(&self, pos: usize) -> usize {
        if self.body.len() <= 1 {
            return 0;
        }
        if pos >= self.position_from_partition(self.partitions()) {
            return self.partitions() - 1;
        }
        let mut lower = 0usize;
        let mut upper = self.partitions();
        while lower < upper {
            let middle = (upper + lower + 1) / 2; // round high
            let mut pos_middle = self.body.value_at(middle);
            if middle > self.step_partition {
                pos_middle = pos_middle.wrapping_add_signed(self.step_length);
            }
            if pos < pos_middle {
                upper = middle - 1;
            } else {
                lower = middle;
            }
        }
        lower
    }

    /// Merge partition `partition` into its predecessor.
    pub fn remove_partition(&mut self, partition: usize) {
        if partition > self.step_partition {
            self.apply_step(partition);
        }
        self.step_partition = self.step_partition.saturating_sub(1);
        self.body.delete(partition);
    }

    /// Reset to a single empty partition.
    pub fn delete_all(&mut self) {
        self.body.delete_all();
        self.body.insert(0, 0);
        self.body.insert(1, 0);
        self.step_partition = 0;
        self.step_length = 0;
    }
}
