//! Sparse point-value map.
//!
//! [`SparseVector`] is the sibling of [`RunStyles`](crate::run_styles) for
//! data that occurs at single positions instead of over ranges: most
//! positions carry the default value and a few carry something. Line
//! annotations use one slot per line.

use crate::partitioning::Partitioning;

/// Map from position to `T`, default almost everywhere.
pub struct SparseVector<T> {
    starts: Partitioning,
    values: Vec<T>,
}

impl<T: Clone + Default + PartialEq> SparseVector<T> {
    pub fn new() -> Self {
        Self {
            starts: Partitioning::new(8),
            values: vec![T::default(), T::default()],
        }
    }

    /// Total length covered.
    pub fn len(&self) -> usize {
        self.starts.position_from_partition(self.starts.partitions())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of stored elements (including the implicit one at 0).
    pub fn elements(&self) -> usize {
        self.starts.partitions()
    }

    /// Position of stored element `element`.
    pub fn position_of_element(&self, element: usize) -> usize {
        self.starts.position_from_partition(element)
    }

    /// Value exactly at `position`, default when nothing is stored there.
    pub fn value_at(&self, position: usize) -> T {
        let partition = self.starts.partition_from_position(position);
        let start_partition = self.starts.position_from_partition(partition);
        if start_partition == position {
            self.values[partition].clone()
        } else {
            T::default()
        }
    }

    /// Store `value` at `position`; storing the default erases.
    pub fn set_value_at(&mut self, position: usize, value: T) {
        let partition = self.starts.partition_from_position(position);
        let start_partition = self.starts.position_from_partition(partition);
        if value == T::default() {
            if start_partition == position {
                if partition == 0 {
                    self.values[0] = T::default();
                } else if partition < self.starts.partitions() {
                    self.starts.remove_partition(partition);
                    self.values.remove(partition);
                }
            }
        } else if start_partition == position {
            self.values[partition] = value;
        } else {
            self.starts.insert_partition(partition + 1, position);
            self.values.insert(partition + 1, value);
        }
    }

    /// Grow the covered length to at least `wanted_length`.
    pub fn ensure_length(&mut self, wanted_length: usize) {
        let current = self.len();
        if wanted_length > current {
            self.starts
                .insert_text(self.starts.partitions() - 1, (wanted_length - current) as isize);
        }
    }

    /// Open up space at `position`. An occupied element exactly at
    /// `position` moves along with the space (except at position 0 where a
    /// fresh empty slot is created before it).
    pub fn insert_space(&mut self, position: usize, insert_length: usize) {
        let partition = self.starts.partition_from_position(position);
        let start_partition = self.starts.position_from_partition(partition);
        if start_partition == position {
            let occupied = self.values[partition] != T::default();
            if partition == 0 {
                if occupied {
                    self.starts.insert_partition(1, 0);
                    self.values.insert(1, T::default());
                    self.starts.insert_text(0, insert_length as isize);
                } else {
                    self.starts.insert_text(0, insert_length as isize);
                }
            } else if occupied {
                self.starts.insert_text(partition - 1, insert_length as isize);
            } else {
                self.starts.insert_text(partition, insert_length as isize);
            }
        } else {
            self.starts.insert_text(partition, insert_length as isize);
        }
    }

    /// Remove one position, dropping any element stored at it.
    pub fn delete_position(&mut self, position: usize) {
        if position >= self.len() {
            return;
        }
        let partition = self.starts.partition_from_position(position);
        let start_partition = self.starts.position_from_partition(partition);
        if start_partition == position {
            if partition == 0 {
                self.values[0] = T::default();
            } else if partition < self.starts.partitions() {
                self.starts.remove_partition(partition);
                self.values.remove(partition);
                self.starts.insert_text(partition - 1, -1);
                return;
            }
        }
        self.starts.insert_text(partition, -1);
    }

    /// Reset to empty, releasing the stored values.
    pub fn delete_all(&mut self) {
        self.starts.delete_all();
        self.values = vec![T::default(), T::default()];
    }
}

impl<T: Clone + Default + PartialEq> Default for SparseVector<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_returns_default() {
        let sv: SparseVector<Option<String>> = SparseVector::new();
        assert_eq!(sv.len(), 0);
        assert_eq!(sv.value_at(0), None);
    }

    #[test]
    fn test_set_and_get() {
        let mut sv: SparseVector<i32> = SparseVector::new();
        sv.ensure_length(10);
        sv.set_value_at(3, 7);
        sv.set_value_at(8, 9);
        assert_eq!(sv.value_at(3), 7);
        assert_eq!(sv.value_at(8), 9);
        assert_eq!(sv.value_at(4), 0);
        assert_eq!(sv.elements(), 3);
        // Storing the default erases.
        sv.set_value_at(3, 0);
        assert_eq!(sv.value_at(3), 0);
        assert_eq!(sv.elements(), 2);
    }

    #[test]
    fn test_value_at_zero() {
        let mut sv: SparseVector<i32> = SparseVector::new();
        sv.ensure_length(4);
        sv.set_value_at(0, 5);
        assert_eq!(sv.value_at(0), 5);
        sv.set_value_at(0, 0);
        assert_eq!(sv.value_at(0), 0);
        assert_eq!(sv.elements(), 1);
    }

    #[test]
    fn test_insert_space_moves_elements() {
        let mut sv: SparseVector<i32> = SparseVector::new();
        sv.ensure_length(10);
        sv.set_value_at(4, 6);
        sv.insert_space(2, 3);
        assert_eq!(sv.len(), 13);
        assert_eq!(sv.value_at(4), 0);
        assert_eq!(sv.value_at(7), 6);
        // Space at an occupied position moves the occupant with it.
        sv.insert_space(7, 2);
        assert_eq!(sv.value_at(9), 6);
    }

    #[test]
    fn test_insert_space_at_occupied_zero() {
        let mut sv: SparseVector<i32> = SparseVector::new();
        sv.ensure_length(3);
        sv.set_value_at(0, 4);
        sv.insert_space(0, 2);
        assert_eq!(sv.len(), 5);
        assert_eq!(sv.value_at(0), 4);
    }

    #[test]
    fn test_delete_position_drops_element() {
        let mut sv: SparseVector<i32> = SparseVector::new();
        sv.ensure_length(10);
        sv.set_value_at(4, 6);
        sv.set_value_at(7, 8);
        sv.delete_position(4);
        assert_eq!(sv.len(), 9);
        assert_eq!(sv.value_at(4), 0);
        assert_eq!(sv.value_at(6), 8);
        // Deleting an unoccupied position just shifts.
        sv.delete_position(0);
        assert_eq!(sv.len(), 8);
        assert_eq!(sv.value_at(5), 8);
    }

    #[test]
    fn test_owned_values() {
        let mut sv: SparseVector<Option<String>> = SparseVector::new();
        sv.ensure_length(5);
        sv.set_value_at(2, Some("note".to_string()));
        assert_eq!(sv.value_at(2).as_deref(), Some("note"));
        sv.delete_all();
        assert_eq!(sv.len(), 0);
        assert_eq!(sv.value_at(2), None);
    }
}
