//! Modification notifications.
//!
//! Every structural change to a document is announced to its watchers as a
//! [`DocModification`]: a bit set describing what happened plus the
//! affected range, the change in line count and (for text changes) the
//! bytes involved. Watchers receive a `Before*` notification ahead of the
//! change and the full notification after it; undo and redo steps carry the
//! grouping bits so containers can treat a multi-step operation as one.

use thiserror::Error;

/// Bit set describing a modification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModificationFlags(pub u32);

impl ModificationFlags {
    pub const NONE: ModificationFlags = ModificationFlags(0);
    pub const INSERT_TEXT: ModificationFlags = ModificationFlags(0x1);
    pub const DELETE_TEXT: ModificationFlags = ModificationFlags(0x2);
    pub const CHANGE_STYLE: ModificationFlags = ModificationFlags(0x4);
    pub const CHANGE_FOLD: ModificationFlags = ModificationFlags(0x8);
    pub const PERFORMED_USER: ModificationFlags = ModificationFlags(0x10);
    pub const PERFORMED_UNDO: ModificationFlags = ModificationFlags(0x20);
    pub const PERFORMED_REDO: ModificationFlags = ModificationFlags(0x40);
    pub const MULTI_STEP_UNDO_REDO: ModificationFlags = ModificationFlags(0x80);
    pub const LAST_STEP_IN_UNDO_REDO: ModificationFlags = ModificationFlags(0x100);
    pub const CHANGE_MARKER: ModificationFlags = ModificationFlags(0x200);
    pub const BEFORE_INSERT: ModificationFlags = ModificationFlags(0x400);
    pub const BEFORE_DELETE: ModificationFlags = ModificationFlags(0x800);
    pub const MULTILINE_UNDO_REDO: ModificationFlags = ModificationFlags(0x1000);
    pub const START_ACTION: ModificationFlags = ModificationFlags(0x2000);
    pub const CHANGE_INDICATOR: ModificationFlags = ModificationFlags(0x4000);
    pub const CHANGE_LINE_STATE: ModificationFlags = ModificationFlags(0x8000);
    pub const CHANGE_MARGIN: ModificationFlags = ModificationFlags(0x10000);
    pub const CHANGE_ANNOTATION: ModificationFlags = ModificationFlags(0x20000);
    pub const CONTAINER: ModificationFlags = ModificationFlags(0x40000);
    pub const LEXER_STATE: ModificationFlags = ModificationFlags(0x80000);
    pub const INSERT_CHECK: ModificationFlags = ModificationFlags(0x100000);

    pub fn contains(self, other: ModificationFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn intersects(self, other: ModificationFlags) -> bool {
        self.0 & other.0 != 0
    }
}

impl std::ops::BitOr for ModificationFlags {
    type Output = ModificationFlags;

    fn bitor(self, rhs: ModificationFlags) -> ModificationFlags {
        ModificationFlags(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for ModificationFlags {
    fn bitor_assign(&mut self, rhs: ModificationFlags) {
        self.0 |= rhs.0;
    }
}

/// Payload of one modification notification. The text borrow is valid for
/// the duration of the callback only.
#[derive(Debug, Clone, Copy)]
pub struct DocModification<'a> {
    pub modification_type: ModificationFlags,
    pub position: usize,
    pub length: usize,
    /// Change in the total number of lines.
    pub lines_added: isize,
    /// The inserted or removed bytes, for text modifications.
    pub text: Option<&'a [u8]>,
    pub line: usize,
    pub fold_level_now: i32,
    pub fold_level_prev: i32,
    pub annotation_lines_added: isize,
    /// Container-supplied token for container undo actions.
    pub token: usize,
}

impl<'a> DocModification<'a> {
    pub fn new(modification_type: ModificationFlags, position: usize, length: usize) -> Self {
        Self {
            modification_type,
            position,
            length,
            lines_added: 0,
            text: None,
            line: 0,
            fold_level_now: 0,
            fold_level_prev: 0,
            annotation_lines_added: 0,
            token: 0,
        }
    }

    pub fn with_text(
        modification_type: ModificationFlags,
        position: usize,
        length: usize,
        lines_added: isize,
        text: &'a [u8],
    ) -> Self {
        Self {
            lines_added,
            text: Some(text),
            ..Self::new(modification_type, position, length)
        }
    }

    pub fn at_line(modification_type: ModificationFlags, position: usize, line: usize) -> Self {
        Self {
            line,
            ..Self::new(modification_type, position, 0)
        }
    }
}

/// Error states surfaced through `notify_error_occurred`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Status {
    #[error("position out of range")]
    BadPosition,
    #[error("memory exhausted")]
    BadAlloc,
    #[error("operation failed")]
    Failure,
}

/// Observer of a document. All methods have no-op defaults so watchers
/// implement only what they care about. Callbacks receive the document
/// mutably; re-entrant mutation from inside a callback is refused by the
/// document's guards rather than forbidden here.
pub trait DocWatcher {
    /// A mutation was attempted while the document is read-only.
    fn notify_modify_attempt(&self, _doc: &mut crate::document::Document) {}

    /// The document passed through its save point (dirty-state change).
    fn notify_save_point(&self, _doc: &mut crate::document::Document, _at_save_point: bool) {}

    /// A modification happened; see the flags for what kind.
    fn notify_modified(
        &self,
        _doc: &mut crate::document::Document,
        _mh: &DocModification<'_>,
    ) {
    }

    /// The document is being destroyed; drop any reference to it.
    fn notify_deleted(&self, _doc: &mut crate::document::Document) {}

    /// Styling is needed up to `end_pos` and no lexer is attached.
    fn notify_style_needed(&self, _doc: &mut crate::document::Document, _end_pos: usize) {}

    /// The attached lexer changed.
    fn notify_lexer_changed(&self, _doc: &mut crate::document::Document) {}

    /// An internal error occurred; the current operation was abandoned.
    fn notify_error_occurred(&self, _doc: &mut crate::document::Document, _status: Status) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_operations() {
        let flags = ModificationFlags::INSERT_TEXT | ModificationFlags::PERFORMED_USER;
        assert!(flags.contains(ModificationFlags::INSERT_TEXT));
        assert!(flags.contains(ModificationFlags::PERFORMED_USER));
        assert!(!flags.contains(ModificationFlags::DELETE_TEXT));
        assert!(flags.intersects(ModificationFlags::INSERT_TEXT | ModificationFlags::DELETE_TEXT));
        let mut flags = flags;
        flags |= ModificationFlags::START_ACTION;
        assert!(flags.contains(ModificationFlags::START_ACTION));
    }

    #[test]
    fn test_modification_constructors() {
        let mh = DocModification::with_text(
            ModificationFlags::INSERT_TEXT,
            3,
            5,
            1,
            b"ab\ncd",
        );
        assert_eq!(mh.position, 3);
        assert_eq!(mh.length, 5);
        assert_eq!(mh.lines_added, 1);
        assert_eq!(mh.text, Some(&b"ab\ncd"[..]));
        let mh = DocModification::at_line(ModificationFlags::CHANGE_MARKER, 10, 2);
        assert_eq!(mh.line, 2);
        assert_eq!(mh.length, 0);
    }
}
