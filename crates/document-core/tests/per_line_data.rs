use std::cell::RefCell;
use std::rc::Rc;

use document_core::{DocModification, DocWatcher, Document, ModificationFlags};

#[derive(Default)]
struct FlagWatcher {
    seen: RefCell<Vec<(u32, usize)>>,
}

impl DocWatcher for FlagWatcher {
    fn notify_modified(&self, _doc: &mut Document, mh: &DocModification<'_>) {
        self.seen.borrow_mut().push((mh.modification_type.0, mh.line));
    }
}

#[test]
fn test_markers_survive_edits() {
    let mut doc = Document::new();
    doc.insert_string(0, b"zero\none\ntwo\nthree");
    let handle = doc.add_mark(2, 5).unwrap();
    assert_eq!(doc.get_mark(2), 1 << 5);
    assert_eq!(doc.line_from_handle(handle), Some(2));
    assert_eq!(doc.marker_next(0, 1 << 5), Some(2));

    // Inserting a line above moves the marker down.
    doc.insert_string(0, b"pre\n");
    assert_eq!(doc.get_mark(3), 1 << 5);
    assert_eq!(doc.line_from_handle(handle), Some(3));

    // Deleting the marked line's text keeps the marker at that index,
    // which the following line now occupies.
    let start = doc.line_start(3);
    let end = doc.line_start(4);
    doc.delete_chars(start, end - start);
    assert_eq!(doc.lines_total(), 4);
    assert_eq!(doc.line_from_handle(handle), Some(3));
    assert_eq!(doc.get_mark(3), 1 << 5);
}

#[test]
fn test_marker_delete_paths() {
    let mut doc = Document::new();
    doc.insert_string(0, b"a\nb\nc");
    doc.add_mark(0, 1);
    doc.add_mark(1, 1);
    let h = doc.add_mark(1, 2).unwrap();
    doc.delete_mark(1, 1);
    assert_eq!(doc.get_mark(1), 1 << 2);
    doc.delete_mark_from_handle(h);
    assert_eq!(doc.get_mark(1), 0);
    doc.add_mark(2, 1);
    doc.delete_all_marks(1);
    assert_eq!(doc.get_mark(0), 0);
    assert_eq!(doc.get_mark(2), 0);
}

#[test]
fn test_add_mark_set() {
    let mut doc = Document::new();
    doc.insert_string(0, b"a\nb");
    doc.add_mark_set(1, (1 << 2) | (1 << 7));
    assert_eq!(doc.get_mark(1), (1 << 2) | (1 << 7));
}

#[test]
fn test_marker_notifications_carry_line() {
    let mut doc = Document::new();
    doc.insert_string(0, b"a\nb\nc");
    let watcher = Rc::new(FlagWatcher::default());
    doc.add_watcher(watcher.clone());
    doc.add_mark(1, 0);
    let seen = watcher.seen.borrow().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, ModificationFlags::CHANGE_MARKER.0);
    assert_eq!(seen[0].1, 1);
}

#[test]
fn test_line_state_round_trip_and_notification() {
    let mut doc = Document::new();
    doc.insert_string(0, b"a\nb\nc");
    let watcher = Rc::new(FlagWatcher::default());
    doc.add_watcher(watcher.clone());
    assert_eq!(doc.set_line_state(1, 42), 0);
    assert_eq!(doc.get_line_state(1), 42);
    assert_eq!(doc.get_max_line_state(), 2);
    // Unchanged state does not notify.
    doc.set_line_state(1, 42);
    let seen = watcher.seen.borrow().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, ModificationFlags::CHANGE_LINE_STATE.0);
}

#[test]
fn test_line_state_follows_lines() {
    let mut doc = Document::new();
    doc.insert_string(0, b"a\nb\nc");
    doc.set_line_state(2, 7);
    doc.insert_string(0, b"new\n");
    assert_eq!(doc.get_line_state(3), 7);
    assert_eq!(doc.get_line_state(2), 0);
}

#[test]
fn test_annotations() {
    let mut doc = Document::new();
    doc.insert_string(0, b"one\ntwo\nthree");
    doc.annotation_set_text(1, Some("look\nhere"));
    assert_eq!(doc.annotation_text(1).as_deref(), Some("look\nhere"));
    assert_eq!(doc.annotation_lines(1), 2);
    doc.annotation_set_style(1, 4);
    assert_eq!(doc.annotation_style(1), 4);
    // Out-of-range lines are ignored.
    doc.annotation_set_text(10, Some("nope"));
    assert_eq!(doc.annotation_text(10), None);
    doc.annotation_clear_all();
    assert_eq!(doc.annotation_text(1), None);
}

#[test]
fn test_annotation_lines_added_notification() {
    #[derive(Default)]
    struct AnnWatcher {
        deltas: RefCell<Vec<isize>>,
    }
    impl DocWatcher for AnnWatcher {
        fn notify_modified(&self, _doc: &mut Document, mh: &DocModification<'_>) {
            if mh.modification_type.contains(ModificationFlags::CHANGE_ANNOTATION) {
                self.deltas.borrow_mut().push(mh.annotation_lines_added);
            }
        }
    }
    let mut doc = Document::new();
    doc.insert_string(0, b"a\nb");
    let watcher = Rc::new(AnnWatcher::default());
    doc.add_watcher(watcher.clone());
    doc.annotation_set_text(0, Some("x\ny\nz"));
    doc.annotation_set_text(0, None);
    let deltas = watcher.deltas.borrow().clone();
    assert_eq!(deltas, vec![3, -3]);
}

#[test]
fn test_margin_text_is_separate_from_annotations() {
    let mut doc = Document::new();
    doc.insert_string(0, b"one\ntwo");
    doc.margin_set_text(0, Some("margin"));
    doc.annotation_set_text(0, Some("annotation"));
    assert_eq!(doc.margin_text(0).as_deref(), Some("margin"));
    assert_eq!(doc.annotation_text(0).as_deref(), Some("annotation"));
    doc.margin_set_style(0, 9);
    assert_eq!(doc.margin_style(0), 9);
    doc.margin_clear_all();
    assert_eq!(doc.margin_text(0), None);
    assert_eq!(doc.annotation_text(0).as_deref(), Some("annotation"));
}

#[test]
fn test_annotations_follow_line_edits() {
    let mut doc = Document::new();
    doc.insert_string(0, b"one\ntwo\nthree");
    doc.annotation_set_text(2, Some("note"));
    doc.insert_string(0, b"zero\n");
    assert_eq!(doc.annotation_text(3).as_deref(), Some("note"));
    assert_eq!(doc.annotation_text(2), None);
}
