use document_core::{ContractionState, Document, fold_level};

/// A document shaped like:
/// ```text
/// 0: header          level base, header
/// 1:   child         level base+1
/// 2:   child         level base+1
/// 3: header          level base, header
/// 4:   child         level base+1
/// ```
fn folded_doc() -> Document {
    let mut doc = Document::new();
    doc.insert_string(0, b"h0\n c1\n c2\nh3\n c4");
    doc.set_level(0, fold_level::BASE | fold_level::HEADER_FLAG);
    doc.set_level(1, fold_level::BASE + 1);
    doc.set_level(2, fold_level::BASE + 1);
    doc.set_level(3, fold_level::BASE | fold_level::HEADER_FLAG);
    doc.set_level(4, fold_level::BASE + 1);
    doc
}

#[test]
fn test_get_last_child_and_fold_parent() {
    let mut doc = folded_doc();
    assert_eq!(doc.get_last_child(0, Some(fold_level::BASE), None), 2);
    assert_eq!(doc.get_fold_parent(2), Some(0));
    assert_eq!(doc.get_fold_parent(4), Some(3));
    assert_eq!(doc.get_fold_parent(3), None);
    assert_eq!(doc.get_last_child(3, Some(fold_level::BASE), None), 4);
}

#[test]
fn test_get_last_child_default_level() {
    let mut doc = folded_doc();
    assert_eq!(doc.get_last_child(0, None, None), 2);
}

#[test]
fn test_white_lines_fold_with_neighbour() {
    let mut doc = Document::new();
    doc.insert_string(0, b"h\n a\n\n b\nafter");
    doc.set_level(0, fold_level::BASE | fold_level::HEADER_FLAG);
    doc.set_level(1, fold_level::BASE + 1);
    doc.set_level(2, (fold_level::BASE + 1) | fold_level::WHITE_FLAG);
    doc.set_level(3, fold_level::BASE + 1);
    doc.set_level(4, fold_level::BASE);
    assert_eq!(doc.get_last_child(0, None, None), 3);
}

#[test]
fn test_set_level_notifies_with_levels() {
    use document_core::{DocModification, DocWatcher, ModificationFlags};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct FoldWatcher {
        changes: RefCell<Vec<(usize, i32, i32)>>,
    }
    impl DocWatcher for FoldWatcher {
        fn notify_modified(&self, _doc: &mut Document, mh: &DocModification<'_>) {
            if mh.modification_type.contains(ModificationFlags::CHANGE_FOLD) {
                self.changes
                    .borrow_mut()
                    .push((mh.line, mh.fold_level_prev, mh.fold_level_now));
            }
        }
    }

    let mut doc = Document::new();
    doc.insert_string(0, b"a\nb");
    let watcher = Rc::new(FoldWatcher::default());
    doc.add_watcher(watcher.clone());
    doc.set_level(1, fold_level::BASE + 2);
    // Setting the same level again does not notify.
    doc.set_level(1, fold_level::BASE + 2);
    let changes = watcher.changes.borrow().clone();
    assert_eq!(changes, vec![(1, fold_level::BASE, fold_level::BASE + 2)]);
}

#[test]
fn test_levels_follow_line_edits() {
    let mut doc = folded_doc();
    // Insert a line before line 3; its level arrives from the neighbour.
    let line3_start = doc.line_start(3);
    doc.insert_string(line3_start, b"new\n");
    assert_ne!(doc.get_level(4) & fold_level::HEADER_FLAG, 0);
    assert_eq!(fold_level::number(doc.get_level(5)), fold_level::BASE + 1);
}

#[test]
fn test_highlight_delimiters() {
    let mut doc = folded_doc();
    let highlight = doc.get_highlight_delimiters(1, 4);
    assert_eq!(highlight.begin_fold_block, Some(0));
    assert_eq!(highlight.end_fold_block, Some(2));
    assert!(highlight.needs_drawing(1));
    assert!(!highlight.needs_drawing(4));
}

#[test]
fn test_contraction_with_fold_structure() {
    // Contract the fold at line 0 of the folded document shape: lines 1-2
    // become invisible.
    let mut cs = ContractionState::new();
    cs.insert_lines(0, 4);
    assert_eq!(cs.lines_in_doc(), 5);
    cs.set_expanded(0, false);
    cs.set_visible(1, 2, false);
    assert_eq!(cs.lines_displayed(), 3);
    assert_eq!(cs.display_from_doc(3), 1);
    assert_eq!(cs.doc_from_display(1), 3);
    assert_eq!(cs.contracted_next(0), Some(0));
    // Expanding restores the mapping.
    cs.set_expanded(0, true);
    cs.set_visible(1, 2, true);
    assert_eq!(cs.lines_displayed(), 5);
    assert_eq!(cs.contracted_next(0), None);
}

#[test]
fn test_clear_levels() {
    let mut doc = folded_doc();
    doc.clear_levels();
    assert_eq!(doc.get_level(0), fold_level::BASE);
    assert_eq!(doc.get_level(4), fold_level::BASE);
}
