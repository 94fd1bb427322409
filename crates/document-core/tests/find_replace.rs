use document_core::{CP_UTF8, CaseFolderTable, Document, SearchFlags};

fn doc_with(text: &[u8]) -> Document {
    let mut doc = Document::new();
    doc.insert_string(0, text);
    doc
}

fn regexp() -> SearchFlags {
    SearchFlags {
        regexp: true,
        match_case: true,
        ..SearchFlags::default()
    }
}

#[test]
fn test_literal_forward_and_backward() {
    let mut doc = doc_with(b"alpha beta alpha");
    let hit = doc
        .find_text(0, doc.len(), b"alpha", SearchFlags::match_case())
        .unwrap()
        .unwrap();
    assert_eq!(hit.position, 0);
    assert_eq!(hit.length, 5);
    let hit = doc
        .find_text(doc.len(), 0, b"alpha", SearchFlags::match_case())
        .unwrap()
        .unwrap();
    assert_eq!(hit.position, 11);
    assert!(
        doc.find_text(0, doc.len(), b"gamma", SearchFlags::match_case())
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_empty_needle_returns_start() {
    let mut doc = doc_with(b"abc");
    let hit = doc.find_text(1, 3, b"", SearchFlags::match_case()).unwrap().unwrap();
    assert_eq!(hit.position, 1);
    assert_eq!(hit.length, 0);
}

#[test]
fn test_utf8_search_respects_characters() {
    // a, b, U+0393 (CE 93), d
    let mut doc = doc_with(b"ab\xCE\x93d");
    doc.set_dbcs_code_page(CP_UTF8);
    let hit = doc
        .find_text(0, 5, b"b", SearchFlags::match_case())
        .unwrap()
        .unwrap();
    assert_eq!(hit.position, 1);
    let hit = doc
        .find_text(5, 0, b"b", SearchFlags::match_case())
        .unwrap()
        .unwrap();
    assert_eq!(hit.position, 1);
    let hit = doc
        .find_text(0, 4, b"\xCE\x93", SearchFlags::match_case())
        .unwrap()
        .unwrap();
    assert_eq!(hit.position, 2);
    // A range that cuts the character excludes it.
    assert!(
        doc.find_text(0, 2, b"\xCE\x93", SearchFlags::match_case())
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_dbcs_search_skips_trail_bytes() {
    // Shift-JIS: 0xE9 is a lead byte, so the 0x62 after it is a trail
    // byte, not an ASCII 'b'.
    let mut doc = doc_with(b"ab\xE9b ");
    doc.set_dbcs_code_page(932);
    let hit = doc
        .find_text(0, 5, b"b", SearchFlags::match_case())
        .unwrap()
        .unwrap();
    assert_eq!(hit.position, 1);
    assert!(
        doc.find_text(2, 5, b"b", SearchFlags::match_case())
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_case_insensitive_single_byte_with_custom_folder() {
    // Latin-1-style text with Æ (0xC6) and æ (0xE6).
    let mut doc = doc_with(b"tru\xC6s\xE6t");
    let mut folder = CaseFolderTable::new();
    folder.set_translation(0xC6, 0xE6);
    doc.set_case_folder(Box::new(folder));
    let flags = SearchFlags::default();
    let hit = doc.find_text(0, 7, b"\xC6", flags).unwrap().unwrap();
    assert_eq!(hit.position, 3);
    let hit = doc.find_text(4, 7, b"\xC6", flags).unwrap().unwrap();
    assert_eq!(hit.position, 5);
    let hit = doc.find_text(7, 0, b"\xC6", flags).unwrap().unwrap();
    assert_eq!(hit.position, 5);
}

#[test]
fn test_case_insensitive_utf8() {
    let mut doc = doc_with("N\u{0393}n".as_bytes()); // N, Γ, n
    doc.set_dbcs_code_page(CP_UTF8);
    // γ (U+03B3) folds to the same as Γ.
    let hit = doc
        .find_text(0, doc.len(), "\u{03B3}".as_bytes(), SearchFlags::default())
        .unwrap()
        .unwrap();
    assert_eq!(hit.position, 1);
    assert_eq!(hit.length, 2);
    let hit = doc
        .find_text(0, doc.len(), b"n", SearchFlags::default())
        .unwrap()
        .unwrap();
    assert_eq!(hit.position, 0);
}

#[test]
fn test_whole_word_and_word_start() {
    let mut doc = doc_with(b"cat catalog cat");
    let whole = SearchFlags {
        match_case: true,
        whole_word: true,
        ..SearchFlags::default()
    };
    let hit = doc.find_text(0, 15, b"cat", whole).unwrap().unwrap();
    assert_eq!(hit.position, 0);
    let hit = doc.find_text(1, 15, b"cat", whole).unwrap().unwrap();
    assert_eq!(hit.position, 12);
    let starts = SearchFlags {
        match_case: true,
        word_start: true,
        ..SearchFlags::default()
    };
    let hit = doc.find_text(1, 15, b"cat", starts).unwrap().unwrap();
    assert_eq!(hit.position, 4);
}

#[test]
fn test_regex_anchors_per_line() {
    let mut doc = doc_with(b"one\ntwo\nthree");
    let hit = doc.find_text(0, doc.len(), b"^two", regexp()).unwrap().unwrap();
    assert_eq!(hit.position, 4);
    assert_eq!(hit.length, 4);
    let hit = doc.find_text(0, doc.len(), b"e$", regexp()).unwrap().unwrap();
    assert_eq!(hit.position, 2);
    // `^` cannot match when the search starts mid-line.
    assert!(doc.find_text(5, doc.len(), b"^two", regexp()).unwrap().is_none());
}

#[test]
fn test_regex_backward_finds_last_match() {
    let mut doc = doc_with(b"foo boo\nmoo");
    let hit = doc.find_text(doc.len(), 0, b"oo", regexp()).unwrap().unwrap();
    assert_eq!(hit.position, 9);
    let hit = doc.find_text(7, 0, b"oo", regexp()).unwrap().unwrap();
    assert_eq!(hit.position, 5);
}

#[test]
fn test_regex_classes_and_closures() {
    let mut doc = doc_with(b"item42 item7");
    let hit = doc
        .find_text(0, doc.len(), b"item[0-9]+", regexp())
        .unwrap()
        .unwrap();
    assert_eq!(hit.position, 0);
    assert_eq!(hit.length, 6);
    let hit = doc
        .find_text(5, doc.len(), b"item[0-9]+", regexp())
        .unwrap()
        .unwrap();
    assert_eq!(hit.position, 7);
    assert_eq!(hit.length, 5);
}

#[test]
fn test_regex_substitute_with_groups() {
    let mut doc = doc_with(b"value=123;");
    let hit = doc
        .find_text(0, doc.len(), b"\\([a-z]+\\)=\\([0-9]+\\)", regexp())
        .unwrap()
        .unwrap();
    assert_eq!(hit.position, 0);
    let substituted = doc.substitute_by_position(b"\\2:\\1").unwrap();
    assert_eq!(substituted, b"123:value");
    // Control escapes are interpreted too.
    let substituted = doc.substitute_by_position(b"\\1\\n\\2").unwrap();
    assert_eq!(substituted, b"value\n123");
}

#[test]
fn test_regex_compile_error_reported() {
    let mut doc = doc_with(b"text");
    assert!(doc.find_text(0, 4, b"[unterminated", regexp()).is_err());
    let rust = SearchFlags {
        regexp: true,
        rust_regex: true,
        match_case: true,
        ..SearchFlags::default()
    };
    assert!(doc.find_text(0, 4, b"(unterminated", rust).is_err());
    // The document is untouched either way.
    assert_eq!(doc.text_range(0, doc.len()), "text");
}

#[test]
fn test_rust_regex_engine() {
    let mut doc = doc_with(b"one\ntwo22\nthree");
    let rust = SearchFlags {
        regexp: true,
        rust_regex: true,
        match_case: true,
        ..SearchFlags::default()
    };
    let hit = doc.find_text(0, doc.len(), b"\\w+\\d{2}", rust).unwrap().unwrap();
    assert_eq!(hit.position, 4);
    assert_eq!(hit.length, 5);
    // Backward picks the last occurrence.
    let hit = doc.find_text(doc.len(), 0, b"[a-z]+", rust).unwrap().unwrap();
    assert_eq!(hit.position, 10);
    assert_eq!(hit.length, 5);
    // Captures feed substitution.
    let hit = doc.find_text(0, doc.len(), b"(t\\w+)o", rust).unwrap().unwrap();
    assert_eq!(hit.position, 4);
    let substituted = doc.substitute_by_position(b"<\\1>").unwrap();
    assert_eq!(substituted, b"<tw>");
}

#[test]
fn test_rust_regex_case_insensitive() {
    let mut doc = doc_with(b"Mixed CASE words");
    let rust = SearchFlags {
        regexp: true,
        rust_regex: true,
        match_case: false,
        ..SearchFlags::default()
    };
    let hit = doc.find_text(0, doc.len(), b"case", rust).unwrap().unwrap();
    assert_eq!(hit.position, 6);
}

#[test]
fn test_posix_group_syntax() {
    let mut doc = doc_with(b"key=value");
    let posix = SearchFlags {
        regexp: true,
        posix: true,
        match_case: true,
        ..SearchFlags::default()
    };
    let hit = doc
        .find_text(0, doc.len(), b"([a-z]+)=([a-z]+)", posix)
        .unwrap()
        .unwrap();
    assert_eq!(hit.position, 0);
    let substituted = doc.substitute_by_position(b"\\2=\\1").unwrap();
    assert_eq!(substituted, b"value=key");
}

#[test]
fn test_regex_match_is_clipped_to_range() {
    let mut doc = doc_with(b"aaa bbb");
    // Only the first three bytes are searched.
    let hit = doc.find_text(0, 3, b"a+", regexp()).unwrap().unwrap();
    assert_eq!(hit.position, 0);
    assert_eq!(hit.length, 3);
    assert!(doc.find_text(0, 3, b"b+", regexp()).unwrap().is_none());
}
