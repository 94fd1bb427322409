//! Find/replace: literal search, the built-in regex engine and group
//! substitution.

use document_core::{Document, SearchFlags};

fn main() {
    let mut doc = Document::new();
    doc.insert_string(0, b"name=alpha\nname=beta\nvalue=42\n");

    // Literal, case sensitive.
    let hit = doc
        .find_text(0, doc.len(), b"beta", SearchFlags::match_case())
        .unwrap()
        .expect("literal hit");
    println!("literal 'beta' at {} (line {})", hit.position, doc.line_of_position(hit.position));

    // Regex with groups, then substitute.
    let flags = SearchFlags {
        regexp: true,
        match_case: true,
        ..SearchFlags::default()
    };
    let hit = doc
        .find_text(0, doc.len(), b"^\\([a-z]+\\)=\\([a-z0-9]+\\)", flags)
        .unwrap()
        .expect("regex hit");
    let replacement = doc.substitute_by_position(b"\\2:\\1").expect("captures");
    println!(
        "regex matched {:?}, substitution gives {:?}",
        doc.text_range(hit.position, hit.position + hit.length),
        String::from_utf8_lossy(&replacement)
    );

    // Backward search finds the last occurrence.
    let hit = doc
        .find_text(doc.len(), 0, b"name", SearchFlags::match_case())
        .unwrap()
        .expect("backward hit");
    println!("backward 'name' at line {}", doc.line_of_position(hit.position));
}
