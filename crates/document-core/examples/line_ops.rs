//! Line-level operations: load a small buffer, inspect the line index,
//! edit in the middle and undo.

use document_core::Document;

fn main() {
    let mut doc = Document::new();
    doc.insert_string(0, b"fn demo() {\n    let x = 1;\n    let y = 2;\n}\n");

    println!("{} bytes over {} lines", doc.len(), doc.lines_total());
    for line in 0..doc.lines_total() {
        let start = doc.line_start(line);
        let end = doc.line_end(line);
        println!("  line {line}: [{start:2}, {end:2}) {:?}", doc.text_range(start, end));
    }

    // Insert a statement in the middle.
    let insert_at = doc.line_start(2);
    doc.insert_string(insert_at, b"    let mid = x;\n");
    println!(
        "after insert: {} lines, line 2 = {:?}",
        doc.lines_total(),
        doc.text_range(doc.line_start(2), doc.line_end(2))
    );

    doc.undo();
    println!("after undo:   {} lines", doc.lines_total());
}
