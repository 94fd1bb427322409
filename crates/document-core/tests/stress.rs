//! Randomized consistency check: drive a document with a long random edit
//! sequence and compare it against a naive model after every step.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use document_core::Document;

/// Naive reference: a plain byte vector.
struct Model {
    bytes: Vec<u8>,
}

impl Model {
    fn line_starts(&self) -> Vec<usize> {
        let mut starts = vec![0];
        let mut i = 0;
        while i < self.bytes.len() {
            let ch = self.bytes[i];
            if ch == b'\r' {
                if self.bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                starts.push(i + 1);
            } else if ch == b'\n' {
                starts.push(i + 1);
            }
            i += 1;
        }
        starts
    }
}

fn check_consistent(doc: &Document, model: &Model) {
    assert_eq!(doc.len(), model.bytes.len());
    assert_eq!(
        doc.char_range_vec(0, doc.len()),
        model.bytes,
        "content diverged"
    );
    let starts = model.line_starts();
    assert_eq!(doc.lines_total(), starts.len(), "line count diverged");
    for (line, &start) in starts.iter().enumerate() {
        assert_eq!(doc.line_start(line), start, "start of line {line}");
        if start < model.bytes.len() {
            assert_eq!(doc.line_of_position(start), line);
        }
    }
}

fn random_piece(rng: &mut StdRng) -> Vec<u8> {
    let choices: [&[u8]; 7] = [b"a", b"hello", b"\n", b"\r", b"\r\n", b"x\ny", b"w\r\nz"];
    let len = rng.gen_range(1..=3);
    let mut piece = Vec::new();
    for _ in 0..len {
        piece.extend_from_slice(choices[rng.gen_range(0..choices.len())]);
    }
    piece
}

#[test]
fn test_random_edits_match_model() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let mut doc = Document::new();
    let mut model = Model { bytes: Vec::new() };

    for _ in 0..600 {
        if model.bytes.is_empty() || rng.gen_bool(0.6) {
            let piece = random_piece(&mut rng);
            let pos = rng.gen_range(0..=model.bytes.len());
            doc.insert_string(pos, &piece);
            model.bytes.splice(pos..pos, piece.iter().copied());
        } else {
            let pos = rng.gen_range(0..model.bytes.len());
            let len = rng.gen_range(1..=(model.bytes.len() - pos).min(7));
            doc.delete_chars(pos, len);
            model.bytes.drain(pos..pos + len);
        }
        check_consistent(&doc, &model);
    }
}

#[test]
fn test_random_edits_fully_undoable() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut doc = Document::new();
    doc.insert_string(0, b"seed text\nwith lines\n");
    doc.set_save_point();
    let baseline = doc.char_range_vec(0, doc.len());

    for _ in 0..200 {
        if doc.is_empty() || rng.gen_bool(0.7) {
            let piece = random_piece(&mut rng);
            let pos = rng.gen_range(0..=doc.len());
            doc.insert_string(pos, &piece);
        } else {
            let pos = rng.gen_range(0..doc.len());
            let len = rng.gen_range(1..=(doc.len() - pos).min(5));
            doc.delete_chars(pos, len);
        }
    }

    while !doc.is_save_point() && doc.can_undo() {
        doc.undo();
    }
    assert!(doc.is_save_point());
    assert_eq!(doc.char_range_vec(0, doc.len()), baseline);

    // And replaying everything forward again stays coherent.
    while doc.can_redo() {
        doc.redo();
    }
    assert_eq!(doc.len(), doc.char_range_vec(0, doc.len()).len());
}
