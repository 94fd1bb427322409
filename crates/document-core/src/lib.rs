//! document-core - Headless Source-Code Document Engine
//!
//! # Overview
//!
//! `document-core` is the document kernel of a source-code editor: the text
//! buffer, its line index, the per-byte style overlay, per-line data
//! (markers, fold levels, annotations), indicators, an undo history with
//! coalescing and save points, character-boundary arithmetic for UTF-8 and
//! the double-byte code pages, and literal plus regular-expression search.
//! It does no rendering and owns no caret: a view layer drives it through
//! the [`Document`] API and listens to its modification notifications.
//!
//! # Core Features
//!
//! - **Gap-buffered storage**: amortised O(1) edits near the edit point
//! - **Line index**: O(log n) position ↔ line mapping with cached edits
//! - **Undo history**: coalescing, grouping, save point, tentative mode
//! - **Per-line data**: markers, fold levels, line state, annotations
//! - **Indicators**: run-length value maps orthogonal to styling
//! - **Folding support**: document ↔ display line mapping
//! - **Search**: literal (case-folded per encoding) and two regex engines
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Document (API, notifications, encodings)   │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Search (literal, basic regex, regex crate) │  ← Find/replace
//! ├─────────────────────────────────────────────┤
//! │  CellBuffer (text+styles, undo, line index) │  ← Mutation engine
//! ├─────────────────────────────────────────────┤
//! │  RunStyles / SparseVector / PerLine         │  ← Derived maps
//! ├─────────────────────────────────────────────┤
//! │  Partitioning (stepped position table)      │  ← Position math
//! ├─────────────────────────────────────────────┤
//! │  SplitVector (gap buffer)                   │  ← Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use document_core::{Document, SearchFlags};
//!
//! let mut doc = Document::new();
//! doc.insert_string(0, b"fn main() {\n    println!(\"Hello\");\n}\n");
//! assert_eq!(doc.lines_total(), 4);
//! assert_eq!(doc.line_start(1), 12);
//!
//! let hit = doc
//!     .find_text(0, doc.len(), b"Hello", SearchFlags::match_case())
//!     .unwrap()
//!     .expect("present");
//! assert_eq!(doc.line_of_position(hit.position), 1);
//!
//! doc.undo();
//! assert!(doc.is_empty());
//! ```
//!
//! # Module Description
//!
//! - [`split_vector`] - gap-buffered storage primitive
//! - [`partitioning`] - ordered position table with cached edits
//! - [`run_styles`] - run-length value maps
//! - [`sparse_vector`] - sparse point-value maps
//! - [`line_index`] - line → position table plus per-line observers
//! - [`undo_history`] - the coalescing action log
//! - [`per_line`] - markers, levels, line state, annotations
//! - [`cell_buffer`] - text and styles with line maintenance
//! - [`decorations`] - indicator storage
//! - [`contraction_state`] - folding/wrapping visibility mapping
//! - [`utf8`], [`char_classify`], [`case_folder`] - encoding helpers
//! - [`re_search`], [`search`] - the regular-expression engines
//! - [`lexer`] - the lexer seam ([`Lexer`], [`DocumentAccess`])
//! - [`modification`] - notification payloads and [`DocWatcher`]
//! - [`document`] - the composition root

pub mod case_folder;
pub mod cell_buffer;
pub mod char_classify;
pub mod contraction_state;
pub mod decorations;
pub mod document;
pub mod fold_level;
pub mod lexer;
pub mod line_ending;
pub mod line_index;
pub mod modification;
pub mod partitioning;
pub mod per_line;
pub mod re_search;
pub mod run_styles;
pub mod search;
pub mod sparse_vector;
pub mod split_vector;
pub mod undo_history;
pub mod utf8;

pub use case_folder::{CaseFolder, CaseFolderTable, CaseFolderUnicode, MAX_FOLDING_EXPANSION};
pub use cell_buffer::{CellBuffer, UndoStep};
pub use char_classify::{CharClass, CharClassify};
pub use contraction_state::ContractionState;
pub use decorations::{Decoration, DecorationList};
pub use document::{
    CP_UTF8, CharacterExtracted, Document, EncodingFamily, HighlightDelimiter, UndoGroup,
};
pub use lexer::{DocumentAccess, LexInterface, Lexer, PropertyType};
pub use line_ending::{EolMode, LineEndTypes};
pub use line_index::LineVector;
pub use modification::{DocModification, DocWatcher, ModificationFlags, Status};
pub use partitioning::Partitioning;
pub use per_line::{
    AnnotationStyle, AnnotationText, LineAnnotation, LineLevels, LineMarkers, LineState,
    MarkerHandleNumber, MarkerHandleSet, PerLine, PerLineData,
};
pub use re_search::{CharacterIndexer, CompileError, ReSearch, Span};
pub use run_styles::{FillResult, RunStyles};
pub use search::{Match, RegexError, RegexSearcher, SearchFlags};
pub use sparse_vector::SparseVector;
pub use split_vector::SplitVector;
pub use undo_history::{ActionKind, UndoAction, UndoHistory};
