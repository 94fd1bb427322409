//! Lexer-side helpers for `document-core`.
//!
//! Lexers consume a document through the narrow
//! [`DocumentAccess`](document_core::DocumentAccess) surface. [`LexAccessor`]
//! wraps that surface with buffered reads and buffered style output so a
//! lexer written as a simple forward scan stays fast, and
//! [`PropertiesLexer`] is a small key=value lexer (with section fold
//! headers) that exercises the whole seam end to end.

pub mod lex_accessor;
pub mod props;

pub use lex_accessor::LexAccessor;
pub use props::{PropertiesLexer, style};
