//! The lexer seam.
//!
//! Lexers are capability objects the container attaches to a document. The
//! document drives them through [`Lexer::lex`]/[`Lexer::fold`] when styling
//! is needed, handing over a [`DocumentAccess`] view that exposes reading,
//! style writing and per-line state. Everything beyond `lex`/`fold` has a
//! no-op default so simple lexers stay small.

use crate::line_ending::LineEndTypes;

/// Type of a lexer property, for container UIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    Boolean,
    Integer,
    String,
}

/// The document surface a lexer reads and styles through.
pub trait DocumentAccess {
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn char_at(&self, position: usize) -> u8;
    fn style_at(&self, position: usize) -> u8;
    fn get_char_range(&self, buffer: &mut [u8], position: usize);
    fn line_from_position(&self, position: usize) -> usize;
    fn line_start(&self, line: usize) -> usize;
    fn line_end(&self, line: usize) -> usize;
    fn lines_total(&self) -> usize;
    fn code_page(&self) -> u32;
    fn is_dbcs_lead_byte(&self, ch: u8) -> bool;
    fn get_level(&self, line: usize) -> i32;
    fn set_level(&mut self, line: usize, level: i32) -> i32;
    fn get_line_state(&self, line: usize) -> i32;
    fn set_line_state(&mut self, line: usize, state: i32) -> i32;
    /// Position styling continues from.
    fn end_styled(&self) -> usize;
    fn start_styling(&mut self, position: usize);
    fn set_style_for(&mut self, length: usize, style: u8) -> bool;
    fn set_styles(&mut self, styles: &[u8]) -> bool;
    fn change_lexer_state(&mut self, start: usize, end: usize);
}

/// A lexer. `lex` styles a range; `fold` assigns fold levels to its lines.
pub trait Lexer {
    fn version(&self) -> i32 {
        1
    }

    /// Newline-separated property names this lexer understands.
    fn property_names(&self) -> &str {
        ""
    }

    fn property_type(&self, _name: &str) -> PropertyType {
        PropertyType::Boolean
    }

    fn describe_property(&self, _name: &str) -> &str {
        ""
    }

    /// Set a property. Returns the first line whose styling is affected,
    /// or `None` when nothing needs re-lexing.
    fn property_set(&mut self, _key: &str, _value: &str) -> Option<usize> {
        None
    }

    fn describe_word_list_sets(&self) -> &str {
        ""
    }

    /// Replace keyword list `slot` with the space-joined `words`. Returns
    /// the first line whose styling is affected.
    fn word_list_set(&mut self, _slot: usize, _words: &str) -> Option<usize> {
        None
    }

    fn lex(&mut self, start: usize, length: usize, init_style: u8, doc: &mut dyn DocumentAccess);

    fn fold(&mut self, start: usize, length: usize, init_style: u8, doc: &mut dyn DocumentAccess);

    /// Which optional line-end types this lexer can handle.
    fn line_end_types_supported(&self) -> LineEndTypes {
        LineEndTypes::DEFAULT
    }

    /// Reserve `number_styles` sub-styles for `style_base`, returning the
    /// first allocated sub-style.
    fn allocate_sub_styles(&mut self, _style_base: u8, _number_styles: usize) -> Option<u8> {
        None
    }

    fn sub_styles_start(&self, _style_base: u8) -> Option<u8> {
        None
    }

    fn sub_styles_length(&self, _style_base: u8) -> usize {
        0
    }

    fn style_from_sub_style(&self, sub_style: u8) -> u8 {
        sub_style
    }

    fn primary_style_from_style(&self, style: u8) -> u8 {
        style
    }

    fn free_sub_styles(&mut self) {}

    fn set_identifiers(&mut self, _style: u8, _identifiers: &str) {}

    fn name_of_style(&self, _style: u8) -> &str {
        ""
    }

    fn description_of_style(&self, _style: u8) -> &str {
        ""
    }

    fn tags_of_style(&self, _style: u8) -> &str {
        ""
    }
}

/// Holder pairing the lexer instance with its re-entrance guard. Fold
/// points discovered while styling can make folding code read lines that
/// would trigger styling again; the flag breaks that cycle.
pub struct LexInterface {
    pub instance: Box<dyn Lexer>,
    pub performing_style: bool,
}

impl LexInterface {
    pub fn new(instance: Box<dyn Lexer>) -> Self {
        Self {
            instance,
            performing_style: false,
        }
    }

    pub fn line_end_types_supported(&self) -> LineEndTypes {
        self.instance.line_end_types_supported()
    }
}
