//! A small key=value properties lexer.
//!
//! Lines are classified as comments (`#` or `;`), `[section]` headers, or
//! `key=value` assignments. Section headers become fold headers so a whole
//! section can be contracted; the line state records the 1-based index of
//! the section a line belongs to (0 before the first header).

use document_core::{DocumentAccess, Lexer, PropertyType, fold_level};

use crate::lex_accessor::LexAccessor;

/// Style bytes produced by [`PropertiesLexer`].
pub mod style {
    pub const DEFAULT: u8 = 0;
    pub const COMMENT: u8 = 1;
    pub const SECTION: u8 = 2;
    pub const KEY: u8 = 3;
    pub const ASSIGNMENT: u8 = 4;
    pub const VALUE: u8 = 5;
}

/// Lexer for `.properties`/`.ini`-style files.
pub struct PropertiesLexer {
    fold_enabled: bool,
}

impl PropertiesLexer {
    pub fn new() -> Self {
        Self { fold_enabled: true }
    }

    fn lex_line(styler: &mut LexAccessor<'_>, line_start: usize, line_end: usize) {
        let mut pos = line_start;
        // Leading blanks stay default.
        while pos < line_end && matches!(styler.char_at(pos), b' ' | b'\t') {
            pos += 1;
        }
        if pos > line_start {
            styler.colour_to(pos - 1, style::DEFAULT);
        }
        if pos >= line_end {
            return;
        }
        match styler.char_at(pos) {
            b'#' | b';' => {
                styler.colour_to(line_end - 1, style::COMMENT);
            }
            b'[' => {
                styler.colour_to(line_end - 1, style::SECTION);
            }
            _ => {
                let mut eq = None;
                let mut scan = pos;
                while scan < line_end {
                    if styler.char_at(scan) == b'=' {
                        eq = Some(scan);
                        break;
                    }
                    scan += 1;
                }
                match eq {
                    Some(eq) => {
                        if eq > line_start {
                            styler.colour_to(eq - 1, style::KEY);
                        }
                        styler.colour_to(eq, style::ASSIGNMENT);
                        if eq + 1 < line_end {
                            styler.colour_to(line_end - 1, style::VALUE);
                        }
                    }
                    None => {
                        styler.colour_to(line_end - 1, style::DEFAULT);
                    }
                }
            }
        }
    }

    fn line_is_section(styler: &mut LexAccessor<'_>, line: usize) -> bool {
        let start = styler.line_start(line);
        let end = styler.line_end(line);
        let mut pos = start;
        while pos < end && matches!(styler.char_at(pos), b' ' | b'\t') {
            pos += 1;
        }
        pos < end && styler.char_at(pos) == b'['
    }

    fn line_is_blank(styler: &mut LexAccessor<'_>, line: usize) -> bool {
        let start = styler.line_start(line);
        let end = styler.line_end(line);
        (start..end).all(|pos| matches!(styler.char_at(pos), b' ' | b'\t'))
    }
}

impl Default for PropertiesLexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer for PropertiesLexer {
    fn property_names(&self) -> &str {
        "fold"
    }

    fn property_type(&self, _name: &str) -> PropertyType {
        PropertyType::Boolean
    }

    fn describe_property(&self, name: &str) -> &str {
        if name == "fold" {
            "Assign fold levels to section headers."
        } else {
            ""
        }
    }

    fn property_set(&mut self, key: &str, value: &str) -> Option<usize> {
        if key == "fold" {
            let enabled = value != "0";
            if enabled != self.fold_enabled {
                self.fold_enabled = enabled;
                return Some(0);
            }
        }
        None
    }

    fn lex(&mut self, start: usize, length: usize, _init_style: u8, doc: &mut dyn DocumentAccess) {
        let mut styler = LexAccessor::new(doc);
        let first_line = styler.line_from_position(start);
        let last_pos = start + length;
        let last_line = styler.line_from_position(last_pos.saturating_sub(1).max(start));
        let mut section = 0;
        // Line state carries the section index so a partial re-lex can
        // resume without rescanning from the top.
        if first_line > 0 {
            section = styler.line_state(first_line - 1).max(0);
        }
        styler.start_at(styler.line_start(first_line));
        styler.start_segment(styler.line_start(first_line));
        for line in first_line..=last_line {
            let line_start = styler.line_start(line);
            let line_end_with_terminator = if line + 1 < styler.lines_total() {
                styler.line_start(line + 1)
            } else {
                styler.length()
            };
            if line_end_with_terminator > line_start {
                if Self::line_is_section(&mut styler, line) {
                    section += 1;
                }
                Self::lex_line(&mut styler, line_start, line_end_with_terminator);
            }
            styler.set_line_state(line, section);
        }
        styler.flush();
    }

    fn fold(&mut self, start: usize, length: usize, _init_style: u8, doc: &mut dyn DocumentAccess) {
        if !self.fold_enabled {
            return;
        }
        let mut styler = LexAccessor::new(doc);
        let first_line = styler.line_from_position(start);
        let last_pos = start + length;
        let last_line = styler.line_from_position(last_pos.saturating_sub(1).max(start));
        // A line before the first section stays at the base level; lines
        // after a section header sit one level in.
        let mut in_section = if first_line > 0 {
            styler.line_state(first_line - 1) > 0
        } else {
            false
        };
        for line in first_line..=last_line {
            let level = if Self::line_is_section(&mut styler, line) {
                in_section = true;
                fold_level::BASE | fold_level::HEADER_FLAG
            } else if in_section {
                let mut level = fold_level::BASE + 1;
                if Self::line_is_blank(&mut styler, line) {
                    level |= fold_level::WHITE_FLAG;
                }
                level
            } else {
                fold_level::BASE
            };
            styler.set_level(line, level);
        }
    }
}
