//! Regular-expression search over a document.
//!
//! Two engines sit behind one front end: the built-in basic/POSIX engine
//! from [`re_search`](crate::re_search), and the `regex` crate selected by
//! [`SearchFlags::rust_regex`]. Both are driven line by line so `^` and `$`
//! keep their line-boundary meaning, forward or backward; a backward search
//! scans each line forward and keeps the last match. Capture texts are
//! retained for `substitute_by_position`.

use regex::bytes::RegexBuilder;
use thiserror::Error;

use crate::document::Document;
use crate::re_search::{CharacterIndexer, MAX_TAG, ReSearch, Span};

/// Options controlling a search. Callers usually start from
/// [`Default::default`] and switch on the flags they need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchFlags {
    /// Compare exactly rather than case-folded.
    pub match_case: bool,
    /// Both match ends must lie on word boundaries.
    pub whole_word: bool,
    /// The match start must lie on a word boundary.
    pub word_start: bool,
    /// Treat the needle as a regular expression.
    pub regexp: bool,
    /// With `regexp`: plain parentheses group (POSIX syntax).
    pub posix: bool,
    /// With `regexp`: use the bundled `regex` crate engine instead of the
    /// built-in basic engine.
    pub rust_regex: bool,
}

impl SearchFlags {
    pub fn match_case() -> Self {
        Self {
            match_case: true,
            ..Self::default()
        }
    }
}

/// A successful search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub position: usize,
    pub length: usize,
}

/// Pattern-compile failure. The document is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegexError {
    #[error("invalid regular expression: {0}")]
    Invalid(String),
}

/// Byte access over a document, bounded at `end` like the line being
/// searched.
pub(crate) struct DocumentIndexer<'a> {
    doc: &'a Document,
    end: usize,
}

impl<'a> DocumentIndexer<'a> {
    pub(crate) fn new(doc: &'a Document, end: usize) -> Self {
        Self { doc, end }
    }
}

impl CharacterIndexer for DocumentIndexer<'_> {
    fn char_at(&self, index: usize) -> u8 {
        if index >= self.end {
            0
        } else {
            self.doc.char_at(index)
        }
    }
}

/// The search range normalised into lines. Direction is backward when
/// `min_pos > max_pos`.
pub(crate) struct SearchRange {
    pub increment: isize,
    pub start_pos: usize,
    pub end_pos: usize,
    pub line_range_start: isize,
    pub line_range_end: isize,
    pub line_range_break: isize,
}

impl SearchRange {
    pub(crate) fn new(doc: &Document, min_pos: usize, max_pos: usize) -> Self {
        let increment: isize = if min_pos <= max_pos { 1 } else { -1 };

        // Range endpoints should not be inside multi-byte characters, but
        // just in case, move them.
        let start_pos = doc.move_position_outside_char(min_pos, 1, false);
        let end_pos = doc.move_position_outside_char(max_pos, 1, false);

        let mut line_range_start = doc.line_of_position(start_pos) as isize;
        let line_range_end = doc.line_of_position(end_pos) as isize;
        let mut start_pos = start_pos;
        if increment == 1
            && start_pos >= doc.line_end(line_range_start as usize)
            && line_range_start < line_range_end
        {
            // The start position is at the end of a line or between line
            // end characters.
            line_range_start += 1;
            start_pos = doc.line_start(line_range_start as usize);
        } else if increment == -1
            && start_pos <= doc.line_start(line_range_start as usize)
            && line_range_start > line_range_end
        {
            // The start position is at the beginning of a line.
            line_range_start -= 1;
            start_pos = doc.line_end(line_range_start as usize);
        }
        Self {
            increment,
            start_pos,
            end_pos,
            line_range_start,
            line_range_end,
            line_range_break: line_range_end + increment,
        }
    }
}

/// The regex front end owned by a document: compiled state plus the
/// captures of the last match.
pub struct RegexSearcher {
    search: ReSearch,
    substituted: Vec<u8>,
}

impl RegexSearcher {
    pub fn new() -> Self {
        Self {
            search: ReSearch::new(),
            substituted: Vec::new(),
        }
    }

    /// Find `pattern` in `[min_pos, max_pos)` (backward when reversed).
    pub fn find_text(
        &mut self,
        doc: &Document,
        min_pos: usize,
        max_pos: usize,
        pattern: &[u8],
        flags: SearchFlags,
    ) -> Result<Option<Match>, RegexError> {
        if flags.rust_regex {
            self.find_text_rust(doc, min_pos, max_pos, pattern, flags)
        } else {
            self.find_text_builtin(doc, min_pos, max_pos, pattern, flags)
        }
    }

    fn find_text_builtin(
        &mut self,
        doc: &Document,
        min_pos: usize,
        max_pos: usize,
        pattern: &[u8],
        flags: SearchFlags,
    ) -> Result<Option<Match>, RegexError> {
        let resr = SearchRange::new(doc, min_pos, max_pos);
        self.search
            .compile(pattern, flags.match_case, flags.posix)
            .map_err(|e| RegexError::Invalid(e.to_string()))?;

        let search_end = *pattern.last().unwrap_or(&0);
        let search_end_prev = if pattern.len() > 1 {
            pattern[pattern.len() - 2]
        } else {
            0
        };
        let mut found: Option<Match> = None;
        let mut line = resr.line_range_start;
        while line != resr.line_range_break {
            let mut start_of_line = doc.line_start(line as usize);
            let mut end_of_line = doc.line_end(line as usize);
            if resr.increment == 1 {
                if line == resr.line_range_start {
                    if resr.start_pos != start_of_line && pattern[0] == b'^' {
                        // Can't match start of line if the search begins
                        // after it.
                        line += resr.increment;
                        continue;
                    }
                    start_of_line = resr.start_pos;
                }
                if line == resr.line_range_end {
                    if resr.end_pos != end_of_line && search_end == b'$' && search_end_prev != b'\\'
                    {
                        line += resr.increment;
                        continue;
                    }
                    end_of_line = resr.end_pos;
                }
            } else {
                if line == resr.line_range_end {
                    if resr.end_pos != start_of_line && pattern[0] == b'^' {
                        line += resr.increment;
                        continue;
                    }
                    start_of_line = resr.end_pos;
                }
                if line == resr.line_range_start {
                    if resr.start_pos != end_of_line && search_end == b'$' && search_end_prev != b'\\'
                    {
                        line += resr.increment;
                        continue;
                    }
                    end_of_line = resr.start_pos;
                }
            }

            let di = DocumentIndexer::new(doc, end_of_line);
            let mut success = self
                .search
                .execute(&di, start_of_line, end_of_line, doc.char_class());
            if success {
                let span = self.search.groups[0].expect("match without span");
                // Ensure only whole characters are selected.
                let end_whole = doc.move_position_outside_char(span.end, 1, false);
                let mut pos = span.start;
                let mut len_ret = end_whole - span.start;
                if resr.increment == -1 && pattern[0] != b'^' {
                    // Find the last match on this line.
                    let mut repetitions = 1000;
                    let mut search_from = pos + 1;
                    while success && repetitions > 0 {
                        repetitions -= 1;
                        success = self
                            .search
                            .execute(&di, search_from, end_of_line, doc.char_class());
                        if success {
                            let next = self.search.groups[0].expect("match without span");
                            if next.end <= min_pos && next.end > next.start {
                                pos = next.start;
                                len_ret = doc.move_position_outside_char(next.end, 1, false)
                                    - next.start;
                                search_from = pos + 1;
                            } else {
                                success = false;
                            }
                        }
                    }
                    // Re-run from the kept position so the captures match
                    // the reported span.
                    self.search
                        .execute(&di, pos, end_of_line, doc.char_class());
                }
                found = Some(Match {
                    position: pos,
                    length: len_ret,
                });
                break;
            }
            line += resr.increment;
        }
        Ok(found)
    }

    fn find_text_rust(
        &mut self,
        doc: &Document,
        min_pos: usize,
        max_pos: usize,
        pattern: &[u8],
        flags: SearchFlags,
    ) -> Result<Option<Match>, RegexError> {
        let pattern_str = std::str::from_utf8(pattern)
            .map_err(|_| RegexError::Invalid("pattern is not valid UTF-8".to_string()))?;
        let re = RegexBuilder::new(pattern_str)
            .case_insensitive(!flags.match_case)
            .multi_line(false)
            .build()
            .map_err(|e| RegexError::Invalid(e.to_string()))?;

        let resr = SearchRange::new(doc, min_pos, max_pos);
        self.search.clear();
        let search_end = *pattern.last().unwrap_or(&0);
        let search_end_prev = if pattern.len() > 1 {
            pattern[pattern.len() - 2]
        } else {
            0
        };
        let mut found: Option<Match> = None;
        let mut line = resr.line_range_start;
        while line != resr.line_range_break {
            let mut start_of_line = doc.line_start(line as usize);
            let mut end_of_line = doc.line_end(line as usize);
            if resr.increment == 1 {
                if line == resr.line_range_start {
                    if resr.start_pos != start_of_line && pattern[0] == b'^' {
                        line += resr.increment;
                        continue;
                    }
                    start_of_line = resr.start_pos;
                }
                if line == resr.line_range_end {
                    if resr.end_pos != end_of_line && search_end == b'$' && search_end_prev != b'\\'
                    {
                        line += resr.increment;
                        continue;
                    }
                    end_of_line = resr.end_pos;
                }
            } else {
                if line == resr.line_range_end {
                    if resr.end_pos != start_of_line && pattern[0] == b'^' {
                        line += resr.increment;
                        continue;
                    }
                    start_of_line = resr.end_pos;
                }
                if line == resr.line_range_start {
                    if resr.start_pos != end_of_line && search_end == b'$' && search_end_prev != b'\\'
                    {
                        line += resr.increment;
                        continue;
                    }
                    end_of_line = resr.start_pos;
                }
            }

            let line_bytes = doc.char_range_vec(start_of_line, end_of_line - start_of_line);
            let mut chosen: Option<regex::bytes::Captures> = None;
            if resr.increment == 1 {
                chosen = re.captures(&line_bytes);
            } else {
                // Keep the last match on the line.
                for caps in re.captures_iter(&line_bytes) {
                    let whole = caps.get(0).expect("group 0 always present");
                    if whole.start() == whole.end() {
                        continue;
                    }
                    chosen = Some(caps);
                }
            }
            if let Some(caps) = chosen {
                for slot in 0..MAX_TAG {
                    match caps.get(slot) {
                        Some(group) => {
                            let span = Span {
                                start: start_of_line + group.start(),
                                end: start_of_line + group.end(),
                            };
                            self.search.groups[slot] = Some(span);
                            self.search.pat[slot] = group.as_bytes().to_vec();
                        }
                        None => {
                            self.search.groups[slot] = None;
                            self.search.pat[slot].clear();
                        }
                    }
                }
                let whole = self.search.groups[0].expect("group 0 always present");
                let end_whole = doc.move_position_outside_char(whole.end, 1, false);
                found = Some(Match {
                    position: whole.start,
                    length: end_whole - whole.start,
                });
                break;
            }
            line += resr.increment;
        }
        Ok(found)
    }

    /// Build the replacement for `text`, interpreting `\0`–`\9` as the
    /// captures of the last match and the usual control escapes. Returns
    /// `None` when no match has been performed.
    pub fn substitute_by_position(&mut self, doc: &Document, text: &[u8]) -> Option<&[u8]> {
        self.search.groups[0]?;
        let di = DocumentIndexer::new(doc, doc.len());
        self.search.grab_matches(&di);
        self.substituted.clear();
        let mut j = 0;
        while j < text.len() {
            if text[j] == b'\\' && j + 1 < text.len() {
                let esc = text[j + 1];
                if esc.is_ascii_digit() {
                    let pat_num = (esc - b'0') as usize;
                    self.substituted.extend_from_slice(&self.search.pat[pat_num]);
                    j += 1;
                } else {
                    j += 1;
                    match esc {
                        b'a' => self.substituted.push(0x07),
                        b'b' => self.substituted.push(0x08),
                        b'f' => self.substituted.push(0x0C),
                        b'n' => self.substituted.push(b'\n'),
                        b'r' => self.substituted.push(b'\r'),
                        b't' => self.substituted.push(b'\t'),
                        b'v' => self.substituted.push(0x0B),
                        b'\\' => self.substituted.push(b'\\'),
                        _ => {
                            self.substituted.push(b'\\');
                            j -= 1;
                        }
                    }
                }
            } else {
                self.substituted.push(text[j]);
            }
            j += 1;
        }
        Some(&self.substituted)
    }
}

impl Default for RegexSearcher {
    fn default() -> Self {
        Self::new()
    }
}
