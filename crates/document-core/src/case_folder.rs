//! Case folding for case-insensitive search.
//!
//! A folder maps a short run of document bytes to its folded form, possibly
//! growing it (never beyond [`MAX_FOLDING_EXPANSION`] bytes per source
//! character). The search code folds the needle once and then folds one
//! document character at a time.

/// Upper bound on how many output bytes one source character may fold to.
pub const MAX_FOLDING_EXPANSION: usize = 4;

/// Maps text to its case-folded form.
pub trait CaseFolder {
    /// Fold `mixed` into `folded`, returning the number of bytes written,
    /// or 0 when `folded` is too small.
    fn fold(&self, folded: &mut [u8], mixed: &[u8]) -> usize;
}

/// Byte-table folder for single-byte encodings.
///
/// Defaults to ASCII lowercasing; the container supplies the rest of the
/// table for its code page through `set_translation` (for example mapping
/// 0xC6 to 0xE6 for Latin-1 Æ/æ). Double-byte characters pass through this
/// table byte-wise and are unchanged under the default identity mapping,
/// so case-insensitive search matches DBCS characters exactly unless a
/// per-code-page folder is supplied.
pub struct CaseFolderTable {
    mapping: [u8; 256],
}

impl CaseFolderTable {
    pub fn new() -> Self {
        let mut mapping = [0u8; 256];
        for (i, slot) in mapping.iter_mut().enumerate() {
            *slot = i as u8;
        }
        let mut folder = Self { mapping };
        folder.standard_ascii();
        folder
    }

    /// Map upper-case ASCII to lower-case.
    pub fn standard_ascii(&mut self) {
        for ch in b'A'..=b'Z' {
            self.mapping[ch as usize] = ch - b'A' + b'a';
        }
    }

    pub fn set_translation(&mut self, ch: u8, translation: u8) {
        self.mapping[ch as usize] = translation;
    }
}

impl Default for CaseFolderTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CaseFolder for CaseFolderTable {
    fn fold(&self, folded: &mut [u8], mixed: &[u8]) -> usize {
        if folded.len() < mixed.len() {
            return 0;
        }
        for (out, &ch) in folded.iter_mut().zip(mixed.iter()) {
            *out = self.mapping[ch as usize];
        }
        mixed.len()
    }
}

/// Folder for UTF-8 documents: each scalar value is lowercased. Bytes that
/// do not form valid UTF-8 are passed through unchanged so damaged text
/// still round-trips.
pub struct CaseFolderUnicode;

impl CaseFolder for CaseFolderUnicode {
    fn fold(&self, folded: &mut [u8], mixed: &[u8]) -> usize {
        let mut written = 0;
        let mut rest = mixed;
        while !rest.is_empty() {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    for ch in valid.chars() {
                        for low in ch.to_lowercase() {
                            let need = low.len_utf8();
                            if written + need > folded.len() {
                                return 0;
                            }
                            let mut buf = [0u8; 4];
                            let encoded = low.encode_utf8(&mut buf);
                            folded[written..written + need].copy_from_slice(encoded.as_bytes());
                            written += need;
                        }
                    }
                    rest = &[];
                }
                Err(err) => {
                    let valid_up_to = err.valid_up_to();
                    if valid_up_to > 0 {
                        let (valid, after) = rest.split_at(valid_up_to);
                        let n = self.fold(&mut folded[written..], valid);
                        if n == 0 {
                            return 0;
                        }
                        written += n;
                        rest = after;
                    } else {
                        if written + 1 > folded.len() {
                            return 0;
                        }
                        folded[written] = rest[0];
                        written += 1;
                        rest = &rest[1..];
                    }
                }
            }
        }
        written
    }
}
