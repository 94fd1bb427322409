//! Line-end modes and terminator sets.
//!
//! The buffer accepts any terminator at any time; [`EolMode`] only controls
//! what conversions and new insertions produce. The Unicode separators
//! (U+2028, U+2029, U+0085) are recognised only in UTF-8 documents and only
//! when enabled through [`LineEndTypes`].

/// The terminator written by line-end conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EolMode {
    /// Windows-style CRLF (`"\r\n"`).
    CrLf,
    /// Classic-Mac-style CR (`'\r'`).
    Cr,
    /// Unix-style LF (`'\n'`).
    Lf,
}

impl EolMode {
    /// The terminator bytes for this mode.
    pub fn bytes(self) -> &'static [u8] {
        match self {
            EolMode::CrLf => b"\r\n",
            EolMode::Cr => b"\r",
            EolMode::Lf => b"\n",
        }
    }
}

/// Bit set of optional line-end types beyond CR/LF/CRLF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineEndTypes(pub u8);

impl LineEndTypes {
    /// Only CR, LF and CRLF are recognised.
    pub const DEFAULT: LineEndTypes = LineEndTypes(0);
    /// Also recognise U+2028 LINE SEPARATOR, U+2029 PARAGRAPH SEPARATOR and
    /// U+0085 NEXT LINE. UTF-8 documents only.
    pub const UNICODE: LineEndTypes = LineEndTypes(1);

    /// Intersection, used to mask the allowed set with what a lexer
    /// supports.
    pub fn intersect(self, other: LineEndTypes) -> LineEndTypes {
        LineEndTypes(self.0 & other.0)
    }

    pub fn contains(self, other: LineEndTypes) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_default(self) -> bool {
        self.0 == 0
    }
}

/// Whether `ch` is one of the one-byte terminators.
pub fn is_eol_byte(ch: u8) -> bool {
    ch == b'\r' || ch == b'\n'
}
