//! Code tables for the compiled grammar table format
//!
//! The CGT/EGT binary format and the tables it carries use small closed sets
//! of integer codes: record kinds, entry kinds, symbol kinds, group advance
//! and ending modes, LR action kinds and conflict kinds. Each set maps to a
//! tagged enum here with a total, never-panicking `from_code` that decodes
//! unknown codes to an explicit `Undefined` variant instead of failing, plus
//! a `code()` back-mapping for the known variants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a record in the binary table stream
///
/// The wire value of each kind is the ASCII code of its tag character
/// (e.g. `'S'` for symbols). `Parameter`, `Charset` and `Counts` belong to
/// the v1 (CGT) variant; `Property`, `CharRanges`, `Counts5`, `Group` and
/// `GroupNesting` to the v5 (EGT) variant. The reader accepts all of them
/// regardless of the signature version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// `'I'` - initial DFA and LALR state indices
    InitialStates,
    /// `'S'` - one symbol table entry
    Symbol,
    /// `'R'` - one rule (production)
    Rule,
    /// `'D'` - one DFA state with its edges
    DfaState,
    /// `'L'` - one LALR state with its actions
    LrState,
    /// `'P'` - grammar parameters (v1)
    Parameter,
    /// `'p'` - one grammar property key/value pair (v5)
    Property,
    /// `'C'` - character set as an explicit character list (v1)
    Charset,
    /// `'c'` - character set as code-point ranges (v5)
    CharRanges,
    /// `'g'` - one lexical group (v5)
    Group,
    /// `'n'` - additional nesting edges for a group (v5)
    GroupNesting,
    /// `'T'` - table size counts (v1)
    Counts,
    /// `'t'` - table size counts including groups (v5)
    Counts5,
    /// Any unrecognized kind byte; the record is still consumed
    Undefined,
}

impl RecordKind {
    /// Decode a record kind byte; unknown bytes map to `Undefined`.
    #[inline]
    pub fn from_code(code: u8) -> Self {
        match code {
            b'I' => Self::InitialStates,
            b'S' => Self::Symbol,
            b'R' => Self::Rule,
            b'D' => Self::DfaState,
            b'L' => Self::LrState,
            b'P' => Self::Parameter,
            b'p' => Self::Property,
            b'C' => Self::Charset,
            b'c' => Self::CharRanges,
            b'g' => Self::Group,
            b'n' => Self::GroupNesting,
            b'T' => Self::Counts,
            b't' => Self::Counts5,
            _ => Self::Undefined,
        }
    }

    /// The wire byte for this kind, or `None` for `Undefined`.
    #[inline]
    pub fn code(self) -> Option<u8> {
        match self {
            Self::InitialStates => Some(b'I'),
            Self::Symbol => Some(b'S'),
            Self::Rule => Some(b'R'),
            Self::DfaState => Some(b'D'),
            Self::LrState => Some(b'L'),
            Self::Parameter => Some(b'P'),
            Self::Property => Some(b'p'),
            Self::Charset => Some(b'C'),
            Self::CharRanges => Some(b'c'),
            Self::Group => Some(b'g'),
            Self::GroupNesting => Some(b'n'),
            Self::Counts => Some(b'T'),
            Self::Counts5 => Some(b't'),
            Self::Undefined => None,
        }
    }
}

/// Kind of a typed entry inside a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// `'B'` - single byte, 0 or 1
    Boolean,
    /// `'E'` - no payload
    Empty,
    /// `'I'` - 16-bit unsigned integer, little-endian
    Uint16,
    /// `'S'` - UTF-16LE code units up to a zero unit
    String,
    /// `'b'` - single raw byte
    Byte,
    /// Reserved error marker
    Error,
    /// Any unrecognized type byte; decoding the record fails
    Undefined,
}

impl EntryKind {
    /// Decode an entry type byte; unknown bytes map to `Undefined`.
    #[inline]
    pub fn from_code(code: u8) -> Self {
        match code {
            b'B' => Self::Boolean,
            b'E' => Self::Empty,
            b'I' => Self::Uint16,
            b'S' => Self::String,
            b'b' => Self::Byte,
            _ => Self::Undefined,
        }
    }

    /// The wire byte for this kind, or `None` for `Error`/`Undefined`.
    #[inline]
    pub fn code(self) -> Option<u8> {
        match self {
            Self::Boolean => Some(b'B'),
            Self::Empty => Some(b'E'),
            Self::Uint16 => Some(b'I'),
            Self::String => Some(b'S'),
            Self::Byte => Some(b'b'),
            Self::Error | Self::Undefined => None,
        }
    }
}

/// Classification of a grammar symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    /// Nonterminal, produced by reductions (code 0)
    Nonterminal,
    /// Terminal carrying content (code 1)
    Content,
    /// Terminal the parser discards, e.g. whitespace (code 2)
    Noise,
    /// End-of-input marker (code 3)
    End,
    /// Opens a lexical group (code 4)
    GroupStart,
    /// Closes a lexical group (code 5)
    GroupEnd,
    /// Deprecated single-line comment marker (code 6); treated as an
    /// OPEN, token-advance group with an implicit end-of-line terminator
    CommentLine,
    /// Error terminal (code 7)
    Error,
    /// Any unrecognized code
    Undefined,
}

impl SymbolKind {
    /// Decode a symbol kind code; unknown codes map to `Undefined`.
    #[inline]
    pub fn from_code(code: u16) -> Self {
        match code {
            0 => Self::Nonterminal,
            1 => Self::Content,
            2 => Self::Noise,
            3 => Self::End,
            4 => Self::GroupStart,
            5 => Self::GroupEnd,
            6 => Self::CommentLine,
            7 => Self::Error,
            _ => Self::Undefined,
        }
    }

    /// The wire code for this kind, or `None` for `Undefined`.
    #[inline]
    pub fn code(self) -> Option<u16> {
        match self {
            Self::Nonterminal => Some(0),
            Self::Content => Some(1),
            Self::Noise => Some(2),
            Self::End => Some(3),
            Self::GroupStart => Some(4),
            Self::GroupEnd => Some(5),
            Self::CommentLine => Some(6),
            Self::Error => Some(7),
            Self::Undefined => None,
        }
    }

    /// Whether tokens of this kind are produced but never shifted.
    #[inline]
    pub fn is_noise(self) -> bool {
        matches!(self, Self::Noise | Self::CommentLine)
    }
}

/// How a lexical group consumes its content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdvanceMode {
    /// Whole matched tokens advance the cursor (code 0)
    Token,
    /// One character at a time (code 1)
    Character,
    /// Any unrecognized code
    Undefined,
}

impl AdvanceMode {
    /// Decode an advance mode code; unknown codes map to `Undefined`.
    #[inline]
    pub fn from_code(code: u16) -> Self {
        match code {
            0 => Self::Token,
            1 => Self::Character,
            _ => Self::Undefined,
        }
    }

    /// The wire code for this mode, or `None` for `Undefined`.
    #[inline]
    pub fn code(self) -> Option<u16> {
        match self {
            Self::Token => Some(0),
            Self::Character => Some(1),
            Self::Undefined => None,
        }
    }
}

/// How a lexical group may end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndingMode {
    /// Newline or end of input legitimately ends the group (code 0)
    Open,
    /// The explicit end symbol is required (code 1)
    Closed,
    /// Any unrecognized code
    Undefined,
}

impl EndingMode {
    /// Decode an ending mode code; unknown codes map to `Undefined`.
    #[inline]
    pub fn from_code(code: u16) -> Self {
        match code {
            0 => Self::Open,
            1 => Self::Closed,
            _ => Self::Undefined,
        }
    }

    /// The wire code for this mode, or `None` for `Undefined`.
    #[inline]
    pub fn code(self) -> Option<u16> {
        match self {
            Self::Open => Some(0),
            Self::Closed => Some(1),
            Self::Undefined => None,
        }
    }
}

/// Kind of an LALR action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Push the lookahead and move to the target state (code 1)
    Shift,
    /// Reduce by the referenced rule (code 2)
    Reduce,
    /// Transition after a reduction on a nonterminal (code 3)
    Goto,
    /// Parse completed successfully (code 4)
    Accept,
    /// Any unrecognized code
    Undefined,
}

impl ActionKind {
    /// Decode an action kind code; unknown codes map to `Undefined`.
    #[inline]
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::Shift,
            2 => Self::Reduce,
            3 => Self::Goto,
            4 => Self::Accept,
            _ => Self::Undefined,
        }
    }

    /// The wire code for this kind, or `None` for `Undefined`.
    #[inline]
    pub fn code(self) -> Option<u16> {
        match self {
            Self::Shift => Some(1),
            Self::Reduce => Some(2),
            Self::Goto => Some(3),
            Self::Accept => Some(4),
            Self::Undefined => None,
        }
    }
}

/// Kind of a table-generation conflict
///
/// Conflicts are resolved when the tables are generated; the engine never
/// encounters one at runtime. The code table is carried for diagnostics on
/// tables that record their provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictKind {
    /// Two shifts competed (code 1)
    ShiftShift,
    /// A shift competed with a reduce (code 2)
    ShiftReduce,
    /// Two reduces competed (code 3)
    ReduceReduce,
    /// An accept competed with a reduce (code 4)
    AcceptReduce,
    /// No conflict (code 5)
    None,
    /// Any unrecognized code
    Undefined,
}

impl ConflictKind {
    /// Decode a conflict kind code; unknown codes map to `Undefined`.
    #[inline]
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::ShiftShift,
            2 => Self::ShiftReduce,
            3 => Self::ReduceReduce,
            4 => Self::AcceptReduce,
            5 => Self::None,
            _ => Self::Undefined,
        }
    }

    /// The wire code for this kind, or `None` for `Undefined`.
    #[inline]
    pub fn code(self) -> Option<u16> {
        match self {
            Self::ShiftShift => Some(1),
            Self::ShiftReduce => Some(2),
            Self::ReduceReduce => Some(3),
            Self::AcceptReduce => Some(4),
            Self::None => Some(5),
            Self::Undefined => None,
        }
    }
}

/// Outcome of one parser session step
///
/// `Accept` and the error messages are terminal for the session;
/// `TokenRead` and `Reduction` mean the session can be stepped again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseMessage {
    /// A token was read and shifted
    TokenRead,
    /// A reduction was performed
    Reduction,
    /// The input was accepted; the parse tree is available
    Accept,
    /// The session's model has no tables loaded
    NotLoadedError,
    /// The tokenizer could not recognize a token
    LexicalError,
    /// No action is defined for the current state and lookahead
    SyntaxError,
    /// A lexical group was left unterminated at end of input
    GroupError,
    /// A built-table invariant was violated; fatal to the session
    InternalError,
}

impl ParseMessage {
    /// Whether this message reports an error condition.
    #[inline]
    pub fn is_error(self) -> bool {
        matches!(
            self,
            Self::NotLoadedError
                | Self::LexicalError
                | Self::SyntaxError
                | Self::GroupError
                | Self::InternalError
        )
    }

    /// Whether the session can be stepped again after this message.
    #[inline]
    pub fn is_continuable(self) -> bool {
        matches!(self, Self::TokenRead | Self::Reduction)
    }
}

impl fmt::Display for ParseMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::TokenRead => "token read",
            Self::Reduction => "reduction",
            Self::Accept => "accept",
            Self::NotLoadedError => "tables not loaded",
            Self::LexicalError => "lexical error",
            Self::SyntaxError => "syntax error",
            Self::GroupError => "group error",
            Self::InternalError => "internal error",
        };
        write!(f, "{}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_kind_roundtrip() {
        for code in 0u8..=255 {
            let kind = RecordKind::from_code(code);
            if let Some(back) = kind.code() {
                assert_eq!(back, code);
            }
        }
    }

    #[test]
    fn test_record_kind_values() {
        assert_eq!(RecordKind::from_code(73), RecordKind::InitialStates);
        assert_eq!(RecordKind::from_code(83), RecordKind::Symbol);
        assert_eq!(RecordKind::from_code(82), RecordKind::Rule);
        assert_eq!(RecordKind::from_code(68), RecordKind::DfaState);
        assert_eq!(RecordKind::from_code(76), RecordKind::LrState);
        assert_eq!(RecordKind::from_code(80), RecordKind::Parameter);
        assert_eq!(RecordKind::from_code(112), RecordKind::Property);
        assert_eq!(RecordKind::from_code(67), RecordKind::Charset);
        assert_eq!(RecordKind::from_code(99), RecordKind::CharRanges);
        assert_eq!(RecordKind::from_code(103), RecordKind::Group);
        assert_eq!(RecordKind::from_code(110), RecordKind::GroupNesting);
        assert_eq!(RecordKind::from_code(84), RecordKind::Counts);
        assert_eq!(RecordKind::from_code(116), RecordKind::Counts5);
        assert_eq!(RecordKind::from_code(0), RecordKind::Undefined);
    }

    #[test]
    fn test_entry_kind_total() {
        // Every byte decodes without panicking; unknown bytes are Undefined.
        for code in 0u8..=255 {
            let kind = EntryKind::from_code(code);
            if !matches!(code, b'B' | b'E' | b'I' | b'S' | b'b') {
                assert_eq!(kind, EntryKind::Undefined);
            }
        }
    }

    #[test]
    fn test_symbol_kind_roundtrip() {
        for code in 0u16..16 {
            let kind = SymbolKind::from_code(code);
            if let Some(back) = kind.code() {
                assert_eq!(back, code);
            } else {
                assert_eq!(kind, SymbolKind::Undefined);
            }
        }
    }

    #[test]
    fn test_noise_classification() {
        assert!(SymbolKind::Noise.is_noise());
        assert!(SymbolKind::CommentLine.is_noise());
        assert!(!SymbolKind::Content.is_noise());
        assert!(!SymbolKind::End.is_noise());
    }

    #[test]
    fn test_action_kind_codes() {
        assert_eq!(ActionKind::from_code(1), ActionKind::Shift);
        assert_eq!(ActionKind::from_code(2), ActionKind::Reduce);
        assert_eq!(ActionKind::from_code(3), ActionKind::Goto);
        assert_eq!(ActionKind::from_code(4), ActionKind::Accept);
        assert_eq!(ActionKind::from_code(0), ActionKind::Undefined);
        assert_eq!(ActionKind::from_code(99), ActionKind::Undefined);
    }

    #[test]
    fn test_conflict_kind_roundtrip() {
        for code in 0u16..16 {
            let kind = ConflictKind::from_code(code);
            if let Some(back) = kind.code() {
                assert_eq!(back, code);
            } else {
                assert_eq!(kind, ConflictKind::Undefined);
            }
        }
        assert_eq!(ConflictKind::from_code(2), ConflictKind::ShiftReduce);
        assert_eq!(ConflictKind::from_code(5), ConflictKind::None);
    }

    #[test]
    fn test_parse_message_classification() {
        assert!(ParseMessage::SyntaxError.is_error());
        assert!(ParseMessage::InternalError.is_error());
        assert!(!ParseMessage::Accept.is_error());
        assert!(ParseMessage::TokenRead.is_continuable());
        assert!(ParseMessage::Reduction.is_continuable());
        assert!(!ParseMessage::Accept.is_continuable());
        assert!(!ParseMessage::GroupError.is_continuable());
    }
}
