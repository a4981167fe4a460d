//! Error types for table loading and tokenization
//!
//! Two taxonomies cover the engine's failure modes. [`FormatError`] is
//! raised while decoding or building tables and is always fatal to the
//! load; nothing is retried. [`LexError`] is raised by the tokenizer and
//! surfaces to a session as a parse message (lexical or group error); it
//! halts that session's progress but is not fatal to the process.
//! Syntax errors and internal errors are reported through
//! [`ParseMessage`](super::codes::ParseMessage), not through these types.

use std::fmt;

/// Error decoding a binary table stream or building the grammar model
///
/// All variants are fatal to table loading and carry enough context to
/// locate the offending byte or reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The stream does not begin with a known signature
    BadSignature,

    /// The stream ended inside a header, record or entry payload
    Truncated {
        /// Byte offset where more input was required
        offset: usize,
        /// What was being decoded
        expected: &'static str,
    },

    /// An entry carried an unrecognized type tag
    ///
    /// Strict by design: a misdecoded entry corrupts the alignment of
    /// every record after it, so the whole stream is rejected.
    UnknownEntryType {
        /// The unrecognized type byte
        code: u8,
        /// Byte offset of the type byte
        offset: usize,
    },

    /// A record's entries did not have the kind-specific layout
    WrongEntryKind {
        /// The record being decoded
        record: &'static str,
        /// Zero-based entry position inside the record
        entry: usize,
        /// What the layout requires at that position
        expected: &'static str,
    },

    /// A COUNTS/COUNTS5 record disagreed with the built table sizes
    CountMismatch {
        /// Which table diverged
        table: &'static str,
        /// Count declared by the record
        declared: usize,
        /// Count actually built
        actual: usize,
    },

    /// A table referenced an id that does not exist in the built model
    DanglingReference {
        /// What held the reference (e.g. "rule", "LALR action")
        referrer: &'static str,
        /// Id of the referring element
        referrer_id: usize,
        /// What was referenced (e.g. "symbol", "DFA state")
        target: &'static str,
        /// The unresolved id
        target_id: usize,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadSignature => {
                write!(f, "not a compiled grammar table stream (bad signature)")
            }
            Self::Truncated { offset, expected } => {
                write!(f, "truncated stream at byte {}: expected {}", offset, expected)
            }
            Self::UnknownEntryType { code, offset } => {
                write!(
                    f,
                    "unknown entry type 0x{:02X} at byte {} (stream alignment lost)",
                    code, offset
                )
            }
            Self::WrongEntryKind {
                record,
                entry,
                expected,
            } => {
                write!(
                    f,
                    "malformed {} record: entry {} must be {}",
                    record, entry, expected
                )
            }
            Self::CountMismatch {
                table,
                declared,
                actual,
            } => {
                write!(
                    f,
                    "count record declares {} {} but {} were built",
                    declared, table, actual
                )
            }
            Self::DanglingReference {
                referrer,
                referrer_id,
                target,
                target_id,
            } => {
                write!(
                    f,
                    "{} {} references {} {} which does not exist",
                    referrer, referrer_id, target, target_id
                )
            }
        }
    }
}

impl std::error::Error for FormatError {}

/// Error recognizing a token in the character stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// No DFA accepting state covered any prefix of the remaining input
    ///
    /// The offending character is consumed as a one-character error token
    /// so the caller may report and skip.
    UnrecognizedToken {
        /// Byte offset of the unrecognized character
        offset: usize,
        /// The character that matched no edge
        character: char,
    },

    /// End of input was reached inside a CLOSED group
    UnterminatedGroup {
        /// Name of the group left open
        group: String,
        /// Byte offset where the group started
        start_offset: usize,
    },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedToken { offset, character } => {
                write!(
                    f,
                    "unrecognized character {:?} at byte {}",
                    character, offset
                )
            }
            Self::UnterminatedGroup {
                group,
                start_offset,
            } => {
                write!(
                    f,
                    "group {:?} opened at byte {} was never terminated",
                    group, start_offset
                )
            }
        }
    }
}

impl std::error::Error for LexError {}
