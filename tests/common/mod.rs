//! Test support: a compiled-table byte-stream writer and canned grammars
//!
//! Integration tests exercise the whole pipeline (reader -> model builder
//! -> tokenizer -> LALR engine) against real byte streams, so this module
//! encodes them the same way a table generator would: signature, then
//! records of typed entries.

// Each test binary uses a different slice of this module.
#![allow(dead_code)]

/// One entry to encode
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum E {
    /// BOOLEAN
    B(bool),
    /// UINT16
    I(u16),
    /// STRING
    S(&'static str),
    /// BYTE
    Y(u8),
    /// EMPTY
    Empty,
}

/// Builder for CGT/EGT byte streams
pub struct TableWriter {
    buf: Vec<u8>,
}

#[allow(dead_code)]
impl TableWriter {
    /// Start a v5 (EGT) stream.
    pub fn new_v5() -> Self {
        let mut buf = Vec::new();
        write_utf16(&mut buf, "GOLD Parser Tables/v5.0");
        Self { buf }
    }

    /// Start a v1 (CGT) stream.
    pub fn new_v1() -> Self {
        let mut buf = Vec::new();
        write_utf16(&mut buf, "GOLD Parser Tables/v1.0");
        Self { buf }
    }

    /// Start a stream with an arbitrary signature.
    pub fn with_signature(signature: &str) -> Self {
        let mut buf = Vec::new();
        write_utf16(&mut buf, signature);
        Self { buf }
    }

    /// Append one record.
    pub fn record(&mut self, kind: u8, entries: &[E]) -> &mut Self {
        self.buf.push(kind);
        self.buf
            .extend_from_slice(&(entries.len() as u16).to_le_bytes());
        for entry in entries {
            match entry {
                E::B(v) => {
                    self.buf.push(b'B');
                    self.buf.push(u8::from(*v));
                }
                E::I(v) => {
                    self.buf.push(b'I');
                    self.buf.extend_from_slice(&v.to_le_bytes());
                }
                E::S(s) => {
                    self.buf.push(b'S');
                    write_utf16(&mut self.buf, s);
                }
                E::Y(v) => {
                    self.buf.push(b'b');
                    self.buf.push(*v);
                }
                E::Empty => self.buf.push(b'E'),
            }
        }
        self
    }

    /// Append raw bytes (for malformed-stream tests).
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Finish and return the stream.
    pub fn bytes(&self) -> Vec<u8> {
        self.buf.clone()
    }
}

fn write_utf16(out: &mut Vec<u8>, s: &str) {
    for unit in s.encode_utf16() {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    out.extend_from_slice(&0u16.to_le_bytes());
}

// ============================================================================
// Canned grammar: left-associative addition
// ============================================================================
//
// Expr ::= Expr '+' Expr | Number, with the shift-reduce conflict on '+'
// resolved toward reduce (left associativity) when the tables were built.
//
// Symbols: 0 EOF, 1 '+', 2 Number, 3 Whitespace, 4 Expr
// Rules:   0 Expr ::= Expr '+' Expr ; 1 Expr ::= Number
// DFA:     0 init, 1 digits (Number), 2 spaces (Whitespace), 3 plus ('+')
// LALR:    0 init; 1 after Number; 2 after Expr (accept on EOF);
//          3 after '+'; 4 after Expr '+' Expr (reduce on '+' and EOF)

/// Symbol ids of the arithmetic grammar.
#[allow(dead_code)]
pub mod arith {
    pub const EOF: u16 = 0;
    pub const PLUS: u16 = 1;
    pub const NUMBER: u16 = 2;
    pub const WHITESPACE: u16 = 3;
    pub const EXPR: u16 = 4;
    pub const RULE_ADD: u16 = 0;
    pub const RULE_NUM: u16 = 1;
}

/// Encode the arithmetic grammar as a v5 stream.
pub fn arithmetic_tables() -> Vec<u8> {
    let mut w = TableWriter::new_v5();
    w.record(b'p', &[E::I(0), E::S("Name"), E::S("Addition")]);
    w.record(b'p', &[E::I(1), E::S("Case Sensitive"), E::S("True")]);
    // symbols, charsets, rules, DFA states, LALR states, groups
    w.record(
        b't',
        &[E::I(5), E::I(3), E::I(2), E::I(4), E::I(5), E::I(0)],
    );

    w.record(b'S', &[E::I(0), E::S("EOF"), E::I(3)]);
    w.record(b'S', &[E::I(1), E::S("+"), E::I(1)]);
    w.record(b'S', &[E::I(2), E::S("Number"), E::I(1)]);
    w.record(b'S', &[E::I(3), E::S("Whitespace"), E::I(2)]);
    w.record(b'S', &[E::I(4), E::S("Expr"), E::I(0)]);

    // 0: digits, 1: blanks, 2: plus
    w.record(
        b'c',
        &[E::I(0), E::I(0), E::I(1), E::Empty, E::I(48), E::I(57)],
    );
    w.record(
        b'c',
        &[
            E::I(1),
            E::I(0),
            E::I(2),
            E::Empty,
            E::I(9),
            E::I(10),
            E::I(32),
            E::I(32),
        ],
    );
    w.record(
        b'c',
        &[E::I(2), E::I(0), E::I(1), E::Empty, E::I(43), E::I(43)],
    );

    w.record(b'R', &[E::I(0), E::I(4), E::Empty, E::I(4), E::I(1), E::I(4)]);
    w.record(b'R', &[E::I(1), E::I(4), E::Empty, E::I(2)]);

    w.record(
        b'D',
        &[
            E::I(0),
            E::B(false),
            E::I(0),
            E::Empty,
            E::I(0),
            E::I(1),
            E::Empty,
            E::I(1),
            E::I(2),
            E::Empty,
            E::I(2),
            E::I(3),
            E::Empty,
        ],
    );
    w.record(
        b'D',
        &[
            E::I(1),
            E::B(true),
            E::I(2),
            E::Empty,
            E::I(0),
            E::I(1),
            E::Empty,
        ],
    );
    w.record(
        b'D',
        &[
            E::I(2),
            E::B(true),
            E::I(3),
            E::Empty,
            E::I(1),
            E::I(2),
            E::Empty,
        ],
    );
    w.record(b'D', &[E::I(3), E::B(true), E::I(1), E::Empty]);

    // action codes: 1 shift, 2 reduce, 3 goto, 4 accept
    w.record(
        b'L',
        &[
            E::I(0),
            E::Empty,
            E::I(2),
            E::I(1),
            E::I(1),
            E::Empty,
            E::I(4),
            E::I(3),
            E::I(2),
            E::Empty,
        ],
    );
    w.record(
        b'L',
        &[
            E::I(1),
            E::Empty,
            E::I(1),
            E::I(2),
            E::I(1),
            E::Empty,
            E::I(0),
            E::I(2),
            E::I(1),
            E::Empty,
        ],
    );
    w.record(
        b'L',
        &[
            E::I(2),
            E::Empty,
            E::I(1),
            E::I(1),
            E::I(3),
            E::Empty,
            E::I(0),
            E::I(4),
            E::I(0),
            E::Empty,
        ],
    );
    w.record(
        b'L',
        &[
            E::I(3),
            E::Empty,
            E::I(2),
            E::I(1),
            E::I(1),
            E::Empty,
            E::I(4),
            E::I(3),
            E::I(4),
            E::Empty,
        ],
    );
    w.record(
        b'L',
        &[
            E::I(4),
            E::Empty,
            E::I(1),
            E::I(2),
            E::I(0),
            E::Empty,
            E::I(0),
            E::I(2),
            E::I(0),
            E::Empty,
        ],
    );

    w.record(b'I', &[E::I(0), E::I(0)]);
    w.bytes()
}

// ============================================================================
// Canned grammar: brace-delimited text blocks with nesting and comments
// ============================================================================
//
// S ::= Block, where Block is a lexical group delimited by '{' and '}'
// that may nest itself. A legacy COMMENT_LINE symbol ('#') covers the
// deprecated single-line comment path.
//
// Symbols: 0 EOF, 1 Block, 2 BlockStart, 3 BlockEnd, 4 Whitespace,
//          5 S, 6 Hash (COMMENT_LINE)
// DFA:     0 init, 1 '{', 2 '}', 3 blanks, 4 '#'
// LALR:    0 init; 1 after Block; 2 after S (accept on EOF)

/// Symbol ids of the block grammar.
#[allow(dead_code)]
pub mod blocks {
    pub const EOF: u16 = 0;
    pub const BLOCK: u16 = 1;
    pub const BLOCK_START: u16 = 2;
    pub const BLOCK_END: u16 = 3;
    pub const WHITESPACE: u16 = 4;
    pub const S: u16 = 5;
    pub const HASH: u16 = 6;
}

/// Encode the block grammar as a v5 stream.
///
/// `closed`: ending mode of the block group (true = CLOSED, the default);
/// `character_advance`: use CHARACTER advance instead of TOKEN.
pub fn block_tables(closed: bool, character_advance: bool) -> Vec<u8> {
    let mut w = TableWriter::new_v5();
    w.record(b'p', &[E::I(0), E::S("Name"), E::S("Blocks")]);

    w.record(b'S', &[E::I(0), E::S("EOF"), E::I(3)]);
    w.record(b'S', &[E::I(1), E::S("Block"), E::I(1)]);
    w.record(b'S', &[E::I(2), E::S("BlockStart"), E::I(4)]);
    w.record(b'S', &[E::I(3), E::S("BlockEnd"), E::I(5)]);
    w.record(b'S', &[E::I(4), E::S("Whitespace"), E::I(2)]);
    w.record(b'S', &[E::I(5), E::S("S"), E::I(0)]);
    w.record(b'S', &[E::I(6), E::S("Hash"), E::I(6)]);

    // 0: '{', 1: '}', 2: blanks, 3: '#'
    w.record(
        b'c',
        &[E::I(0), E::I(0), E::I(1), E::Empty, E::I(123), E::I(123)],
    );
    w.record(
        b'c',
        &[E::I(1), E::I(0), E::I(1), E::Empty, E::I(125), E::I(125)],
    );
    w.record(
        b'c',
        &[
            E::I(2),
            E::I(0),
            E::I(2),
            E::Empty,
            E::I(9),
            E::I(10),
            E::I(32),
            E::I(32),
        ],
    );
    w.record(
        b'c',
        &[E::I(3), E::I(0), E::I(1), E::Empty, E::I(35), E::I(35)],
    );

    // group 0: Block, container 1, start 2, end 3, nests itself
    w.record(
        b'g',
        &[
            E::I(0),
            E::S("Block"),
            E::I(1),
            E::I(2),
            E::I(3),
            E::I(if character_advance { 1 } else { 0 }),
            E::I(if closed { 1 } else { 0 }),
            E::B(true),
        ],
    );
    w.record(b'n', &[E::I(0), E::I(0)]);

    w.record(b'R', &[E::I(0), E::I(5), E::Empty, E::I(1)]);

    w.record(
        b'D',
        &[
            E::I(0),
            E::B(false),
            E::I(0),
            E::Empty,
            E::I(0),
            E::I(1),
            E::Empty,
            E::I(1),
            E::I(2),
            E::Empty,
            E::I(2),
            E::I(3),
            E::Empty,
            E::I(3),
            E::I(4),
            E::Empty,
        ],
    );
    w.record(b'D', &[E::I(1), E::B(true), E::I(2), E::Empty]);
    w.record(b'D', &[E::I(2), E::B(true), E::I(3), E::Empty]);
    w.record(
        b'D',
        &[
            E::I(3),
            E::B(true),
            E::I(4),
            E::Empty,
            E::I(2),
            E::I(3),
            E::Empty,
        ],
    );
    w.record(b'D', &[E::I(4), E::B(true), E::I(6), E::Empty]);

    w.record(
        b'L',
        &[
            E::I(0),
            E::Empty,
            E::I(1),
            E::I(1),
            E::I(1),
            E::Empty,
            E::I(5),
            E::I(3),
            E::I(2),
            E::Empty,
        ],
    );
    w.record(
        b'L',
        &[E::I(1), E::Empty, E::I(0), E::I(2), E::I(0), E::Empty],
    );
    w.record(
        b'L',
        &[E::I(2), E::Empty, E::I(0), E::I(4), E::I(0), E::Empty],
    );

    w.record(b'I', &[E::I(0), E::I(0)]);
    w.bytes()
}
