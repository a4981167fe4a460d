//! Integration tests for table loading
//!
//! These drive the full load path - signature, record decoding, model
//! building, validation - against byte streams produced by the test
//! writer, including both format variants and malformed streams.

mod common;

use common::{arithmetic_tables, block_tables, TableWriter, E};
use goldengine::engine::{load_tables, FormatError, GrammarModel, RecordKind, TableReader};

// ============================================================================
// Well-formed streams
// ============================================================================

#[test]
fn test_load_arithmetic_tables() {
    let model = load_tables(&arithmetic_tables()).expect("tables should load");
    assert_eq!(model.name, "Addition");
    assert!(model.case_sensitive);
    assert_eq!(model.symbols.len(), 5);
    assert_eq!(model.rules.len(), 2);
    assert_eq!(model.charsets.len(), 3);
    assert_eq!(model.dfa_states.len(), 4);
    assert_eq!(model.lr_states.len(), 5);
    assert!(model.groups.is_empty());
    assert!(model.is_loaded());
}

#[test]
fn test_loaded_tables_have_no_dangling_references() {
    // from_records validates everything; loading success is the property.
    // Walk the tables again here to make the claim explicit.
    let model = load_tables(&arithmetic_tables()).unwrap();
    for state in &model.lr_states {
        for (&symbol, action) in &state.actions {
            assert!(model.symbol(symbol).is_some());
            match action.kind {
                goldengine::engine::ActionKind::Shift | goldengine::engine::ActionKind::Goto => {
                    assert!((action.value as usize) < model.lr_states.len());
                }
                goldengine::engine::ActionKind::Reduce => {
                    assert!(model.rule(action.value).is_some());
                }
                _ => {}
            }
        }
    }
    for state in &model.dfa_states {
        for edge in &state.edges {
            assert!((edge.charset as usize) < model.charsets.len());
            assert!((edge.target as usize) < model.dfa_states.len());
        }
    }
}

#[test]
fn test_load_block_tables_with_groups() {
    let model = load_tables(&block_tables(true, false)).expect("tables should load");
    // One explicit group plus the synthesized legacy comment group.
    assert_eq!(model.groups.len(), 2);
    let block = &model.groups[0];
    assert_eq!(block.name, "Block");
    assert!(block.can_nest(0));
    assert_eq!(block.end, Some(common::blocks::BLOCK_END));
    let comment = &model.groups[1];
    assert_eq!(comment.end, None);
    assert!(model.group_opened_by(common::blocks::HASH).is_some());
}

#[test]
fn test_clean_models_have_no_warnings() {
    let arith = load_tables(&arithmetic_tables()).unwrap();
    assert!(arith.analyze_warnings().is_empty());
    let blocks = load_tables(&block_tables(true, false)).unwrap();
    assert!(blocks.analyze_warnings().is_empty());
}

#[test]
fn test_v1_variant_loads() {
    let mut w = TableWriter::new_v1();
    w.record(
        b'P',
        &[
            E::S("Legacy"),
            E::S("1.0"),
            E::S("nobody"),
            E::S("about"),
            E::B(false),
            E::I(1),
        ],
    );
    w.record(b'S', &[E::I(0), E::S("EOF"), E::I(3)]);
    w.record(b'S', &[E::I(1), E::S("S"), E::I(0)]);
    // v1 charset: explicit character list
    w.record(b'C', &[E::I(0), E::S("abc")]);
    // symbols, charsets, rules, DFA states, LALR states
    w.record(b'T', &[E::I(2), E::I(1), E::I(0), E::I(0), E::I(0)]);

    let model = load_tables(&w.bytes()).expect("v1 stream should load");
    assert_eq!(model.name, "Legacy");
    assert!(!model.case_sensitive);
    assert_eq!(model.start_symbol, Some(1));
    assert!(model.charsets[0].contains('b'));
    assert!(!model.charsets[0].contains('d'));
    assert_eq!(model.properties.get("Author").map(String::as_str), Some("nobody"));
}

#[test]
fn test_json_roundtrip_of_loaded_model() {
    let model = load_tables(&arithmetic_tables()).unwrap();
    let json = model.to_json().unwrap();
    let back = GrammarModel::from_json(&json).unwrap();
    assert_eq!(back, model);
}

#[test]
fn test_unknown_record_kinds_are_skipped() {
    let mut w = TableWriter::new_v5();
    // A record kind from some future format version.
    w.record(b'Q', &[E::I(1), E::S("mystery"), E::B(true)]);
    w.record(b'S', &[E::I(0), E::S("EOF"), E::I(3)]);

    let bytes = w.bytes();
    let mut reader = TableReader::new(&bytes).unwrap();
    let first = reader.next_record().unwrap().unwrap();
    assert_eq!(first.kind, RecordKind::Undefined);
    assert_eq!(first.len(), 3);
    let second = reader.next_record().unwrap().unwrap();
    assert_eq!(second.kind, RecordKind::Symbol);
    assert_eq!(reader.next_record().unwrap(), None);

    // The builder ignores unknown records entirely.
    let model = load_tables(&w.bytes()).unwrap();
    assert_eq!(model.symbols.len(), 1);
}

// ============================================================================
// Malformed streams
// ============================================================================

#[test]
fn test_bad_signature() {
    let w = TableWriter::with_signature("Some Other Tables/v2.0");
    assert_eq!(load_tables(&w.bytes()), Err(FormatError::BadSignature));
    assert_eq!(load_tables(b"\x01\x02\x03"), Err(FormatError::BadSignature));
}

#[test]
fn test_truncated_final_record() {
    let bytes = arithmetic_tables();
    // Chop into the final INITIALSTATES record's payload.
    let truncated = &bytes[..bytes.len() - 2];
    match load_tables(truncated) {
        Err(FormatError::Truncated { .. }) => {}
        other => panic!("expected Truncated, got {:?}", other),
    }
}

#[test]
fn test_entry_count_promising_too_much() {
    let mut w = TableWriter::new_v5();
    w.record(b'S', &[E::I(0), E::S("EOF"), E::I(3)]);
    let mut bytes = w.bytes();
    // Append a record header that declares 4 entries but provides none.
    bytes.push(b'R');
    bytes.extend_from_slice(&4u16.to_le_bytes());
    assert!(matches!(
        load_tables(&bytes),
        Err(FormatError::Truncated { .. })
    ));
}

#[test]
fn test_unknown_entry_type_is_fatal() {
    let mut w = TableWriter::new_v5();
    w.record(b'S', &[E::I(0), E::S("EOF"), E::I(3)]);
    let mut bytes = w.bytes();
    bytes.push(b'S');
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.push(b'Z'); // no such entry type
    bytes.push(0);
    assert!(matches!(
        load_tables(&bytes),
        Err(FormatError::UnknownEntryType { code: b'Z', .. })
    ));
}

#[test]
fn test_wrong_entry_kind_in_layout() {
    let mut w = TableWriter::new_v5();
    // SYMBOL with a string where the index belongs.
    w.record(b'S', &[E::S("oops"), E::S("EOF"), E::I(3)]);
    assert!(matches!(
        load_tables(&w.bytes()),
        Err(FormatError::WrongEntryKind { record: "SYMBOL", .. })
    ));
}

#[test]
fn test_count_mismatch_is_detected() {
    let mut w = TableWriter::new_v5();
    w.record(b'S', &[E::I(0), E::S("EOF"), E::I(3)]);
    w.record(
        b't',
        &[E::I(3), E::I(0), E::I(0), E::I(0), E::I(0), E::I(0)],
    );
    assert!(matches!(
        load_tables(&w.bytes()),
        Err(FormatError::CountMismatch {
            table: "symbols",
            declared: 3,
            actual: 1,
        })
    ));
}

#[test]
fn test_dangling_dfa_edge_target() {
    let mut w = TableWriter::new_v5();
    w.record(b'S', &[E::I(0), E::S("EOF"), E::I(3)]);
    w.record(
        b'c',
        &[E::I(0), E::I(0), E::I(1), E::Empty, E::I(97), E::I(122)],
    );
    w.record(
        b'D',
        &[
            E::I(0),
            E::B(false),
            E::I(0),
            E::Empty,
            E::I(0),
            E::I(9), // no DFA state 9
            E::Empty,
        ],
    );
    assert!(matches!(
        load_tables(&w.bytes()),
        Err(FormatError::DanglingReference {
            target: "DFA state",
            target_id: 9,
            ..
        })
    ));
}
