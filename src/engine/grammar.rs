//! Grammar model built from compiled table records
//!
//! This module defines the in-memory representation of a loaded grammar:
//! the symbol and rule tables, the DFA and LALR automatons, character sets,
//! lexical groups and the property table. Everything is index-linked -
//! symbols, rules, states, charsets and groups are referenced by dense ids
//! matching their position in the owning table.
//!
//! A [`GrammarModel`] is constructed once, in a single pass over the record
//! stream, and is immutable afterwards. It can be shared freely between
//! parser sessions; all mutable parse state lives in the session.

use super::charset::CharacterSet;
use super::codes::{ActionKind, AdvanceMode, EndingMode, RecordKind, SymbolKind};
use super::error::FormatError;
use super::reader::{Record, TableReader};
use ahash::RandomState;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Index of a symbol in the symbol table
pub type SymbolId = u16;

/// Index of a rule in the rule table
pub type RuleId = u16;

/// Index of a DFA or LALR state in its table
pub type StateId = u16;

/// Index of a group in the group table
pub type GroupId = u16;

/// One grammar symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    /// Dense id; equals the symbol's position in the table
    pub id: SymbolId,
    /// Display name
    pub name: String,
    /// Classification
    pub kind: SymbolKind,
}

/// One production rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Dense id
    pub id: RuleId,
    /// Left-hand nonterminal symbol
    pub head: SymbolId,
    /// Right-hand symbols, in order; empty for an epsilon production
    pub rhs: Vec<SymbolId>,
}

impl Rule {
    /// Whether this rule produces the empty string.
    #[inline]
    pub fn is_epsilon(&self) -> bool {
        self.rhs.is_empty()
    }
}

/// One outgoing edge of a DFA state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DfaEdge {
    /// Character set acting as the edge predicate
    pub charset: u16,
    /// Target DFA state
    pub target: StateId,
}

/// One state of the tokenizer automaton
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DfaState {
    /// Dense id
    pub id: StateId,
    /// Symbol accepted when a token ends in this state, if any
    pub accept: Option<SymbolId>,
    /// Outgoing edges; at most one should match any given character
    pub edges: Vec<DfaEdge>,
}

impl DfaState {
    /// Find the target state for `ch`, if an edge covers it.
    pub fn step(&self, charsets: &[CharacterSet], ch: char) -> Option<StateId> {
        self.edges
            .iter()
            .find(|e| {
                charsets
                    .get(e.charset as usize)
                    .is_some_and(|set| set.contains(ch))
            })
            .map(|e| e.target)
    }
}

/// One LALR action: what to do on a symbol in some state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LrAction {
    /// Shift, reduce, goto or accept
    pub kind: ActionKind,
    /// Target state for shift/goto, rule id for reduce, unused for accept
    pub value: u16,
}

/// One state of the LALR automaton
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LrState {
    /// Dense id
    pub id: StateId,
    /// Action per symbol id; absence means syntax error on that symbol
    pub actions: HashMap<SymbolId, LrAction, RandomState>,
}

impl LrState {
    /// The action for `symbol`, if one is defined.
    #[inline]
    pub fn action(&self, symbol: SymbolId) -> Option<LrAction> {
        self.actions.get(&symbol).copied()
    }

    /// Symbol ids a lookahead could legally be in this state, for
    /// "expected one of" reporting. GOTO entries are transitions on
    /// already-reduced nonterminals, not expectations, and are left out.
    pub fn expected_symbols(&self) -> Vec<SymbolId> {
        let mut ids: Vec<SymbolId> = self
            .actions
            .iter()
            .filter(|(_, action)| action.kind != ActionKind::Goto)
            .map(|(&symbol, _)| symbol)
            .collect();
        ids.sort_unstable();
        ids
    }
}

impl PartialEq for LrState {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.actions.len() == other.actions.len()
            && self
                .actions
                .iter()
                .all(|(k, v)| other.actions.get(k) == Some(v))
    }
}

/// One lexical group (string literal, comment, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Dense id
    pub id: GroupId,
    /// Display name
    pub name: String,
    /// Symbol emitted for the whole group content
    pub container: SymbolId,
    /// Symbol whose recognition opens the group
    pub start: SymbolId,
    /// Symbol whose recognition closes the group; `None` for groups that
    /// end only at end of line or end of input (legacy line comments)
    pub end: Option<SymbolId>,
    /// How content is consumed while the group is active
    pub advance: AdvanceMode,
    /// Whether the end symbol is required or line/input end suffices
    pub ending: EndingMode,
    /// Whether the finished group becomes a token or is discarded
    pub produce_token: bool,
    /// Groups that may open while this one is active
    pub nesting: Vec<GroupId>,
}

impl Group {
    /// Whether `other` may open while this group is active.
    #[inline]
    pub fn can_nest(&self, other: GroupId) -> bool {
        self.nesting.contains(&other)
    }
}

/// A fully built, immutable grammar model
///
/// Shareable across any number of concurrent parser sessions; nothing in
/// it mutates after [`GrammarModel::from_records`] returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrammarModel {
    /// Grammar name, from the PARAMETER record or the "Name" property
    pub name: String,
    /// Whether terminals match case-sensitively
    pub case_sensitive: bool,
    /// Start symbol declared by the table, if any
    pub start_symbol: Option<SymbolId>,
    /// All property key/value pairs as they appeared in the stream
    pub properties: HashMap<String, String, RandomState>,
    /// Symbol table, indexed by id
    pub symbols: Vec<Symbol>,
    /// Rule table, indexed by id
    pub rules: Vec<Rule>,
    /// Character sets referenced by DFA edges
    pub charsets: Vec<CharacterSet>,
    /// Tokenizer automaton
    pub dfa_states: Vec<DfaState>,
    /// Parser automaton
    pub lr_states: Vec<LrState>,
    /// Lexical groups
    pub groups: Vec<Group>,
    /// Initial DFA state
    pub dfa_initial: StateId,
    /// Initial LALR state
    pub lr_initial: StateId,
    /// Group opened by each group-start symbol
    pub group_for_start: HashMap<SymbolId, GroupId, RandomState>,
}

impl GrammarModel {
    /// Build a model from a decoded record sequence (single pass).
    pub fn from_records<I>(records: I) -> Result<Self, FormatError>
    where
        I: IntoIterator<Item = Result<Record, FormatError>>,
    {
        let mut builder = ModelBuilder::default();
        for record in records {
            builder.apply(&record?)?;
        }
        builder.finish()
    }

    /// Look up a symbol by id.
    #[inline]
    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id as usize)
    }

    /// The display name of a symbol, or a placeholder for unknown ids.
    pub fn symbol_name(&self, id: SymbolId) -> &str {
        self.symbol(id).map_or("<unknown>", |s| s.name.as_str())
    }

    /// Look up a rule by id.
    #[inline]
    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(id as usize)
    }

    /// Look up a group by id.
    #[inline]
    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id as usize)
    }

    /// The group opened by `symbol`, if it is a group-start symbol.
    #[inline]
    pub fn group_opened_by(&self, symbol: SymbolId) -> Option<&Group> {
        self.group_for_start
            .get(&symbol)
            .and_then(|&id| self.group(id))
    }

    /// The id of the END symbol, if the table declares one.
    pub fn end_symbol(&self) -> Option<SymbolId> {
        self.symbols
            .iter()
            .find(|s| s.kind == SymbolKind::End)
            .map(|s| s.id)
    }

    /// Whether both automatons are present.
    ///
    /// A session stepped against a model without tables reports
    /// [`ParseMessage::NotLoadedError`](super::codes::ParseMessage).
    #[inline]
    pub fn is_loaded(&self) -> bool {
        !self.dfa_states.is_empty() && !self.lr_states.is_empty()
    }

    /// Analyze the model for suspicious-but-legal table content.
    ///
    /// See [`analysis`](super::analysis) for the checks performed; the
    /// engine runs regardless of what this reports.
    pub fn analyze_warnings(&self) -> Vec<super::analysis::GrammarWarning> {
        super::analysis::GrammarAnalyzer::new(self).analyze()
    }

    /// Serialize the model to JSON, for inspection or caching.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize a model from JSON produced by [`GrammarModel::to_json`].
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// Load a grammar model directly from a table byte stream.
///
/// Convenience wrapper: opens a [`TableReader`] and builds the model in
/// one pass. All errors are fatal; nothing is retried.
pub fn load_tables(data: &[u8]) -> Result<GrammarModel, FormatError> {
    let reader = TableReader::new(data)?;
    GrammarModel::from_records(reader)
}

/// Declared table sizes from a COUNTS/COUNTS5 record
#[derive(Debug, Clone, Copy)]
struct DeclaredCounts {
    symbols: usize,
    charsets: usize,
    rules: usize,
    dfa_states: usize,
    lr_states: usize,
    groups: Option<usize>,
}

/// Single-pass accumulator for [`GrammarModel::from_records`]
///
/// Tables are sparse during building (records may arrive in any order
/// within their kind) and densified in [`ModelBuilder::finish`], which also
/// runs the cross-table reference validation.
#[derive(Default)]
struct ModelBuilder {
    name: String,
    case_sensitive: Option<bool>,
    start_symbol: Option<SymbolId>,
    properties: HashMap<String, String, RandomState>,
    symbols: Vec<Option<Symbol>>,
    rules: Vec<Option<Rule>>,
    charsets: Vec<Option<CharacterSet>>,
    dfa_states: Vec<Option<DfaState>>,
    lr_states: Vec<Option<LrState>>,
    groups: Vec<Option<Group>>,
    dfa_initial: Option<StateId>,
    lr_initial: Option<StateId>,
    counts: Option<DeclaredCounts>,
}

fn place<T>(table: &mut Vec<Option<T>>, index: usize, value: T) {
    if table.len() <= index {
        table.resize_with(index + 1, || None);
    }
    table[index] = Some(value);
}

fn densify<T>(table: Vec<Option<T>>, what: &'static str) -> Result<Vec<T>, FormatError> {
    table
        .into_iter()
        .enumerate()
        .map(|(idx, slot)| {
            slot.ok_or(FormatError::DanglingReference {
                referrer: "table",
                referrer_id: idx,
                target: what,
                target_id: idx,
            })
        })
        .collect()
}

impl ModelBuilder {
    fn apply(&mut self, record: &Record) -> Result<(), FormatError> {
        match record.kind {
            RecordKind::Parameter => self.apply_parameter(record),
            RecordKind::Property => self.apply_property(record),
            RecordKind::Counts => self.apply_counts(record, false),
            RecordKind::Counts5 => self.apply_counts(record, true),
            RecordKind::Charset => self.apply_charset(record),
            RecordKind::CharRanges => self.apply_char_ranges(record),
            RecordKind::Symbol => self.apply_symbol(record),
            RecordKind::Group => self.apply_group(record),
            RecordKind::GroupNesting => self.apply_group_nesting(record),
            RecordKind::Rule => self.apply_rule(record),
            RecordKind::DfaState => self.apply_dfa_state(record),
            RecordKind::LrState => self.apply_lr_state(record),
            RecordKind::InitialStates => self.apply_initial_states(record),
            // Forward compatibility: unknown records were already fully
            // consumed by the reader and carry nothing we understand.
            RecordKind::Undefined => Ok(()),
        }
    }

    fn apply_parameter(&mut self, record: &Record) -> Result<(), FormatError> {
        const R: &str = "PARAMETER";
        self.name = record.str_at(0, R)?.to_string();
        let version = record.str_at(1, R)?.to_string();
        let author = record.str_at(2, R)?.to_string();
        let about = record.str_at(3, R)?.to_string();
        self.case_sensitive = Some(record.bool_at(4, R)?);
        self.start_symbol = Some(record.u16_at(5, R)?);

        self.properties.insert("Name".to_string(), self.name.clone());
        self.properties.insert("Version".to_string(), version);
        self.properties.insert("Author".to_string(), author);
        self.properties.insert("About".to_string(), about);
        Ok(())
    }

    fn apply_property(&mut self, record: &Record) -> Result<(), FormatError> {
        const R: &str = "PROPERTY";
        let _index = record.u16_at(0, R)?;
        let key = record.str_at(1, R)?.to_string();
        let value = record.str_at(2, R)?.to_string();
        match key.as_str() {
            "Name" => self.name = value.clone(),
            "Case Sensitive" => {
                self.case_sensitive = Some(value.eq_ignore_ascii_case("true"));
            }
            "Start Symbol" => {
                if let Ok(id) = value.parse::<u16>() {
                    self.start_symbol = Some(id);
                }
            }
            _ => {}
        }
        self.properties.insert(key, value);
        Ok(())
    }

    fn apply_counts(&mut self, record: &Record, with_groups: bool) -> Result<(), FormatError> {
        let name: &'static str = if with_groups { "COUNTS5" } else { "COUNTS" };
        let counts = DeclaredCounts {
            symbols: record.u16_at(0, name)? as usize,
            charsets: record.u16_at(1, name)? as usize,
            rules: record.u16_at(2, name)? as usize,
            dfa_states: record.u16_at(3, name)? as usize,
            lr_states: record.u16_at(4, name)? as usize,
            groups: if with_groups {
                Some(record.u16_at(5, name)? as usize)
            } else {
                None
            },
        };
        self.counts = Some(counts);
        Ok(())
    }

    fn apply_charset(&mut self, record: &Record) -> Result<(), FormatError> {
        const R: &str = "CHARSET";
        let index = record.u16_at(0, R)? as usize;
        let chars = record.str_at(1, R)?;
        place(&mut self.charsets, index, CharacterSet::from_chars(chars));
        Ok(())
    }

    fn apply_char_ranges(&mut self, record: &Record) -> Result<(), FormatError> {
        const R: &str = "CHARRANGES";
        let index = record.u16_at(0, R)? as usize;
        let _codepage = record.u16_at(1, R)?;
        let declared = record.u16_at(2, R)? as usize;
        // entry 3 is reserved EMPTY; ranges follow as (lo, hi) pairs
        let pair_entries = record.len().saturating_sub(4);
        if pair_entries != declared * 2 {
            return Err(FormatError::WrongEntryKind {
                record: R,
                entry: 4,
                expected: "one (lo, hi) UINT16 pair per declared range",
            });
        }
        let mut ranges = Vec::with_capacity(declared);
        for i in 0..declared {
            let lo = record.u16_at(4 + i * 2, R)?;
            let hi = record.u16_at(5 + i * 2, R)?;
            ranges.push((u32::from(lo), u32::from(hi)));
        }
        place(&mut self.charsets, index, CharacterSet::from_ranges(ranges));
        Ok(())
    }

    fn apply_symbol(&mut self, record: &Record) -> Result<(), FormatError> {
        const R: &str = "SYMBOL";
        let id = record.u16_at(0, R)?;
        let name = record.str_at(1, R)?.to_string();
        let kind = SymbolKind::from_code(record.u16_at(2, R)?);
        place(&mut self.symbols, id as usize, Symbol { id, name, kind });
        Ok(())
    }

    fn apply_group(&mut self, record: &Record) -> Result<(), FormatError> {
        const R: &str = "GROUP";
        let id = record.u16_at(0, R)?;
        let name = record.str_at(1, R)?.to_string();
        let container = record.u16_at(2, R)?;
        let start = record.u16_at(3, R)?;
        let end = record.u16_at(4, R)?;
        let advance = AdvanceMode::from_code(record.u16_at(5, R)?);
        let ending = EndingMode::from_code(record.u16_at(6, R)?);
        let produce_token = record.bool_at(7, R)?;
        let mut nesting = Vec::new();
        for i in 8..record.len() {
            nesting.push(record.u16_at(i, R)?);
        }
        place(
            &mut self.groups,
            id as usize,
            Group {
                id,
                name,
                container,
                start,
                end: Some(end),
                advance,
                ending,
                produce_token,
                nesting,
            },
        );
        Ok(())
    }

    fn apply_group_nesting(&mut self, record: &Record) -> Result<(), FormatError> {
        const R: &str = "GROUPNESTING";
        let id = record.u16_at(0, R)? as usize;
        let group = self
            .groups
            .get_mut(id)
            .and_then(Option::as_mut)
            .ok_or(FormatError::DanglingReference {
                referrer: "group nesting record",
                referrer_id: id,
                target: "group",
                target_id: id,
            })?;
        for i in 1..record.len() {
            let nested = record.u16_at(i, R)?;
            if !group.nesting.contains(&nested) {
                group.nesting.push(nested);
            }
        }
        Ok(())
    }

    fn apply_rule(&mut self, record: &Record) -> Result<(), FormatError> {
        const R: &str = "RULE";
        let id = record.u16_at(0, R)?;
        let head = record.u16_at(1, R)?;
        // entry 2 is reserved EMPTY
        let mut rhs = Vec::with_capacity(record.len().saturating_sub(3));
        for i in 3..record.len() {
            rhs.push(record.u16_at(i, R)?);
        }
        // Symbols always precede rules in a well-formed table, so every
        // referenced id must already be present.
        let known = |sym: SymbolId| self.symbols.get(sym as usize).is_some_and(Option::is_some);
        if !known(head) {
            return Err(FormatError::DanglingReference {
                referrer: "rule",
                referrer_id: id as usize,
                target: "symbol",
                target_id: head as usize,
            });
        }
        if let Some(&missing) = rhs.iter().find(|&&sym| !known(sym)) {
            return Err(FormatError::DanglingReference {
                referrer: "rule",
                referrer_id: id as usize,
                target: "symbol",
                target_id: missing as usize,
            });
        }
        place(&mut self.rules, id as usize, Rule { id, head, rhs });
        Ok(())
    }

    fn apply_dfa_state(&mut self, record: &Record) -> Result<(), FormatError> {
        const R: &str = "DFASTATE";
        let id = record.u16_at(0, R)?;
        let accepting = record.bool_at(1, R)?;
        let accept_symbol = record.u16_at(2, R)?;
        // entry 3 is reserved EMPTY; edges follow as (charset, target, EMPTY)
        let edge_entries = record.len().saturating_sub(4);
        if edge_entries % 3 != 0 {
            return Err(FormatError::WrongEntryKind {
                record: R,
                entry: 4,
                expected: "(charset, target, EMPTY) triples",
            });
        }
        let mut edges = Vec::with_capacity(edge_entries / 3);
        for i in 0..edge_entries / 3 {
            edges.push(DfaEdge {
                charset: record.u16_at(4 + i * 3, R)?,
                target: record.u16_at(5 + i * 3, R)?,
            });
        }
        place(
            &mut self.dfa_states,
            id as usize,
            DfaState {
                id,
                accept: accepting.then_some(accept_symbol),
                edges,
            },
        );
        Ok(())
    }

    fn apply_lr_state(&mut self, record: &Record) -> Result<(), FormatError> {
        const R: &str = "LRSTATE";
        let id = record.u16_at(0, R)?;
        // entry 1 is reserved EMPTY; actions follow as (symbol, action, value, EMPTY)
        let action_entries = record.len().saturating_sub(2);
        if action_entries % 4 != 0 {
            return Err(FormatError::WrongEntryKind {
                record: R,
                entry: 2,
                expected: "(symbol, action, value, EMPTY) quads",
            });
        }
        let mut actions: HashMap<SymbolId, LrAction, RandomState> = HashMap::default();
        for i in 0..action_entries / 4 {
            let symbol = record.u16_at(2 + i * 4, R)?;
            let kind = ActionKind::from_code(record.u16_at(3 + i * 4, R)?);
            let value = record.u16_at(4 + i * 4, R)?;
            actions.insert(symbol, LrAction { kind, value });
        }
        place(&mut self.lr_states, id as usize, LrState { id, actions });
        Ok(())
    }

    fn apply_initial_states(&mut self, record: &Record) -> Result<(), FormatError> {
        const R: &str = "INITIALSTATES";
        self.dfa_initial = Some(record.u16_at(0, R)?);
        self.lr_initial = Some(record.u16_at(1, R)?);
        Ok(())
    }

    fn finish(self) -> Result<GrammarModel, FormatError> {
        let symbols = densify(self.symbols, "symbol record")?;
        let rules = densify(self.rules, "rule record")?;
        let charsets = densify(self.charsets, "charset record")?;
        let dfa_states = densify(self.dfa_states, "DFA state record")?;
        let lr_states = densify(self.lr_states, "LALR state record")?;
        let mut groups = densify(self.groups, "group record")?;

        // Legacy COMMENT_LINE symbols become implicit single-line groups:
        // OPEN ending, token advance, no explicit end symbol. An explicit
        // group for the same start symbol wins; the analysis pass warns.
        for symbol in &symbols {
            if symbol.kind == SymbolKind::CommentLine
                && !groups.iter().any(|g| g.start == symbol.id)
            {
                groups.push(Group {
                    id: groups.len() as GroupId,
                    name: symbol.name.clone(),
                    container: symbol.id,
                    start: symbol.id,
                    end: None,
                    advance: AdvanceMode::Token,
                    ending: EndingMode::Open,
                    produce_token: false,
                    nesting: Vec::new(),
                });
            }
        }

        if let Some(counts) = self.counts {
            let checks: [(&'static str, usize, usize); 5] = [
                ("symbols", counts.symbols, symbols.len()),
                ("charsets", counts.charsets, charsets.len()),
                ("rules", counts.rules, rules.len()),
                ("DFA states", counts.dfa_states, dfa_states.len()),
                ("LALR states", counts.lr_states, lr_states.len()),
            ];
            for (table, declared, actual) in checks {
                if declared != actual {
                    return Err(FormatError::CountMismatch {
                        table,
                        declared,
                        actual,
                    });
                }
            }
            if let Some(declared) = counts.groups {
                // Synthesized legacy groups are not part of the declared
                // count; only explicit group records are.
                let explicit = groups.iter().filter(|g| g.end.is_some()).count();
                if declared != explicit {
                    return Err(FormatError::CountMismatch {
                        table: "groups",
                        declared,
                        actual: explicit,
                    });
                }
            }
        }

        validate_references(&symbols, &rules, &charsets, &dfa_states, &lr_states, &groups)?;

        let dfa_initial = self.dfa_initial.unwrap_or(0);
        let lr_initial = self.lr_initial.unwrap_or(0);
        if !dfa_states.is_empty() && dfa_states.get(dfa_initial as usize).is_none() {
            return Err(FormatError::DanglingReference {
                referrer: "initial states record",
                referrer_id: 0,
                target: "DFA state",
                target_id: dfa_initial as usize,
            });
        }
        if !lr_states.is_empty() && lr_states.get(lr_initial as usize).is_none() {
            return Err(FormatError::DanglingReference {
                referrer: "initial states record",
                referrer_id: 0,
                target: "LALR state",
                target_id: lr_initial as usize,
            });
        }

        let mut group_for_start: HashMap<SymbolId, GroupId, RandomState> = HashMap::default();
        for group in &groups {
            // First (explicit) group for a start symbol wins.
            group_for_start.entry(group.start).or_insert(group.id);
        }

        Ok(GrammarModel {
            name: self.name,
            case_sensitive: self.case_sensitive.unwrap_or(true),
            start_symbol: self.start_symbol,
            properties: self.properties,
            symbols,
            rules,
            charsets,
            dfa_states,
            lr_states,
            groups,
            dfa_initial,
            lr_initial,
            group_for_start,
        })
    }
}

/// Cross-table validation run at build completion.
///
/// Every id referenced from any table must resolve: LALR shift/goto
/// targets and reduce rules, DFA edge charsets and targets and accept
/// symbols, group symbols and nesting edges.
fn validate_references(
    symbols: &[Symbol],
    rules: &[Rule],
    charsets: &[CharacterSet],
    dfa_states: &[DfaState],
    lr_states: &[LrState],
    groups: &[Group],
) -> Result<(), FormatError> {
    let symbol_exists = |id: SymbolId| (id as usize) < symbols.len();

    for state in dfa_states {
        if let Some(accept) = state.accept {
            if !symbol_exists(accept) {
                return Err(FormatError::DanglingReference {
                    referrer: "DFA state",
                    referrer_id: state.id as usize,
                    target: "symbol",
                    target_id: accept as usize,
                });
            }
        }
        for edge in &state.edges {
            if (edge.charset as usize) >= charsets.len() {
                return Err(FormatError::DanglingReference {
                    referrer: "DFA state",
                    referrer_id: state.id as usize,
                    target: "charset",
                    target_id: edge.charset as usize,
                });
            }
            if (edge.target as usize) >= dfa_states.len() {
                return Err(FormatError::DanglingReference {
                    referrer: "DFA state",
                    referrer_id: state.id as usize,
                    target: "DFA state",
                    target_id: edge.target as usize,
                });
            }
        }
    }

    for state in lr_states {
        for (&symbol, action) in &state.actions {
            if !symbol_exists(symbol) {
                return Err(FormatError::DanglingReference {
                    referrer: "LALR state",
                    referrer_id: state.id as usize,
                    target: "symbol",
                    target_id: symbol as usize,
                });
            }
            match action.kind {
                ActionKind::Shift | ActionKind::Goto => {
                    if (action.value as usize) >= lr_states.len() {
                        return Err(FormatError::DanglingReference {
                            referrer: "LALR action",
                            referrer_id: state.id as usize,
                            target: "LALR state",
                            target_id: action.value as usize,
                        });
                    }
                }
                ActionKind::Reduce => {
                    if (action.value as usize) >= rules.len() {
                        return Err(FormatError::DanglingReference {
                            referrer: "LALR action",
                            referrer_id: state.id as usize,
                            target: "rule",
                            target_id: action.value as usize,
                        });
                    }
                }
                ActionKind::Accept | ActionKind::Undefined => {}
            }
        }
    }

    for group in groups {
        let mut refs = vec![group.container, group.start];
        if let Some(end) = group.end {
            refs.push(end);
        }
        for sym in refs {
            if !symbol_exists(sym) {
                return Err(FormatError::DanglingReference {
                    referrer: "group",
                    referrer_id: group.id as usize,
                    target: "symbol",
                    target_id: sym as usize,
                });
            }
        }
        for &nested in &group.nesting {
            if (nested as usize) >= groups.len() {
                return Err(FormatError::DanglingReference {
                    referrer: "group",
                    referrer_id: group.id as usize,
                    target: "group",
                    target_id: nested as usize,
                });
            }
        }
    }

    // Rule symbols were checked on application; heads re-checked here in
    // case a later record shrank nothing (cheap, keeps the invariant local).
    for rule in rules {
        if !symbol_exists(rule.head) {
            return Err(FormatError::DanglingReference {
                referrer: "rule",
                referrer_id: rule.id as usize,
                target: "symbol",
                target_id: rule.head as usize,
            });
        }
    }

    Ok(())
}
